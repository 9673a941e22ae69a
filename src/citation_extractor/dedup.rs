use std::collections::HashSet;

use super::CanonicalCitation;

/// Keeps the first of any (citation, sentence) pair seen within one record
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<(CanonicalCitation, String)>,
    entries: Vec<(CanonicalCitation, String)>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the exact pair was already recorded
    pub fn push(&mut self, citation: CanonicalCitation, sentence: String) -> bool {
        let key = (citation, sentence);
        if self.seen.contains(&key) {
            return false;
        }
        self.seen.insert(key.clone());
        self.entries.push(key);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unique pairs in first-seen order
    pub fn into_entries(self) -> Vec<(CanonicalCitation, String)> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation(s: &str) -> CanonicalCitation {
        s.parse().unwrap()
    }

    #[test]
    fn test_identical_pairs_collapse() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.push(citation("1.2.70"), "इति।".to_string()));
        assert!(!dedup.push(citation("1.2.70"), "इति।".to_string()));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_same_sentence_different_citations_kept() {
        let mut dedup = Deduplicator::new();
        dedup.push(citation("1.2.70"), "इति।".to_string());
        dedup.push(citation("2.3.80"), "इति।".to_string());
        dedup.push(citation("1.2.70"), "अन्यत्।".to_string());

        let entries = dedup.into_entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].0.as_str(), "2.3.80");
    }
}
