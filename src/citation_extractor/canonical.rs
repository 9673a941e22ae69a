// WHY: Canonical A.B.C identifier built verbatim from the three notation digit groups

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::CitationError;

/// Canonical citation of the form `A.B.C`
///
/// Digit groups are kept exactly as written (no leading-zero normalization, no range
/// checks). Ordering compares the groups numerically so `1.2.9` sorts before `1.2.10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalCitation(String);

impl CanonicalCitation {
    /// Join three raw digit groups with `.` in their original order
    pub fn from_parts(parts: [&str; 3]) -> Self {
        Self(parts.join("."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The three digit groups
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

fn is_digit_group(group: &str) -> bool {
    !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for CanonicalCitation {
    type Err = CitationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups: Vec<&str> = s.split('.').collect();
        if groups.len() != 3 || !groups.iter().all(|g| is_digit_group(g)) {
            return Err(CitationError::InvalidCanonical(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for CanonicalCitation {
    type Error = CitationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CanonicalCitation> for String {
    fn from(citation: CanonicalCitation) -> Self {
        citation.0
    }
}

impl fmt::Display for CanonicalCitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compare two digit strings by numeric value without parsing (groups may exceed u64)
fn cmp_digit_groups(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for CanonicalCitation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components()
            .zip(other.components())
            .map(|(a, b)| cmp_digit_groups(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
            // Numerically equal groups with different zero padding stay distinct
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for CanonicalCitation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_keeps_digits_verbatim() {
        let citation = CanonicalCitation::from_parts(["1", "02", "70"]);
        assert_eq!(citation.as_str(), "1.02.70");
        assert_eq!(citation.components().collect::<Vec<_>>(), vec!["1", "02", "70"]);
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert!("1.2.70".parse::<CanonicalCitation>().is_ok());
        assert!("1.2".parse::<CanonicalCitation>().is_err());
        assert!("1.2.3.4".parse::<CanonicalCitation>().is_err());
        assert!("1..3".parse::<CanonicalCitation>().is_err());
        assert!("1.2.x".parse::<CanonicalCitation>().is_err());
        assert!("".parse::<CanonicalCitation>().is_err());
    }

    #[test]
    fn test_numeric_ordering() {
        let mut citations: Vec<CanonicalCitation> = ["3.1.124", "1.2.70", "1.2.9", "1.10.1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        citations.sort();
        let sorted: Vec<&str> = citations.iter().map(|c| c.as_str()).collect();
        assert_eq!(sorted, vec!["1.2.9", "1.2.70", "1.10.1", "3.1.124"]);
    }

    #[test]
    fn test_zero_padding_is_distinct_but_adjacent() {
        let padded: CanonicalCitation = "1.2.07".parse().unwrap();
        let plain: CanonicalCitation = "1.2.7".parse().unwrap();
        let next: CanonicalCitation = "1.2.8".parse().unwrap();
        assert_ne!(padded, plain);
        assert!(padded < next && plain < next);
    }

    #[test]
    fn test_serde_as_plain_string() {
        let citation: CanonicalCitation = "4.1.92".parse().unwrap();
        let json = serde_json::to_string(&citation).unwrap();
        assert_eq!(json, "\"4.1.92\"");

        let back: CanonicalCitation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, citation);
        assert!(serde_json::from_str::<CanonicalCitation>("\"4.1\"").is_err());
    }
}
