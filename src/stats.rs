// WHY: Coverage and overlap of cited sutras across extract documents

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::citation_extractor::CanonicalCitation;
use crate::document::ExtractDocument;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DocumentCitationStats {
    pub document: String,
    pub unique_citations: usize,
    pub total_references: usize,
    pub average_references: f64,
    /// Citations found in no other document
    pub exclusive_citations: Vec<CanonicalCitation>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CorpusStats {
    pub documents: Vec<DocumentCitationStats>,
    pub total_unique_citations: usize,
    /// Citations referenced by every document
    pub shared_by_all: Vec<CanonicalCitation>,
    /// Citations referenced by more than one document
    pub in_multiple_documents: Vec<CanonicalCitation>,
}

/// Distinct citations of one document, numerically ordered
pub fn citation_set(document: &ExtractDocument) -> BTreeSet<CanonicalCitation> {
    document.sentences().map(|(_, s)| s.sutra.clone()).collect()
}

pub fn corpus_stats(documents: &[ExtractDocument]) -> CorpusStats {
    let sets: Vec<BTreeSet<CanonicalCitation>> = documents.iter().map(citation_set).collect();

    let mut document_counts: BTreeMap<&CanonicalCitation, usize> = BTreeMap::new();
    for set in &sets {
        for citation in set {
            *document_counts.entry(citation).or_default() += 1;
        }
    }

    let stats = documents
        .iter()
        .zip(&sets)
        .map(|(document, set)| {
            let total_references = document.occurrence_count();
            let average_references = if set.is_empty() {
                0.0
            } else {
                total_references as f64 / set.len() as f64
            };
            DocumentCitationStats {
                document: if document.text.is_empty() { document.title.clone() } else { document.text.clone() },
                unique_citations: set.len(),
                total_references,
                average_references,
                exclusive_citations: set
                    .iter()
                    .filter(|c| document_counts.get(c) == Some(&1))
                    .cloned()
                    .collect(),
            }
        })
        .collect();

    let shared_by_all = if documents.is_empty() {
        Vec::new()
    } else {
        document_counts
            .iter()
            .filter(|(_, count)| **count == documents.len())
            .map(|(c, _)| (*c).clone())
            .collect()
    };

    CorpusStats {
        documents: stats,
        total_unique_citations: document_counts.len(),
        shared_by_all,
        in_multiple_documents: document_counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(c, _)| (*c).clone())
            .collect(),
    }
}
