// WHY: JSON shapes of the source commentary documents and of the per-document extracts

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::citation_extractor::{CanonicalCitation, CitationOccurrence, VerseRecord};

/// A commentary document: `{ "title": ..., "data": [ { "c", "n", "v", "mn" } ] }`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SourceDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub data: Vec<SourceEntry>,
}

/// One verse of a source document
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SourceEntry {
    /// Chapter number, string or number in the wild
    #[serde(default)]
    pub c: Value,
    /// Verse number, string or number in the wild
    #[serde(default)]
    pub n: Value,
    /// Verse text
    #[serde(default)]
    pub v: Option<String>,
    /// Commentary text
    #[serde(default)]
    pub mn: Option<String>,
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl SourceEntry {
    pub fn to_record(&self) -> VerseRecord {
        VerseRecord::new(
            id_string(&self.c),
            id_string(&self.n),
            self.v.clone().unwrap_or_default(),
            self.mn.clone().unwrap_or_default(),
        )
    }
}

impl SourceDocument {
    pub fn records(&self) -> Vec<VerseRecord> {
        self.data.iter().map(SourceEntry::to_record).collect()
    }
}

/// Extract output for one source document
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExtractDocument {
    /// Document name, e.g. `raghuvansham`
    pub text: String,
    pub title: String,
    pub base_link: String,
    pub comment: String,
    pub data: Vec<ExtractEntry>,
}

/// Verses whose commentary cites at least one sutra
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExtractEntry {
    pub loc: String,
    #[serde(default)]
    pub v: String,
    pub sutra_sentences: Vec<SutraSentence>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SutraSentence {
    pub sutra: CanonicalCitation,
    #[serde(default)]
    pub word: String,
    pub sentence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pada: Option<String>,
}

impl<'r> From<CitationOccurrence<'r>> for SutraSentence {
    fn from(occurrence: CitationOccurrence<'r>) -> Self {
        Self {
            sutra: occurrence.citation,
            word: String::new(),
            sentence: occurrence.sentence,
            pada: None,
        }
    }
}

impl ExtractDocument {
    /// Number of sutra sentences across all entries
    pub fn occurrence_count(&self) -> usize {
        self.data.iter().map(|e| e.sutra_sentences.len()).sum()
    }

    pub fn sentences(&self) -> impl Iterator<Item = (&ExtractEntry, &SutraSentence)> {
        self.data
            .iter()
            .flat_map(|entry| entry.sutra_sentences.iter().map(move |s| (entry, s)))
    }
}

/// Comment line stored in each extract document
pub fn extract_comment(unique_citations: usize) -> String {
    format!("This file contains {unique_citations} unique Panini sutras referenced in the commentary")
}

/// Serialize pretty JSON (non-ASCII kept as is) and write it, creating parent dirs
pub async fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub async fn load_extract(path: &Path) -> Result<ExtractDocument> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid extract document {}", path.display()))
}
