// WHY: Cross-document index of every occurrence, keyed by citation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use crate::citation_extractor::CanonicalCitation;
use crate::discovery::{find_documents, DiscoveryConfig};
use crate::document::{load_extract, ExtractDocument};

pub const DEFAULT_AGGREGATE_TITLE: &str = "काव्यप्रयोगाः";

#[derive(Debug, Clone)]
pub struct AggregateConfig {
    pub title: String,
    /// Abort on the first unreadable extract
    pub fail_fast: bool,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_AGGREGATE_TITLE.to_string(),
            fail_fast: false,
        }
    }
}

/// One usage of a sutra in some commentary
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PrayogaRef {
    pub word: String,
    /// Title of the source document
    pub text: String,
    pub loc: String,
    pub url: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pada: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AggregateDocument {
    pub title: String,
    pub comment: String,
    /// Keys ordered numerically by citation
    pub data: BTreeMap<CanonicalCitation, Vec<PrayogaRef>>,
}

pub fn aggregate_comment(unique_citations: usize) -> String {
    format!("This file contains {unique_citations} unique Panini sutras covered in the commentaries")
}

/// `{base_link}{text}/{loc}`
pub fn reference_url(base_link: &str, text: &str, loc: &str) -> String {
    format!("{base_link}{text}/{loc}")
}

/// Merge extract documents; references keep document then verse order
pub fn aggregate(documents: &[ExtractDocument], config: &AggregateConfig) -> AggregateDocument {
    let mut data: BTreeMap<CanonicalCitation, Vec<PrayogaRef>> = BTreeMap::new();

    for document in documents {
        for (entry, sentence) in document.sentences() {
            data.entry(sentence.sutra.clone()).or_default().push(PrayogaRef {
                word: sentence.word.clone(),
                text: document.title.clone(),
                loc: entry.loc.clone(),
                url: reference_url(&document.base_link, &document.text, &entry.loc),
                reference: sentence.sentence.clone(),
                pada: sentence.pada.clone(),
            });
        }
    }

    AggregateDocument {
        title: config.title.clone(),
        comment: aggregate_comment(data.len()),
        data,
    }
}

/// Load every extract in a directory (sorted by path) and aggregate them
pub async fn aggregate_directory(extract_dir: &Path, config: &AggregateConfig) -> Result<AggregateDocument> {
    let documents = load_extracts(extract_dir, config.fail_fast).await?;
    let aggregated = aggregate(&documents, config);
    info!(
        "Aggregated {} documents into {} unique sutras",
        documents.len(),
        aggregated.data.len()
    );
    Ok(aggregated)
}

/// Load all extract documents of a directory; unreadable ones are skipped unless `fail_fast`
pub async fn load_extracts(extract_dir: &Path, fail_fast: bool) -> Result<Vec<ExtractDocument>> {
    let config = DiscoveryConfig {
        fail_fast,
        ..Default::default()
    };
    let paths = find_documents(extract_dir, config).await?;

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        match load_extract(&path).await {
            Ok(document) => documents.push(document),
            Err(e) if fail_fast => return Err(e),
            Err(e) => warn!("Skipping {}: {:#}", path.display(), e),
        }
    }
    Ok(documents)
}
