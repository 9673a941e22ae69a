// WHY: Document-level extraction: source document -> extract document + stats
// Records are independent, so chunks of them run on blocking worker tasks and are
// concatenated back in input order

use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::citation_extractor::{CanonicalCitation, CitationExtractor, RecordFailure, VerseRecord};
use crate::document::{extract_comment, save_json, ExtractDocument, ExtractEntry, SourceDocument, SutraSentence};
use crate::incremental;
use crate::reader::{DocumentReader, ReaderConfig};

pub const DEFAULT_BASE_LINK: &str = "https://sanskritsahitya.org/";

/// Everything the extraction of one document needs; no module-level constants
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Name written to the extract `text` field and used in reference URLs
    pub document_name: String,
    pub base_link: String,
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    /// Re-extract even when the output already exists
    pub overwrite_all: bool,
    /// Abort on first error
    pub fail_fast: bool,
    /// Number of blocking worker tasks per document
    pub workers: usize,
}

impl ExtractConfig {
    /// Config for one input file with defaults for everything else
    pub fn for_input(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let input_path = input_path.into();
        Self {
            document_name: incremental::document_name(&input_path),
            base_link: DEFAULT_BASE_LINK.to_string(),
            input_path,
            output_dir: output_dir.into(),
            overwrite_all: false,
            fail_fast: false,
            workers: num_cpus::get().max(1),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        incremental::generate_extract_path(&self.output_dir, &self.input_path)
    }
}

/// Per-document extraction statistics
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExtractStats {
    pub document: String,
    pub records_seen: u64,
    pub records_with_citations: u64,
    pub occurrences: u64,
    pub unique_citations: u64,
    pub malformed_candidates: u64,
    pub failed_records: Vec<RecordFailure>,
    pub processing_time_ms: u64,
    /// Processing status (success, skipped, failed)
    pub status: String,
    /// Error message if processing failed
    pub error: Option<String>,
}

/// Statistics for a whole run, written by `--stats-out`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Seconds since the Unix epoch
    pub run_start: u64,
    pub total_processing_time_ms: u64,
    pub documents_processed: u64,
    pub documents_skipped: u64,
    pub documents_failed: u64,
    pub total_occurrences: u64,
    pub document_stats: Vec<ExtractStats>,
}

/// Output of one chunk of records
#[derive(Debug, Default)]
struct ChunkResult {
    entries: Vec<ExtractEntry>,
    malformed_candidates: u64,
    failures: Vec<RecordFailure>,
}

fn extract_chunk(extractor: &CitationExtractor, records: &[VerseRecord]) -> ChunkResult {
    let mut result = ChunkResult::default();

    for record in records {
        // Only verses whose commentary cites something appear in the extract
        if extractor.locator().locate(&record.commentary_text).is_empty() {
            let malformed = extractor.locator().malformed_candidates(&record.commentary_text);
            result.malformed_candidates += malformed.len() as u64;
            continue;
        }

        let outcome = extractor.process_record(record);
        result.malformed_candidates += outcome.malformed_candidates as u64;
        if let Some(failure) = outcome.failure {
            result.failures.push(failure);
        }

        result.entries.push(ExtractEntry {
            loc: record.location(),
            v: record.verse_text.clone(),
            sutra_sentences: outcome.occurrences.into_iter().map(SutraSentence::from).collect(),
        });
    }

    result
}

fn assemble(
    config: &ExtractConfig,
    title: String,
    records_seen: usize,
    chunks: Vec<ChunkResult>,
    start_time: Instant,
) -> (ExtractDocument, ExtractStats) {
    let mut entries = Vec::new();
    let mut failed_records = Vec::new();
    let mut malformed_candidates = 0;

    for chunk in chunks {
        entries.extend(chunk.entries);
        failed_records.extend(chunk.failures);
        malformed_candidates += chunk.malformed_candidates;
    }

    let unique: HashSet<&CanonicalCitation> = entries
        .iter()
        .flat_map(|e| e.sutra_sentences.iter().map(|s| &s.sutra))
        .collect();
    let unique_citations = unique.len();

    let document = ExtractDocument {
        text: config.document_name.clone(),
        title,
        base_link: config.base_link.clone(),
        comment: extract_comment(unique_citations),
        data: entries,
    };

    let stats = ExtractStats {
        document: config.document_name.clone(),
        records_seen: records_seen as u64,
        records_with_citations: document.data.len() as u64,
        occurrences: document.occurrence_count() as u64,
        unique_citations: unique_citations as u64,
        malformed_candidates,
        failed_records,
        processing_time_ms: start_time.elapsed().as_millis() as u64,
        status: "success".to_string(),
        error: None,
    };

    info!(
        "Extracted {}: {} occurrences of {} unique sutras from {} of {} verses",
        stats.document, stats.occurrences, stats.unique_citations, stats.records_with_citations, stats.records_seen
    );

    (document, stats)
}

/// Extract one document on the current thread
pub fn extract_document(
    source: &SourceDocument,
    config: &ExtractConfig,
    extractor: &CitationExtractor,
) -> (ExtractDocument, ExtractStats) {
    let start_time = Instant::now();
    let records = source.records();
    let chunk = extract_chunk(extractor, &records);
    assemble(config, source.title.clone(), records.len(), vec![chunk], start_time)
}

/// Extract one document with records split across `config.workers` blocking tasks
pub async fn extract_document_parallel(
    source: SourceDocument,
    config: &ExtractConfig,
    extractor: Arc<CitationExtractor>,
) -> Result<(ExtractDocument, ExtractStats)> {
    let start_time = Instant::now();
    let records = source.records();
    let records_seen = records.len();
    let chunk_size = records_seen.div_ceil(config.workers.max(1)).max(1);

    let mut handles = Vec::new();
    let mut remaining = records.into_iter();
    loop {
        let chunk: Vec<VerseRecord> = remaining.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        let extractor = Arc::clone(&extractor);
        handles.push(tokio::task::spawn_blocking(move || extract_chunk(&extractor, &chunk)));
    }

    // Joined in spawn order so entries keep the source order
    let mut chunks = Vec::with_capacity(handles.len());
    for handle in handles {
        chunks.push(handle.await?);
    }

    Ok(assemble(config, source.title, records_seen, chunks, start_time))
}

fn skipped_stats(config: &ExtractConfig) -> ExtractStats {
    ExtractStats {
        document: config.document_name.clone(),
        status: "skipped".to_string(),
        ..Default::default()
    }
}

fn failed_stats(config: &ExtractConfig, error: String, start_time: Instant) -> ExtractStats {
    ExtractStats {
        document: config.document_name.clone(),
        processing_time_ms: start_time.elapsed().as_millis() as u64,
        status: "failed".to_string(),
        error: Some(error),
        ..Default::default()
    }
}

/// Read, extract and write one document
///
/// An existing output is left alone unless `overwrite_all`. Without `fail_fast`, read
/// errors become a `failed` status instead of an error.
pub async fn run_extraction(config: &ExtractConfig, extractor: Arc<CitationExtractor>) -> Result<ExtractStats> {
    let start_time = Instant::now();

    if !incremental::should_process(&config.output_dir, &config.input_path, config.overwrite_all) {
        info!("Skipping {}: extract already exists", config.input_path.display());
        return Ok(skipped_stats(config));
    }

    let reader = DocumentReader::new(ReaderConfig {
        fail_fast: config.fail_fast,
        ..Default::default()
    });
    let (source, read_stats) = reader.read_document::<SourceDocument, _>(&config.input_path).await?;
    let Some(source) = source else {
        let error = read_stats
            .read_error
            .unwrap_or_else(|| format!("No document read from {}", config.input_path.display()));
        return Ok(failed_stats(config, error, start_time));
    };

    let (document, mut stats) = extract_document_parallel(source, config, extractor).await?;

    let output_path = config.output_path();
    save_json(&output_path, &document).await?;
    info!("Results saved to: {}", output_path.display());

    if !stats.failed_records.is_empty() {
        warn!("{} records of {} failed", stats.failed_records.len(), stats.document);
    }
    stats.processing_time_ms = start_time.elapsed().as_millis() as u64;
    Ok(stats)
}

/// Run several extractions concurrently; stats come back sorted by document name
pub async fn run_extractions(
    configs: Vec<ExtractConfig>,
    extractor: Arc<CitationExtractor>,
    progress: Option<ProgressBar>,
) -> Result<RunStats> {
    let run_start = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let start_time = Instant::now();
    let fail_fast = configs.iter().any(|c| c.fail_fast);
    let concurrency = num_cpus::get().max(1);

    let mut results = stream::iter(configs)
        .map(|config| {
            let extractor = Arc::clone(&extractor);
            async move {
                let started = Instant::now();
                let result = run_extraction(&config, extractor).await;
                (config, result, started)
            }
        })
        .buffer_unordered(concurrency);

    let mut document_stats = Vec::new();
    while let Some((config, result, started)) = results.next().await {
        let stats = match result {
            Ok(stats) => stats,
            Err(e) if fail_fast => return Err(e),
            Err(e) => {
                warn!("Extraction of {} failed: {}", config.input_path.display(), e);
                failed_stats(&config, e.to_string(), started)
            }
        };
        if let Some(bar) = &progress {
            bar.inc(1);
        }
        document_stats.push(stats);
    }

    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    document_stats.sort_by(|a, b| a.document.cmp(&b.document));

    let count = |status: &str| document_stats.iter().filter(|s| s.status == status).count() as u64;
    Ok(RunStats {
        run_start,
        total_processing_time_ms: start_time.elapsed().as_millis() as u64,
        documents_processed: count("success"),
        documents_skipped: count("skipped"),
        documents_failed: count("failed"),
        total_occurrences: document_stats.iter().map(|s| s.occurrences).sum(),
        document_stats,
    })
}

/// Write run statistics as pretty JSON
pub async fn write_run_stats(path: &Path, stats: &RunStats) -> Result<()> {
    save_json(path, stats).await
}
