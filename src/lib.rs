pub mod aggregator;
pub mod citation_extractor;
pub mod discovery;
pub mod document;
pub mod enrichment;
pub mod error;
pub mod incremental;
pub mod pipeline;
pub mod reader;
pub mod stats;

// Re-export main types for convenient access
pub use citation_extractor::{
    CanonicalCitation, CitationExtractor, CitationOccurrence, CitationSpan, NotationRules,
    RecordFailure, RecordOutcome, VerseRecord,
};
pub use error::CitationError;

// Re-export document formats and pipeline entry points
pub use document::{ExtractDocument, ExtractEntry, SourceDocument, SourceEntry, SutraSentence};
pub use pipeline::{
    extract_document, extract_document_parallel, run_extraction, run_extractions, ExtractConfig,
    ExtractStats, RunStats,
};

pub use aggregator::{aggregate, AggregateConfig, AggregateDocument, PrayogaRef};
pub use stats::{corpus_stats, CorpusStats, DocumentCitationStats};
