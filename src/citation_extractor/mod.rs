// WHY: Citation extraction engine for one verse record at a time
// Locator -> boundary resolver -> splitter -> normalizer + cleaner -> deduplicator

use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

pub mod boundary;
pub mod canonical;
pub mod cleaner;
pub mod dedup;
pub mod locator;
pub mod splitter;

pub use boundary::{resolve_sentence, ProtectedSpans, SentenceSpan};
pub use canonical::CanonicalCitation;
pub use cleaner::{normalize_whitespace, normalize_whitespace_into, TextCleaner};
pub use dedup::Deduplicator;
pub use locator::{CitationLocator, CitationSpan};
pub use splitter::{split_sentence, Fragment};

use crate::error::{slice, CitationError};

/// Notation and punctuation used by the commentaries
#[derive(Debug, Clone)]
pub struct NotationRules {
    /// Character opening a citation notation
    pub open_marker: char,
    /// Fixed token following the open marker
    pub prefix: String,
    /// Characters allowed between the three digit groups
    pub field_separators: Vec<char>,
    /// Character closing a citation notation
    pub close_marker: char,
    /// Characters that end a sentence
    pub sentence_delimiters: Vec<char>,
    /// Comma-class characters used to split a sentence shared by several citations
    pub break_points: Vec<char>,
}

impl Default for NotationRules {
    fn default() -> Self {
        Self {
            open_marker: '(',
            prefix: "पा.".to_string(),
            field_separators: vec!['।', '|'],
            close_marker: ')',
            sentence_delimiters: vec!['।', '॥'],
            break_points: vec![','],
        }
    }
}

impl NotationRules {
    pub fn is_delimiter(&self, ch: char) -> bool {
        self.sentence_delimiters.contains(&ch)
    }

    pub fn is_break_point(&self, ch: char) -> bool {
        self.break_points.contains(&ch)
    }

    /// Anything other than whitespace, delimiters and break points
    pub fn is_content(&self, ch: char) -> bool {
        !ch.is_whitespace() && !self.is_delimiter(ch) && !self.is_break_point(ch)
    }
}

/// One verse with its commentary; supplied by the caller and never mutated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    pub chapter_id: String,
    pub verse_id: String,
    pub verse_text: String,
    pub commentary_text: String,
}

impl VerseRecord {
    pub fn new(
        chapter_id: impl Into<String>,
        verse_id: impl Into<String>,
        verse_text: impl Into<String>,
        commentary_text: impl Into<String>,
    ) -> Self {
        Self {
            chapter_id: chapter_id.into(),
            verse_id: verse_id.into(),
            verse_text: verse_text.into(),
            commentary_text: commentary_text.into(),
        }
    }

    /// `"<chapter>.<verse>"`
    pub fn location(&self) -> String {
        format!("{}.{}", self.chapter_id, self.verse_id)
    }
}

/// A citation paired with the cleaned sentence that explains it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationOccurrence<'r> {
    pub record: &'r VerseRecord,
    pub citation: CanonicalCitation,
    pub sentence: String,
}

/// Why a record produced no occurrences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub location: String,
    pub reason: String,
}

/// Result of processing one record; failures never escape as errors
#[derive(Debug, Clone)]
pub struct RecordOutcome<'r> {
    pub occurrences: Vec<CitationOccurrence<'r>>,
    /// Notation-shaped candidates discarded for not having three digit groups
    pub malformed_candidates: usize,
    pub failure: Option<RecordFailure>,
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Extracts citation occurrences from verse commentary
#[derive(Debug, Clone)]
pub struct CitationExtractor {
    rules: NotationRules,
    locator: CitationLocator,
    cleaner: TextCleaner,
}

impl CitationExtractor {
    pub fn new(rules: NotationRules) -> Result<Self, CitationError> {
        let locator = CitationLocator::new(&rules)?;
        let cleaner = TextCleaner::new(&rules)?;
        Ok(Self {
            rules,
            locator,
            cleaner,
        })
    }

    pub fn with_default_rules() -> Result<Self, CitationError> {
        Self::new(NotationRules::default())
    }

    pub fn rules(&self) -> &NotationRules {
        &self.rules
    }

    pub fn locator(&self) -> &CitationLocator {
        &self.locator
    }

    /// Occurrences for one record; empty when the record fails
    pub fn extract<'r>(&self, record: &'r VerseRecord) -> Vec<CitationOccurrence<'r>> {
        self.process_record(record).occurrences
    }

    /// Process one record, containing any failure (including panics) to that record
    pub fn process_record<'r>(&self, record: &'r VerseRecord) -> RecordOutcome<'r> {
        let commentary = record.commentary_text.as_str();
        let malformed_candidates = self.locator.malformed_candidates(commentary).len();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.extract_sentences(commentary)))
            .unwrap_or_else(|payload| Err(CitationError::Panicked(panic_message(payload))));

        match result {
            Ok(pairs) => RecordOutcome {
                occurrences: pairs
                    .into_iter()
                    .map(|(citation, sentence)| CitationOccurrence {
                        record,
                        citation,
                        sentence,
                    })
                    .collect(),
                malformed_candidates,
                failure: None,
            },
            Err(e) => {
                let location = record.location();
                warn!("Record {} failed, emitting no occurrences: {}", location, e);
                RecordOutcome {
                    occurrences: Vec::new(),
                    malformed_candidates,
                    failure: Some(RecordFailure {
                        location,
                        reason: e.to_string(),
                    }),
                }
            }
        }
    }

    /// Core transform over commentary text: unique (citation, sentence) pairs in
    /// citation order
    pub fn extract_sentences(
        &self,
        text: &str,
    ) -> Result<Vec<(CanonicalCitation, String)>, CitationError> {
        let citations = self.locator.locate(text);
        if citations.is_empty() {
            return Ok(Vec::new());
        }

        let protected = ProtectedSpans::from_citations(&citations);

        // Consecutive citations resolving to the same sentence form one group
        let mut groups: Vec<(SentenceSpan, usize, usize)> = Vec::new();
        for (idx, citation) in citations.iter().enumerate() {
            let sentence = resolve_sentence(text, citation, &protected, &self.rules)?;
            match groups.last_mut() {
                Some((last, _, end)) if *last == sentence => *end = idx + 1,
                _ => groups.push((sentence, idx, idx + 1)),
            }
        }

        let mut dedup = Deduplicator::new();
        for (sentence, first, end) in groups {
            let members = &citations[first..end];
            for fragment in split_sentence(text, sentence, members, &self.rules)? {
                let raw = slice(text, fragment.start, fragment.end)?;
                let cleaned = self.cleaner.clean(raw)?;
                let citation = members[fragment.citation].canonical();

                if !cleaned.chars().any(|ch| self.rules.is_content(ch)) {
                    debug!("Citation {} has no explanatory text, skipping", citation);
                    continue;
                }
                if !dedup.push(citation, cleaned) {
                    debug!("Dropped duplicate occurrence in sentence at {}..{}", sentence.start, sentence.end);
                }
            }
        }

        Ok(dedup.into_entries())
    }
}
