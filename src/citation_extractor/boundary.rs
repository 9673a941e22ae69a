// WHY: Sentence boundary resolution around a located citation
// The danda both ends sentences and separates digit groups inside (पा.1।2।70), so
// every delimiter inside a located notation is protected from boundary search

use std::ops::Range;

use super::{CitationSpan, NotationRules};
use crate::error::{slice, CitationError};

/// Byte range of the sentence containing a citation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceSpan {
    pub start: usize,
    pub end: usize,
}

impl SentenceSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Sorted, non-overlapping notation ranges
#[derive(Debug, Clone, Default)]
pub struct ProtectedSpans {
    ranges: Vec<Range<usize>>,
}

impl ProtectedSpans {
    pub fn from_citations(citations: &[CitationSpan<'_>]) -> Self {
        let mut ranges: Vec<Range<usize>> = citations.iter().map(|c| c.range()).collect();
        ranges.sort_by_key(|r| r.start);
        Self { ranges }
    }

    /// Whether byte offset `pos` falls inside any protected range
    pub fn contains(&self, pos: usize) -> bool {
        let idx = self.ranges.partition_point(|r| r.end <= pos);
        self.ranges.get(idx).is_some_and(|r| r.start <= pos)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Resolve the sentence span for one citation
///
/// The left edge sits just after the nearest unprotected delimiter before the citation
/// (or at text start), with leading whitespace skipped. The right edge includes the
/// nearest unprotected delimiter after the citation (or is the text end).
pub fn resolve_sentence(
    text: &str,
    citation: &CitationSpan<'_>,
    protected: &ProtectedSpans,
    rules: &NotationRules,
) -> Result<SentenceSpan, CitationError> {
    let before = slice(text, 0, citation.start)?;
    let left = before
        .char_indices()
        .rev()
        .find(|&(pos, ch)| rules.is_delimiter(ch) && !protected.contains(pos))
        .map(|(pos, ch)| pos + ch.len_utf8())
        .unwrap_or(0);

    let gap = slice(text, left, citation.start)?;
    let start = left + (gap.len() - gap.trim_start().len());

    let after = slice(text, citation.end, text.len())?;
    let end = after
        .char_indices()
        .find(|&(offset, ch)| rules.is_delimiter(ch) && !protected.contains(citation.end + offset))
        .map(|(offset, ch)| citation.end + offset + ch.len_utf8())
        .unwrap_or(text.len());

    Ok(SentenceSpan { start, end })
}
