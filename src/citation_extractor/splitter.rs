// WHY: Splits a sentence shared by several citations into one fragment per citation
// using comma-class break points; falls back to the whole sentence when none exists

use tracing::debug;

use super::{CitationSpan, NotationRules, SentenceSpan};
use crate::error::{slice, CitationError};

/// Text assigned to one citation of a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    /// Position of the citation within the group passed to `split_sentence`
    pub citation: usize,
    pub start: usize,
    pub end: usize,
    /// True when the duplication fallback assigned the entire sentence
    pub whole_sentence: bool,
}

/// Offset just past the first break point in `text[from..to]`
fn find_break(
    text: &str,
    from: usize,
    to: usize,
    rules: &NotationRules,
) -> Result<Option<usize>, CitationError> {
    let between = slice(text, from, to)?;
    Ok(between
        .char_indices()
        .find(|&(_, ch)| rules.is_break_point(ch))
        .map(|(offset, ch)| from + offset + ch.len_utf8()))
}

/// Whether `text[start..end]` holds nothing but member notations, break points,
/// delimiters and whitespace
fn is_blank(
    text: &str,
    start: usize,
    end: usize,
    citations: &[CitationSpan<'_>],
    rules: &NotationRules,
) -> Result<bool, CitationError> {
    let fragment = slice(text, start, end)?;
    Ok(fragment.char_indices().all(|(offset, ch)| {
        let pos = start + offset;
        !rules.is_content(ch) || citations.iter().any(|c| c.range().contains(&pos))
    }))
}

/// Partition `sentence` among `citations` (left to right, all inside the sentence)
///
/// Fragment i runs from the end of fragment i-1 (or the sentence start) through the
/// first break point after citation i, or through the sentence end for the last one.
/// When citations i and i+1 have no break point between them, both receive the whole
/// sentence; context is duplicated rather than truncated. A fragment left with no text
/// besides notation and punctuation also falls back to the whole sentence, together
/// with its neighbours.
pub fn split_sentence(
    text: &str,
    sentence: SentenceSpan,
    citations: &[CitationSpan<'_>],
    rules: &NotationRules,
) -> Result<Vec<Fragment>, CitationError> {
    let whole = |citation: usize| Fragment {
        citation,
        start: sentence.start,
        end: sentence.end,
        whole_sentence: true,
    };

    if citations.len() < 2 {
        return Ok(citations
            .iter()
            .enumerate()
            .map(|(i, _)| Fragment {
                whole_sentence: false,
                ..whole(i)
            })
            .collect());
    }

    let breaks = citations
        .windows(2)
        .map(|pair| find_break(text, pair[0].end, pair[1].start, rules))
        .collect::<Result<Vec<_>, _>>()?;

    let last = citations.len() - 1;
    let mut bounds = Vec::with_capacity(citations.len());
    let mut blank = Vec::with_capacity(citations.len());

    for i in 0..citations.len() {
        let left = if i == 0 { Some(sentence.start) } else { breaks[i - 1] };
        let right = if i == last { Some(sentence.end) } else { breaks[i] };

        let span = left.zip(right);
        let empty = match span {
            Some((start, end)) => is_blank(text, start, end, citations, rules)?,
            None => false,
        };
        bounds.push(span);
        blank.push(empty);
    }

    let fragments = bounds
        .iter()
        .enumerate()
        .map(|(i, span)| {
            let near_blank = blank[i] || (i > 0 && blank[i - 1]) || blank.get(i + 1) == Some(&true);
            match *span {
                Some((start, end)) if !near_blank => Fragment {
                    citation: i,
                    start,
                    end,
                    whole_sentence: false,
                },
                _ => {
                    debug!(
                        "No break point isolates citation {} ({}); assigning whole sentence",
                        i, citations[i].raw
                    );
                    whole(i)
                }
            }
        })
        .collect();

    Ok(fragments)
}
