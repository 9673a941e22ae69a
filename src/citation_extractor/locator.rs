// WHY: Locates every sutra notation like (पा.1।2।70) in commentary text
// Uses regex-automata meta regex with capture groups for the three digit groups

use regex_automata::meta::Regex;
use std::ops::Range;
use tracing::debug;

use super::{CanonicalCitation, NotationRules};
use crate::error::CitationError;

/// A located notation occurrence, borrowed from the commentary text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationSpan<'a> {
    /// Byte offset of the open marker
    pub start: usize,
    /// Byte offset just past the close marker
    pub end: usize,
    /// The full notation substring
    pub raw: &'a str,
    /// The three digit groups in written order
    pub parts: [&'a str; 3],
}

impl<'a> CitationSpan<'a> {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Normalize into the canonical dotted identifier
    pub fn canonical(&self) -> CanonicalCitation {
        CanonicalCitation::from_parts(self.parts)
    }
}

/// Escape ASCII punctuation so notation characters are matched literally
pub(super) fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch.is_ascii_punctuation() {
            out.push('\\');
        }
        out.push(ch);
    }
}

pub(super) fn char_class(chars: &[char]) -> String {
    let mut class = String::from("[");
    for ch in chars {
        push_escaped(&mut class, ch.encode_utf8(&mut [0; 4]));
    }
    class.push(']');
    class
}

/// Pattern matching exactly three digit groups between the open and close markers
pub fn notation_pattern(rules: &NotationRules) -> String {
    let separators = char_class(&rules.field_separators);
    let mut pattern = String::new();
    push_escaped(&mut pattern, rules.open_marker.encode_utf8(&mut [0; 4]));
    push_escaped(&mut pattern, &rules.prefix);
    pattern.push_str("([0-9]+)");
    pattern.push_str(&separators);
    pattern.push_str("([0-9]+)");
    pattern.push_str(&separators);
    pattern.push_str("([0-9]+)");
    push_escaped(&mut pattern, rules.close_marker.encode_utf8(&mut [0; 4]));
    pattern
}

/// Looser pattern for anything shaped like a notation, used to count malformed ones
fn candidate_pattern(rules: &NotationRules) -> String {
    let mut separators: Vec<char> = rules.field_separators.clone();
    separators.push('.');

    let mut pattern = String::new();
    push_escaped(&mut pattern, rules.open_marker.encode_utf8(&mut [0; 4]));
    push_escaped(&mut pattern, &rules.prefix);
    pattern.push_str("(?:[0-9]|");
    pattern.push_str(&char_class(&separators));
    pattern.push_str(")*");
    push_escaped(&mut pattern, rules.close_marker.encode_utf8(&mut [0; 4]));
    pattern
}

/// Finds citation notations in commentary text
#[derive(Debug, Clone)]
pub struct CitationLocator {
    notation: Regex,
    candidate: Regex,
}

impl CitationLocator {
    pub fn new(rules: &NotationRules) -> Result<Self, CitationError> {
        let pattern = notation_pattern(rules);
        debug!("Compiling citation notation pattern: {}", pattern);
        Ok(Self {
            notation: Regex::new(&pattern)?,
            candidate: Regex::new(&candidate_pattern(rules))?,
        })
    }

    /// All well-formed notations in position order; spans never overlap
    pub fn locate<'a>(&self, text: &'a str) -> Vec<CitationSpan<'a>> {
        self.notation
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get_match()?;
                let a = caps.get_group(1)?;
                let b = caps.get_group(2)?;
                let c = caps.get_group(3)?;
                Some(CitationSpan {
                    start: whole.start(),
                    end: whole.end(),
                    raw: &text[whole.range()],
                    parts: [&text[a.range()], &text[b.range()], &text[c.range()]],
                })
            })
            .collect()
    }

    /// Notation-shaped candidates that do not carry exactly three digit groups
    pub fn malformed_candidates(&self, text: &str) -> Vec<Range<usize>> {
        let located: Vec<Range<usize>> = self.locate(text).iter().map(|s| s.range()).collect();
        let malformed: Vec<Range<usize>> = self
            .candidate
            .find_iter(text)
            .map(|m| m.range())
            .filter(|range| !located.contains(range))
            .collect();

        for range in &malformed {
            debug!("Discarding malformed citation candidate: {}", &text[range.clone()]);
        }
        malformed
    }

    /// Compiled notation regex, shared with the text cleaner
    pub fn notation_regex(&self) -> &Regex {
        &self.notation
    }
}
