// WHY: Turns a raw fragment into the published sentence: notation removed, split
// artifacts dropped, whitespace collapsed. Backtick quotation markers are never touched

use regex_automata::meta::Regex;

use super::locator::{char_class, notation_pattern, push_escaped};
use super::NotationRules;
use crate::error::CitationError;

/// Collapse whitespace runs (line breaks included) to one space and trim both ends
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_whitespace_into(text, &mut result);
    result
}

/// Normalize whitespace into supplied buffer to avoid allocation
pub fn normalize_whitespace_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut chars = text.chars().peekable();
    let mut prev_was_space = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                // \r\n counts as a single break
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if !prev_was_space {
                    buffer.push(' ');
                    prev_was_space = true;
                }
            }
            _ if ch.is_whitespace() => {
                if !prev_was_space {
                    buffer.push(' ');
                    prev_was_space = true;
                }
            }
            _ => {
                buffer.push(ch);
                prev_was_space = false;
            }
        }
    }

    let trimmed = buffer.trim();
    if trimmed.len() != buffer.len() {
        let trimmed_content = trimmed.to_string();
        buffer.clear();
        buffer.push_str(&trimmed_content);
    }
}

/// Leftover of a neighbouring notation at fragment start, e.g. `57)। `
fn artifact_pattern(rules: &NotationRules) -> String {
    let mut pattern = String::from(r"^\s*[0-9]+");
    push_escaped(&mut pattern, rules.close_marker.encode_utf8(&mut [0; 4]));
    pattern.push_str(r"\s*");
    pattern.push_str(&char_class(&rules.sentence_delimiters));
    pattern.push_str(r"*\s*");
    pattern
}

/// Cleans extracted fragments
#[derive(Debug, Clone)]
pub struct TextCleaner {
    notation: Regex,
    artifact: Regex,
    delimiters: Vec<char>,
}

impl TextCleaner {
    pub fn new(rules: &NotationRules) -> Result<Self, CitationError> {
        Ok(Self {
            notation: Regex::new(&notation_pattern(rules))?,
            artifact: Regex::new(&artifact_pattern(rules))?,
            delimiters: rules.sentence_delimiters.clone(),
        })
    }

    /// Run the cleaning steps in order; the result never contains notation
    pub fn clean(&self, fragment: &str) -> Result<String, CitationError> {
        let without_notation = self.remove_notations(fragment);
        let without_artifact = self.strip_leading_artifact(&without_notation);
        let without_delimiter = self.strip_leading_delimiter(without_artifact);
        let cleaned = normalize_whitespace(without_delimiter);

        if self.notation.is_match(&cleaned) {
            return Err(CitationError::NotationSurvived(cleaned));
        }
        Ok(cleaned)
    }

    /// Remove every notation substring; repeats because a removal can join
    /// the halves of an enclosing notation-shaped string
    pub fn remove_notations(&self, text: &str) -> String {
        let mut current = text.to_string();
        while self.notation.is_match(&current) {
            let mut result = String::with_capacity(current.len());
            let mut last = 0;
            for m in self.notation.find_iter(&current) {
                result.push_str(&current[last..m.start()]);
                last = m.end();
            }
            result.push_str(&current[last..]);
            current = result;
        }
        current
    }

    /// Drop a `digits + close marker + delimiters` remnant at fragment start
    pub fn strip_leading_artifact<'a>(&self, text: &'a str) -> &'a str {
        match self.artifact.find(text) {
            Some(m) if m.start() == 0 => &text[m.end()..],
            _ => text,
        }
    }

    /// Drop one delimiter if it is the first non-space character
    pub fn strip_leading_delimiter<'a>(&self, text: &'a str) -> &'a str {
        let trimmed = text.trim_start();
        match trimmed.chars().next() {
            Some(ch) if self.delimiters.contains(&ch) => &trimmed[ch.len_utf8()..],
            _ => text,
        }
    }
}
