// WHY: Typed errors for the extraction core; collaborator layers wrap these in anyhow

use thiserror::Error;

/// Errors raised while extracting citations from one commentary text
#[derive(Error, Debug)]
pub enum CitationError {
    /// A computed offset range does not slice the text on char boundaries
    #[error("span {start}..{end} is not a valid slice of a {len}-byte text")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    /// Cleaned text still contains citation notation
    #[error("notation survived cleaning: {0:?}")]
    NotationSurvived(String),

    /// String is not three dot-separated digit groups
    #[error("invalid canonical citation: {0:?}")]
    InvalidCanonical(String),

    /// A notation or word pattern the regex engine rejects
    #[error("pattern failed to compile: {0}")]
    Pattern(#[from] regex_automata::meta::BuildError),

    /// Processing a record panicked; the panic was contained
    #[error("record processing panicked: {0}")]
    Panicked(String),
}

impl CitationError {
    pub(crate) fn out_of_bounds(start: usize, end: usize, text: &str) -> Self {
        CitationError::SpanOutOfBounds {
            start,
            end,
            len: text.len(),
        }
    }
}

/// Slice `text[start..end]`, reporting a typed error instead of panicking
pub(crate) fn slice(text: &str, start: usize, end: usize) -> Result<&str, CitationError> {
    text.get(start..end)
        .ok_or_else(|| CitationError::out_of_bounds(start, end, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_rejects_non_char_boundary() {
        let text = "पा";
        assert!(slice(text, 0, 1).is_err());
        assert_eq!(slice(text, 0, text.len()).unwrap(), "पा");
    }

    #[test]
    fn test_out_of_bounds_message() {
        let err = slice("abc", 2, 9).unwrap_err();
        assert_eq!(err.to_string(), "span 2..9 is not a valid slice of a 3-byte text");
    }
}
