//! Error types for declorder-scan.

use thiserror::Error;

/// A source file the scanner cannot split into top-level declarations.
///
/// Offsets are byte positions into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unterminated {what} starting at byte {offset}")]
    Unterminated { what: &'static str, offset: usize },

    #[error("unmatched '{found}' at byte {offset}")]
    UnmatchedClose { found: char, offset: usize },

    #[error("'{open}' at byte {offset} is never closed")]
    Unclosed { open: char, offset: usize },

    #[error("missing package clause")]
    MissingPackage,

    #[error("unexpected top-level token {text:?} at byte {offset}")]
    UnexpectedToken { text: String, offset: usize },

    #[error("import declaration at byte {offset} follows other declarations")]
    MisplacedImport { offset: usize },

    #[error("malformed {keyword} declaration at byte {offset}")]
    Malformed { keyword: &'static str, offset: usize },
}

impl ScanError {
    pub fn offset(&self) -> Option<usize> {
        match self {
            ScanError::Unterminated { offset, .. }
            | ScanError::UnmatchedClose { offset, .. }
            | ScanError::Unclosed { offset, .. }
            | ScanError::UnexpectedToken { offset, .. }
            | ScanError::MisplacedImport { offset }
            | ScanError::Malformed { offset, .. } => Some(*offset),
            ScanError::MissingPackage => None,
        }
    }
}
