//! Error types for declorder-edit.
//!
//! This module defines error types that distinguish between:
//! - Precondition mismatches (exit code 2): the file changed since it was read
//! - Rewrite and runtime errors (exit code 1): bad spans, unexpected bytes, I/O

use camino::Utf8PathBuf;
use thiserror::Error;

/// Failure to rebuild a file in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// A span lies outside the source or splits a UTF-8 character.
    #[error("span {start}..{end} cannot be read from a {len}-byte source")]
    BadSpan { start: usize, end: usize, len: usize },

    /// Non-whitespace text between declarations that no comment accounts for.
    #[error("unexpected text {text:?} between declarations at byte {offset}")]
    StrayBytes { offset: usize, text: String },

    /// The requested order does not list every declaration exactly once.
    #[error("canonical order is not a permutation of {expected} declarations")]
    NotAPermutation { expected: usize },
}

/// The top-level error type for declorder-edit operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// The file on disk no longer matches what was analyzed (exit code 2).
    #[error("precondition mismatch: {0}")]
    Precondition(#[from] PreconditionError),

    /// The rewrite itself failed (exit code 1).
    #[error("rewrite failed: {0}")]
    Rewrite(#[from] RewriteError),

    /// A runtime/tool error occurred (exit code 1).
    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

/// Write-back guards that did not hold.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("{path} no longer exists")]
    FileMissing { path: Utf8PathBuf },

    #[error("{path} changed on disk: expected sha256 {expected}, got {actual}")]
    Sha256Mismatch {
        path: Utf8PathBuf,
        expected: String,
        actual: String,
    },
}

impl EditError {
    /// Returns true if the file was left untouched because it changed underneath us.
    pub fn is_precondition(&self) -> bool {
        matches!(self, EditError::Precondition(_))
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            EditError::Precondition(_) => 2,
            EditError::Rewrite(_) | EditError::Runtime(_) => 1,
        }
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;
