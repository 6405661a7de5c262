//! Top-level declaration scanner for Go source files.
//!
//! This is the host side of declorder: it turns file bytes into the
//! declaration list, doc-comment bindings and standalone comment spans that
//! the ordering core consumes. It understands only as much Go as needed to
//! find where each top-level declaration starts and ends:
//! - comments, string, raw string and rune literals;
//! - bracket nesting and Go's newline semicolon rule;
//! - receiver and result type shapes of `func` declarations.

mod decls;
mod error;
mod lexer;

pub use decls::{ScannedFile, scan_go};
pub use error::ScanError;
