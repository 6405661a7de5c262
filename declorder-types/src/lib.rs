//! Shared DTOs for the declorder workspace.
//!
//! # Design constraints
//! - Everything here is per-file data: built when a file is scanned and
//!   dropped once that file has been analyzed or fixed.
//! - Types that reach the JSON report are serializable; prefer adding optional
//!   fields over changing semantics.

pub mod decl;
pub mod diagnostic;
pub mod flags;
pub mod report;

pub use decl::{
    DeclId, DeclKind, Declaration, FuncDecl, OtherDecl, OtherKind, Receiver, Span, TypeDecl,
    TypeRef, TypeShape, TypeSpec, Visibility,
};
pub use diagnostic::{Diagnostic, RuleId, TextEdit};
pub use flags::CheckFlags;

/// Schema identifiers.
pub mod schema {
    pub const DECLORDER_REPORT_V1: &str = "declorder.report.v1";
}
