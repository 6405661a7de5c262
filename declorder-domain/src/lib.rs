//! Ordering rules for declorder.
//!
//! This crate owns *what* is out of order and *what* the canonical order is.
//! It never touches source bytes: it works on the declaration list produced by
//! a host scanner. Byte-level rewriting lives in `declorder-edit`.

pub mod analyzer;
pub mod classifier;
pub mod planner;

pub use analyzer::{analyze, analyze_file};
pub use classifier::{Classification, TypeGroup, classify};
pub use planner::{needs_rewrite, original_order, plan};
