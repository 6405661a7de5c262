//! Embeddable core library for declorder.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into an editor integration or other host process.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`SourcePort`](ports::SourcePort): read Go source files
//! - [`WritePort`](ports::WritePort): overwrite a file that has not changed since it was read
//!
//! The [`adapters`] module provides default filesystem-backed implementations
//! and in-memory ones for embedding and tests.
//!
//! # Entry points
//!
//! - [`run_source`](pipeline::run_source): check (and plan a fix for) one file's text
//! - [`run_files`](pipeline::run_files): check or fix many files in parallel

pub mod adapters;
pub mod lines;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use lines::LineIndex;
pub use pipeline::{FileOutcome, RunOutcome, ToolError, build_report, run_files, run_source};
pub use settings::Settings;
