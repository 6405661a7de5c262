//! Clap-free settings for the check/fix pipeline.

use declorder_types::CheckFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub checks: CheckFlags,
    /// Rewrite files into canonical order.
    pub fix: bool,
    /// Render a unified diff of each planned rewrite.
    pub diff: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            checks: CheckFlags::default(),
            fix: false,
            diff: false,
        }
    }
}
