//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;

/// Source of file contents.
pub trait SourcePort: Send + Sync {
    fn read_source(&self, path: &Utf8Path) -> anyhow::Result<String>;
}

/// File-system write operations.
pub trait WritePort: Send + Sync {
    /// Replace `path` with `contents`, provided its current bytes still hash
    /// to `expected_sha256`.
    fn write_file(&self, path: &Utf8Path, expected_sha256: &str, contents: &str) -> anyhow::Result<()>;
}
