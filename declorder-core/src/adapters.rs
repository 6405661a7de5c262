//! Default filesystem-backed port implementations.

use crate::ports::{SourcePort, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use declorder_edit::{sha256_hex, write_guarded};
use fs_err as fs;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Reads files from disk.
#[derive(Debug, Clone, Default)]
pub struct FsSourcePort;

impl SourcePort for FsSourcePort {
    fn read_source(&self, path: &Utf8Path) -> anyhow::Result<String> {
        fs::read_to_string(path).with_context(|| format!("read {}", path))
    }
}

/// Writes files to disk after re-checking their hash.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, expected_sha256: &str, contents: &str) -> anyhow::Result<()> {
        write_guarded(path, expected_sha256, contents).map_err(anyhow::Error::from)
    }
}

/// In-memory file set for embedding and testing.
///
/// Doubles as a [`WritePort`]: writes replace the stored text under the same
/// hash guard the filesystem adapter applies.
#[derive(Debug, Default)]
pub struct InMemoryFiles {
    files: Mutex<BTreeMap<Utf8PathBuf, String>>,
}

impl InMemoryFiles {
    pub fn new<I, P, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<Utf8PathBuf>,
        S: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(p, s)| (p.into(), s.into()))
            .collect();
        Self {
            files: Mutex::new(files),
        }
    }

    /// Current text of `path`, if present.
    pub fn get(&self, path: &Utf8Path) -> Option<String> {
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(path).cloned())
    }
}

impl SourcePort for InMemoryFiles {
    fn read_source(&self, path: &Utf8Path) -> anyhow::Result<String> {
        self.get(path)
            .with_context(|| format!("no in-memory file {}", path))
    }
}

impl WritePort for InMemoryFiles {
    fn write_file(&self, path: &Utf8Path, expected_sha256: &str, contents: &str) -> anyhow::Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| anyhow::anyhow!("in-memory file set is poisoned"))?;
        let current = files
            .get_mut(path)
            .with_context(|| format!("no in-memory file {}", path))?;
        let actual = sha256_hex(current.as_bytes());
        if actual != expected_sha256 {
            anyhow::bail!("{path} changed: expected sha256 {expected_sha256}, got {actual}");
        }
        *current = contents.to_string();
        Ok(())
    }
}
