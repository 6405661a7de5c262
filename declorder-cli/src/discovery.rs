//! Go source file discovery.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory names the Go toolchain never builds from.
const SKIPPED_DIRS: &[&str] = &["vendor", "testdata"];

/// Compiled `--exclude` / `[files].exclude` patterns.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    pub fn new(patterns: &[String]) -> anyhow::Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("invalid exclude pattern '{p}'")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// True when `path` (relative, `./` stripped) matches any pattern.
    pub fn is_excluded(&self, path: &Utf8Path) -> bool {
        let normalized = normalize(path);
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.patterns
            .iter()
            .any(|p| p.matches_with(normalized, options))
    }
}

fn normalize(path: &Utf8Path) -> &str {
    let mut s = path.as_str();
    while let Some(rest) = s.strip_prefix("./") {
        s = rest;
    }
    s
}

/// Collect the Go files named by `roots`, sorted and de-duplicated.
///
/// Directories are walked recursively; hidden directories, `vendor` and
/// `testdata` are skipped. Files named explicitly are taken as given.
pub fn discover_go_files(
    roots: &[Utf8PathBuf],
    excludes: &ExcludeSet,
) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            if !excludes.is_excluded(root) {
                files.push(root.clone());
            }
            continue;
        }
        if !root.is_dir() {
            anyhow::bail!("path not found: {}", root);
        }

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));
        for entry in walker {
            let entry = entry.with_context(|| format!("walk {}", root))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
                warn!("skipping non UTF-8 path under {}", root);
                continue;
            };
            if path.extension() != Some("go") || excludes.is_excluded(&path) {
                continue;
            }
            files.push(path);
        }
    }
    files.sort();
    files.dedup();
    debug!(count = files.len(), "discovered go files");
    Ok(files)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}
