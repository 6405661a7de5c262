//! Edit engine for declorder.
//!
//! Responsibilities:
//! - Rebuild a file in canonical declaration order without losing comments.
//! - Express a rewrite as a single suggested text edit.
//! - Generate a unified diff preview.
//! - Write a fixed file back, guarded by the sha256 of what was analyzed.

pub mod error;
pub mod rewrite;
pub mod source;

pub use error::{EditError, EditResult, PreconditionError, RewriteError};
pub use rewrite::{Attributed, FileLayout, attribute_comments, promote_leading, rewrite};
pub use source::{SourceText, SpanReader};

use anyhow::Context;
use camino::Utf8Path;
use declorder_types::{Span, TextEdit};
use diffy::PatchFormatter;
use fs_err as fs;
use sha2::{Digest, Sha256};
use tracing::debug;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Smallest single edit turning `before` into `after`, or `None` when equal.
pub fn suggested_edit(before: &str, after: &str) -> Option<TextEdit> {
    if before == after {
        return None;
    }

    let mut prefix = before
        .bytes()
        .zip(after.bytes())
        .take_while(|(a, b)| a == b)
        .count();
    while !before.is_char_boundary(prefix) || !after.is_char_boundary(prefix) {
        prefix -= 1;
    }

    let max_suffix = before.len().min(after.len()) - prefix;
    let mut suffix = before
        .bytes()
        .rev()
        .zip(after.bytes().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    while !before.is_char_boundary(before.len() - suffix)
        || !after.is_char_boundary(after.len() - suffix)
    {
        suffix -= 1;
    }

    Some(TextEdit {
        span: Span::new(prefix, before.len() - suffix),
        replacement: after[prefix..after.len() - suffix].to_string(),
    })
}

/// Apply non-overlapping edits to `text`.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> anyhow::Result<String> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| e.span.start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for edit in sorted {
        let kept = text
            .get(cursor..edit.span.start)
            .with_context(|| format!("edit at {}..{} overlaps or is out of range", edit.span.start, edit.span.end))?;
        out.push_str(kept);
        out.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    let rest = text
        .get(cursor..)
        .with_context(|| format!("edit end {cursor} is out of range"))?;
    out.push_str(rest);
    Ok(out)
}

/// Unified diff of one file, with git-style headers. Empty when unchanged.
pub fn render_patch(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(before, after);
    let formatter = PatchFormatter::new();
    let body = formatter.fmt_patch(&patch).to_string();
    // diffy repeats its own `---`/`+++` lines; keep only the hunks.
    let hunks = body.find("@@").map_or(body.as_str(), |idx| &body[idx..]);
    out.push_str(hunks);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Overwrite `path` with `contents` if it still hashes to `expected_sha256`.
pub fn write_guarded(path: &Utf8Path, expected_sha256: &str, contents: &str) -> EditResult<()> {
    if !path.exists() {
        return Err(PreconditionError::FileMissing {
            path: path.to_path_buf(),
        }
        .into());
    }
    let current = fs::read(path).with_context(|| format!("read {}", path))?;
    let actual = sha256_hex(&current);
    if actual != expected_sha256 {
        return Err(PreconditionError::Sha256Mismatch {
            path: path.to_path_buf(),
            expected: expected_sha256.to_string(),
            actual,
        }
        .into());
    }
    fs::write(path, contents).with_context(|| format!("write {}", path))?;
    debug!(%path, bytes = contents.len(), "wrote fixed file");
    Ok(())
}
