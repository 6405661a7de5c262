//! Core check and fix pipelines, extracted from the CLI.
//!
//! These entry points are I/O-agnostic: all filesystem operations are
//! performed through the port traits.

use crate::lines::LineIndex;
use crate::ports::{SourcePort, WritePort};
use crate::settings::Settings;
use camino::{Utf8Path, Utf8PathBuf};
use declorder_domain::{analyze_file, classify, needs_rewrite, original_order, plan};
use declorder_edit::{FileLayout, SourceText, render_patch, rewrite, sha256_hex, suggested_edit};
use declorder_scan::{ScanError, scan_go};
use declorder_types::report::{DeclorderReport, FileReport, LocatedDiagnostic, RunSummary, ToolInfo};
use declorder_types::schema::DECLORDER_REPORT_V1;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Error type for pipeline results. Every variant maps to exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{path}: {source}")]
    Scan {
        path: Utf8PathBuf,
        #[source]
        source: ScanError,
    },
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Result of checking one file.
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    pub path: Utf8PathBuf,
    pub diagnostics: Vec<LocatedDiagnostic>,
    /// Canonical text, when it differs from the input.
    pub rewritten: Option<String>,
    /// Unified diff of the rewrite, when requested.
    pub patch: Option<String>,
    /// True when `rewritten` was written back.
    pub fixed: bool,
    pub error: Option<String>,
}

impl FileOutcome {
    fn failed(path: &Utf8Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            error: Some(message),
            ..Self::default()
        }
    }

    /// Diagnostics that still describe the file on disk.
    pub fn remaining(&self) -> usize {
        if self.fixed { 0 } else { self.diagnostics.len() }
    }
}

/// Outcome of `run_files`.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Sorted by path.
    pub files: Vec<FileOutcome>,
    pub summary: RunSummary,
}

impl RunOutcome {
    /// Diagnostics left unresolved across all files.
    pub fn remaining(&self) -> usize {
        self.files.iter().map(FileOutcome::remaining).sum()
    }
}

/// Check one file's text. Never touches the filesystem.
///
/// A file that cannot be rewritten still reports its diagnostics; the
/// rewrite failure lands in `error`.
pub fn run_source(path: &Utf8Path, text: &str, settings: &Settings) -> Result<FileOutcome, ToolError> {
    let file = scan_go(text).map_err(|source| ToolError::Scan {
        path: path.to_path_buf(),
        source,
    })?;
    let decls = &file.declarations;

    let classification = classify(decls);
    let mut diagnostics = analyze_file(&classification, decls, settings.checks);
    let order = plan(decls, &classification, settings.checks);

    let mut outcome = FileOutcome {
        path: path.to_path_buf(),
        ..FileOutcome::default()
    };

    if needs_rewrite(&original_order(decls), &order) {
        let layout = FileLayout {
            header_end: file.header_end,
            decls,
            standalone_comments: &file.standalone_comments,
        };
        match rewrite(&SourceText::new(text), &layout, &order) {
            Ok(fixed) => {
                if let (Some(first), Some(edit)) =
                    (diagnostics.first_mut(), suggested_edit(text, &fixed))
                {
                    first.edits.push(edit);
                }
                if settings.diff {
                    outcome.patch = Some(render_patch(path, text, &fixed));
                }
                outcome.rewritten = Some(fixed);
            }
            Err(err) => {
                warn!(%path, error = %err, "fix skipped");
                outcome.error = Some(format!("fix skipped: {err}"));
            }
        }
    }

    let lines = LineIndex::new(text);
    outcome.diagnostics = diagnostics
        .into_iter()
        .map(|diagnostic| {
            let (line, column) = lines.locate(diagnostic.pos);
            LocatedDiagnostic {
                line,
                column,
                diagnostic,
            }
        })
        .collect();

    debug!(
        %path,
        diagnostics = outcome.diagnostics.len(),
        rewrite = outcome.rewritten.is_some(),
        "checked file"
    );
    Ok(outcome)
}

/// Check (and with `settings.fix`, rewrite) every file in `paths`.
///
/// Files are processed in parallel and reported sorted by path. A failure in
/// one file never stops the others.
pub fn run_files(
    paths: &[Utf8PathBuf],
    settings: &Settings,
    source: &dyn SourcePort,
    writer: &dyn WritePort,
) -> RunOutcome {
    let mut files: Vec<FileOutcome> = paths
        .par_iter()
        .map(|path| process_file(path, settings, source, writer))
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let mut summary = RunSummary::default();
    for file in &files {
        summary.files += 1;
        summary.diagnostics += file.diagnostics.len() as u64;
        summary.fixed += u64::from(file.fixed);
        summary.errors += u64::from(file.error.is_some());
    }
    info!(
        files = summary.files,
        diagnostics = summary.diagnostics,
        fixed = summary.fixed,
        errors = summary.errors,
        "run complete"
    );

    RunOutcome { files, summary }
}

fn process_file(
    path: &Utf8Path,
    settings: &Settings,
    source: &dyn SourcePort,
    writer: &dyn WritePort,
) -> FileOutcome {
    let text = match source.read_source(path) {
        Ok(text) => text,
        Err(err) => return FileOutcome::failed(path, format!("{err:#}")),
    };

    let mut outcome = match run_source(path, &text, settings) {
        Ok(outcome) => outcome,
        Err(err) => return FileOutcome::failed(path, err.to_string()),
    };

    if settings.fix
        && let Some(fixed) = &outcome.rewritten
    {
        match writer.write_file(path, &sha256_hex(text.as_bytes()), fixed) {
            Ok(()) => {
                info!(%path, "fixed declaration order");
                outcome.fixed = true;
            }
            Err(err) => {
                let message = format!("{err:#}");
                warn!(%path, error = %message, "write-back failed");
                outcome.error = Some(message);
            }
        }
    }
    outcome
}

/// Serializable report for a finished run.
pub fn build_report(outcome: &RunOutcome, tool: ToolInfo) -> DeclorderReport {
    DeclorderReport {
        schema: DECLORDER_REPORT_V1.to_string(),
        tool,
        files: outcome
            .files
            .iter()
            .map(|f| FileReport {
                path: f.path.clone(),
                diagnostics: f.diagnostics.clone(),
                fixed: f.fixed,
                error: f.error.clone(),
                patch: f.patch.clone(),
            })
            .collect(),
        summary: outcome.summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryFiles;
    use declorder_types::RuleId;
    use pretty_assertions::assert_eq;

    const UNORDERED: &str = "package p\n\nfunc NewT() *T { return nil }\n\ntype T struct{}\n";
    const ORDERED: &str = "package p\n\ntype T struct{}\n\nfunc NewT() *T { return nil }\n";

    #[test]
    fn run_source_locates_diagnostics_and_suggests_one_edit() {
        let outcome = run_source(Utf8Path::new("a.go"), UNORDERED, &Settings::default()).unwrap();
        assert_eq!(outcome.diagnostics.len(), 1);
        let d = &outcome.diagnostics[0];
        assert_eq!((d.line, d.column), (3, 1));
        assert_eq!(d.diagnostic.rule, RuleId::ConstructorAfterType);
        assert_eq!(d.diagnostic.edits.len(), 1);
        assert_eq!(outcome.rewritten.as_deref(), Some(ORDERED));
        assert!(outcome.patch.is_none());
    }

    #[test]
    fn constructor_terminated_by_semicolon_is_still_detected() {
        let src = "package p\n\nfunc NewT() *T { return nil }; type T struct{}\n";
        let outcome = run_source(Utf8Path::new("a.go"), src, &Settings::default()).unwrap();
        let found: Vec<_> = outcome
            .diagnostics
            .iter()
            .map(|d| (d.line, d.column, d.diagnostic.rule))
            .collect();
        assert_eq!(found, vec![(3, 1, RuleId::ConstructorAfterType)]);
    }

    #[test]
    fn run_source_on_canonical_file_is_quiet() {
        let outcome = run_source(Utf8Path::new("a.go"), ORDERED, &Settings::default()).unwrap();
        assert!(outcome.diagnostics.is_empty());
        assert!(outcome.rewritten.is_none());
    }

    #[test]
    fn diff_setting_renders_patch() {
        let settings = Settings {
            diff: true,
            ..Settings::default()
        };
        let outcome = run_source(Utf8Path::new("a.go"), UNORDERED, &settings).unwrap();
        let patch = outcome.patch.expect("patch");
        assert!(patch.starts_with("diff --git a/a.go b/a.go"));
    }

    #[test]
    fn scan_errors_name_the_file() {
        let err = run_source(Utf8Path::new("bad.go"), "func f() {", &Settings::default()).unwrap_err();
        assert!(err.to_string().starts_with("bad.go: "));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn run_files_fixes_through_the_write_port() {
        let files = InMemoryFiles::new([
            ("b.go", UNORDERED),
            ("a.go", ORDERED),
            ("c.go", "not go"),
        ]);
        let paths: Vec<Utf8PathBuf> = ["c.go", "b.go", "a.go", "missing.go"]
            .into_iter()
            .map(Utf8PathBuf::from)
            .collect();
        let settings = Settings {
            fix: true,
            ..Settings::default()
        };

        let outcome = run_files(&paths, &settings, &files, &files);
        let order: Vec<&str> = outcome.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(order, vec!["a.go", "b.go", "c.go", "missing.go"]);
        assert_eq!(
            outcome.summary,
            RunSummary {
                files: 4,
                diagnostics: 1,
                fixed: 1,
                errors: 2,
            }
        );
        assert_eq!(outcome.remaining(), 0);
        assert_eq!(files.get(Utf8Path::new("b.go")).as_deref(), Some(ORDERED));
    }

    #[test]
    fn check_only_leaves_files_alone() {
        let files = InMemoryFiles::new([("b.go", UNORDERED)]);
        let paths = vec![Utf8PathBuf::from("b.go")];
        let outcome = run_files(&paths, &Settings::default(), &files, &files);
        assert_eq!(outcome.remaining(), 1);
        assert!(!outcome.files[0].fixed);
        assert_eq!(files.get(Utf8Path::new("b.go")).as_deref(), Some(UNORDERED));
    }

    #[test]
    fn report_carries_schema_and_summary() {
        let files = InMemoryFiles::new([("b.go", UNORDERED)]);
        let outcome = run_files(&[Utf8PathBuf::from("b.go")], &Settings::default(), &files, &files);
        let report = build_report(
            &outcome,
            ToolInfo {
                name: "declorder".into(),
                version: "0.0.0".into(),
            },
        );
        assert_eq!(report.schema, DECLORDER_REPORT_V1);
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.summary.diagnostics, 1);
    }
}
