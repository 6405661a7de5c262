//! Rendering of `check` results.

use anyhow::Context;
use declorder_core::RunOutcome;
use declorder_types::report::DeclorderReport;
use std::io::Write;

/// One line per remaining diagnostic, fix and error, then a summary line.
/// Patches follow their file's diagnostics.
pub fn write_text(out: &mut dyn Write, outcome: &RunOutcome) -> anyhow::Result<()> {
    for file in &outcome.files {
        if file.fixed {
            writeln!(out, "{}: fixed declaration order", file.path)?;
        } else {
            for d in &file.diagnostics {
                writeln!(
                    out,
                    "{}:{}:{}: {} [{}]",
                    file.path, d.line, d.column, d.diagnostic.message, d.diagnostic.rule
                )?;
            }
        }
        if let Some(error) = &file.error {
            writeln!(out, "{}: error: {}", file.path, error)?;
        }
        if let Some(patch) = file.patch.as_deref().filter(|p| !p.is_empty()) {
            out.write_all(patch.as_bytes())?;
        }
    }

    let s = &outcome.summary;
    writeln!(
        out,
        "{} {} checked, {} {}, {} fixed, {} {}",
        s.files,
        plural(s.files, "file", "files"),
        outcome.remaining(),
        plural(outcome.remaining() as u64, "diagnostic", "diagnostics"),
        s.fixed,
        s.errors,
        plural(s.errors, "error", "errors"),
    )?;
    Ok(())
}

pub fn write_json(out: &mut dyn Write, report: &DeclorderReport) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(report).context("serialize json")?;
    writeln!(out, "{s}")?;
    Ok(())
}

fn plural(n: u64, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use declorder_core::{FileOutcome, Settings, run_source};
    use declorder_types::report::RunSummary;
    use pretty_assertions::assert_eq;

    const UNORDERED: &str = "package p\n\nfunc NewT() *T { return nil }\n\ntype T struct{}\n";

    fn outcome(files: Vec<FileOutcome>) -> RunOutcome {
        let mut summary = RunSummary::default();
        for f in &files {
            summary.files += 1;
            summary.diagnostics += f.diagnostics.len() as u64;
            summary.fixed += u64::from(f.fixed);
            summary.errors += u64::from(f.error.is_some());
        }
        RunOutcome { files, summary }
    }

    fn render(outcome: &RunOutcome) -> String {
        let mut buf = Vec::new();
        write_text(&mut buf, outcome).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_lists_diagnostics_then_summary() {
        let file = run_source(Utf8Path::new("a.go"), UNORDERED, &Settings::default()).unwrap();
        let text = render(&outcome(vec![file]));
        assert_eq!(
            text,
            "a.go:3:1: constructor \"NewT\" for struct \"T\" should be placed after the struct declaration [constructor-after-type]\n\
             1 file checked, 1 diagnostic, 0 fixed, 0 errors\n"
        );
    }

    #[test]
    fn fixed_files_are_reported_once() {
        let mut file = run_source(Utf8Path::new("a.go"), UNORDERED, &Settings::default()).unwrap();
        file.fixed = true;
        let text = render(&outcome(vec![file]));
        assert!(text.starts_with("a.go: fixed declaration order\n"));
        assert!(text.ends_with("1 file checked, 0 diagnostics, 1 fixed, 0 errors\n"));
    }

    #[test]
    fn errors_and_patches_are_printed() {
        let settings = Settings {
            diff: true,
            ..Settings::default()
        };
        let mut file = run_source(Utf8Path::new("a.go"), UNORDERED, &settings).unwrap();
        file.error = Some("boom".into());
        let text = render(&outcome(vec![file]));
        assert!(text.contains("a.go: error: boom\n"));
        assert!(text.contains("diff --git a/a.go b/a.go\n"));
        assert!(text.contains("+++ b/a.go\n@@ "));
    }
}
