use crate::diagnostic::Diagnostic;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclorderReport {
    pub schema: String,
    pub tool: ToolInfo,

    #[serde(default)]
    pub files: Vec<FileReport>,

    pub summary: RunSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// A diagnostic with its 1-based line/column resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedDiagnostic {
    pub line: usize,
    pub column: usize,

    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: Utf8PathBuf,

    #[serde(default)]
    pub diagnostics: Vec<LocatedDiagnostic>,

    /// True when the file was rewritten on disk.
    #[serde(default)]
    pub fixed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Unified diff of the planned rewrite, when one was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub files: u64,
    pub diagnostics: u64,
    pub fixed: u64,
    pub errors: u64,
}
