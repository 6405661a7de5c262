use crate::decl::Span;
use serde::{Deserialize, Serialize};

/// Stable identifier of the ordering rule that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    ConstructorAfterType,
    ConstructorBeforeMethod,
    ExportedBeforeUnexported,
    ConstructorsAlphabetical,
    MethodsAlphabetical,
}

impl RuleId {
    pub const ALL: [RuleId; 5] = [
        RuleId::ConstructorAfterType,
        RuleId::ConstructorBeforeMethod,
        RuleId::ExportedBeforeUnexported,
        RuleId::ConstructorsAlphabetical,
        RuleId::MethodsAlphabetical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::ConstructorAfterType => "constructor-after-type",
            RuleId::ConstructorBeforeMethod => "constructor-before-method",
            RuleId::ExportedBeforeUnexported => "exported-before-unexported",
            RuleId::ConstructorsAlphabetical => "constructors-alphabetical",
            RuleId::MethodsAlphabetical => "methods-alphabetical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        RuleId::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replace the bytes of `span` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Byte offset the diagnostic is anchored at.
    pub pos: usize,
    pub message: String,
    pub rule: RuleId,
    /// Struct whose group produced the diagnostic.
    pub type_name: String,
    /// Declaration the diagnostic is anchored at.
    pub subject: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<TextEdit>,
}
