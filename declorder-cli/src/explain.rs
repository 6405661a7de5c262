//! Rule explanations for the `declorder explain` and `list-rules` commands.

use declorder_types::RuleId;

/// Documentation for one ordering rule.
#[derive(Debug, Clone)]
pub struct RuleExplanation {
    pub rule: RuleId,
    pub title: &'static str,
    /// The `[checks]` key (and CLI flag) that turns the rule on or off.
    pub toggle: &'static str,
    pub enabled_by_default: bool,
    pub description: &'static str,
    /// A Go snippet that triggers the rule.
    pub example: &'static str,
    /// The same snippet in fixed order.
    pub fixed: &'static str,
}

pub static RULE_REGISTRY: &[RuleExplanation] = &[
    RuleExplanation {
        rule: RuleId::ConstructorAfterType,
        title: "Constructor after its struct",
        toggle: "constructor (--no-constructor-check)",
        enabled_by_default: true,
        description: r#"A constructor is an exported top-level function named New... or Must...
whose first result is the struct or a pointer to it. It must appear after
the struct's type declaration so a reader meets the type before the code
that builds it.

Functions named exactly `New` or `Must` are not treated as constructors."#,
        example: r#"func NewServer() *Server { return &Server{} }

type Server struct{}"#,
        fixed: r#"type Server struct{}

func NewServer() *Server { return &Server{} }"#,
    },
    RuleExplanation {
        rule: RuleId::ConstructorBeforeMethod,
        title: "Constructor before the struct's methods",
        toggle: "constructor (--no-constructor-check)",
        enabled_by_default: true,
        description: r#"Every constructor must come before the first method of its struct in the
file, so construction reads before behavior."#,
        example: r#"type Server struct{}

func (s *Server) Start() {}

func NewServer() *Server { return &Server{} }"#,
        fixed: r#"type Server struct{}

func NewServer() *Server { return &Server{} }

func (s *Server) Start() {}"#,
    },
    RuleExplanation {
        rule: RuleId::ExportedBeforeUnexported,
        title: "Exported methods before unexported methods",
        toggle: "method_visibility (--no-method-visibility-check)",
        enabled_by_default: true,
        description: r#"Among a struct's methods, every unexported (lowercase) method must come
after the last exported one. The public surface of a type reads first."#,
        example: r#"func (s *Server) listen() {}

func (s *Server) Start() {}"#,
        fixed: r#"func (s *Server) Start() {}

func (s *Server) listen() {}"#,
    },
    RuleExplanation {
        rule: RuleId::ConstructorsAlphabetical,
        title: "Constructors in alphabetical order",
        toggle: "alphabetical (--alphabetical)",
        enabled_by_default: false,
        description: r#"A struct's constructors appear in ordinal (byte-wise) name order. Each
adjacent out-of-order pair is reported at the later constructor."#,
        example: r#"func NewServerTLS() *Server { return &Server{} }

func NewServer() *Server { return &Server{} }"#,
        fixed: r#"func NewServer() *Server { return &Server{} }

func NewServerTLS() *Server { return &Server{} }"#,
    },
    RuleExplanation {
        rule: RuleId::MethodsAlphabetical,
        title: "Methods in alphabetical order",
        toggle: "alphabetical (--alphabetical)",
        enabled_by_default: false,
        description: r#"Exported methods appear in ordinal name order, and so do unexported
methods. The two visibility groups are compared separately."#,
        example: r#"func (s *Server) Stop() {}

func (s *Server) Start() {}"#,
        fixed: r#"func (s *Server) Start() {}

func (s *Server) Stop() {}"#,
    },
];

/// Find a rule by id, ignoring case and accepting `_` for `-`.
pub fn lookup_rule(query: &str) -> Option<&'static RuleExplanation> {
    let normalized = query.trim().to_lowercase().replace('_', "-");
    let rule = RuleId::parse(&normalized)?;
    RULE_REGISTRY.iter().find(|r| r.rule == rule)
}

pub fn list_rule_ids() -> Vec<&'static str> {
    RULE_REGISTRY.iter().map(|r| r.rule.as_str()).collect()
}
