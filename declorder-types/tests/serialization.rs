use declorder_types::report::{
    DeclorderReport, FileReport, LocatedDiagnostic, RunSummary, ToolInfo,
};
use declorder_types::{CheckFlags, Diagnostic, RuleId, Span, TextEdit, schema};
use pretty_assertions::assert_eq;

fn diagnostic(edits: Vec<TextEdit>) -> Diagnostic {
    Diagnostic {
        pos: 14,
        message: r#"constructor "NewMyStruct" for struct "MyStruct" should be placed after the struct declaration"#
            .to_string(),
        rule: RuleId::ConstructorAfterType,
        type_name: "MyStruct".to_string(),
        subject: "NewMyStruct".to_string(),
        edits,
    }
}

#[test]
fn diagnostic_omits_empty_edits() {
    let value = serde_json::to_value(diagnostic(Vec::new())).expect("serialize");
    assert!(value.get("edits").is_none());
    assert_eq!(value["rule"], serde_json::json!("constructor-after-type"));
}

#[test]
fn located_diagnostic_flattens_fields() {
    let located = LocatedDiagnostic {
        line: 3,
        column: 1,
        diagnostic: diagnostic(vec![TextEdit {
            span: Span::new(14, 80),
            replacement: "type MyStruct struct{}\n".to_string(),
        }]),
    };
    let value = serde_json::to_value(&located).expect("serialize");
    assert_eq!(value["line"], serde_json::json!(3));
    assert_eq!(value["subject"], serde_json::json!("NewMyStruct"));
    assert_eq!(value["edits"][0]["span"]["start"], serde_json::json!(14));

    let back: LocatedDiagnostic = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, located);
}

#[test]
fn report_omits_missing_file_error() {
    let report = DeclorderReport {
        schema: schema::DECLORDER_REPORT_V1.to_string(),
        tool: ToolInfo {
            name: "declorder".to_string(),
            version: "0.1.0".to_string(),
        },
        files: vec![FileReport {
            path: "pkg/a.go".into(),
            diagnostics: Vec::new(),
            fixed: false,
            error: None,
            patch: None,
        }],
        summary: RunSummary {
            files: 1,
            ..RunSummary::default()
        },
    };
    let value = serde_json::to_value(&report).expect("serialize");
    assert_eq!(value["schema"], serde_json::json!("declorder.report.v1"));
    assert!(value["files"][0].get("error").is_none());
    assert!(value["files"][0].get("patch").is_none());
    assert_eq!(value["summary"]["files"], serde_json::json!(1));
}

#[test]
fn check_flags_fill_missing_fields_with_defaults() {
    let flags: CheckFlags =
        serde_json::from_str(r#"{"alphabetical_check": true}"#).expect("deserialize");
    assert_eq!(
        flags,
        CheckFlags {
            constructor_check: true,
            method_visibility_check: true,
            alphabetical_check: true,
        }
    );
}
