//! Property-based tests for the Go declaration scanner.
//!
//! These tests verify that:
//! - Arbitrary input never panics the scanner
//! - Declaration spans are ordered, disjoint and inside the file
//! - Every comment the scanner reports lies outside all declarations

use declorder_scan::scan_go;
use proptest::prelude::*;

/// Fragments that combine into plausible (and implausible) Go files.
fn arb_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("type T struct {\n\tName string\n}\n".to_string()),
        Just("func NewT() *T { return &T{} }\n".to_string()),
        Just("func (t *T) Get() string {\n\treturn t.Name // inline\n}\n".to_string()),
        Just("func (t T) set(v string) {}\n".to_string()),
        Just("// standalone\n\n".to_string()),
        Just("// Doc comment.\n".to_string()),
        Just("/* block\n comment */\n".to_string()),
        Just("const (\n\tA = iota\n\tB\n)\n".to_string()),
        Just("var s = `raw // not a comment`\n".to_string()),
        Just("\n".to_string()),
        "[ -~\n]{0,12}",
    ]
}

fn arb_file() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_fragment(), 0..10)
        .prop_map(|parts| format!("package p\n\n{}", parts.concat()))
}

proptest! {
    #[test]
    fn scanning_never_panics(src in arb_file()) {
        let _ = scan_go(&src);
    }

    #[test]
    fn declaration_spans_are_ordered_and_disjoint(src in arb_file()) {
        if let Ok(file) = scan_go(&src) {
            let mut cursor = file.header_end;
            for decl in &file.declarations {
                let full = decl.full_span();
                prop_assert!(full.start >= cursor, "overlap at {:?}", decl.span);
                prop_assert!(decl.span.end <= src.len());
                if let Some(doc) = decl.doc {
                    prop_assert!(doc.end <= decl.span.start);
                }
                cursor = decl.span.end;
            }
        }
    }

    #[test]
    fn standalone_comments_sit_between_declarations(src in arb_file()) {
        if let Ok(file) = scan_go(&src) {
            for comment in &file.standalone_comments {
                prop_assert!(comment.start >= file.header_end);
                prop_assert!(src[comment.start..comment.end].starts_with("//")
                    || src[comment.start..comment.end].starts_with("/*"));
                for decl in &file.declarations {
                    let full = decl.full_span();
                    prop_assert!(comment.end <= full.start || comment.start >= full.end);
                }
            }
        }
    }
}
