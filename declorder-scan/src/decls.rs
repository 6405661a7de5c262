//! Splits a lexed Go file into its header and top-level declarations.

use crate::error::ScanError;
use crate::lexer::{Lexed, Token, TokenKind, is_keyword, lex};
use declorder_types::{
    DeclId, DeclKind, Declaration, FuncDecl, OtherDecl, OtherKind, Receiver, Span, TypeDecl,
    TypeRef, TypeShape, TypeSpec,
};
use std::ops::Range;
use tracing::debug;

/// Everything the ordering core needs to know about one Go file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// End of the package clause and imports, including their trailing
    /// same-line comments. Bytes before this offset are never reordered.
    pub header_end: usize,
    pub declarations: Vec<Declaration>,
    /// Comment groups after the header that are neither a doc comment nor
    /// inside a declaration.
    pub standalone_comments: Vec<Span>,
}

/// Scan `src` into its top-level declarations.
pub fn scan_go(src: &str) -> Result<ScannedFile, ScanError> {
    let lexed = lex(src)?;
    let scanner = Scanner { src, lexed: &lexed };
    let file = scanner.scan()?;
    debug!(
        declarations = file.declarations.len(),
        standalone_comments = file.standalone_comments.len(),
        header_end = file.header_end,
        "scanned go source"
    );
    Ok(file)
}

struct Scanner<'a> {
    src: &'a str,
    lexed: &'a Lexed,
}

/// A declaration before comment attribution.
struct RawDecl {
    span: Span,
    kind: DeclKind,
}

impl<'a> Scanner<'a> {
    fn tokens(&self) -> &'a [Token] {
        &self.lexed.tokens
    }

    fn tok(&self, idx: usize) -> Token {
        self.lexed.tokens[idx]
    }

    fn text(&self, idx: usize) -> &'a str {
        self.lexed.tokens[idx].text(self.src)
    }

    fn partner(&self, idx: usize) -> Option<usize> {
        self.lexed.partner.get(idx).copied().flatten()
    }

    fn scan(&self) -> Result<ScannedFile, ScanError> {
        let count = self.tokens().len();
        if count < 2 || self.text(0) != "package" || self.tok(1).kind != TokenKind::Ident {
            return Err(ScanError::MissingPackage);
        }

        let pkg_end = self.statement_end(0, count);
        let mut header_end = self.absorb_trailing_comments(self.tok(pkg_end).span.end);
        let mut raw: Vec<RawDecl> = Vec::new();

        let mut i = pkg_end + 1;
        while i < count {
            let start = self.tok(i).span.start;
            let end_idx = self.statement_end(i, count);
            let end = self.absorb_trailing_comments(self.tok(end_idx).span.end);
            let span = Span::new(start, end);

            match self.text(i) {
                "import" => {
                    if !raw.is_empty() {
                        return Err(ScanError::MisplacedImport { offset: start });
                    }
                    header_end = end;
                }
                "type" => raw.push(RawDecl {
                    span,
                    kind: DeclKind::Type(self.type_decl(i, end_idx)?),
                }),
                "func" => raw.push(RawDecl {
                    span,
                    kind: DeclKind::Func(self.func_decl(i, end_idx)?),
                }),
                "const" => raw.push(RawDecl {
                    span,
                    kind: DeclKind::Other(self.other_decl(i, end_idx, OtherKind::Const)),
                }),
                "var" => raw.push(RawDecl {
                    span,
                    kind: DeclKind::Other(self.other_decl(i, end_idx, OtherKind::Var)),
                }),
                other => {
                    return Err(ScanError::UnexpectedToken {
                        text: other.to_string(),
                        offset: start,
                    });
                }
            }
            i = end_idx + 1;
        }

        Ok(self.attach_comments(header_end, raw))
    }

    /// Index of the last token of the statement starting at `from`, looking no
    /// further than `limit` (exclusive). Follows Go's semicolon insertion.
    fn statement_end(&self, from: usize, limit: usize) -> usize {
        let mut j = from;
        loop {
            let tok = self.tok(j);
            // Balanced groups are skipped whole; their newlines never end a statement.
            if matches!(tok.kind, TokenKind::Punct(b'(' | b'[' | b'{'))
                && let Some(close) = self.partner(j)
                && close < limit
            {
                j = close;
                continue;
            }
            if tok.is_punct(b';') || j + 1 >= limit {
                return j;
            }
            let next = self.tok(j + 1);
            if self.ends_statement(j) && self.src[tok.span.end..next.span.start].contains('\n') {
                return j;
            }
            j += 1;
        }
    }

    fn ends_statement(&self, idx: usize) -> bool {
        let tok = self.tok(idx);
        match tok.kind {
            TokenKind::Ident => {
                let word = self.text(idx);
                !is_keyword(word) || matches!(word, "break" | "continue" | "fallthrough" | "return")
            }
            TokenKind::Literal | TokenKind::IncDec => true,
            TokenKind::Punct(b) => matches!(b, b')' | b']' | b'}'),
            TokenKind::Other => false,
        }
    }

    /// Extends `end` over comments that start on the same line.
    fn absorb_trailing_comments(&self, mut end: usize) -> usize {
        let comments = &self.lexed.comments;
        let mut idx = comments.partition_point(|c| c.start < end);
        while let Some(c) = comments.get(idx) {
            let gap = &self.src[end..c.start];
            if gap.contains('\n') || !gap.trim().is_empty() {
                break;
            }
            end = c.end;
            idx += 1;
        }
        end
    }

    fn type_decl(&self, kw: usize, end_idx: usize) -> Result<TypeDecl, ScanError> {
        let malformed = ScanError::Malformed {
            keyword: "type",
            offset: self.tok(kw).span.start,
        };
        if kw + 1 > end_idx {
            return Err(malformed);
        }

        let mut specs = Vec::new();
        if self.tok(kw + 1).is_punct(b'(') {
            let close = self.partner(kw + 1).ok_or(malformed.clone())?;
            let mut j = kw + 2;
            while j < close {
                let e = self.statement_end(j, close);
                let mut stmt = j..e + 1;
                if self.tok(e).is_punct(b';') {
                    stmt.end -= 1;
                }
                if !stmt.is_empty() {
                    specs.push(self.type_spec(stmt).ok_or(malformed.clone())?);
                }
                j = e + 1;
            }
        } else {
            specs.push(self.type_spec(kw + 1..end_idx + 1).ok_or(malformed)?);
        }
        Ok(TypeDecl { specs })
    }

    fn type_spec(&self, range: Range<usize>) -> Option<TypeSpec> {
        let name_idx = range.start;
        if self.tok(name_idx).kind != TokenKind::Ident {
            return None;
        }
        let mut k = name_idx + 1;
        if k < range.end && self.tok(k).is_punct(b'[') && self.is_type_param_list(k) {
            k = self.partner(k)? + 1;
        }
        let shape = if k >= range.end {
            TypeShape::Other
        } else if self.tok(k).is_punct(b'=') {
            TypeShape::Alias
        } else {
            match self.text(k) {
                "struct" => TypeShape::Struct,
                "interface" => TypeShape::Interface,
                _ => TypeShape::Other,
            }
        };
        Some(TypeSpec {
            name: self.text(name_idx).to_string(),
            pos: self.tok(name_idx).span.start,
            shape,
        })
    }

    /// `[T any]` declares type parameters; `[4]` or `[N]` is an array length.
    fn is_type_param_list(&self, open: usize) -> bool {
        let Some(close) = self.partner(open) else {
            return false;
        };
        if close < open + 3 || self.tok(open + 1).kind != TokenKind::Ident {
            return false;
        }
        let second = self.tok(open + 2);
        second.kind == TokenKind::Ident || second.is_punct(b'~') || second.is_punct(b',')
    }

    fn func_decl(&self, kw: usize, end_idx: usize) -> Result<FuncDecl, ScanError> {
        let malformed = ScanError::Malformed {
            keyword: "func",
            offset: self.tok(kw).span.start,
        };
        let mut k = kw + 1;

        let mut receiver = None;
        if k <= end_idx && self.tok(k).is_punct(b'(') {
            let close = self.partner(k).ok_or(malformed.clone())?;
            receiver = Some(Receiver {
                params: self.param_types(k + 1..close),
            });
            k = close + 1;
        }

        if k > end_idx || self.tok(k).kind != TokenKind::Ident {
            return Err(malformed);
        }
        let name = self.text(k).to_string();
        k += 1;

        if k <= end_idx && self.tok(k).is_punct(b'[') {
            k = self.partner(k).ok_or(malformed.clone())? + 1;
        }
        if k > end_idx || !self.tok(k).is_punct(b'(') {
            return Err(malformed);
        }
        k = self.partner(k).ok_or(malformed.clone())? + 1;

        // An explicit `;` terminator is not part of the signature.
        let last = if end_idx >= k && self.tok(end_idx).is_punct(b';') {
            end_idx - 1
        } else {
            end_idx
        };

        // The body is the brace group closing the declaration.
        let mut results_end = last + 1;
        if self.tok(last).is_punct(b'}')
            && let Some(open) = self.partner(last)
            && open >= k
        {
            results_end = open;
        }

        let results = if k >= results_end {
            Vec::new()
        } else if self.tok(k).is_punct(b'(') && self.partner(k) == Some(results_end - 1) {
            self.param_types(k + 1..results_end - 1)
        } else {
            vec![self.type_ref(k..results_end)]
        };

        Ok(FuncDecl {
            name,
            receiver,
            results,
        })
    }

    fn other_decl(&self, kw: usize, end_idx: usize, kind: OtherKind) -> OtherDecl {
        let name = (kw < end_idx && self.tok(kw + 1).kind == TokenKind::Ident)
            .then(|| self.text(kw + 1).to_string());
        OtherDecl { kind, name }
    }

    /// Types of a parameter list, one entry per declared name (or per type
    /// when the list is unnamed).
    fn param_types(&self, range: Range<usize>) -> Vec<TypeRef> {
        let elements = self.split_commas(range);
        let named = elements.iter().any(|el| self.is_named_param(el.clone()));

        if !named {
            return elements
                .into_iter()
                .filter(|el| !el.is_empty())
                .map(|el| self.type_ref(el))
                .collect();
        }

        let mut types = Vec::new();
        let mut pending = 0usize;
        for el in elements {
            if el.len() == 1 {
                pending += 1;
                continue;
            }
            if el.is_empty() {
                continue;
            }
            let ty = self.type_ref(el.start + 1..el.end);
            for _ in 0..=pending {
                types.push(ty.clone());
            }
            pending = 0;
        }
        types
    }

    fn split_commas(&self, range: Range<usize>) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        let mut start = range.start;
        let mut j = range.start;
        while j < range.end {
            let tok = self.tok(j);
            if matches!(tok.kind, TokenKind::Punct(b'(' | b'[' | b'{'))
                && let Some(close) = self.partner(j)
            {
                j = close + 1;
                continue;
            }
            if tok.is_punct(b',') {
                out.push(start..j);
                start = j + 1;
            }
            j += 1;
        }
        if start < range.end {
            out.push(start..range.end);
        }
        out
    }

    fn is_named_param(&self, el: Range<usize>) -> bool {
        if el.len() < 2 || self.tok(el.start).kind != TokenKind::Ident {
            return false;
        }
        if is_keyword(self.text(el.start)) {
            return false;
        }
        let second = self.tok(el.start + 1);
        if second.is_punct(b'.') {
            return false;
        }
        if second.is_punct(b'[') {
            // `s []T` names a slice; `List[T]` instantiates a generic.
            return el.len() > 2 && self.tok(el.start + 2).is_punct(b']');
        }
        true
    }

    fn type_ref(&self, range: Range<usize>) -> TypeRef {
        if range.is_empty() {
            return TypeRef::Other(String::new());
        }
        let first = self.tok(range.start);
        if first.is_punct(b'*') {
            return TypeRef::Pointer(Box::new(self.type_ref(range.start + 1..range.end)));
        }

        let last = range.end - 1;
        let is_name = |idx: usize| {
            self.tok(idx).kind == TokenKind::Ident && !is_keyword(self.text(idx))
        };

        let base_len = if is_name(range.start) {
            if range.len() >= 3
                && self.tok(range.start + 1).is_punct(b'.')
                && is_name(range.start + 2)
            {
                3
            } else {
                1
            }
        } else {
            0
        };

        if base_len > 0 {
            let base = if base_len == 3 {
                TypeRef::Qualified {
                    package: self.text(range.start).to_string(),
                    name: self.text(range.start + 2).to_string(),
                }
            } else {
                TypeRef::Ident(self.text(range.start).to_string())
            };
            let rest = range.start + base_len;
            if rest == range.end {
                return base;
            }
            if self.tok(rest).is_punct(b'[') && self.partner(rest) == Some(last) {
                let args = &self.src[self.tok(rest).span.end..self.tok(last).span.start];
                return TypeRef::Generic {
                    base: Box::new(base),
                    args: args.trim().to_string(),
                };
            }
        }

        let text = &self.src[first.span.start..self.tok(last).span.end];
        TypeRef::Other(text.to_string())
    }

    /// Splits comments after the header into doc comments and standalone
    /// groups, then numbers the declarations.
    fn attach_comments(&self, header_end: usize, raw: Vec<RawDecl>) -> ScannedFile {
        let top_level: Vec<Span> = self
            .lexed
            .comments
            .iter()
            .copied()
            .filter(|c| c.start >= header_end)
            .filter(|c| !raw.iter().any(|d| d.span.contains(*c)))
            .collect();

        let groups = self.group_comments(&top_level);
        let mut docs: Vec<Option<Span>> = vec![None; raw.len()];
        let mut standalone = Vec::new();

        for group in groups {
            let next = raw.iter().position(|d| d.span.start >= group.end);
            let is_doc = next.is_some_and(|idx| {
                let gap = &self.src[group.end..raw[idx].span.start];
                gap.trim().is_empty() && gap.matches('\n').count() <= 1
            });
            match next {
                Some(idx) if is_doc => docs[idx] = Some(group),
                _ => standalone.push(group),
            }
        }

        let declarations = raw
            .into_iter()
            .zip(docs)
            .enumerate()
            .map(|(idx, (decl, doc))| Declaration {
                id: DeclId(idx),
                span: decl.span,
                doc,
                kind: decl.kind,
            })
            .collect();

        ScannedFile {
            header_end,
            declarations,
            standalone_comments: standalone,
        }
    }

    /// Adjacent comments with no blank line between them form one group.
    fn group_comments(&self, comments: &[Span]) -> Vec<Span> {
        let mut groups: Vec<Span> = Vec::new();
        for &c in comments {
            if let Some(last) = groups.last_mut() {
                let gap = &self.src[last.end..c.start];
                if gap.trim().is_empty() && gap.matches('\n').count() <= 1 {
                    last.end = c.end;
                    continue;
                }
            }
            groups.push(c);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn func(src: &str) -> FuncDecl {
        let file = scan_go(src).expect("scan");
        match &file.declarations[0].kind {
            DeclKind::Func(f) => f.clone(),
            other => panic!("expected func, got {other:?}"),
        }
    }

    fn ident(name: &str) -> TypeRef {
        TypeRef::Ident(name.to_string())
    }

    fn ptr(inner: TypeRef) -> TypeRef {
        TypeRef::Pointer(Box::new(inner))
    }

    #[test]
    fn header_covers_package_and_imports() {
        let src = "// Package p does things.\npackage p\n\nimport (\n\t\"fmt\"\n)\n\nimport \"os\" // os\n\nvar x = 1\n";
        let file = scan_go(src).expect("scan");
        assert_eq!(&src[..file.header_end], "// Package p does things.\npackage p\n\nimport (\n\t\"fmt\"\n)\n\nimport \"os\" // os");
        assert_eq!(file.declarations.len(), 1);
    }

    #[test]
    fn multi_line_signature_is_one_declaration() {
        let src = "package p\n\nfunc NewT(\n\tname string,\n\tage int,\n) *T {\n\treturn &T{}\n}\n\ntype T struct {\n\tName string\n}\n";
        let file = scan_go(src).expect("scan");
        assert_eq!(file.declarations.len(), 2);
        let first = &file.declarations[0];
        assert!(src[first.span.start..first.span.end].ends_with("return &T{}\n}"));
        assert_eq!(func(src).results, vec![ptr(ident("T"))]);
    }

    #[test]
    fn receivers_are_resolved_to_type_refs() {
        let f = func("package p\nfunc (m *MyStruct) Get() string { return \"\" }\n");
        assert_eq!(f.name, "Get");
        assert_eq!(
            f.receiver,
            Some(Receiver {
                params: vec![ptr(ident("MyStruct"))]
            })
        );
        assert_eq!(f.results, vec![ident("string")]);

        let unnamed = func("package p\nfunc (MyStruct) Get() {}\n");
        assert_eq!(unnamed.receiver.expect("receiver").params, vec![ident("MyStruct")]);

        let generic = func("package p\nfunc (l *List[T]) Len() int { return 0 }\n");
        assert_eq!(
            generic.receiver.expect("receiver").params,
            vec![ptr(TypeRef::Generic {
                base: Box::new(ident("List")),
                args: "T".to_string(),
            })]
        );
    }

    #[test]
    fn semicolon_separated_declarations_on_one_line() {
        let src = "package p\n\nfunc NewT() *T { return nil }; type T struct{}\n";
        let file = scan_go(src).expect("scan");
        assert_eq!(file.declarations.len(), 2);
        assert_eq!(func(src).results, vec![ptr(ident("T"))]);
        assert!(matches!(file.declarations[1].kind, DeclKind::Type(_)));

        let bodyless = func("package p\nfunc now() int64;\n");
        assert_eq!(bodyless.results, vec![ident("int64")]);
    }

    #[test]
    fn result_lists_named_and_unnamed() {
        let f = func("package p\nfunc NewA() (*A, error) { return nil, nil }\n");
        assert_eq!(f.results, vec![ptr(ident("A")), ident("error")]);

        let named = func("package p\nfunc NewA() (a, b *A, err error) { return }\n");
        assert_eq!(named.results[0], ptr(ident("A")));
        assert_eq!(named.results.len(), 3);

        let qualified = func("package p\nfunc NewClient() *http.Client { return nil }\n");
        assert_eq!(
            qualified.results,
            vec![ptr(TypeRef::Qualified {
                package: "http".to_string(),
                name: "Client".to_string(),
            })]
        );

        let none = func("package p\nfunc main() {\n}\n");
        assert!(none.results.is_empty());
        assert!(none.receiver.is_none());
    }

    #[test]
    fn interface_result_before_body() {
        let f = func("package p\nfunc Any() interface{} { return nil }\n");
        assert_eq!(f.results, vec![TypeRef::Other("interface{}".to_string())]);
    }

    #[test]
    fn grouped_type_block_yields_every_spec() {
        let src = "package p\n\ntype (\n\tA struct{}\n\tB[T any] struct{ v T }\n\tC = A\n\tD int\n)\n";
        let file = scan_go(src).expect("scan");
        let DeclKind::Type(t) = &file.declarations[0].kind else {
            panic!("expected type decl");
        };
        let shapes: Vec<(&str, TypeShape)> =
            t.specs.iter().map(|s| (s.name.as_str(), s.shape)).collect();
        assert_eq!(
            shapes,
            vec![
                ("A", TypeShape::Struct),
                ("B", TypeShape::Struct),
                ("C", TypeShape::Alias),
                ("D", TypeShape::Other),
            ]
        );
    }

    #[test]
    fn array_type_is_not_type_params() {
        let file = scan_go("package p\ntype Buf [4]byte\ntype G[T any] interface{}\n").expect("scan");
        let shapes: Vec<TypeShape> = file
            .declarations
            .iter()
            .map(|d| match &d.kind {
                DeclKind::Type(t) => t.specs[0].shape,
                _ => panic!("expected type"),
            })
            .collect();
        assert_eq!(shapes, vec![TypeShape::Other, TypeShape::Interface]);
    }

    #[test]
    fn doc_and_standalone_comments_are_split() {
        let src = "package p\n\n// standalone\n// block\n\n// Doc for T.\ntype T struct{}\n\n/* after T */\n\nvar v = 1 // trailing\n\n// tail\n";
        let file = scan_go(src).expect("scan");
        let text = |s: Span| &src[s.start..s.end];

        let t = &file.declarations[0];
        assert_eq!(text(t.doc.expect("doc")), "// Doc for T.");
        let v = &file.declarations[1];
        assert!(v.doc.is_none());
        assert_eq!(text(v.span), "var v = 1 // trailing");

        let standalone: Vec<&str> = file.standalone_comments.iter().map(|s| text(*s)).collect();
        assert_eq!(standalone, vec!["// standalone\n// block", "/* after T */", "// tail"]);
    }

    #[test]
    fn comments_inside_bodies_stay_opaque() {
        let src = "package p\n\nfunc f() {\n\t// inside\n\tx := 1 //nolint:gosec\n\t_ = x\n}\n";
        let file = scan_go(src).expect("scan");
        assert!(file.standalone_comments.is_empty());
        assert!(file.declarations[0].doc.is_none());
    }

    #[test]
    fn const_and_var_blocks_are_other_decls() {
        let src = "package p\n\nconst (\n\tA = iota\n\tB\n)\n\nvar GlobalVar = \"test\"\n";
        let file = scan_go(src).expect("scan");
        let kinds: Vec<&DeclKind> = file.declarations.iter().map(|d| &d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &DeclKind::Other(OtherDecl {
                    kind: OtherKind::Const,
                    name: None
                }),
                &DeclKind::Other(OtherDecl {
                    kind: OtherKind::Var,
                    name: Some("GlobalVar".to_string())
                }),
            ]
        );
    }

    #[test]
    fn rejects_non_go_input() {
        assert_eq!(scan_go("fn main() {}"), Err(ScanError::MissingPackage));
        assert!(matches!(
            scan_go("package p\nvar x = 1\nimport \"fmt\"\n"),
            Err(ScanError::MisplacedImport { .. })
        ));
        assert!(matches!(
            scan_go("package p\nx := 1\n"),
            Err(ScanError::UnexpectedToken { .. })
        ));
    }
}
