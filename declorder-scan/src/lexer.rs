//! Byte cursor lexer for Go source.
//!
//! Produces the significant tokens of a file plus the spans of every comment.
//! Whitespace is dropped: callers recover line structure from the bytes
//! between tokens. Bracket tokens are paired while lexing so later stages can
//! jump over a balanced group in one step.

use crate::error::ScanError;
use declorder_types::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Literal,
    /// Single ASCII punctuation byte, brackets included.
    Punct(u8),
    /// `++` or `--`.
    IncDec,
    /// Any other operator or non-ASCII symbol.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.span.start..self.span.end]
    }

    pub fn is_punct(&self, b: u8) -> bool {
        self.kind == TokenKind::Punct(b)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Lexed {
    pub tokens: Vec<Token>,
    /// For bracket tokens, the index of the partner bracket.
    pub partner: Vec<Option<usize>>,
    pub comments: Vec<Span>,
}

const BOM: &str = "\u{feff}";

/// Go keywords. Identifiers in this list never end a statement unless they
/// are one of the four statement-ending keywords.
pub(crate) const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

pub(crate) fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        let pos = if src.starts_with(BOM) { BOM.len() } else { 0 };
        Self { src, pos }
    }

    fn current(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek(&self, n: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + n).copied()
    }

    fn current_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    /// Moves past the next occurrence of `needle`, returning false at EOF.
    fn skip_past(&mut self, needle: &str) -> bool {
        match self.src[self.pos..].find(needle) {
            Some(idx) => {
                self.pos += idx + needle.len();
                true
            }
            None => {
                self.pos = self.src.len();
                false
            }
        }
    }
}

struct Lexer<'a> {
    cursor: Cursor<'a>,
    out: Lexed,
    open: Vec<usize>,
}

pub(crate) fn lex(src: &str) -> Result<Lexed, ScanError> {
    let mut lexer = Lexer {
        cursor: Cursor::new(src),
        out: Lexed::default(),
        open: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.out)
}

impl<'a> Lexer<'a> {
    fn run(&mut self) -> Result<(), ScanError> {
        while let Some(b) = self.cursor.current() {
            let start = self.cursor.pos;
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => self.cursor.advance(1),
                b'/' if self.cursor.peek(1) == Some(b'/') => self.line_comment(start),
                b'/' if self.cursor.peek(1) == Some(b'*') => self.block_comment(start)?,
                b'"' => self.quoted(start, b'"', "string literal")?,
                b'\'' => self.quoted(start, b'\'', "rune literal")?,
                b'`' => self.raw_string(start)?,
                b'0'..=b'9' => self.number(start),
                b'.' if matches!(self.cursor.peek(1), Some(b'0'..=b'9')) => self.number(start),
                b'+' if self.cursor.peek(1) == Some(b'+') => {
                    self.cursor.advance(2);
                    self.push(TokenKind::IncDec, start);
                }
                b'-' if self.cursor.peek(1) == Some(b'-') => {
                    self.cursor.advance(2);
                    self.push(TokenKind::IncDec, start);
                }
                b'(' | b'[' | b'{' => {
                    self.cursor.advance(1);
                    self.open.push(self.out.tokens.len());
                    self.push(TokenKind::Punct(b), start);
                }
                b')' | b']' | b'}' => self.close(start, b)?,
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(start),
                0x80..=0xFF => {
                    let c = self.cursor.current_char().unwrap_or(char::REPLACEMENT_CHARACTER);
                    if c.is_alphabetic() {
                        self.identifier(start);
                    } else {
                        self.cursor.advance(c.len_utf8());
                        self.push(TokenKind::Other, start);
                    }
                }
                _ if b.is_ascii_punctuation() => {
                    self.cursor.advance(1);
                    self.push(TokenKind::Punct(b), start);
                }
                _ => {
                    self.cursor.advance(1);
                    self.push(TokenKind::Other, start);
                }
            }
        }

        if let Some(&idx) = self.open.first() {
            let tok = self.out.tokens[idx];
            return Err(ScanError::Unclosed {
                open: self.cursor.src.as_bytes()[tok.span.start] as char,
                offset: tok.span.start,
            });
        }
        Ok(())
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.out.tokens.push(Token {
            kind,
            span: Span::new(start, self.cursor.pos),
        });
        self.out.partner.push(None);
    }

    fn close(&mut self, start: usize, b: u8) -> Result<(), ScanError> {
        let expected = match b {
            b')' => b'(',
            b']' => b'[',
            _ => b'{',
        };
        let open_idx = match self.open.pop() {
            Some(idx) if self.out.tokens[idx].is_punct(expected) => idx,
            _ => {
                return Err(ScanError::UnmatchedClose {
                    found: b as char,
                    offset: start,
                });
            }
        };
        self.cursor.advance(1);
        let close_idx = self.out.tokens.len();
        self.push(TokenKind::Punct(b), start);
        self.out.partner[open_idx] = Some(close_idx);
        self.out.partner[close_idx] = Some(open_idx);
        Ok(())
    }

    fn line_comment(&mut self, start: usize) {
        match self.cursor.src[start..].find('\n') {
            Some(idx) => self.cursor.pos = start + idx,
            None => self.cursor.pos = self.cursor.src.len(),
        }
        let mut end = self.cursor.pos;
        if self.cursor.src[start..end].ends_with('\r') {
            end -= 1;
        }
        self.out.comments.push(Span::new(start, end));
    }

    fn block_comment(&mut self, start: usize) -> Result<(), ScanError> {
        self.cursor.advance(2);
        if !self.cursor.skip_past("*/") {
            return Err(ScanError::Unterminated {
                what: "block comment",
                offset: start,
            });
        }
        self.out.comments.push(Span::new(start, self.cursor.pos));
        Ok(())
    }

    fn quoted(&mut self, start: usize, quote: u8, what: &'static str) -> Result<(), ScanError> {
        self.cursor.advance(1);
        loop {
            match self.cursor.current() {
                None | Some(b'\n') => return Err(ScanError::Unterminated { what, offset: start }),
                Some(b'\\') => self.cursor.advance(2),
                Some(b) if b == quote => {
                    self.cursor.advance(1);
                    break;
                }
                Some(_) => self.cursor.advance(1),
            }
        }
        self.push(TokenKind::Literal, start);
        Ok(())
    }

    fn raw_string(&mut self, start: usize) -> Result<(), ScanError> {
        self.cursor.advance(1);
        if !self.cursor.skip_past("`") {
            return Err(ScanError::Unterminated {
                what: "raw string literal",
                offset: start,
            });
        }
        self.push(TokenKind::Literal, start);
        Ok(())
    }

    fn number(&mut self, start: usize) {
        while let Some(b) = self.cursor.current() {
            match b {
                b'e' | b'E' | b'p' | b'P' if matches!(self.cursor.peek(1), Some(b'+' | b'-')) => {
                    self.cursor.advance(2)
                }
                b if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' => self.cursor.advance(1),
                _ => break,
            }
        }
        self.push(TokenKind::Literal, start);
    }

    fn identifier(&mut self, start: usize) {
        while let Some(c) = self.cursor.current_char() {
            if c.is_alphanumeric() || c == '_' {
                self.cursor.advance(c.len_utf8());
            } else {
                break;
            }
        }
        self.push(TokenKind::Ident, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(src: &str) -> Vec<String> {
        let lexed = lex(src).expect("lex");
        lexed
            .tokens
            .iter()
            .map(|t| t.text(src).to_string())
            .collect()
    }

    #[test]
    fn comments_are_collected_apart_from_tokens() {
        let src = "package p // trailing\n/* block\n */ var x = 1\n";
        let lexed = lex(src).expect("lex");
        assert_eq!(texts(src), vec!["package", "p", "var", "x", "=", "1"]);
        let comments: Vec<&str> = lexed
            .comments
            .iter()
            .map(|s| &src[s.start..s.end])
            .collect();
        assert_eq!(comments, vec!["// trailing", "/* block\n */"]);
    }

    #[test]
    fn comment_markers_inside_literals_are_not_comments() {
        let src = "var s = \"// not a comment\" + `/* raw */` + '\\''\n";
        let lexed = lex(src).expect("lex");
        assert!(lexed.comments.is_empty());
        assert_eq!(lexed.tokens.len(), 8);
    }

    #[test]
    fn brackets_are_paired() {
        let src = "func f(a []int) { g() }";
        let lexed = lex(src).expect("lex");
        let open_paren = 2;
        assert!(lexed.tokens[open_paren].is_punct(b'('));
        let close = lexed.partner[open_paren].expect("partner");
        assert!(lexed.tokens[close].is_punct(b')'));
        assert_eq!(lexed.partner[close], Some(open_paren));
    }

    #[test]
    fn unbalanced_input_is_an_error() {
        assert!(matches!(
            lex("func f() { )"),
            Err(ScanError::UnmatchedClose { found: ')', .. })
        ));
        assert!(matches!(
            lex("type T struct {"),
            Err(ScanError::Unclosed { open: '{', .. })
        ));
        assert!(matches!(
            lex("/* open"),
            Err(ScanError::Unterminated { what: "block comment", .. })
        ));
        assert!(matches!(
            lex("var s = \"abc\n"),
            Err(ScanError::Unterminated { .. })
        ));
    }

    #[test]
    fn inc_dec_and_unicode_identifiers() {
        assert_eq!(texts("i++ j-- héllo"), vec!["i", "++", "j", "--", "héllo"]);
    }

    #[test]
    fn line_comment_excludes_carriage_return() {
        let src = "// crlf\r\npackage p\r\n";
        let lexed = lex(src).expect("lex");
        assert_eq!(&src[lexed.comments[0].start..lexed.comments[0].end], "// crlf");
    }
}
