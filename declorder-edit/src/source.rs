//! Read access to the original file text by span.

use crate::error::RewriteError;
use declorder_types::Span;

/// Source of the original bytes the rewriter copies from.
pub trait SpanReader {
    /// Total length of the source in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text covered by `span`.
    fn read(&self, span: Span) -> Result<&str, RewriteError>;
}

/// A borrowed in-memory source.
#[derive(Debug, Clone, Copy)]
pub struct SourceText<'a> {
    text: &'a str,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }
}

impl SpanReader for SourceText<'_> {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn read(&self, span: Span) -> Result<&str, RewriteError> {
        self.text
            .get(span.start..span.end)
            .ok_or(RewriteError::BadSpan {
                start: span.start,
                end: span.end,
                len: self.text.len(),
            })
    }
}

impl SpanReader for String {
    fn len(&self) -> usize {
        self.as_str().len()
    }

    fn read(&self, span: Span) -> Result<&str, RewriteError> {
        self.get(span.start..span.end).ok_or(RewriteError::BadSpan {
            start: span.start,
            end: span.end,
            len: self.as_str().len(),
        })
    }
}
