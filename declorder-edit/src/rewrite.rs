//! Rebuilds a file with its declarations in canonical order.
//!
//! Declaration text (doc comment through closing token) is copied as an opaque
//! block. Comments that stand alone between declarations are re-attached to a
//! declaration before the blocks move, then emitted in front of their owner.
//! The header and everything after the last declaration never move.

use crate::error::RewriteError;
use crate::source::SpanReader;
use declorder_types::{DeclId, Declaration, Span};
use tracing::debug;

/// What the rewriter needs to know about one file.
#[derive(Debug, Clone, Copy)]
pub struct FileLayout<'a> {
    /// Bytes before this offset (package clause, imports) are copied verbatim.
    pub header_end: usize,
    /// In source order; `decls[i].id == DeclId(i)`.
    pub decls: &'a [Declaration],
    /// Comment groups after the header that belong to no declaration.
    pub standalone_comments: &'a [Span],
}

/// A standalone comment and the declaration it travels with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributed {
    pub comment: Span,
    pub owner: DeclId,
}

/// Render the file with declarations emitted in `canonical` order.
///
/// When `canonical` is the original order the source comes back unchanged.
pub fn rewrite(
    source: &dyn SpanReader,
    layout: &FileLayout<'_>,
    canonical: &[DeclId],
) -> Result<String, RewriteError> {
    let decls = layout.decls;
    check_permutation(decls, canonical)?;

    let whole = Span::new(0, source.len());
    let in_order = canonical.iter().enumerate().all(|(i, id)| id.index() == i);
    let Some(last) = decls.last() else {
        return Ok(source.read(whole)?.to_string());
    };
    if in_order {
        return Ok(source.read(whole)?.to_string());
    }

    let comments = movable_comments(layout);
    check_gaps(source, layout, &comments)?;

    let mut attributed = attribute_comments(layout, &comments, canonical);
    promote_leading(&mut attributed, decls[0].id, canonical[0]);

    let elements = elements(layout, &comments);
    let mut out = String::with_capacity(source.len());
    out.push_str(source.read(Span::new(0, layout.header_end))?);
    if let Some(first) = elements.first() {
        out.push_str(source.read(Span::new(layout.header_end, first.start))?);
    }

    for (k, &id) in canonical.iter().enumerate() {
        let decl = &decls[id.index()];
        let mut pieces: Vec<Span> = attributed
            .iter()
            .filter(|a| a.owner == id)
            .map(|a| a.comment)
            .collect();
        pieces.sort_by_key(|s| s.start);

        let block = decl.full_span();
        let lead = pieces.first().copied().unwrap_or(block);
        if k > 0 {
            let before = preceding_end(&elements, lead.start, layout.header_end);
            push_separator(&mut out, source.read(Span::new(before, lead.start))?);
        }
        for piece in &pieces {
            out.push_str(source.read(*piece)?);
            let after = following_start(&elements, piece.end);
            push_separator(&mut out, source.read(Span::new(piece.end, after))?);
        }
        out.push_str(source.read(block)?);
    }

    out.push_str(source.read(Span::new(last.span.end, source.len()))?);

    debug!(
        decls = decls.len(),
        comments = comments.len(),
        bytes = out.len(),
        "rewrote declarations"
    );
    Ok(out)
}

/// Attribute each comment to a declaration.
///
/// A comment sitting between declarations `A` and `B` goes to `B`, unless the
/// declaration that follows `A` in canonical order is closer in the source.
/// Ties go to `B`. Comments before the first declaration go to it.
pub fn attribute_comments(
    layout: &FileLayout<'_>,
    comments: &[Span],
    canonical: &[DeclId],
) -> Vec<Attributed> {
    let decls = layout.decls;
    let mut rank = vec![0usize; decls.len()];
    for (pos, id) in canonical.iter().enumerate() {
        if let Some(slot) = rank.get_mut(id.index()) {
            *slot = pos;
        }
    }

    comments
        .iter()
        .filter_map(|&comment| {
            let b = decls.partition_point(|d| d.full_span().start < comment.end);
            let following = decls.get(b)?;
            let owner = match b.checked_sub(1) {
                None => following.id,
                Some(a) => match canonical.get(rank[a] + 1) {
                    Some(&succ) if succ != following.id => {
                        let to_succ = comment.distance_to(decls[succ.index()].full_span());
                        let to_following = comment.distance_to(following.full_span());
                        if to_succ < to_following {
                            succ
                        } else {
                            following.id
                        }
                    }
                    _ => following.id,
                },
            };
            Some(Attributed { comment, owner })
        })
        .collect()
}

/// Comments owned by the originally-first declaration lead the file again
/// when that declaration no longer comes first.
pub fn promote_leading(attributed: &mut [Attributed], original_first: DeclId, canonical_first: DeclId) {
    if original_first == canonical_first {
        return;
    }
    for a in attributed.iter_mut().filter(|a| a.owner == original_first) {
        a.owner = canonical_first;
    }
}

fn check_permutation(decls: &[Declaration], canonical: &[DeclId]) -> Result<(), RewriteError> {
    let err = RewriteError::NotAPermutation {
        expected: decls.len(),
    };
    if canonical.len() != decls.len() {
        return Err(err);
    }
    let mut seen = vec![false; decls.len()];
    for id in canonical {
        match seen.get_mut(id.index()) {
            Some(slot) if !*slot => *slot = true,
            _ => return Err(err),
        }
    }
    if decls.iter().enumerate().any(|(i, d)| d.id.index() != i) {
        return Err(err);
    }
    Ok(())
}

/// Standalone comments between the header and the end of the last declaration.
fn movable_comments(layout: &FileLayout<'_>) -> Vec<Span> {
    let body_end = layout.decls.last().map_or(layout.header_end, |d| d.span.end);
    let mut comments: Vec<Span> = layout
        .standalone_comments
        .iter()
        .copied()
        .filter(|c| c.start >= layout.header_end && c.end <= body_end)
        .collect();
    comments.sort_by_key(|c| c.start);
    comments
}

/// Everything between declarations must be whitespace or a known comment.
fn check_gaps(
    source: &dyn SpanReader,
    layout: &FileLayout<'_>,
    comments: &[Span],
) -> Result<(), RewriteError> {
    let mut gap_start = layout.header_end;
    let mut comments = comments.iter().peekable();
    for decl in layout.decls {
        let gap_end = decl.full_span().start;
        let mut cursor = gap_start;
        while let Some(c) = comments.next_if(|c| c.end <= gap_end) {
            ensure_blank(source, Span::new(cursor, c.start))?;
            cursor = c.end;
        }
        ensure_blank(source, Span::new(cursor, gap_end))?;
        gap_start = decl.span.end;
    }
    Ok(())
}

fn ensure_blank(source: &dyn SpanReader, span: Span) -> Result<(), RewriteError> {
    if span.start >= span.end {
        return Ok(());
    }
    let text = source.read(span)?;
    match text.find(|c: char| !c.is_whitespace()) {
        None => Ok(()),
        Some(idx) => Err(RewriteError::StrayBytes {
            offset: span.start + idx,
            text: text.trim().to_string(),
        }),
    }
}

/// Comments and declaration blocks after the header, by position.
fn elements(layout: &FileLayout<'_>, comments: &[Span]) -> Vec<Span> {
    let mut out: Vec<Span> = comments.to_vec();
    out.extend(layout.decls.iter().map(Declaration::full_span));
    out.sort_by_key(|s| s.start);
    out
}

fn preceding_end(elements: &[Span], start: usize, header_end: usize) -> usize {
    let idx = elements.partition_point(|e| e.start < start);
    idx.checked_sub(1)
        .and_then(|i| elements.get(i))
        .map_or(header_end, |e| e.end)
}

fn following_start(elements: &[Span], end: usize) -> usize {
    let idx = elements.partition_point(|e| e.start < end);
    elements.get(idx).map_or(end, |e| e.start)
}

/// Collapse original whitespace to a line break or a single blank line.
fn push_separator(out: &mut String, ws: &str) {
    let newline = if ws.contains("\r\n") { "\r\n" } else { "\n" };
    match ws.matches('\n').count() {
        0 => out.push_str(ws),
        1 => out.push_str(newline),
        _ => {
            out.push_str(newline);
            out.push_str(newline);
        }
    }
}
