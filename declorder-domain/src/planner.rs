//! Canonical declaration order for a file.

use crate::classifier::{Classification, TypeGroup};
use declorder_types::{CheckFlags, DeclId, DeclKind, Declaration, Visibility};
use std::collections::BTreeSet;
use tracing::debug;

/// Ids of `decls` in source order.
pub fn original_order(decls: &[Declaration]) -> Vec<DeclId> {
    decls.iter().map(|d| d.id).collect()
}

/// Compute the canonical order of every declaration in the file.
///
/// The result is a permutation of [`original_order`]. Files without a linted
/// type group come back unchanged.
pub fn plan(decls: &[Declaration], classification: &Classification, flags: CheckFlags) -> Vec<DeclId> {
    let linted: Vec<&TypeGroup> = classification.linted_groups().collect();
    let Some(first_type) = linted.iter().filter_map(|g| g.type_decl).min() else {
        return original_order(decls);
    };

    let passthrough = classification.passthrough();
    let (leading, trailing): (Vec<DeclId>, Vec<DeclId>) =
        passthrough.into_iter().partition(|id| *id < first_type);

    let mut emitted = BTreeSet::new();
    let mut out = Vec::with_capacity(decls.len());
    let mut emit = |id: DeclId, out: &mut Vec<DeclId>| {
        if emitted.insert(id) {
            out.push(id);
        }
    };

    for id in leading {
        emit(id, &mut out);
    }

    for group in &linted {
        if let Some(id) = group.type_decl {
            emit(id, &mut out);
        }
        for id in ordered(decls, &group.constructors, flags) {
            emit(id, &mut out);
        }
        let (public, private): (Vec<DeclId>, Vec<DeclId>) = group
            .methods
            .iter()
            .copied()
            .partition(|&id| visibility(decls, id).is_none_or(Visibility::is_public));
        for id in ordered(decls, &public, flags) {
            emit(id, &mut out);
        }
        for id in ordered(decls, &private, flags) {
            emit(id, &mut out);
        }
    }

    for id in trailing {
        emit(id, &mut out);
    }

    // Anything the buckets missed keeps its original relative order at the end.
    for id in original_order(decls) {
        emit(id, &mut out);
    }

    debug!(
        decls = decls.len(),
        groups = linted.len(),
        moved = needs_rewrite(&original_order(decls), &out),
        "planned canonical order"
    );
    out
}

/// True when `canonical` differs from `original` at any position.
pub fn needs_rewrite(original: &[DeclId], canonical: &[DeclId]) -> bool {
    original != canonical
}

fn visibility(decls: &[Declaration], id: DeclId) -> Option<Visibility> {
    match &decls.get(id.index())?.kind {
        DeclKind::Func(f) => Some(f.visibility()),
        DeclKind::Type(_) | DeclKind::Other(_) => None,
    }
}

fn ordered(decls: &[Declaration], ids: &[DeclId], flags: CheckFlags) -> Vec<DeclId> {
    let mut ids = ids.to_vec();
    if flags.alphabetical_check {
        ids.sort_by(|a, b| name_of(decls, *a).cmp(name_of(decls, *b)));
    } else {
        ids.sort_by_key(|id| decls.get(id.index()).map(Declaration::pos));
    }
    ids
}

fn name_of(decls: &[Declaration], id: DeclId) -> &str {
    decls
        .get(id.index())
        .and_then(Declaration::name)
        .unwrap_or_default()
}
