//! Partitions a file's declarations into type groups and an "other" bucket.

use declorder_types::{DeclId, DeclKind, Declaration, FuncDecl};
use std::collections::HashMap;
use tracing::debug;

/// Function-name prefixes (lowercased) that mark a constructor.
pub const FACTORY_PREFIXES: [&str; 2] = ["new", "must"];

/// A struct together with its constructors and methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeGroup {
    pub name: String,
    /// `None` when the struct is not declared in this file.
    pub type_decl: Option<DeclId>,
    /// Position of the struct's name within `type_decl`.
    pub type_pos: Option<usize>,
    /// In source order.
    pub constructors: Vec<DeclId>,
    /// In source order.
    pub methods: Vec<DeclId>,
}

impl TypeGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_decl: None,
            type_pos: None,
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Only groups whose struct is declared in this file are analyzed or moved.
    pub fn is_linted(&self) -> bool {
        self.type_decl.is_some()
    }

    pub fn members(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.constructors.iter().chain(self.methods.iter()).copied()
    }
}

/// Result of classifying one file.
///
/// Groups are kept in first-appearance order; the name index only speeds up
/// lookups and is never iterated.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    groups: Vec<TypeGroup>,
    index: HashMap<String, usize>,
    other: Vec<DeclId>,
}

impl Classification {
    pub fn groups(&self) -> &[TypeGroup] {
        &self.groups
    }

    pub fn linted_groups(&self) -> impl Iterator<Item = &TypeGroup> {
        self.groups.iter().filter(|g| g.is_linted())
    }

    pub fn group(&self, name: &str) -> Option<&TypeGroup> {
        self.index.get(name).map(|&idx| &self.groups[idx])
    }

    /// Declarations outside every type group, in source order.
    pub fn other(&self) -> &[DeclId] {
        &self.other
    }

    /// Declarations that keep their original relative position: the "other"
    /// bucket plus members of groups whose struct lives in another file.
    pub fn passthrough(&self) -> Vec<DeclId> {
        let mut ids: Vec<DeclId> = self.other.clone();
        for group in self.groups.iter().filter(|g| !g.is_linted()) {
            ids.extend(group.members());
        }
        ids.sort();
        ids
    }

    fn group_mut(&mut self, name: &str) -> &mut TypeGroup {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.groups.push(TypeGroup::new(name));
                let idx = self.groups.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.groups[idx]
    }
}

/// Classify `decls` (in source order) into type groups and the "other" bucket.
pub fn classify(decls: &[Declaration]) -> Classification {
    let mut out = Classification::default();

    // Pass 1: every struct declared in the file. First occurrence wins.
    for decl in decls {
        match &decl.kind {
            DeclKind::Type(t) => {
                let mut registered = false;
                for spec in t.specs.iter().filter(|s| s.is_struct()) {
                    if out.index.contains_key(&spec.name) {
                        continue;
                    }
                    let group = out.group_mut(&spec.name);
                    group.type_decl = Some(decl.id);
                    group.type_pos = Some(spec.pos);
                    registered = true;
                }
                if !registered {
                    out.other.push(decl.id);
                }
            }
            DeclKind::Other(_) => out.other.push(decl.id),
            DeclKind::Func(_) => {}
        }
    }

    // Pass 2: attach functions to their struct.
    for decl in decls {
        let DeclKind::Func(f) = &decl.kind else {
            continue;
        };
        let constructs = constructor_target(f)
            .filter(|t| out.group(t).is_some_and(TypeGroup::is_linted));
        if let Some(target) = constructs {
            out.group_mut(target).constructors.push(decl.id);
        } else if let Some(receiver) = method_receiver(f) {
            out.group_mut(receiver).methods.push(decl.id);
        } else {
            out.other.push(decl.id);
        }
    }

    out.other.sort();
    debug!(
        groups = out.groups.len(),
        linted = out.linted_groups().count(),
        other = out.other.len(),
        "classified declarations"
    );
    out
}

/// Name of the struct `f` constructs, if `f` looks like a constructor.
///
/// `New` or `Must` alone never qualifies: the name has to be longer than
/// the prefix.
pub fn constructor_target(f: &FuncDecl) -> Option<&str> {
    if f.receiver.is_some() || !f.visibility().is_public() {
        return None;
    }
    let first = f.results.first()?;
    let lower = f.name.to_lowercase();
    let prefixed = FACTORY_PREFIXES
        .iter()
        .any(|p| lower.starts_with(p) && f.name.len() > p.len());
    if !prefixed {
        return None;
    }
    first.resolve_ident()
}

/// Name of the struct `f` is a method of, if its receiver is a plain
/// (possibly pointer) identifier.
pub fn method_receiver(f: &FuncDecl) -> Option<&str> {
    let receiver = f.receiver.as_ref()?;
    match receiver.params.as_slice() {
        [only] => only.resolve_ident(),
        _ => None,
    }
}
