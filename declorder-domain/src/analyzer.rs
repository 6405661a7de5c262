//! Ordering policies evaluated per type group.

use crate::classifier::{Classification, TypeGroup};
use declorder_types::{CheckFlags, DeclId, DeclKind, Declaration, Diagnostic, RuleId, Visibility};

/// A function in a type group, flattened for ordering checks.
#[derive(Debug, Clone)]
struct Member<'a> {
    name: &'a str,
    pos: usize,
    visibility: Visibility,
}

fn member<'a>(decls: &'a [Declaration], id: DeclId) -> Option<Member<'a>> {
    let decl = decls.get(id.index())?;
    match &decl.kind {
        DeclKind::Func(f) => Some(Member {
            name: &f.name,
            pos: decl.pos(),
            visibility: f.visibility(),
        }),
        DeclKind::Type(_) | DeclKind::Other(_) => None,
    }
}

/// Evaluate the enabled policies for one group.
///
/// Groups whose struct is declared in another file produce nothing.
pub fn analyze(group: &TypeGroup, decls: &[Declaration], flags: CheckFlags) -> Vec<Diagnostic> {
    let Some(type_pos) = group.type_pos.filter(|_| group.is_linted()) else {
        return Vec::new();
    };

    let constructors: Vec<Member<'_>> = group
        .constructors
        .iter()
        .filter_map(|&id| member(decls, id))
        .collect();
    let mut methods: Vec<Member<'_>> = group
        .methods
        .iter()
        .filter_map(|&id| member(decls, id))
        .collect();
    methods.sort_by_key(|m| m.pos);

    let report = Reporter { group };
    let mut out = Vec::new();

    if flags.constructor_check {
        let earliest_method = methods.first();
        for c in &constructors {
            if c.pos < type_pos {
                out.push(report.constructor_after_type(c));
            }
            if let Some(m) = earliest_method
                && c.pos > m.pos
            {
                out.push(report.constructor_before_method(c, m));
            }
        }
    }

    if flags.alphabetical_check {
        for pair in constructors.windows(2) {
            if pair[0].name > pair[1].name {
                out.push(report.constructors_unsorted(&pair[0], &pair[1]));
            }
        }
    }

    if flags.method_visibility_check
        && let Some(last_public) = methods
            .iter()
            .filter(|m| m.visibility.is_public())
            .max_by_key(|m| m.pos)
    {
        for private in methods.iter().filter(|m| !m.visibility.is_public()) {
            if private.pos < last_public.pos {
                out.push(report.unexported_before_exported(private, last_public));
            }
        }
    }

    if flags.alphabetical_check {
        for visibility in [Visibility::Public, Visibility::Private] {
            let subsequence: Vec<&Member<'_>> =
                methods.iter().filter(|m| m.visibility == visibility).collect();
            for pair in subsequence.windows(2) {
                if pair[0].name > pair[1].name {
                    out.push(report.methods_unsorted(pair[0], pair[1]));
                }
            }
        }
    }

    out
}

/// Diagnostics for every analyzable group, in first-appearance order.
pub fn analyze_file(
    classification: &Classification,
    decls: &[Declaration],
    flags: CheckFlags,
) -> Vec<Diagnostic> {
    classification
        .linted_groups()
        .flat_map(|group| analyze(group, decls, flags))
        .collect()
}

struct Reporter<'g> {
    group: &'g TypeGroup,
}

impl Reporter<'_> {
    fn diagnostic(&self, rule: RuleId, anchor: &Member<'_>, message: String) -> Diagnostic {
        Diagnostic {
            pos: anchor.pos,
            message,
            rule,
            type_name: self.group.name.clone(),
            subject: anchor.name.to_string(),
            edits: Vec::new(),
        }
    }

    fn constructor_after_type(&self, c: &Member<'_>) -> Diagnostic {
        let message = format!(
            "constructor {:?} for struct {:?} should be placed after the struct declaration",
            c.name, self.group.name
        );
        self.diagnostic(RuleId::ConstructorAfterType, c, message)
    }

    fn constructor_before_method(&self, c: &Member<'_>, m: &Member<'_>) -> Diagnostic {
        let message = format!(
            "constructor {:?} for struct {:?} should be placed before struct method {:?}",
            c.name, self.group.name, m.name
        );
        self.diagnostic(RuleId::ConstructorBeforeMethod, c, message)
    }

    fn unexported_before_exported(&self, private: &Member<'_>, public: &Member<'_>) -> Diagnostic {
        let message = format!(
            "unexported method {:?} for struct {:?} should be placed after the exported method {:?}",
            private.name, self.group.name, public.name
        );
        self.diagnostic(RuleId::ExportedBeforeUnexported, private, message)
    }

    /// `later` sorts before `earlier`; anchored at `later`.
    fn constructors_unsorted(&self, earlier: &Member<'_>, later: &Member<'_>) -> Diagnostic {
        let message = format!(
            "constructor {:?} for struct {:?} should be placed before constructor {:?}",
            later.name, self.group.name, earlier.name
        );
        self.diagnostic(RuleId::ConstructorsAlphabetical, later, message)
    }

    fn methods_unsorted(&self, earlier: &Member<'_>, later: &Member<'_>) -> Diagnostic {
        let message = format!(
            "method {:?} for struct {:?} should be placed before method {:?}",
            later.name, self.group.name, earlier.name
        );
        self.diagnostic(RuleId::MethodsAlphabetical, later, message)
    }
}
