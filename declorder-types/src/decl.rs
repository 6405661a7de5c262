use serde::{Deserialize, Serialize};

/// Half-open byte range `start..end` into a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Number of bytes separating two spans; zero when they touch or overlap.
    pub fn distance_to(&self, other: Span) -> usize {
        if other.start >= self.end {
            other.start - self.end
        } else if self.start >= other.end {
            self.start - other.end
        } else {
            0
        }
    }
}

/// Identity of a declaration within one file: its index in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclId(pub usize);

impl DeclId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Public/private split derived from the casing of a name's first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn of(name: &str) -> Self {
        match name.chars().next() {
            Some(c) if c.is_uppercase() => Visibility::Public,
            _ => Visibility::Private,
        }
    }

    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// A top-level declaration with its position metadata.
///
/// `span.start` is the declaration's position (its leading keyword). The doc
/// comment, when present, sits before `span.start` and travels with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub id: DeclId,
    pub span: Span,
    pub doc: Option<Span>,
    pub kind: DeclKind,
}

impl Declaration {
    pub fn pos(&self) -> usize {
        self.span.start
    }

    /// Doc comment (if any) through the end of the declaration.
    pub fn full_span(&self) -> Span {
        match self.doc {
            Some(doc) => Span::new(doc.start.min(self.span.start), self.span.end),
            None => self.span,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            DeclKind::Type(t) => t.specs.first().map(|s| s.name.as_str()),
            DeclKind::Func(f) => Some(f.name.as_str()),
            DeclKind::Other(o) => o.name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    Type(TypeDecl),
    Func(FuncDecl),
    Other(OtherDecl),
}

/// A `type` declaration. Grouped declarations carry one spec per name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub specs: Vec<TypeSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: String,
    /// Byte offset of the type name.
    pub pos: usize,
    pub shape: TypeShape,
}

impl TypeSpec {
    pub fn is_struct(&self) -> bool {
        matches!(self.shape, TypeShape::Struct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Struct,
    Interface,
    Alias,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: String,
    pub receiver: Option<Receiver>,
    pub results: Vec<TypeRef>,
}

impl FuncDecl {
    pub fn visibility(&self) -> Visibility {
        Visibility::of(&self.name)
    }
}

/// Receiver parameter list of a method, one entry per declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    pub params: Vec<TypeRef>,
}

/// Syntactic shape of a type expression, as far as ordering cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Ident(String),
    Pointer(Box<TypeRef>),
    Qualified { package: String, name: String },
    Generic { base: Box<TypeRef>, args: String },
    Other(String),
}

impl TypeRef {
    /// Unwraps pointer indirection and returns the plain identifier, if any.
    pub fn resolve_ident(&self) -> Option<&str> {
        match self {
            TypeRef::Ident(name) => Some(name),
            TypeRef::Pointer(inner) => inner.resolve_ident(),
            TypeRef::Qualified { .. } | TypeRef::Generic { .. } | TypeRef::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherDecl {
    pub kind: OtherKind,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtherKind {
    Const,
    Var,
}
