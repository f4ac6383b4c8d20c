//! Type descriptors.
//!
//! A codec never inspects Rust values at runtime. Instead every encodable
//! shape is described by a [`TypeDescriptor`]: primitives, sequences,
//! optionals and composites (records with named fields). The registry and
//! strategy builders only ever talk to descriptors.

use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// Category of a described type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Bool,
    /// Unsigned integer up to 128 bits
    Uint,
    /// Raw byte string
    Bytes,
    /// UTF-8 string
    String,
    /// Variable-length list of one element type
    Sequence,
    /// Element type that may be absent
    Optional,
    /// Record with declared fields
    Composite,
}

impl TypeKind {
    /// Kinds whose wire form is an RLP list rather than a string.
    pub fn is_list_like(self) -> bool {
        matches!(self, TypeKind::Sequence | TypeKind::Composite)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeKind::Bool => "bool",
            TypeKind::Uint => "uint",
            TypeKind::Bytes => "bytes",
            TypeKind::String => "string",
            TypeKind::Sequence => "sequence",
            TypeKind::Optional => "optional",
            TypeKind::Composite => "composite",
        };
        write!(f, "{s}")
    }
}

/// Structural identity of a type.
///
/// Composites are nominal: two composites are the same type iff they share
/// a qualified path and identical generic arguments. Everything else is
/// identified by its shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeIdentity {
    Primitive(TypeKind),
    Sequence(Box<TypeIdentity>),
    Optional(Box<TypeIdentity>),
    Named {
        path: Arc<str>,
        args: Vec<TypeIdentity>,
    },
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeIdentity::Primitive(kind) => write!(f, "{kind}"),
            TypeIdentity::Sequence(elem) => write!(f, "[]{elem}"),
            TypeIdentity::Optional(elem) => write!(f, "*{elem}"),
            TypeIdentity::Named { path, args } if args.is_empty() => write!(f, "{path}"),
            TypeIdentity::Named { path, args } => {
                let parts: Vec<_> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{path}<{}>", parts.join(", "))
            }
        }
    }
}

/// Capability surface every describable type implements.
pub trait TypeDescriptor: Send + Sync + fmt::Debug {
    /// Identity used as the cache key component.
    fn identity(&self) -> TypeIdentity;

    fn kind(&self) -> TypeKind;

    /// Element type of a sequence or optional.
    fn element_type(&self) -> Option<TypeRef> {
        None
    }

    /// Declared fields of a composite, in declaration order.
    fn describe_fields(&self) -> Vec<FieldDecl> {
        Vec::new()
    }
}

/// Shared handle to a descriptor.
pub type TypeRef = Arc<dyn TypeDescriptor>;

/// Whether a field is accessible outside its declaring module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// Type of a field, possibly produced lazily.
///
/// Deferred types make self-referential graphs constructible: a `Node`
/// whose children are `Node`s names its own constructor instead of
/// holding an instance of itself.
#[derive(Clone)]
pub enum FieldType {
    Resolved(TypeRef),
    Deferred(fn() -> TypeRef),
}

impl FieldType {
    pub fn get(&self) -> TypeRef {
        match self {
            FieldType::Resolved(ty) => Arc::clone(ty),
            FieldType::Deferred(make) => make(),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Resolved(ty) => write!(f, "{}", ty.identity()),
            FieldType::Deferred(_) => write!(f, "<deferred>"),
        }
    }
}

/// A declared field of a composite type.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub visibility: Visibility,
    /// Raw modifier annotation, e.g. `"nil"` or `"tail"`
    pub annotation: String,
    pub ty: FieldType,
}

impl FieldDecl {
    /// A public field without modifiers.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            annotation: String::new(),
            ty: FieldType::Resolved(ty),
        }
    }

    /// A public field whose type is built on demand.
    pub fn deferred(name: impl Into<String>, make: fn() -> TypeRef) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            annotation: String::new(),
            ty: FieldType::Deferred(make),
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn ty(&self) -> TypeRef {
        self.ty.get()
    }
}

// ─── Built-in descriptors ─────────────────────────────────────────────────────

/// Scalar types.
#[derive(Debug, Clone, Copy)]
pub struct Primitive(TypeKind);

impl Primitive {
    pub fn bool() -> TypeRef {
        Arc::new(Primitive(TypeKind::Bool))
    }

    pub fn uint() -> TypeRef {
        Arc::new(Primitive(TypeKind::Uint))
    }

    pub fn bytes() -> TypeRef {
        Arc::new(Primitive(TypeKind::Bytes))
    }

    pub fn string() -> TypeRef {
        Arc::new(Primitive(TypeKind::String))
    }
}

impl TypeDescriptor for Primitive {
    fn identity(&self) -> TypeIdentity {
        TypeIdentity::Primitive(self.0)
    }

    fn kind(&self) -> TypeKind {
        self.0
    }
}

/// Variable-length list of `elem`.
#[derive(Debug, Clone)]
pub struct SequenceType {
    elem: TypeRef,
}

impl SequenceType {
    pub fn of(elem: TypeRef) -> TypeRef {
        Arc::new(SequenceType { elem })
    }
}

impl TypeDescriptor for SequenceType {
    fn identity(&self) -> TypeIdentity {
        TypeIdentity::Sequence(Box::new(self.elem.identity()))
    }

    fn kind(&self) -> TypeKind {
        TypeKind::Sequence
    }

    fn element_type(&self) -> Option<TypeRef> {
        Some(Arc::clone(&self.elem))
    }
}

/// `elem` or nothing.
#[derive(Debug, Clone)]
pub struct OptionalType {
    elem: TypeRef,
}

impl OptionalType {
    pub fn of(elem: TypeRef) -> TypeRef {
        Arc::new(OptionalType { elem })
    }
}

impl TypeDescriptor for OptionalType {
    fn identity(&self) -> TypeIdentity {
        TypeIdentity::Optional(Box::new(self.elem.identity()))
    }

    fn kind(&self) -> TypeKind {
        TypeKind::Optional
    }

    fn element_type(&self) -> Option<TypeRef> {
        Some(Arc::clone(&self.elem))
    }
}

/// A record type with named, ordered fields.
///
/// ```ignore
/// let header = CompositeType::new("chain::Header")
///     .field(FieldDecl::new("Number", Primitive::uint()))
///     .field(FieldDecl::new("Extra", Primitive::bytes()).annotated("nil"))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct CompositeType {
    path: Arc<str>,
    args: Vec<TypeRef>,
    fields: Vec<FieldDecl>,
}

impl CompositeType {
    pub fn new(path: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Adds a generic argument. Different arguments make a different type.
    pub fn arg(mut self, ty: TypeRef) -> Self {
        self.args.push(ty);
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> TypeRef {
        Arc::new(self)
    }
}

impl TypeDescriptor for CompositeType {
    fn identity(&self) -> TypeIdentity {
        TypeIdentity::Named {
            path: Arc::clone(&self.path),
            args: self.args.iter().map(|a| a.identity()).collect(),
        }
    }

    fn kind(&self) -> TypeKind {
        TypeKind::Composite
    }

    fn describe_fields(&self) -> Vec<FieldDecl> {
        self.fields.clone()
    }
}
