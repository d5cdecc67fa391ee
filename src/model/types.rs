//! Metadata type graph.
//!
//! Types live in an arena ([`TypeGraph`]) and reference each other through
//! [`TypeId`]s, so self-referential and mutually recursive shapes need no
//! shared ownership. A recursive object is built by adding the node first and
//! then closing the cycle with [`TypeGraph::push_field`].

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::dsl::ElementDslModel;

// ============================================================================
// IDS & ERRORS
// ============================================================================

/// Index of a node in a [`TypeGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised while building a type graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Two nodes of one graph claim the same identity.
    #[error("type identity '{0}' is already declared in this graph")]
    DuplicateIdentity(String),

    /// A [`TypeId`] that does not belong to the graph.
    #[error("unknown type {0}")]
    UnknownType(TypeId),

    /// Fields were pushed onto a node that is not an object.
    #[error("type {0} is not an object type")]
    NotAnObject(TypeId),
}

// ============================================================================
// TYPE NODES
// ============================================================================

/// Built-in scalar kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    DateTime,
    Binary,
    Any,
    Enum(Arc<[Arc<str>]>),
}

impl PrimitiveKind {
    /// Label used as generic key for anonymous primitive items.
    pub fn label(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::DateTime => "date-time",
            PrimitiveKind::Binary => "binary",
            PrimitiveKind::Any => "any",
            PrimitiveKind::Enum(_) => "enum",
        }
    }
}

/// A field of an object type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectField {
    pub key: Arc<str>,
    pub value: TypeId,
    /// Inline the referenced object's fields into the enclosing element.
    pub flattened: bool,
    /// The field's content is element body text.
    pub text: bool,
    pub required: bool,
    pub dsl: ElementDslModel,
}

impl ObjectField {
    pub fn new(key: impl Into<Arc<str>>, value: TypeId) -> Self {
        Self {
            key: key.into(),
            value,
            flattened: false,
            text: false,
            required: false,
            dsl: ElementDslModel::default(),
        }
    }

    pub fn flattened(mut self) -> Self {
        self.flattened = true;
        self
    }

    pub fn text(mut self) -> Self {
        self.text = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_dsl(mut self, dsl: ElementDslModel) -> Self {
        self.dsl = dsl;
        self
    }
}

/// Ordered fields of an object type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectType {
    pub fields: Vec<ObjectField>,
}

/// Structural shape of a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    Object(ObjectType),
    Array(TypeId),
    Map(TypeId),
    Union(Vec<TypeId>),
}

/// Semantic markers attached to a type node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeAnnotations {
    /// Stable identifier; `None` for anonymous types.
    pub identity: Option<Arc<str>>,
    /// Open for sub-typing.
    pub extensible: bool,
    pub instantiable: bool,
    /// Values are element body text.
    pub text: bool,
    /// The type opts in to global (top-level) declaration.
    pub allows_top_level: bool,
}

/// One node of the metadata type graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataType {
    pub kind: TypeKind,
    pub annotations: TypeAnnotations,
}

impl MetadataType {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self {
            kind: TypeKind::Primitive(kind),
            annotations: TypeAnnotations::default(),
        }
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    pub fn number() -> Self {
        Self::primitive(PrimitiveKind::Number)
    }

    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Boolean)
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let values: Vec<Arc<str>> = values.into_iter().map(Into::into).collect();
        Self::primitive(PrimitiveKind::Enum(values.into()))
    }

    /// An identified object type with no fields yet.
    pub fn object(identity: impl Into<Arc<str>>) -> Self {
        Self::anonymous_object().with_identity(identity)
    }

    pub fn anonymous_object() -> Self {
        Self {
            kind: TypeKind::Object(ObjectType::default()),
            annotations: TypeAnnotations::default(),
        }
    }

    pub fn array(item: TypeId) -> Self {
        Self {
            kind: TypeKind::Array(item),
            annotations: TypeAnnotations::default(),
        }
    }

    pub fn map(value: TypeId) -> Self {
        Self {
            kind: TypeKind::Map(value),
            annotations: TypeAnnotations::default(),
        }
    }

    pub fn union(variants: Vec<TypeId>) -> Self {
        Self {
            kind: TypeKind::Union(variants),
            annotations: TypeAnnotations::default(),
        }
    }

    pub fn with_identity(mut self, identity: impl Into<Arc<str>>) -> Self {
        self.annotations.identity = Some(identity.into());
        self
    }

    pub fn with_fields(mut self, fields: Vec<ObjectField>) -> Self {
        if let TypeKind::Object(object) = &mut self.kind {
            object.fields = fields;
        }
        self
    }

    pub fn instantiable(mut self) -> Self {
        self.annotations.instantiable = true;
        self
    }

    pub fn extensible(mut self) -> Self {
        self.annotations.extensible = true;
        self
    }

    pub fn text(mut self) -> Self {
        self.annotations.text = true;
        self
    }

    pub fn top_level(mut self) -> Self {
        self.annotations.allows_top_level = true;
        self
    }

    pub fn identity(&self) -> Option<&Arc<str>> {
        self.annotations.identity.as_ref()
    }

    pub fn object_type(&self) -> Option<&ObjectType> {
        match &self.kind {
            TypeKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, TypeKind::Object(_))
    }

    /// Instantiable and declares at least one field.
    pub fn is_valid_bean(&self) -> bool {
        self.annotations.instantiable
            && self
                .object_type()
                .is_some_and(|object| !object.fields.is_empty())
    }

    /// Can be declared as a global element: identified, instantiable, opted in.
    pub fn supports_top_level(&self) -> bool {
        self.identity().is_some()
            && self.annotations.allows_top_level
            && self.is_valid_bean()
    }

    /// Key used for generic entries: the identity, or a kind label.
    pub fn type_key(&self) -> Arc<str> {
        if let Some(identity) = self.identity() {
            return identity.clone();
        }
        let label = match &self.kind {
            TypeKind::Primitive(kind) => kind.label(),
            TypeKind::Object(_) => "object",
            TypeKind::Array(_) => "array",
            TypeKind::Map(_) => "map",
            TypeKind::Union(_) => "union",
        };
        Arc::from(label)
    }
}

// ============================================================================
// TYPE GRAPH
// ============================================================================

/// Arena holding every type node of one extension.
#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    types: Vec<MetadataType>,
    /// Identity -> node; identities are unique within a graph.
    by_identity: FxHashMap<Arc<str>, TypeId>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, registering its identity.
    pub fn add(&mut self, ty: MetadataType) -> Result<TypeId, ModelError> {
        let id = TypeId::new(self.types.len() as u32);
        if let Some(identity) = ty.identity() {
            if self.by_identity.contains_key(identity) {
                return Err(ModelError::DuplicateIdentity(identity.to_string()));
            }
            self.by_identity.insert(identity.clone(), id);
        }
        self.types.push(ty);
        Ok(id)
    }

    pub fn get(&self, id: TypeId) -> Option<&MetadataType> {
        self.types.get(id.index())
    }

    pub fn by_identity(&self, identity: &str) -> Option<TypeId> {
        self.by_identity.get(identity).copied()
    }

    /// Append a field to an existing object node (used to close cycles).
    pub fn push_field(&mut self, id: TypeId, field: ObjectField) -> Result<(), ModelError> {
        match self.types.get_mut(id.index()) {
            Some(MetadataType {
                kind: TypeKind::Object(object),
                ..
            }) => {
                object.fields.push(field);
                Ok(())
            }
            Some(_) => Err(ModelError::NotAnObject(id)),
            None => Err(ModelError::UnknownType(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &MetadataType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(idx, ty)| (TypeId::new(idx as u32), ty))
    }

    /// A primitive that can be written as a plain attribute value.
    pub fn is_attribute_primitive(&self, id: TypeId) -> bool {
        self.get(id)
            .is_some_and(|ty| ty.is_primitive() && !ty.annotations.text)
    }

    /// Whether a value of this type can be written inline as an attribute.
    ///
    /// Objects qualify when instantiable and every field is an attribute
    /// primitive; collections and unions when their element types are.
    pub fn is_simple(&self, id: TypeId) -> bool {
        let Some(ty) = self.get(id) else {
            return false;
        };
        match &ty.kind {
            TypeKind::Primitive(_) => !ty.annotations.text,
            TypeKind::Object(object) => {
                ty.annotations.instantiable
                    && object
                        .fields
                        .iter()
                        .all(|field| !field.text && self.is_attribute_primitive(field.value))
            }
            TypeKind::Array(item) | TypeKind::Map(item) => self.is_attribute_primitive(*item),
            TypeKind::Union(variants) => variants
                .iter()
                .all(|variant| self.is_attribute_primitive(*variant)),
        }
    }
}
