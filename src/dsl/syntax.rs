//! Syntax declarations — the resolver's output.
//!
//! A [`SyntaxDeclaration`] is built in one step through [`SyntaxBuilder`] and
//! shared as `Arc` afterwards; nothing mutates it once built.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::base::constants::MAP_VALUE_KEY;
use crate::model::XmlDslModel;

/// Child or generic declarations keyed by name / type key, in model order.
pub type SyntaxMap = IndexMap<Arc<str>, Arc<SyntaxDeclaration>>;

// ============================================================================
// NAMESPACE
// ============================================================================

/// Namespace prefix and URI an element is emitted under.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub prefix: Arc<str>,
    pub uri: Arc<str>,
}

impl Namespace {
    pub fn new(prefix: impl Into<Arc<str>>, uri: impl Into<Arc<str>>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }

    /// No namespace: used by pure-attribute leaves.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.prefix.is_empty() && self.uri.is_empty()
    }
}

impl From<&XmlDslModel> for Namespace {
    fn from(model: &XmlDslModel) -> Self {
        Self::new(model.prefix.clone(), model.namespace_uri.clone())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.prefix, self.uri)
    }
}

// ============================================================================
// SYNTAX DECLARATION
// ============================================================================

/// Resolved naming and placement rules for one entity, parameter, field or type.
///
/// - `attribute_name` is non-empty iff the value can be written as an attribute.
/// - `element_name` is empty iff the value can never appear as a child element
///   (a pure-attribute leaf nested in an object).
/// - `wrapped` means the element introduces one extra level so any registered
///   sub-type can be substituted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyntaxDeclaration {
    attribute_name: Arc<str>,
    element_name: Arc<str>,
    namespace: Namespace,
    supports_attribute_declaration: bool,
    supports_child_declaration: bool,
    supports_top_level_declaration: bool,
    wrapped: bool,
    children: SyntaxMap,
    generics: SyntaxMap,
}

impl SyntaxDeclaration {
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// Namespace prefix (e.g. `mockns`).
    pub fn namespace(&self) -> &str {
        &self.namespace.prefix
    }

    pub fn namespace_uri(&self) -> &str {
        &self.namespace.uri
    }

    pub fn full_namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn supports_attribute_declaration(&self) -> bool {
        self.supports_attribute_declaration
    }

    pub fn supports_child_declaration(&self) -> bool {
        self.supports_child_declaration
    }

    pub fn supports_top_level_declaration(&self) -> bool {
        self.supports_top_level_declaration
    }

    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    /// Look up a child by its declared (not hyphenized) name.
    pub fn child(&self, name: &str) -> Option<&Arc<SyntaxDeclaration>> {
        self.children.get(name)
    }

    pub fn children(&self) -> &SyntaxMap {
        &self.children
    }

    /// Look up a generic entry by type key.
    pub fn generic(&self, key: &str) -> Option<&Arc<SyntaxDeclaration>> {
        self.generics.get(key)
    }

    pub fn generics(&self) -> &SyntaxMap {
        &self.generics
    }

    /// Value declaration of a map-typed declaration.
    pub fn map_value(&self) -> Option<&Arc<SyntaxDeclaration>> {
        self.generics.get(MAP_VALUE_KEY)
    }

    pub fn has_generics(&self) -> bool {
        !self.generics.is_empty()
    }

    /// Qualified element name (`prefix:element`), or `None` for attribute leaves.
    pub fn qualified_element_name(&self) -> Option<String> {
        if self.element_name.is_empty() {
            return None;
        }
        if self.namespace.prefix.is_empty() {
            Some(self.element_name.to_string())
        } else {
            Some(format!("{}:{}", self.namespace.prefix, self.element_name))
        }
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// One-shot constructor for [`SyntaxDeclaration`].
#[derive(Debug, Default)]
pub struct SyntaxBuilder {
    declaration: SyntaxDeclaration,
}

impl SyntaxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.declaration.attribute_name = name.into();
        self
    }

    pub fn element_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.declaration.element_name = name.into();
        self
    }

    pub fn namespace(mut self, namespace: &Namespace) -> Self {
        self.declaration.namespace = namespace.clone();
        self
    }

    pub fn supports_attribute(mut self, supported: bool) -> Self {
        self.declaration.supports_attribute_declaration = supported;
        self
    }

    pub fn supports_child(mut self, supported: bool) -> Self {
        self.declaration.supports_child_declaration = supported;
        self
    }

    pub fn supports_top_level(mut self, supported: bool) -> Self {
        self.declaration.supports_top_level_declaration = supported;
        self
    }

    pub fn wrapped(mut self, wrapped: bool) -> Self {
        self.declaration.wrapped = wrapped;
        self
    }

    pub fn children(mut self, children: SyntaxMap) -> Self {
        self.declaration.children = children;
        self
    }

    pub fn generics(mut self, generics: SyntaxMap) -> Self {
        self.declaration.generics = generics;
        self
    }

    /// Copy structure (children, generics, wrapping) from a type declaration.
    pub fn structure_of(self, structure: &SyntaxDeclaration) -> Self {
        self.wrapped(structure.wrapped)
            .children(structure.children.clone())
            .generics(structure.generics.clone())
    }

    pub fn build(mut self) -> Arc<SyntaxDeclaration> {
        // An attribute name only makes sense when an attribute can be written.
        if !self.declaration.supports_attribute_declaration {
            self.declaration.attribute_name = Arc::from("");
        }
        Arc::new(self.declaration)
    }
}
