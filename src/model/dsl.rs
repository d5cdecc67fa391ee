//! Per-parameter and per-field DSL hints.

/// Whether a parameter accepts expressions as its value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExpressionSupport {
    #[default]
    Supported,
    NotSupported,
    Required,
}

impl ExpressionSupport {
    /// Whether an inline expression may be written for this parameter.
    pub fn allows_expressions(&self) -> bool {
        !matches!(self, ExpressionSupport::NotSupported)
    }
}

/// Role a parameter plays in its owning component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParameterRole {
    /// Regular configuration value.
    #[default]
    Behaviour,
    /// Payload-like content, written as element body.
    Content,
    /// The component's main content.
    PrimaryContent,
}

impl ParameterRole {
    /// Content roles are rendered as body text and never as attributes.
    pub fn is_content(&self) -> bool {
        !matches!(self, ParameterRole::Behaviour)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterRole::Behaviour => "BEHAVIOUR",
            ParameterRole::Content => "CONTENT",
            ParameterRole::PrimaryContent => "PRIMARY_CONTENT",
        }
    }
}

/// Presentation hints for a parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutModel {
    /// The value is long-form text and goes in an element body.
    pub text: bool,
    pub password: bool,
    pub order: Option<u32>,
    pub tab_name: Option<String>,
}

impl LayoutModel {
    pub fn text() -> Self {
        Self {
            text: true,
            ..Self::default()
        }
    }
}

/// DSL hints controlling how a parameter or field may be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementDslModel {
    /// An object value may be defined inline as a child element.
    pub allows_inline_definition: bool,
    /// The attribute form may reference a globally declared element.
    pub allows_references: bool,
    /// The value's type may be declared as a global element.
    pub allow_top_level_definition: bool,
    /// Collection items are named with the singular form of the collection.
    pub singularizable: bool,
}

impl Default for ElementDslModel {
    fn default() -> Self {
        Self {
            allows_inline_definition: true,
            allows_references: true,
            allow_top_level_definition: false,
            singularizable: false,
        }
    }
}

impl ElementDslModel {
    pub fn singularizable() -> Self {
        Self {
            singularizable: true,
            ..Self::default()
        }
    }
}
