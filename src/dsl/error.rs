//! Error types for DSL syntax resolution.

use thiserror::Error;

use super::diagnostics::codes;
use crate::model::TypeId;

/// Fatal resolution errors.
///
/// Any of these aborts the current top-level resolution; no partially built
/// declaration is returned alongside it. Paths are `/`-separated and start at
/// the entity (or type) the call began with.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DslError {
    /// The extension has no namespace model.
    #[error("extension '{extension}' does not declare the {property} required for DSL resolution")]
    MissingRequiredModelProperty {
        extension: String,
        property: &'static str,
    },

    /// An imported type's owner is not in the resolving context.
    #[error(
        "type '{type_id}' is imported from extension '{owner}', which is not present in the resolving context (at '{path}')"
    )]
    UnresolvedImport {
        type_id: String,
        owner: String,
        path: String,
    },

    /// A type without identity reaches itself.
    #[error("anonymous type recurses into itself at '{path}'")]
    UnboundedAnonymousRecursion { path: String },

    /// Contradictory attribute/child placement, raised only when problems are
    /// configured to be fatal.
    #[error("parameter '{parameter}' of '{entity}': {message}")]
    AmbiguousAttributeChild {
        entity: String,
        parameter: String,
        message: String,
    },

    /// Two children of one element resolve to the same name.
    #[error("name '{name}' is declared more than once under '{path}'")]
    NameCollision { name: String, path: String },

    /// A type reference that does not belong to the extension's graph.
    #[error("unknown type {id} referenced at '{path}'")]
    UnknownType { id: TypeId, path: String },

    /// The extension to resolve is not in the resolving context.
    #[error("extension '{name}' is not present in the resolving context")]
    ExtensionNotFound { name: String },
}

impl DslError {
    /// Diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            DslError::MissingRequiredModelProperty { .. } => codes::MISSING_MODEL_PROPERTY,
            DslError::UnresolvedImport { .. } => codes::UNRESOLVED_IMPORT,
            DslError::UnboundedAnonymousRecursion { .. } => codes::ANONYMOUS_RECURSION,
            DslError::AmbiguousAttributeChild { .. } => codes::AMBIGUOUS_ATTRIBUTE_CHILD,
            DslError::NameCollision { .. } => codes::NAME_COLLISION,
            DslError::UnknownType { .. } => codes::UNKNOWN_TYPE,
            DslError::ExtensionNotFound { .. } => codes::EXTENSION_NOT_FOUND,
        }
    }
}
