//! # dsl-syntax-base
//!
//! Core library for turning extension models (configurations, connection
//! providers, operations, sources and their parameters) into declarative
//! element/attribute syntax.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! dsl       → Syntax resolver, cache, type index, resolving context
//!   ↓
//! model     → Metadata type graph and extension model (inputs)
//!   ↓
//! base      → Naming primitives (hyphenize, singularize, type names)
//! ```

// ============================================================================
// MODULES (dependency order: base → model → dsl)
// ============================================================================

/// Foundation: naming rules and shared constants
pub mod base;

/// Inputs: metadata type graph and extension model
pub mod model;

/// DSL syntax resolution
pub mod dsl;

// Re-export the types most callers need
pub use dsl::{
    DslError, DslResolvingContext, DslSyntaxResolver, ExtensionRegistry, ExtensionSyntax,
    Namespace, ResolverOptions, SyntaxDeclaration, SyntaxProblem, resolve_extensions,
};
pub use model::{ExtensionModel, MetadataType, TypeGraph, TypeId};
