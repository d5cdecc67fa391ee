//! DSL syntax resolution.
//!
//! Turns the entities of an [`ExtensionModel`](crate::model::ExtensionModel)
//! into [`SyntaxDeclaration`] trees: element and attribute names, namespace,
//! where each value may be written, and how polymorphic and recursive types
//! are laid out.
//!
//! ## Module Structure
//!
//! - [`resolve`] - The resolver and per-extension results
//! - [`batch`] - Parallel resolution of several extensions
//! - [`syntax`] - Output declarations and their builder
//! - [`cache`] - Memoized declarations and in-progress markers
//! - [`index`] - Sub-type and import lookups
//! - [`context`] - Extensions visible to a resolution
//! - [`diagnostics`] - Non-fatal problems
//! - [`error`] - Fatal errors
//! - [`options`] - Resolver options

pub mod batch;
pub mod cache;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod options;
pub mod resolve;
pub mod syntax;

pub use batch::resolve_extensions;
pub use cache::{CacheKey, Checkpoint, Placement, SyntaxCache};
pub use context::{DslResolvingContext, ExtensionRegistry};
pub use diagnostics::{ProblemCollector, Severity, SyntaxProblem, codes};
pub use error::DslError;
pub use index::TypeIndex;
pub use options::ResolverOptions;
pub use resolve::{DslSyntaxResolver, ExtensionSyntax};
pub use syntax::{Namespace, SyntaxBuilder, SyntaxDeclaration, SyntaxMap};
