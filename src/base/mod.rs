//! Foundation types for DSL syntax resolution.
//!
//! This module provides the naming rules used throughout the resolver:
//! - [`hyphenize`] - camelCase to element-name conversion
//! - [`singularize`] - explicit-opt-in singular form for collection items
//! - [`top_level_type_name`] - element name for a global type
//! - Reserved constants (generic keys, default group name)
//!
//! This module has NO dependencies on other modules of this crate.

pub mod constants;
mod naming;

pub use naming::{hyphenize, sanitize_identity, singularize, top_level_type_name};
