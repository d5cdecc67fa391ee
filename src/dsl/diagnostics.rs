//! Diagnostics — non-fatal problems found while resolving.
//!
//! Problems are collected rather than raised; the caller decides whether any
//! of them should fail the build (see `ResolverOptions::problems_as_errors`).

use std::fmt;
use std::sync::Arc;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A problem attached to an entity and a path inside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxProblem {
    pub code: &'static str,
    pub severity: Severity,
    /// Name of the entity being resolved.
    pub entity: Arc<str>,
    /// `/`-separated path from the entity to the offending member.
    pub path: Arc<str>,
    pub message: Arc<str>,
}

impl SyntaxProblem {
    pub fn warning(
        code: &'static str,
        entity: impl Into<Arc<str>>,
        path: impl Into<Arc<str>>,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            entity: entity.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn error(
        code: &'static str,
        entity: impl Into<Arc<str>>,
        path: impl Into<Arc<str>>,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(code, entity, path, message)
        }
    }
}

impl fmt::Display for SyntaxProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity.as_str(),
            self.code,
            self.path,
            self.message
        )
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Codes shared by [`SyntaxProblem`]s and `DslError`s.
pub mod codes {
    /// Extension lacks its XML DSL model.
    pub const MISSING_MODEL_PROPERTY: &str = "D0001";
    /// Imported type's owner is unknown.
    pub const UNRESOLVED_IMPORT: &str = "D0002";
    /// Anonymous type recurses into itself.
    pub const ANONYMOUS_RECURSION: &str = "D0003";
    /// Attribute-only and child-only placements of one type.
    pub const AMBIGUOUS_ATTRIBUTE_CHILD: &str = "D0004";
    /// Two children with the same name.
    pub const NAME_COLLISION: &str = "D0005";
    /// Type id outside the extension's graph.
    pub const UNKNOWN_TYPE: &str = "D0006";
    /// Extension missing from the resolving context.
    pub const EXTENSION_NOT_FOUND: &str = "D0007";
    /// Flattened field of a wrapped type kept as its own element.
    pub const UNFLATTENED_POLYMORPHIC_FIELD: &str = "D0008";
}

// ============================================================================
// PROBLEM COLLECTOR
// ============================================================================

/// Collects problems during one resolution pass.
#[derive(Clone, Debug, Default)]
pub struct ProblemCollector {
    problems: Vec<SyntaxProblem>,
}

impl ProblemCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, problem: SyntaxProblem) {
        self.problems.push(problem);
    }

    pub fn problems(&self) -> &[SyntaxProblem] {
        &self.problems
    }

    /// Drop problems collected after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.problems.truncate(len);
    }

    /// Drain every collected problem.
    pub fn take(&mut self) -> Vec<SyntaxProblem> {
        std::mem::take(&mut self.problems)
    }

    pub fn has_errors(&self) -> bool {
        self.problems
            .iter()
            .any(|problem| problem.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}
