//! Resolver options.

/// Knobs controlling a [`DslSyntaxResolver`](super::DslSyntaxResolver).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Turn collected problems (e.g. ambiguous attribute/child placement)
    /// into errors that abort the resolution.
    pub problems_as_errors: bool,
    /// Include a source's success and error callback parameters among its
    /// children.
    pub include_source_callbacks: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            problems_as_errors: false,
            include_source_callbacks: true,
        }
    }
}

impl ResolverOptions {
    pub fn strict() -> Self {
        Self {
            problems_as_errors: true,
            ..Self::default()
        }
    }

    pub fn without_source_callbacks(mut self) -> Self {
        self.include_source_callbacks = false;
        self
    }
}
