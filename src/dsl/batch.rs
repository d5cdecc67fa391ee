//! Parallel resolution of several extensions.

use rayon::prelude::*;

use super::context::DslResolvingContext;
use super::error::DslError;
use super::options::ResolverOptions;
use super::resolve::{DslSyntaxResolver, ExtensionSyntax};

/// Resolve each named extension of `context` on the rayon pool.
///
/// Every extension gets its own resolver and cache; the context is shared
/// read-only. Results come back in the order of `names`.
pub fn resolve_extensions<C>(
    context: &C,
    names: &[&str],
    options: &ResolverOptions,
) -> Vec<Result<ExtensionSyntax, DslError>>
where
    C: DslResolvingContext + Sync,
{
    tracing::debug!("[DSL] Resolving {} extensions in parallel", names.len());

    names
        .par_iter()
        .map(|name| {
            let extension =
                context
                    .lookup_extension(name)
                    .ok_or_else(|| DslError::ExtensionNotFound {
                        name: name.to_string(),
                    })?;
            DslSyntaxResolver::with_options(extension, context, options.clone())
                .resolve_extension()
        })
        .collect()
}
