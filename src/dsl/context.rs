//! Resolving context — the set of extensions visible to a resolution.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::model::ExtensionModel;

/// Lookup of extensions by name.
///
/// Used to find the owner of an imported type so its namespace can be applied.
pub trait DslResolvingContext {
    fn lookup_extension(&self, name: &str) -> Option<&ExtensionModel>;
}

impl<C: DslResolvingContext + ?Sized> DslResolvingContext for &C {
    fn lookup_extension(&self, name: &str) -> Option<&ExtensionModel> {
        (**self).lookup_extension(name)
    }
}

/// In-memory registry of extensions, in registration order.
#[derive(Clone, Debug, Default)]
pub struct ExtensionRegistry {
    extensions: IndexMap<Arc<str>, Arc<ExtensionModel>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension, replacing any previous one with the same name.
    pub fn register(&mut self, extension: ExtensionModel) -> Arc<ExtensionModel> {
        self.register_shared(Arc::new(extension))
    }

    pub fn register_shared(&mut self, extension: Arc<ExtensionModel>) -> Arc<ExtensionModel> {
        if self
            .extensions
            .insert(extension.name.clone(), extension.clone())
            .is_some()
        {
            tracing::debug!("[DSL] Replaced extension '{}' in registry", extension.name);
        }
        extension
    }

    pub fn with(mut self, extension: ExtensionModel) -> Self {
        self.register(extension);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ExtensionModel>> {
        self.extensions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &Arc<str>> {
        self.extensions.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ExtensionModel>> {
        self.extensions.values()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl DslResolvingContext for ExtensionRegistry {
    fn lookup_extension(&self, name: &str) -> Option<&ExtensionModel> {
        self.extensions.get(name).map(Arc::as_ref)
    }
}
