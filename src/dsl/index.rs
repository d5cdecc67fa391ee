//! Type index — sub-type and import lookups for one extension.
//!
//! Built once per resolver from the extension's sub-type and imported-type
//! declarations; read-only afterwards.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::model::{ExtensionModel, TypeId};

/// Precomputed type relations of one extension.
#[derive(Clone, Debug, Default)]
pub struct TypeIndex {
    /// Base type -> concrete sub-types, in declaration order.
    sub_types: FxHashMap<TypeId, Vec<TypeId>>,
    /// Imported type identity -> owning extension name.
    owners: FxHashMap<Arc<str>, Arc<str>>,
}

impl TypeIndex {
    pub fn new(extension: &ExtensionModel) -> Self {
        let mut index = Self::default();

        for mapping in &extension.sub_types {
            let entry = index.sub_types.entry(mapping.base_type).or_default();
            for &sub in &mapping.sub_types {
                if !entry.contains(&sub) {
                    entry.push(sub);
                }
            }
        }

        for import in &extension.imported_types {
            let Some(identity) = extension.types.get(import.ty).and_then(|ty| ty.identity()) else {
                tracing::warn!(
                    "[DSL] Ignoring import of anonymous or unknown type {} from '{}' in '{}'",
                    import.ty,
                    import.owner,
                    extension.name
                );
                continue;
            };
            if import.owner == extension.name {
                continue;
            }
            index.owners.insert(identity.clone(), import.owner.clone());
        }

        tracing::trace!(
            "[DSL] Indexed '{}': {} base types, {} imports",
            extension.name,
            index.sub_types.len(),
            index.owners.len()
        );
        index
    }

    /// Concrete sub-types registered for `base`.
    pub fn sub_types_of(&self, base: TypeId) -> &[TypeId] {
        self.sub_types.get(&base).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_sub_types(&self, base: TypeId) -> bool {
        !self.sub_types_of(base).is_empty()
    }

    /// Owning extension of an imported type.
    pub fn owner_of(&self, identity: &str) -> Option<&Arc<str>> {
        self.owners.get(identity)
    }

    pub fn imported_count(&self) -> usize {
        self.owners.len()
    }
}
