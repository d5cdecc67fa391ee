//! Syntax cache — memoized declarations and in-progress markers.
//!
//! Every object type gets a marker (a shallow declaration without children)
//! before its fields are visited. A cycle back to the type finds the marker
//! and stops there; the marker is replaced by the complete declaration once
//! the type finishes.
//!
//! Every new key is journaled. A failed top-level call rolls the journal back
//! to its [`Checkpoint`], so declarations completed on top of a failed type
//! never outlive the failure.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use super::syntax::SyntaxDeclaration;
use crate::model::{EntityKind, TypeId};

/// Cache key of a resolved declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A top-level entity.
    Entity { kind: EntityKind, name: Arc<str> },
    /// A parameter of an entity.
    Parameter {
        kind: EntityKind,
        owner: Arc<str>,
        name: Arc<str>,
    },
    /// An identified type under a namespace.
    Type {
        identity: Arc<str>,
        namespace: Arc<str>,
    },
    /// An anonymous type, keyed by its path from the nearest named ancestor.
    Anonymous {
        ty: TypeId,
        namespace: Arc<str>,
        anchor: Arc<str>,
    },
    /// A value of a type held by a named field, resolved on its own.
    Field {
        ty: TypeId,
        name: Arc<str>,
        namespace: Arc<str>,
    },
}

impl CacheKey {
    pub fn entity(kind: EntityKind, name: &Arc<str>) -> Self {
        CacheKey::Entity {
            kind,
            name: name.clone(),
        }
    }

    pub fn parameter(kind: EntityKind, owner: &Arc<str>, name: &Arc<str>) -> Self {
        CacheKey::Parameter {
            kind,
            owner: owner.clone(),
            name: name.clone(),
        }
    }
}

/// How a type identity was placed when it was first seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Written only as an attribute.
    AttributeOnly,
    /// Can be written as a child element.
    Child,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::AttributeOnly => "attribute-only",
            Placement::Child => "child element",
        }
    }
}

/// Journal position to roll back to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    entries: usize,
    placements: usize,
}

/// Memoized declarations of one resolver.
#[derive(Debug, Default)]
pub struct SyntaxCache {
    entries: FxHashMap<CacheKey, Arc<SyntaxDeclaration>>,
    in_progress: FxHashSet<CacheKey>,
    /// Type identity -> (first placement, path where it was seen).
    placements: FxHashMap<Arc<str>, (Placement, Arc<str>)>,
    /// Keys added since the oldest open checkpoint, in insertion order.
    entry_journal: Vec<CacheKey>,
    placement_journal: Vec<Arc<str>>,
}

impl SyntaxCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<SyntaxDeclaration>> {
        self.entries.get(key).cloned()
    }

    /// Store a finished declaration.
    pub fn insert(&mut self, key: CacheKey, declaration: Arc<SyntaxDeclaration>) {
        self.store(key, declaration);
    }

    /// Publish `marker` for `key` while its structure is being built.
    pub fn begin(&mut self, key: CacheKey, marker: Arc<SyntaxDeclaration>) {
        self.in_progress.insert(key.clone());
        self.store(key, marker);
    }

    fn store(&mut self, key: CacheKey, declaration: Arc<SyntaxDeclaration>) {
        if self.entries.insert(key.clone(), declaration).is_none() {
            self.entry_journal.push(key);
        }
    }

    /// Replace the marker with the complete declaration.
    pub fn complete(&mut self, key: CacheKey, declaration: Arc<SyntaxDeclaration>) {
        self.in_progress.remove(&key);
        self.store(key, declaration);
    }

    /// Drop the marker of a failed resolution.
    pub fn abandon(&mut self, key: &CacheKey) {
        self.in_progress.remove(key);
        self.entries.remove(key);
    }

    pub fn is_in_progress(&self, key: &CacheKey) -> bool {
        self.in_progress.contains(key)
    }

    /// Record where a type identity was placed.
    ///
    /// Returns the earlier placement and its path if it contradicts this one.
    pub fn record_placement(
        &mut self,
        identity: &Arc<str>,
        placement: Placement,
        path: Arc<str>,
    ) -> Option<(Placement, Arc<str>)> {
        match self.placements.get(identity) {
            Some((previous, at)) if *previous != placement => Some((*previous, at.clone())),
            Some(_) => None,
            None => {
                self.placements.insert(identity.clone(), (placement, path));
                self.placement_journal.push(identity.clone());
                None
            }
        }
    }

    /// Mark the current journal position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            entries: self.entry_journal.len(),
            placements: self.placement_journal.len(),
        }
    }

    /// Keep everything added since `checkpoint`.
    pub fn commit(&mut self, checkpoint: Checkpoint) {
        if checkpoint.entries == 0 && checkpoint.placements == 0 {
            self.entry_journal.clear();
            self.placement_journal.clear();
        }
    }

    /// Forget every key and placement added since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        for key in self.entry_journal.drain(checkpoint.entries..) {
            self.in_progress.remove(&key);
            self.entries.remove(&key);
        }
        for identity in self.placement_journal.drain(checkpoint.placements..) {
            self.placements.remove(&identity);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.in_progress.clear();
        self.placements.clear();
        self.entry_journal.clear();
        self.placement_journal.clear();
    }
}
