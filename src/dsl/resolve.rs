//! DSL syntax resolution — entities, parameters and types to element syntax.
//!
//! The resolver walks an extension's entities depth-first. Every object type
//! is cached under its identity (or, for anonymous types, under its path from
//! the nearest named ancestor) with an in-progress marker published before its
//! fields are visited, so any cycle through an identified type terminates.
//! Each public call is all-or-nothing: on error the cache and the collected
//! problems go back to where they were before the call.
//!
//! Placement rules for a parameter, first match wins:
//!
//! 1. Content role, text layout or textual type: child element only.
//! 2. Primitive or enum: attribute, plus child element when extensible.
//! 3. Object, array, map or union: child element, plus attribute when the
//!    value is simple enough for an inline expression (or a reference to a
//!    global element).

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use super::cache::{CacheKey, Placement, SyntaxCache};
use super::context::DslResolvingContext;
use super::diagnostics::{ProblemCollector, SyntaxProblem, codes};
use super::error::DslError;
use super::index::TypeIndex;
use super::options::ResolverOptions;
use super::syntax::{Namespace, SyntaxBuilder, SyntaxDeclaration, SyntaxMap};
use crate::base::constants::{ITEM_SUFFIX, MAP_VALUE_KEY, PATH_SEPARATOR, XML_DSL_MODEL_PROPERTY};
use crate::base::{hyphenize, singularize, top_level_type_name};
use crate::model::{
    Declarable, ElementDslModel, EntityKind, ExtensionModel, MetadataType, ObjectField, ObjectType,
    ParameterGroupModel, ParameterModel, TypeGraph, TypeId, TypeKind,
};

// ============================================================================
// RESOLUTION PATH
// ============================================================================

/// Path of the member being resolved, with the positions of named ancestors.
#[derive(Debug, Default)]
struct ResolutionPath {
    segments: Vec<Arc<str>>,
    anchors: Vec<usize>,
}

impl ResolutionPath {
    fn push(&mut self, segment: Arc<str>) {
        self.segments.push(segment);
    }

    /// Push a named ancestor (entity or identified type).
    fn push_anchor(&mut self, segment: Arc<str>) {
        self.anchors.push(self.segments.len());
        self.segments.push(segment);
    }

    fn pop(&mut self) {
        self.segments.pop();
        if self.anchors.last() == Some(&self.segments.len()) {
            self.anchors.pop();
        }
    }

    fn clear(&mut self) {
        self.segments.clear();
        self.anchors.clear();
    }

    fn last(&self) -> Option<&Arc<str>> {
        self.segments.last()
    }

    fn root(&self) -> Option<&Arc<str>> {
        self.segments.first()
    }

    fn full(&self) -> String {
        join(&self.segments)
    }

    /// Path from the nearest named ancestor.
    fn anchored(&self) -> String {
        let start = self.anchors.last().copied().unwrap_or(0);
        join(&self.segments[start..])
    }
}

/// Identified bean the type or the referencing member opts in to declaring
/// globally.
fn is_global_element(ty: &MetadataType, dsl: &ElementDslModel) -> bool {
    ty.supports_top_level()
        || (dsl.allow_top_level_definition && ty.identity().is_some() && ty.is_valid_bean())
}

fn join(segments: &[Arc<str>]) -> String {
    segments
        .iter()
        .map(|segment| segment.as_ref())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

// ============================================================================
// EXTENSION SYNTAX
// ============================================================================

/// Everything resolved for one extension.
#[derive(Clone, Debug)]
pub struct ExtensionSyntax {
    pub name: Arc<str>,
    pub namespace: Namespace,
    /// Entity declarations keyed by (kind, name), in model order.
    pub declarations: IndexMap<(EntityKind, Arc<str>), Arc<SyntaxDeclaration>>,
    /// Global type declarations keyed by type identity.
    pub types: SyntaxMap,
    /// Non-fatal problems found while resolving.
    pub problems: Vec<SyntaxProblem>,
}

impl ExtensionSyntax {
    pub fn declaration(&self, kind: EntityKind, name: &str) -> Option<&Arc<SyntaxDeclaration>> {
        self.declarations
            .iter()
            .find(|((entity_kind, entity_name), _)| *entity_kind == kind && entity_name.as_ref() == name)
            .map(|(_, declaration)| declaration)
    }

    pub fn type_declaration(&self, identity: &str) -> Option<&Arc<SyntaxDeclaration>> {
        self.types.get(identity)
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolves the element/attribute syntax of one extension.
///
/// One resolver owns one [`SyntaxCache`]; resolving the same entity,
/// parameter or type twice returns the same `Arc`.
pub struct DslSyntaxResolver<'a> {
    extension: &'a ExtensionModel,
    context: &'a dyn DslResolvingContext,
    options: ResolverOptions,
    index: TypeIndex,
    cache: SyntaxCache,
    problems: ProblemCollector,
    /// Owner extension name -> namespace, for imported types.
    namespaces: FxHashMap<Arc<str>, Namespace>,
    path: ResolutionPath,
    /// Anonymous object types currently being built.
    anonymous_stack: Vec<TypeId>,
}

impl<'a> DslSyntaxResolver<'a> {
    pub fn new(extension: &'a ExtensionModel, context: &'a dyn DslResolvingContext) -> Self {
        Self::with_options(extension, context, ResolverOptions::default())
    }

    pub fn with_options(
        extension: &'a ExtensionModel,
        context: &'a dyn DslResolvingContext,
        options: ResolverOptions,
    ) -> Self {
        Self {
            extension,
            context,
            options,
            index: TypeIndex::new(extension),
            cache: SyntaxCache::new(),
            problems: ProblemCollector::new(),
            namespaces: FxHashMap::default(),
            path: ResolutionPath::default(),
            anonymous_stack: Vec::new(),
        }
    }

    pub fn extension(&self) -> &'a ExtensionModel {
        self.extension
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn index(&self) -> &TypeIndex {
        &self.index
    }

    pub fn cache(&self) -> &SyntaxCache {
        &self.cache
    }

    pub fn problems(&self) -> &[SyntaxProblem] {
        self.problems.problems()
    }

    pub fn take_problems(&mut self) -> Vec<SyntaxProblem> {
        self.problems.take()
    }

    // ------------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------------

    /// Root declaration of a configuration, connection provider, operation or
    /// source.
    pub fn resolve_top_level(
        &mut self,
        entity: Declarable<'_>,
    ) -> Result<Arc<SyntaxDeclaration>, DslError> {
        let key = CacheKey::entity(entity.kind(), entity.name());
        if let Some(cached) = self.cache.get(&key) {
            tracing::trace!("[DSL] Cache hit for {} '{}'", entity.kind(), entity.name());
            return Ok(cached);
        }

        let namespace = self.extension_namespace()?;
        tracing::debug!(
            "[DSL] Resolving {} '{}' under '{}'",
            entity.kind(),
            entity.name(),
            namespace.prefix
        );

        self.transaction(|resolver| {
            resolver.path.push_anchor(entity.name().clone());
            let children = resolver.entity_children(entity, &namespace)?;
            let declaration = SyntaxBuilder::new()
                .element_name(hyphenize(entity.name()))
                .namespace(&namespace)
                .supports_child(true)
                .supports_top_level(entity.kind() == EntityKind::Configuration)
                .children(children)
                .build();
            resolver.cache.insert(key, declaration.clone());
            Ok(declaration)
        })
    }

    /// Attribute/child placement of one parameter of `owner`.
    pub fn resolve_parameter(
        &mut self,
        param: &ParameterModel,
        owner: Declarable<'_>,
    ) -> Result<Arc<SyntaxDeclaration>, DslError> {
        let namespace = self.extension_namespace()?;
        self.transaction(|resolver| {
            resolver.path.push_anchor(owner.name().clone());
            resolver.parameter_syntax(param, owner, &namespace)
        })
    }

    /// Declaration of a value of type `ty` held by a field named `field_name`.
    ///
    /// Memoized per (type, field name, namespace).
    pub fn resolve_field_type(
        &mut self,
        ty: TypeId,
        field_name: &str,
        namespace: &Namespace,
    ) -> Result<Arc<SyntaxDeclaration>, DslError> {
        let field = ObjectField::new(field_name, ty);
        let key = CacheKey::Field {
            ty,
            name: field.key.clone(),
            namespace: namespace.prefix.clone(),
        };
        if let Some(cached) = self.cache.get(&key) {
            tracing::trace!("[DSL] Cache hit for field '{}'", field_name);
            return Ok(cached);
        }

        self.transaction(|resolver| {
            resolver.path.push_anchor(field.key.clone());
            let declaration = resolver.field_syntax(&field, namespace)?;
            resolver.cache.insert(key, declaration.clone());
            Ok(declaration)
        })
    }

    /// Generic entry of `container` for `item_type`, if one was resolved.
    pub fn resolve_generic(
        &self,
        container: &SyntaxDeclaration,
        item_type: TypeId,
    ) -> Option<Arc<SyntaxDeclaration>> {
        if !container.has_generics() {
            return None;
        }
        let ty = self.graph().get(item_type)?;
        container.generic(&ty.type_key()).cloned()
    }

    /// Type-level declaration of an identified object type.
    ///
    /// `None` for primitives, containers and anonymous types.
    pub fn resolve_type(&mut self, id: TypeId) -> Result<Option<Arc<SyntaxDeclaration>>, DslError> {
        let ty = self.type_at(id)?;
        if ty.identity().is_none() || !ty.is_object() {
            return Ok(None);
        }

        let namespace = self.extension_namespace()?;
        self.transaction(|resolver| {
            let type_namespace = resolver.namespace_for(ty, &namespace)?;
            resolver.type_syntax(id, &type_namespace).map(Some)
        })
    }

    /// Resolve every declarable entity and every global type of the extension.
    pub fn resolve_extension(&mut self) -> Result<ExtensionSyntax, DslError> {
        let namespace = self.extension_namespace()?;
        let extension = self.extension;
        let entities = extension.declarables();
        tracing::debug!(
            "[DSL] Resolving extension '{}': {} entities, {} types",
            extension.name,
            entities.len(),
            extension.types.len()
        );

        let mut declarations = IndexMap::new();
        for entity in entities {
            let declaration = self.resolve_top_level(entity)?;
            declarations.insert((entity.kind(), entity.name().clone()), declaration);
        }

        let mut types = SyntaxMap::new();
        for (id, ty) in extension.types.iter() {
            let Some(identity) = ty.identity() else {
                continue;
            };
            if !ty.supports_top_level() || self.index.owner_of(identity).is_some() {
                continue;
            }
            if let Some(declaration) = self.resolve_type(id)? {
                types.insert(identity.clone(), declaration);
            }
        }

        Ok(ExtensionSyntax {
            name: extension.name.clone(),
            namespace,
            declarations,
            types,
            problems: self.problems.take(),
        })
    }

    // ------------------------------------------------------------------------
    // Entities and parameters
    // ------------------------------------------------------------------------

    fn entity_children(
        &mut self,
        entity: Declarable<'_>,
        namespace: &Namespace,
    ) -> Result<SyntaxMap, DslError> {
        let mut groups: Vec<&ParameterGroupModel> = entity.parameter_groups().iter().collect();
        if self.options.include_source_callbacks {
            groups.extend(entity.callback_groups());
        }

        let mut children = SyntaxMap::new();
        for group in groups {
            if group.show_in_dsl {
                let declaration = self.group_syntax(group, entity, namespace)?;
                self.insert_child(&mut children, group.name.clone(), declaration)?;
            } else {
                for param in &group.parameters {
                    let declaration = self.parameter_syntax(param, entity, namespace)?;
                    self.insert_child(&mut children, param.name.clone(), declaration)?;
                }
            }
        }
        Ok(children)
    }

    /// Inline element holding the parameters of a group shown in the DSL.
    fn group_syntax(
        &mut self,
        group: &ParameterGroupModel,
        owner: Declarable<'_>,
        namespace: &Namespace,
    ) -> Result<Arc<SyntaxDeclaration>, DslError> {
        self.path.push(group.name.clone());
        let mut children = SyntaxMap::new();
        let result = group.parameters.iter().try_for_each(|param| {
            let declaration = self.parameter_syntax(param, owner, namespace)?;
            self.insert_child(&mut children, param.name.clone(), declaration)
        });
        self.path.pop();
        result?;

        Ok(SyntaxBuilder::new()
            .element_name(hyphenize(&group.name))
            .namespace(namespace)
            .supports_child(true)
            .children(children)
            .build())
    }

    fn parameter_syntax(
        &mut self,
        param: &ParameterModel,
        owner: Declarable<'_>,
        namespace: &Namespace,
    ) -> Result<Arc<SyntaxDeclaration>, DslError> {
        let key = CacheKey::parameter(owner.kind(), owner.name(), &param.name);
        if let Some(cached) = self.cache.get(&key) {
            tracing::trace!("[DSL] Cache hit for parameter '{}' of '{}'", param.name, owner.name());
            return Ok(cached);
        }

        self.path.push(param.name.clone());
        let result = self.build_parameter(param, owner, namespace);
        self.path.pop();

        let declaration = result?;
        self.cache.insert(key, declaration.clone());
        Ok(declaration)
    }

    fn build_parameter(
        &mut self,
        param: &ParameterModel,
        owner: Declarable<'_>,
        namespace: &Namespace,
    ) -> Result<Arc<SyntaxDeclaration>, DslError> {
        let ty = self.type_at(param.ty)?;
        let builder = SyntaxBuilder::new()
            .attribute_name(param.name.clone())
            .element_name(hyphenize(&param.name))
            .namespace(namespace);

        if param.role.is_content() || param.layout.text || ty.annotations.text {
            self.check_placement(ty, Placement::Child, owner, param)?;
            return Ok(builder.supports_child(true).build());
        }

        match &ty.kind {
            TypeKind::Primitive(_) => {
                let child = ty.annotations.extensible;
                let placement = if child {
                    Placement::Child
                } else {
                    Placement::AttributeOnly
                };
                self.check_placement(ty, placement, owner, param)?;
                Ok(builder.supports_attribute(true).supports_child(child).build())
            }
            TypeKind::Object(_) => {
                let type_namespace = self.namespace_for(ty, namespace)?;
                let structure = self.type_syntax(param.ty, &type_namespace)?;
                let attribute = self.inline_attribute(
                    param.ty,
                    ty,
                    param.expression_support.allows_expressions(),
                    &param.dsl,
                );
                Ok(builder
                    .supports_attribute(attribute)
                    .supports_child(param.dsl.allows_inline_definition || !attribute)
                    .supports_top_level(is_global_element(ty, &param.dsl))
                    .structure_of(&structure)
                    .build())
            }
            TypeKind::Array(_) | TypeKind::Map(_) | TypeKind::Union(_) => {
                let generics =
                    self.container_generics(ty, &param.name, param.dsl.singularizable, namespace)?;
                let attribute =
                    param.expression_support.allows_expressions() && self.graph().is_simple(param.ty);
                Ok(builder
                    .supports_attribute(attribute)
                    .supports_child(true)
                    .generics(generics)
                    .build())
            }
        }
    }

    /// Record the placement of an identified type and report contradictions.
    fn check_placement(
        &mut self,
        ty: &MetadataType,
        placement: Placement,
        owner: Declarable<'_>,
        param: &ParameterModel,
    ) -> Result<(), DslError> {
        let Some(identity) = ty.identity() else {
            return Ok(());
        };
        let path: Arc<str> = self.path.full().into();
        let Some((previous, at)) = self.cache.record_placement(identity, placement, path.clone())
        else {
            return Ok(());
        };

        let message = format!(
            "type '{identity}' is placed as {} here but as {} at '{at}'",
            placement.as_str(),
            previous.as_str()
        );
        if self.options.problems_as_errors {
            return Err(DslError::AmbiguousAttributeChild {
                entity: owner.name().to_string(),
                parameter: param.name.to_string(),
                message,
            });
        }

        tracing::warn!("[DSL] {}: {}", path, message);
        self.problems.add(SyntaxProblem::error(
            codes::AMBIGUOUS_ATTRIBUTE_CHILD,
            owner.name().clone(),
            path,
            message,
        ));
        Ok(())
    }

    fn report_unflattened(&mut self, field: &ObjectField, ty: &MetadataType) {
        let path: Arc<str> = self.path.full().into();
        let root = self.path.root().cloned().unwrap_or_else(|| path.clone());
        let message = format!(
            "flattened field '{}' keeps its own element because '{}' is open to sub-types",
            field.key,
            ty.type_key()
        );
        tracing::warn!("[DSL] {}: {}", path, message);
        self.problems.add(SyntaxProblem::warning(
            codes::UNFLATTENED_POLYMORPHIC_FIELD,
            root,
            path,
            message,
        ));
    }

    // ------------------------------------------------------------------------
    // Types and fields
    // ------------------------------------------------------------------------

    /// Type-level declaration of an object type, through the cache.
    fn type_syntax(
        &mut self,
        id: TypeId,
        namespace: &Namespace,
    ) -> Result<Arc<SyntaxDeclaration>, DslError> {
        let ty = self.type_at(id)?;
        let key = match ty.identity() {
            Some(identity) => CacheKey::Type {
                identity: identity.clone(),
                namespace: namespace.prefix.clone(),
            },
            None => {
                if self.anonymous_stack.contains(&id) {
                    return Err(DslError::UnboundedAnonymousRecursion {
                        path: self.path.full(),
                    });
                }
                CacheKey::Anonymous {
                    ty: id,
                    namespace: namespace.prefix.clone(),
                    anchor: self.path.anchored().into(),
                }
            }
        };

        if let Some(cached) = self.cache.get(&key) {
            if self.cache.is_in_progress(&key) {
                tracing::trace!("[DSL] Cycle through {:?} stopped at '{}'", key, self.path.full());
            }
            return Ok(cached);
        }

        let element_name: Arc<str> = match ty.identity() {
            Some(identity) => top_level_type_name(identity).into(),
            None => self
                .path
                .last()
                .map(|segment| hyphenize(segment))
                .unwrap_or_default()
                .into(),
        };
        let wrapped = self.requires_wrapper(id, ty);
        let marker = SyntaxBuilder::new()
            .element_name(element_name.clone())
            .namespace(namespace)
            .supports_child(true)
            .wrapped(wrapped)
            .build();
        self.cache.begin(key.clone(), marker);

        match ty.identity() {
            Some(identity) => self.path.push_anchor(identity.clone()),
            None => self.anonymous_stack.push(id),
        }
        let result = self.build_type(id, ty, element_name, wrapped, namespace);
        match ty.identity() {
            Some(_) => self.path.pop(),
            None => {
                self.anonymous_stack.pop();
            }
        }

        match result {
            Ok(declaration) => {
                self.cache.complete(key, declaration.clone());
                Ok(declaration)
            }
            Err(err) => {
                self.cache.abandon(&key);
                Err(err)
            }
        }
    }

    fn build_type(
        &mut self,
        id: TypeId,
        ty: &'a MetadataType,
        element_name: Arc<str>,
        wrapped: bool,
        namespace: &Namespace,
    ) -> Result<Arc<SyntaxDeclaration>, DslError> {
        let children = match ty.object_type() {
            Some(object) => self.object_children(object, namespace)?,
            None => SyntaxMap::new(),
        };
        let generics = self.sub_type_generics(id, namespace)?;

        Ok(SyntaxBuilder::new()
            .element_name(element_name)
            .namespace(namespace)
            .supports_child(true)
            .supports_top_level(ty.supports_top_level())
            .wrapped(wrapped)
            .children(children)
            .generics(generics)
            .build())
    }

    /// One generic entry per registered sub-type of `base`.
    fn sub_type_generics(
        &mut self,
        base: TypeId,
        namespace: &Namespace,
    ) -> Result<SyntaxMap, DslError> {
        let mut generics = SyntaxMap::new();
        let sub_types = self.index.sub_types_of(base).to_vec();
        for sub in sub_types {
            let sub_ty = self.type_at(sub)?;
            let key = sub_ty.type_key();
            let sub_namespace = self.namespace_for(sub_ty, namespace)?;

            self.path.push(key.clone());
            let result = self.type_syntax(sub, &sub_namespace);
            self.path.pop();

            generics.insert(key, result?);
        }
        Ok(generics)
    }

    fn object_children(
        &mut self,
        object: &'a ObjectType,
        namespace: &Namespace,
    ) -> Result<SyntaxMap, DslError> {
        let mut children = SyntaxMap::new();
        for field in &object.fields {
            self.path.push(field.key.clone());
            let merged = match self.field_syntax(field, namespace) {
                // Flattened objects contribute their children, not themselves.
                Ok(declaration) if self.merges_into_parent(field, &declaration) => declaration
                    .children()
                    .iter()
                    .try_for_each(|(name, child)| {
                        self.insert_child(&mut children, name.clone(), child.clone())
                    }),
                Ok(declaration) => self.insert_child(&mut children, field.key.clone(), declaration),
                Err(err) => Err(err),
            };
            self.path.pop();
            merged?;
        }
        Ok(children)
    }

    fn field_syntax(
        &mut self,
        field: &ObjectField,
        namespace: &Namespace,
    ) -> Result<Arc<SyntaxDeclaration>, DslError> {
        let ty = self.type_at(field.value)?;
        let element_name = hyphenize(&field.key);

        if field.text || ty.annotations.text {
            return Ok(SyntaxBuilder::new()
                .element_name(element_name)
                .namespace(namespace)
                .supports_child(true)
                .build());
        }

        match &ty.kind {
            TypeKind::Primitive(_) if ty.annotations.extensible => Ok(SyntaxBuilder::new()
                .attribute_name(field.key.clone())
                .element_name(element_name)
                .namespace(namespace)
                .supports_attribute(true)
                .supports_child(true)
                .build()),
            // Plain attribute leaf: no element, no namespace.
            TypeKind::Primitive(_) => Ok(SyntaxBuilder::new()
                .attribute_name(field.key.clone())
                .supports_attribute(true)
                .build()),
            TypeKind::Object(_) => {
                let type_namespace = self.namespace_for(ty, namespace)?;
                let structure = self.type_syntax(field.value, &type_namespace)?;
                if field.flattened {
                    if !structure.is_wrapped() {
                        return Ok(structure);
                    }
                    // Sub-types need their own element; keep the field nested.
                    self.report_unflattened(field, ty);
                }

                let global = is_global_element(ty, &field.dsl);
                let element_name = match ty.identity() {
                    Some(identity) if global => top_level_type_name(identity),
                    _ => element_name,
                };
                let attribute = self.inline_attribute(field.value, ty, true, &field.dsl);
                Ok(SyntaxBuilder::new()
                    .attribute_name(field.key.clone())
                    .element_name(element_name)
                    .namespace(&type_namespace)
                    .supports_attribute(attribute)
                    .supports_child(field.dsl.allows_inline_definition || !attribute)
                    .supports_top_level(global)
                    .structure_of(&structure)
                    .build())
            }
            TypeKind::Array(_) | TypeKind::Map(_) | TypeKind::Union(_) => {
                let generics =
                    self.container_generics(ty, &field.key, field.dsl.singularizable, namespace)?;
                Ok(SyntaxBuilder::new()
                    .attribute_name(field.key.clone())
                    .element_name(element_name)
                    .namespace(namespace)
                    .supports_attribute(self.graph().is_simple(field.value))
                    .supports_child(true)
                    .generics(generics)
                    .build())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------------

    /// Generic entries of an array, map or union declaration.
    ///
    /// Arrays get one entry per item type (per variant for a union item);
    /// maps get their value under the reserved map value key.
    fn container_generics(
        &mut self,
        ty: &'a MetadataType,
        collection: &str,
        singularizable: bool,
        namespace: &Namespace,
    ) -> Result<SyntaxMap, DslError> {
        let mut generics = SyntaxMap::new();
        let items: Vec<TypeId> = match &ty.kind {
            TypeKind::Map(value) => {
                let declaration = self.item_syntax(*value, collection, singularizable, namespace)?;
                generics.insert(Arc::from(MAP_VALUE_KEY), declaration);
                return Ok(generics);
            }
            TypeKind::Array(item) => match self.type_at(*item)?.kind {
                TypeKind::Union(ref variants) => variants.clone(),
                _ => vec![*item],
            },
            TypeKind::Union(variants) => variants.clone(),
            TypeKind::Primitive(_) | TypeKind::Object(_) => Vec::new(),
        };

        for item in items {
            let key = self.type_at(item)?.type_key();
            if generics.contains_key(&key) {
                continue;
            }
            let declaration = self.item_syntax(item, collection, singularizable, namespace)?;
            generics.insert(key, declaration);
        }
        Ok(generics)
    }

    fn item_syntax(
        &mut self,
        item: TypeId,
        collection: &str,
        singularizable: bool,
        namespace: &Namespace,
    ) -> Result<Arc<SyntaxDeclaration>, DslError> {
        let ty = self.type_at(item)?;
        self.path.push(ty.type_key());
        let result = self.build_item(item, ty, collection, singularizable, namespace);
        self.path.pop();
        result
    }

    fn build_item(
        &mut self,
        item: TypeId,
        ty: &'a MetadataType,
        collection: &str,
        singularizable: bool,
        namespace: &Namespace,
    ) -> Result<Arc<SyntaxDeclaration>, DslError> {
        let collection_element = hyphenize(collection);
        let item_name = if singularizable {
            singularize(&collection_element)
        } else {
            format!("{collection_element}{ITEM_SUFFIX}")
        };

        match &ty.kind {
            TypeKind::Object(_) => {
                let item_namespace = self.namespace_for(ty, namespace)?;
                let structure = self.type_syntax(item, &item_namespace)?;
                // Identified items are written under their own type name.
                if ty.identity().is_some() && !singularizable {
                    return Ok(structure);
                }
                Ok(SyntaxBuilder::new()
                    .element_name(item_name)
                    .namespace(&item_namespace)
                    .supports_child(true)
                    .structure_of(&structure)
                    .build())
            }
            TypeKind::Array(_) | TypeKind::Map(_) | TypeKind::Union(_) => {
                let generics = self.container_generics(ty, &item_name, false, namespace)?;
                Ok(SyntaxBuilder::new()
                    .element_name(item_name)
                    .namespace(namespace)
                    .supports_child(true)
                    .generics(generics)
                    .build())
            }
            TypeKind::Primitive(_) => Ok(SyntaxBuilder::new()
                .element_name(item_name)
                .namespace(namespace)
                .supports_child(true)
                .build()),
        }
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn graph(&self) -> &'a TypeGraph {
        let extension: &'a ExtensionModel = self.extension;
        &extension.types
    }

    fn type_at(&self, id: TypeId) -> Result<&'a MetadataType, DslError> {
        self.graph().get(id).ok_or_else(|| DslError::UnknownType {
            id,
            path: self.path.full(),
        })
    }

    /// A flattened object field whose type is closed merges into its parent.
    fn merges_into_parent(&self, field: &ObjectField, declaration: &SyntaxDeclaration) -> bool {
        field.flattened
            && !declaration.is_wrapped()
            && self.graph().get(field.value).is_some_and(MetadataType::is_object)
    }

    fn extension_namespace(&self) -> Result<Namespace, DslError> {
        self.extension
            .xml_dsl
            .as_ref()
            .map(Namespace::from)
            .ok_or_else(|| DslError::MissingRequiredModelProperty {
                extension: self.extension.name.to_string(),
                property: XML_DSL_MODEL_PROPERTY,
            })
    }

    /// Namespace of `ty`: its owner's for imported types, `enclosing` otherwise.
    fn namespace_for(
        &mut self,
        ty: &MetadataType,
        enclosing: &Namespace,
    ) -> Result<Namespace, DslError> {
        let Some(identity) = ty.identity() else {
            return Ok(enclosing.clone());
        };
        let Some(owner) = self.index.owner_of(identity).cloned() else {
            return Ok(enclosing.clone());
        };
        if let Some(namespace) = self.namespaces.get(&owner) {
            return Ok(namespace.clone());
        }

        let extension = self.context.lookup_extension(&owner).ok_or_else(|| {
            DslError::UnresolvedImport {
                type_id: identity.to_string(),
                owner: owner.to_string(),
                path: self.path.full(),
            }
        })?;
        let xml_dsl =
            extension
                .xml_dsl
                .as_ref()
                .ok_or_else(|| DslError::MissingRequiredModelProperty {
                    extension: owner.to_string(),
                    property: XML_DSL_MODEL_PROPERTY,
                })?;
        let namespace = Namespace::from(xml_dsl);

        tracing::trace!("[DSL] Imported '{}' resolves to '{}'", identity, namespace);
        self.namespaces.insert(owner, namespace.clone());
        Ok(namespace)
    }

    /// Wrapped when open for extension or when concrete sub-types are registered.
    fn requires_wrapper(&self, id: TypeId, ty: &MetadataType) -> bool {
        ty.is_object() && (ty.annotations.extensible || self.index.has_sub_types(id))
    }

    /// Whether an object value can also be written as an attribute.
    fn inline_attribute(
        &self,
        id: TypeId,
        ty: &MetadataType,
        allows_expressions: bool,
        dsl: &ElementDslModel,
    ) -> bool {
        (allows_expressions && self.graph().is_simple(id))
            || (dsl.allows_references && is_global_element(ty, dsl))
    }

    fn insert_child(
        &self,
        children: &mut SyntaxMap,
        name: Arc<str>,
        declaration: Arc<SyntaxDeclaration>,
    ) -> Result<(), DslError> {
        if children.contains_key(&name) {
            return Err(DslError::NameCollision {
                name: name.to_string(),
                path: self.path.full(),
            });
        }
        children.insert(name, declaration);
        Ok(())
    }

    fn reset_traversal(&mut self) {
        self.path.clear();
        self.anonymous_stack.clear();
    }

    /// Run one public call; on error, drop every cache entry, placement and
    /// problem it added.
    fn transaction<T>(
        &mut self,
        run: impl FnOnce(&mut Self) -> Result<T, DslError>,
    ) -> Result<T, DslError> {
        let checkpoint = self.cache.checkpoint();
        let problems = self.problems.len();
        self.reset_traversal();
        let result = run(self);
        self.reset_traversal();

        match &result {
            Ok(_) => self.cache.commit(checkpoint),
            Err(err) => {
                tracing::debug!("[DSL] Rolling back after {}: {}", err.code(), err);
                self.cache.rollback(checkpoint);
                self.problems.truncate(problems);
            }
        }
        result
    }
}
