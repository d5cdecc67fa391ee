//! Extension model — the declarable entities an extension exposes.
//!
//! Every entity kind is a flat record sharing [`ParameterGroupModel`] and
//! [`ParameterModel`]; code that works across kinds goes through the closed
//! [`Declarable`] union.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::dsl::{ElementDslModel, ExpressionSupport, LayoutModel, ParameterRole};
use super::types::{TypeGraph, TypeId};
use crate::base::constants::DEFAULT_GROUP_NAME;

// ============================================================================
// NAMESPACE MODEL
// ============================================================================

/// XML namespace declaration of an extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlDslModel {
    /// Namespace prefix used on every element (e.g. `mockns`).
    pub prefix: Arc<str>,
    pub namespace_uri: Arc<str>,
    pub schema_location: Arc<str>,
    pub xsd_file_name: Arc<str>,
    pub schema_version: Arc<str>,
}

impl XmlDslModel {
    pub fn new(prefix: impl Into<Arc<str>>, namespace_uri: impl Into<Arc<str>>) -> Self {
        Self {
            prefix: prefix.into(),
            namespace_uri: namespace_uri.into(),
            schema_location: Arc::from(""),
            xsd_file_name: Arc::from(""),
            schema_version: Arc::from(""),
        }
    }

    pub fn with_schema_location(mut self, location: impl Into<Arc<str>>) -> Self {
        self.schema_location = location.into();
        self
    }

    pub fn with_xsd_file_name(mut self, file_name: impl Into<Arc<str>>) -> Self {
        self.xsd_file_name = file_name.into();
        self
    }

    pub fn with_schema_version(mut self, version: impl Into<Arc<str>>) -> Self {
        self.schema_version = version.into();
        self
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// A parameter of a declarable entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterModel {
    pub name: Arc<str>,
    pub description: String,
    pub ty: TypeId,
    pub required: bool,
    pub expression_support: ExpressionSupport,
    pub role: ParameterRole,
    pub default_value: Option<String>,
    pub layout: LayoutModel,
    pub dsl: ElementDslModel,
}

impl ParameterModel {
    pub fn new(name: impl Into<Arc<str>>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            ty,
            required: false,
            expression_support: ExpressionSupport::default(),
            role: ParameterRole::default(),
            default_value: None,
            layout: LayoutModel::default(),
            dsl: ElementDslModel::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_role(mut self, role: ParameterRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_expression_support(mut self, support: ExpressionSupport) -> Self {
        self.expression_support = support;
        self
    }

    pub fn with_layout(mut self, layout: LayoutModel) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_dsl(mut self, dsl: ElementDslModel) -> Self {
        self.dsl = dsl;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A named group of parameters.
///
/// Groups shown in the DSL become one inline element holding their
/// parameters; all others are flattened into the owning element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterGroupModel {
    pub name: Arc<str>,
    pub parameters: Vec<ParameterModel>,
    pub show_in_dsl: bool,
}

impl ParameterGroupModel {
    pub fn new(name: impl Into<Arc<str>>, parameters: Vec<ParameterModel>) -> Self {
        Self {
            name: name.into(),
            parameters,
            show_in_dsl: false,
        }
    }

    pub fn default_group(parameters: Vec<ParameterModel>) -> Self {
        Self::new(DEFAULT_GROUP_NAME, parameters)
    }

    pub fn shown_in_dsl(mut self) -> Self {
        self.show_in_dsl = true;
        self
    }
}

/// Adds `parameters` to the default group, creating it when missing.
fn push_default_parameters(groups: &mut Vec<ParameterGroupModel>, parameters: Vec<ParameterModel>) {
    match groups
        .iter_mut()
        .find(|group| group.name.as_ref() == DEFAULT_GROUP_NAME)
    {
        Some(group) => group.parameters.extend(parameters),
        None => groups.push(ParameterGroupModel::default_group(parameters)),
    }
}

// ============================================================================
// DECLARABLE ENTITIES
// ============================================================================

/// Kind of a declarable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Configuration,
    ConnectionProvider,
    Operation,
    Source,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Configuration => "configuration",
            EntityKind::ConnectionProvider => "connection provider",
            EntityKind::Operation => "operation",
            EntityKind::Source => "source",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigurationModel {
    pub name: Arc<str>,
    pub description: String,
    pub parameter_groups: Vec<ParameterGroupModel>,
    pub operations: Vec<OperationModel>,
    pub sources: Vec<SourceModel>,
    pub connection_providers: Vec<ConnectionProviderModel>,
}

impl ConfigurationModel {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<ParameterModel>) -> Self {
        push_default_parameters(&mut self.parameter_groups, parameters);
        self
    }

    pub fn with_group(mut self, group: ParameterGroupModel) -> Self {
        self.parameter_groups.push(group);
        self
    }

    pub fn with_operation(mut self, operation: OperationModel) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn with_source(mut self, source: SourceModel) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_connection_provider(mut self, provider: ConnectionProviderModel) -> Self {
        self.connection_providers.push(provider);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionProviderModel {
    pub name: Arc<str>,
    pub description: String,
    pub parameter_groups: Vec<ParameterGroupModel>,
}

impl ConnectionProviderModel {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<ParameterModel>) -> Self {
        push_default_parameters(&mut self.parameter_groups, parameters);
        self
    }

    pub fn with_group(mut self, group: ParameterGroupModel) -> Self {
        self.parameter_groups.push(group);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationModel {
    pub name: Arc<str>,
    pub description: String,
    pub parameter_groups: Vec<ParameterGroupModel>,
}

impl OperationModel {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<ParameterModel>) -> Self {
        push_default_parameters(&mut self.parameter_groups, parameters);
        self
    }

    pub fn with_group(mut self, group: ParameterGroupModel) -> Self {
        self.parameter_groups.push(group);
        self
    }
}

/// Parameters a source receives when a message succeeds or fails.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackModel {
    pub parameter_groups: Vec<ParameterGroupModel>,
}

impl CallbackModel {
    pub fn new(parameters: Vec<ParameterModel>) -> Self {
        Self {
            parameter_groups: vec![ParameterGroupModel::default_group(parameters)],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceModel {
    pub name: Arc<str>,
    pub description: String,
    pub parameter_groups: Vec<ParameterGroupModel>,
    pub success_callback: Option<CallbackModel>,
    pub error_callback: Option<CallbackModel>,
}

impl SourceModel {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<ParameterModel>) -> Self {
        push_default_parameters(&mut self.parameter_groups, parameters);
        self
    }

    pub fn with_group(mut self, group: ParameterGroupModel) -> Self {
        self.parameter_groups.push(group);
        self
    }

    pub fn with_success_callback(mut self, callback: CallbackModel) -> Self {
        self.success_callback = Some(callback);
        self
    }

    pub fn with_error_callback(mut self, callback: CallbackModel) -> Self {
        self.error_callback = Some(callback);
        self
    }
}

/// Any entity a user can declare in the DSL.
#[derive(Clone, Copy, Debug)]
pub enum Declarable<'a> {
    Configuration(&'a ConfigurationModel),
    ConnectionProvider(&'a ConnectionProviderModel),
    Operation(&'a OperationModel),
    Source(&'a SourceModel),
}

impl<'a> Declarable<'a> {
    pub fn kind(&self) -> EntityKind {
        match *self {
            Declarable::Configuration(_) => EntityKind::Configuration,
            Declarable::ConnectionProvider(_) => EntityKind::ConnectionProvider,
            Declarable::Operation(_) => EntityKind::Operation,
            Declarable::Source(_) => EntityKind::Source,
        }
    }

    pub fn name(&self) -> &'a Arc<str> {
        match *self {
            Declarable::Configuration(model) => &model.name,
            Declarable::ConnectionProvider(model) => &model.name,
            Declarable::Operation(model) => &model.name,
            Declarable::Source(model) => &model.name,
        }
    }

    pub fn parameter_groups(&self) -> &'a [ParameterGroupModel] {
        match *self {
            Declarable::Configuration(model) => &model.parameter_groups,
            Declarable::ConnectionProvider(model) => &model.parameter_groups,
            Declarable::Operation(model) => &model.parameter_groups,
            Declarable::Source(model) => &model.parameter_groups,
        }
    }

    /// Groups declared on a source's success and error callbacks.
    pub fn callback_groups(&self) -> Vec<&'a ParameterGroupModel> {
        match *self {
            Declarable::Source(model) => model
                .success_callback
                .iter()
                .chain(model.error_callback.iter())
                .flat_map(|callback| callback.parameter_groups.iter())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Every parameter of the entity, callbacks included, in declaration order.
    pub fn all_parameters(&self) -> Vec<&'a ParameterModel> {
        self.parameter_groups()
            .iter()
            .chain(self.callback_groups())
            .flat_map(|group| group.parameters.iter())
            .collect()
    }

    pub fn find_parameter(&self, name: &str) -> Option<&'a ParameterModel> {
        self.all_parameters()
            .into_iter()
            .find(|param| param.name.as_ref() == name)
    }
}

// ============================================================================
// TYPE RELATIONS
// ============================================================================

/// Concrete types allowed to substitute an open base type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubTypesModel {
    pub base_type: TypeId,
    pub sub_types: Vec<TypeId>,
}

impl SubTypesModel {
    pub fn new(base_type: TypeId, sub_types: Vec<TypeId>) -> Self {
        Self {
            base_type,
            sub_types,
        }
    }
}

/// A type whose namespace belongs to another extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedTypeModel {
    pub ty: TypeId,
    /// Name of the owning extension.
    pub owner: Arc<str>,
}

impl ImportedTypeModel {
    pub fn new(ty: TypeId, owner: impl Into<Arc<str>>) -> Self {
        Self {
            ty,
            owner: owner.into(),
        }
    }
}

// ============================================================================
// EXTENSION
// ============================================================================

/// A complete extension as produced by the discovery collaborator.
#[derive(Clone, Debug, Default)]
pub struct ExtensionModel {
    pub name: Arc<str>,
    pub version: String,
    pub description: String,
    pub xml_dsl: Option<XmlDslModel>,
    pub types: TypeGraph,
    pub configurations: Vec<ConfigurationModel>,
    pub connection_providers: Vec<ConnectionProviderModel>,
    pub operations: Vec<OperationModel>,
    pub sources: Vec<SourceModel>,
    pub sub_types: Vec<SubTypesModel>,
    pub imported_types: Vec<ImportedTypeModel>,
}

impl ExtensionModel {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_xml_dsl(mut self, xml_dsl: XmlDslModel) -> Self {
        self.xml_dsl = Some(xml_dsl);
        self
    }

    /// Every declarable entity, configurations first, then the entities they
    /// own, then extension-level ones. An entity reachable from several owners
    /// is listed once.
    pub fn declarables(&self) -> Vec<Declarable<'_>> {
        let mut seen: FxHashSet<(EntityKind, &str)> = FxHashSet::default();
        let mut result = Vec::new();

        for config in &self.configurations {
            push_unique(&mut seen, &mut result, Declarable::Configuration(config));
        }
        for config in &self.configurations {
            for provider in &config.connection_providers {
                push_unique(&mut seen, &mut result, Declarable::ConnectionProvider(provider));
            }
            for operation in &config.operations {
                push_unique(&mut seen, &mut result, Declarable::Operation(operation));
            }
            for source in &config.sources {
                push_unique(&mut seen, &mut result, Declarable::Source(source));
            }
        }
        for provider in &self.connection_providers {
            push_unique(&mut seen, &mut result, Declarable::ConnectionProvider(provider));
        }
        for operation in &self.operations {
            push_unique(&mut seen, &mut result, Declarable::Operation(operation));
        }
        for source in &self.sources {
            push_unique(&mut seen, &mut result, Declarable::Source(source));
        }

        result
    }

    /// Find a declarable by kind and name.
    pub fn find_declarable(&self, kind: EntityKind, name: &str) -> Option<Declarable<'_>> {
        self.declarables()
            .into_iter()
            .find(|entity| entity.kind() == kind && entity.name().as_ref() == name)
    }
}

fn push_unique<'a>(
    seen: &mut FxHashSet<(EntityKind, &'a str)>,
    result: &mut Vec<Declarable<'a>>,
    entity: Declarable<'a>,
) {
    if seen.insert((entity.kind(), entity.name().as_ref())) {
        result.push(entity);
    }
}
