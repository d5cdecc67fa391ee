//! Input model — metadata type graph and extension model.
//!
//! Both are built by the discovery collaborator and only read by the
//! resolver. Semantic markers (extensible, flattened, text, ...) are plain
//! fields set at construction time.
//!
//! ## Key Types
//!
//! - [`TypeGraph`] — Arena of [`MetadataType`] nodes addressed by [`TypeId`]
//! - [`ExtensionModel`] — Configurations, providers, operations, sources
//! - [`Declarable`] — Closed union over the four declarable entity kinds
//! - [`ParameterModel`] — Shared parameter record

mod dsl;
mod extension;
mod types;

pub use dsl::{ElementDslModel, ExpressionSupport, LayoutModel, ParameterRole};
pub use extension::{
    CallbackModel, ConfigurationModel, ConnectionProviderModel, Declarable, EntityKind,
    ExtensionModel, ImportedTypeModel, OperationModel, ParameterGroupModel, ParameterModel,
    SourceModel, SubTypesModel, XmlDslModel,
};
pub use types::{
    MetadataType, ModelError, ObjectField, ObjectType, PrimitiveKind, TypeAnnotations, TypeGraph,
    TypeId, TypeKind,
};
