//! Extension model fixtures for DSL tests.

use dslsyntax::model::{
    Declarable, EntityKind, ExtensionModel, MetadataType, ObjectField, OperationModel,
    ParameterModel, SubTypesModel, TypeId, XmlDslModel,
};

pub const MOCK_EXTENSION: &str = "mock";
pub const MOCK_PREFIX: &str = "mockns";
pub const MOCK_NAMESPACE_URI: &str = "http://www.example.com/schema/mock/mockns";

pub const OTHER_EXTENSION: &str = "other";
pub const OTHER_PREFIX: &str = "other";
pub const OTHER_NAMESPACE_URI: &str = "http://www.example.com/schema/other";

/// An empty extension declaring the `mockns` namespace.
pub fn mock_extension() -> ExtensionModel {
    ExtensionModel::new(MOCK_EXTENSION).with_xml_dsl(
        XmlDslModel::new(MOCK_PREFIX, MOCK_NAMESPACE_URI)
            .with_schema_location("http://www.example.com/schema/mock/mockns/current/mock.xsd")
            .with_xsd_file_name("mock.xsd"),
    )
}

/// An empty extension declaring the `other` namespace.
pub fn other_extension() -> ExtensionModel {
    ExtensionModel::new(OTHER_EXTENSION).with_xml_dsl(XmlDslModel::new(OTHER_PREFIX, OTHER_NAMESPACE_URI))
}

pub fn add_type(extension: &mut ExtensionModel, ty: MetadataType) -> TypeId {
    extension
        .types
        .add(ty)
        .expect("type should be added to the graph")
}

/// Adds an extension-level operation with the given parameters.
pub fn add_operation(extension: &mut ExtensionModel, name: &str, parameters: Vec<ParameterModel>) {
    extension
        .operations
        .push(OperationModel::new(name).with_parameters(parameters));
}

/// Looks up an extension-level operation.
pub fn operation<'a>(extension: &'a ExtensionModel, name: &str) -> Declarable<'a> {
    extension
        .find_declarable(EntityKind::Operation, name)
        .unwrap_or_else(|| panic!("Expected operation '{}' in '{}'", name, extension.name))
}

/// A simple instantiable bean `org.Pojo { name: string, count: number }`.
pub fn add_pojo(extension: &mut ExtensionModel) -> TypeId {
    let string = add_type(extension, MetadataType::string());
    let number = add_type(extension, MetadataType::number());
    add_type(
        extension,
        MetadataType::object("org.Pojo").instantiable().with_fields(vec![
            ObjectField::new("name", string),
            ObjectField::new("count", number),
        ]),
    )
}

/// Types of the shape hierarchy.
pub struct ShapeTypes {
    pub string: TypeId,
    pub shape: TypeId,
    pub circle: TypeId,
    pub square: TypeId,
}

/// `org.shapes.Shape` (extensible) with sub-types `Circle` and `Square`.
pub fn add_shape_hierarchy(extension: &mut ExtensionModel) -> ShapeTypes {
    let string = add_type(extension, MetadataType::string());
    let number = add_type(extension, MetadataType::number());
    let shape = add_type(
        extension,
        MetadataType::object("org.shapes.Shape")
            .extensible()
            .with_fields(vec![ObjectField::new("label", string)]),
    );
    let circle = add_type(
        extension,
        MetadataType::object("org.shapes.Circle")
            .instantiable()
            .with_fields(vec![
                ObjectField::new("label", string),
                ObjectField::new("radius", number),
            ]),
    );
    let square = add_type(
        extension,
        MetadataType::object("org.shapes.Square")
            .instantiable()
            .with_fields(vec![
                ObjectField::new("label", string),
                ObjectField::new("side", number),
            ]),
    );
    extension
        .sub_types
        .push(SubTypesModel::new(shape, vec![circle, square]));

    ShapeTypes {
        string,
        shape,
        circle,
        square,
    }
}

/// `org.tree.Node { A: Node, B: string }`.
pub fn add_self_referencing_node(extension: &mut ExtensionModel) -> TypeId {
    let string = add_type(extension, MetadataType::string());
    let node = add_type(extension, MetadataType::object("org.tree.Node"));
    extension
        .types
        .push_field(node, ObjectField::new("A", node))
        .expect("node is an object");
    extension
        .types
        .push_field(node, ObjectField::new("B", string))
        .expect("node is an object");
    node
}
