//! Parameter placement: attribute vs child element.

use std::sync::Arc;

use crate::helpers::extension_fixtures::*;
use crate::helpers::syntax_assertions::*;
use dslsyntax::dsl::{Severity, codes};
use dslsyntax::model::{
    ElementDslModel, ExpressionSupport, ExtensionModel, LayoutModel, MetadataType, ObjectField,
    ParameterModel, ParameterRole,
};
use dslsyntax::{DslError, DslSyntaxResolver, ExtensionRegistry, ResolverOptions, SyntaxDeclaration};
use rstest::rstest;

/// Resolves operation `op` holding the given parameters and returns its root.
fn resolve_op(extension: &mut ExtensionModel, parameters: Vec<ParameterModel>) -> Arc<SyntaxDeclaration> {
    add_operation(extension, "op", parameters);
    let registry = ExtensionRegistry::new();
    let mut resolver = DslSyntaxResolver::new(extension, &registry);
    resolver
        .resolve_top_level(operation(extension, "op"))
        .expect("operation should resolve")
}

// =============================================================================
// ROLES & TEXT
// =============================================================================

#[rstest]
#[case(ParameterRole::Behaviour, true, false)]
#[case(ParameterRole::Content, false, true)]
#[case(ParameterRole::PrimaryContent, false, true)]
fn test_string_parameter_placement_by_role(
    #[case] role: ParameterRole,
    #[case] attribute: bool,
    #[case] child_element: bool,
) {
    let mut extension = mock_extension();
    let string = add_type(&mut extension, MetadataType::string());

    let root = resolve_op(
        &mut extension,
        vec![ParameterModel::new("payload", string).with_role(role)],
    );
    let param = child(&root, "payload");

    assert_eq!(param.supports_attribute_declaration(), attribute);
    assert_eq!(param.supports_child_declaration(), child_element);
    assert_eq!(param.element_name(), "payload");
    assert_eq!(param.attribute_name().is_empty(), !attribute);
}

#[test]
fn test_text_layout_is_child_only() {
    let mut extension = mock_extension();
    let string = add_type(&mut extension, MetadataType::string());

    let root = resolve_op(
        &mut extension,
        vec![ParameterModel::new("script", string).with_layout(LayoutModel::text())],
    );

    assert_child_only(child(&root, "script"));
}

#[test]
fn test_textual_type_is_child_only() {
    let mut extension = mock_extension();
    let text = add_type(&mut extension, MetadataType::string().text());

    let root = resolve_op(&mut extension, vec![ParameterModel::new("body", text)]);

    assert_child_only(child(&root, "body"));
}

#[test]
fn test_content_parameters_never_support_attributes() {
    let mut extension = mock_extension();
    let string = add_type(&mut extension, MetadataType::string());
    let pojo = add_pojo(&mut extension);
    let strings = add_type(&mut extension, MetadataType::array(string));
    let parameters = vec![
        ParameterModel::new("plain", string),
        ParameterModel::new("content", string).with_role(ParameterRole::Content),
        ParameterModel::new("primary", pojo).with_role(ParameterRole::PrimaryContent),
        ParameterModel::new("pojo", pojo),
        ParameterModel::new("listContent", strings).with_role(ParameterRole::Content),
    ];
    let roles: Vec<(String, ParameterRole)> = parameters
        .iter()
        .map(|param| (param.name.to_string(), param.role))
        .collect();

    let root = resolve_op(&mut extension, parameters);

    for (name, role) in roles {
        let param = child(&root, &name);
        assert!(
            !(role.is_content() && param.supports_attribute_declaration()),
            "content parameter '{}' must not support attributes",
            name
        );
    }
}

// =============================================================================
// PRIMITIVES & ENUMS
// =============================================================================

#[test]
fn test_enum_is_attribute_only() {
    let mut extension = mock_extension();
    let level = add_type(&mut extension, MetadataType::enumeration(["LOW", "HIGH"]));

    let root = resolve_op(&mut extension, vec![ParameterModel::new("level", level)]);

    assert_attribute_only(child(&root, "level"));
}

#[test]
fn test_extensible_primitive_supports_both() {
    let mut extension = mock_extension();
    let open = add_type(&mut extension, MetadataType::string().extensible());

    let root = resolve_op(&mut extension, vec![ParameterModel::new("value", open)]);
    let param = child(&root, "value");

    assert!(param.supports_attribute_declaration());
    assert!(param.supports_child_declaration());
}

// =============================================================================
// OBJECTS
// =============================================================================

#[test]
fn test_simple_object_supports_attribute_and_child() {
    let mut extension = mock_extension();
    let pojo = add_pojo(&mut extension);

    let root = resolve_op(&mut extension, vec![ParameterModel::new("pojo", pojo)]);
    let param = child(&root, "pojo");

    assert!(param.supports_attribute_declaration());
    assert!(param.supports_child_declaration());
    assert_eq!(child_names(param), vec!["name", "count"]);
    assert_attribute_leaf(child(param, "name"), "name");
    assert_attribute_leaf(child(param, "count"), "count");
}

#[test]
fn test_simple_object_without_expressions_is_child_only() {
    let mut extension = mock_extension();
    let pojo = add_pojo(&mut extension);

    let root = resolve_op(
        &mut extension,
        vec![ParameterModel::new("pojo", pojo).with_expression_support(ExpressionSupport::NotSupported)],
    );

    assert_child_only(child(&root, "pojo"));
}

#[test]
fn test_nested_object_is_child_only() {
    let mut extension = mock_extension();
    let pojo = add_pojo(&mut extension);
    let complex = add_type(
        &mut extension,
        MetadataType::object("org.Complex")
            .instantiable()
            .with_fields(vec![ObjectField::new("inner", pojo)]),
    );

    let root = resolve_op(&mut extension, vec![ParameterModel::new("complex", complex)]);
    let param = child(&root, "complex");

    assert_child_only(param);
    assert_eq!(child(param, "inner").element_name(), "inner");
}

#[test]
fn test_global_object_supports_reference_attribute() {
    let mut extension = mock_extension();
    let pojo = add_pojo(&mut extension);
    let global = add_type(
        &mut extension,
        MetadataType::object("org.GlobalTarget")
            .instantiable()
            .top_level()
            .with_fields(vec![ObjectField::new("inner", pojo)]),
    );
    let no_references = ElementDslModel {
        allows_references: false,
        ..ElementDslModel::default()
    };

    let root = resolve_op(
        &mut extension,
        vec![
            ParameterModel::new("target", global),
            ParameterModel::new("inlineTarget", global).with_dsl(no_references),
        ],
    );
    let target = child(&root, "target");

    assert!(target.supports_attribute_declaration());
    assert!(target.supports_child_declaration());
    assert!(target.supports_top_level_declaration());
    assert_child_only(child(&root, "inlineTarget"));
}

#[test]
fn test_object_without_inline_definition_is_attribute_only() {
    let mut extension = mock_extension();
    let pojo = add_pojo(&mut extension);
    let reference_only = ElementDslModel {
        allows_inline_definition: false,
        ..ElementDslModel::default()
    };

    let root = resolve_op(
        &mut extension,
        vec![ParameterModel::new("pojo", pojo).with_dsl(reference_only)],
    );

    assert_attribute_only(child(&root, "pojo"));
}

// =============================================================================
// COLLECTIONS
// =============================================================================

#[test]
fn test_list_of_strings_names_items_with_suffix() {
    let mut extension = mock_extension();
    let string = add_type(&mut extension, MetadataType::string());
    let strings = add_type(&mut extension, MetadataType::array(string));

    let root = resolve_op(&mut extension, vec![ParameterModel::new("tags", strings)]);
    let param = child(&root, "tags");

    assert!(param.supports_child_declaration());
    assert!(param.supports_attribute_declaration());
    assert_eq!(generic_keys(param), vec!["string"]);
    assert_eq!(param.generic("string").unwrap().element_name(), "tags-item");
}

#[test]
fn test_singularizable_list_uses_singular_item_name() {
    let mut extension = mock_extension();
    let string = add_type(&mut extension, MetadataType::string());
    let strings = add_type(&mut extension, MetadataType::array(string));

    let root = resolve_op(
        &mut extension,
        vec![ParameterModel::new("singularizableNames", strings).with_dsl(ElementDslModel::singularizable())],
    );
    let param = child(&root, "singularizableNames");

    assert_eq!(param.element_name(), "singularizable-names");
    assert_eq!(
        param.generic("string").unwrap().element_name(),
        "singularizable-name"
    );
}

#[test]
fn test_list_of_identified_objects_reuses_type_declaration() {
    let mut extension = mock_extension();
    let pojo = add_pojo(&mut extension);
    let pojos = add_type(&mut extension, MetadataType::array(pojo));
    add_operation(&mut extension, "op", vec![ParameterModel::new("pojos", pojos)]);
    let registry = ExtensionRegistry::new();
    let mut resolver = DslSyntaxResolver::new(&extension, &registry);

    let root = resolver.resolve_top_level(operation(&extension, "op")).unwrap();
    let param = child(&root, "pojos");
    let item = resolver.resolve_generic(param, pojo).expect("item generic");
    let pojo_type = resolver.resolve_type(pojo).unwrap().expect("identified object");

    assert!(!param.supports_attribute_declaration());
    assert_eq!(item.element_name(), "pojo");
    assert!(Arc::ptr_eq(&item, &pojo_type));
}

#[test]
fn test_list_of_union_has_one_generic_per_variant() {
    let mut extension = mock_extension();
    let pojo = add_pojo(&mut extension);
    let string = add_type(&mut extension, MetadataType::string());
    let either = add_type(&mut extension, MetadataType::union(vec![string, pojo]));
    let items = add_type(&mut extension, MetadataType::array(either));

    let root = resolve_op(&mut extension, vec![ParameterModel::new("items", items)]);

    assert_eq!(generic_keys(child(&root, "items")), vec!["string", "org.Pojo"]);
}

#[test]
fn test_map_value_uses_reserved_key() {
    let mut extension = mock_extension();
    let number = add_type(&mut extension, MetadataType::number());
    let headers = add_type(&mut extension, MetadataType::map(number));

    let root = resolve_op(&mut extension, vec![ParameterModel::new("headers", headers)]);
    let param = child(&root, "headers");
    let value = param.map_value().expect("map value declaration");

    assert_eq!(value.element_name(), "headers-item");
    assert_eq!(generic_keys(param), vec!["#value"]);
}

// =============================================================================
// AMBIGUOUS PLACEMENT
// =============================================================================

fn extension_with_conflicting_level() -> ExtensionModel {
    let mut extension = mock_extension();
    let level = add_type(
        &mut extension,
        MetadataType::enumeration(["LOW", "HIGH"]).with_identity("org.Level"),
    );
    add_operation(&mut extension, "configure", vec![ParameterModel::new("level", level)]);
    add_operation(
        &mut extension,
        "log",
        vec![ParameterModel::new("body", level).with_role(ParameterRole::Content)],
    );
    extension
}

#[test]
fn test_content_on_attribute_only_type_is_reported() {
    let extension = extension_with_conflicting_level();
    let registry = ExtensionRegistry::new();
    let mut resolver = DslSyntaxResolver::new(&extension, &registry);

    let syntax = resolver.resolve_extension().unwrap();

    assert_eq!(syntax.problems.len(), 1);
    let problem = &syntax.problems[0];
    assert_eq!(problem.code, codes::AMBIGUOUS_ATTRIBUTE_CHILD);
    assert_eq!(problem.severity, Severity::Error);
    assert_eq!(problem.entity.as_ref(), "log");
    assert_eq!(problem.path.as_ref(), "log/body");
    assert!(problem.message.contains("org.Level"));
}

#[test]
fn test_content_on_attribute_only_type_fails_when_strict() {
    let extension = extension_with_conflicting_level();
    let registry = ExtensionRegistry::new();
    let mut resolver =
        DslSyntaxResolver::with_options(&extension, &registry, ResolverOptions::strict());

    let err = resolver.resolve_extension().unwrap_err();

    match err {
        DslError::AmbiguousAttributeChild {
            entity, parameter, ..
        } => {
            assert_eq!(entity, "log");
            assert_eq!(parameter, "body");
        }
        other => panic!("Expected AmbiguousAttributeChild, got {:?}", other),
    }
    assert!(resolver.problems().is_empty());
}

#[test]
fn test_failed_strict_resolution_fails_again_on_retry() {
    let extension = extension_with_conflicting_level();
    let registry = ExtensionRegistry::new();
    let mut resolver =
        DslSyntaxResolver::with_options(&extension, &registry, ResolverOptions::strict());

    assert!(resolver.resolve_top_level(operation(&extension, "configure")).is_ok());
    assert!(resolver.resolve_top_level(operation(&extension, "log")).is_err());
    // The failed call leaves no trace, so retrying fails the same way.
    assert!(resolver.resolve_top_level(operation(&extension, "log")).is_err());
    assert!(resolver.cache().len() >= 2);
}
