//! Whole-extension and batch resolution.

use std::sync::Arc;

use crate::helpers::extension_fixtures::*;
use crate::helpers::syntax_assertions::*;
use dslsyntax::model::{
    ConfigurationModel, EntityKind, ImportedTypeModel, MetadataType, ObjectField, OperationModel,
    ParameterModel, SourceModel, XmlDslModel,
};
use dslsyntax::{
    DslError, DslSyntaxResolver, ExtensionModel, ExtensionRegistry, ResolverOptions,
    resolve_extensions,
};

fn full_extension() -> ExtensionModel {
    let mut extension = mock_extension();
    let string = add_type(&mut extension, MetadataType::string());
    let pojo = add_pojo(&mut extension);
    add_type(
        &mut extension,
        MetadataType::object("org.GlobalTarget")
            .instantiable()
            .top_level()
            .with_fields(vec![ObjectField::new("name", string)]),
    );
    extension.configurations.push(
        ConfigurationModel::new("config")
            .with_parameters(vec![ParameterModel::new("host", string)])
            .with_operation(
                OperationModel::new("send").with_parameters(vec![ParameterModel::new("pojo", pojo)]),
            ),
    );
    extension
        .sources
        .push(SourceModel::new("listener").with_parameters(vec![ParameterModel::new("path", string)]));
    extension
}

#[test]
fn test_resolve_extension_lists_entities_in_model_order() {
    let extension = full_extension();
    let registry = ExtensionRegistry::new();
    let mut resolver = DslSyntaxResolver::new(&extension, &registry);

    let syntax = resolver.resolve_extension().unwrap();
    let names: Vec<(EntityKind, String)> = syntax
        .declarations
        .keys()
        .map(|(kind, name)| (*kind, name.to_string()))
        .collect();

    assert_eq!(syntax.name.as_ref(), MOCK_EXTENSION);
    assert_eq!(syntax.namespace.prefix.as_ref(), MOCK_PREFIX);
    assert_eq!(
        names,
        vec![
            (EntityKind::Configuration, "config".to_string()),
            (EntityKind::Operation, "send".to_string()),
            (EntityKind::Source, "listener".to_string()),
        ]
    );
    assert!(syntax.problems.is_empty());
}

#[test]
fn test_resolve_extension_declares_global_types() {
    let extension = full_extension();
    let registry = ExtensionRegistry::new();
    let mut resolver = DslSyntaxResolver::new(&extension, &registry);

    let syntax = resolver.resolve_extension().unwrap();
    let global = syntax
        .type_declaration("org.GlobalTarget")
        .expect("global type declared");

    assert_eq!(syntax.types.len(), 1);
    assert_eq!(global.element_name(), "global-target");
    assert!(global.supports_top_level_declaration());
    assert!(syntax.type_declaration("org.Pojo").is_none());
}

#[test]
fn test_resolve_extension_shares_cache_with_later_calls() {
    let extension = full_extension();
    let registry = ExtensionRegistry::new();
    let mut resolver = DslSyntaxResolver::new(&extension, &registry);

    let syntax = resolver.resolve_extension().unwrap();
    let send = extension
        .find_declarable(EntityKind::Operation, "send")
        .unwrap();
    let again = resolver.resolve_top_level(send).unwrap();

    let declared = syntax
        .declaration(EntityKind::Operation, "send")
        .expect("send declared");
    assert!(Arc::ptr_eq(declared, &again));
    assert_eq!(child_names(declared), vec!["pojo"]);
}

#[test]
fn test_resolve_extension_without_namespace_model_fails() {
    let extension = ExtensionModel::new("bare");
    let registry = ExtensionRegistry::new();
    let mut resolver = DslSyntaxResolver::new(&extension, &registry);

    let err = resolver.resolve_extension().unwrap_err();

    assert_eq!(err.code(), "D0001");
}

#[test]
fn test_resolve_extensions_keeps_request_order() {
    let registry = ExtensionRegistry::new()
        .with(full_extension())
        .with(other_extension());

    let results = resolve_extensions(
        &registry,
        &[MOCK_EXTENSION, OTHER_EXTENSION, "missing"],
        &ResolverOptions::default(),
    );

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().name.as_ref(), MOCK_EXTENSION);
    assert_eq!(results[1].as_ref().unwrap().name.as_ref(), OTHER_EXTENSION);
    assert!(results[1].as_ref().unwrap().declarations.is_empty());
    assert_eq!(
        results[2].as_ref().unwrap_err(),
        &DslError::ExtensionNotFound {
            name: "missing".to_string(),
        }
    );
}

#[test]
fn test_resolve_extensions_resolves_imports_across_registry() {
    let mut importer = ExtensionModel::new("importer")
        .with_xml_dsl(XmlDslModel::new("imp", "http://www.example.com/schema/importer"));
    let string = add_type(&mut importer, MetadataType::string());
    let thing = add_type(
        &mut importer,
        MetadataType::object("org.other.Thing").with_fields(vec![ObjectField::new("id", string)]),
    );
    importer
        .imported_types
        .push(ImportedTypeModel::new(thing, OTHER_EXTENSION));
    add_operation(&mut importer, "use", vec![ParameterModel::new("thing", thing)]);
    let registry = ExtensionRegistry::new()
        .with(importer)
        .with(other_extension());

    let results = resolve_extensions(&registry, &["importer"], &ResolverOptions::strict());
    let syntax = results[0].as_ref().unwrap();
    let used = syntax
        .declaration(EntityKind::Operation, "use")
        .expect("use declared");

    assert_eq!(child(used, "thing").namespace(), "imp");
    assert_eq!(child(child(used, "thing"), "id").attribute_name(), "id");
}
