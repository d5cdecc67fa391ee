//! Reserved names shared across the resolver.

/// Generic key under which a map's value declaration is stored.
///
/// Starts with `#` so it can never collide with a type identity.
pub const MAP_VALUE_KEY: &str = "#value";

/// Suffix appended to a collection's element name to name its items when the
/// model does not opt in to singularization.
pub const ITEM_SUFFIX: &str = "-item";

/// Name of the parameter group every entity gets when none is declared.
pub const DEFAULT_GROUP_NAME: &str = "General";

/// Model property name reported when an extension has no XML DSL model.
pub const XML_DSL_MODEL_PROPERTY: &str = "XmlDslModel";

/// Path separator used in diagnostics and anonymous cache keys.
pub const PATH_SEPARATOR: &str = "/";
