//! Naming rules for element and attribute names.

/// Convert a declared name into its element-name form.
///
/// Word boundaries are inserted before an upper-case letter that follows a
/// lower-case letter or digit, and before the last letter of an acronym run
/// when a lower-case letter follows it. `_`, `-` and whitespace all become a
/// single `-`.
///
/// # Example
/// ```
/// use dslsyntax::base::hyphenize;
///
/// assert_eq!(hyphenize("myCamelCaseName"), "my-camel-case-name");
/// assert_eq!(hyphenize("myURLValue"), "my-url-value");
/// assert_eq!(hyphenize("HTTPConfig"), "http-config");
/// ```
pub fn hyphenize(name: &str) -> String {
    let chars: Vec<char> = name.trim().chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            push_separator(&mut out);
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                push_separator(&mut out);
            }
        }

        out.extend(c.to_lowercase());
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[inline]
fn push_separator(out: &mut String) {
    if !out.is_empty() && !out.ends_with('-') {
        out.push('-');
    }
}

/// English singular form of the last word of `name`.
///
/// Only called when a model explicitly marks a collection as singularizable;
/// names it cannot handle are returned unchanged.
///
/// # Example
/// ```
/// use dslsyntax::base::singularize;
///
/// assert_eq!(singularize("singularizable-names"), "singularizable-name");
/// assert_eq!(singularize("entries"), "entry");
/// assert_eq!(singularize("addresses"), "address");
/// ```
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }

    if name.ends_with("sses") {
        return name[..name.len() - 2].to_string();
    }

    for suffix in ["xes", "ches", "shes"] {
        if name.ends_with(suffix) {
            return name[..name.len() - 2].to_string();
        }
    }

    if name.len() > 1
        && name.ends_with('s')
        && !name.ends_with("ss")
        && !name.ends_with("us")
        && !name.ends_with("is")
    {
        return name[..name.len() - 1].to_string();
    }

    name.to_string()
}

/// Reduce a type identity to its simple name.
///
/// Generic arguments are dropped, only the segment after the last `.`, `$` or
/// `::` is kept, and characters that cannot appear in an identifier are removed.
pub fn sanitize_identity(identity: &str) -> String {
    let base = identity.split('<').next().unwrap_or(identity);
    let last = base.rsplit("::").next().unwrap_or(base);
    let last = last.rsplit(['.', '$']).next().unwrap_or(last);

    last.chars()
        .filter(|c| unicode_ident::is_xid_continue(*c))
        .collect()
}

/// Element name used when a type is declared globally or as a collection item.
///
/// # Example
/// ```
/// use dslsyntax::base::top_level_type_name;
///
/// assert_eq!(top_level_type_name("org.shapes.Circle"), "circle");
/// assert_eq!(top_level_type_name("Outer$InnerPojo"), "inner-pojo");
/// ```
pub fn top_level_type_name(identity: &str) -> String {
    hyphenize(&sanitize_identity(identity))
}
