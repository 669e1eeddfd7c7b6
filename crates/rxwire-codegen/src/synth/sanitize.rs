//! Identifier sanitizer

use once_cell::sync::Lazy;
use phf::phf_set;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;

use crate::ir::Parameter;

/// Strict, reserved and edition-specific keywords
static RESERVED: phf::Set<&'static str> = phf_set! {
    "as", "async", "await", "break", "const", "continue", "crate", "dyn",
    "else", "enum", "extern", "false", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
    "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "try", "typeof", "unsized", "virtual", "yield", "_",
};

/// Keywords that cannot be written as raw identifiers
static NOT_RAW: phf::Set<&'static str> = phf_set! { "crate", "self", "Self", "super", "_" };

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid identifier pattern"));

/// Whether `name` is a plain ASCII identifier (keywords included)
pub fn is_identifier(name: &str) -> bool {
    name != "_" && IDENTIFIER.is_match(name)
}

/// Whether `name` is reserved in the target language
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(name)
}

/// Make `name` usable as an identifier
///
/// Keywords become raw identifiers (`type` → `r#type`); the few that cannot
/// be raw get a trailing underscore (`self` → `self_`). Anything else is
/// returned as is.
pub fn sanitize_identifier(name: &str) -> Cow<'_, str> {
    if NOT_RAW.contains(name) {
        Cow::Owned(format!("{name}_"))
    } else if RESERVED.contains(name) {
        Cow::Owned(format!("r#{name}"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Sanitized, pairwise distinct names for a parameter list
///
/// Names in `taken` (such as the generated callback identifier) are never
/// produced. Blank names fall back to `arg<i>`; collisions get a numeric
/// suffix.
pub fn unique_parameter_names(parameters: &[Parameter], taken: &[&str]) -> Vec<String> {
    let mut used: HashSet<String> = taken.iter().map(|t| t.to_string()).collect();
    let mut names = Vec::with_capacity(parameters.len());

    for (index, parameter) in parameters.iter().enumerate() {
        let base = if is_identifier(&parameter.name) {
            sanitize_identifier(&parameter.name).into_owned()
        } else {
            format!("arg{index}")
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while used.contains(&candidate) {
            candidate = format!("{}_{suffix}", base.trim_start_matches("r#"));
            suffix += 1;
        }

        used.insert(candidate.clone());
        names.push(candidate);
    }

    names
}

/// Convert `PascalCase`/`camelCase` to `snake_case`
///
/// Acronym runs stay together (`HTTPRequest` → `http_request`,
/// `IButton` → `i_button`).
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                None | Some('_') => false,
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                Some(_) => false,
            };
            if boundary {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeReference;
    use rstest::rstest;

    fn params(names: &[&str]) -> Vec<Parameter> {
        names
            .iter()
            .map(|n| Parameter::new(*n, TypeReference::new("", "i32")))
            .collect()
    }

    #[rstest]
    #[case("value", "value")]
    #[case("type", "r#type")]
    #[case("match", "r#match")]
    #[case("async", "r#async")]
    #[case("gen", "r#gen")]
    #[case("self", "self_")]
    #[case("Self", "Self_")]
    #[case("super", "super_")]
    #[case("crate", "crate_")]
    #[case("Type", "Type")]
    fn test_sanitize_identifier(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_identifier(input), expected);
    }

    #[test]
    fn test_plain_names_are_borrowed() {
        assert!(matches!(sanitize_identifier("sender"), Cow::Borrowed("sender")));
    }

    #[rstest]
    #[case("Pressed", true)]
    #[case("_private", true)]
    #[case("value2", true)]
    #[case("", false)]
    #[case("_", false)]
    #[case("2fast", false)]
    #[case("with space", false)]
    #[case("dash-ed", false)]
    fn test_is_identifier(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(input), expected);
    }

    #[test]
    fn test_unique_names_avoid_callback() {
        let names = unique_parameter_names(&params(&["on_next", "value"]), &["on_next"]);
        assert_eq!(names, vec!["on_next_1", "value"]);
    }

    #[test]
    fn test_unique_names_after_sanitization() {
        let names = unique_parameter_names(&params(&["type", "type", "self", "self_"]), &[]);
        assert_eq!(names, vec!["r#type", "type_1", "self_", "self__1"]);
    }

    #[test]
    fn test_blank_names_get_positional_fallback() {
        let names = unique_parameter_names(&params(&["", "x", ""]), &[]);
        assert_eq!(names, vec!["arg0", "x", "arg2"]);
    }

    #[rstest]
    #[case("Pressed", "pressed")]
    #[case("ValueChanged", "value_changed")]
    #[case("IButton", "i_button")]
    #[case("HTTPRequest", "http_request")]
    #[case("Node2D", "node2_d")]
    #[case("already_snake", "already_snake")]
    #[case("camelCase", "camel_case")]
    fn test_to_snake_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_snake_case(input), expected);
    }

    #[test]
    fn test_reserved_words() {
        assert!(is_reserved("fn"));
        assert!(is_reserved("yield"));
        assert!(!is_reserved("value"));
    }
}
