//! Namespace resolver
//!
//! Computes the glob imports an artifact needs. Generated code refers to
//! every type by its short name, so each namespace reachable from the owner,
//! the handlers and the parameter types (plus their immediate generic
//! arguments) has to be imported.

use std::collections::BTreeSet;

use rxwire_core::config::NamespaceConfig;

use crate::ir::{EventDeclaration, TypeReference};

/// Resolves the sorted import list for an artifact
#[derive(Debug, Clone)]
pub struct NamespaceResolver {
    baseline: Vec<String>,
}

impl NamespaceResolver {
    /// Create a resolver with the given baseline namespaces
    pub fn new<I, S>(baseline: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            baseline: baseline.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a resolver from project configuration
    pub fn from_config(config: &NamespaceConfig) -> Self {
        Self::new(config.baseline())
    }

    /// Deduplicated, lexicographically sorted namespaces for `owner` and
    /// `events`
    ///
    /// Generic arguments are followed one level deep only. Events that are
    /// not eligible contribute nothing.
    pub fn resolve(&self, owner: &TypeReference, events: &[EventDeclaration]) -> Vec<String> {
        let mut namespaces: BTreeSet<&str> = self.baseline.iter().map(String::as_str).collect();
        namespaces.insert(&owner.namespace);

        for event in events.iter().filter(|e| e.is_eligible()) {
            namespaces.insert(&event.signature.handler.namespace);
            for parameter in event.signature.parameters() {
                namespaces.insert(&parameter.ty.namespace);
                for arg in &parameter.ty.args {
                    namespaces.insert(&arg.namespace);
                }
            }
        }

        namespaces
            .into_iter()
            .filter(|ns| !ns.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// `use <ns>::*;` lines for a resolved list
    pub fn render_imports(namespaces: &[String]) -> String {
        namespaces
            .iter()
            .map(|ns| format!("use {ns}::*;\n"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{DelegateSignature, Parameter};

    fn resolver() -> NamespaceResolver {
        NamespaceResolver::from_config(&NamespaceConfig::default())
    }

    fn event(handler: &str, parameter_types: &[&str]) -> EventDeclaration {
        let parameters = parameter_types
            .iter()
            .enumerate()
            .map(|(i, t)| Parameter::new(format!("p{i}"), TypeReference::parse(t).unwrap()))
            .collect();
        EventDeclaration {
            owner: TypeReference::new("ui::controls", "Button"),
            name: "Changed".to_string(),
            has_add: true,
            has_remove: true,
            signature: DelegateSignature::from_parameters(
                TypeReference::parse(handler).unwrap(),
                parameters,
                false,
            ),
        }
    }

    #[test]
    fn test_baseline_and_owner() {
        let owner = TypeReference::new("ui::controls", "Button");
        let namespaces = resolver().resolve(&owner, &[]);
        assert_eq!(
            namespaces,
            vec![
                "rxwire_runtime",
                "rxwire_runtime::host",
                "tokio_util::sync",
                "ui::controls"
            ]
        );
    }

    #[test]
    fn test_handler_and_parameter_namespaces_sorted() {
        let owner = TypeReference::new("ui::controls", "Button");
        let events = vec![
            event("ui::signals::ChangedHandler", &["zeta::Value", "alpha::Other"]),
            event("ui::signals::OtherHandler", &["zeta::Value"]),
        ];

        let namespaces = resolver().resolve(&owner, &events);
        let mut sorted = namespaces.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(namespaces, sorted);
        assert!(namespaces.contains(&"alpha".to_string()));
        assert!(namespaces.contains(&"zeta".to_string()));
        assert!(namespaces.contains(&"ui::signals".to_string()));
        assert_eq!(namespaces.iter().filter(|ns| *ns == "zeta").count(), 1);
    }

    #[test]
    fn test_generic_arguments_one_level() {
        let owner = TypeReference::new("", "Root");
        let events = vec![event("h::Handler", &["std::collections::HashMap<model::Key, deep::Box<deeper::Item>>"])];

        let namespaces = resolver().resolve(&owner, &events);
        assert!(namespaces.contains(&"std::collections".to_string()));
        assert!(namespaces.contains(&"model".to_string()));
        assert!(namespaces.contains(&"deep".to_string()));
        assert!(!namespaces.contains(&"deeper".to_string()));
    }

    #[test]
    fn test_prelude_types_add_nothing() {
        let owner = TypeReference::new("", "Root");
        let events = vec![event("Handler", &["bool", "String"])];

        let namespaces = resolver().resolve(&owner, &events);
        assert_eq!(namespaces.len(), 3);
        assert!(namespaces.iter().all(|ns| !ns.is_empty()));
    }

    #[test]
    fn test_ineligible_events_are_ignored() {
        let owner = TypeReference::new("ui", "Button");
        let mut skipped = event("other::Handler", &["other::Value"]);
        skipped.has_add = false;

        let namespaces = resolver().resolve(&owner, &[skipped]);
        assert!(!namespaces.contains(&"other".to_string()));
    }

    #[test]
    fn test_custom_baseline() {
        let resolver = NamespaceResolver::new(["b", "a", "a"]);
        let namespaces = resolver.resolve(&TypeReference::new("", "T"), &[]);
        assert_eq!(namespaces, vec!["a", "b"]);
    }

    #[test]
    fn test_render_imports() {
        let imports = NamespaceResolver::render_imports(&["a::b".to_string(), "c".to_string()]);
        assert_eq!(imports, "use a::b::*;\nuse c::*;\n");
    }
}
