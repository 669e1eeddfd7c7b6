//! Type catalog
//!
//! The catalog is the serializable description of event-bearing types that a
//! synthesis pass consumes. It is produced outside of rxwire (by a host adapter
//! or by hand) and loaded here without interpretation: eligibility checks and
//! signature classification happen later, in `rxwire-codegen`.
//!
//! # Example
//!
//! ```yaml
//! types:
//!   - name: IButton
//!     namespace: godot_nodes::controls
//!     kind: trait
//!     extendable: true
//!     concrete: Button
//!     events:
//!       - name: Pressed
//!         add: true
//!         remove: true
//!         handler:
//!           type: godot_nodes::signals::PressedHandler
//!           parameters: []
//!       - name: Toggled
//!         add: true
//!         remove: true
//!         handler:
//!           type: godot_nodes::signals::ToggledHandler
//!           constructor: true
//!           parameters:
//!             - name: toggled_on
//!               type: bool
//! ```
//!
//! Every field except `name` has a permissive default, so partially specified
//! declarations load fine and are filtered out downstream instead of failing
//! the whole catalog.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Kind of an event-bearing type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// A trait; wrappers are provided through a blanket impl
    #[default]
    Trait,
    /// A concrete type; wrappers are implemented for the type itself
    Struct,
}

/// An event-bearing type as listed by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogType {
    /// Short type name
    pub name: String,

    /// Module path containing the type (`a::b`), empty for the crate root
    #[serde(default)]
    pub namespace: String,

    /// Trait or struct
    #[serde(default)]
    pub kind: TypeKind,

    /// Whether generated members may be added to the type itself
    #[serde(default)]
    pub extendable: bool,

    /// For a trait, the concrete type that receives its signal bindings;
    /// a short name resolves in the trait's namespace
    #[serde(default)]
    pub concrete: Option<String>,

    /// Raw event declarations, in declaration order
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

impl CatalogType {
    /// Create a type with no events
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind: TypeKind::default(),
            extendable: false,
            concrete: None,
            events: Vec::new(),
        }
    }

    /// Fully qualified path of the type
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }
}

/// A raw event declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event name
    #[serde(default)]
    pub name: String,

    /// Whether an add accessor exists
    #[serde(default)]
    pub add: bool,

    /// Whether a remove accessor exists
    #[serde(default)]
    pub remove: bool,

    /// Qualified name of the type that declares the event, when it is
    /// inherited or re-exposed from elsewhere
    #[serde(default)]
    pub declared_in: Option<String>,

    /// Handler (delegate) description
    #[serde(default)]
    pub handler: Option<RawHandler>,
}

/// Kind of the type backing an event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    /// A callable handler with a fixed parameter list
    #[default]
    Delegate,
    /// Anything else (not wrappable)
    Other,
}

/// Raw handler description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHandler {
    /// Handler type path, e.g. `godot_nodes::signals::PressedHandler`
    #[serde(rename = "type", default)]
    pub type_name: String,

    /// Delegate or other
    #[serde(default)]
    pub kind: HandlerKind,

    /// Whether the handler has a public constructor taking a plain callback
    #[serde(default)]
    pub constructor: bool,

    /// Invoke parameters; absent when the invoke shape is unknown
    #[serde(default)]
    pub parameters: Option<Vec<RawParameter>>,
}

/// Raw handler parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawParameter {
    /// Parameter name
    #[serde(default)]
    pub name: String,

    /// Parameter type path
    #[serde(rename = "type", default)]
    pub type_name: String,
}

/// Source of event-bearing types for a synthesis pass
pub trait TypeCatalog {
    /// List every type under `root` that declares at least one event
    fn list_event_bearing_types(&self, root: &Path) -> Result<Vec<CatalogType>>;
}

/// Catalog file layout
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    types: Vec<CatalogType>,
}

/// Catalog backed by YAML/JSON files
///
/// `root` may be a single file or a directory, which is walked recursively.
/// Files are read in path order so the listing is stable across runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCatalog;

impl FsCatalog {
    /// Parse a single catalog document
    pub fn parse_file(&self, path: &Path) -> Result<Vec<CatalogType>> {
        let contents = std::fs::read_to_string(path)?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");

        let file: CatalogFile = if is_json {
            serde_json::from_str(&contents).map_err(|e| Error::CatalogParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| Error::CatalogParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        };

        Ok(file.types)
    }

    fn catalog_files(root: &Path) -> Vec<std::path::PathBuf> {
        let mut files: Vec<_> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml" || ext == "json")
            })
            .collect();
        files.sort();
        files
    }
}

impl TypeCatalog for FsCatalog {
    fn list_event_bearing_types(&self, root: &Path) -> Result<Vec<CatalogType>> {
        if !root.exists() {
            return Err(Error::CatalogNotFound {
                path: root.display().to_string(),
            });
        }

        let files = if root.is_file() {
            vec![root.to_path_buf()]
        } else {
            Self::catalog_files(root)
        };

        let mut types = Vec::new();
        for file in files {
            tracing::debug!("Reading catalog file: {}", file.display());
            types.extend(
                self.parse_file(&file)?
                    .into_iter()
                    .filter(|t| !t.events.is_empty()),
            );
        }

        Ok(types)
    }
}

/// In-memory catalog, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    types: Vec<CatalogType>,
}

impl StaticCatalog {
    /// Create a catalog over the given types
    pub fn new(types: Vec<CatalogType>) -> Self {
        Self { types }
    }
}

impl TypeCatalog for StaticCatalog {
    fn list_event_bearing_types(&self, _root: &Path) -> Result<Vec<CatalogType>> {
        Ok(self
            .types
            .iter()
            .filter(|t| !t.events.is_empty())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTON_YAML: &str = r#"
types:
  - name: Button
    namespace: godot_nodes::controls
    extendable: true
    events:
      - name: Pressed
        add: true
        remove: true
        handler:
          type: godot_nodes::signals::PressedHandler
          parameters: []
      - name: Toggled
        add: true
        remove: true
        handler:
          type: godot_nodes::signals::ToggledHandler
          constructor: true
          parameters:
            - name: toggled_on
              type: bool
  - name: Label
    namespace: godot_nodes::controls
"#;

    #[test]
    fn test_parse_catalog_yaml() {
        let file: CatalogFile = serde_yaml::from_str(BUTTON_YAML).unwrap();
        assert_eq!(file.types.len(), 2);

        let button = &file.types[0];
        assert_eq!(button.qualified_name(), "godot_nodes::controls::Button");
        assert_eq!(button.kind, TypeKind::Trait);
        assert!(button.extendable);
        assert_eq!(button.events.len(), 2);

        let toggled = button.events[1].handler.as_ref().unwrap();
        assert!(toggled.constructor);
        assert_eq!(toggled.kind, HandlerKind::Delegate);
        assert_eq!(toggled.parameters.as_ref().unwrap()[0].type_name, "bool");
    }

    #[test]
    fn test_partial_event_uses_defaults() {
        let yaml = r#"
types:
  - name: Weird
    events:
      - name: Broken
"#;
        let file: CatalogFile = serde_yaml::from_str(yaml).unwrap();
        let event = &file.types[0].events[0];
        assert!(!event.add);
        assert!(!event.remove);
        assert!(event.handler.is_none());
        assert!(event.declared_in.is_none());
    }

    #[test]
    fn test_qualified_name_without_namespace() {
        let ty = CatalogType::new("Root", "");
        assert_eq!(ty.qualified_name(), "Root");
    }

    #[test]
    fn test_fs_catalog_skips_types_without_events() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("controls.yaml"), BUTTON_YAML).unwrap();

        let types = FsCatalog.list_event_bearing_types(dir.path()).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, "Button");
    }

    #[test]
    fn test_fs_catalog_reads_files_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested/b.json"),
            r#"{"types": [{"name": "B", "events": [{"name": "Changed"}]}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.yml"),
            "types:\n  - name: A\n    events:\n      - name: Changed\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let types = FsCatalog.list_event_bearing_types(dir.path()).unwrap();
        let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_fs_catalog_single_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, BUTTON_YAML).unwrap();

        let types = FsCatalog.list_event_bearing_types(&path).unwrap();
        assert_eq!(types.len(), 1);
    }

    #[test]
    fn test_fs_catalog_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = FsCatalog.list_event_bearing_types(&dir.path().join("absent"));
        assert!(matches!(result, Err(Error::CatalogNotFound { .. })));
    }

    #[test]
    fn test_fs_catalog_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.yaml"), "types: [").unwrap();

        let result = FsCatalog.list_event_bearing_types(dir.path());
        match result {
            Err(Error::CatalogParse { path, .. }) => assert!(path.ends_with("bad.yaml")),
            other => panic!("Expected CatalogParse, got {:?}", other),
        }
    }

    #[test]
    fn test_static_catalog_filters_eventless_types() {
        let mut with_events = CatalogType::new("A", "x");
        with_events.events.push(RawEvent {
            name: "Changed".to_string(),
            ..Default::default()
        });
        let catalog = StaticCatalog::new(vec![with_events, CatalogType::new("B", "x")]);

        let types = catalog.list_event_bearing_types(Path::new(".")).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, "A");
    }
}
