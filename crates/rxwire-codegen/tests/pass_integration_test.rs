//! Integration tests for complete synthesis passes

use std::path::Path;

use rxwire_codegen::diagnostics::Severity;
use rxwire_codegen::sink::DirectorySink;
use rxwire_codegen::{DiagnosticBag, MemorySink, Pass, PassOptions, PassSummary};
use rxwire_core::{FsCatalog, StaticCatalog};

const CATALOG: &str = r#"
types:
  - name: IButton
    namespace: godot_nodes::controls
    kind: trait
    extendable: true
    events:
      - name: Pressed
        add: true
        remove: true
        handler:
          type: rxwire_runtime::UnitHandler
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
      - name: Fired
        add: true
        remove: true
        handler:
          type: godot_nodes::signals::FiredHandler
          parameters:
            - name: name
              type: String
            - name: tags
              type: std::collections::BTreeMap<models::Tag, u32>
      - name: Wide
        add: true
        remove: true
        handler:
          type: godot_nodes::signals::WideHandler
          parameters:
            - { name: a, type: u8 }
            - { name: b, type: u8 }
            - { name: c, type: u8 }
            - { name: d, type: u8 }
            - { name: e, type: u8 }
            - { name: f, type: u8 }
      - name: Inherited
        add: true
        remove: true
        declared_in: godot_nodes::Node
        handler:
          type: godot_nodes::signals::InheritedHandler
          parameters: []
      - name: WriteOnly
        add: true
        handler:
          type: godot_nodes::signals::WriteOnlyHandler
          parameters: []
  - name: Timer
    namespace: godot_nodes::time
    kind: struct
    events:
      - name: Timeout
        add: true
        remove: true
        handler:
          type: godot_nodes::signals::TimeoutHandler
          parameters:
            - { name: type, type: f64 }
  - name: Broken
    namespace: "godot nodes"
    events:
      - name: Changed
        add: true
        remove: true
        handler:
          type: godot_nodes::signals::ChangedHandler
          parameters: []
  - name: Silent
    namespace: godot_nodes
    events:
      - name: Unknown
        add: true
        remove: true
        handler:
          type: godot_nodes::signals::UnknownHandler
"#;

fn catalog() -> StaticCatalog {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.yaml");
    std::fs::write(&path, CATALOG).unwrap();
    StaticCatalog::new(FsCatalog.parse_file(&path).unwrap())
}

fn run(pass: &Pass) -> (MemorySink, DiagnosticBag, PassSummary) {
    let mut sink = MemorySink::default();
    let mut bag = DiagnosticBag::default();
    let summary = pass
        .run(&catalog(), Path::new("."), &mut sink, &mut bag)
        .unwrap();
    (sink, bag, summary)
}

#[test]
fn test_full_pass() {
    let pass = Pass::new(PassOptions::default()).unwrap();
    let (sink, bag, summary) = run(&pass);

    // `Silent` has no eligible events and produces nothing.
    let files: Vec<_> = sink.file_names().collect();
    assert_eq!(
        files,
        vec![
            "i_button_bindings.rs",
            "i_button_observables.rs",
            "timer_observables.rs",
        ]
    );

    assert_eq!(summary.types, 4);
    assert_eq!(summary.artifacts_emitted, 3);
    assert_eq!(summary.artifacts_rejected, 1);
    assert_eq!(summary.warnings, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.fatal, 0);
    assert!(bag.has_errors());
}

#[test]
fn test_every_emitted_artifact_parses() {
    let pass = Pass::new(PassOptions::default()).unwrap();
    let (sink, _, _) = run(&pass);

    for (name, text) in sink.into_inner() {
        syn::parse_file(&text).unwrap_or_else(|e| panic!("{name} does not parse: {e}"));
    }
}

#[test]
fn test_wrapper_contents() {
    let pass = Pass::new(PassOptions::default()).unwrap();
    let (sink, _, _) = run(&pass);
    let text = sink.get("i_button_observables.rs").unwrap();

    assert!(text.contains("fn OnPressedAsObservable(&self, cancellation_token: Option<CancellationToken>) -> Observable<Unit>"));
    assert!(text.contains("|on_next: Callback<bool>| ToggledHandler::new(on_next),"));
    assert!(text.contains("-> Observable<(String, BTreeMap<Tag, u32>)>"));
    assert!(text.contains("FiredHandler::from(move |name: String, tags: BTreeMap<Tag, u32>| on_next((name, tags)))"));
    assert!(text.contains("fn OnWideAsObservable"));
    assert!(!text.contains("Inherited"));
    assert!(!text.contains("WriteOnly"));

    let timer = sink.get("timer_observables.rs").unwrap();
    assert!(timer.contains("impl TimerObservableExtensions for Timer {"));
    assert!(timer.contains("move |r#type: f64| on_next(r#type)"));
}

#[test]
fn test_imports_are_sorted_and_complete() {
    let pass = Pass::new(PassOptions::default()).unwrap();
    let (sink, _, _) = run(&pass);
    let text = sink.get("i_button_observables.rs").unwrap();

    let imports: Vec<_> = text.lines().filter(|l| l.starts_with("use ")).collect();
    assert_eq!(
        imports,
        vec![
            "use godot_nodes::controls::*;",
            "use godot_nodes::signals::*;",
            "use models::*;",
            "use rxwire_runtime::*;",
            "use rxwire_runtime::host::*;",
            "use std::collections::*;",
            "use tokio_util::sync::*;",
        ]
    );
}

#[test]
fn test_binder_skips_wide_signal_with_one_warning() {
    let pass = Pass::new(PassOptions::default()).unwrap();
    let (sink, bag, _) = run(&pass);

    let binders = sink.get("i_button_bindings.rs").unwrap();
    assert!(binders.contains("pub struct ButtonSignalBindings {"));
    assert!(binders.contains("impl Button {"));
    assert!(binders.contains("pub fn OnPressed(&self) -> Subject<Unit>"));
    assert!(binders.contains(r#"emitter.emit_signal("fired", &[&value.0, &value.1]);"#));
    assert!(!binders.contains("OnWide"));

    let warnings: Vec<_> = bag
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, "RXW002");
    assert!(warnings[0].message.contains("'Wide'"));
    assert!(warnings[0].message.contains("godot_nodes::controls::IButton"));
}

#[test]
fn test_trait_binders_need_a_concrete_type() {
    const TRAITS: &str = r#"
types:
  - name: Clickable
    namespace: ui
    kind: trait
    extendable: true
    events:
      - name: Clicked
        add: true
        remove: true
        handler:
          type: rxwire_runtime::UnitHandler
          parameters: []
  - name: Draggable
    namespace: ui
    kind: trait
    extendable: true
    concrete: ui::widgets::Handle
    events:
      - name: Dragged
        add: true
        remove: true
        handler:
          type: ui::DraggedHandler
          parameters:
            - { name: dx, type: f32 }
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("traits.yaml");
    std::fs::write(&path, TRAITS).unwrap();

    let pass = Pass::new(PassOptions::default()).unwrap();
    let mut sink = MemorySink::default();
    let mut bag = DiagnosticBag::default();
    let summary = pass.run(&FsCatalog, &path, &mut sink, &mut bag).unwrap();

    let files: Vec<_> = sink.file_names().collect();
    assert_eq!(
        files,
        vec![
            "clickable_observables.rs",
            "draggable_bindings.rs",
            "draggable_observables.rs",
        ]
    );
    assert_eq!(summary.warnings, 1);
    assert!(!summary.has_errors());

    let warning = bag.iter().find(|d| d.severity == Severity::Warning).unwrap();
    assert_eq!(warning.code, "RXW003");
    assert!(warning.message.contains("'ui::Clickable'"));

    let binders = sink.get("draggable_bindings.rs").unwrap();
    assert!(binders.contains("impl Handle {"));
    assert!(binders.contains("use ui::widgets::*;"));
}

#[test]
fn test_malformed_type_does_not_affect_others() {
    let pass = Pass::new(PassOptions::default()).unwrap();
    let (sink, bag, _) = run(&pass);

    assert!(sink.get("broken_observables.rs").is_none());
    let error = bag
        .iter()
        .find(|d| d.severity == Severity::Error)
        .unwrap();
    assert_eq!(error.code, "RXW998");
    assert!(error.message.contains("broken_observables.rs"));
    assert!(sink.get("timer_observables.rs").is_some());
}

#[test]
fn test_repeated_passes_are_identical() {
    let pass = Pass::new(PassOptions::default()).unwrap();
    let (first_sink, first_bag, first_summary) = run(&pass);
    let (second_sink, second_bag, second_summary) = run(&pass);

    assert_eq!(first_sink.into_inner(), second_sink.into_inner());
    assert_eq!(first_bag.into_vec(), second_bag.into_vec());
    assert_eq!(first_summary, second_summary);
}

#[tokio::test]
async fn test_concurrent_pass_matches_sequential() {
    let pass = Pass::new(PassOptions::default()).unwrap();
    let (sequential_sink, sequential_bag, sequential_summary) = run(&pass);

    let mut sink = MemorySink::default();
    let mut bag = DiagnosticBag::default();
    let summary = pass
        .run_concurrent(&catalog(), Path::new("."), &mut sink, &mut bag)
        .await
        .unwrap();

    assert_eq!(sink.into_inner(), sequential_sink.into_inner());
    assert_eq!(bag.into_vec(), sequential_bag.into_vec());
    assert_eq!(summary, sequential_summary);
}

#[test]
fn test_directory_sink_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_dir = dir.path().join("catalog");
    std::fs::create_dir_all(&catalog_dir).unwrap();
    std::fs::write(catalog_dir.join("nodes.yaml"), CATALOG).unwrap();

    let out = dir.path().join("generated");
    let pass = Pass::new(PassOptions::default()).unwrap();
    let mut sink = DirectorySink::new(&out);
    let mut bag = DiagnosticBag::default();

    let summary = pass.run(&FsCatalog, &catalog_dir, &mut sink, &mut bag).unwrap();
    sink.write_manifest().unwrap();

    assert_eq!(summary.artifacts_emitted, 3);
    assert!(out.join("i_button_observables.rs").exists());
    assert!(out.join("i_button_bindings.rs").exists());
    assert!(!out.join("broken_observables.rs").exists());

    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest.as_array().unwrap().len(), 3);
}
