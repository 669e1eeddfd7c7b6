//! Pass driver
//!
//! A pass lists the catalog once, synthesizes and validates every type
//! independently, forwards accepted artifacts to the sink and reports
//! everything else to the diagnostic channel. A failure while processing one
//! type becomes a fatal diagnostic for that type; the remaining types are
//! processed normally.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;

use minijinja::context;
use rxwire_core::catalog::{CatalogType, TypeCatalog};
use rxwire_core::config::{Config, NamespaceConfig, ProjectConfig};

use crate::diagnostics::{
    Diagnostic, DiagnosticChannel, GENERATION_FAILED, INVALID_SYNTAX, Location, SINK_REJECTED,
    Severity, TYPES_DISCOVERED,
};
use crate::error::Result;
use crate::generator::Generator;
use crate::ir::{TypeModel, WrapperArtifact};
use crate::sink::ArtifactSink;
use crate::validator::OutputValidator;

/// Options for a pass
#[derive(Debug, Clone)]
pub struct PassOptions {
    /// Baseline imports for every artifact
    pub namespaces: NamespaceConfig,

    /// Header template rendered at the top of every artifact
    pub header: String,
}

impl Default for PassOptions {
    fn default() -> Self {
        let project = ProjectConfig::default();
        Self {
            namespaces: project.namespaces,
            header: project.header,
        }
    }
}

impl PassOptions {
    /// Options taken from a loaded project configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            namespaces: config.project.namespaces.clone(),
            header: config.project.header.clone(),
        }
    }
}

/// Counts gathered over one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Event-bearing types listed by the catalog
    pub types: usize,

    /// Artifacts accepted by the sink
    pub artifacts_emitted: usize,

    /// Artifacts discarded by the validator or refused by the sink
    pub artifacts_rejected: usize,

    /// Informational diagnostics
    pub infos: usize,

    /// Warnings
    pub warnings: usize,

    /// Errors
    pub errors: usize,

    /// Fatal diagnostics
    pub fatal: usize,
}

impl PassSummary {
    /// Whether any error or fatal diagnostic was reported
    pub fn has_errors(&self) -> bool {
        self.errors > 0 || self.fatal > 0
    }

    fn record(&mut self, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Info => self.infos += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Error => self.errors += 1,
            Severity::Fatal => self.fatal += 1,
        }
    }
}

/// Validated output for one type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeOutcome {
    /// Qualified owner type name
    pub owner: String,

    /// Artifacts that passed validation
    pub accepted: Vec<WrapperArtifact>,

    /// Artifacts discarded by the validator
    pub rejected: usize,

    /// Diagnostics for this type, in the order they arose
    pub diagnostics: Vec<Diagnostic>,
}

impl TypeOutcome {
    fn failed(owner: &str, message: &str) -> Self {
        Self {
            owner: owner.to_string(),
            diagnostics: vec![GENERATION_FAILED.create(
                context! { owner, reason => message },
                Some(Location::owner(owner)),
            )],
            ..Default::default()
        }
    }
}

/// A configured synthesis pass
#[derive(Clone)]
pub struct Pass {
    options: PassOptions,
    generator: Arc<Generator>,
}

impl Pass {
    /// Create a pass; fails if the header template does not compile
    pub fn new(options: PassOptions) -> Result<Self> {
        let generator = Generator::new(&options.namespaces, &options.header)?;
        Ok(Self {
            options,
            generator: Arc::new(generator),
        })
    }

    /// The options this pass was created with
    pub fn options(&self) -> &PassOptions {
        &self.options
    }

    /// Synthesize and validate the artifacts of one type
    ///
    /// Pure with respect to the pass: the same type always yields the same
    /// outcome.
    pub fn process_type(&self, ty: &CatalogType) -> Result<TypeOutcome> {
        let model = TypeModel::from_catalog(ty);
        let owner = model.owner.qualified_name();
        tracing::debug!("Processing {} ({} eligible events)", owner, model.events.len());

        let generated = self.generator.generate(&model)?;
        let mut outcome = TypeOutcome {
            owner,
            diagnostics: generated.diagnostics,
            ..Default::default()
        };

        for artifact in generated.artifacts {
            match OutputValidator::validate(&artifact.text) {
                Ok(()) => outcome.accepted.push(artifact),
                Err(error) => {
                    tracing::debug!("Discarding {}: {}", artifact.file_name, error);
                    outcome.rejected += 1;
                    outcome.diagnostics.push(INVALID_SYNTAX.create(
                        context! { file => artifact.file_name, error => error.to_string() },
                        Some(Location::owner(&outcome.owner)),
                    ));
                }
            }
        }

        Ok(outcome)
    }

    /// Run the pass over every type under `root`, one type at a time
    pub fn run(
        &self,
        catalog: &dyn TypeCatalog,
        root: &Path,
        sink: &mut dyn ArtifactSink,
        channel: &mut dyn DiagnosticChannel,
    ) -> Result<PassSummary> {
        let types = catalog.list_event_bearing_types(root)?;
        let mut summary = Self::start(types.len(), channel);

        for ty in &types {
            let owner = ty.qualified_name();
            let outcome = Self::isolate(&owner, || self.process_type(ty));
            Self::deliver(outcome, sink, channel, &mut summary);
        }

        Self::finish(&summary);
        Ok(summary)
    }

    /// Run the pass with one blocking task per type
    ///
    /// Artifacts and diagnostics are delivered in catalog order, so the
    /// result is identical to [`Pass::run`].
    pub async fn run_concurrent(
        &self,
        catalog: &dyn TypeCatalog,
        root: &Path,
        sink: &mut dyn ArtifactSink,
        channel: &mut dyn DiagnosticChannel,
    ) -> Result<PassSummary> {
        let types = catalog.list_event_bearing_types(root)?;
        let mut summary = Self::start(types.len(), channel);

        let tasks: Vec<_> = types
            .into_iter()
            .map(|ty| {
                let pass = self.clone();
                let owner = ty.qualified_name();
                (owner, tokio::task::spawn_blocking(move || pass.process_type(&ty)))
            })
            .collect();

        for (owner, task) in tasks {
            let outcome = match task.await {
                Ok(result) => Self::settle(&owner, result),
                Err(error) if error.is_panic() => {
                    TypeOutcome::failed(&owner, &panic_message(error.into_panic().as_ref()))
                }
                Err(error) => TypeOutcome::failed(&owner, &error.to_string()),
            };
            Self::deliver(outcome, sink, channel, &mut summary);
        }

        Self::finish(&summary);
        Ok(summary)
    }

    fn start(types: usize, channel: &mut dyn DiagnosticChannel) -> PassSummary {
        tracing::info!("Synthesizing bindings for {} type(s)", types);
        let mut summary = PassSummary {
            types,
            ..Default::default()
        };
        report(TYPES_DISCOVERED.create(context! { count => types }, None), channel, &mut summary);
        summary
    }

    fn finish(summary: &PassSummary) {
        tracing::info!(
            emitted = summary.artifacts_emitted,
            rejected = summary.artifacts_rejected,
            warnings = summary.warnings,
            errors = summary.errors + summary.fatal,
            "Pass complete"
        );
    }

    /// Run `work`, turning a panic into a fatal outcome for `owner`
    fn isolate<F>(owner: &str, work: F) -> TypeOutcome
    where
        F: FnOnce() -> Result<TypeOutcome>,
    {
        match std::panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(result) => Self::settle(owner, result),
            Err(payload) => TypeOutcome::failed(owner, &panic_message(payload.as_ref())),
        }
    }

    fn settle(owner: &str, result: Result<TypeOutcome>) -> TypeOutcome {
        result.unwrap_or_else(|error| TypeOutcome::failed(owner, &error.to_string()))
    }

    fn deliver(
        outcome: TypeOutcome,
        sink: &mut dyn ArtifactSink,
        channel: &mut dyn DiagnosticChannel,
        summary: &mut PassSummary,
    ) {
        summary.artifacts_rejected += outcome.rejected;
        for diagnostic in outcome.diagnostics {
            report(diagnostic, channel, summary);
        }

        for artifact in outcome.accepted {
            match sink.emit(&artifact.file_name, &artifact.text) {
                Ok(()) => summary.artifacts_emitted += 1,
                Err(error) => {
                    summary.artifacts_rejected += 1;
                    let diagnostic = SINK_REJECTED.create(
                        context! { file => artifact.file_name, reason => error.to_string() },
                        Some(Location::owner(&outcome.owner)),
                    );
                    report(diagnostic, channel, summary);
                }
            }
        }
    }
}

fn report(diagnostic: Diagnostic, channel: &mut dyn DiagnosticChannel, summary: &mut PassSummary) {
    summary.record(&diagnostic);
    channel.report(diagnostic);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticBag;
    use crate::sink::MemorySink;
    use rxwire_core::catalog::{HandlerKind, RawEvent, RawHandler, StaticCatalog};

    fn catalog_type(name: &str, events: &[&str]) -> CatalogType {
        let mut ty = CatalogType::new(name, "ui");
        ty.events = events
            .iter()
            .map(|event| RawEvent {
                name: event.to_string(),
                add: true,
                remove: true,
                declared_in: None,
                handler: Some(RawHandler {
                    type_name: format!("ui::{event}Handler"),
                    kind: HandlerKind::Delegate,
                    constructor: false,
                    parameters: Some(Vec::new()),
                }),
            })
            .collect();
        ty
    }

    #[test]
    fn test_isolate_turns_panic_into_fatal() {
        let outcome = Pass::isolate("ui::Broken", || panic!("synthesis exploded"));

        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        let fatal = &outcome.diagnostics[0];
        assert_eq!(fatal.code, "RXW999");
        assert_eq!(fatal.severity, Severity::Fatal);
        assert_eq!(fatal.message, "Generation failed for 'ui::Broken': synthesis exploded");
    }

    #[test]
    fn test_isolate_turns_error_into_fatal() {
        let outcome = Pass::isolate("ui::Broken", || {
            Err(crate::Error::GenerationError("no luck".to_string()))
        });
        assert_eq!(outcome.diagnostics[0].code, "RXW999");
        assert!(outcome.diagnostics[0].message.contains("no luck"));
    }

    #[tokio::test]
    async fn test_join_panic_is_reported_like_catch_unwind() {
        let task = tokio::task::spawn_blocking(|| -> Result<TypeOutcome> {
            panic!("worker exploded");
        });
        let error = task.await.unwrap_err();
        assert!(error.is_panic());

        let message = panic_message(error.into_panic().as_ref());
        assert_eq!(message, "worker exploded");
    }

    #[test]
    fn test_panic_message_formats() {
        let formatted = std::panic::catch_unwind(|| panic!("value {}", 3)).unwrap_err();
        assert_eq!(panic_message(formatted.as_ref()), "value 3");

        let custom = std::panic::catch_unwind(|| std::panic::panic_any(42_u8)).unwrap_err();
        assert_eq!(panic_message(custom.as_ref()), "unknown panic");
    }

    #[test]
    fn test_process_type_validates_artifacts() {
        let pass = Pass::new(PassOptions::default()).unwrap();
        let outcome = pass.process_type(&catalog_type("Button", &["Pressed"])).unwrap();

        assert_eq!(outcome.owner, "ui::Button");
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.rejected, 0);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_owner_namespace_is_rejected() {
        let pass = Pass::new(PassOptions::default()).unwrap();
        let mut ty = catalog_type("Button", &["Pressed"]);
        ty.namespace = "ui::bad namespace".to_string();

        let outcome = pass.process_type(&ty).unwrap();
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].code, "RXW998");
        assert!(outcome.diagnostics[0].message.contains("button_observables.rs"));
    }

    #[test]
    fn test_run_reports_discovery_and_counts() {
        let pass = Pass::new(PassOptions::default()).unwrap();
        let catalog = StaticCatalog::new(vec![
            catalog_type("Button", &["Pressed"]),
            catalog_type("Slider", &["Moved", "Released"]),
        ]);
        let mut sink = MemorySink::default();
        let mut bag = DiagnosticBag::default();

        let summary = pass.run(&catalog, Path::new("."), &mut sink, &mut bag).unwrap();

        assert_eq!(summary.types, 2);
        assert_eq!(summary.artifacts_emitted, 2);
        assert_eq!(summary.infos, 1);
        assert!(!summary.has_errors());
        assert_eq!(bag.iter().next().unwrap().message, "Found 2 event-bearing type(s).");
        assert!(sink.get("slider_observables.rs").is_some());
    }

    #[test]
    fn test_sink_refusal_is_an_error_diagnostic() {
        let pass = Pass::new(PassOptions::default()).unwrap();
        // Two owners with the same short name map to the same file name.
        let mut other = catalog_type("Button", &["Pressed"]);
        other.namespace = "legacy".to_string();
        let catalog = StaticCatalog::new(vec![catalog_type("Button", &["Pressed"]), other]);
        let mut sink = MemorySink::default();
        let mut bag = DiagnosticBag::default();

        let summary = pass.run(&catalog, Path::new("."), &mut sink, &mut bag).unwrap();

        assert_eq!(summary.artifacts_emitted, 1);
        assert_eq!(summary.artifacts_rejected, 1);
        assert_eq!(summary.errors, 1);
        let error = bag.iter().find(|d| d.severity == Severity::Error).unwrap();
        assert_eq!(error.code, "RXW997");
        assert_eq!(error.location, Some(Location::owner("legacy::Button")));
    }

    #[test]
    fn test_invalid_header_fails_pass_creation() {
        let options = PassOptions {
            header: "{% if %}".to_string(),
            ..Default::default()
        };
        assert!(Pass::new(options).is_err());
    }
}
