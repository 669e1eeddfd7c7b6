//! Run a pass without writing anything

use anyhow::{Context, Result};
use rxwire_codegen::diagnostics::Diagnostic;
use rxwire_codegen::{DiagnosticBag, MemorySink, Pass, PassOptions, PassSummary};
use rxwire_core::FsCatalog;

/// Run the check command
pub async fn run(config_path: &str, catalog: Option<&str>, json: bool) -> Result<()> {
    let config = super::load_config(config_path, catalog)?;
    let catalog_root = config.catalog_root();
    tracing::info!("Checking catalog {}", catalog_root.display());

    let pass = Pass::new(PassOptions::from_config(&config)).context("Invalid pass options")?;
    let mut sink = MemorySink::default();
    let mut diagnostics = DiagnosticBag::default();

    let summary = if config.project.concurrent {
        pass.run_concurrent(&FsCatalog, &catalog_root, &mut sink, &mut diagnostics)
            .await
    } else {
        pass.run(&FsCatalog, &catalog_root, &mut sink, &mut diagnostics)
    }
    .context("Check failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report(&summary, &sink, &diagnostics))?);
    } else {
        for diagnostic in diagnostics.iter() {
            println!("{diagnostic}");
        }
        for file in sink.file_names() {
            println!("ok {file}");
        }
        println!(
            "{} type(s), {} artifact(s), {} warning(s), {} error(s)",
            summary.types,
            summary.artifacts_emitted,
            summary.warnings,
            summary.errors + summary.fatal
        );
    }

    if summary.has_errors() {
        anyhow::bail!("Check found {} error(s)", summary.errors + summary.fatal);
    }

    Ok(())
}

fn report(summary: &PassSummary, sink: &MemorySink, diagnostics: &DiagnosticBag) -> serde_json::Value {
    serde_json::json!({
        "types": summary.types,
        "artifacts": sink.file_names().collect::<Vec<_>>(),
        "rejected": summary.artifacts_rejected,
        "diagnostics": diagnostics.iter().map(diagnostic_json).collect::<Vec<_>>(),
    })
}

fn diagnostic_json(diagnostic: &Diagnostic) -> serde_json::Value {
    serde_json::json!({
        "code": diagnostic.code,
        "severity": diagnostic.severity.to_string(),
        "message": diagnostic.message,
        "owner": diagnostic.location.as_ref().map(|l| l.owner.clone()),
        "event": diagnostic.location.as_ref().and_then(|l| l.event.clone()),
    })
}
