//! Generate bindings into the output directory

use anyhow::{Context, Result};
use rxwire_codegen::diagnostics::TracingChannel;
use rxwire_codegen::{DiagnosticBag, DirectorySink, Pass, PassOptions};
use rxwire_core::FsCatalog;

/// Run the generate command
pub async fn run(
    config_path: &str,
    catalog: Option<&str>,
    output: Option<&str>,
    concurrent: bool,
) -> Result<()> {
    let mut config = super::load_config(config_path, catalog)?;
    if let Some(output) = output {
        config.project.output_dir = output.to_string();
    }

    let catalog_root = config.catalog_root();
    let output_dir = config.output_dir();
    tracing::info!("Generating bindings from {}", catalog_root.display());

    let pass = Pass::new(PassOptions::from_config(&config)).context("Invalid pass options")?;
    let mut sink = DirectorySink::new(&output_dir);
    let mut channel = TracingChannel::new(DiagnosticBag::default());

    let summary = if concurrent || config.project.concurrent {
        pass.run_concurrent(&FsCatalog, &catalog_root, &mut sink, &mut channel)
            .await
    } else {
        pass.run(&FsCatalog, &catalog_root, &mut sink, &mut channel)
    }
    .context("Generation failed")?;

    let manifest = sink.write_manifest().context("Failed to write manifest")?;
    for entry in sink.manifest() {
        tracing::info!("  ✓ {} ({} bytes, hash: {}...)", entry.file, entry.bytes, &entry.sha256[..8]);
    }
    tracing::info!(
        "Wrote {} artifact(s) to {} (manifest: {})",
        summary.artifacts_emitted,
        output_dir.display(),
        manifest.display()
    );

    if summary.has_errors() {
        anyhow::bail!(
            "Generation finished with {} error(s); {} artifact(s) discarded",
            summary.errors + summary.fatal,
            summary.artifacts_rejected
        );
    }

    Ok(())
}
