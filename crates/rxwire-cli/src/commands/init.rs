//! Initialize a new rxwire project

use anyhow::Result;
use rxwire_core::config::CONFIG_FILE_NAME;
use std::fs;
use std::path::Path;

/// Run the init command
pub async fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    let abs_path = project_dir.canonicalize()?;

    let project_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Could not determine project name from path"))?,
    };

    if project_dir.join(CONFIG_FILE_NAME).exists() {
        anyhow::bail!(
            "Directory '{}' already contains a {}",
            project_dir.display(),
            CONFIG_FILE_NAME
        );
    }

    tracing::info!("Creating new rxwire project: {}", project_name);

    fs::create_dir_all(project_dir.join("catalog"))?;

    let config = format!(
        r#"# rxwire project configuration
name: {project_name}

# Catalog files (YAML or JSON), walked recursively
catalog: catalog

# Where generated artifacts and manifest.json are written
output_dir: generated

# Imported by every generated artifact
namespaces:
  stream: rxwire_runtime
  cancellation: tokio_util::sync
  host: rxwire_runtime::host

concurrent: false
"#
    );
    fs::write(project_dir.join(CONFIG_FILE_NAME), config)?;

    let example_catalog = r#"# Example catalog
types:
  - name: Button
    namespace: my_ui::controls
    kind: struct
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
          type: my_ui::signals::ToggledHandler
          constructor: true
          parameters:
            - name: toggled_on
              type: bool
"#;
    fs::write(project_dir.join("catalog/controls.yaml"), example_catalog)?;

    let gitignore = r#"# rxwire output
generated/
"#;
    fs::write(project_dir.join(".gitignore"), gitignore)?;

    tracing::info!(
        "✓ Created project '{}' at {}",
        project_name,
        abs_path.display()
    );
    tracing::info!("");
    tracing::info!("Next steps:");
    if path != "." {
        tracing::info!("  cd {}", project_dir.display());
    }
    tracing::info!("  rxwire check       # Validate the catalog");
    tracing::info!("  rxwire generate    # Write bindings");

    Ok(())
}
