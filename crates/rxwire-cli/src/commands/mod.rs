//! CLI command implementations

pub mod check;
pub mod generate;
pub mod init;

use anyhow::{Context, Result};
use rxwire_core::{Config, Error};
use std::path::Path;

/// Load the project configuration
///
/// A missing project file is only tolerated when the catalog is given on the
/// command line; defaults are then rooted at the config location.
pub fn load_config(config_path: &str, catalog: Option<&str>) -> Result<Config> {
    tracing::debug!("Loading configuration from {}", config_path);

    let mut config = match Config::load(config_path) {
        Ok(config) => config,
        Err(Error::ConfigNotFound { path }) if catalog.is_some() => {
            tracing::debug!("No project file at {}, using defaults", path);
            let path = Path::new(config_path);
            let base = if path.is_dir() || (!path.exists() && path.extension().is_none()) {
                path.to_path_buf()
            } else {
                path.parent().unwrap_or(Path::new(".")).to_path_buf()
            };
            Config::with_defaults(base)
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };

    if let Some(catalog) = catalog {
        config.project.catalog = catalog.to_string();
    }
    Ok(config)
}
