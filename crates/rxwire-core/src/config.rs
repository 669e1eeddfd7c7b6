//! Configuration parsing and validation
//!
//! This module handles loading and validating the rxwire project file.
//!
//! # Configuration Files
//!
//! - `rxwire.yaml` - Project root configuration
//! - `catalog/**/*.{yaml,yml,json}` - Type catalog (location configurable)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Name of the project file looked up inside a directory
pub const CONFIG_FILE_NAME: &str = "rxwire.yaml";

/// Root project configuration from `rxwire.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    #[serde(default = "default_name")]
    pub name: String,

    /// Catalog file or directory, relative to the project root
    #[serde(default = "default_catalog")]
    pub catalog: String,

    /// Directory that receives generated artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Namespaces every generated artifact imports
    #[serde(default)]
    pub namespaces: NamespaceConfig,

    /// Banner template rendered at the top of every artifact
    ///
    /// Available variables: `owner`, `namespace`, `kind`.
    #[serde(default = "default_header")]
    pub header: String,

    /// Synthesize types concurrently
    #[serde(default)]
    pub concurrent: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            catalog: default_catalog(),
            output_dir: default_output_dir(),
            namespaces: NamespaceConfig::default(),
            header: default_header(),
            concurrent: false,
        }
    }
}

fn default_name() -> String {
    "rxwire".to_string()
}

fn default_catalog() -> String {
    "catalog".to_string()
}

fn default_output_dir() -> String {
    "generated".to_string()
}

fn default_header() -> String {
    "// <auto-generated>\n// Generated by rxwire for `{{ owner }}` ({{ kind }}). Do not edit.\n// </auto-generated>".to_string()
}

/// Baseline namespaces included in every artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamespaceConfig {
    /// Stream library (`Observable`, `Subject`, `Unit`, `Callback`)
    #[serde(default = "default_stream_namespace")]
    pub stream: String,

    /// Cancellation primitive (`CancellationToken`)
    #[serde(default = "default_cancellation_namespace")]
    pub cancellation: String,

    /// Host framework (`SignalHost`, `SignalEmitter`)
    #[serde(default = "default_host_namespace")]
    pub host: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            stream: default_stream_namespace(),
            cancellation: default_cancellation_namespace(),
            host: default_host_namespace(),
        }
    }
}

impl NamespaceConfig {
    /// The baseline as a list
    pub fn baseline(&self) -> [&str; 3] {
        [&self.stream, &self.cancellation, &self.host]
    }
}

fn default_stream_namespace() -> String {
    "rxwire_runtime".to_string()
}

fn default_cancellation_namespace() -> String {
    "tokio_util::sync".to_string()
}

fn default_host_namespace() -> String {
    "rxwire_runtime::host".to_string()
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a directory or an `rxwire.yaml` file
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./my-project")?;
    /// println!("Catalog: {}", config.catalog_root().display());
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(CONFIG_FILE_NAME), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        Self::from_yaml(&contents, base_path)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str, base_path: impl Into<PathBuf>) -> Result<Self> {
        let project: ProjectConfig = serde_yaml::from_str(yaml)?;
        let config = Self {
            project,
            base_path: base_path.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Default configuration rooted at `base_path`
    pub fn with_defaults(base_path: impl Into<PathBuf>) -> Self {
        Self {
            project: ProjectConfig::default(),
            base_path: base_path.into(),
        }
    }

    /// Resolved catalog root
    pub fn catalog_root(&self) -> PathBuf {
        self.base_path.join(&self.project.catalog)
    }

    /// Resolved output directory
    pub fn output_dir(&self) -> PathBuf {
        self.base_path.join(&self.project.output_dir)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("namespaces.stream", &self.project.namespaces.stream),
            ("namespaces.cancellation", &self.project.namespaces.cancellation),
            ("namespaces.host", &self.project.namespaces.host),
        ] {
            if value.trim().is_empty() {
                return Err(Error::ConfigInvalid {
                    message: format!("'{}' must not be empty", field),
                });
            }
        }

        // Surface template syntax errors at load time rather than per artifact.
        let env = minijinja::Environment::new();
        env.template_from_str(&self.project.header)?;

        Ok(())
    }
}
