//! rxwire Core Library
//!
//! This crate provides the input side of rxwire:
//! - The serializable type catalog model (event-bearing types and their events)
//! - Catalog loading from YAML/JSON files
//! - Project configuration parsing and validation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────▶│   Codegen   │────▶│  Artifacts  │
//! │ (YAML/JSON) │     │    Pass     │     │   (.rs)     │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use rxwire_core::{Config, FsCatalog, TypeCatalog};
//!
//! let config = Config::load("./rxwire.yaml")?;
//! let types = FsCatalog.list_event_bearing_types(&config.catalog_root())?;
//! for ty in &types {
//!     println!("{} ({} events)", ty.qualified_name(), ty.events.len());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{CatalogType, FsCatalog, StaticCatalog, TypeCatalog};
pub use config::{Config, ProjectConfig};
pub use error::{Error, Result};
