//! rxwire Code Generation
//!
//! This crate turns a type catalog into Rust source: one observable wrapper
//! set per event-bearing type, plus a signal binder set for extendable types.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌─────────┐     ┌─────────┐     ┌─────────┐     ┌─────────┐     ┌─────────┐
//! │ Catalog │────▶│   IR    │────▶│  Rust   │────▶│ Syntax  │────▶│  Sink   │
//! │ (types) │     │(Filter) │     │ (Synth) │     │ (Check) │     │ (Emit)  │
//! └─────────┘     └─────────┘     └─────────┘     └─────────┘     └─────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use rxwire_codegen::{DiagnosticBag, MemorySink, Pass, PassOptions};
//! use rxwire_core::FsCatalog;
//!
//! let pass = Pass::new(PassOptions::default())?;
//! let mut sink = MemorySink::default();
//! let mut diagnostics = DiagnosticBag::default();
//! let summary = pass.run(&FsCatalog, "catalog".as_ref(), &mut sink, &mut diagnostics)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod generator;
pub mod ir;
pub mod pass;
pub mod sink;
pub mod synth;
pub mod validator;

pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticChannel, Location, Severity};
pub use error::{Error, Result};
pub use generator::Generator;
pub use ir::{ArtifactKind, EventDeclaration, TypeModel, TypeReference, WrapperArtifact};
pub use pass::{Pass, PassOptions, PassSummary};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};
pub use validator::OutputValidator;
