//! Fragment synthesizers
//!
//! Each synthesizer is a pure function from IR to a source fragment. Assembly
//! of fragments into artifacts happens in [`crate::generator`].

pub mod binder;
pub mod namespaces;
pub mod sanitize;
pub mod wrapper;

pub use binder::BinderCodegen;
pub use namespaces::NamespaceResolver;
pub use sanitize::{sanitize_identifier, unique_parameter_names};
pub use wrapper::WrapperCodegen;
