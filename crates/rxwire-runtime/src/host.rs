//! Host framework contract
//!
//! Generated binders talk to an extendable type through two traits: the type
//! hands out its [`SignalEmitter`] (the native signal mechanism) and the
//! generated bindings struct that stores one [`BoundSignal`](crate::BoundSignal)
//! per bound event.
//!
//! ```rust,ignore
//! include!(concat!(env!("OUT_DIR"), "/button_bindings.rs"));
//!
//! pub struct Button {
//!     node: Arc<NodeHandle>,
//!     bindings: ButtonSignalBindings,
//! }
//!
//! impl SignalHost for Button {
//!     type Bindings = ButtonSignalBindings;
//!
//!     fn signal_bindings(&self) -> &ButtonSignalBindings {
//!         &self.bindings
//!     }
//!
//!     fn signal_emitter(&self) -> Arc<dyn SignalEmitter> {
//!         self.node.clone()
//!     }
//! }
//! ```

use std::any::Any;
use std::sync::Arc;

/// The native signal mechanism of a host type
pub trait SignalEmitter: Send + Sync {
    /// Raise `signal` with positional arguments
    fn emit_signal(&self, signal: &str, args: &[&dyn Any]);
}

/// Accessors generated binders rely on
pub trait SignalHost {
    /// Generated `<Type>SignalBindings` struct
    type Bindings;

    /// Storage for the type's bound signals
    fn signal_bindings(&self) -> &Self::Bindings;

    /// Handle used by bridge subscriptions to re-emit pushed values
    fn signal_emitter(&self) -> Arc<dyn SignalEmitter>;
}
