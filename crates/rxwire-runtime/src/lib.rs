//! rxwire Runtime
//!
//! The small stream library that rxwire generated code compiles against.
//!
//! # Features
//!
//! - [`Observable`]: cold, subscribe-driven streams, including adapters over
//!   add/remove event accessor pairs
//! - [`Subject`]: hot endpoints that are both pushable and subscribable
//! - [`BoundSignal`]: the lazily connected endpoint behind every generated
//!   bidirectional property
//! - [`host`]: the contract an extendable type implements so generated
//!   binders can reach its native signal mechanism
//!
//! # Usage
//!
//! ```rust,ignore
//! use rxwire_runtime::{Observable, Unit};
//! use tokio_util::sync::CancellationToken;
//!
//! let pressed = button.OnPressedAsObservable(None);
//! let _subscription = pressed.subscribe(|_: Unit| println!("pressed"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bound;
pub mod host;
pub mod observable;
pub mod subject;
pub mod subscription;

pub use bound::BoundSignal;
pub use observable::{Callback, Observable, UnitHandler};
pub use subject::Subject;
pub use subscription::Subscription;

/// The value carried by streams over events without a payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unit;
