//! Diagnostic reporting
//!
//! Every diagnostic a pass can produce is declared once as a `const`
//! [`DiagnosticDescriptor`]. Call sites instantiate a descriptor with message
//! arguments and hand the result to a [`DiagnosticChannel`].

use std::fmt;

use minijinja::{Environment, Value};
use once_cell::sync::Lazy;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational
    Info,
    /// Something was skipped
    Warning,
    /// An artifact was discarded
    Error,
    /// Synthesis of a whole type failed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        f.write_str(label)
    }
}

/// Where a diagnostic applies
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Qualified owner type name
    pub owner: String,

    /// Event name, when the diagnostic concerns one event
    pub event: Option<String>,
}

impl Location {
    /// A location naming only the owner type
    pub fn owner(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            event: None,
        }
    }

    /// A location naming one event of the owner type
    pub fn event(owner: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            event: Some(event.into()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.event {
            Some(event) => write!(f, "{}.{}", self.owner, event),
            None => write!(f, "{}", self.owner),
        }
    }
}

/// A reported problem or note
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// Stable code, e.g. `RXW002`
    pub code: &'static str,

    /// Severity
    pub severity: Severity,

    /// Rendered message
    pub message: String,

    /// Owner type and event, if any
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Emit this diagnostic as a tracing event at the matching level
    pub fn log(&self) {
        match self.severity {
            Severity::Info => tracing::info!(code = self.code, "{}", self.message),
            Severity::Warning => tracing::warn!(code = self.code, "{}", self.message),
            Severity::Error | Severity::Fatal => {
                tracing::error!(code = self.code, severity = %self.severity, "{}", self.message)
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " (at {location})")?;
        }
        Ok(())
    }
}

/// Static description of a diagnostic
///
/// `format` is a minijinja template rendered against the values passed to
/// [`DiagnosticDescriptor::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    /// Stable code
    pub code: &'static str,

    /// Short title
    pub title: &'static str,

    /// Message template
    pub format: &'static str,

    /// Severity
    pub severity: Severity,
}

static MESSAGES: Lazy<Environment<'static>> = Lazy::new(Environment::new);

impl DiagnosticDescriptor {
    /// Instantiate the descriptor with `context! { .. }` values
    pub fn create(self, values: Value, location: Option<Location>) -> Diagnostic {
        let message = MESSAGES.render_str(self.format, values).unwrap_or_else(|e| {
            tracing::debug!(code = self.code, "Failed to render diagnostic message: {}", e);
            self.title.to_string()
        });

        Diagnostic {
            code: self.code,
            severity: self.severity,
            message,
            location,
        }
    }
}

/// Number of event-bearing types found by a pass
pub const TYPES_DISCOVERED: DiagnosticDescriptor = DiagnosticDescriptor {
    code: "RXW001",
    title: "Event-bearing types discovered",
    format: "Found {{ count }} event-bearing type(s).",
    severity: Severity::Info,
};

/// An event was left out of the binder artifact
pub const TOO_MANY_PARAMETERS: DiagnosticDescriptor = DiagnosticDescriptor {
    code: "RXW002",
    title: "Signal has too many parameters",
    format: "Signal '{{ event }}' on type '{{ owner }}' has more than {{ limit }} parameters and will be skipped.",
    severity: Severity::Warning,
};

/// A trait owner has no concrete type to carry its binders
pub const NO_BINDER_TARGET: DiagnosticDescriptor = DiagnosticDescriptor {
    code: "RXW003",
    title: "No concrete type for binders",
    format: "Type '{{ owner }}' is a trait with no concrete type; its signal bindings will be skipped.",
    severity: Severity::Warning,
};

/// The sink refused an artifact
pub const SINK_REJECTED: DiagnosticDescriptor = DiagnosticDescriptor {
    code: "RXW997",
    title: "Artifact could not be written",
    format: "Failed to write '{{ file }}': {{ reason }}",
    severity: Severity::Error,
};

/// A generated artifact failed to parse
pub const INVALID_SYNTAX: DiagnosticDescriptor = DiagnosticDescriptor {
    code: "RXW998",
    title: "Generated code invalid",
    format: "Generated code invalid in '{{ file }}': {{ error }}",
    severity: Severity::Error,
};

/// Synthesis of a type failed unexpectedly
pub const GENERATION_FAILED: DiagnosticDescriptor = DiagnosticDescriptor {
    code: "RXW999",
    title: "Generation failed",
    format: "Generation failed for '{{ owner }}': {{ reason }}",
    severity: Severity::Fatal,
};

/// Receiver of diagnostics
pub trait DiagnosticChannel {
    /// Report one diagnostic
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics in report order
#[derive(Debug, Clone, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    /// All diagnostics, in report order
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Number of diagnostics with the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Whether any error or fatal diagnostic was reported
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity >= Severity::Error)
    }

    /// Whether nothing was reported
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Take the collected diagnostics
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticChannel for DiagnosticBag {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Logs every diagnostic through `tracing` before forwarding it
#[derive(Debug)]
pub struct TracingChannel<C> {
    inner: C,
}

impl<C: DiagnosticChannel> TracingChannel<C> {
    /// Wrap `inner`
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped channel
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: DiagnosticChannel> DiagnosticChannel for TracingChannel<C> {
    fn report(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.inner.report(diagnostic);
    }
}
