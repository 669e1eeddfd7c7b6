//! Bidirectional binder codegen
//!
//! For an extendable type, each bound event gets a `BoundSignal<T>` field in
//! `<Type>SignalBindings` and an `On<Event>()` property returning the
//! event's `Subject<T>`. Values pushed into the subject are re-emitted
//! through the type's native signal mechanism.

use minijinja::context;
use quote::format_ident;

use crate::diagnostics::{Diagnostic, Location, TOO_MANY_PARAMETERS};
use crate::ir::{EventDeclaration, TypeReference};
use crate::synth::sanitize::sanitize_identifier;

/// Events with more parameters than this are left out of binder artifacts
pub const MAX_SIGNAL_PARAMETERS: usize = 5;

/// Binder fragments for one type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinderFragments {
    /// Events that received a binding, in declaration order
    pub bound: Vec<EventDeclaration>,

    /// Field declarations for the bindings struct
    pub fields: Vec<String>,

    /// Property methods for the owner's impl block
    pub properties: Vec<String>,

    /// Warnings for skipped events
    pub diagnostics: Vec<Diagnostic>,
}

impl BinderFragments {
    /// Whether no event was bound
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

/// Helper for generating binder code
pub struct BinderCodegen;

impl BinderCodegen {
    /// `<Type>SignalBindings`
    pub fn bindings_struct_name(owner: &TypeReference) -> String {
        format!("{}SignalBindings", owner.name)
    }

    /// Native signal name: the event name in lowercase
    pub fn signal_name(event: &EventDeclaration) -> String {
        event.name.to_lowercase()
    }

    /// `On<Event>`
    pub fn property_name(event: &EventDeclaration) -> String {
        format_ident!("On{}", event.name).to_string()
    }

    /// Field holding the event's `BoundSignal`
    pub fn field_name(event: &EventDeclaration) -> String {
        sanitize_identifier(&event.snake_name()).into_owned()
    }

    /// Arguments passed to `emit_signal` for a pushed `value`
    pub fn emit_arguments(arity: usize) -> String {
        match arity {
            0 => "&[]".to_string(),
            1 => "&[&value]".to_string(),
            k => {
                let items: Vec<_> = (0..k).map(|i| format!("&value.{i}")).collect();
                format!("&[{}]", items.join(", "))
            }
        }
    }

    /// Bindings struct field; empty for events that cannot be bound
    pub fn generate_field(event: &EventDeclaration) -> String {
        let Some(stream_type) = Self::bindable_stream_type(event) else {
            return String::new();
        };

        format!(
            "    pub(crate) {field}: BoundSignal<{stream_type}>,\n",
            field = Self::field_name(event),
        )
    }

    /// Property method; empty for events that cannot be bound
    pub fn generate_property(event: &EventDeclaration) -> String {
        let Some(stream_type) = Self::bindable_stream_type(event) else {
            return String::new();
        };
        let arity = event.arity().unwrap_or_default();
        let value = if arity == 0 { "_value" } else { "value" };

        format!(
            r#"    /// Bidirectional endpoint for the `{event}` signal.
    pub fn {property}(&self) -> Subject<{stream_type}> {{
        let emitter = self.signal_emitter();
        self.signal_bindings()
            .{field}
            .get_or_connect(move |{value}: {stream_type}| {{
                emitter.emit_signal("{signal}", {args});
            }})
    }}
"#,
            event = event.name,
            property = Self::property_name(event),
            field = Self::field_name(event),
            signal = Self::signal_name(event),
            args = Self::emit_arguments(arity),
        )
    }

    /// Generate fragments for every bindable event, warning about events
    /// over the parameter limit
    pub fn bind(events: &[EventDeclaration]) -> BinderFragments {
        let mut fragments = BinderFragments::default();

        for event in events.iter().filter(|e| e.is_eligible()) {
            if event.arity().is_some_and(|k| k > MAX_SIGNAL_PARAMETERS) {
                let owner = event.owner.qualified_name();
                tracing::debug!("Skipping binder for {}.{}", owner, event.name);
                fragments.diagnostics.push(TOO_MANY_PARAMETERS.create(
                    context! { event => event.name, owner, limit => MAX_SIGNAL_PARAMETERS },
                    Some(Location::event(&owner, &event.name)),
                ));
                continue;
            }

            fragments.fields.push(Self::generate_field(event));
            fragments.properties.push(Self::generate_property(event));
            fragments.bound.push(event.clone());
        }

        fragments
    }

    fn bindable_stream_type(event: &EventDeclaration) -> Option<String> {
        if !event.is_eligible() || event.arity()? > MAX_SIGNAL_PARAMETERS {
            return None;
        }
        event.signature.stream_type()
    }
}
