//! Observable wrapper codegen
//!
//! One `On<Event>AsObservable` method per eligible event. The stream type
//! and the handler conversion depend on the event's arity:
//!
//! | arity | stream type         | conversion                                   |
//! |-------|---------------------|----------------------------------------------|
//! | 0     | `Unit`              | none, accessors wired directly               |
//! | 1     | `T`                 | `H::new(on_next)` or `H::from(move \|p\| ..)` |
//! | k > 1 | `(T1, .., Tk)`      | `H::new/from(move \|p1, .., pk\| ..)`          |

use quote::format_ident;

use crate::ir::{EventDeclaration, SignatureShape};
use crate::synth::sanitize::unique_parameter_names;

/// Identifier of the stream callback inside generated conversions
pub const CALLBACK_IDENT: &str = "on_next";

/// Helper for generating observable wrapper methods
pub struct WrapperCodegen;

impl WrapperCodegen {
    /// `On<Event>AsObservable`
    pub fn method_name(event: &EventDeclaration) -> String {
        format_ident!("On{}AsObservable", event.name).to_string()
    }

    /// Trait method signature, without a trailing `;` or body
    ///
    /// Empty for ineligible events.
    pub fn signature(event: &EventDeclaration) -> String {
        if !event.is_eligible() {
            return String::new();
        }
        let Some(stream_type) = event.signature.stream_type() else {
            return String::new();
        };

        format!(
            "fn {name}(&self, cancellation_token: Option<CancellationToken>) -> Observable<{stream_type}>",
            name = Self::method_name(event),
        )
    }

    /// Trait item declaring the method
    pub fn generate_declaration(event: &EventDeclaration) -> String {
        let signature = Self::signature(event);
        if signature.is_empty() {
            return signature;
        }

        format!(
            "    /// Observes the `{event}` event.\n    {signature};\n",
            event = event.name,
        )
    }

    /// Method implementation
    ///
    /// Empty for ineligible events and unresolved signatures.
    pub fn generate(event: &EventDeclaration) -> String {
        let signature = Self::signature(event);
        if signature.is_empty() {
            return signature;
        }

        let snake = event.snake_name();
        let source = match Self::conversion(event) {
            None => format!(
                r#"Observable::from_unit_event(
            move |h| add_target.add_{snake}(h),
            move |h| remove_target.remove_{snake}(h),
            cancellation_token.unwrap_or_default(),
        )"#
            ),
            Some(conversion) => format!(
                r#"Observable::from_event(
            {conversion},
            move |h| add_target.add_{snake}(h),
            move |h| remove_target.remove_{snake}(h),
            cancellation_token.unwrap_or_default(),
        )"#
            ),
        };

        format!(
            r#"    {signature} {{
        let add_target = self.clone();
        let remove_target = self.clone();
        {source}
    }}
"#
        )
    }

    /// Closure turning the stream callback into a native handler
    ///
    /// `None` for zero-argument events, whose handlers are the runtime's
    /// `UnitHandler`.
    fn conversion(event: &EventDeclaration) -> Option<String> {
        let signature = &event.signature;
        let stream_type = signature.stream_type()?;
        let handler = signature.handler.expr_path();
        let callback = format!("|{CALLBACK_IDENT}: Callback<{stream_type}>|");

        let parameters = signature.parameters();
        let names = unique_parameter_names(parameters, &[CALLBACK_IDENT]);
        let typed: Vec<String> = names
            .iter()
            .zip(parameters)
            .map(|(name, p)| format!("{name}: {}", p.ty))
            .collect();

        let adapter = match &signature.shape {
            SignatureShape::ZeroArg | SignatureShape::Unresolved => return None,
            SignatureShape::Single(_) if signature.callback_constructor => {
                return Some(format!("{callback} {handler}::new({CALLBACK_IDENT})"));
            }
            SignatureShape::Single(_) => format!(
                "move |{typed}| {CALLBACK_IDENT}({name})",
                typed = typed[0],
                name = names[0],
            ),
            SignatureShape::Multi(_) => format!(
                "move |{typed}| {CALLBACK_IDENT}(({names}))",
                typed = typed.join(", "),
                names = names.join(", "),
            ),
        };

        let build = if signature.callback_constructor { "new" } else { "from" };
        Some(format!(
            "{callback} {{\n                {handler}::{build}({adapter})\n            }}"
        ))
    }
}
