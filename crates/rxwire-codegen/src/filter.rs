//! Event filter
//!
//! Converts raw catalog events into classified [`EventDeclaration`]s,
//! silently dropping anything that cannot be wrapped. Nothing here reports a
//! diagnostic: an event that does not meet the shape requirements is simply
//! not part of the pass.

use rxwire_core::catalog::{HandlerKind, RawEvent, RawHandler};

use crate::ir::{DelegateSignature, EventDeclaration, Parameter, TypeReference};
use crate::synth::sanitize::is_identifier;

/// Keep the eligible events declared directly on `owner`, in input order
pub fn filter_events(owner: &TypeReference, raw_events: &[RawEvent]) -> Vec<EventDeclaration> {
    raw_events
        .iter()
        .filter_map(|raw| {
            let declaration = classify(owner, raw);
            if declaration.is_none() {
                tracing::trace!("Skipping event '{}' on {}", raw.name, owner.qualified_name());
            }
            declaration
        })
        .collect()
}

/// Classify one raw event, or `None` if it is not eligible
pub fn classify(owner: &TypeReference, raw: &RawEvent) -> Option<EventDeclaration> {
    if !is_identifier(&raw.name) || !raw.add || !raw.remove {
        return None;
    }
    if is_inherited(owner, raw) {
        return None;
    }

    let handler = raw.handler.as_ref()?;
    let signature = classify_handler(handler)?;

    let declaration = EventDeclaration {
        owner: owner.clone(),
        name: raw.name.clone(),
        has_add: raw.add,
        has_remove: raw.remove,
        signature,
    };
    declaration.is_eligible().then_some(declaration)
}

fn is_inherited(owner: &TypeReference, raw: &RawEvent) -> bool {
    match raw.declared_in.as_deref() {
        None => false,
        Some(declared_in) => declared_in != owner.qualified_name() && declared_in != owner.name,
    }
}

fn classify_handler(handler: &RawHandler) -> Option<DelegateSignature> {
    if handler.kind != HandlerKind::Delegate {
        return None;
    }

    let handler_type = TypeReference::parse(&handler.type_name)?;
    let parameters = handler
        .parameters
        .as_ref()?
        .iter()
        .map(|p| TypeReference::parse(&p.type_name).map(|ty| Parameter::new(p.name.clone(), ty)))
        .collect::<Option<Vec<_>>>()?;

    Some(DelegateSignature::from_parameters(
        handler_type,
        parameters,
        handler.constructor,
    ))
}
