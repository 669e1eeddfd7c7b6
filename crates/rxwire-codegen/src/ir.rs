//! Intermediate Representation (IR) for binding synthesis
//!
//! The IR is what the synthesizers consume: owner types, classified event
//! declarations, and the artifacts produced from them. It is built from the
//! raw catalog by [`crate::filter`], so everything here has already been
//! checked for eligibility.

use rxwire_core::catalog::{CatalogType, TypeKind};
use sha2::{Digest, Sha256};
use std::fmt;

/// A reference to a type, split into module path, short name and generic
/// arguments
///
/// Equality and hashing are structural, which amounts to comparing the
/// qualified names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeReference {
    /// Module path (`std::collections`), empty for prelude and primitive types
    pub namespace: String,

    /// Short name (`HashMap`)
    pub name: String,

    /// Immediate generic arguments
    pub args: Vec<TypeReference>,
}

impl TypeReference {
    /// Create a non-generic type reference
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Attach generic arguments
    pub fn with_args(mut self, args: Vec<TypeReference>) -> Self {
        self.args = args;
        self
    }

    /// Parse a path type such as `std::collections::HashMap<String, u32>`
    ///
    /// Returns `None` for anything that is not a plain path with type
    /// arguments: references, tuples, slices, lifetimes, qualified paths.
    pub fn parse(text: &str) -> Option<Self> {
        let parsed = syn::parse_str::<syn::Type>(text)
            .ok()
            .and_then(|ty| Self::from_syn(&ty));
        proc_macro2::extra::invalidate_current_thread_spans();
        parsed
    }

    fn from_syn(ty: &syn::Type) -> Option<Self> {
        let syn::Type::Path(path) = ty else {
            return None;
        };
        if path.qself.is_some() {
            return None;
        }

        let segments: Vec<&syn::PathSegment> = path.path.segments.iter().collect();
        let (last, modules) = segments.split_last()?;

        let mut namespace = Vec::with_capacity(modules.len());
        for segment in modules {
            if !matches!(segment.arguments, syn::PathArguments::None) {
                return None;
            }
            namespace.push(segment.ident.to_string());
        }

        let args = match &last.arguments {
            syn::PathArguments::None => Vec::new(),
            syn::PathArguments::AngleBracketed(generic) => generic
                .args
                .iter()
                .map(|arg| match arg {
                    syn::GenericArgument::Type(inner) => Self::from_syn(inner),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()?,
            syn::PathArguments::Parenthesized(_) => return None,
        };

        Some(Self {
            namespace: namespace.join("::"),
            name: last.ident.to_string(),
            args,
        })
    }

    /// Whether the type lives outside the prelude
    pub fn has_namespace(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// Fully qualified form, with qualified generic arguments
    pub fn qualified_name(&self) -> String {
        let mut out = if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        };
        if !self.args.is_empty() {
            let args: Vec<_> = self.args.iter().map(|a| a.qualified_name()).collect();
            out.push('<');
            out.push_str(&args.join(", "));
            out.push('>');
        }
        out
    }

    /// Expression-position form: generic arguments use turbofish
    /// (`Handler::<String>`)
    pub fn expr_path(&self) -> String {
        if self.args.is_empty() {
            self.name.clone()
        } else {
            format!("{}::<{}>", self.name, self.render_args())
        }
    }

    fn render_args(&self) -> String {
        self.args
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Renders the short form used in generated code (`HashMap<String, u32>`);
/// namespaces are brought into scope by glob imports.
impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}<{}>", self.name, self.render_args())
        }
    }
}

/// A handler parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Name as declared (not yet sanitized)
    pub name: String,

    /// Parameter type
    pub ty: TypeReference,
}

impl Parameter {
    /// Create a parameter
    pub fn new(name: impl Into<String>, ty: TypeReference) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Invoke shape of an event handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureShape {
    /// No parameters
    ZeroArg,
    /// Exactly one parameter
    Single(Parameter),
    /// Two or more parameters, in declaration order
    Multi(Vec<Parameter>),
    /// Invoke shape could not be determined
    Unresolved,
}

/// An event's handler type and its invoke shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateSignature {
    /// Native handler type
    pub handler: TypeReference,

    /// Classified parameter list
    pub shape: SignatureShape,

    /// Whether the handler can be built directly from a `Callback<T>`
    pub callback_constructor: bool,
}

impl DelegateSignature {
    /// Classify a parameter list by arity
    pub fn from_parameters(
        handler: TypeReference,
        mut parameters: Vec<Parameter>,
        callback_constructor: bool,
    ) -> Self {
        let shape = match parameters.len() {
            0 => SignatureShape::ZeroArg,
            1 => SignatureShape::Single(parameters.remove(0)),
            _ => SignatureShape::Multi(parameters),
        };
        Self {
            handler,
            shape,
            callback_constructor,
        }
    }

    /// A signature whose invoke shape is unknown
    pub fn unresolved(handler: TypeReference) -> Self {
        Self {
            handler,
            shape: SignatureShape::Unresolved,
            callback_constructor: false,
        }
    }

    /// Parameters in declaration order (empty when unresolved)
    pub fn parameters(&self) -> &[Parameter] {
        match &self.shape {
            SignatureShape::ZeroArg | SignatureShape::Unresolved => &[],
            SignatureShape::Single(p) => std::slice::from_ref(p),
            SignatureShape::Multi(ps) => ps,
        }
    }

    /// Parameter count, `None` when unresolved
    pub fn arity(&self) -> Option<usize> {
        match &self.shape {
            SignatureShape::Unresolved => None,
            _ => Some(self.parameters().len()),
        }
    }

    /// Whether the invoke shape is known
    pub fn is_resolved(&self) -> bool {
        !matches!(self.shape, SignatureShape::Unresolved)
    }

    /// Type carried by the stream for this signature
    ///
    /// `Unit` for no parameters, the parameter type for one, a tuple in
    /// declaration order otherwise.
    pub fn stream_type(&self) -> Option<String> {
        match &self.shape {
            SignatureShape::ZeroArg => Some("Unit".to_string()),
            SignatureShape::Single(p) => Some(p.ty.to_string()),
            SignatureShape::Multi(ps) => {
                let types: Vec<_> = ps.iter().map(|p| p.ty.to_string()).collect();
                Some(format!("({})", types.join(", ")))
            }
            SignatureShape::Unresolved => None,
        }
    }
}

/// One event declared on an owner type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDeclaration {
    /// Declaring type
    pub owner: TypeReference,

    /// Event name
    pub name: String,

    /// Add accessor present
    pub has_add: bool,

    /// Remove accessor present
    pub has_remove: bool,

    /// Handler signature
    pub signature: DelegateSignature,
}

impl EventDeclaration {
    /// Whether wrappers can be generated for this event
    pub fn is_eligible(&self) -> bool {
        crate::synth::sanitize::is_identifier(&self.name)
            && self.has_add
            && self.has_remove
            && self.signature.is_resolved()
    }

    /// Parameter count, `None` when unresolved
    pub fn arity(&self) -> Option<usize> {
        self.signature.arity()
    }

    /// snake_case form of the event name, used for accessors and fields
    pub fn snake_name(&self) -> String {
        crate::synth::sanitize::to_snake_case(&self.name)
    }
}

/// An owner type with its eligible events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeModel {
    /// The type itself
    pub owner: TypeReference,

    /// Trait or struct
    pub kind: TypeKind,

    /// Whether binders may be generated for the type
    pub extendable: bool,

    /// Concrete type whose inherent impl carries the binders
    pub binder_target: Option<TypeReference>,

    /// Eligible events, in declaration order
    pub events: Vec<EventDeclaration>,
}

impl TypeModel {
    /// Build the model for a catalog entry
    pub fn from_catalog(ty: &CatalogType) -> Self {
        let owner = TypeReference::new(ty.namespace.clone(), ty.name.clone());
        let events = crate::filter::filter_events(&owner, &ty.events);
        Self {
            binder_target: Self::binder_target(ty.kind, &owner, ty.concrete.as_deref()),
            owner,
            kind: ty.kind,
            extendable: ty.extendable,
            events,
        }
    }

    /// Type that binders are implemented on
    ///
    /// A struct is its own target. A trait needs a concrete type: the one
    /// named by `concrete`, or else the trait name without its `I` prefix
    /// (`IButton` → `Button`). Traits matching neither have no target.
    pub fn binder_target(
        kind: TypeKind,
        owner: &TypeReference,
        concrete: Option<&str>,
    ) -> Option<TypeReference> {
        if kind == TypeKind::Struct {
            return Some(owner.clone());
        }

        match concrete {
            Some(concrete) => {
                let target = TypeReference::parse(concrete).filter(|t| t.args.is_empty())?;
                if target.has_namespace() {
                    Some(target)
                } else {
                    Some(TypeReference::new(owner.namespace.clone(), target.name))
                }
            }
            None => {
                let name = owner.name.strip_prefix('I')?;
                name.starts_with(|c: char| c.is_ascii_uppercase())
                    .then(|| TypeReference::new(owner.namespace.clone(), name))
            }
        }
    }
}

/// Kind of a generated artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    /// `On<Event>AsObservable` extension trait
    Wrappers,
    /// `On<Event>` bidirectional properties
    Binders,
}

impl ArtifactKind {
    /// File name suffix
    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::Wrappers => "observables",
            ArtifactKind::Binders => "bindings",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Wrappers => write!(f, "wrappers"),
            ArtifactKind::Binders => write!(f, "binders"),
        }
    }
}

/// A complete generated source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperArtifact {
    /// File name, e.g. `i_button_observables.rs`
    pub file_name: String,

    /// Full source text
    pub text: String,

    /// Wrappers or binders
    pub kind: ArtifactKind,

    /// Qualified name of the owner type
    pub owner: String,
}

impl WrapperArtifact {
    /// Create an artifact for `owner`
    pub fn new(owner: &TypeReference, kind: ArtifactKind, text: String) -> Self {
        Self {
            file_name: Self::file_name_for(owner, kind),
            text,
            kind,
            owner: owner.qualified_name(),
        }
    }

    /// `<snake_name>_<suffix>.rs`
    pub fn file_name_for(owner: &TypeReference, kind: ArtifactKind) -> String {
        format!(
            "{}_{}.rs",
            crate::synth::sanitize::to_snake_case(&owner.name),
            kind.suffix()
        )
    }

    /// Hex-encoded SHA-256 of the text
    pub fn content_hash(&self) -> String {
        hex::encode(Sha256::digest(self.text.as_bytes()))
    }
}
