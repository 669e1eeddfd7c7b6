//! Artifact assembly
//!
//! Joins synthesized fragments, the resolved imports and the rendered header
//! into complete source files: at most one wrapper artifact and one binder
//! artifact per type.

use minijinja::{Environment, context};
use rxwire_core::catalog::TypeKind;
use rxwire_core::config::NamespaceConfig;

use crate::diagnostics::{Diagnostic, Location, NO_BINDER_TARGET};
use crate::error::Result;
use crate::ir::{ArtifactKind, TypeModel, TypeReference, WrapperArtifact};
use crate::synth::{BinderCodegen, NamespaceResolver, WrapperCodegen};

const HEADER_TEMPLATE: &str = "header";

/// Everything produced for one type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generated {
    /// Assembled, not yet validated artifacts
    pub artifacts: Vec<WrapperArtifact>,

    /// Diagnostics raised during synthesis
    pub diagnostics: Vec<Diagnostic>,
}

/// Rust code generator
pub struct Generator {
    env: Environment<'static>,
    resolver: NamespaceResolver,
}

impl Generator {
    /// Create a generator with the given baseline namespaces and header
    /// template
    pub fn new(namespaces: &NamespaceConfig, header: &str) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template_owned(HEADER_TEMPLATE, header.to_string())?;
        Ok(Self {
            env,
            resolver: NamespaceResolver::from_config(namespaces),
        })
    }

    /// Generate every artifact for one type
    pub fn generate(&self, model: &TypeModel) -> Result<Generated> {
        let mut generated = Generated::default();

        if let Some(wrappers) = self.generate_wrappers(model)? {
            generated.artifacts.push(wrappers);
        }

        let (binders, diagnostics) = self.generate_binders(model)?;
        generated.artifacts.extend(binders);
        generated.diagnostics = diagnostics;

        Ok(generated)
    }

    /// Observable extension trait for every eligible event
    ///
    /// `None` when the type has no eligible events.
    pub fn generate_wrappers(&self, model: &TypeModel) -> Result<Option<WrapperArtifact>> {
        let events: Vec<_> = model.events.iter().filter(|e| e.is_eligible()).collect();
        if events.is_empty() {
            return Ok(None);
        }

        let owner = &model.owner;
        let trait_name = format!("{}ObservableExtensions", owner.name);
        let declarations: Vec<String> = events
            .iter()
            .map(|e| WrapperCodegen::generate_declaration(e))
            .collect();
        let methods: Vec<String> = events.iter().map(|e| WrapperCodegen::generate(e)).collect();

        let implementor = match model.kind {
            TypeKind::Trait => format!(
                "impl<T> {trait_name} for T\nwhere\n    T: {owner} + Clone + Send + Sync + 'static,\n{{\n",
                owner = owner.name,
            ),
            TypeKind::Struct => format!("impl {trait_name} for {owner} {{\n", owner = owner.name),
        };

        let body = format!(
            r#"/// Observable adapters for the events of [`{owner}`].
#[allow(non_snake_case)]
pub trait {trait_name} {{
{declarations}}}

#[allow(non_snake_case)]
{implementor}{methods}}}
"#,
            owner = owner.name,
            declarations = declarations.join("\n"),
            methods = methods.join("\n"),
        );

        let namespaces = self.resolver.resolve(owner, &model.events);
        let text = self.assemble(owner, ArtifactKind::Wrappers, &namespaces, &body)?;
        let artifact = WrapperArtifact::new(owner, ArtifactKind::Wrappers, text);
        tracing::debug!("Generated {} ({} events)", artifact.file_name, events.len());
        Ok(Some(artifact))
    }

    /// Bindings struct and `On<Event>` properties, for extendable types
    ///
    /// Returns the warnings for events over the parameter limit alongside
    /// the artifact. No artifact is produced when nothing could be bound, or
    /// when a trait has no concrete type to carry the properties.
    pub fn generate_binders(
        &self,
        model: &TypeModel,
    ) -> Result<(Option<WrapperArtifact>, Vec<Diagnostic>)> {
        if !model.extendable {
            return Ok((None, Vec::new()));
        }

        let mut fragments = BinderCodegen::bind(&model.events);
        if fragments.is_empty() {
            return Ok((None, fragments.diagnostics));
        }

        let owner = &model.owner;
        let Some(target) = &model.binder_target else {
            let owner = owner.qualified_name();
            tracing::debug!("No concrete type for binders of {}", owner);
            fragments.diagnostics.push(NO_BINDER_TARGET.create(
                context! { owner },
                Some(Location::owner(&owner)),
            ));
            return Ok((None, fragments.diagnostics));
        };

        let body = format!(
            r#"/// Lazily connected signal endpoints for [`{target}`].
#[derive(Debug, Default)]
pub struct {bindings} {{
{fields}}}

#[allow(non_snake_case)]
impl {target} {{
{properties}}}
"#,
            target = target.name,
            bindings = BinderCodegen::bindings_struct_name(target),
            fields = fragments.fields.concat(),
            properties = fragments.properties.join("\n"),
        );

        let namespaces = self.resolver.resolve(target, &fragments.bound);
        let text = self.assemble(owner, ArtifactKind::Binders, &namespaces, &body)?;
        let artifact = WrapperArtifact::new(owner, ArtifactKind::Binders, text);
        tracing::debug!(
            "Generated {} ({} signals)",
            artifact.file_name,
            fragments.bound.len()
        );
        Ok((Some(artifact), fragments.diagnostics))
    }

    fn render_header(&self, owner: &TypeReference, kind: ArtifactKind) -> Result<String> {
        let template = self.env.get_template(HEADER_TEMPLATE)?;
        let rendered = template.render(context! {
            owner => owner.qualified_name(),
            namespace => owner.namespace.clone(),
            kind => kind.to_string(),
        })?;
        Ok(rendered)
    }

    fn assemble(
        &self,
        owner: &TypeReference,
        kind: ArtifactKind,
        namespaces: &[String],
        body: &str,
    ) -> Result<String> {
        let mut text = String::new();

        let header = self.render_header(owner, kind)?;
        if !header.trim().is_empty() {
            text.push_str(header.trim_end());
            text.push_str("\n\n");
        }

        let imports = NamespaceResolver::render_imports(namespaces);
        if !imports.is_empty() {
            text.push_str(&imports);
            text.push('\n');
        }

        text.push_str(body);
        Ok(text)
    }
}
