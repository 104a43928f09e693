use oracle_types::{FieldId, ResolutionState, ResolvedType, TypeRegistry};

use crate::config::ResolveOptions;
use crate::diagnostics::{report_failure, DiagnosticSink};
use crate::erased::{check_shape, resolve_erased};
use crate::error::{ResolveError, Result};
use crate::lookup::TypeParameterLookup;
use crate::resolver::Resolver;
use crate::session::Session;
use crate::sig_type::TypeBuilder;

fn unknown_field_id(field: FieldId) -> ResolveError {
    ResolveError::UnknownDeclaration {
        what: format!("field #{}", field.index()),
    }
}

fn field_name(registry: &TypeRegistry, field: FieldId) -> String {
    match registry.field(field) {
        Some(def) => format!("{}.{}", registry.class_name(def.owner), def.name),
        None => format!("<unknown field #{}>", field.index()),
    }
}

/// Resolves the type of `field` from its generic signature.
pub fn resolve_field_signature<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    field: FieldId,
    signature: &str,
) -> Result<()> {
    resolve_field(resolver, sink, options, field, Some(signature))
}

/// Resolves the type of `field` from its signature, or from its erased descriptor.
pub fn resolve_field<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    field: FieldId,
    signature: Option<&str>,
) -> Result<()> {
    let result = run(resolver, sink, options, field, signature);
    if let Err(err) = &result {
        report_failure(sink, err, field_name(resolver.registry(), field), signature);
    }
    result
}

fn run<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    field: FieldId,
    signature: Option<&str>,
) -> Result<()> {
    let name = field_name(resolver.registry(), field);
    let def = resolver
        .registry_mut()
        .field_mut(field)
        .ok_or_else(|| unknown_field_id(field))?;
    match def.state {
        ResolutionState::Resolving => return Err(ResolveError::CyclicResolution { name }),
        ResolutionState::Resolved => return Err(ResolveError::AlreadyResolved { name }),
        ResolutionState::Unresolved => def.state = ResolutionState::Resolving,
    }
    let owner = def.owner;
    let descriptor = def.descriptor.clone();

    let mut session = Session::new(resolver, sink, options, TypeParameterLookup::new(), name);
    let resolved = match signature {
        Some(signature) => {
            session.push_class_scopes(owner, true);
            resolve_signature(&mut session, signature).and_then(|ty| {
                if session.options.verify_erased_descriptors {
                    check_shape(session.registry(), &descriptor, &ty)?;
                }
                Ok(ty)
            })
        }
        None => resolve_erased(&mut session, &descriptor),
    };

    let def = session
        .resolver
        .registry_mut()
        .field_mut(field)
        .ok_or_else(|| unknown_field_id(field))?;
    match resolved {
        Ok(ty) => {
            def.ty = Some(ty);
            def.state = ResolutionState::Resolved;
            tracing::debug!(target: "oracle.resolve", field = %session.owner(), "resolved field type");
            Ok(())
        }
        Err(err) => {
            def.state = ResolutionState::Unresolved;
            Err(err)
        }
    }
}

fn resolve_signature<R: Resolver + ?Sized>(
    session: &mut Session<'_, R>,
    signature: &str,
) -> Result<ResolvedType> {
    let mut builder = TypeBuilder::default();
    let mut resolved = None;
    for event in oracle_classfile::parse_field_signature(signature)? {
        if let Some(ty) = builder.push(event)? {
            resolved = Some(session.resolve_reference(&ty)?);
        }
    }
    resolved.ok_or(ResolveError::IncompleteSignature {
        missing: "field type",
    })
}
