use oracle_classfile::SignatureEvent;
use oracle_types::{
    ClassId, ResolutionState, ResolvedType, TypeParamOwner, TypeParameter, TypeRegistry,
};

use crate::config::ResolveOptions;
use crate::diagnostics::{report_failure, DiagnosticSink};
use crate::error::{ResolveError, Result};
use crate::lookup::TypeParameterLookup;
use crate::resolver::Resolver;
use crate::session::Session;
use crate::sig_type::{unexpected, TypeBuilder};
use crate::type_params::{BoundKind, PendingTypeParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSigState {
    AwaitingTypeParams,
    AwaitingSuperclass,
    AwaitingInterfaces,
    Done,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Bound(BoundKind),
    Superclass,
    Interface,
}

/// Consumes the events of one class signature and commits the result to the class.
///
/// The descriptor is left untouched until [`ClassSignatureResolver::finish`] succeeds.
pub struct ClassSignatureResolver<'a, 's, R: Resolver + ?Sized> {
    session: Session<'a, R>,
    class: ClassId,
    state: ClassSigState,
    /// Section whose type is currently being built.
    slot: Option<Slot>,
    builder: TypeBuilder<'s>,
    pending: PendingTypeParams<'s>,
    type_params: Vec<TypeParameter>,
    super_class: Option<ResolvedType>,
    interfaces: Vec<ResolvedType>,
}

impl<'a, 's, R: Resolver + ?Sized> ClassSignatureResolver<'a, 's, R> {
    /// `lookup` holds the scopes the signature is resolved in, normally those of the classes
    /// enclosing `class` (see [`TypeParameterLookup::push_enclosing_scopes`]).
    pub fn new(
        resolver: &'a mut R,
        sink: &'a mut dyn DiagnosticSink,
        options: &ResolveOptions,
        class: ClassId,
        lookup: TypeParameterLookup,
    ) -> Self {
        let owner = resolver.registry().class_name(class);
        Self {
            session: Session::new(resolver, sink, options, lookup, owner),
            class,
            state: ClassSigState::AwaitingTypeParams,
            slot: None,
            builder: TypeBuilder::default(),
            pending: PendingTypeParams::default(),
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
        }
    }

    pub fn state(&self) -> ClassSigState {
        self.state
    }

    pub fn accept(&mut self, event: SignatureEvent<'s>) -> Result<()> {
        match event {
            SignatureEvent::FormalTypeParameter(name) => {
                self.enter_section(event, ClassSigState::AwaitingTypeParams)?;
                self.pending.declare(name)
            }
            SignatureEvent::ClassBound | SignatureEvent::InterfaceBound => {
                self.enter_section(event, ClassSigState::AwaitingTypeParams)?;
                if self.pending.is_empty() {
                    return Err(unexpected(event));
                }
                let kind = match event {
                    SignatureEvent::ClassBound => BoundKind::Class,
                    _ => BoundKind::Interface,
                };
                self.slot = Some(Slot::Bound(kind));
                Ok(())
            }
            SignatureEvent::Superclass => {
                self.enter_section(event, ClassSigState::AwaitingTypeParams)?;
                self.declare_type_params()?;
                self.state = ClassSigState::AwaitingSuperclass;
                self.slot = Some(Slot::Superclass);
                Ok(())
            }
            SignatureEvent::Interface => {
                self.enter_section(event, ClassSigState::AwaitingInterfaces)?;
                self.slot = Some(Slot::Interface);
                Ok(())
            }
            SignatureEvent::ParameterType
            | SignatureEvent::ReturnType
            | SignatureEvent::ExceptionType => Err(unexpected(event)),
            _ => self.type_event(event),
        }
    }

    fn enter_section(&self, event: SignatureEvent<'_>, expected: ClassSigState) -> Result<()> {
        if self.state == expected && self.slot.is_none() {
            Ok(())
        } else {
            Err(unexpected(event))
        }
    }

    fn type_event(&mut self, event: SignatureEvent<'s>) -> Result<()> {
        let Some(slot) = self.slot else {
            return Err(unexpected(event));
        };
        let Some(ty) = self.builder.push(event)? else {
            return Ok(());
        };
        self.slot = None;
        match slot {
            Slot::Bound(kind) => self.pending.add_bound(kind, ty)?,
            Slot::Superclass => {
                self.super_class = Some(self.session.resolve_class_reference(&ty)?);
                self.state = ClassSigState::AwaitingInterfaces;
            }
            Slot::Interface => {
                let interface = self.session.resolve_class_reference(&ty)?;
                self.interfaces.push(interface);
            }
        }
        Ok(())
    }

    fn declare_type_params(&mut self) -> Result<()> {
        let predeclared = self
            .session
            .registry()
            .class(self.class)
            .map(|class| class.type_params.clone())
            .unwrap_or_default();
        let pending = std::mem::take(&mut self.pending);
        self.type_params =
            pending.resolve(&mut self.session, TypeParamOwner::Class(self.class), &predeclared)?;
        Ok(())
    }

    /// Validates that the signature is complete and commits it to the class descriptor.
    pub fn finish(&mut self) -> Result<()> {
        match self.state {
            ClassSigState::Done => {
                return Err(ResolveError::malformed("signature already finished"))
            }
            ClassSigState::AwaitingTypeParams | ClassSigState::AwaitingSuperclass => {
                return Err(ResolveError::IncompleteSignature {
                    missing: "superclass",
                })
            }
            ClassSigState::AwaitingInterfaces if self.slot.is_some() => {
                return Err(ResolveError::IncompleteSignature {
                    missing: "end of interface type",
                })
            }
            ClassSigState::AwaitingInterfaces => {}
        }
        let super_class = self
            .super_class
            .take()
            .ok_or(ResolveError::IncompleteSignature {
                missing: "superclass",
            })?;

        if self.session.options.verify_erased_descriptors {
            if let Err(err) =
                verify_erased_header(self.session.registry(), self.class, &super_class, &self.interfaces)
            {
                self.super_class = Some(super_class);
                return Err(err);
            }
        }

        let type_params = std::mem::take(&mut self.type_params);
        let interfaces = std::mem::take(&mut self.interfaces);
        let param_count = type_params.len();
        let descriptor = self
            .session
            .resolver
            .registry_mut()
            .class_mut(self.class)
            .ok_or_else(|| unknown_class_id(self.class))?;
        descriptor.type_params = type_params;
        descriptor.super_class = Some(super_class);
        descriptor.interfaces = interfaces;
        descriptor.state = ResolutionState::Resolved;
        self.state = ClassSigState::Done;

        tracing::debug!(
            target: "oracle.resolve",
            class = %self.session.owner(),
            type_params = param_count,
            "resolved class signature"
        );
        Ok(())
    }

    pub(crate) fn push_enclosing_scopes(&mut self) {
        self.session.push_class_scopes(self.class, false);
    }
}

fn verify_erased_header(
    registry: &TypeRegistry,
    class: ClassId,
    super_class: &ResolvedType,
    interfaces: &[ResolvedType],
) -> Result<()> {
    let Some(descriptor) = registry.class(class) else {
        return Ok(());
    };
    let Some(erased_super) = &descriptor.erased_super else {
        return Ok(());
    };
    let erased_name = |ty: &ResolvedType| ty.class_id().map(|id| registry.class_name(id));

    if erased_name(super_class).as_deref() != Some(erased_super.as_str()) {
        return Err(ResolveError::shape(format!(
            "superclass `{}` does not erase to `{erased_super}`",
            registry.display(super_class)
        )));
    }
    let actual: Vec<String> = interfaces.iter().filter_map(erased_name).collect();
    if actual != descriptor.erased_interfaces {
        return Err(ResolveError::shape(format!(
            "interfaces [{}] do not erase to [{}]",
            actual.join(", "),
            descriptor.erased_interfaces.join(", ")
        )));
    }
    Ok(())
}

pub(crate) fn unknown_class_id(class: ClassId) -> ResolveError {
    ResolveError::UnknownDeclaration {
        what: format!("class #{}", class.index()),
    }
}

/// Marks `class` as being resolved, rejecting re-entrant and repeated resolution.
fn begin(registry: &mut TypeRegistry, class: ClassId) -> Result<()> {
    let descriptor = registry
        .class_mut(class)
        .ok_or_else(|| unknown_class_id(class))?;
    match descriptor.state {
        ResolutionState::Resolving => Err(ResolveError::CyclicResolution {
            name: descriptor.binary_name.clone(),
        }),
        ResolutionState::Resolved => Err(ResolveError::AlreadyResolved {
            name: descriptor.binary_name.clone(),
        }),
        ResolutionState::Unresolved => {
            descriptor.state = ResolutionState::Resolving;
            Ok(())
        }
    }
}

fn abort(registry: &mut TypeRegistry, class: ClassId) {
    if let Some(descriptor) = registry.class_mut(class) {
        if descriptor.state == ResolutionState::Resolving {
            descriptor.state = ResolutionState::Unresolved;
        }
    }
}

/// Resolves `class` from its generic signature.
///
/// Failures are reported once through `sink` and leave the class descriptor unchanged.
pub fn resolve_class_signature<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    class: ClassId,
    signature: &str,
) -> Result<()> {
    resolve_class(resolver, sink, options, class, Some(signature))
}

/// Resolves `class` from its signature, or from its erased header when it has none.
pub fn resolve_class<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    class: ClassId,
    signature: Option<&str>,
) -> Result<()> {
    let result = run(resolver, sink, options, class, signature);
    if let Err(err) = &result {
        report_failure(sink, err, resolver.registry().class_name(class), signature);
    }
    result
}

fn run<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    class: ClassId,
    signature: Option<&str>,
) -> Result<()> {
    begin(resolver.registry_mut(), class)?;
    let outcome = match signature {
        Some(signature) => from_signature(resolver, sink, options, class, signature),
        None => from_erased_header(resolver, sink, options, class),
    };
    if outcome.is_err() {
        abort(resolver.registry_mut(), class);
    }
    outcome
}

fn from_signature<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    class: ClassId,
    signature: &str,
) -> Result<()> {
    let events = oracle_classfile::parse_class_signature(signature)?;
    let mut class_resolver =
        ClassSignatureResolver::new(resolver, sink, options, class, TypeParameterLookup::new());
    class_resolver.push_enclosing_scopes();
    for event in events {
        class_resolver.accept(event)?;
    }
    class_resolver.finish()
}

fn from_erased_header<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    class: ClassId,
) -> Result<()> {
    let owner = resolver.registry().class_name(class);
    let mut session = Session::new(resolver, sink, options, TypeParameterLookup::new(), owner);
    let (erased_super, erased_interfaces) = {
        let descriptor = session
            .registry()
            .class(class)
            .ok_or_else(|| unknown_class_id(class))?;
        (
            descriptor.erased_super.clone(),
            descriptor.erased_interfaces.clone(),
        )
    };

    let super_class = match erased_super {
        Some(name) => Some(ResolvedType::RawClass(session.class_named(&name)?)),
        None => None,
    };
    let interfaces = erased_interfaces
        .iter()
        .map(|name| session.class_named(name).map(ResolvedType::RawClass))
        .collect::<Result<Vec<_>>>()?;

    let descriptor = session
        .resolver
        .registry_mut()
        .class_mut(class)
        .ok_or_else(|| unknown_class_id(class))?;
    descriptor.super_class = super_class;
    descriptor.interfaces = interfaces;
    descriptor.state = ResolutionState::Resolved;

    tracing::debug!(
        target: "oracle.resolve",
        class = %session.owner(),
        "resolved class from erased header"
    );
    Ok(())
}
