use oracle_classfile::{BaseType, FieldType, MethodDescriptor, SignatureEvent};
use oracle_types::{
    internal_to_binary, ClassId, MethodId, MethodKind, Parameter, ResolutionState, ResolvedType, TypeParamOwner,
    TypeParameter, TypeRegistry,
};

use crate::config::ResolveOptions;
use crate::diagnostics::{report_failure, DiagnosticSink};
use crate::erased::{check_return_shape, check_shape, resolve_erased};
use crate::error::{ResolveError, Result};
use crate::lookup::TypeParameterLookup;
use crate::resolver::Resolver;
use crate::session::Session;
use crate::sig_type::{unexpected, SigType, TypeBuilder};
use crate::type_params::{BoundKind, PendingTypeParams};

const ENUM: &str = "java.lang.Enum";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodSigState {
    AwaitingTypeParams,
    AwaitingParams,
    AwaitingReturn,
    AwaitingThrows,
    Done,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Bound(BoundKind),
    Param,
    Return,
    Throws,
}

/// Consumes the events of one method signature and commits the result to the method.
pub struct MethodSignatureResolver<'a, 's, R: Resolver + ?Sized> {
    session: Session<'a, R>,
    method: MethodId,
    owner: ClassId,
    kind: MethodKind,
    descriptor: MethodDescriptor,
    arg_names: Vec<String>,
    state: MethodSigState,
    slot: Option<Slot>,
    builder: TypeBuilder<'s>,
    pending: PendingTypeParams<'s>,
    type_params: Vec<TypeParameter>,
    params: Vec<ResolvedType>,
    return_type: Option<ResolvedType>,
    throws: Vec<ResolvedType>,
}

impl<'a, 's, R: Resolver + ?Sized> MethodSignatureResolver<'a, 's, R> {
    /// `lookup` holds the scopes of the owning class (see
    /// [`TypeParameterLookup::push_class_scopes`]); the method's own scope is pushed on top
    /// once its type parameters are declared.
    pub fn new(
        resolver: &'a mut R,
        sink: &'a mut dyn DiagnosticSink,
        options: &ResolveOptions,
        method: MethodId,
        lookup: TypeParameterLookup,
    ) -> Result<Self> {
        let def = resolver
            .registry()
            .method(method)
            .ok_or_else(|| unknown_method_id(method))?;
        let owner = def.owner;
        let kind = def.kind;
        let descriptor = def.descriptor.clone();
        let arg_names = def.arg_names.clone();
        let name = method_name(resolver.registry(), method);
        Ok(Self {
            session: Session::new(resolver, sink, options, lookup, name),
            method,
            owner,
            kind,
            descriptor,
            arg_names,
            state: MethodSigState::AwaitingTypeParams,
            slot: None,
            builder: TypeBuilder::default(),
            pending: PendingTypeParams::default(),
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: None,
            throws: Vec::new(),
        })
    }

    pub fn state(&self) -> MethodSigState {
        self.state
    }

    pub fn accept(&mut self, event: SignatureEvent<'s>) -> Result<()> {
        match event {
            SignatureEvent::FormalTypeParameter(name) => {
                self.enter_section(event, &[MethodSigState::AwaitingTypeParams])?;
                self.pending.declare(name)
            }
            SignatureEvent::ClassBound | SignatureEvent::InterfaceBound => {
                self.enter_section(event, &[MethodSigState::AwaitingTypeParams])?;
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
            SignatureEvent::ParameterType => {
                self.enter_section(
                    event,
                    &[MethodSigState::AwaitingTypeParams, MethodSigState::AwaitingParams],
                )?;
                self.declare_type_params()?;
                self.state = MethodSigState::AwaitingParams;
                self.slot = Some(Slot::Param);
                Ok(())
            }
            SignatureEvent::ReturnType => {
                self.enter_section(
                    event,
                    &[MethodSigState::AwaitingTypeParams, MethodSigState::AwaitingParams],
                )?;
                self.declare_type_params()?;
                self.state = MethodSigState::AwaitingReturn;
                self.slot = Some(Slot::Return);
                Ok(())
            }
            SignatureEvent::ExceptionType => {
                self.enter_section(event, &[MethodSigState::AwaitingThrows])?;
                self.slot = Some(Slot::Throws);
                Ok(())
            }
            SignatureEvent::Superclass | SignatureEvent::Interface => Err(unexpected(event)),
            _ => self.type_event(event),
        }
    }

    fn enter_section(&self, event: SignatureEvent<'_>, expected: &[MethodSigState]) -> Result<()> {
        if expected.contains(&self.state) && self.slot.is_none() {
            Ok(())
        } else {
            Err(unexpected(event))
        }
    }

    fn declare_type_params(&mut self) -> Result<()> {
        if self.state != MethodSigState::AwaitingTypeParams {
            return Ok(());
        }
        let predeclared = self
            .session
            .registry()
            .method(self.method)
            .map(|def| def.type_params.clone())
            .unwrap_or_default();
        let pending = std::mem::take(&mut self.pending);
        self.type_params = pending.resolve(
            &mut self.session,
            TypeParamOwner::Method(self.method),
            &predeclared,
        )?;
        Ok(())
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
            Slot::Param => {
                if ty == SigType::Void {
                    return Err(ResolveError::malformed("void parameter type"));
                }
                let param = self.session.resolve_type(&ty)?;
                self.params.push(param);
            }
            Slot::Return => {
                let return_type = self.session.resolve_type(&ty)?;
                self.return_type = Some(return_type);
                self.state = MethodSigState::AwaitingThrows;
            }
            Slot::Throws => {
                let thrown = self.session.resolve_reference(&ty)?;
                self.throws.push(thrown);
            }
        }
        Ok(())
    }

    /// Validates the signature against the erased descriptor and commits it to the method.
    pub fn finish(&mut self) -> Result<()> {
        match self.state {
            MethodSigState::Done => {
                return Err(ResolveError::malformed("signature already finished"))
            }
            MethodSigState::AwaitingTypeParams
            | MethodSigState::AwaitingParams
            | MethodSigState::AwaitingReturn => {
                return Err(ResolveError::IncompleteSignature {
                    missing: "return type",
                })
            }
            MethodSigState::AwaitingThrows if self.slot.is_some() => {
                return Err(ResolveError::IncompleteSignature {
                    missing: "end of exception type",
                })
            }
            MethodSigState::AwaitingThrows => {}
        }

        let synthetic = self.synthetic_param_count();
        if self.session.options.verify_erased_descriptors {
            self.verify_descriptor(synthetic)?;
        }
        let names = self.param_names(synthetic);

        let params = std::mem::take(&mut self.params)
            .into_iter()
            .zip(names)
            .map(|(ty, name)| Parameter { name, ty })
            .collect();
        let return_type = match self.kind {
            MethodKind::Constructor => None,
            MethodKind::Method => self.return_type.take(),
        };
        let type_params = std::mem::take(&mut self.type_params);
        let throws = std::mem::take(&mut self.throws);

        let def = self
            .session
            .resolver
            .registry_mut()
            .method_mut(self.method)
            .ok_or_else(|| unknown_method_id(self.method))?;
        def.type_params = type_params;
        def.params = params;
        def.return_type = return_type;
        def.throws = throws;
        def.state = ResolutionState::Resolved;
        self.state = MethodSigState::Done;

        tracing::debug!(
            target: "oracle.resolve",
            method = %self.session.owner(),
            "resolved method signature"
        );
        Ok(())
    }

    /// Leading descriptor parameters absent from a constructor's signature: the outer
    /// instance of an inner class, or the name and ordinal of an enum constant. Any other
    /// surplus counts as zero and fails the descriptor check.
    fn synthetic_param_count(&self) -> usize {
        if self.kind != MethodKind::Constructor {
            return 0;
        }
        let surplus = self.descriptor.params.len().saturating_sub(self.params.len());
        if surplus == 0 {
            return 0;
        }
        let registry = self.session.registry();
        let Some(owner) = registry.class(self.owner) else {
            return 0;
        };
        let leading = &self.descriptor.params[..surplus];
        let recognized = if owner.erased_super.as_deref() == Some(ENUM) {
            matches!(
                leading,
                [FieldType::Object(name), FieldType::Base(BaseType::Int)] if name == "java/lang/String"
            )
        } else if let Some(enclosing) = owner.enclosing {
            matches!(
                leading,
                [FieldType::Object(name)] if internal_to_binary(name) == registry.class_name(enclosing)
            )
        } else {
            false
        };
        if recognized {
            surplus
        } else {
            0
        }
    }

    fn verify_descriptor(&self, synthetic: usize) -> Result<()> {
        let erased = &self.descriptor.params;
        if erased.len() != self.params.len() + synthetic {
            return Err(ResolveError::shape(format!(
                "signature declares {} parameter(s) but the descriptor `{}` has {}",
                self.params.len(),
                self.descriptor,
                erased.len()
            )));
        }
        let registry = self.session.registry();
        for (erased, resolved) in erased[synthetic..].iter().zip(&self.params) {
            check_shape(registry, erased, resolved)?;
        }
        if self.kind == MethodKind::Method {
            if let Some(return_type) = &self.return_type {
                check_return_shape(registry, &self.descriptor.return_type, return_type)?;
            }
        }
        Ok(())
    }

    fn param_names(&mut self, synthetic: usize) -> Vec<String> {
        let declared = self.params.len();
        let names = std::mem::take(&mut self.arg_names);
        if names.len() == declared {
            return names;
        }
        if synthetic > 0 && names.len() == declared + synthetic {
            return names.into_iter().skip(synthetic).collect();
        }
        warn_argument_names(&mut self.session, names.len(), declared);
        default_arg_names(declared)
    }

    pub(crate) fn push_class_scopes(&mut self) {
        self.session.push_class_scopes(self.owner, true);
    }
}

fn warn_argument_names<R: Resolver + ?Sized>(
    session: &mut Session<'_, R>,
    supplied: usize,
    declared: usize,
) {
    if supplied == 0 {
        return;
    }
    let owner = session.owner().to_owned();
    session.warn(
        "argument-names",
        format!(
            "{supplied} argument name(s) supplied for {declared} parameter(s) of `{owner}`; using defaults"
        ),
    );
}

fn default_arg_names(count: usize) -> Vec<String> {
    (0..count).map(|idx| format!("arg{idx}")).collect()
}

fn unknown_method_id(method: MethodId) -> ResolveError {
    ResolveError::UnknownDeclaration {
        what: format!("method #{}", method.index()),
    }
}

/// `Owner.name` for diagnostics.
fn method_name(registry: &TypeRegistry, method: MethodId) -> String {
    match registry.method(method) {
        Some(def) => format!("{}.{}", registry.class_name(def.owner), def.name),
        None => format!("<unknown method #{}>", method.index()),
    }
}

fn begin(registry: &mut TypeRegistry, method: MethodId) -> Result<()> {
    let name = method_name(registry, method);
    let def = registry
        .method_mut(method)
        .ok_or_else(|| unknown_method_id(method))?;
    match def.state {
        ResolutionState::Resolving => Err(ResolveError::CyclicResolution { name }),
        ResolutionState::Resolved => Err(ResolveError::AlreadyResolved { name }),
        ResolutionState::Unresolved => {
            def.state = ResolutionState::Resolving;
            Ok(())
        }
    }
}

fn abort(registry: &mut TypeRegistry, method: MethodId) {
    if let Some(def) = registry.method_mut(method) {
        if def.state == ResolutionState::Resolving {
            def.state = ResolutionState::Unresolved;
        }
    }
}

/// Resolves `method` from its generic signature.
///
/// Failures are reported once through `sink` and leave the method unchanged.
pub fn resolve_method_signature<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    method: MethodId,
    signature: &str,
) -> Result<()> {
    resolve_method(resolver, sink, options, method, Some(signature))
}

/// Resolves `method` from its signature, or from its erased descriptor when it has none.
pub fn resolve_method<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    method: MethodId,
    signature: Option<&str>,
) -> Result<()> {
    let result = run(resolver, sink, options, method, signature);
    if let Err(err) = &result {
        report_failure(sink, err, method_name(resolver.registry(), method), signature);
    }
    result
}

fn run<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    method: MethodId,
    signature: Option<&str>,
) -> Result<()> {
    begin(resolver.registry_mut(), method)?;
    let outcome = match signature {
        Some(signature) => from_signature(resolver, sink, options, method, signature),
        None => from_descriptor(resolver, sink, options, method),
    };
    if outcome.is_err() {
        abort(resolver.registry_mut(), method);
    }
    outcome
}

fn from_signature<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    method: MethodId,
    signature: &str,
) -> Result<()> {
    let events = oracle_classfile::parse_method_signature(signature)?;
    let mut method_resolver =
        MethodSignatureResolver::new(resolver, sink, options, method, TypeParameterLookup::new())?;
    method_resolver.push_class_scopes();
    for event in events {
        method_resolver.accept(event)?;
    }
    method_resolver.finish()
}

fn from_descriptor<R: Resolver + ?Sized>(
    resolver: &mut R,
    sink: &mut dyn DiagnosticSink,
    options: &ResolveOptions,
    method: MethodId,
) -> Result<()> {
    let (kind, descriptor, arg_names) = {
        let def = resolver
            .registry()
            .method(method)
            .ok_or_else(|| unknown_method_id(method))?;
        (def.kind, def.descriptor.clone(), def.arg_names.clone())
    };
    let name = method_name(resolver.registry(), method);
    let mut session = Session::new(resolver, sink, options, TypeParameterLookup::new(), name);

    let mut params = Vec::with_capacity(descriptor.params.len());
    for erased in &descriptor.params {
        params.push(resolve_erased(&mut session, erased)?);
    }
    let return_type = match (kind, &descriptor.return_type) {
        (MethodKind::Constructor, _) => None,
        (MethodKind::Method, oracle_classfile::ReturnType::Void) => Some(ResolvedType::VOID),
        (MethodKind::Method, oracle_classfile::ReturnType::Type(ty)) => {
            Some(resolve_erased(&mut session, ty)?)
        }
    };
    let names = if arg_names.len() == params.len() {
        arg_names
    } else {
        warn_argument_names(&mut session, arg_names.len(), params.len());
        default_arg_names(params.len())
    };

    let def = session
        .resolver
        .registry_mut()
        .method_mut(method)
        .ok_or_else(|| unknown_method_id(method))?;
    def.params = params
        .into_iter()
        .zip(names)
        .map(|(ty, name)| Parameter { name, ty })
        .collect();
    def.return_type = return_type;
    def.throws = Vec::new();
    def.state = ResolutionState::Resolved;

    tracing::debug!(
        target: "oracle.resolve",
        method = %session.owner(),
        "resolved method from erased descriptor"
    );
    Ok(())
}
