use std::collections::HashSet;

use oracle_classfile::WildcardKind;
use oracle_types::{
    internal_to_binary, ClassId, ResolutionState, ResolvedType, TypeRegistry, WildcardBound,
};

use crate::config::ResolveOptions;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{ResolveError, Result};
use crate::lookup::TypeParameterLookup;
use crate::resolver::Resolver;
use crate::sig_type::{ClassSegment, SigArg, SigType};

/// State shared by the class, method and field resolvers for one resolution.
pub(crate) struct Session<'a, R: ?Sized> {
    pub(crate) resolver: &'a mut R,
    pub(crate) sink: &'a mut dyn DiagnosticSink,
    pub(crate) options: ResolveOptions,
    pub(crate) lookup: TypeParameterLookup,
    owner: String,
    requested: HashSet<ClassId>,
}

impl<'a, R: Resolver + ?Sized> Session<'a, R> {
    pub(crate) fn new(
        resolver: &'a mut R,
        sink: &'a mut dyn DiagnosticSink,
        options: &ResolveOptions,
        lookup: TypeParameterLookup,
        owner: String,
    ) -> Self {
        Self {
            resolver,
            sink,
            options: *options,
            lookup,
            owner,
            requested: HashSet::new(),
        }
    }

    pub(crate) fn registry(&self) -> &TypeRegistry {
        self.resolver.registry()
    }

    pub(crate) fn owner(&self) -> &str {
        &self.owner
    }

    pub(crate) fn warn(&mut self, code: &'static str, message: String) {
        self.sink
            .report(Diagnostic::warning(code, message).with_owner(self.owner.clone()));
    }

    /// Pushes the scopes of `class`'s enclosing classes (and of `class` itself when
    /// `include_self`), giving the resolver a chance to resolve each of them first.
    pub(crate) fn push_class_scopes(&mut self, class: ClassId, include_self: bool) {
        let chain = self.registry().enclosing_chain(class);
        for outer in chain {
            self.ensure_resolved(outer);
        }
        if include_self {
            self.ensure_resolved(class);
            self.lookup.push_class_scopes(self.resolver.registry(), class);
        } else {
            self.lookup.push_enclosing_scopes(self.resolver.registry(), class);
        }
    }

    /// Asks the resolver to resolve `class` if it is still unresolved. Each class is asked
    /// about at most once per session; classes already being resolved are left alone.
    pub(crate) fn ensure_resolved(&mut self, class: ClassId) {
        if !self.options.resolve_referenced_classes {
            return;
        }
        let unresolved = self
            .registry()
            .class(class)
            .is_some_and(|c| c.state == ResolutionState::Unresolved);
        if !unresolved || !self.requested.insert(class) {
            return;
        }
        tracing::trace!(
            target: "oracle.resolve",
            class = %self.registry().class_name(class),
            "resolving referenced class"
        );
        if !self.resolver.resolve_class(class, &mut *self.sink) {
            let name = self.registry().class_name(class);
            self.warn(
                "unresolved-class",
                format!("could not resolve referenced class `{name}`"),
            );
        }
    }

    pub(crate) fn class_named(&mut self, binary_name: &str) -> Result<ClassId> {
        let id = self
            .registry()
            .lookup(binary_name)
            .ok_or_else(|| ResolveError::UnknownClass {
                name: binary_name.to_owned(),
            })?;
        self.ensure_resolved(id);
        Ok(id)
    }

    pub(crate) fn resolve_type(&mut self, ty: &SigType<'_>) -> Result<ResolvedType> {
        match ty {
            SigType::Base(base) => Ok(ResolvedType::Primitive((*base).into())),
            SigType::Void => Ok(ResolvedType::VOID),
            SigType::Var(name) => self
                .lookup
                .resolve(name)
                .map(ResolvedType::TypeVariable)
                .ok_or_else(|| ResolveError::UnknownTypeVariable {
                    name: (*name).to_owned(),
                }),
            SigType::Array(elem) => {
                if matches!(**elem, SigType::Void) {
                    return Err(ResolveError::malformed("array of void"));
                }
                Ok(ResolvedType::array(self.resolve_type(elem)?))
            }
            SigType::Class(segments) => self.resolve_class_type(segments),
        }
    }

    /// Like [`Session::resolve_type`], but rejects primitives and `void`.
    pub(crate) fn resolve_reference(&mut self, ty: &SigType<'_>) -> Result<ResolvedType> {
        match ty {
            SigType::Base(_) | SigType::Void => Err(ResolveError::malformed(
                "primitive type where a reference type is required",
            )),
            _ => self.resolve_type(ty),
        }
    }

    /// Like [`Session::resolve_type`], but only accepts class types.
    pub(crate) fn resolve_class_reference(&mut self, ty: &SigType<'_>) -> Result<ResolvedType> {
        match ty {
            SigType::Class(segments) => self.resolve_class_type(segments),
            _ => Err(ResolveError::malformed("expected a class type")),
        }
    }

    fn resolve_class_type(&mut self, segments: &[ClassSegment<'_>]) -> Result<ResolvedType> {
        let mut binary_name = String::new();
        let mut current: Option<ResolvedType> = None;
        for segment in segments {
            if binary_name.is_empty() {
                binary_name = internal_to_binary(segment.name);
            } else {
                binary_name.push('$');
                binary_name.push_str(segment.name);
            }
            let base = self.class_named(&binary_name)?;
            let args = segment
                .args
                .iter()
                .map(|arg| self.resolve_arg(arg))
                .collect::<Result<Vec<_>>>()?;
            self.check_arity(base, args.len());

            current = Some(match current {
                Some(outer @ ResolvedType::ParameterizedClass { .. }) => {
                    ResolvedType::ParameterizedClass {
                        base,
                        args,
                        enclosing: Some(Box::new(outer)),
                    }
                }
                _ if args.is_empty() => ResolvedType::RawClass(base),
                _ => ResolvedType::parameterized(base, args),
            });
        }
        current.ok_or_else(|| ResolveError::malformed("empty class type"))
    }

    fn resolve_arg(&mut self, arg: &SigArg<'_>) -> Result<ResolvedType> {
        match arg {
            SigArg::Unbounded => Ok(ResolvedType::Wildcard(WildcardBound::Unbounded)),
            SigArg::Bounded(WildcardKind::Exact, ty) => self.resolve_reference(ty),
            SigArg::Bounded(WildcardKind::Extends, ty) => Ok(ResolvedType::Wildcard(
                WildcardBound::Extends(Box::new(self.resolve_reference(ty)?)),
            )),
            SigArg::Bounded(WildcardKind::Super, ty) => Ok(ResolvedType::Wildcard(
                WildcardBound::Super(Box::new(self.resolve_reference(ty)?)),
            )),
        }
    }

    fn check_arity(&mut self, base: ClassId, supplied: usize) {
        if !self.options.warn_on_type_argument_arity || supplied == 0 {
            return;
        }
        let Some(class) = self.registry().class(base) else {
            return;
        };
        // An unresolved class without pre-declared parameters has no known arity yet.
        if !class.is_generic() && !class.is_resolved() {
            return;
        }
        let expected = class.type_params.len();
        if expected != supplied {
            let name = class.binary_name.clone();
            self.warn(
                "type-argument-arity",
                format!(
                    "`{name}` declares {expected} type parameter(s) but {supplied} type argument(s) were supplied"
                ),
            );
        }
    }
}
