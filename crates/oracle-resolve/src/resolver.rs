use oracle_types::{ClassId, TypeRegistry};

use crate::diagnostics::DiagnosticSink;

/// The collaborator a resolution runs against.
///
/// It owns the [`TypeRegistry`] and may resolve other classes on demand: when a signature
/// mentions a class that is still unresolved, [`Resolver::resolve_class`] is asked to bring
/// it up to date before its type parameters are used.
pub trait Resolver {
    fn registry(&self) -> &TypeRegistry;

    fn registry_mut(&mut self) -> &mut TypeRegistry;

    /// Resolves `class` on demand. Returning `false` is reported as a warning and
    /// resolution continues with whatever the registry knows about the class.
    fn resolve_class(&mut self, class: ClassId, sink: &mut dyn DiagnosticSink) -> bool {
        let _ = (class, sink);
        true
    }
}

impl Resolver for TypeRegistry {
    fn registry(&self) -> &TypeRegistry {
        self
    }

    fn registry_mut(&mut self) -> &mut TypeRegistry {
        self
    }
}
