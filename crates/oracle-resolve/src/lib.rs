//! Scope-aware resolution of JVM generic signatures.
//!
//! Given a [`TypeRegistry`](oracle_types::TypeRegistry) populated from bytecode, the entry
//! points in this crate read class, method and field signatures and fill in type parameters
//! with bounds, generic supertypes, parameter and return types:
//!
//! ```text
//! <H:Lcom/example/Handler;>Ljava/lang/Object;   ->   class Outer0<H extends Handler>
//! ```
//!
//! Type variables resolve against a [`TypeParameterLookup`] built from enclosing classes,
//! the owning class and the member itself, innermost first. Every fatal error is reported
//! once through the caller's [`DiagnosticSink`] and leaves the target declaration unchanged.

#![forbid(unsafe_code)]

mod class_sig;
mod config;
mod diagnostics;
mod erased;
mod error;
mod field_sig;
mod lookup;
mod method_sig;
mod resolver;
mod session;
mod sig_type;
mod type_params;

pub use crate::class_sig::{
    resolve_class, resolve_class_signature, ClassSigState, ClassSignatureResolver,
};
pub use crate::config::{init_tracing, ConfigError, LoggingConfig, ResolveConfig, ResolveOptions};
pub use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity, TracingSink};
pub use crate::error::{ResolveError, Result};
pub use crate::field_sig::{resolve_field, resolve_field_signature};
pub use crate::lookup::TypeParameterLookup;
pub use crate::method_sig::{
    resolve_method, resolve_method_signature, MethodSigState, MethodSignatureResolver,
};
pub use crate::resolver::Resolver;
