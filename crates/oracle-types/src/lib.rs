//! Symbol registry and resolved type model.
//!
//! [`TypeRegistry`] owns every class, method and field declaration of a compilation pass.
//! Declarations refer to each other through ids ([`ClassId`], [`MethodId`]) rather than
//! pointers, so outer/inner class links never form ownership cycles. Resolved types
//! ([`ResolvedType`]) are plain values built from those ids.

#![forbid(unsafe_code)]

mod format;
mod java_lang;
mod registry;
mod ty;

pub use crate::format::TypeDisplay;
pub use crate::registry::{
    internal_to_binary, ClassDecl, ClassDescriptor, ClassKind, FieldDef, MethodDecl, MethodDef,
    MethodKind, Parameter, ResolutionState, TypeParameter, TypeRegistry,
};
pub use crate::ty::{
    ClassId, FieldId, MethodId, PrimitiveType, ResolvedType, TypeParamOwner, TypeVarRef,
    WildcardBound,
};
