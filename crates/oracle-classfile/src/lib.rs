//! Erased descriptors and generic signatures as they appear in JVM class files.
//!
//! Descriptors parse into small value types ([`FieldType`], [`MethodDescriptor`]). Generic
//! signatures are read into a flat list of [`SignatureEvent`]s which downstream resolvers
//! consume with their own state machines.

#![forbid(unsafe_code)]

mod cursor;
mod descriptor;
mod error;
mod signature;

pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{Error, Result};
pub use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, SignatureEvent,
    WildcardKind, MAX_NESTING,
};
