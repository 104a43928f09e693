//! Erased descriptors: resolving them directly, and checking signatures against them.

use oracle_classfile::{FieldType, ReturnType};
use oracle_types::{internal_to_binary, PrimitiveType, ResolvedType, TypeRegistry};

use crate::error::{ResolveError, Result};
use crate::resolver::Resolver;
use crate::session::Session;

pub(crate) fn resolve_erased<R: Resolver + ?Sized>(
    session: &mut Session<'_, R>,
    ty: &FieldType,
) -> Result<ResolvedType> {
    match ty {
        FieldType::Base(base) => Ok(ResolvedType::Primitive((*base).into())),
        FieldType::Object(internal) => Ok(ResolvedType::RawClass(
            session.class_named(&internal_to_binary(internal))?,
        )),
        FieldType::Array(elem) => Ok(ResolvedType::array(resolve_erased(session, elem)?)),
    }
}

/// Checks that `resolved` erases to `erased`.
///
/// Type variables are accepted wherever the descriptor has a class; their erasure depends on
/// bounds that may not be resolved yet.
pub(crate) fn check_shape(
    registry: &TypeRegistry,
    erased: &FieldType,
    resolved: &ResolvedType,
) -> Result<()> {
    let matches = match (erased, resolved) {
        (FieldType::Base(base), ResolvedType::Primitive(prim)) => PrimitiveType::from(*base) == *prim,
        (FieldType::Array(elem), ResolvedType::Array(resolved_elem)) => {
            return check_shape(registry, elem, resolved_elem)
        }
        (FieldType::Object(_), ResolvedType::TypeVariable(_)) => true,
        (FieldType::Object(internal), other) => other
            .class_id()
            .and_then(|id| registry.class(id))
            .is_some_and(|class| class.binary_name == internal_to_binary(internal)),
        _ => false,
    };
    if matches {
        Ok(())
    } else {
        Err(ResolveError::shape(format!(
            "erased type `{erased}` does not match `{}`",
            registry.display(resolved)
        )))
    }
}

pub(crate) fn check_return_shape(
    registry: &TypeRegistry,
    erased: &ReturnType,
    resolved: &ResolvedType,
) -> Result<()> {
    match erased {
        ReturnType::Void if resolved.is_void() => Ok(()),
        ReturnType::Void => Err(ResolveError::shape(format!(
            "erased return type `V` does not match `{}`",
            registry.display(resolved)
        ))),
        ReturnType::Type(ty) => check_shape(registry, ty, resolved),
    }
}
