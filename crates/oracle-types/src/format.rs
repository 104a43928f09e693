use std::fmt;

use crate::registry::TypeRegistry;
use crate::ty::{ResolvedType, WildcardBound};

/// Java-like rendering of a [`ResolvedType`], e.g. `com.example.Outer0<com.example.Handler1<V>>`.
///
/// Classes print with their binary names; member classes of a parameterized outer type print
/// as `Outer<T>.Inner`.
pub struct TypeDisplay<'a> {
    registry: &'a TypeRegistry,
    ty: &'a ResolvedType,
}

impl<'a> TypeDisplay<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry, ty: &'a ResolvedType) -> Self {
        Self { registry, ty }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, ty: &ResolvedType) -> fmt::Result {
        match ty {
            ResolvedType::Primitive(p) => f.write_str(p.java_name()),
            ResolvedType::RawClass(id) => f.write_str(&self.registry.class_name(*id)),
            ResolvedType::ParameterizedClass {
                base,
                args,
                enclosing,
            } => {
                match enclosing {
                    Some(outer) => {
                        self.write(f, outer)?;
                        f.write_str(".")?;
                        match self.registry.class(*base) {
                            Some(class) => f.write_str(class.simple_name())?,
                            None => f.write_str(&self.registry.class_name(*base))?,
                        }
                    }
                    None => f.write_str(&self.registry.class_name(*base))?,
                }
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in args.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        self.write(f, arg)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            ResolvedType::TypeVariable(var) => match self.registry.type_param(*var) {
                Some(tp) => f.write_str(&tp.name),
                None => write!(f, "<type var #{}>", var.index),
            },
            ResolvedType::Array(elem) => {
                self.write(f, elem)?;
                f.write_str("[]")
            }
            ResolvedType::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            ResolvedType::Wildcard(WildcardBound::Extends(bound)) => {
                f.write_str("? extends ")?;
                self.write(f, bound)
            }
            ResolvedType::Wildcard(WildcardBound::Super(bound)) => {
                f.write_str("? super ")?;
                self.write(f, bound)
            }
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, self.ty)
    }
}
