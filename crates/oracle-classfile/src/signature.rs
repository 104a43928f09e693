//! Generic signature reader.
//!
//! Signatures are turned into a flat sequence of [`SignatureEvent`]s in the order a
//! depth-first walk of the grammar encounters them. The reader only recognizes structure;
//! every name is reported exactly as written (class names stay in internal `a/b/C` form).
//!
//! Each reference type is bracketed so a consumer can rebuild it with a stack:
//! `ArrayType` precedes its element type, `ClassType` opens a class reference that is closed
//! by `End`, and `TypeArgument` precedes the argument type it qualifies.

use crate::cursor::{Cursor, InputKind};
use crate::descriptor::BaseType;
use crate::error::Result;

/// Maximum nesting of arrays and type arguments accepted before a signature is rejected.
pub const MAX_NESTING: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildcardKind {
    /// `+T`: `? extends T`
    Extends,
    /// `-T`: `? super T`
    Super,
    /// A plain type argument.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureEvent<'a> {
    /// A type parameter declaration `<Name:...>`; its bounds follow.
    FormalTypeParameter(&'a str),
    ClassBound,
    InterfaceBound,
    Superclass,
    Interface,
    ParameterType,
    ReturnType,
    ExceptionType,
    BaseType(BaseType),
    VoidType,
    TypeVariable(&'a str),
    ArrayType,
    /// Opens a class reference; the name is the internal name of the outermost class.
    ClassType(&'a str),
    /// Simple name of a member class of the class reference currently open.
    InnerClassType(&'a str),
    TypeArgument(WildcardKind),
    /// `*`
    UnboundedTypeArgument,
    /// Closes the innermost open class reference.
    End,
}

impl SignatureEvent<'_> {
    /// Short, stable label for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            SignatureEvent::FormalTypeParameter(_) => "formal type parameter",
            SignatureEvent::ClassBound => "class bound",
            SignatureEvent::InterfaceBound => "interface bound",
            SignatureEvent::Superclass => "superclass",
            SignatureEvent::Interface => "interface",
            SignatureEvent::ParameterType => "parameter type",
            SignatureEvent::ReturnType => "return type",
            SignatureEvent::ExceptionType => "exception type",
            SignatureEvent::BaseType(_) => "base type",
            SignatureEvent::VoidType => "void",
            SignatureEvent::TypeVariable(_) => "type variable",
            SignatureEvent::ArrayType => "array type",
            SignatureEvent::ClassType(_) => "class type",
            SignatureEvent::InnerClassType(_) => "inner class type",
            SignatureEvent::TypeArgument(_) => "type argument",
            SignatureEvent::UnboundedTypeArgument => "unbounded type argument",
            SignatureEvent::End => "end of class type",
        }
    }
}

/// Parses a class signature (`TypeParams? Superclass Interface*`).
pub fn parse_class_signature(sig: &str) -> Result<Vec<SignatureEvent<'_>>> {
    let mut reader = SignatureReader::new(sig);
    if reader.cursor.peek() == Some(b'<') {
        reader.type_parameters()?;
    }
    reader.events.push(SignatureEvent::Superclass);
    reader.class_type()?;
    while !reader.cursor.is_eof() {
        reader.events.push(SignatureEvent::Interface);
        reader.class_type()?;
    }
    Ok(reader.events)
}

/// Parses a method signature (`TypeParams? (Params) Return Throws*`).
pub fn parse_method_signature(sig: &str) -> Result<Vec<SignatureEvent<'_>>> {
    let mut reader = SignatureReader::new(sig);
    if reader.cursor.peek() == Some(b'<') {
        reader.type_parameters()?;
    }
    reader
        .cursor
        .expect(b'(', "expected `(` to open the parameter list")?;
    while !reader.cursor.eat(b')') {
        if reader.cursor.is_eof() {
            return Err(reader.cursor.error("unterminated parameter list"));
        }
        reader.events.push(SignatureEvent::ParameterType);
        reader.java_type_signature()?;
    }

    reader.events.push(SignatureEvent::ReturnType);
    if reader.cursor.eat(b'V') {
        reader.events.push(SignatureEvent::VoidType);
    } else {
        reader.java_type_signature()?;
    }

    while reader.cursor.eat(b'^') {
        reader.events.push(SignatureEvent::ExceptionType);
        match reader.cursor.peek() {
            Some(b'L') => reader.class_type()?,
            Some(b'T') => reader.type_variable()?,
            _ => return Err(reader.cursor.error("expected a class or type variable after `^`")),
        }
    }
    reader.cursor.finish()?;
    Ok(reader.events)
}

/// Parses a field signature (a single reference type).
pub fn parse_field_signature(sig: &str) -> Result<Vec<SignatureEvent<'_>>> {
    let mut reader = SignatureReader::new(sig);
    reader.field_type_signature()?;
    reader.cursor.finish()?;
    Ok(reader.events)
}

struct SignatureReader<'a> {
    cursor: Cursor<'a>,
    events: Vec<SignatureEvent<'a>>,
    depth: usize,
}

/// Bytes that may never appear inside an unqualified name.
const NAME_FORBIDDEN: &[u8] = b".;[/<>:";

impl<'a> SignatureReader<'a> {
    fn new(sig: &'a str) -> Self {
        Self {
            cursor: Cursor::new(sig, InputKind::Signature),
            events: Vec::new(),
            depth: 0,
        }
    }

    fn type_parameters(&mut self) -> Result<()> {
        self.cursor.expect(b'<', "expected `<`")?;
        if self.cursor.peek() == Some(b'>') {
            return Err(self.cursor.error("empty type parameter list"));
        }
        while !self.cursor.eat(b'>') {
            let name = self
                .cursor
                .name_until(b":", NAME_FORBIDDEN, "malformed type parameter name")?;
            self.events.push(SignatureEvent::FormalTypeParameter(name));
            self.cursor.expect(b':', "expected `:` after type parameter name")?;

            if matches!(self.cursor.peek(), Some(b'L' | b'T' | b'[')) {
                self.events.push(SignatureEvent::ClassBound);
                self.field_type_signature()?;
            }
            while self.cursor.eat(b':') {
                self.events.push(SignatureEvent::InterfaceBound);
                self.field_type_signature()?;
            }
        }
        Ok(())
    }

    fn java_type_signature(&mut self) -> Result<()> {
        match self.cursor.peek().and_then(BaseType::from_descriptor_char) {
            Some(base) => {
                self.cursor.bump();
                self.events.push(SignatureEvent::BaseType(base));
                Ok(())
            }
            None => self.field_type_signature(),
        }
    }

    fn field_type_signature(&mut self) -> Result<()> {
        match self.cursor.peek() {
            Some(b'L') => self.class_type(),
            Some(b'T') => self.type_variable(),
            Some(b'[') => {
                self.enter()?;
                self.cursor.bump();
                self.events.push(SignatureEvent::ArrayType);
                self.java_type_signature()?;
                self.depth -= 1;
                Ok(())
            }
            _ => Err(self.cursor.error("expected a reference type")),
        }
    }

    fn type_variable(&mut self) -> Result<()> {
        self.cursor.expect(b'T', "expected `T`")?;
        let name = self
            .cursor
            .name_until(b";", NAME_FORBIDDEN, "malformed type variable name")?;
        self.cursor.bump();
        self.events.push(SignatureEvent::TypeVariable(name));
        Ok(())
    }

    fn class_type(&mut self) -> Result<()> {
        self.cursor.expect(b'L', "expected a class type")?;
        let name = self
            .cursor
            .name_until(b"<.;", b"[>:", "malformed class name")?;
        if name.starts_with('/') || name.ends_with('/') || name.contains("//") {
            return Err(self.cursor.error("malformed class name"));
        }
        self.events.push(SignatureEvent::ClassType(name));
        if self.cursor.peek() == Some(b'<') {
            self.type_arguments()?;
        }

        while self.cursor.eat(b'.') {
            let inner = self
                .cursor
                .name_until(b"<.;", NAME_FORBIDDEN, "malformed inner class name")?;
            self.events.push(SignatureEvent::InnerClassType(inner));
            if self.cursor.peek() == Some(b'<') {
                self.type_arguments()?;
            }
        }

        self.cursor.expect(b';', "expected `;` to close class type")?;
        self.events.push(SignatureEvent::End);
        Ok(())
    }

    fn type_arguments(&mut self) -> Result<()> {
        self.enter()?;
        self.cursor.expect(b'<', "expected `<`")?;
        if self.cursor.peek() == Some(b'>') {
            return Err(self.cursor.error("empty type argument list"));
        }
        while !self.cursor.eat(b'>') {
            match self.cursor.peek() {
                Some(b'*') => {
                    self.cursor.bump();
                    self.events.push(SignatureEvent::UnboundedTypeArgument);
                }
                Some(b'+') => {
                    self.cursor.bump();
                    self.events
                        .push(SignatureEvent::TypeArgument(WildcardKind::Extends));
                    self.field_type_signature()?;
                }
                Some(b'-') => {
                    self.cursor.bump();
                    self.events
                        .push(SignatureEvent::TypeArgument(WildcardKind::Super));
                    self.field_type_signature()?;
                }
                Some(_) => {
                    self.events
                        .push(SignatureEvent::TypeArgument(WildcardKind::Exact));
                    self.field_type_signature()?;
                }
                None => return Err(self.cursor.error("unterminated type argument list")),
            }
        }
        self.depth -= 1;
        Ok(())
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.cursor.error("signature nests too deeply"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SignatureEvent::*;
    use super::{
        parse_class_signature, parse_field_signature, parse_method_signature, WildcardKind,
        MAX_NESTING,
    };
    use crate::Error;

    use pretty_assertions::assert_eq;

    #[test]
    fn class_signature_with_bounded_type_parameter() {
        let events =
            parse_class_signature("<H:Lcom/example/Handler;>Ljava/lang/Object;").unwrap();
        assert_eq!(
            events,
            vec![
                FormalTypeParameter("H"),
                ClassBound,
                ClassType("com/example/Handler"),
                End,
                Superclass,
                ClassType("java/lang/Object"),
                End,
            ]
        );
    }

    #[test]
    fn interface_only_bound_has_no_class_bound_event() {
        let events = parse_class_signature(
            "<T::Ljava/io/Serializable;:Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;Ljava/io/Serializable;",
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                FormalTypeParameter("T"),
                InterfaceBound,
                ClassType("java/io/Serializable"),
                End,
                InterfaceBound,
                ClassType("java/lang/Comparable"),
                TypeArgument(WildcardKind::Exact),
                TypeVariable("T"),
                End,
                Superclass,
                ClassType("java/lang/Object"),
                End,
                Interface,
                ClassType("java/io/Serializable"),
                End,
            ]
        );
    }

    #[test]
    fn method_signature_with_wildcards_arrays_and_throws() {
        let events = parse_method_signature(
            "<E:Ljava/lang/Exception;>([ILjava/util/List<+TE;>;Ljava/util/Map<*-Ljava/lang/String;>;)[TE;^TE;^Ljava/io/IOException;",
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                FormalTypeParameter("E"),
                ClassBound,
                ClassType("java/lang/Exception"),
                End,
                ParameterType,
                ArrayType,
                BaseType(crate::BaseType::Int),
                ParameterType,
                ClassType("java/util/List"),
                TypeArgument(WildcardKind::Extends),
                TypeVariable("E"),
                End,
                ParameterType,
                ClassType("java/util/Map"),
                UnboundedTypeArgument,
                TypeArgument(WildcardKind::Super),
                ClassType("java/lang/String"),
                End,
                End,
                ReturnType,
                ArrayType,
                TypeVariable("E"),
                ExceptionType,
                TypeVariable("E"),
                ExceptionType,
                ClassType("java/io/IOException"),
                End,
            ]
        );
    }

    #[test]
    fn void_method_without_parameters() {
        assert_eq!(
            parse_method_signature("()V").unwrap(),
            vec![ReturnType, VoidType]
        );
    }

    #[test]
    fn inner_class_segments_report_simple_names() {
        let events = parse_field_signature("Lcom/example/Outer<TT;>.Inner<TU;>;").unwrap();
        assert_eq!(
            events,
            vec![
                ClassType("com/example/Outer"),
                TypeArgument(WildcardKind::Exact),
                TypeVariable("T"),
                InnerClassType("Inner"),
                TypeArgument(WildcardKind::Exact),
                TypeVariable("U"),
                End,
            ]
        );
    }

    #[test]
    fn malformed_signatures_are_rejected() {
        for sig in [
            "",
            "<>Ljava/lang/Object;",
            "<T>Ljava/lang/Object;",
            "Ljava/lang/Object",
            "Ljava/util/List<>;",
            "Ljava/lang/Object;I",
            "<T:Ljava/lang/Object;>",
            "LObject;Q",
        ] {
            let err = parse_class_signature(sig).unwrap_err();
            assert!(
                matches!(err, Error::InvalidSignature { .. }),
                "expected invalid signature for {sig:?}, got {err:?}"
            );
        }

        assert!(parse_method_signature("(I").is_err());
        assert!(parse_method_signature("()").is_err());
        assert!(parse_method_signature("()V^I").is_err());
        assert!(parse_field_signature("I").is_err());
        assert!(parse_field_signature("TT").is_err());
    }

    #[test]
    fn deeply_nested_arrays_are_rejected() {
        let sig = format!("{}I", "[".repeat(MAX_NESTING + 1));
        let err = parse_field_signature(&sig).unwrap_err();
        assert_eq!(err.reason(), "signature nests too deeply");
    }
}
