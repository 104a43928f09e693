use std::fmt;

use crate::cursor::{Cursor, InputKind};
use crate::error::Result;

/// JVM primitive type codes shared by descriptors and signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub fn from_descriptor_char(c: u8) -> Option<Self> {
        Some(match c {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    pub fn descriptor_char(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }

    pub fn java_name(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

/// An erased field type. Class names are kept in internal form (`java/lang/String`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Base(BaseType),
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// Number of array dimensions wrapping the element type.
    pub fn dimensions(&self) -> usize {
        let mut dims = 0;
        let mut ty = self;
        while let FieldType::Array(elem) = ty {
            dims += 1;
            ty = elem;
        }
        dims
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => write!(f, "{}", base.descriptor_char()),
            FieldType::Object(name) => write!(f, "L{name};"),
            FieldType::Array(elem) => write!(f, "[{elem}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for param in &self.params {
            write!(f, "{param}")?;
        }
        f.write_str(")")?;
        match &self.return_type {
            ReturnType::Void => f.write_str("V"),
            ReturnType::Type(ty) => write!(f, "{ty}"),
        }
    }
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let mut cursor = Cursor::new(desc, InputKind::Descriptor);
    let ty = field_type(&mut cursor)?;
    cursor.finish()?;
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let mut cursor = Cursor::new(desc, InputKind::Descriptor);
    cursor.expect(b'(', "method descriptor must start with `(`")?;

    let mut params = Vec::new();
    while !cursor.eat(b')') {
        if cursor.is_eof() {
            return Err(cursor.error("unterminated parameter list"));
        }
        params.push(field_type(&mut cursor)?);
    }

    let return_type = if cursor.eat(b'V') {
        ReturnType::Void
    } else {
        ReturnType::Type(field_type(&mut cursor)?)
    };
    cursor.finish()?;

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

fn field_type(cursor: &mut Cursor<'_>) -> Result<FieldType> {
    let mut dims = 0usize;
    while cursor.eat(b'[') {
        dims += 1;
        if dims > 255 {
            return Err(cursor.error("too many array dimensions"));
        }
    }

    let Some(tag) = cursor.peek() else {
        return Err(cursor.error("expected a field type"));
    };
    let mut ty = if let Some(base) = BaseType::from_descriptor_char(tag) {
        cursor.bump();
        FieldType::Base(base)
    } else if tag == b'L' {
        cursor.bump();
        let name = cursor.name_until(b";", b".[<>", "malformed class name")?;
        cursor.expect(b';', "expected `;` after class name")?;
        FieldType::Object(name.to_string())
    } else {
        return Err(cursor.error("expected a field type"));
    };

    for _ in 0..dims {
        ty = FieldType::Array(Box::new(ty));
    }
    Ok(ty)
}
