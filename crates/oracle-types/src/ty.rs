use oracle_classfile::BaseType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub(crate) u32);

impl MethodId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub(crate) u32);

impl FieldId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The declaration a type parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeParamOwner {
    Class(ClassId),
    Method(MethodId),
}

/// Identity of a declared type parameter: its owner plus its declaration index.
///
/// Two owners declaring a parameter with the same name always produce distinct refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeVarRef {
    pub owner: TypeParamOwner,
    pub index: u32,
}

impl TypeVarRef {
    pub fn new(owner: TypeParamOwner, index: u32) -> Self {
        Self { owner, index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub fn java_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }
}

impl From<BaseType> for PrimitiveType {
    fn from(base: BaseType) -> Self {
        match base {
            BaseType::Byte => PrimitiveType::Byte,
            BaseType::Char => PrimitiveType::Char,
            BaseType::Double => PrimitiveType::Double,
            BaseType::Float => PrimitiveType::Float,
            BaseType::Int => PrimitiveType::Int,
            BaseType::Long => PrimitiveType::Long,
            BaseType::Short => PrimitiveType::Short,
            BaseType::Boolean => PrimitiveType::Boolean,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<ResolvedType>),
    Super(Box<ResolvedType>),
}

/// A fully resolved reference to a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    Primitive(PrimitiveType),
    /// A class used without type arguments (a non-generic class, or a raw use of a generic one).
    RawClass(ClassId),
    ParameterizedClass {
        base: ClassId,
        args: Vec<ResolvedType>,
        /// Parameterized outer type for member classes written as `Outer<T>.Inner<U>`.
        enclosing: Option<Box<ResolvedType>>,
    },
    TypeVariable(TypeVarRef),
    Array(Box<ResolvedType>),
    Wildcard(WildcardBound),
}

impl ResolvedType {
    pub const VOID: ResolvedType = ResolvedType::Primitive(PrimitiveType::Void);

    pub fn parameterized(base: ClassId, args: Vec<ResolvedType>) -> Self {
        ResolvedType::ParameterizedClass {
            base,
            args,
            enclosing: None,
        }
    }

    pub fn array(element: ResolvedType) -> Self {
        ResolvedType::Array(Box::new(element))
    }

    /// The class a class type refers to, ignoring type arguments.
    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            ResolvedType::RawClass(id) => Some(*id),
            ResolvedType::ParameterizedClass { base, .. } => Some(*base),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ResolvedType::Primitive(PrimitiveType::Void))
    }
}
