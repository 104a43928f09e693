use std::collections::{HashMap, HashSet};

use oracle_classfile::{FieldType, MethodDescriptor};

use crate::format::TypeDisplay;
use crate::ty::{ClassId, FieldId, MethodId, ResolvedType, TypeParamOwner, TypeVarRef};

/// Converts an internal class name (`java/util/Map$Entry`) to its binary form
/// (`java.util.Map$Entry`).
pub fn internal_to_binary(internal: &str) -> String {
    internal.replace('/', ".")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionState {
    #[default]
    Unresolved,
    Resolving,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub index: u32,
    pub owner: TypeParamOwner,
    /// Resolved bounds in declaration order. Empty until the owner's signature is resolved;
    /// an empty list on a resolved owner means the implicit `java.lang.Object` bound.
    pub bounds: Vec<ResolvedType>,
}

impl TypeParameter {
    pub fn var_ref(&self) -> TypeVarRef {
        TypeVarRef::new(self.owner, self.index)
    }
}

fn declare_params(owner: TypeParamOwner, names: Vec<String>) -> Vec<TypeParameter> {
    names
        .into_iter()
        .enumerate()
        .map(|(index, name)| TypeParameter {
            name,
            index: index as u32,
            owner,
            bounds: Vec::new(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    pub binary_name: String,
    pub kind: ClassKind,
    /// Non-owning link to the lexically enclosing class.
    pub enclosing: Option<ClassId>,
    /// Erased superclass (binary name) as recorded in bytecode.
    pub erased_super: Option<String>,
    /// Erased interfaces (binary names) as recorded in bytecode.
    pub erased_interfaces: Vec<String>,
    pub type_params: Vec<TypeParameter>,
    pub super_class: Option<ResolvedType>,
    pub interfaces: Vec<ResolvedType>,
    pub methods: Vec<MethodId>,
    pub fields: Vec<FieldId>,
    pub state: ResolutionState,
}

impl ClassDescriptor {
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_resolved(&self) -> bool {
        self.state == ResolutionState::Resolved
    }

    /// The name after the last package or nesting separator.
    pub fn simple_name(&self) -> &str {
        let start = self
            .binary_name
            .rfind(['.', '$'])
            .map(|idx| idx + 1)
            .unwrap_or(0);
        &self.binary_name[start..]
    }

    pub fn type_param_named(&self, name: &str) -> Option<&TypeParameter> {
        self.type_params.iter().find(|tp| tp.name == name)
    }
}

/// Everything bytecode scanning knows about a class before its signature is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    binary_name: String,
    kind: ClassKind,
    enclosing: Option<ClassId>,
    super_class: Option<String>,
    interfaces: Vec<String>,
    type_params: Vec<String>,
}

impl ClassDecl {
    pub fn class(binary_name: impl Into<String>) -> Self {
        Self::new(binary_name, ClassKind::Class)
    }

    pub fn interface(binary_name: impl Into<String>) -> Self {
        Self::new(binary_name, ClassKind::Interface)
    }

    fn new(binary_name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            binary_name: internal_to_binary(&binary_name.into()),
            kind,
            enclosing: None,
            super_class: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
        }
    }

    pub fn enclosed_by(mut self, enclosing: ClassId) -> Self {
        self.enclosing = Some(enclosing);
        self
    }

    /// Erased superclass, in internal or binary form.
    pub fn extends(mut self, super_class: impl AsRef<str>) -> Self {
        self.super_class = Some(internal_to_binary(super_class.as_ref()));
        self
    }

    pub fn implements<I, S>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.interfaces
            .extend(interfaces.into_iter().map(|i| internal_to_binary(i.as_ref())));
        self
    }

    /// Type parameter names already known from bytecode; bounds are filled in by resolution.
    pub fn type_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = names.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Constructor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: ResolvedType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub owner: ClassId,
    pub name: String,
    pub kind: MethodKind,
    pub descriptor: MethodDescriptor,
    pub arg_names: Vec<String>,
    pub type_params: Vec<TypeParameter>,
    pub params: Vec<Parameter>,
    /// `None` for constructors and for methods that are not resolved yet.
    pub return_type: Option<ResolvedType>,
    pub throws: Vec<ResolvedType>,
    pub state: ResolutionState,
}

impl MethodDef {
    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    owner: ClassId,
    name: String,
    descriptor: MethodDescriptor,
    arg_names: Vec<String>,
    type_params: Vec<String>,
}

impl MethodDecl {
    pub fn new(owner: ClassId, name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        Self {
            owner,
            name: name.into(),
            descriptor,
            arg_names: Vec::new(),
            type_params: Vec::new(),
        }
    }

    pub fn arg_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arg_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn type_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = names.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub owner: ClassId,
    pub name: String,
    pub descriptor: FieldType,
    pub ty: Option<ResolvedType>,
    pub state: ResolutionState,
}

/// Process-wide symbol table for one compilation pass.
///
/// The registry is the single owner of every class, method and field declaration. Entries
/// are only ever added; a name that is already registered keeps its original descriptor so
/// that ids handed out earlier stay valid.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    classes: Vec<ClassDescriptor>,
    by_name: HashMap<String, ClassId>,
    methods: Vec<MethodDef>,
    fields: Vec<FieldDef>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class, returning the existing id if the name is already known.
    pub fn add_class(&mut self, decl: ClassDecl) -> ClassId {
        if let Some(&existing) = self.by_name.get(&decl.binary_name) {
            tracing::debug!(
                target: "oracle.types",
                class = %decl.binary_name,
                "class already registered; keeping existing descriptor"
            );
            return existing;
        }

        let id = ClassId(self.classes.len() as u32);
        self.by_name.insert(decl.binary_name.clone(), id);
        self.classes.push(ClassDescriptor {
            binary_name: decl.binary_name,
            kind: decl.kind,
            enclosing: decl.enclosing,
            erased_super: decl.super_class,
            erased_interfaces: decl.interfaces,
            type_params: declare_params(TypeParamOwner::Class(id), decl.type_params),
            super_class: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            state: ResolutionState::Unresolved,
        });
        id
    }

    pub fn lookup(&self, binary_name: &str) -> Option<ClassId> {
        self.by_name.get(binary_name).copied()
    }

    pub fn get(&self, binary_name: &str) -> Option<&ClassDescriptor> {
        self.lookup(binary_name).and_then(|id| self.class(id))
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassDescriptor> {
        self.classes.get(id.index())
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDescriptor> {
        self.classes.get_mut(id.index())
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassDescriptor)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (ClassId(idx as u32), class))
    }

    /// Binary name for diagnostics; unknown ids render as `<unknown class #n>`.
    pub fn class_name(&self, id: ClassId) -> String {
        match self.class(id) {
            Some(class) => class.binary_name.clone(),
            None => format!("<unknown class #{}>", id.0),
        }
    }

    /// Enclosing classes of `id`, outermost first, excluding `id` itself.
    ///
    /// Malformed enclosing links that loop back on themselves end the walk.
    pub fn enclosing_chain(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.class(id).and_then(|c| c.enclosing);
        while let Some(outer) = current {
            if !seen.insert(outer) {
                tracing::warn!(
                    target: "oracle.types",
                    class = %self.class_name(id),
                    "cyclic enclosing class chain"
                );
                break;
            }
            chain.push(outer);
            current = self.class(outer).and_then(|c| c.enclosing);
        }
        chain.reverse();
        chain
    }

    pub fn add_method(&mut self, decl: MethodDecl) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        let kind = if decl.name == "<init>" {
            MethodKind::Constructor
        } else {
            MethodKind::Method
        };
        self.methods.push(MethodDef {
            owner: decl.owner,
            name: decl.name,
            kind,
            descriptor: decl.descriptor,
            arg_names: decl.arg_names,
            type_params: declare_params(TypeParamOwner::Method(id), decl.type_params),
            params: Vec::new(),
            return_type: None,
            throws: Vec::new(),
            state: ResolutionState::Unresolved,
        });
        if let Some(owner) = self.class_mut(decl.owner) {
            owner.methods.push(id);
        }
        id
    }

    pub fn method(&self, id: MethodId) -> Option<&MethodDef> {
        self.methods.get(id.index())
    }

    pub fn method_mut(&mut self, id: MethodId) -> Option<&mut MethodDef> {
        self.methods.get_mut(id.index())
    }

    /// Finds a method of `owner` by name; the first declaration wins for overloads.
    pub fn method_named(&self, owner: ClassId, name: &str) -> Option<MethodId> {
        self.class(owner)?
            .methods
            .iter()
            .copied()
            .find(|&id| self.method(id).is_some_and(|m| m.name == name))
    }

    pub fn add_field(
        &mut self,
        owner: ClassId,
        name: impl Into<String>,
        descriptor: FieldType,
    ) -> FieldId {
        let id = FieldId(self.fields.len() as u32);
        self.fields.push(FieldDef {
            owner,
            name: name.into(),
            descriptor,
            ty: None,
            state: ResolutionState::Unresolved,
        });
        if let Some(owner) = self.class_mut(owner) {
            owner.fields.push(id);
        }
        id
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldDef> {
        self.fields.get(id.index())
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut FieldDef> {
        self.fields.get_mut(id.index())
    }

    pub fn type_param(&self, var: TypeVarRef) -> Option<&TypeParameter> {
        let params = match var.owner {
            TypeParamOwner::Class(id) => &self.class(id)?.type_params,
            TypeParamOwner::Method(id) => &self.method(id)?.type_params,
        };
        params.get(var.index as usize)
    }

    /// Human-readable rendering of `ty` for diagnostics.
    pub fn display<'a>(&'a self, ty: &'a ResolvedType) -> TypeDisplay<'a> {
        TypeDisplay::new(self, ty)
    }
}
