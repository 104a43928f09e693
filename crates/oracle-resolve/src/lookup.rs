use std::collections::HashMap;

use oracle_types::{ClassId, TypeParamOwner, TypeParameter, TypeRegistry, TypeVarRef};

#[derive(Debug, Clone)]
struct Scope {
    owner: TypeParamOwner,
    names: HashMap<String, u32>,
}

/// Stack of type-parameter scopes, innermost last.
///
/// Names resolve innermost first, so a method's `<T>` shadows its class's `<T>`.
#[derive(Debug, Clone, Default)]
pub struct TypeParameterLookup {
    scopes: Vec<Scope>,
}

impl TypeParameterLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the scopes of every generic class enclosing `class`, outermost first.
    /// `class` itself is not pushed.
    pub fn push_enclosing_scopes(&mut self, registry: &TypeRegistry, class: ClassId) {
        for outer in registry.enclosing_chain(class) {
            self.push_class_scope(registry, outer);
        }
    }

    /// Enclosing scopes followed by the class's own scope.
    pub fn push_class_scopes(&mut self, registry: &TypeRegistry, class: ClassId) {
        self.push_enclosing_scopes(registry, class);
        self.push_class_scope(registry, class);
    }

    fn push_class_scope(&mut self, registry: &TypeRegistry, class: ClassId) {
        if let Some(descriptor) = registry.class(class) {
            if descriptor.is_generic() {
                self.push_type_params(&descriptor.type_params);
            }
        }
    }

    /// Pushes one scope whose names are indexed by position.
    pub fn push_scope<I, S>(&mut self, owner: TypeParamOwner, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut scope = Scope {
            owner,
            names: HashMap::new(),
        };
        for (index, name) in names.into_iter().enumerate() {
            scope.names.entry(name.into()).or_insert(index as u32);
        }
        self.scopes.push(scope);
    }

    pub fn push_type_params(&mut self, params: &[TypeParameter]) {
        let Some(first) = params.first() else {
            return;
        };
        let mut scope = Scope {
            owner: first.owner,
            names: HashMap::new(),
        };
        for param in params {
            scope.names.entry(param.name.clone()).or_insert(param.index);
        }
        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn resolve(&self, name: &str) -> Option<TypeVarRef> {
        self.scopes.iter().rev().find_map(|scope| {
            scope
                .names
                .get(name)
                .map(|&index| TypeVarRef::new(scope.owner, index))
        })
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
