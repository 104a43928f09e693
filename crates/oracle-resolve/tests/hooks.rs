use std::collections::HashMap;

use oracle_resolve::{
    resolve_class, resolve_class_signature, Diagnostic, DiagnosticSink, ResolveOptions, Resolver,
    Severity,
};
use oracle_types::{ClassDecl, ClassId, ResolutionState, ResolvedType, TypeRegistry};

use pretty_assertions::assert_eq;

/// Resolves classes on demand from a table of signatures, recording every request.
struct ClassPool {
    registry: TypeRegistry,
    signatures: HashMap<ClassId, String>,
    requested: Vec<ClassId>,
    options: ResolveOptions,
}

impl ClassPool {
    fn new(registry: TypeRegistry) -> Self {
        Self {
            registry,
            signatures: HashMap::new(),
            requested: Vec::new(),
            options: ResolveOptions::default(),
        }
    }

    fn add(&mut self, decl: ClassDecl, signature: Option<&str>) -> ClassId {
        let id = self.registry.add_class(decl);
        if let Some(signature) = signature {
            self.signatures.insert(id, signature.to_string());
        }
        id
    }
}

impl Resolver for ClassPool {
    fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    fn resolve_class(&mut self, class: ClassId, sink: &mut dyn DiagnosticSink) -> bool {
        self.requested.push(class);
        let signature = self.signatures.get(&class).cloned();
        let options = self.options;
        resolve_class(self, sink, &options, class, signature.as_deref()).is_ok()
    }
}

fn pool() -> (ClassPool, ClassId, ClassId, ClassId) {
    let mut pool = ClassPool::new(TypeRegistry::with_java_lang());
    pool.add(
        ClassDecl::interface("com/example/asm/TestHandler").extends("java/lang/Object"),
        None,
    );
    pool.add(
        ClassDecl::interface("com/example/asm/TestHandler1")
            .extends("java/lang/Object")
            .implements(["com/example/asm/TestHandler"]),
        Some("<V:Ljava/lang/Object;>Ljava/lang/Object;Lcom/example/asm/TestHandler;"),
    );
    let outer0 = pool.add(
        ClassDecl::class("com/example/asm/TestOuter0").extends("java/lang/Object"),
        Some("<H:Lcom/example/asm/TestHandler;>Ljava/lang/Object;"),
    );
    let outer1 = pool.add(
        ClassDecl::class("com/example/asm/TestOuter1").extends("com/example/asm/TestOuter0"),
        Some("<V:Ljava/lang/Object;>Lcom/example/asm/TestOuter0<Lcom/example/asm/TestHandler1<TV;>;>;"),
    );
    let outer2 = pool.add(
        ClassDecl::class("com/example/asm/TestOuter2").extends("com/example/asm/TestOuter1"),
        None,
    );
    (pool, outer0, outer1, outer2)
}

#[test]
fn referenced_classes_are_resolved_on_demand() {
    let (mut pool, outer0, outer1, outer2) = pool();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let options = ResolveOptions::default();
    resolve_class_signature(
        &mut pool,
        &mut sink,
        &options,
        outer2,
        "Lcom/example/asm/TestOuter1<Ljava/lang/String;>;",
    )
    .unwrap();
    assert!(sink.is_empty(), "{sink:?}");

    for class in [outer0, outer1, outer2] {
        assert!(pool.registry.class(class).unwrap().is_resolved());
    }
    assert!(pool.requested.contains(&outer1));
    assert!(pool.requested.contains(&outer0));
    assert!(!pool.requested.contains(&outer2));

    // Arity of TestOuter1 was known by the time its type argument was checked.
    let string = pool.registry.lookup("java.lang.String").unwrap();
    assert_eq!(
        pool.registry.class(outer2).unwrap().super_class,
        Some(ResolvedType::parameterized(
            outer1,
            vec![ResolvedType::RawClass(string)]
        ))
    );
}

#[test]
fn mutually_referencing_classes_do_not_reenter() {
    let mut pool = ClassPool::new(TypeRegistry::with_java_lang());
    let a = pool.add(
        ClassDecl::class("a.A")
            .extends("java.lang.Object")
            .implements(["java.lang.Comparable"]),
        Some("Ljava/lang/Object;Ljava/lang/Comparable<La/B;>;"),
    );
    let b = pool.add(
        ClassDecl::class("a.B")
            .extends("java.lang.Object")
            .implements(["java.lang.Comparable"]),
        Some("Ljava/lang/Object;Ljava/lang/Comparable<La/A;>;"),
    );

    let mut sink: Vec<Diagnostic> = Vec::new();
    let options = ResolveOptions::default();
    resolve_class_signature(
        &mut pool,
        &mut sink,
        &options,
        a,
        "Ljava/lang/Object;Ljava/lang/Comparable<La/B;>;",
    )
    .unwrap();

    assert!(sink.is_empty(), "{sink:?}");
    assert_eq!(pool.requested.iter().filter(|&&id| id == b).count(), 1);
    assert!(!pool.requested.contains(&a));
    assert_eq!(
        pool.registry.class(a).unwrap().state,
        ResolutionState::Resolved
    );
    assert_eq!(
        pool.registry.class(b).unwrap().state,
        ResolutionState::Resolved
    );
}

#[test]
fn failed_hook_is_a_warning() {
    struct Refusing(TypeRegistry);

    impl Resolver for Refusing {
        fn registry(&self) -> &TypeRegistry {
            &self.0
        }

        fn registry_mut(&mut self) -> &mut TypeRegistry {
            &mut self.0
        }

        fn resolve_class(&mut self, _class: ClassId, _sink: &mut dyn DiagnosticSink) -> bool {
            false
        }
    }

    let mut registry = TypeRegistry::new();
    let object = registry.add_class(ClassDecl::class("java.lang.Object"));
    let child = registry.add_class(ClassDecl::class("a.Child").extends("java.lang.Object"));
    let mut resolver = Refusing(registry);

    let mut sink: Vec<Diagnostic> = Vec::new();
    resolve_class_signature(
        &mut resolver,
        &mut sink,
        &ResolveOptions::default(),
        child,
        "Ljava/lang/Object;",
    )
    .unwrap();

    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].severity, Severity::Warning);
    assert_eq!(sink[0].code, "unresolved-class");
    assert_eq!(
        resolver.0.class(child).unwrap().super_class,
        Some(ResolvedType::RawClass(object))
    );

    let quiet = ResolveOptions {
        resolve_referenced_classes: false,
        ..ResolveOptions::default()
    };
    let other = resolver
        .0
        .add_class(ClassDecl::class("a.Other").extends("java.lang.Object"));
    let mut sink: Vec<Diagnostic> = Vec::new();
    resolve_class_signature(&mut resolver, &mut sink, &quiet, other, "Ljava/lang/Object;")
        .unwrap();
    assert!(sink.is_empty());
}
