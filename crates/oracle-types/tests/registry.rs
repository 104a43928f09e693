use oracle_classfile::{parse_field_descriptor, parse_method_descriptor};
use oracle_types::{
    ClassDecl, MethodDecl, MethodKind, ResolvedType, TypeParamOwner, TypeRegistry, TypeVarRef,
    WildcardBound,
};

use pretty_assertions::assert_eq;

#[test]
fn add_class_is_idempotent_and_never_replaces() {
    let mut registry = TypeRegistry::new();
    let first = registry.add_class(ClassDecl::class("com/example/Foo").type_params(["T"]));
    let second = registry.add_class(ClassDecl::interface("com.example.Foo"));

    assert_eq!(first, second);
    assert_eq!(registry.class_count(), 1);

    let foo = registry.class(first).unwrap();
    assert_eq!(foo.binary_name, "com.example.Foo");
    assert!(!foo.is_interface(), "second declaration must not replace the first");
    assert!(foo.is_generic());
    assert_eq!(registry.lookup("com.example.Foo"), Some(first));
    assert_eq!(registry.lookup("com/example/Foo"), None);
}

#[test]
fn enclosing_chain_is_outermost_first_and_excludes_self() {
    let mut registry = TypeRegistry::new();
    let outer = registry.add_class(ClassDecl::class("a.Outer"));
    let middle = registry.add_class(ClassDecl::class("a.Outer$Middle").enclosed_by(outer));
    let inner = registry.add_class(ClassDecl::class("a.Outer$Middle$Inner").enclosed_by(middle));

    assert_eq!(registry.enclosing_chain(inner), vec![outer, middle]);
    assert!(registry.enclosing_chain(outer).is_empty());
    assert_eq!(registry.class(inner).unwrap().simple_name(), "Inner");
}

#[test]
fn enclosing_chain_stops_on_cycles() {
    let mut registry = TypeRegistry::new();
    let a = registry.add_class(ClassDecl::class("a.A"));
    let b = registry.add_class(ClassDecl::class("a.B").enclosed_by(a));
    registry.class_mut(a).unwrap().enclosing = Some(b);

    assert_eq!(registry.enclosing_chain(b), vec![a]);
}

#[test]
fn same_named_type_params_of_different_owners_are_distinct() {
    let mut registry = TypeRegistry::new();
    let a = registry.add_class(ClassDecl::class("a.A").type_params(["T"]));
    let b = registry.add_class(ClassDecl::class("a.B").type_params(["T"]));

    let a_t = registry.class(a).unwrap().type_params[0].var_ref();
    let b_t = registry.class(b).unwrap().type_params[0].var_ref();
    assert_ne!(a_t, b_t);
    assert_eq!(a_t, TypeVarRef::new(TypeParamOwner::Class(a), 0));
    assert_eq!(registry.type_param(b_t).unwrap().name, "T");
}

#[test]
fn methods_and_fields_attach_to_their_owner() {
    let mut registry = TypeRegistry::new();
    let owner = registry.add_class(ClassDecl::class("a.Owner"));
    let ctor = registry.add_method(MethodDecl::new(
        owner,
        "<init>",
        parse_method_descriptor("()V").unwrap(),
    ));
    let run = registry.add_method(
        MethodDecl::new(owner, "run", parse_method_descriptor("(I)V").unwrap())
            .arg_names(["count"])
            .type_params(["R"]),
    );
    let field = registry.add_field(owner, "name", parse_field_descriptor("I").unwrap());

    assert_eq!(registry.method(ctor).unwrap().kind, MethodKind::Constructor);
    let run_def = registry.method(run).unwrap();
    assert_eq!(run_def.kind, MethodKind::Method);
    assert_eq!(run_def.arg_names, vec!["count".to_string()]);
    assert_eq!(
        run_def.type_params[0].var_ref(),
        TypeVarRef::new(TypeParamOwner::Method(run), 0)
    );

    let owner_def = registry.class(owner).unwrap();
    assert_eq!(owner_def.methods, vec![ctor, run]);
    assert_eq!(owner_def.fields, vec![field]);
    assert_eq!(registry.method_named(owner, "run"), Some(run));
    assert_eq!(registry.method_named(owner, "missing"), None);
}

#[test]
fn display_renders_java_like_types() {
    let mut registry = TypeRegistry::with_java_lang();
    let string = registry.lookup("java.lang.String").unwrap();
    let outer = registry.add_class(ClassDecl::class("a.Outer").type_params(["T"]));
    let inner = registry.add_class(ClassDecl::class("a.Outer$Inner").enclosed_by(outer));
    let list = registry.add_class(ClassDecl::interface("java.util.List").type_params(["E"]));

    let t = ResolvedType::TypeVariable(TypeVarRef::new(TypeParamOwner::Class(outer), 0));
    let ty = ResolvedType::parameterized(
        list,
        vec![ResolvedType::Wildcard(WildcardBound::Extends(Box::new(
            ResolvedType::array(ResolvedType::RawClass(string)),
        )))],
    );
    assert_eq!(
        registry.display(&ty).to_string(),
        "java.util.List<? extends java.lang.String[]>"
    );

    let member = ResolvedType::ParameterizedClass {
        base: inner,
        args: vec![],
        enclosing: Some(Box::new(ResolvedType::parameterized(outer, vec![t]))),
    };
    assert_eq!(registry.display(&member).to_string(), "a.Outer<T>.Inner");
    assert_eq!(registry.display(&ResolvedType::VOID).to_string(), "void");
}
