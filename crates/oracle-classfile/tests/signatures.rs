use oracle_classfile::SignatureEvent::*;
use oracle_classfile::{
    parse_class_signature, parse_field_descriptor, parse_field_signature,
    parse_method_signature, Error, WildcardKind, MAX_NESTING,
};

use pretty_assertions::assert_eq;

#[test]
fn forward_referenced_type_parameters_are_reported_as_written() {
    let events =
        parse_class_signature("<A:TB;B:Ljava/lang/Object;>Lcom/example/asm/Outer0<TA;>;")
            .unwrap();
    assert_eq!(
        events,
        vec![
            FormalTypeParameter("A"),
            ClassBound,
            TypeVariable("B"),
            FormalTypeParameter("B"),
            ClassBound,
            ClassType("java/lang/Object"),
            End,
            Superclass,
            ClassType("com/example/asm/Outer0"),
            TypeArgument(WildcardKind::Exact),
            TypeVariable("A"),
            End,
        ]
    );
}

#[test]
fn parameterized_superclass_nests_type_arguments() {
    let events = parse_class_signature(
        "<V:Ljava/lang/Object;>Lcom/example/asm/Outer0<Lcom/example/asm/Handler1<TV;>;>;Ljava/io/Serializable;",
    )
    .unwrap();
    assert_eq!(
        events,
        vec![
            FormalTypeParameter("V"),
            ClassBound,
            ClassType("java/lang/Object"),
            End,
            Superclass,
            ClassType("com/example/asm/Outer0"),
            TypeArgument(WildcardKind::Exact),
            ClassType("com/example/asm/Handler1"),
            TypeArgument(WildcardKind::Exact),
            TypeVariable("V"),
            End,
            End,
            Interface,
            ClassType("java/io/Serializable"),
            End,
        ]
    );
}

#[test]
fn errors_name_the_input_offset_and_reason() {
    let err = parse_class_signature("Ljava/lang/Object").unwrap_err();
    assert_eq!(err.offset(), 17);
    assert_eq!(
        err.to_string(),
        "invalid signature `Ljava/lang/Object` at offset 17: malformed class name"
    );

    let err = parse_method_signature("()V^I").unwrap_err();
    assert_eq!(err.offset(), 4);
    assert_eq!(err.reason(), "expected a class or type variable after `^`");

    let err = parse_field_descriptor("[Q").unwrap_err();
    assert!(matches!(err, Error::InvalidDescriptor { offset: 1, .. }));
}

#[test]
fn nesting_up_to_the_limit_is_accepted() {
    let sig = format!("{}I", "[".repeat(MAX_NESTING));
    let events = parse_field_signature(&sig).unwrap();
    assert_eq!(events.len(), MAX_NESTING + 1);
    assert_eq!(events.last(), Some(&BaseType(oracle_classfile::BaseType::Int)));
    assert!(events[..MAX_NESTING].iter().all(|e| *e == ArrayType));
}

#[test]
fn event_labels_are_stable() {
    assert_eq!(FormalTypeParameter("T").label(), "formal type parameter");
    assert_eq!(TypeArgument(WildcardKind::Super).label(), "type argument");
    assert_eq!(UnboundedTypeArgument.label(), "unbounded type argument");
    assert_eq!(End.label(), "end of class type");
}

#[test]
fn field_descriptors_print_back_in_descriptor_form() {
    let ty = parse_field_descriptor("[[Ljava/util/Map;").unwrap();
    assert_eq!(ty.dimensions(), 2);
    assert_eq!(ty.to_string(), "[[Ljava/util/Map;");
}
