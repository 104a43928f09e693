#![no_main]

use libfuzzer_sys::fuzz_target;
use oracle_classfile::parse_method_descriptor;
use oracle_resolve::{
    resolve_class_signature, resolve_field_signature, resolve_method_signature, Diagnostic,
    ResolveOptions,
};
use oracle_types::{ClassDecl, MethodDecl, TypeRegistry};

/// Real signatures are short; larger inputs only slow the fuzzer down.
const MAX_SIGNATURE_LEN: usize = 64 * 1024;

/// The longest valid UTF-8 prefix of `data`, capped at `MAX_SIGNATURE_LEN`.
fn signature_text(data: &[u8]) -> &str {
    let data = &data[..data.len().min(MAX_SIGNATURE_LEN)];
    match std::str::from_utf8(data) {
        Ok(text) => text,
        Err(err) => std::str::from_utf8(&data[..err.valid_up_to()]).unwrap_or_default(),
    }
}

/// The low three bits of `flags` toggle the resolve options.
fn options_from(flags: u8) -> ResolveOptions {
    ResolveOptions {
        verify_erased_descriptors: flags & 1 != 0,
        resolve_referenced_classes: flags & 2 != 0,
        warn_on_type_argument_arity: flags & 4 != 0,
    }
}

/// Feeds `signature` to every parser and resolver against a small generic class.
fn exercise(signature: &str, options: &ResolveOptions) {
    let _ = oracle_classfile::parse_class_signature(signature);
    let _ = oracle_classfile::parse_method_signature(signature);
    let _ = oracle_classfile::parse_field_signature(signature);
    let _ = oracle_classfile::parse_field_descriptor(signature);
    let _ = oracle_classfile::parse_method_descriptor(signature);

    let mut registry = TypeRegistry::with_java_lang();
    let outer = registry.add_class(ClassDecl::class("a.Outer").type_params(["T"]));
    let inner = registry.add_class(ClassDecl::class("a.Outer$Inner").enclosed_by(outer));
    let Ok(descriptor) = parse_method_descriptor("(Ljava/lang/Object;)V") else {
        return;
    };
    let method = registry.add_method(MethodDecl::new(inner, "run", descriptor));
    let Ok(field_type) = oracle_classfile::parse_field_descriptor("Ljava/lang/Object;") else {
        return;
    };
    let field = registry.add_field(inner, "value", field_type);

    let mut sink: Vec<Diagnostic> = Vec::new();
    let _ = resolve_class_signature(&mut registry, &mut sink, options, inner, signature);
    let _ = resolve_method_signature(&mut registry, &mut sink, options, method, signature);
    let _ = resolve_field_signature(&mut registry, &mut sink, options, field, signature);
}

fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    exercise(signature_text(rest), &options_from(flags));
});
