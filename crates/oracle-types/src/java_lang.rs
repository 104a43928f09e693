use crate::registry::{ClassDecl, TypeRegistry};

const OBJECT: &str = "java.lang.Object";

impl TypeRegistry {
    /// A registry pre-populated with the handful of platform types most signatures mention.
    ///
    /// Only erased headers and type parameter names are recorded; the entries stay
    /// unresolved until a caller resolves them.
    pub fn with_java_lang() -> Self {
        let mut registry = TypeRegistry::new();
        registry.add_class(ClassDecl::class(OBJECT));
        registry.add_class(ClassDecl::interface("java.io.Serializable").extends(OBJECT));
        registry.add_class(ClassDecl::interface("java.lang.Cloneable").extends(OBJECT));
        registry.add_class(
            ClassDecl::interface("java.lang.Comparable")
                .extends(OBJECT)
                .type_params(["T"]),
        );
        registry.add_class(
            ClassDecl::interface("java.lang.Iterable")
                .extends(OBJECT)
                .type_params(["T"]),
        );
        registry.add_class(
            ClassDecl::interface("java.lang.CharSequence").extends(OBJECT),
        );
        registry.add_class(
            ClassDecl::class("java.lang.String")
                .extends(OBJECT)
                .implements([
                    "java.io.Serializable",
                    "java.lang.Comparable",
                    "java.lang.CharSequence",
                ]),
        );
        registry.add_class(
            ClassDecl::class("java.lang.Enum")
                .extends(OBJECT)
                .implements(["java.lang.Comparable", "java.io.Serializable"])
                .type_params(["E"]),
        );
        registry.add_class(
            ClassDecl::class("java.lang.Throwable")
                .extends(OBJECT)
                .implements(["java.io.Serializable"]),
        );
        registry.add_class(ClassDecl::class("java.lang.Exception").extends("java.lang.Throwable"));
        registry.add_class(
            ClassDecl::class("java.lang.RuntimeException").extends("java.lang.Exception"),
        );
        registry
    }
}
