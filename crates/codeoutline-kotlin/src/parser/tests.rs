use super::{parse_source, ParseOptions};
use crate::ast::{AccessorKind, Decl, DeclKind, FunctionBody, KotlinFile};
use crate::rules::RuleSet;
use codeoutline_parser_api::{Binding, ErrorCategory, Modifier, ParseError};

fn parse(source: &str) -> (KotlinFile, Vec<ParseError>) {
    parse_source(source, &RuleSet::default(), ParseOptions::default())
}

fn parse_ok(source: &str) -> KotlinFile {
    let (file, errors) = parse(source);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    file
}

fn function(decl: &Decl) -> &crate::ast::FunctionDecl {
    match &decl.kind {
        DeclKind::Function(f) => f,
        other => panic!("expected function, got {other:?}"),
    }
}

fn property(decl: &Decl) -> &crate::ast::PropertyDecl {
    match &decl.kind {
        DeclKind::Property(p) => p,
        other => panic!("expected property, got {other:?}"),
    }
}

#[test]
fn test_class_header() {
    let source = "open class Repository<T : Any>(private val store: Store, var size: Int = 0) : Base(store), Closeable {\n    fun close() {}\n}";
    let file = parse_ok(source);
    assert_eq!(file.declarations.len(), 1);

    let class = &file.declarations[0];
    assert_eq!(class.name, "Repository");
    assert_eq!(class.modifiers, vec![Modifier::Open]);
    assert_eq!(class.type_params[0].name, "T");
    assert_eq!(class.type_params[0].bound.as_deref(), Some("Any"));

    let body = class.class_body().unwrap();
    let params = &body.primary_constructor.as_ref().unwrap().params;
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].parameter.name, "store");
    assert_eq!(params[0].binding(), Some(Binding::Val));
    assert_eq!(params[0].modifiers, vec![Modifier::Private]);
    assert_eq!(params[1].parameter.default_value.as_deref(), Some("0"));

    assert_eq!(body.supertypes.len(), 2);
    assert_eq!(body.supertypes[0].type_text, "Base");
    assert!(body.supertypes[0].constructor_call);
    assert!(!body.supertypes[1].constructor_call);

    assert_eq!(class.members().len(), 1);
    assert_eq!(&source[class.span.start..class.span.end], source);
}

#[test]
fn test_class_kinds() {
    let file = parse_ok(
        "data class Point(val x: Int, val y: Int)\ninterface Shape\nenum class Color { RED }\nobject Registry",
    );
    let kinds: Vec<_> = file
        .declarations
        .iter()
        .map(|d| d.symbol_kind().to_string())
        .collect();
    assert_eq!(kinds, vec!["data_class", "interface", "enum", "object"]);
}

#[test]
fn test_private_constructor() {
    let file = parse_ok("class Token private constructor(val value: String) {}");
    let ctor = file.declarations[0]
        .class_body()
        .unwrap()
        .primary_constructor
        .clone()
        .unwrap();
    assert_eq!(ctor.modifiers, vec![Modifier::Private]);
    assert_eq!(ctor.params[0].parameter.name, "value");
}

#[test]
fn test_enum_entries_and_members() {
    let source = r#"enum class Planet(val mass: Double) {
    MERCURY(3.3e23),
    VENUS(4.8e24) {
        override fun describe() = "hot"
    },
    @Deprecated("gone") PLUTO(1.3e22);

    open fun describe(): String = name
}"#;
    let file = parse_ok(source);
    let body = file.declarations[0].class_body().unwrap();
    let names: Vec<_> = body.enum_entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["MERCURY", "VENUS", "PLUTO"]);
    assert!(body.enum_entries[1].body.is_some());
    assert_eq!(body.enum_entries[2].annotations[0].name, "Deprecated");
    assert_eq!(body.members.len(), 1);
    assert_eq!(body.members[0].name, "describe");
}

#[test]
fn test_companion_objects() {
    let file = parse_ok(
        "class A {\n    companion object {\n        const val MAX = 10\n    }\n}\nclass B {\n    companion object Factory : Creator<B>\n}",
    );
    let a = &file.declarations[0].members()[0];
    assert_eq!(a.name, "Companion");
    assert!(matches!(a.kind, DeclKind::Object { is_companion: true, .. }));
    assert_eq!(a.members()[0].modifiers, vec![Modifier::Const]);

    let b = &file.declarations[1].members()[0];
    assert_eq!(b.name, "Factory");
    assert_eq!(b.class_body().unwrap().supertypes[0].type_text, "Creator<B>");
}

#[test]
fn test_extension_receivers() {
    let file = parse_ok(
        "fun String.addPrefix(prefix: String): String = prefix + this\n\
         fun <T> List<T>.second(): T? = getOrNull(1)\n\
         fun String?.orBlank(): String = this ?: \"\"\n\
         fun ((Int) -> Unit).invokeTwice() {}\n\
         class Ext {\n    fun Int.double() = this * 2\n}",
    );
    let receivers: Vec<_> = file
        .walk()
        .into_iter()
        .filter(|d| matches!(d.kind, DeclKind::Function(_)))
        .map(|d| (d.name.as_str(), function(d).receiver.clone()))
        .collect();
    assert_eq!(
        receivers,
        vec![
            ("addPrefix", Some("String".to_string())),
            ("second", Some("List<T>".to_string())),
            ("orBlank", Some("String?".to_string())),
            ("invokeTwice", Some("((Int) -> Unit)".to_string())),
            ("double", Some("Int".to_string())),
        ]
    );

    let second = &file.declarations[1];
    assert_eq!(second.type_params[0].name, "T");
    assert_eq!(function(second).return_type.as_deref(), Some("T?"));
}

#[test]
fn test_function_bodies() {
    let file = parse_ok(
        "interface Api {\n    fun fetch(id: Long): String\n    fun ping() = true\n    fun run() { call() }\n}",
    );
    let members = file.declarations[0].members();
    assert_eq!(function(&members[0]).body, FunctionBody::None);
    assert!(matches!(function(&members[1]).body, FunctionBody::Expression(_)));
    assert!(matches!(function(&members[2]).body, FunctionBody::Block(_)));

    let params = &function(&members[0]).params;
    assert_eq!(params[0].name, "id");
    assert_eq!(params[0].type_annotation.as_deref(), Some("Long"));
}

#[test]
fn test_expression_body_spans_lines() {
    let file = parse_ok("fun total() =\n    items\n        .sumOf { it.price }\nval after = 1");
    assert_eq!(file.declarations.len(), 2);
    assert_eq!(file.declarations[1].name, "after");
}

#[test]
fn test_function_parameters() {
    let file = parse_ok(
        "inline fun <reified T> log(vararg values: T, crossinline sink: (T) -> Unit = {}, sep: String = \", \") {}",
    );
    let decl = &file.declarations[0];
    assert_eq!(decl.type_params[0].modifiers, vec!["reified"]);

    let params = &function(decl).params;
    assert_eq!(params.len(), 3);
    assert!(params[0].is_variadic);
    assert_eq!(params[1].type_annotation.as_deref(), Some("(T) -> Unit"));
    assert_eq!(params[1].default_value.as_deref(), Some("{}"));
    assert_eq!(params[2].default_value.as_deref(), Some("\", \""));
}

#[test]
fn test_where_clause() {
    let file = parse_ok("fun <T> copy(src: T): T where T : Cloneable, T : Comparable<T> = src");
    assert_eq!(
        file.declarations[0].type_params[0].bound.as_deref(),
        Some("Cloneable & Comparable<T>")
    );
}

#[test]
fn test_properties() {
    let file = parse_ok(
        "class Counter {\n    var count: Int = 0\n        private set\n    val isEmpty: Boolean\n        get() = count == 0\n    val cache by lazy { mutableMapOf<String, Int>() }\n    lateinit var name: String\n    val String.shout get() = uppercase()\n}",
    );
    let members = file.declarations[0].members();
    assert_eq!(members.len(), 5);

    let count = &members[0];
    assert_eq!(property(count).binding, Binding::Var);
    assert_eq!(property(count).type_text.as_deref(), Some("Int"));
    assert!(count.modifiers.contains(&Modifier::PrivateSet));
    assert_eq!(property(count).accessors[0].kind, AccessorKind::Set);
    assert!(!property(count).has_custom_accessor());

    assert!(property(&members[1]).has_custom_accessor());
    assert!(property(&members[2]).delegate.is_some());
    assert!(members[3].modifiers.contains(&Modifier::Lateinit));
    assert_eq!(property(&members[4]).receiver.as_deref(), Some("String"));
}

#[test]
fn test_accessor_with_setter_body() {
    let file = parse_ok(
        "var title: String = \"\"\n    get() = field.trim()\n    set(value) {\n        field = value\n    }\nfun next() {}",
    );
    assert_eq!(file.declarations.len(), 2);
    let accessors = &property(&file.declarations[0]).accessors;
    assert_eq!(accessors.len(), 2);
    assert!(accessors.iter().all(|a| a.has_body));
}

#[test]
fn test_secondary_constructor_and_init() {
    let file = parse_ok(
        "class View(val id: Int) {\n    init { check(id > 0) }\n    constructor(name: String) : this(name.length) {\n        log(name)\n    }\n}",
    );
    let members = file.declarations[0].members();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "constructor");
    match &members[0].kind {
        DeclKind::Constructor(ctor) => {
            assert_eq!(ctor.params[0].name, "name");
            assert_eq!(ctor.delegation.as_deref(), Some("this(name.length)"));
            assert!(ctor.body.is_some());
        }
        other => panic!("expected constructor, got {other:?}"),
    }
}

#[test]
fn test_file_header() {
    let file = parse_ok(
        "@file:JvmName(\"Utils\")\npackage com.example.util\n\nimport kotlin.math.*\nimport java.util.List as JList\nimport com.example.Model\n\nfun helper() {}",
    );
    let header = &file.header;
    assert_eq!(header.package.as_deref(), Some("com.example.util"));
    assert_eq!(header.annotations[0].name, "JvmName");
    assert_eq!(header.annotations[0].target.as_deref(), Some("file"));
    assert_eq!(header.imports.len(), 3);
    assert!(header.imports[0].is_wildcard);
    assert_eq!(header.imports[1].alias.as_deref(), Some("JList"));
    assert_eq!(header.imports[2].path, "com.example.Model");
    assert_eq!(file.declarations.len(), 1);
}

#[test]
fn test_annotations_and_doc() {
    let file = parse_ok(
        "// unrelated note\n\n/**\n * A test class.\n */\n@Serializable\n@Suppress(\"unused\")\nclass TestClass<T>",
    );
    let class = &file.declarations[0];
    assert_eq!(class.doc.as_deref(), Some("A test class."));
    assert_eq!(class.annotations.len(), 2);
    assert_eq!(class.annotations[1].arguments.as_deref(), Some("\"unused\""));
}

#[test]
fn test_line_comments_attach_only_when_enabled() {
    let source = "// Adds two numbers\nfun add(a: Int, b: Int) = a + b";

    let (file, _) = parse(source);
    assert_eq!(file.declarations[0].doc, None);

    let options = ParseOptions {
        include_docs: true,
        attach_line_comments: true,
    };
    let (file, _) = parse_source(source, &RuleSet::default(), options);
    assert_eq!(file.declarations[0].doc.as_deref(), Some("Adds two numbers"));
}

#[test]
fn test_docs_disabled() {
    let options = ParseOptions {
        include_docs: false,
        attach_line_comments: false,
    };
    let (file, _) = parse_source("/** Doc */\nfun f() {}", &RuleSet::default(), options);
    assert_eq!(file.declarations[0].doc, None);
}

#[test]
fn test_nested_declarations() {
    let file = parse_ok(
        "class Outer {\n    class Middle {\n        class Inner {\n            fun deep() {}\n        }\n    }\n}",
    );
    let names: Vec<_> = file.walk().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Outer", "Middle", "Inner", "deep"]);
}

#[test]
fn test_soft_keywords_as_names() {
    let file = parse_ok("val data = 1\nfun get(value: Int, field: String) {}\nclass Set(val open: Boolean)");
    let names: Vec<_> = file.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["data", "get", "Set"]);
}

#[test]
fn test_unterminated_class_body() {
    let (file, errors) = parse("fun first() {}\nclass Broken {\n    fun inside() {}\n");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ParseError::UnterminatedBlock { .. })));

    assert_eq!(file.declarations[0].name, "first");
    assert!(!file.declarations[0].partial);
    let broken = &file.declarations[1];
    assert!(broken.partial);
    assert_eq!(broken.members()[0].name, "inside");
}

#[test]
fn test_unbalanced_brace() {
    let (file, errors) = parse("fun a() {}\n}\nfun b() {}");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ParseError::UnbalancedBrace { .. }));
    assert_eq!(file.declarations.len(), 2);
}

#[test]
fn test_recovery_at_next_declaration() {
    let (file, errors) = parse("class A {\n    fun broken(: Int) {}\n    fun ok() {}\n}\nfun after() {}");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ParseError::UnexpectedToken { .. }));

    let names: Vec<_> = file.walk().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["A", "broken", "ok", "after"]);
    assert!(file.declarations[0].members()[0].partial);
    assert!(!file.declarations[0].members()[1].partial);
}

#[test]
fn test_lex_errors_do_not_stop_parsing() {
    let (file, errors) = parse("val a = 1 # 2\nval b = 2 $ 3\nfun f() {}");
    let lex: Vec<_> = errors
        .iter()
        .filter(|e| e.category() == ErrorCategory::Lex)
        .collect();
    assert_eq!(lex.len(), 2);
    assert_eq!(file.declarations.len(), 3);
}

#[test]
fn test_unterminated_string() {
    let (file, errors) = parse("val s = \"open\nfun f() {}");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ParseError::UnterminatedBlock { what, .. } if what == "string literal")));
    assert_eq!(file.declarations.len(), 2);
}

#[test]
fn test_modifier_warnings() {
    let (file, errors) = parse(
        "private public fun f() {}\ndata abstract class D(val x: Int)\nconst var c = 1\nval v = 1\n    private set",
    );
    assert_eq!(file.declarations.len(), 4);
    assert_eq!(errors.len(), 4);
    assert!(errors.iter().all(|e| e.is_warning()));
}

#[test]
fn test_errors_sorted_by_position() {
    let (_, errors) = parse("val a = 1 # 2\nfun (\nval b = 2 # 3");
    let starts: Vec<_> = errors.iter().filter_map(|e| e.range()).map(|r| r.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[test]
fn test_initializer_with_explicit_type_arguments() {
    let file = parse_ok(
        "class Cache {\n    private val m = mutableMapOf<String, Int>()\n    fun size() = m.size\n}",
    );
    let members = file.declarations[0].members();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].name, "m");
    assert!(property(&members[0]).initializer.is_some());
    assert_eq!(members[1].name, "size");
    assert!(members.iter().all(|m| !m.partial));
}

#[test]
fn test_default_value_with_explicit_type_arguments() {
    let file = parse_ok("fun f(m: Map<String, Int> = emptyMap<String, Int>(), n: Int = 1) {}");
    let f = &file.declarations[0];
    assert!(!f.partial);
    let params = &function(f).params;
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].default_value.as_deref(), Some("emptyMap<String, Int>()"));
    assert_eq!(params[1].name, "n");
    assert_eq!(params[1].default_value.as_deref(), Some("1"));
}

#[test]
fn test_constructor_call_with_explicit_type_arguments() {
    let file = parse_ok("fun p() = Pair<String, Int>(\"a\", 1)\nfun q() {}");
    let names: Vec<_> = file.walk().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["p", "q"]);
    assert!(matches!(function(&file.declarations[0]).body, FunctionBody::Expression(_)));
}

#[test]
fn test_cast_to_generic_type() {
    let file = parse_ok("val y = x as Map<String, Int>\nval z = y as? List<Pair<A, B>>?\nfun g() {}");
    let names: Vec<_> = file.walk().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["y", "z", "g"]);
    assert!(file.declarations.iter().all(|d| !d.partial));
}

#[test]
fn test_less_than_comparison_in_initializer() {
    let file = parse_ok("val b = a < c\nval d = if (a < b) 1 else 2\nfun h() {}");
    let names: Vec<_> = file.walk().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["b", "d", "h"]);
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 2000;
    let source = format!("{}{}", "class A {\n".repeat(depth), "}\n".repeat(depth));
    let (file, errors) = parse(&source);
    assert!(errors.is_empty());
    assert_eq!(file.walk().len(), depth);
}

#[test]
fn test_empty_input() {
    let (file, errors) = parse("");
    assert!(file.declarations.is_empty());
    assert!(errors.is_empty());
}
