//! Integration tests for Kotlin parser

use codeoutline_kotlin::rules::{DeclarationRule, RuleContext, RuleKind, RuleOutput};
use codeoutline_kotlin::{
    KotlinParser, OutlineParser, ParseError, ParserConfig, SourceFile, Symbol, SymbolKind,
    SymbolOutline,
};
use codeoutline_parser_api::{ErrorCategory, Modifier};

const SAMPLE_APP: &str = include_str!("fixtures/sample_app.kt");
const TEST_CLASS: &str = include_str!("fixtures/TestClass.kt");
const EXTENSIONS: &str = include_str!("fixtures/ExtensionFunction.kt");
const MALFORMED: &str = include_str!("fixtures/Malformed.kt");

fn outline(source: &str, file_id: &str) -> SymbolOutline {
    let (outline, errors) = codeoutline_kotlin::parse(source, file_id);
    assert!(errors.is_empty(), "unexpected errors in {}: {:?}", file_id, errors);
    outline
}

fn symbol<'a>(outline: &'a SymbolOutline, path: &str) -> &'a Symbol {
    outline
        .get(path)
        .unwrap_or_else(|| panic!("missing symbol {}", path))
}

const DECL_KEYWORDS: &[&str] = &[
    "class",
    "interface",
    "object",
    "fun",
    "val",
    "var",
    "typealias",
    "constructor",
];

/// Every range starts at the declaration's prefix and nests inside its parent
fn assert_ranges(source: &str, outline: &SymbolOutline) {
    for symbol in outline.iter() {
        let text = symbol
            .range
            .slice(source)
            .unwrap_or_else(|| panic!("range of {} out of bounds", symbol.path));
        let first_word: String = text
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();

        let starts_well = text.starts_with('@')
            || DECL_KEYWORDS.contains(&first_word.as_str())
            || !matches!(Modifier::from_keyword(&first_word), Modifier::Other(_))
            || (symbol.kind == SymbolKind::EnumConstant && first_word == symbol.name);
        assert!(starts_well, "{} starts with {:?}", symbol.path, text);

        if let Some(parent) = symbol.parent.as_deref() {
            let parent = outline.get(parent).unwrap();
            assert!(
                parent.range.contains(&symbol.range),
                "{} escapes {}",
                symbol.path,
                parent.path
            );
        }
    }

    for parent in outline.iter() {
        let children: Vec<_> = outline.children(&parent.path).collect();
        for pair in children.windows(2) {
            assert!(
                !pair[0].range.overlaps(&pair[1].range),
                "{} overlaps {}",
                pair[0].path,
                pair[1].path
            );
        }
    }
}

#[test]
fn test_parse_sample_app_symbols() {
    let outline = outline(SAMPLE_APP, "sample_app.kt");

    assert_eq!(outline.len(), 49, "{:#?}", outline.iter().map(|s| &s.path).collect::<Vec<_>>());
    assert_eq!(outline.package.as_deref(), Some("com.example.app"));
    assert_eq!(outline.file_annotations[0].name, "JvmName");

    let interfaces: Vec<_> = outline
        .by_kind(&SymbolKind::Interface)
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(interfaces, vec!["Entity", "Repository"]);

    let user = symbol(&outline, "User");
    assert_eq!(user.kind, SymbolKind::DataClass);
    assert_eq!(user.supertypes, vec!["BaseEntity"]);
    assert_eq!(user.parameters.len(), 3);
    assert_eq!(
        user.parameters[2].default_value.as_deref(),
        Some("null")
    );
    assert!(user.doc.as_deref().unwrap().starts_with("An application user."));

    let alias = symbol(&outline, "EntityId");
    assert_eq!(alias.kind, SymbolKind::TypeAlias);
    assert_eq!(alias.signature, "typealias EntityId = Long");
    assert_eq!(alias.doc.as_deref(), Some("Identifier type for entities"));
}

#[test]
fn test_parse_sample_app_imports() {
    let outline = outline(SAMPLE_APP, "sample_app.kt");

    assert_eq!(outline.imports.len(), 3);
    assert_eq!(outline.imports[0].path, "java.io.Serializable");
    assert_eq!(outline.imports[0].alias.as_deref(), Some("JavaSerializable"));
    assert!(outline.imports[1].is_wildcard);
    assert_eq!(outline.imports[1].path, "kotlinx.coroutines");
    assert_eq!(outline.imports[2].bound_name(), Some("Logger"));
}

#[test]
fn test_parse_sample_app_members() {
    let outline = outline(SAMPLE_APP, "sample_app.kt");

    let product: Vec<_> = outline.children("Product").map(|s| s.path.as_str()).collect();
    assert_eq!(
        product,
        vec![
            "Product.sku",
            "Product.price",
            "Product.stock",
            "Product.inStock",
            "Product.constructor",
            "Product.restock",
            "Product.restock#2",
        ]
    );
    assert!(symbol(&outline, "Product.stock").has_modifier(&Modifier::PrivateSet));
    assert!(symbol(&outline, "Product.inStock").has_custom_accessor);
    assert_eq!(
        symbol(&outline, "Product.constructor").kind,
        SymbolKind::Constructor
    );

    let load = symbol(&outline, "UserService.load");
    assert!(load.has_modifier(&Modifier::Suspend));
    assert_eq!(load.type_annotation.as_deref(), Some("User?"));

    let transform = symbol(&outline, "UserService.transform");
    assert_eq!(
        transform.signature,
        "fun <R> transform(user: User, block: (User) -> R): R"
    );

    let companion = symbol(&outline, "UserService.Companion");
    assert_eq!(companion.kind, SymbolKind::Companion);
    assert!(symbol(&outline, "UserService.Companion.MAX_USERS").is_constant());

    let statuses: Vec<_> = outline
        .children("OrderStatus")
        .filter(|s| s.kind == SymbolKind::EnumConstant)
        .map(|s| s.signature.as_str())
        .collect();
    assert_eq!(
        statuses,
        vec!["PENDING(\"pending\")", "SHIPPED(\"shipped\")", "DELIVERED(\"delivered\")"]
    );

    let settings = symbol(&outline, "AppConfig.settings");
    assert_eq!(settings.type_annotation.as_deref(), Some("Map<String, String>"));

    let max = symbol(&outline, "maxOf");
    assert_eq!(max.type_parameters[0].bound.as_deref(), Some("Comparable<T> & Any"));
}

#[test]
fn test_parse_sample_app_nesting() {
    let outline = outline(SAMPLE_APP, "sample_app.kt");

    let value = symbol(&outline, "Result.Success.value");
    assert_eq!(value.parent.as_deref(), Some("Result.Success"));
    assert_eq!(value.depth, 2);
    assert_eq!(symbol(&outline, "Result.Loading").kind, SymbolKind::Object);

    let create = symbol(&outline, "UserService.Companion.create");
    assert_eq!(create.depth, 2);

    let tree = outline.tree();
    let result = tree.iter().find(|n| n.symbol.name == "Result").unwrap();
    assert_eq!(result.children.len(), 3);
}

#[test]
fn test_deeply_nested_classes() {
    let depth = 2000;
    let source = format!("{}{}", "class C {\n".repeat(depth), "}\n".repeat(depth));
    let (outline, errors) = codeoutline_kotlin::parse(&source, "Deep.kt");

    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(outline.len(), depth);
    let innermost = outline.iter().last().unwrap();
    assert_eq!(innermost.depth, depth - 1);
    assert_eq!(innermost.path.len(), depth * 2 - 1);
}

#[test]
fn test_parse_sample_app_extensions() {
    let outline = outline(SAMPLE_APP, "sample_app.kt");

    let email = symbol(&outline, "isValidEmail");
    assert_eq!(email.receiver_type.as_deref(), Some("String"));
    assert!(email.is_extension());

    let display = symbol(&outline, "displayName");
    assert_eq!(display.kind, SymbolKind::Property);
    assert_eq!(display.receiver_type.as_deref(), Some("User"));
    assert_eq!(display.signature, "val User.displayName: String");
}

#[test]
fn test_ranges_start_at_prefix_and_nest() {
    for (source, file_id) in [
        (SAMPLE_APP, "sample_app.kt"),
        (TEST_CLASS, "TestClass.kt"),
        (EXTENSIONS, "ExtensionFunction.kt"),
    ] {
        let outline = outline(source, file_id);
        assert_ranges(source, &outline);
    }
}

#[test]
fn test_parse_is_idempotent() {
    let first = codeoutline_kotlin::parse(SAMPLE_APP, "sample_app.kt");
    let second = codeoutline_kotlin::parse(SAMPLE_APP, "sample_app.kt");
    assert_eq!(first, second);

    let parser = KotlinParser::new();
    let a = parser.parse(TEST_CLASS, "TestClass.kt");
    let b = parser.parse(TEST_CLASS, "TestClass.kt");
    assert_eq!(a.outline, b.outline);
    assert_eq!(a.errors, b.errors);
}

#[test]
fn test_parse_test_class() {
    let outline = outline(TEST_CLASS, "TestClass.kt");

    assert_eq!(outline.len(), 24);

    let class = symbol(&outline, "TestClass");
    assert_eq!(class.type_parameters[0].name, "T");
    assert!(class.has_annotation("Deprecated"));
    assert_eq!(class.signature, "class TestClass<T>");

    let name = symbol(&outline, "TestClass.name");
    assert!(name.has_modifier(&Modifier::PrivateSet));
    assert_eq!(name.doc.as_deref(), Some("Primary constructor property"));

    let generic = symbol(&outline, "TestClass.genericFunction");
    assert_eq!(generic.type_annotation.as_deref(), Some("R?"));
    assert_eq!(generic.signature, "fun <R> genericFunction(value: T): R?");

    let prefix = symbol(&outline, "TestClass.addPrefix");
    assert_eq!(prefix.receiver_type.as_deref(), Some("String"));

    assert_eq!(
        symbol(&outline, "TestClass.NestedClass.nestedFunction").parent.as_deref(),
        Some("TestClass.NestedClass")
    );
    assert_eq!(
        symbol(&outline, "TestClass.Companion").doc.as_deref(),
        Some("A companion object with constants")
    );

    let constants: Vec<_> = outline.constants().map(|s| s.name.as_str()).collect();
    assert_eq!(
        constants,
        vec!["MAX_COUNT", "DEFAULT_NAME", "VERSION", "NESTED_CONSTANT"]
    );
}

#[test]
fn test_doc_association() {
    let outline = outline(TEST_CLASS, "TestClass.kt");

    let doc = symbol(&outline, "TestClass").doc.as_deref().unwrap();
    assert!(doc.starts_with("This is a test class demonstrating various Kotlin language features"));
    assert!(doc.ends_with("for testing the Kotlin parser implementation."));

    // Ordinary `//` comments are not documentation
    assert_eq!(symbol(&outline, "TestClass.MAX_COUNT").doc, None);
    assert_eq!(symbol(&outline, "TestClass.basicFunction").doc, None);
    assert_eq!(
        symbol(&outline, "TestClass.parameterizedFunction").doc.as_deref(),
        Some("Function with parameters and return type")
    );
}

#[test]
fn test_extension_function_fixture() {
    let outline = outline(EXTENSIONS, "ExtensionFunction.kt");

    assert_eq!(outline.len(), 3);
    let class = symbol(&outline, "TestExtensions");
    assert_eq!(class.kind, SymbolKind::Class);
    assert_eq!(
        class.doc.as_deref(),
        Some("Test file containing only an extension function")
    );

    let add_prefix = symbol(&outline, "TestExtensions.addPrefix");
    assert_eq!(add_prefix.kind, SymbolKind::Function);
    assert_eq!(add_prefix.receiver_type.as_deref(), Some("String"));
    assert_eq!(add_prefix.type_annotation.as_deref(), Some("String"));

    let double = symbol(&outline, "TestExtensions.double");
    assert_eq!(double.kind, SymbolKind::Function);
    assert_eq!(double.receiver_type.as_deref(), Some("Int"));
    assert_eq!(double.signature, "fun Int.double(): Int");
}

#[test]
fn test_malformed_file_keeps_earlier_symbols() {
    let (outline, errors) = codeoutline_kotlin::parse(MALFORMED, "Malformed.kt");

    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .any(|e| matches!(e, ParseError::UnterminatedBlock { .. })));
    assert!(errors
        .iter()
        .any(|e| matches!(e, ParseError::UnexpectedToken { .. })));

    let healthy = symbol(&outline, "Healthy");
    assert!(!healthy.partial);
    assert!(!symbol(&outline, "Healthy.ok").partial);
    assert!(symbol(&outline, "broken").partial);
    assert!(symbol(&outline, "Unclosed").partial);
    assert_eq!(outline.package.as_deref(), Some("com.example.broken"));
}

#[test]
fn test_invalid_characters_reported_in_one_pass() {
    let source = "class A {\n    val x = 1 # 2\n    fun f() {}\n}\nfun g() = 4 $ 5\n";
    let (outline, errors) = codeoutline_kotlin::parse(source, "Lex.kt");

    let lex: Vec<_> = errors
        .iter()
        .filter(|e| e.category() == ErrorCategory::Lex)
        .collect();
    assert_eq!(lex.len(), 2, "{:?}", errors);
    assert!(outline.get("A.f").is_some());
    assert!(outline.get("g").is_some());
}

#[test]
fn test_overloads_have_unique_paths() {
    let source = "fun log(msg: String) {}\nfun log(msg: String, level: Int) {}\nfun log() {}\n";
    let outline = outline(source, "Log.kt");

    let paths: Vec<_> = outline.iter().map(|s| s.path.as_str()).collect();
    assert_eq!(paths, vec!["log", "log#2", "log#3"]);
    assert!(outline.iter().all(|s| s.name == "log"));
}

#[test]
fn test_structural_warnings() {
    let source = "data open class D(val x: Int)\nclass C {\n    const var v = 1\n    public private fun f() {}\n}\n";
    let (outline, errors) = codeoutline_kotlin::parse(source, "Warn.kt");

    assert_eq!(errors.len(), 3, "{:?}", errors);
    assert!(errors.iter().all(ParseError::is_warning));
    assert_eq!(outline.len(), 5);
    assert!(outline.partial_symbols().next().is_none());
}

#[test]
fn test_batch_order_sequential_and_parallel() {
    let files = vec![
        SourceFile::new("sample_app.kt", SAMPLE_APP),
        SourceFile::new("TestClass.kt", TEST_CLASS),
        SourceFile::new("ExtensionFunction.kt", EXTENSIONS),
        SourceFile::new("Malformed.kt", MALFORMED),
    ];

    for parallel in [false, true] {
        let parser = KotlinParser::with_config(ParserConfig::default().with_parallel(parallel));
        let batch = parser.parse_batch(&files).unwrap();

        let ids: Vec<_> = batch.files.iter().map(|f| f.outline.file_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["sample_app.kt", "TestClass.kt", "ExtensionFunction.kt", "Malformed.kt"]
        );
        assert_eq!(batch.files[0].outline.len(), 49);
        assert_eq!(batch.files[1].outline.len(), 24);
        assert_eq!(batch.files_with_errors().count(), 1);

        let metrics = parser.metrics();
        assert_eq!(metrics.files_attempted, 4);
        assert_eq!(metrics.files_clean, 3);
        assert_eq!(metrics.total_symbols, batch.total_symbols);
    }
}

#[test]
fn test_metrics_reset() {
    let mut parser = KotlinParser::new();
    parser.parse(EXTENSIONS, "ExtensionFunction.kt");
    assert_eq!(parser.metrics().total_symbols, 3);

    parser.reset_metrics();
    let metrics = parser.metrics();
    assert_eq!(metrics.files_attempted, 0);
    assert_eq!(metrics.total_symbols, 0);
}

#[test]
fn test_skip_private_config() {
    let parser = KotlinParser::with_config(ParserConfig {
        skip_private: true,
        ..ParserConfig::default()
    });
    let output = parser.parse(SAMPLE_APP, "sample_app.kt");

    assert!(output.outline.get("Product.price").is_none());
    assert!(output.outline.get("UserService.cache").is_none());
    assert!(output.outline.get("AppConfig.loadSettings").is_none());
    assert!(output.outline.get("Product.sku").is_some());
}

#[test]
fn test_doc_config_flags() {
    let no_docs = KotlinParser::with_config(ParserConfig {
        include_docs: false,
        ..ParserConfig::default()
    });
    let output = no_docs.parse(TEST_CLASS, "TestClass.kt");
    assert!(output.outline.iter().all(|s| s.doc.is_none()));

    let line_comments = KotlinParser::with_config(ParserConfig {
        attach_line_comments: true,
        ..ParserConfig::default()
    });
    let output = line_comments.parse(TEST_CLASS, "TestClass.kt");
    assert_eq!(
        output.outline.get("TestClass.basicFunction").unwrap().doc.as_deref(),
        Some("Different types of functions")
    );
    // Doc comments still win over line comments
    assert_eq!(
        output.outline.get("TestClass.Companion").unwrap().doc.as_deref(),
        Some("A companion object with constants")
    );
}

#[test]
fn test_path_separator_config() {
    let parser = KotlinParser::with_config(ParserConfig::default().with_path_separator("::"));
    let output = parser.parse(EXTENSIONS, "ExtensionFunction.kt");
    assert!(output.outline.get("TestExtensions::double").is_some());
}

#[test]
fn test_file_too_large() {
    let parser = KotlinParser::with_config(ParserConfig::default().with_max_file_size(64));
    let output = parser.parse(SAMPLE_APP, "sample_app.kt");

    assert!(output.outline.is_empty());
    assert_eq!(output.errors.len(), 1);
    assert!(matches!(output.errors[0], ParseError::FileTooLarge { max: 64, .. }));
    assert_eq!(parser.metrics().files_with_errors, 1);
}

/// `endpoint GET "/users"`
struct EndpointRule;

impl DeclarationRule for EndpointRule {
    fn trigger(&self) -> &str {
        "endpoint"
    }

    fn parse(&self, ctx: &mut RuleContext<'_, '_>) -> Option<RuleOutput> {
        let verb = ctx.expect_name("HTTP verb")?;
        let path = ctx.skip_expression().unwrap_or_default();
        Some(
            RuleOutput::new(
                &verb,
                RuleKind::Custom {
                    label: "endpoint".into(),
                },
            )
            .with_signature(format!("endpoint {} {}", verb.name(), path)),
        )
    }
}

#[test]
fn test_custom_rule() {
    let parser = KotlinParser::new().with_rule(EndpointRule);
    let source = "/** Lists users */\n@Authenticated\nendpoint GET \"/users\"\n\nfun handler() {}\n";
    let output = parser.parse(source, "Routes.kt");

    assert!(output.errors.is_empty(), "{:?}", output.errors);
    let endpoint = output.outline.get("GET").unwrap();
    assert_eq!(endpoint.kind, SymbolKind::Custom("endpoint".into()));
    assert_eq!(endpoint.signature, "endpoint GET \"/users\"");
    assert_eq!(endpoint.doc.as_deref(), Some("Lists users"));
    assert!(endpoint.has_annotation("Authenticated"));
    assert!(output.outline.get("handler").is_some());

    // Without the rule the same source is an error
    let (_, errors) = codeoutline_kotlin::parse(source, "Routes.kt");
    assert!(errors.iter().any(|e| e.category() == ErrorCategory::Parse));
}

#[test]
fn test_outline_serde_roundtrip() {
    let parser = KotlinParser::new();
    let output = parser.parse(SAMPLE_APP, "sample_app.kt");

    let json = serde_json::to_string(&output.outline).unwrap();
    let back: SymbolOutline = serde_json::from_str(&json).unwrap();
    assert_eq!(back, output.outline);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["language"], "kotlin");
    assert_eq!(value["symbols"][0]["name"], "EntityId");
}

#[test]
fn test_parse_declarations_exposes_tree() {
    let (file, errors) = codeoutline_kotlin::parse_declarations(EXTENSIONS);
    assert!(errors.is_empty());
    assert_eq!(file.declarations.len(), 1);
    assert_eq!(file.walk().len(), 3);
    assert_eq!(file.declarations[0].members()[1].name, "double");
}
