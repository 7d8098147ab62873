//! Tests for parser API types and utilities

use crate::*;
use std::time::Duration;

fn range(start: usize, end: usize, line_start: usize, line_end: usize) -> SourceRange {
    SourceRange::new(start, end, line_start, line_end)
}

fn sample_outline() -> SymbolOutline {
    let mut outline = SymbolOutline::new("Shapes.kt", "kotlin");
    outline.package = Some("com.example".to_string());
    outline.add_symbol(Symbol::new("Shape", "Shape", SymbolKind::Class, range(0, 200, 1, 20)));
    outline.add_symbol(
        Symbol::new("area", "Shape.area", SymbolKind::Function, range(20, 60, 2, 4))
            .with_parent("Shape", 1),
    );
    outline.add_symbol(
        Symbol::new("Circle", "Shape.Circle", SymbolKind::Class, range(70, 190, 6, 19))
            .with_parent("Shape", 1),
    );
    outline.add_symbol(
        Symbol::new("PI", "Shape.Circle.PI", SymbolKind::Property, range(90, 110, 7, 7))
            .with_parent("Shape.Circle", 2)
            .with_modifiers(vec![Modifier::Const]),
    );
    outline.add_symbol(Symbol::new("main", "main", SymbolKind::Function, range(210, 240, 22, 24)));
    outline
}

#[test]
fn test_outline_new() {
    let outline = SymbolOutline::new("Main.kt", "kotlin");

    assert_eq!(outline.file_id, "Main.kt");
    assert_eq!(outline.language, "kotlin");
    assert!(outline.package.is_none());
    assert!(outline.is_empty());
    assert_eq!(outline.imports.len(), 0);
}

#[test]
fn test_outline_queries() {
    let outline = sample_outline();

    assert_eq!(outline.len(), 5);
    assert_eq!(outline.roots().count(), 2);
    assert_eq!(
        outline.children("Shape").map(|s| s.name.as_str()).collect::<Vec<_>>(),
        vec!["area", "Circle"]
    );
    assert_eq!(outline.get("Shape.Circle.PI").map(|s| s.depth), Some(2));
    assert_eq!(outline.constants().count(), 1);
    assert_eq!(outline.by_kind(&SymbolKind::Function).count(), 2);
    assert!(outline.get("Circle").is_none());
}

#[test]
fn test_outline_qualified_name() {
    let outline = sample_outline();
    let pi = outline.get("Shape.Circle.PI").unwrap();
    assert_eq!(outline.qualified_name(pi), "com.example.Shape.Circle.PI");
}

#[test]
fn test_outline_tree() {
    let outline = sample_outline();
    let tree = outline.tree();

    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].symbol.name, "Shape");
    assert_eq!(tree[0].children.len(), 2);
    assert_eq!(tree[0].children[1].children[0].symbol.name, "PI");
    assert!(tree[1].children.is_empty());
}

#[test]
fn test_outline_serde_roundtrip() {
    let outline = sample_outline();
    let json = serde_json::to_string(&outline).unwrap();
    let back: SymbolOutline = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outline);
}

#[test]
fn test_import_builder() {
    let import = Import::new("java.util.List", range(0, 21, 1, 1)).with_alias("JList");
    assert_eq!(import.bound_name(), Some("JList"));

    let plain = Import::new("kotlinx.coroutines.launch", range(0, 10, 1, 1));
    assert_eq!(plain.bound_name(), Some("launch"));

    let wildcard = Import::new("java.util", range(0, 10, 1, 1)).wildcard();
    assert!(wildcard.is_wildcard);
    assert_eq!(wildcard.bound_name(), None);
}

#[test]
fn test_parse_error_categories() {
    let lex = ParseError::Lex {
        text: "#".to_string(),
        range: range(4, 5, 1, 1),
    };
    let unexpected = ParseError::unexpected("declaration", "`=`", range(8, 9, 2, 2));
    let warning = ParseError::warning("Conflicting visibility modifiers", range(0, 7, 1, 1));
    let too_large = ParseError::FileTooLarge { size: 20, max: 10 };

    assert_eq!(lex.category(), ErrorCategory::Lex);
    assert_eq!(unexpected.category(), ErrorCategory::Parse);
    assert!(warning.is_warning());
    assert_eq!(too_large.range(), None);
    assert_eq!(
        unexpected.to_string(),
        "Expected declaration, found `=` at line 2 (8..9)"
    );
}

#[test]
fn test_parse_output_error_split() {
    let output = ParseOutput::new(
        SymbolOutline::new("A.kt", "kotlin"),
        vec![ParseError::warning("Repeated modifier `open`", range(0, 4, 1, 1))],
    );
    assert!(!output.has_errors());
    assert_eq!(output.warnings().count(), 1);

    let (outline, errors) = output.into_parts();
    assert_eq!(outline.file_id, "A.kt");
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_batch_output_totals() {
    let mut first = ParseOutput::new(sample_outline(), Vec::new());
    first.parse_time = Duration::from_millis(4);
    let mut second = ParseOutput::new(
        SymbolOutline::new("Broken.kt", "kotlin"),
        vec![ParseError::UnbalancedBrace {
            range: range(0, 1, 1, 1),
        }],
    );
    second.parse_time = Duration::from_millis(2);

    let batch = BatchOutput::from_outputs(vec![first, second]);
    assert_eq!(batch.total_files(), 2);
    assert_eq!(batch.total_symbols, 5);
    assert_eq!(batch.total_errors, 1);
    assert_eq!(batch.files_with_errors().count(), 1);
    assert_eq!(batch.avg_parse_time(), Duration::from_millis(3));
}

#[test]
fn test_parser_metrics() {
    let mut metrics = ParserMetrics::default();

    assert_eq!(metrics.files_attempted, 0);
    assert_eq!(metrics.clean_rate(), 0.0);

    metrics.record(true, Duration::from_millis(10), 12, 0);
    metrics.record(true, Duration::from_millis(10), 8, 1);
    metrics.record(false, Duration::from_millis(10), 0, 3);
    metrics.record(true, Duration::from_millis(10), 4, 0);

    assert_eq!(metrics.files_attempted, 4);
    assert_eq!(metrics.files_with_errors, 1);
    assert_eq!(metrics.clean_rate(), 0.75);
    assert_eq!(metrics.total_symbols, 24);
    assert_eq!(metrics.avg_symbols_per_file(), 6.0);
    assert_eq!(metrics.avg_parse_time(), Duration::from_millis(10));

    let mut total = ParserMetrics::default();
    total.merge(&metrics);
    total.merge(&metrics);
    assert_eq!(total.files_attempted, 8);
    assert_eq!(total.total_errors, 8);
}
