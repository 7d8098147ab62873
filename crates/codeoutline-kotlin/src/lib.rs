//! # codeoutline-kotlin
//!
//! Kotlin parser for CodeOutline - builds a declaration outline from Kotlin source files.
//!
//! ## Features
//!
//! - Parse Kotlin source files (.kt, .kts) without a JVM or a full grammar
//! - Outline classes, interfaces, enums, objects, companions and data classes
//! - Functions (including extension functions), properties, secondary constructors, type aliases
//! - Generic parameters, annotations, modifiers and KDoc comments
//! - Error recovery: malformed regions are reported and skipped, the rest is still outlined
//! - Pluggable [`rules::DeclarationRule`]s for custom declaration keywords
//! - Full integration with codeoutline-parser-api
//!
//! ## Quick Start
//!
//! ```rust
//! use codeoutline_kotlin::{KotlinParser, OutlineParser};
//!
//! let parser = KotlinParser::new();
//! let output = parser.parse("class Greeter {\n    fun hello(): String = \"hi\"\n}", "Greeter.kt");
//!
//! assert!(output.errors.is_empty());
//! assert_eq!(output.outline.symbols[1].path, "Greeter.hello");
//! ```

pub mod ast;
mod doc;
mod extractor;
pub mod lexer;
mod parser;
mod parser_impl;
mod resolver;
pub mod rules;
mod stack;
pub mod token;
mod visitor;

// Re-export parser-api types for convenience
pub use codeoutline_parser_api::{
    BatchOutput, OutlineParser, ParseError, ParseOutput, ParserConfig, ParserError,
    ParserMetrics, SourceFile, Symbol, SymbolKind, SymbolOutline,
};

// Export the Kotlin parser implementation
pub use parser_impl::KotlinParser;

use parser::{parse_source, ParseOptions};
use rules::RuleSet;

/// Outline one Kotlin source with the default configuration
///
/// Never fails: problems are returned next to the outline, which still holds
/// every declaration outside the malformed regions.
///
/// ```rust
/// let (outline, errors) = codeoutline_kotlin::parse("fun String.shout() = uppercase()", "Ext.kt");
///
/// assert!(errors.is_empty());
/// assert_eq!(outline.symbols[0].receiver_type.as_deref(), Some("String"));
/// ```
pub fn parse(source: &str, file_id: &str) -> (SymbolOutline, Vec<ParseError>) {
    extractor::extract(source, file_id, &ParserConfig::default(), &RuleSet::default())
}

/// Parse a source into its declaration tree without building an outline
pub fn parse_declarations(source: &str) -> (ast::KotlinFile, Vec<ParseError>) {
    parse_source(source, &RuleSet::default(), ParseOptions::default())
}
