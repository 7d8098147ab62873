//! CodeOutline Parser API
//!
//! Shared trait and types for building CodeOutline language parsers.
//!
//! A language parser turns source text into a [`SymbolOutline`]: a flat,
//! serializable list of declarations with qualified paths, modifiers,
//! signatures, documentation and source ranges. This crate defines:
//!
//! - **OutlineParser trait**: The interface every language parser implements
//! - **Outline types**: [`Symbol`], [`SymbolKind`], [`Modifier`], [`Annotation`], ...
//! - **Errors**: [`ParseError`] for per-file problems, [`ParserError`] for infrastructure
//! - **Configuration**: Customizable parser behavior
//! - **Metrics**: Performance tracking
//!
//! # Example
//!
//! ```rust,ignore
//! use codeoutline_parser_api::{OutlineParser, ParseOutput, ParserConfig, ParserMetrics};
//!
//! struct MyParser {
//!     config: ParserConfig,
//! }
//!
//! impl OutlineParser for MyParser {
//!     fn language(&self) -> &str {
//!         "mylang"
//!     }
//!
//!     fn file_extensions(&self) -> &[&str] {
//!         &[".my"]
//!     }
//!
//!     fn parse(&self, source: &str, file_id: &str) -> ParseOutput {
//!         // Implementation here
//!         todo!()
//!     }
//!
//!     fn config(&self) -> &ParserConfig {
//!         &self.config
//!     }
//!
//!     fn metrics(&self) -> ParserMetrics {
//!         ParserMetrics::default()
//!     }
//!
//!     fn reset_metrics(&mut self) {}
//! }
//! ```

pub mod config;
pub mod entities;
pub mod errors;
pub mod metrics;
pub mod outline;
pub mod traits;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::ParserConfig;
pub use entities::{
    Annotation, Binding, Import, Modifier, Parameter, SourceRange, Symbol, SymbolKind,
    TypeParameter, Visibility,
};
pub use errors::{ErrorCategory, ParseError, ParserError, ParserResult};
pub use metrics::ParserMetrics;
pub use outline::{OutlineNode, SymbolOutline};
pub use traits::{BatchOutput, OutlineParser, ParseOutput, SourceFile};
