use crate::{
    config::ParserConfig,
    errors::{ErrorCategory, ParseError, ParserResult},
    metrics::{duration_serde, ParserMetrics},
    outline::SymbolOutline,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// In-memory source handed to [`OutlineParser::parse_batch`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Identifier reported back in the outline (usually a path)
    pub id: String,

    /// Full source text
    pub text: String,
}

impl SourceFile {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Result of outlining one source: best-effort outline plus every problem found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutput {
    pub outline: SymbolOutline,

    /// Lex errors, parse errors and structural warnings in source order
    pub errors: Vec<ParseError>,

    /// Time taken to outline this source
    #[serde(with = "duration_serde")]
    pub parse_time: Duration,
}

impl ParseOutput {
    pub fn new(outline: SymbolOutline, errors: Vec<ParseError>) -> Self {
        Self {
            outline,
            errors,
            parse_time: Duration::ZERO,
        }
    }

    /// True if anything other than a structural warning was reported
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| !e.is_warning())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter().filter(|e| e.is_warning())
    }

    pub fn errors_of(&self, category: ErrorCategory) -> impl Iterator<Item = &ParseError> {
        self.errors.iter().filter(move |e| e.category() == category)
    }

    pub fn into_parts(self) -> (SymbolOutline, Vec<ParseError>) {
        (self.outline, self.errors)
    }
}

/// Aggregate result of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutput {
    /// One output per input, in input order
    pub files: Vec<ParseOutput>,

    /// Total number of symbols across all files
    pub total_symbols: usize,

    /// Total number of errors and warnings across all files
    pub total_errors: usize,

    /// Total parse time for all files
    #[serde(with = "duration_serde")]
    pub total_parse_time: Duration,
}

impl BatchOutput {
    pub fn from_outputs(files: Vec<ParseOutput>) -> Self {
        let mut total_symbols = 0;
        let mut total_errors = 0;
        let mut total_parse_time = Duration::ZERO;
        for output in &files {
            total_symbols += output.outline.len();
            total_errors += output.errors.len();
            total_parse_time += output.parse_time;
        }
        Self {
            files,
            total_symbols,
            total_errors,
            total_parse_time,
        }
    }

    pub fn total_files(&self) -> usize {
        self.files.len()
    }

    /// Files that reported at least one non-warning error
    pub fn files_with_errors(&self) -> impl Iterator<Item = &ParseOutput> {
        self.files.iter().filter(|f| f.has_errors())
    }

    /// Average parse time per file
    pub fn avg_parse_time(&self) -> Duration {
        if self.files.is_empty() {
            Duration::ZERO
        } else {
            self.total_parse_time / self.files.len() as u32
        }
    }
}

/// Core trait that all outline parsers implement
///
/// Parsing one source is synchronous and self-contained: implementations keep
/// no state between calls apart from metrics, so a single parser can serve
/// many threads at once.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to support parallel parsing.
pub trait OutlineParser: Send + Sync {
    /// Returns the language identifier (lowercase, e.g., "kotlin")
    fn language(&self) -> &str;

    /// Returns supported file extensions (e.g., [".kt", ".kts"])
    fn file_extensions(&self) -> &[&str];

    /// Outline one in-memory source
    ///
    /// Never fails: problems are reported in [`ParseOutput::errors`] next to
    /// whatever could be recovered. Updates parser metrics.
    ///
    /// # Arguments
    /// * `source` - Source code string
    /// * `file_id` - Identifier stored in the outline
    fn parse(&self, source: &str, file_id: &str) -> ParseOutput;

    /// Outline many sources
    ///
    /// Default implementation parses sequentially. Override this
    /// for parallel parsing.
    fn parse_batch(&self, files: &[SourceFile]) -> ParserResult<BatchOutput> {
        let outputs = files
            .iter()
            .map(|file| self.parse(&file.text, &file.id))
            .collect();
        Ok(BatchOutput::from_outputs(outputs))
    }

    /// Check if this parser handles the given file identifier
    ///
    /// Default implementation checks the extension.
    fn can_parse(&self, file_id: &str) -> bool {
        if let Some(ext) = Path::new(file_id).extension() {
            let ext_str = format!(".{}", ext.to_string_lossy());
            self.file_extensions().contains(&ext_str.as_str())
        } else {
            false
        }
    }

    /// Get parser configuration
    fn config(&self) -> &ParserConfig;

    /// Get accumulated metrics
    fn metrics(&self) -> ParserMetrics;

    /// Reset metrics
    ///
    /// Clears accumulated metrics. Useful for benchmarking.
    fn reset_metrics(&mut self);
}
