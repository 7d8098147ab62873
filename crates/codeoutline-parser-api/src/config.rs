use crate::errors::{ParserError, ParserResult};
use serde::{Deserialize, Serialize};

/// Configuration for parser behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Drop `private` symbols (and everything nested inside them)
    pub skip_private: bool,

    /// Attach documentation comments to symbols
    pub include_docs: bool,

    /// When a declaration has no doc comment, attach the ordinary comment
    /// block directly above it instead
    pub attach_line_comments: bool,

    /// Maximum source size to outline (in bytes)
    /// Larger sources produce an empty outline and a `FileTooLarge` error
    pub max_file_size: usize,

    /// Enable parallel parsing (for `parse_batch`)
    pub parallel: bool,

    /// Number of parallel workers (None = rayon default)
    pub parallel_workers: Option<usize>,

    /// Separator placed between names in qualified paths
    pub path_separator: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            skip_private: false,
            include_docs: true,
            attach_line_comments: false,
            max_file_size: 10 * 1024 * 1024, // 10 MB
            parallel: false,
            parallel_workers: None,
            path_separator: ".".to_string(),
        }
    }
}

impl ParserConfig {
    /// Create config for fast parsing (no docs, public API only)
    pub fn fast() -> Self {
        Self {
            skip_private: true,
            include_docs: false,
            ..Default::default()
        }
    }

    /// Create config for comprehensive parsing
    pub fn comprehensive() -> Self {
        Self {
            skip_private: false,
            include_docs: true,
            attach_line_comments: true,
            ..Default::default()
        }
    }

    /// Enable parallel parsing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the worker count for parallel batches
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.parallel_workers = Some(workers);
        self
    }

    /// Set maximum file size
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn with_path_separator(mut self, separator: impl Into<String>) -> Self {
        self.path_separator = separator.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ParserResult<()> {
        if self.parallel_workers == Some(0) {
            return Err(ParserError::InvalidConfig(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.max_file_size == 0 {
            return Err(ParserError::InvalidConfig(
                "max_file_size must be greater than 0".to_string(),
            ));
        }

        if self.path_separator.is_empty() {
            return Err(ParserError::InvalidConfig(
                "path_separator cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
