use crate::entities::SourceRange;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad classification of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Unrecognized input at the character level
    Lex,
    /// Unexpected token or broken block structure
    Parse,
    /// Recognized declaration with a questionable shape, never fatal
    Warning,
}

/// Problems found while outlining one source file.
///
/// These are collected next to the outline rather than returned as `Err`:
/// a file with errors still yields every symbol that could be recovered.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseError {
    /// Unrecognized character sequence
    #[error("Unrecognized input `{text}` at {range}")]
    Lex { text: String, range: SourceRange },

    /// A token that does not fit the grammar at this position
    #[error("Expected {expected}, found {found} at {range}")]
    UnexpectedToken {
        expected: String,
        found: String,
        range: SourceRange,
    },

    /// A brace, string or comment opened but never closed
    #[error("Unterminated {what} starting at {range}")]
    UnterminatedBlock { what: String, range: SourceRange },

    /// A closing brace with no matching opener
    #[error("Unbalanced `}}` at {range}")]
    UnbalancedBrace { range: SourceRange },

    /// Declaration recognized but with an unsupported modifier combination
    #[error("{message} at {range}")]
    StructuralWarning { message: String, range: SourceRange },

    /// Source skipped because it exceeds the configured size limit
    #[error("Source of {size} bytes exceeds maximum size ({max} bytes)")]
    FileTooLarge { size: usize, max: usize },
}

impl ParseError {
    pub fn unexpected(
        expected: impl Into<String>,
        found: impl Into<String>,
        range: SourceRange,
    ) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            range,
        }
    }

    pub fn unterminated(what: impl Into<String>, range: SourceRange) -> Self {
        ParseError::UnterminatedBlock {
            what: what.into(),
            range,
        }
    }

    pub fn warning(message: impl Into<String>, range: SourceRange) -> Self {
        ParseError::StructuralWarning {
            message: message.into(),
            range,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ParseError::Lex { .. } => ErrorCategory::Lex,
            ParseError::StructuralWarning { .. } => ErrorCategory::Warning,
            ParseError::UnexpectedToken { .. }
            | ParseError::UnterminatedBlock { .. }
            | ParseError::UnbalancedBrace { .. }
            | ParseError::FileTooLarge { .. } => ErrorCategory::Parse,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.category() == ErrorCategory::Warning
    }

    /// Location of the problem, if it has one
    pub fn range(&self) -> Option<SourceRange> {
        match self {
            ParseError::Lex { range, .. }
            | ParseError::UnexpectedToken { range, .. }
            | ParseError::UnterminatedBlock { range, .. }
            | ParseError::UnbalancedBrace { range }
            | ParseError::StructuralWarning { range, .. } => Some(*range),
            ParseError::FileTooLarge { .. } => None,
        }
    }
}

/// Errors from parser infrastructure (never from outlining a single file)
#[derive(Error, Debug)]
pub enum ParserError {
    /// Configuration rejected by `ParserConfig::validate`
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Worker pool for batch parsing could not be created
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),
}

/// Result type for parser operations
pub type ParserResult<T> = Result<T, ParserError>;
