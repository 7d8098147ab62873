use super::range::SourceRange;
use serde::{Deserialize, Serialize};

/// An `import` directive in a file header
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Import {
    /// Imported path without the trailing `.*`
    pub path: String,

    /// Is this a wildcard import?
    pub is_wildcard: bool,

    /// Import alias (if any)
    pub alias: Option<String>,

    pub range: SourceRange,
}

impl Import {
    pub fn new(path: impl Into<String>, range: SourceRange) -> Self {
        Self {
            path: path.into(),
            is_wildcard: false,
            alias: None,
            range,
        }
    }

    pub fn wildcard(mut self) -> Self {
        self.is_wildcard = true;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Name the import binds in the file: the alias, else the last segment
    pub fn bound_name(&self) -> Option<&str> {
        if self.is_wildcard {
            return None;
        }
        self.alias
            .as_deref()
            .or_else(|| self.path.rsplit('.').next())
    }
}
