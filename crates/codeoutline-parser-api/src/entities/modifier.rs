use super::range::SourceRange;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declaration modifiers understood by outline parsers
///
/// The vocabulary keeps growing with the languages, so anything not listed
/// here is carried verbatim in [`Modifier::Other`] instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    Const,
    Companion,
    Data,
    Enum,
    Sealed,
    Abstract,
    Open,
    Final,
    Override,
    Inner,
    Annotation,
    Value,
    Inline,
    Suspend,
    Operator,
    Infix,
    Tailrec,
    External,
    Lateinit,
    Expect,
    Actual,
    /// `fun interface`
    Fun,
    /// Setter visibility narrowed with `private set`
    PrivateSet,
    /// Setter visibility narrowed with `protected set`
    ProtectedSet,
    /// Setter visibility narrowed with `internal set`
    InternalSet,
    Other(String),
}

impl Modifier {
    /// Resolve a modifier keyword; unknown words become [`Modifier::Other`]
    pub fn from_keyword(word: &str) -> Self {
        match word {
            "public" => Modifier::Public,
            "private" => Modifier::Private,
            "protected" => Modifier::Protected,
            "internal" => Modifier::Internal,
            "const" => Modifier::Const,
            "companion" => Modifier::Companion,
            "data" => Modifier::Data,
            "enum" => Modifier::Enum,
            "sealed" => Modifier::Sealed,
            "abstract" => Modifier::Abstract,
            "open" => Modifier::Open,
            "final" => Modifier::Final,
            "override" => Modifier::Override,
            "inner" => Modifier::Inner,
            "annotation" => Modifier::Annotation,
            "value" => Modifier::Value,
            "inline" => Modifier::Inline,
            "suspend" => Modifier::Suspend,
            "operator" => Modifier::Operator,
            "infix" => Modifier::Infix,
            "tailrec" => Modifier::Tailrec,
            "external" => Modifier::External,
            "lateinit" => Modifier::Lateinit,
            "expect" => Modifier::Expect,
            "actual" => Modifier::Actual,
            "fun" => Modifier::Fun,
            other => Modifier::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Internal => "internal",
            Modifier::Const => "const",
            Modifier::Companion => "companion",
            Modifier::Data => "data",
            Modifier::Enum => "enum",
            Modifier::Sealed => "sealed",
            Modifier::Abstract => "abstract",
            Modifier::Open => "open",
            Modifier::Final => "final",
            Modifier::Override => "override",
            Modifier::Inner => "inner",
            Modifier::Annotation => "annotation",
            Modifier::Value => "value",
            Modifier::Inline => "inline",
            Modifier::Suspend => "suspend",
            Modifier::Operator => "operator",
            Modifier::Infix => "infix",
            Modifier::Tailrec => "tailrec",
            Modifier::External => "external",
            Modifier::Lateinit => "lateinit",
            Modifier::Expect => "expect",
            Modifier::Actual => "actual",
            Modifier::Fun => "fun",
            Modifier::PrivateSet => "private set",
            Modifier::ProtectedSet => "protected set",
            Modifier::InternalSet => "internal set",
            Modifier::Other(text) => text,
        }
    }

    pub fn visibility(&self) -> Option<Visibility> {
        match self {
            Modifier::Public => Some(Visibility::Public),
            Modifier::Private => Some(Visibility::Private),
            Modifier::Protected => Some(Visibility::Protected),
            Modifier::Internal => Some(Visibility::Internal),
            _ => None,
        }
    }

    pub fn is_visibility(&self) -> bool {
        self.visibility().is_some()
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective visibility of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Kotlin's default when no visibility modifier is written
    #[default]
    Public,
    Private,
    Protected,
    Internal,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Protected => "protected",
            Visibility::Internal => "internal",
        }
    }
}

/// An annotation use site such as `@Deprecated("For testing purposes")`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation name without `@`, possibly dotted (`kotlin.Deprecated`)
    pub name: String,

    /// Use-site target, as in `@field:Json` or `@file:JvmName`
    pub target: Option<String>,

    /// Raw argument text between the parentheses, unparsed
    pub arguments: Option<String>,

    pub range: SourceRange,
}

impl Annotation {
    pub fn new(name: impl Into<String>, range: SourceRange) -> Self {
        Self {
            name: name.into(),
            target: None,
            arguments: None,
            range,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }

    /// Last segment of a dotted name: `kotlin.Deprecated` -> `Deprecated`
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("@")?;
        if let Some(target) = &self.target {
            write!(f, "{target}:")?;
        }
        f.write_str(&self.name)?;
        if let Some(args) = &self.arguments {
            write!(f, "({args})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_modifier_is_preserved() {
        let modifier = Modifier::from_keyword("crossinline");
        assert_eq!(modifier, Modifier::Other("crossinline".to_string()));
        assert_eq!(modifier.as_str(), "crossinline");
    }

    #[test]
    fn test_visibility_modifiers() {
        assert_eq!(
            Modifier::from_keyword("internal").visibility(),
            Some(Visibility::Internal)
        );
        assert!(Modifier::Private.is_visibility());
        assert!(!Modifier::PrivateSet.is_visibility());
        assert!(!Modifier::Const.is_visibility());
    }

    #[test]
    fn test_annotation_display() {
        let ann = Annotation::new("JvmName", SourceRange::default())
            .with_target("file")
            .with_arguments("\"Utils\"");
        assert_eq!(ann.to_string(), "@file:JvmName(\"Utils\")");
        assert_eq!(
            Annotation::new("kotlin.Deprecated", SourceRange::default()).simple_name(),
            "Deprecated"
        );
    }
}
