use serde::{Deserialize, Serialize};
use std::fmt;

/// How a constructor parameter binds a property, if at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Binding {
    Val,
    Var,
}

impl Binding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Binding::Val => "val",
            Binding::Var => "var",
        }
    }
}

/// Represents a function or constructor parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,

    /// Type annotation (if available)
    pub type_annotation: Option<String>,

    /// Default value, as raw source text
    pub default_value: Option<String>,

    /// Is this a `vararg` parameter?
    pub is_variadic: bool,

    /// `val`/`var` on a primary constructor parameter
    pub binding: Option<Binding>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_annotation: None,
            default_value: None,
            is_variadic: false,
            binding: None,
        }
    }

    pub fn with_type(mut self, type_ann: impl Into<String>) -> Self {
        self.type_annotation = Some(type_ann.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }

    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.binding = Some(binding);
        self
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_variadic {
            f.write_str("vararg ")?;
        }
        if let Some(binding) = self.binding {
            write!(f, "{} ", binding.as_str())?;
        }
        f.write_str(&self.name)?;
        if let Some(ty) = &self.type_annotation {
            write!(f, ": {ty}")?;
        }
        if let Some(default) = &self.default_value {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

/// Generic type parameter such as `T`, `out R : Any` or `reified E`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParameter {
    pub name: String,

    /// Variance or `reified`, exactly as written
    pub modifiers: Vec<String>,

    /// Upper bound after `:`, if any
    pub bound: Option<String>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            bound: None,
        }
    }

    pub fn with_bound(mut self, bound: impl Into<String>) -> Self {
        self.bound = Some(bound.into());
        self
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }
}

impl fmt::Display for TypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{modifier} ")?;
        }
        f.write_str(&self.name)?;
        if let Some(bound) = &self.bound {
            write!(f, " : {bound}")?;
        }
        Ok(())
    }
}
