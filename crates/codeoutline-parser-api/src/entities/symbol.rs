use super::modifier::{Annotation, Modifier, Visibility};
use super::parameter::{Parameter, TypeParameter};
use super::range::SourceRange;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag of an outline symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Class,
    DataClass,
    Interface,
    Enum,
    /// `object` declaration (named singleton)
    Object,
    /// `companion object` nested in a class
    Companion,
    Function,
    /// Secondary constructor
    Constructor,
    Property,
    EnumConstant,
    TypeAlias,
    /// Produced by a grammar rule registered by the caller
    Custom(String),
}

impl SymbolKind {
    pub fn as_str(&self) -> &str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::DataClass => "data_class",
            SymbolKind::Interface => "interface",
            SymbolKind::Enum => "enum",
            SymbolKind::Object => "object",
            SymbolKind::Companion => "companion",
            SymbolKind::Function => "function",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Property => "property",
            SymbolKind::EnumConstant => "enum_constant",
            SymbolKind::TypeAlias => "type_alias",
            SymbolKind::Custom(label) => label,
        }
    }

    /// Kinds that open a member scope
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class
                | SymbolKind::DataClass
                | SymbolKind::Interface
                | SymbolKind::Enum
                | SymbolKind::Object
                | SymbolKind::Companion
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One addressable declaration in a [`SymbolOutline`](crate::SymbolOutline)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Declared name
    pub name: String,

    /// Qualified path: enclosing names and this name joined by the separator.
    /// Unique within one file.
    pub path: String,

    /// Path of the enclosing symbol, `None` at top level
    pub parent: Option<String>,

    /// Nesting depth, 0 at top level
    pub depth: usize,

    pub kind: SymbolKind,

    /// Resolved modifiers in source order
    pub modifiers: Vec<Modifier>,

    pub annotations: Vec<Annotation>,

    /// Generic parameters (if any)
    pub type_parameters: Vec<TypeParameter>,

    /// Normalized one-line declaration header
    pub signature: String,

    /// Receiver of an extension function or property (`String` in `fun String.addPrefix()`)
    pub receiver_type: Option<String>,

    /// Property type or function return type, as written
    pub type_annotation: Option<String>,

    /// Function or constructor parameters
    pub parameters: Vec<Parameter>,

    /// Supertypes listed after `:` in a type header
    pub supertypes: Vec<String>,

    /// Cleaned documentation comment
    pub doc: Option<String>,

    pub range: SourceRange,

    /// Property declares `get`/`set` accessors
    pub has_custom_accessor: bool,

    /// Recovered from malformed source; fields may be incomplete
    pub partial: bool,
}

impl Symbol {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        kind: SymbolKind,
        range: SourceRange,
    ) -> Self {
        let name = name.into();
        Self {
            signature: name.clone(),
            name,
            path: path.into(),
            parent: None,
            depth: 0,
            kind,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            type_parameters: Vec::new(),
            receiver_type: None,
            type_annotation: None,
            parameters: Vec::new(),
            supertypes: Vec::new(),
            doc: None,
            range,
            has_custom_accessor: false,
            partial: false,
        }
    }

    // Builder methods
    pub fn with_parent(mut self, parent: impl Into<String>, depth: usize) -> Self {
        self.parent = Some(parent.into());
        self.depth = depth;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_type_parameters(mut self, type_params: Vec<TypeParameter>) -> Self {
        self.type_parameters = type_params;
        self
    }

    pub fn with_signature(mut self, sig: impl Into<String>) -> Self {
        self.signature = sig.into();
        self
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver_type = Some(receiver.into());
        self
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.type_annotation = Some(ty.into());
        self
    }

    pub fn with_parameters(mut self, params: Vec<Parameter>) -> Self {
        self.parameters = params;
        self
    }

    pub fn with_supertypes(mut self, supertypes: Vec<String>) -> Self {
        self.supertypes = supertypes;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn custom_accessor(mut self) -> Self {
        self.has_custom_accessor = true;
        self
    }

    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    pub fn has_modifier(&self, modifier: &Modifier) -> bool {
        self.modifiers.contains(modifier)
    }

    /// Visibility from modifiers, Kotlin's `public` when none is written
    pub fn visibility(&self) -> Visibility {
        self.modifiers
            .iter()
            .find_map(Modifier::visibility)
            .unwrap_or_default()
    }

    /// `const val` property
    pub fn is_constant(&self) -> bool {
        self.kind == SymbolKind::Property && self.has_modifier(&Modifier::Const)
    }

    pub fn is_extension(&self) -> bool {
        self.receiver_type.is_some()
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a.name == name || a.simple_name() == name)
    }
}
