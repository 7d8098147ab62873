//! Declaration tree for one Kotlin file
//!
//! Only declarations are modelled. Function bodies, initializers, delegates
//! and default values are kept as opaque spans into the source.

use crate::token::Span;
use codeoutline_parser_api::{
    Annotation, Binding, Import, Modifier, Parameter, SymbolKind, TypeParameter,
};

/// A parsed file: header plus top-level declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KotlinFile {
    pub header: FileHeader,
    pub declarations: Vec<Decl>,
}

impl KotlinFile {
    /// Every declaration depth-first, parents before children
    pub fn walk(&self) -> Vec<&Decl> {
        let mut out = Vec::new();
        let mut pending: Vec<&Decl> = self.declarations.iter().rev().collect();
        while let Some(decl) = pending.pop() {
            out.push(decl);
            pending.extend(decl.members().iter().rev());
        }
        out
    }
}

/// `package`, `import` and `@file:` annotations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileHeader {
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub annotations: Vec<Annotation>,
}

/// One declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub kind: DeclKind,
    pub name: String,
    pub name_span: Span,
    pub type_params: Vec<TypeParameter>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    /// From the first annotation or modifier to the end of the declaration
    pub span: Span,
    /// Built during error recovery; some fields may be missing
    pub partial: bool,
}

impl Decl {
    pub fn new(kind: DeclKind, name: impl Into<String>, name_span: Span, span: Span) -> Self {
        Self {
            kind,
            name: name.into(),
            name_span,
            type_params: Vec::new(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            doc: None,
            span,
            partial: false,
        }
    }

    /// Nested declarations (class-like bodies only)
    pub fn members(&self) -> &[Decl] {
        match &self.kind {
            DeclKind::Class(body)
            | DeclKind::DataClass(body)
            | DeclKind::Interface(body)
            | DeclKind::Enum(body)
            | DeclKind::Object { body, .. } => &body.members,
            _ => &[],
        }
    }

    pub fn class_body(&self) -> Option<&ClassBody> {
        match &self.kind {
            DeclKind::Class(body)
            | DeclKind::DataClass(body)
            | DeclKind::Interface(body)
            | DeclKind::Enum(body)
            | DeclKind::Object { body, .. } => Some(body),
            _ => None,
        }
    }

    fn class_body_mut(&mut self) -> Option<&mut ClassBody> {
        match &mut self.kind {
            DeclKind::Class(body)
            | DeclKind::DataClass(body)
            | DeclKind::Interface(body)
            | DeclKind::Enum(body)
            | DeclKind::Object { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn has_modifier(&self, modifier: &Modifier) -> bool {
        self.modifiers.contains(modifier)
    }

    pub fn symbol_kind(&self) -> SymbolKind {
        match &self.kind {
            DeclKind::Class(_) => SymbolKind::Class,
            DeclKind::DataClass(_) => SymbolKind::DataClass,
            DeclKind::Interface(_) => SymbolKind::Interface,
            DeclKind::Enum(_) => SymbolKind::Enum,
            DeclKind::Object {
                is_companion: true, ..
            } => SymbolKind::Companion,
            DeclKind::Object { .. } => SymbolKind::Object,
            DeclKind::Function(_) => SymbolKind::Function,
            DeclKind::Property(_) => SymbolKind::Property,
            DeclKind::TypeAlias(_) => SymbolKind::TypeAlias,
            DeclKind::Constructor(_) => SymbolKind::Constructor,
            DeclKind::Custom(custom) => SymbolKind::Custom(custom.label.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    Class(ClassBody),
    DataClass(ClassBody),
    Interface(ClassBody),
    Enum(ClassBody),
    Object { is_companion: bool, body: ClassBody },
    Function(FunctionDecl),
    Property(PropertyDecl),
    TypeAlias(TypeAliasDecl),
    /// Secondary constructor
    Constructor(ConstructorDecl),
    /// Produced by a registered declaration rule
    Custom(CustomDecl),
}

/// Header and body shared by every class-like declaration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassBody {
    pub primary_constructor: Option<PrimaryConstructor>,
    pub supertypes: Vec<Supertype>,
    pub enum_entries: Vec<EnumEntry>,
    pub members: Vec<Decl>,
    /// `{ ... }` including braces, if present
    pub body_span: Option<Span>,
}

/// Nested bodies are released from a work list so that dropping a deeply
/// nested tree does not recurse once per level
impl Drop for ClassBody {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.members);
        while let Some(mut decl) = pending.pop() {
            if let Some(body) = decl.class_body_mut() {
                pending.append(&mut body.members);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimaryConstructor {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub params: Vec<ClassParameter>,
    pub span: Span,
}

/// Primary-constructor parameter; `val`/`var` ones also declare a property
#[derive(Debug, Clone, PartialEq)]
pub struct ClassParameter {
    pub parameter: Parameter,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub name_span: Span,
    pub span: Span,
}

impl ClassParameter {
    pub fn binding(&self) -> Option<Binding> {
        self.parameter.binding
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Supertype {
    /// Type text, whitespace-normalized
    pub type_text: String,
    /// Invoked as a constructor, e.g. `Base(x)`
    pub constructor_call: bool,
    /// `by expr`
    pub delegate: Option<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumEntry {
    pub name: String,
    pub name_span: Span,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    /// `(...)` including parentheses
    pub arguments: Option<Span>,
    /// `{ ... }` including braces
    pub body: Option<Span>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionBody {
    /// `{ ... }`
    Block(Span),
    /// `= expr`, span of the expression
    Expression(Span),
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub receiver: Option<String>,
    pub params: Vec<Parameter>,
    pub return_type: Option<String>,
    pub body: FunctionBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub modifiers: Vec<Modifier>,
    /// Has `()` and a body, as opposed to a bare `private set`
    pub has_body: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub binding: Binding,
    pub receiver: Option<String>,
    pub type_text: Option<String>,
    pub initializer: Option<Span>,
    pub delegate: Option<Span>,
    pub accessors: Vec<Accessor>,
}

impl PropertyDecl {
    pub fn has_custom_accessor(&self) -> bool {
        self.accessors.iter().any(|a| a.has_body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub target: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub params: Vec<Parameter>,
    /// `this(...)` or `super(...)` delegation target
    pub delegation: Option<String>,
    pub body: Option<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomDecl {
    /// Kind label reported in the outline
    pub label: String,
    pub signature: String,
}
