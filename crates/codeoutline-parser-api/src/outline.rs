use crate::entities::{Annotation, Import, Symbol, SymbolKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outline of one parsed file
///
/// Symbols are stored flat in depth-first source order; the tree is encoded
/// through each symbol's `parent` path, so any downstream format can be
/// derived without the parser knowing about it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolOutline {
    /// Caller-supplied identifier of the source (usually its path)
    pub file_id: String,

    /// Language identifier
    pub language: String,

    /// Declared package, if any
    pub package: Option<String>,

    /// Import directives in source order
    pub imports: Vec<Import>,

    /// File-level annotations (`@file:JvmName(...)`)
    pub file_annotations: Vec<Annotation>,

    /// Number of lines in the source
    pub line_count: usize,

    /// Every symbol, parents before children
    pub symbols: Vec<Symbol>,
}

/// Borrowed tree view over a [`SymbolOutline`]
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineNode<'a> {
    pub symbol: &'a Symbol,
    pub children: Vec<OutlineNode<'a>>,
}

impl SymbolOutline {
    /// Create a new empty outline
    pub fn new(file_id: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            language: language.into(),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    /// Add a symbol
    pub fn add_symbol(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
    }

    /// Add an import
    pub fn add_import(&mut self, import: Import) {
        self.imports.push(import);
    }

    /// Look a symbol up by qualified path
    pub fn get(&self, path: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.path == path)
    }

    /// Direct children of the symbol at `path`
    pub fn children<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.symbols
            .iter()
            .filter(move |s| s.parent.as_deref() == Some(path))
    }

    /// Top-level symbols
    pub fn roots(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.parent.is_none())
    }

    pub fn by_kind<'a>(&'a self, kind: &'a SymbolKind) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.symbols.iter().filter(move |s| &s.kind == kind)
    }

    /// `const val` properties anywhere in the file
    pub fn constants(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.is_constant())
    }

    /// Symbols recovered from malformed source
    pub fn partial_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.partial)
    }

    /// Package-qualified name of a symbol, using `.` after the package
    pub fn qualified_name(&self, symbol: &Symbol) -> String {
        match &self.package {
            Some(pkg) => format!("{}.{}", pkg, symbol.path),
            None => symbol.path.clone(),
        }
    }

    /// Nested view of the outline, roots in source order
    pub fn tree(&self) -> Vec<OutlineNode<'_>> {
        let mut by_parent: HashMap<&str, Vec<&Symbol>> = HashMap::new();
        let mut roots = Vec::new();
        for symbol in &self.symbols {
            match symbol.parent.as_deref() {
                Some(parent) => by_parent.entry(parent).or_default().push(symbol),
                None => roots.push(symbol),
            }
        }

        fn build<'a>(
            symbol: &'a Symbol,
            by_parent: &HashMap<&str, Vec<&'a Symbol>>,
        ) -> OutlineNode<'a> {
            let children = by_parent
                .get(symbol.path.as_str())
                .map(|kids| kids.iter().map(|kid| build(kid, by_parent)).collect())
                .unwrap_or_default();
            OutlineNode { symbol, children }
        }

        roots.into_iter().map(|root| build(root, &by_parent)).collect()
    }
}

impl<'a> IntoIterator for &'a SymbolOutline {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}
