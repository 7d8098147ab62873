//! Declaration tree visitor producing the symbol outline

use crate::ast::{
    ClassBody, ClassParameter, Decl, DeclKind, EnumEntry, FunctionDecl, KotlinFile, PropertyDecl,
};
use crate::stack::ensure_sufficient_stack;
use crate::token::{LineIndex, Span};
use codeoutline_parser_api::{
    Modifier, Parameter, ParserConfig, Symbol, SymbolKind, SymbolOutline, TypeParameter,
};
use std::collections::HashMap;

pub struct OutlineVisitor<'a> {
    source: &'a str,
    lines: &'a LineIndex,
    config: &'a ParserConfig,
    pub outline: SymbolOutline,
    /// Paths of the enclosing symbols, innermost last
    scopes: Vec<String>,
    /// How many times each base path has been emitted
    seen: HashMap<String, usize>,
}

impl<'a> OutlineVisitor<'a> {
    pub fn new(
        source: &'a str,
        lines: &'a LineIndex,
        config: &'a ParserConfig,
        outline: SymbolOutline,
    ) -> Self {
        Self {
            source,
            lines,
            config,
            outline,
            scopes: Vec::new(),
            seen: HashMap::new(),
        }
    }

    pub fn visit_file(&mut self, file: &KotlinFile) {
        self.outline.package = file.header.package.clone();
        self.outline.imports = file.header.imports.clone();
        self.outline.file_annotations = file.header.annotations.clone();
        self.outline.line_count = self.source.lines().count();

        for decl in &file.declarations {
            self.visit_decl(decl);
        }
    }

    fn visit_decl(&mut self, decl: &Decl) {
        if self.config.skip_private && decl.has_modifier(&Modifier::Private) {
            return;
        }

        let mut symbol = self
            .new_symbol(&decl.name, decl.symbol_kind(), decl.span)
            .with_modifiers(decl.modifiers.clone())
            .with_annotations(decl.annotations.clone())
            .with_type_parameters(decl.type_params.clone());
        if let Some(doc) = &decl.doc {
            symbol = symbol.with_doc(doc.clone());
        }
        if decl.partial {
            symbol = symbol.partial();
        }

        symbol = match &decl.kind {
            DeclKind::Function(function) => self.function_symbol(symbol, decl, function),
            DeclKind::Property(property) => self.property_symbol(symbol, decl, property),
            DeclKind::Constructor(ctor) => symbol
                .with_signature(format!("constructor({})", join(&ctor.params)))
                .with_parameters(ctor.params.clone()),
            DeclKind::TypeAlias(alias) => symbol
                .with_signature(format!(
                    "typealias {}{} = {}",
                    decl.name,
                    type_params(&decl.type_params),
                    alias.target
                ))
                .with_type(alias.target.clone()),
            DeclKind::Custom(custom) => symbol.with_signature(custom.signature.clone()),
            DeclKind::Class(body)
            | DeclKind::DataClass(body)
            | DeclKind::Interface(body)
            | DeclKind::Enum(body)
            | DeclKind::Object { body, .. } => self.type_symbol(symbol, decl, body),
        };

        let path = symbol.path.clone();
        self.outline.add_symbol(symbol);

        if let Some(body) = decl.class_body() {
            self.scopes.push(path);
            self.visit_body(body);
            self.scopes.pop();
        }
    }

    fn visit_body(&mut self, body: &ClassBody) {
        if let Some(ctor) = &body.primary_constructor {
            for param in ctor.params.iter().filter(|p| p.binding().is_some()) {
                self.visit_class_parameter(param);
            }
        }
        for entry in &body.enum_entries {
            self.visit_enum_entry(entry);
        }
        for member in &body.members {
            ensure_sufficient_stack(|| self.visit_decl(member));
        }
    }

    /// `val`/`var` constructor parameters declare properties
    fn visit_class_parameter(&mut self, param: &ClassParameter) {
        if self.config.skip_private && param.modifiers.contains(&Modifier::Private) {
            return;
        }
        let parameter = &param.parameter;
        let binding = param.binding().map_or("val", |b| b.as_str());

        let mut signature = format!("{} {}", binding, parameter.name);
        if let Some(ty) = &parameter.type_annotation {
            signature.push_str(": ");
            signature.push_str(ty);
        }

        let mut symbol = self
            .new_symbol(&parameter.name, SymbolKind::Property, param.span)
            .with_modifiers(param.modifiers.clone())
            .with_annotations(param.annotations.clone())
            .with_signature(signature);
        if let Some(ty) = &parameter.type_annotation {
            symbol = symbol.with_type(ty.clone());
        }
        if let Some(doc) = &param.doc {
            symbol = symbol.with_doc(doc.clone());
        }
        self.outline.add_symbol(symbol);
    }

    fn visit_enum_entry(&mut self, entry: &EnumEntry) {
        let signature = match entry.arguments {
            Some(args) => format!("{}{}", entry.name, self.text(args)),
            None => entry.name.clone(),
        };
        let mut symbol = self
            .new_symbol(&entry.name, SymbolKind::EnumConstant, entry.span)
            .with_annotations(entry.annotations.clone())
            .with_signature(signature);
        if let Some(doc) = &entry.doc {
            symbol = symbol.with_doc(doc.clone());
        }
        self.outline.add_symbol(symbol);
    }

    fn type_symbol(&self, symbol: Symbol, decl: &Decl, body: &ClassBody) -> Symbol {
        let keyword = match &decl.kind {
            DeclKind::DataClass(_) => "data class",
            DeclKind::Interface(_) => "interface",
            DeclKind::Enum(_) => "enum class",
            DeclKind::Object {
                is_companion: true, ..
            } => "companion object",
            DeclKind::Object { .. } => "object",
            _ => "class",
        };

        // An unnamed companion points its name span at the `object` keyword
        let mut signature = if self.slice(decl.name_span) == "object" {
            keyword.to_string()
        } else {
            format!("{} {}", keyword, decl.name)
        };
        signature.push_str(&type_params(&decl.type_params));

        let mut parameters = Vec::new();
        if let Some(ctor) = &body.primary_constructor {
            parameters = ctor.params.iter().map(|p| p.parameter.clone()).collect();
            signature.push_str(&format!("({})", join(&parameters)));
        }

        let supertypes: Vec<String> = body.supertypes.iter().map(|s| s.type_text.clone()).collect();
        if !supertypes.is_empty() {
            signature.push_str(" : ");
            signature.push_str(&supertypes.join(", "));
        }

        symbol
            .with_signature(signature)
            .with_parameters(parameters)
            .with_supertypes(supertypes)
    }

    fn function_symbol(&self, mut symbol: Symbol, decl: &Decl, function: &FunctionDecl) -> Symbol {
        let mut signature = String::from("fun ");
        if !decl.type_params.is_empty() {
            signature.push_str(&type_params(&decl.type_params));
            signature.push(' ');
        }
        if let Some(receiver) = &function.receiver {
            signature.push_str(receiver);
            signature.push('.');
            symbol = symbol.with_receiver(receiver.clone());
        }
        signature.push_str(&format!("{}({})", decl.name, join(&function.params)));
        if let Some(ret) = &function.return_type {
            signature.push_str(": ");
            signature.push_str(ret);
            symbol = symbol.with_type(ret.clone());
        }

        symbol
            .with_signature(signature)
            .with_parameters(function.params.clone())
    }

    fn property_symbol(&self, mut symbol: Symbol, decl: &Decl, property: &PropertyDecl) -> Symbol {
        let mut signature = format!("{} ", property.binding.as_str());
        if !decl.type_params.is_empty() {
            signature.push_str(&type_params(&decl.type_params));
            signature.push(' ');
        }
        if let Some(receiver) = &property.receiver {
            signature.push_str(receiver);
            signature.push('.');
            symbol = symbol.with_receiver(receiver.clone());
        }
        signature.push_str(&decl.name);
        if let Some(ty) = &property.type_text {
            signature.push_str(": ");
            signature.push_str(ty);
            symbol = symbol.with_type(ty.clone());
        }
        if property.has_custom_accessor() {
            symbol = symbol.custom_accessor();
        }
        symbol.with_signature(signature)
    }

    /// Symbol with a unique path under the current scope
    fn new_symbol(&mut self, name: &str, kind: SymbolKind, span: Span) -> Symbol {
        let base = match self.scopes.last() {
            Some(parent) => format!("{}{}{}", parent, self.config.path_separator, name),
            None => name.to_string(),
        };

        // Overloads and redeclarations get `#2`, `#3`, ...
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        let path = if *count == 1 {
            base
        } else {
            format!("{}#{}", base, count)
        };

        let symbol = Symbol::new(name, path, kind, self.lines.range(span));
        match self.scopes.last() {
            Some(parent) => symbol.with_parent(parent.clone(), self.scopes.len()),
            None => symbol,
        }
    }

    fn slice(&self, span: Span) -> &'a str {
        self.source.get(span.start..span.end).unwrap_or("")
    }

    fn text(&self, span: Span) -> String {
        crate::resolver::normalize_whitespace(self.slice(span))
    }
}

fn type_params(params: &[TypeParameter]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let inner: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("<{}>", inner.join(", "))
}

fn join(params: &[Parameter]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
