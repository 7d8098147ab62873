//! Recursive-descent declaration parser
//!
//! Builds a [`KotlinFile`] from the token stream. Only declaration structure
//! is parsed; bodies and expressions are skipped as balanced spans.
//!
//! Errors never abort the parse. An unexpected token is reported once, the
//! parser enters [`RecoveryMode::Recovering`], the declaration being built is
//! finished as `partial`, and the enclosing member loop resynchronizes.

mod callables;
mod cursor;
mod declarations;
pub mod recovery;
mod types;

#[cfg(test)]
mod tests;

use crate::ast::{CustomDecl, Decl, DeclKind, FileHeader, KotlinFile, TypeAliasDecl};
use crate::doc;
use crate::lexer::Lexer;
use crate::resolver::{normalize_whitespace, RawModifier, Resolver};
use crate::rules::{DeclarationRule, RuleContext, RuleKind, RuleSet};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Keyword, LineIndex, Span, Token, TokenKind};
use codeoutline_parser_api::{
    Annotation, Import, Modifier, ParseError, ParserConfig, SourceRange, TypeParameter,
};

use cursor::Cursor;
use recovery::{synchronize, RecoveryMode, DECL_START};

/// Per-parse switches taken from [`ParserConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub include_docs: bool,
    pub attach_line_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            include_docs: true,
            attach_line_comments: false,
        }
    }
}

impl From<&ParserConfig> for ParseOptions {
    fn from(config: &ParserConfig) -> Self {
        Self {
            include_docs: config.include_docs,
            attach_line_comments: config.attach_line_comments,
        }
    }
}

/// Parse one source into a declaration tree plus every problem found
///
/// Errors are returned in source order.
pub fn parse_source(
    source: &str,
    rules: &RuleSet,
    options: ParseOptions,
) -> (KotlinFile, Vec<ParseError>) {
    let mut parser = Parser::new(source, rules.clone(), options);
    let file = parser.parse_file();
    let mut errors = parser.errors;
    errors.sort_by_key(|e| e.range().map_or(0, |r| r.start));
    (file, errors)
}

/// Leading part shared by every declaration: doc, annotations, modifiers
pub(crate) struct DeclHead {
    pub start: usize,
    pub doc: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
}

pub struct Parser<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    lines: LineIndex,
    errors: Vec<ParseError>,
    mode: RecoveryMode,
    rules: RuleSet,
    options: ParseOptions,
    header: FileHeader,
    /// Class body nesting
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, rules: RuleSet, options: ParseOptions) -> Self {
        let lines = LineIndex::new(source);
        let cursor = Cursor::new(Lexer::new(source).collect());
        Self {
            source,
            cursor,
            lines,
            errors: Vec::new(),
            mode: RecoveryMode::Normal,
            rules,
            options,
            header: FileHeader::default(),
            depth: 0,
        }
    }

    pub fn parse_file(&mut self) -> KotlinFile {
        self.report_lex_errors();
        let declarations = self.parse_members(None);
        KotlinFile {
            header: std::mem::take(&mut self.header),
            declarations,
        }
    }

    fn report_lex_errors(&mut self) {
        for token in self.cursor.tokens() {
            let range = self.lines.range(token.span());
            match token.kind {
                TokenKind::Invalid => self.errors.push(ParseError::Lex {
                    text: token.text.to_string(),
                    range,
                }),
                TokenKind::UnterminatedString => {
                    self.errors.push(ParseError::unterminated("string literal", range))
                }
                TokenKind::UnterminatedComment => {
                    self.errors.push(ParseError::unterminated("block comment", range))
                }
                _ => {}
            }
        }
    }

    // === Shared helpers ===

    pub(crate) fn peek(&self) -> Token<'src> {
        self.cursor.peek()
    }

    pub(crate) fn bump(&mut self) -> Token<'src> {
        self.cursor.bump()
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    pub(crate) fn newline_before(&self) -> bool {
        self.cursor.newline_before()
    }

    pub(crate) fn span_from(&self, start: usize) -> Span {
        self.cursor.span_from(start)
    }

    pub(crate) fn range(&self, span: Span) -> SourceRange {
        self.lines.range(span)
    }

    pub(crate) fn slice(&self, span: Span) -> &'src str {
        &self.source[span.start..span.end]
    }

    /// Source text with whitespace runs collapsed
    pub(crate) fn text(&self, span: Span) -> String {
        normalize_whitespace(self.slice(span))
    }

    pub(crate) fn recovering(&self) -> bool {
        self.mode == RecoveryMode::Recovering
    }

    /// Report the current token as unexpected and enter recovery
    ///
    /// Only the first error of a declaration is reported.
    pub(crate) fn expected(&mut self, what: &str) {
        if self.recovering() {
            return;
        }
        let found = self.cursor.peek();
        self.errors.push(ParseError::unexpected(
            what,
            found.to_string(),
            self.lines.range(found.span()),
        ));
        self.mode = RecoveryMode::Recovering;
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.cursor.eat(kind) {
            true
        } else {
            self.expected(what);
            false
        }
    }

    pub(crate) fn expect_name(&mut self, what: &str) -> Option<Token<'src>> {
        if self.cursor.at_name() {
            Some(self.cursor.bump())
        } else {
            self.expected(what);
            None
        }
    }

    /// Report a group that runs to end of input
    pub(crate) fn unterminated(&mut self, what: &str, start: usize) {
        let span = Span::new(start, self.source.len());
        self.errors
            .push(ParseError::unterminated(what, self.lines.range(span)));
        self.mode = RecoveryMode::Recovering;
    }

    /// Leave recovery mode at the next synchronization point
    pub(crate) fn recover(&mut self) {
        if self.recovering() {
            synchronize(&mut self.cursor, DECL_START);
            self.mode = RecoveryMode::Normal;
        }
    }

    fn doc_at(&self, raw_index: usize) -> Option<String> {
        if !self.options.include_docs {
            return None;
        }
        doc::doc_for(
            self.cursor.tokens(),
            raw_index,
            self.options.attach_line_comments,
        )
    }

    // === Declarations ===

    /// Parse declarations until `}` (when `open` is the body's `{`) or `Eof`
    pub(crate) fn parse_members(&mut self, open: Option<Span>) -> Vec<Decl> {
        let mut members = Vec::new();
        loop {
            match self.cursor.peek_kind() {
                TokenKind::Eof => {
                    if let Some(open) = open {
                        self.unterminated("class body", open.start);
                    }
                    break;
                }
                TokenKind::RBrace => {
                    let brace = self.cursor.bump();
                    if open.is_some() {
                        break;
                    }
                    self.errors.push(ParseError::UnbalancedBrace {
                        range: self.lines.range(brace.span()),
                    });
                }
                TokenKind::Semicolon => {
                    self.cursor.bump();
                }
                _ => {
                    let before = self.cursor.checkpoint();
                    if let Some(decl) = ensure_sufficient_stack(|| self.parse_declaration()) {
                        members.push(decl);
                    }
                    self.recover();
                    if self.cursor.checkpoint() == before {
                        self.cursor.bump();
                    }
                }
            }
        }
        members
    }

    /// Parse one declaration starting at its first annotation or modifier
    ///
    /// Returns `None` for skipped constructs (`init` blocks, header items)
    /// and for declarations too broken to name.
    pub(crate) fn parse_declaration(&mut self) -> Option<Decl> {
        let start = self.cursor.peek().offset;
        let doc = self.doc_at(self.cursor.raw_index());
        let (raw, annotations) = self.parse_modifiers();
        let modifiers = Resolver::new(&self.lines).modifiers(&raw, &mut self.errors);
        let head = DeclHead {
            start,
            doc,
            modifiers,
            annotations,
        };

        let token = self.cursor.peek();
        let decl = match token.kind {
            TokenKind::Keyword(Keyword::Class) | TokenKind::Keyword(Keyword::Interface) => {
                self.parse_class(head)
            }
            TokenKind::Keyword(Keyword::Object) => self.parse_object(head),
            TokenKind::Keyword(Keyword::Fun) => self.parse_function(head),
            TokenKind::Keyword(Keyword::Val) | TokenKind::Keyword(Keyword::Var) => {
                self.parse_property(head)
            }
            TokenKind::Keyword(Keyword::Constructor) => self.parse_constructor(head),
            TokenKind::Keyword(Keyword::Init) => {
                self.skip_init();
                None
            }
            TokenKind::Keyword(Keyword::Package) if self.depth == 0 => {
                self.parse_package();
                None
            }
            TokenKind::Keyword(Keyword::Import) if self.depth == 0 => {
                self.parse_import();
                None
            }
            _ => match self.rules.find(token.text).cloned() {
                Some(rule) if matches!(token.kind, TokenKind::Ident | TokenKind::Keyword(_)) => {
                    self.parse_with_rule(rule.as_ref(), head)
                }
                _ => {
                    self.expected("declaration");
                    None
                }
            },
        };

        decl.map(|mut decl| {
            decl.partial |= self.recovering();
            decl
        })
    }

    /// Annotations and modifier keywords in any order
    pub(crate) fn parse_modifiers(&mut self) -> (Vec<RawModifier<'src>>, Vec<Annotation>) {
        let mut raw = Vec::new();
        let mut annotations = Vec::new();

        loop {
            let token = self.cursor.peek();
            match token.kind {
                TokenKind::Annotation => {
                    let annotation = self.parse_annotation();
                    if annotation.target.as_deref() == Some("file") {
                        self.header.annotations.push(annotation);
                    } else {
                        annotations.push(annotation);
                    }
                }
                TokenKind::At if self.cursor.nth(1).kind == TokenKind::LBracket => {
                    annotations.extend(self.parse_annotation_list());
                }
                TokenKind::Keyword(kw) if kw.is_modifier() && self.at_modifier_position() => {
                    self.cursor.bump();
                    raw.push(RawModifier {
                        text: token.text,
                        span: token.span(),
                    });
                }
                TokenKind::Keyword(Keyword::Fun)
                    if self.cursor.nth(1).is_keyword(Keyword::Interface) =>
                {
                    self.cursor.bump();
                    raw.push(RawModifier {
                        text: token.text,
                        span: token.span(),
                    });
                }
                _ => break,
            }
        }

        (raw, annotations)
    }

    /// A soft modifier keyword is a modifier only when another word follows
    fn at_modifier_position(&self) -> bool {
        matches!(
            self.cursor.nth(1).kind,
            TokenKind::Keyword(_) | TokenKind::Ident | TokenKind::Annotation | TokenKind::At
        )
    }

    /// `@Name` or `@Name(args)`; arguments must follow without a space
    pub(crate) fn parse_annotation(&mut self) -> Annotation {
        let marker = self.cursor.bump();
        let mut end = marker.end();
        let mut arguments = None;

        let next = self.cursor.peek();
        if next.kind == TokenKind::LParen && next.offset == marker.end() {
            if let Some(group) = self.skip_group("annotation arguments") {
                arguments = Some(self.slice(Span::new(group.start + 1, group.end - 1)));
                end = group.end;
            } else {
                end = self.cursor.prev_end();
            }
        }

        Resolver::new(&self.lines).annotation(&marker, arguments, Span::new(marker.offset, end))
    }

    /// `@[A B(x)]`
    fn parse_annotation_list(&mut self) -> Vec<Annotation> {
        self.cursor.bump();
        self.cursor.bump();
        let mut annotations = Vec::new();
        while self.cursor.at_name() {
            let name = self.cursor.bump();
            let mut end = name.end();
            let mut arguments = None;
            if self.cursor.at(TokenKind::LParen) {
                if let Some(group) = self.skip_group("annotation arguments") {
                    arguments = Some(self.slice(Span::new(group.start + 1, group.end - 1)));
                    end = group.end;
                }
            }
            let mut annotation = Annotation::new(name.name(), self.range(Span::new(name.offset, end)));
            if let Some(args) = arguments {
                annotation = annotation.with_arguments(normalize_whitespace(args));
            }
            annotations.push(annotation);
        }
        self.expect(TokenKind::RBracket, "`]`");
        annotations
    }

    /// Assemble a declaration from its head and parsed parts
    pub(crate) fn finish_decl(
        &self,
        head: DeclHead,
        kind: DeclKind,
        name: &str,
        name_span: Span,
        type_params: Vec<TypeParameter>,
    ) -> Decl {
        let mut decl = Decl::new(kind, name, name_span, self.cursor.span_from(head.start));
        decl.type_params = type_params;
        decl.modifiers = head.modifiers;
        decl.annotations = head.annotations;
        decl.doc = head.doc;
        decl.partial = self.recovering();
        decl
    }

    fn parse_with_rule(
        &mut self,
        rule: &dyn DeclarationRule,
        head: DeclHead,
    ) -> Option<Decl> {
        self.cursor.bump();
        let output = {
            let mut ctx = RuleContext::new(self);
            rule.parse(&mut ctx)
        }?;

        let kind = match output.kind {
            RuleKind::TypeAlias { target } => DeclKind::TypeAlias(TypeAliasDecl { target }),
            RuleKind::Custom { label } => DeclKind::Custom(CustomDecl {
                label,
                signature: output.signature,
            }),
        };
        Some(self.finish_decl(head, kind, &output.name, output.name_span, output.type_params))
    }

    // === File header ===

    fn parse_package(&mut self) {
        self.cursor.bump();
        if let Some(path) = self.parse_dotted_name("package name") {
            self.header.package = Some(path);
        }
        self.cursor.eat(TokenKind::Semicolon);
    }

    fn parse_import(&mut self) {
        let keyword = self.cursor.bump();
        let Some(path) = self.parse_dotted_name("import path") else {
            return;
        };

        let mut wildcard = false;
        if self.cursor.at(TokenKind::Dot) && self.cursor.nth(1).kind == TokenKind::Star {
            self.cursor.bump();
            self.cursor.bump();
            wildcard = true;
        }

        let mut alias = None;
        if self.cursor.eat_keyword(Keyword::As) {
            alias = self.expect_name("import alias").map(|t| t.name().to_string());
        }

        let mut import = Import::new(path, self.range(self.cursor.span_from(keyword.offset)));
        if wildcard {
            import = import.wildcard();
        }
        if let Some(alias) = alias {
            import = import.with_alias(alias);
        }
        self.header.imports.push(import);
        self.cursor.eat(TokenKind::Semicolon);
    }

    pub(crate) fn parse_dotted_name(&mut self, what: &str) -> Option<String> {
        let mut parts = Vec::new();
        loop {
            let part = self.expect_name(what)?;
            parts.push(part.name());
            if self.cursor.at(TokenKind::Dot) && self.cursor.nth(1).is_name() {
                self.cursor.bump();
                continue;
            }
            return Some(parts.join("."));
        }
    }
}
