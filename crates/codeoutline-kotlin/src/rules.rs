//! Pluggable declaration rules
//!
//! A [`DeclarationRule`] claims a trigger word at declaration position and
//! parses the rest of the declaration through a [`RuleContext`]. The parser
//! has already consumed the trigger and any leading annotations and
//! modifiers when the rule runs; those are attached to the resulting symbol
//! automatically.
//!
//! `typealias` support is itself a rule ([`TypeAliasRule`]) and is part of
//! every [`RuleSet::default`].
//!
//! ```rust
//! use codeoutline_kotlin::rules::{DeclarationRule, RuleContext, RuleKind, RuleOutput};
//!
//! /// `route Name "/path"`
//! struct RouteRule;
//!
//! impl DeclarationRule for RouteRule {
//!     fn trigger(&self) -> &str {
//!         "route"
//!     }
//!
//!     fn parse(&self, ctx: &mut RuleContext<'_, '_>) -> Option<RuleOutput> {
//!         let name = ctx.expect_name("route name")?;
//!         let path = ctx.skip_expression().unwrap_or_default();
//!         Some(
//!             RuleOutput::new(&name, RuleKind::Custom { label: "route".into() })
//!                 .with_signature(format!("route {} {}", name.name(), path)),
//!         )
//!     }
//! }
//! ```

use crate::parser::Parser;
use crate::token::{Span, Token, TokenKind};
use codeoutline_parser_api::TypeParameter;
use std::fmt;
use std::sync::Arc;

/// A declaration form recognized by its leading word
pub trait DeclarationRule: Send + Sync {
    /// Word that starts the declaration (after modifiers)
    fn trigger(&self) -> &str;

    /// Parse the declaration after the trigger
    ///
    /// Returning `None` drops the declaration. Errors reported through
    /// [`RuleContext::error`] mark the resulting symbol as partial.
    fn parse(&self, ctx: &mut RuleContext<'_, '_>) -> Option<RuleOutput>;
}

/// What a rule produced
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    TypeAlias { target: String },
    /// Reported as `SymbolKind::Custom(label)`
    Custom { label: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutput {
    pub name: String,
    pub name_span: Span,
    pub kind: RuleKind,
    /// One-line header; built by the outline for type aliases
    pub signature: String,
    pub type_params: Vec<TypeParameter>,
}

impl RuleOutput {
    pub fn new(name: &Token<'_>, kind: RuleKind) -> Self {
        Self {
            name: name.name().to_string(),
            name_span: name.span(),
            kind,
            signature: name.name().to_string(),
            type_params: Vec::new(),
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParameter>) -> Self {
        self.type_params = type_params;
        self
    }
}

/// Restricted view of the parser handed to rules
pub struct RuleContext<'p, 'src> {
    parser: &'p mut Parser<'src>,
}

impl<'p, 'src> RuleContext<'p, 'src> {
    pub(crate) fn new(parser: &'p mut Parser<'src>) -> Self {
        Self { parser }
    }

    pub fn peek(&self) -> Token<'src> {
        self.parser.peek()
    }

    pub fn bump(&mut self) -> Token<'src> {
        self.parser.bump()
    }

    pub fn eat(&mut self, kind: TokenKind) -> bool {
        self.parser.eat(kind)
    }

    /// Current token can serve as a name (identifier or soft keyword)
    pub fn at_name(&self) -> bool {
        self.parser.peek().is_name()
    }

    /// A line break precedes the current token
    pub fn newline_before(&self) -> bool {
        self.parser.newline_before()
    }

    pub fn expect_name(&mut self, what: &str) -> Option<Token<'src>> {
        self.parser.expect_name(what)
    }

    /// `<T : Bound, ...>` if present
    pub fn type_parameters(&mut self) -> Vec<TypeParameter> {
        self.parser.parse_type_parameters()
    }

    /// A type, whitespace-normalized
    pub fn parse_type(&mut self) -> Option<String> {
        self.parser.parse_type().map(|span| self.parser.text(span))
    }

    /// Skip an expression up to the end of the statement
    pub fn skip_expression(&mut self) -> Option<String> {
        self.parser
            .skip_statement()
            .map(|span| self.parser.text(span))
    }

    /// Skip a `{ ... }` block at the current token
    pub fn skip_block(&mut self, what: &str) -> Option<Span> {
        if self.parser.peek().kind == TokenKind::LBrace {
            self.parser.skip_group(what)
        } else {
            None
        }
    }

    /// Report the current token as unexpected
    pub fn error(&mut self, expected: &str) {
        self.parser.expected(expected);
    }

    /// Span from `start` to the end of the last consumed token
    pub fn span_from(&self, start: usize) -> Span {
        self.parser.span_from(start)
    }

    pub fn slice(&self, span: Span) -> &'src str {
        self.parser.slice(span)
    }
}

/// Registered rules, looked up by trigger
///
/// Later registrations take precedence over earlier ones with the same
/// trigger.
#[derive(Clone)]
pub struct RuleSet {
    rules: Vec<Arc<dyn DeclarationRule>>,
}

impl RuleSet {
    /// A set without the built-in rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(&mut self, rule: Arc<dyn DeclarationRule>) {
        self.rules.push(rule);
    }

    pub fn find(&self, trigger: &str) -> Option<&Arc<dyn DeclarationRule>> {
        self.rules.iter().rev().find(|rule| rule.trigger() == trigger)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.trigger())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        let mut rules = Self::empty();
        rules.push(Arc::new(TypeAliasRule));
        rules
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.triggers()).finish()
    }
}

/// `typealias Name<T> = Type`
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeAliasRule;

impl DeclarationRule for TypeAliasRule {
    fn trigger(&self) -> &str {
        "typealias"
    }

    fn parse(&self, ctx: &mut RuleContext<'_, '_>) -> Option<RuleOutput> {
        let name = ctx.expect_name("type alias name")?;
        let type_params = ctx.type_parameters();

        let target = if ctx.eat(TokenKind::Eq) {
            ctx.parse_type().unwrap_or_default()
        } else {
            ctx.error("`=`");
            String::new()
        };

        Some(RuleOutput::new(&name, RuleKind::TypeAlias { target }).with_type_params(type_params))
    }
}
