//! Functions, properties, secondary constructors and `init` blocks

use super::types::ExprEnd;
use super::{DeclHead, Parser};
use crate::ast::{
    Accessor, AccessorKind, ConstructorDecl, Decl, DeclKind, FunctionBody, FunctionDecl,
    PropertyDecl,
};
use crate::resolver::{setter_modifier, Resolver};
use crate::token::{Keyword, Span, TokenKind};
use codeoutline_parser_api::Binding;

impl<'src> Parser<'src> {
    /// `fun <T> Receiver.name(params): Return where ... { body }`
    pub(crate) fn parse_function(&mut self, head: DeclHead) -> Option<Decl> {
        self.cursor.bump();
        let mut type_params = self.parse_type_parameters();
        let (receiver, name) = self.parse_receiver_and_name("function name")?;

        let params = if self.cursor.at(TokenKind::LParen) {
            self.parse_value_parameters()
        } else {
            self.expected("`(`");
            Vec::new()
        };

        let mut return_type = None;
        if !self.recovering() && self.cursor.eat(TokenKind::Colon) {
            return_type = self.parse_type().map(|span| self.text(span));
        }
        self.parse_where_clause(&mut type_params);

        let body = if self.recovering() {
            FunctionBody::None
        } else {
            self.parse_function_body()
        };

        let kind = DeclKind::Function(FunctionDecl {
            receiver,
            params,
            return_type,
            body,
        });
        Some(self.finish_decl(head, kind, name.name(), name.span(), type_params))
    }

    fn parse_function_body(&mut self) -> FunctionBody {
        if self.cursor.at(TokenKind::LBrace) {
            return match self.skip_group("function body") {
                Some(span) => FunctionBody::Block(span),
                None => FunctionBody::None,
            };
        }
        if self.cursor.eat(TokenKind::Eq) {
            return match self.skip_expression(ExprEnd::Statement) {
                Some(span) => FunctionBody::Expression(span),
                None => {
                    self.expected("function body");
                    FunctionBody::None
                }
            };
        }
        FunctionBody::None
    }

    /// `val`/`var` with optional receiver, type, initializer or delegate,
    /// and accessors
    pub(crate) fn parse_property(&mut self, mut head: DeclHead) -> Option<Decl> {
        let binding = if self.cursor.bump().is_keyword(Keyword::Var) {
            Binding::Var
        } else {
            Binding::Val
        };
        let mut type_params = self.parse_type_parameters();
        let (receiver, name) = self.parse_receiver_and_name("property name")?;

        let mut type_text = None;
        if self.cursor.eat(TokenKind::Colon) {
            type_text = self.parse_type().map(|span| self.text(span));
        }
        self.parse_where_clause(&mut type_params);

        let mut initializer = None;
        let mut delegate = None;
        if !self.recovering() {
            if self.cursor.eat(TokenKind::Eq) {
                initializer = self.skip_expression(ExprEnd::Statement);
                if initializer.is_none() {
                    self.expected("initializer");
                }
            } else if self.cursor.eat_keyword(Keyword::By) {
                delegate = self.skip_expression(ExprEnd::Statement);
                if delegate.is_none() {
                    self.expected("delegate expression");
                }
            }
        }

        let accessors = if self.recovering() {
            Vec::new()
        } else {
            self.parse_accessors()
        };

        // `private set` is recorded on the property itself
        for accessor in accessors.iter().filter(|a| a.kind == AccessorKind::Set) {
            for modifier in accessor.modifiers.iter().filter_map(setter_modifier) {
                if !head.modifiers.contains(&modifier) {
                    head.modifiers.push(modifier);
                }
            }
        }

        let kind = DeclKind::Property(PropertyDecl {
            binding,
            receiver,
            type_text,
            initializer,
            delegate,
            accessors,
        });
        let decl = self.finish_decl(head, kind, name.name(), name.span(), type_params);
        Resolver::new(&self.lines).check_property(
            binding,
            &decl.modifiers,
            decl.name_span,
            &mut self.errors,
        );
        Some(decl)
    }

    /// Up to two `get`/`set` accessors following a property
    fn parse_accessors(&mut self) -> Vec<Accessor> {
        let mut accessors: Vec<Accessor> = Vec::new();

        while accessors.len() < 2 && !self.recovering() {
            let checkpoint = self.cursor.checkpoint();
            self.cursor.eat(TokenKind::Semicolon);

            let start = self.cursor.peek().offset;
            let (raw, _annotations) = self.parse_modifiers();
            let kind = match self.cursor.peek_kind() {
                TokenKind::Keyword(Keyword::Get) => AccessorKind::Get,
                TokenKind::Keyword(Keyword::Set) => AccessorKind::Set,
                _ => {
                    self.cursor.reset(checkpoint);
                    break;
                }
            };
            if accessors.iter().any(|a| a.kind == kind) {
                self.cursor.reset(checkpoint);
                break;
            }
            self.cursor.bump();
            let modifiers = Resolver::new(&self.lines).modifiers(&raw, &mut self.errors);

            let mut has_body = false;
            if self.cursor.at(TokenKind::LParen) && !self.cursor.newline_before() {
                if self.skip_group("accessor parameters").is_none() {
                    break;
                }
                if self.cursor.eat(TokenKind::Colon) && self.parse_type().is_none() {
                    break;
                }
                if self.cursor.at(TokenKind::LBrace) {
                    has_body = self.skip_group("accessor body").is_some();
                } else if self.cursor.eat(TokenKind::Eq) {
                    has_body = self.skip_expression(ExprEnd::Statement).is_some();
                    if !has_body {
                        self.expected("accessor body");
                    }
                }
            }

            accessors.push(Accessor {
                kind,
                modifiers,
                has_body,
                span: self.cursor.span_from(start),
            });
        }

        accessors
    }

    /// Secondary constructor: `constructor(params) : this(...) { body }`
    pub(crate) fn parse_constructor(&mut self, head: DeclHead) -> Option<Decl> {
        let keyword = self.cursor.bump();

        let params = if self.cursor.at(TokenKind::LParen) {
            self.parse_value_parameters()
        } else {
            self.expected("`(`");
            Vec::new()
        };

        let mut delegation = None;
        if !self.recovering() && self.cursor.eat(TokenKind::Colon) {
            let target = self.cursor.peek();
            if target.is_keyword(Keyword::This) || target.is_keyword(Keyword::Super) {
                self.cursor.bump();
                if self.cursor.at(TokenKind::LParen) {
                    if let Some(args) = self.skip_group("delegation arguments") {
                        delegation = Some(self.text(Span::new(target.offset, args.end)));
                    }
                } else {
                    self.expected("`(`");
                }
            } else {
                self.expected("`this` or `super`");
            }
        }

        let mut body = None;
        if !self.recovering() && self.cursor.at(TokenKind::LBrace) {
            body = self.skip_group("constructor body");
        }

        let kind = DeclKind::Constructor(ConstructorDecl {
            params,
            delegation,
            body,
        });
        Some(self.finish_decl(head, kind, keyword.text, keyword.span(), Vec::new()))
    }

    /// `init { ... }` produces no symbol
    pub(crate) fn skip_init(&mut self) {
        self.cursor.bump();
        if self.cursor.at(TokenKind::LBrace) {
            self.skip_group("init block");
        } else {
            self.expected("`{`");
        }
    }
}
