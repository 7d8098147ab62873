//! Class-like declarations: classes, interfaces, enums, objects

use super::recovery::DECL_KEYWORDS;
use super::types::ExprEnd;
use super::{DeclHead, Parser};
use crate::ast::{ClassBody, ClassParameter, Decl, DeclKind, EnumEntry, PrimaryConstructor, Supertype};
use crate::resolver::Resolver;
use crate::token::{Keyword, TokenKind};
use codeoutline_parser_api::{Binding, Modifier, Parameter};

impl<'src> Parser<'src> {
    /// `class` or `interface` declaration
    pub(crate) fn parse_class(&mut self, head: DeclHead) -> Option<Decl> {
        let keyword = self.cursor.bump();
        let is_interface = keyword.is_keyword(Keyword::Interface);

        let name = self.expect_name("class name")?;
        let mut type_params = self.parse_type_parameters();

        let mut body = ClassBody::default();
        if !self.recovering() {
            body.primary_constructor = self.parse_primary_constructor();
        }
        if !self.recovering() && self.cursor.eat(TokenKind::Colon) {
            body.supertypes = self.parse_supertypes();
        }
        self.parse_where_clause(&mut type_params);

        let is_enum = head.modifiers.contains(&Modifier::Enum);
        if !self.recovering() {
            self.parse_class_body(&mut body, is_enum);
        }

        let kind = if is_interface {
            DeclKind::Interface(body)
        } else if is_enum {
            DeclKind::Enum(body)
        } else if head.modifiers.contains(&Modifier::Data) {
            DeclKind::DataClass(body)
        } else {
            DeclKind::Class(body)
        };

        let decl = self.finish_decl(head, kind, name.name(), name.span(), type_params);
        Resolver::new(&self.lines).check_class(&decl.modifiers, decl.name_span, &mut self.errors);
        Some(decl)
    }

    /// `object` declaration; companions may omit the name
    pub(crate) fn parse_object(&mut self, head: DeclHead) -> Option<Decl> {
        let keyword = self.cursor.bump();
        let is_companion = head.modifiers.contains(&Modifier::Companion);

        let (name, name_span) = if self.cursor.at_name() && !self.cursor.newline_before() {
            let token = self.cursor.bump();
            (token.name(), token.span())
        } else if is_companion {
            ("Companion", keyword.span())
        } else {
            self.expected("object name");
            return None;
        };

        let mut body = ClassBody::default();
        if self.cursor.eat(TokenKind::Colon) {
            body.supertypes = self.parse_supertypes();
        }
        if !self.recovering() {
            self.parse_class_body(&mut body, false);
        }

        let kind = DeclKind::Object { is_companion, body };
        Some(self.finish_decl(head, kind, name, name_span, Vec::new()))
    }

    /// `(params)` or `[modifiers] constructor(params)` after the class name
    fn parse_primary_constructor(&mut self) -> Option<PrimaryConstructor> {
        let start = self.cursor.peek().offset;
        if self.cursor.at(TokenKind::LParen) && !self.cursor.newline_before() {
            let params = self.parse_class_parameters();
            return Some(PrimaryConstructor {
                params,
                span: self.cursor.span_from(start),
                ..PrimaryConstructor::default()
            });
        }

        let checkpoint = self.cursor.checkpoint();
        let (raw, annotations) = self.parse_modifiers();
        if !self.cursor.at_keyword(Keyword::Constructor) {
            self.cursor.reset(checkpoint);
            return None;
        }
        self.cursor.bump();
        let modifiers = Resolver::new(&self.lines).modifiers(&raw, &mut self.errors);

        let params = if self.cursor.at(TokenKind::LParen) {
            self.parse_class_parameters()
        } else {
            self.expected("`(`");
            Vec::new()
        };

        Some(PrimaryConstructor {
            modifiers,
            annotations,
            params,
            span: self.cursor.span_from(start),
        })
    }

    /// Primary-constructor parameters, starting at `(`
    fn parse_class_parameters(&mut self) -> Vec<ClassParameter> {
        let mut params = Vec::new();
        let open = self.cursor.bump();

        loop {
            if self.cursor.eat(TokenKind::RParen) {
                break;
            }
            if self.cursor.at_eof() {
                self.unterminated("parameter list", open.offset);
                break;
            }

            let start = self.cursor.peek().offset;
            let doc = self.doc_at(self.cursor.raw_index());
            let (mut raw, annotations) = self.parse_modifiers();

            let variadic = raw.iter().any(|m| m.text == "vararg");
            raw.retain(|m| m.text != "vararg");
            let modifiers = Resolver::new(&self.lines).modifiers(&raw, &mut self.errors);

            let binding = if self.cursor.eat_keyword(Keyword::Val) {
                Some(Binding::Val)
            } else if self.cursor.eat_keyword(Keyword::Var) {
                Some(Binding::Var)
            } else {
                None
            };

            let Some(name) = self.expect_name("parameter name") else {
                break;
            };
            let mut parameter = Parameter::new(name.name());
            if let Some(binding) = binding {
                parameter = parameter.with_binding(binding);
            }
            if self.expect(TokenKind::Colon, "`:`") {
                if let Some(ty) = self.parse_type() {
                    parameter = parameter.with_type(self.text(ty));
                }
            }
            if !self.recovering() && self.cursor.eat(TokenKind::Eq) {
                match self.skip_expression(ExprEnd::Argument) {
                    Some(default) => parameter = parameter.with_default(self.text(default)),
                    None => self.expected("default value"),
                }
            }
            if variadic {
                parameter = parameter.variadic();
            }

            params.push(ClassParameter {
                parameter,
                modifiers,
                annotations,
                doc,
                name_span: name.span(),
                span: self.cursor.span_from(start),
            });

            if self.recovering() {
                break;
            }
            if self.cursor.eat(TokenKind::Comma) {
                continue;
            }
            if self.cursor.eat(TokenKind::RParen) {
                break;
            }
            self.expected("`,` or `)`");
            break;
        }

        params
    }

    /// `A, B(x), C by c`
    fn parse_supertypes(&mut self) -> Vec<Supertype> {
        let mut supertypes = Vec::new();
        loop {
            while self.cursor.at(TokenKind::Annotation) {
                self.parse_annotation();
            }
            let Some(ty) = self.parse_type() else {
                break;
            };

            let mut constructor_call = false;
            if self.cursor.at(TokenKind::LParen) && !self.cursor.newline_before() {
                if self.skip_group("supertype arguments").is_none() {
                    break;
                }
                constructor_call = true;
            }

            let delegate = if self.cursor.eat_keyword(Keyword::By) {
                let delegate = self.skip_expression(ExprEnd::Delegation);
                if delegate.is_none() {
                    self.expected("delegate expression");
                }
                delegate
            } else {
                None
            };

            supertypes.push(Supertype {
                type_text: self.text(ty),
                constructor_call,
                delegate,
            });

            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        supertypes
    }

    /// Optional `{ ... }` body; enum bodies start with their constants
    fn parse_class_body(&mut self, body: &mut ClassBody, is_enum: bool) {
        if !self.cursor.at(TokenKind::LBrace) {
            return;
        }
        let open = self.cursor.bump();

        self.depth += 1;
        if is_enum {
            body.enum_entries = self.parse_enum_entries();
        }
        body.members = self.parse_members(Some(open.span()));
        self.depth -= 1;

        body.body_span = Some(self.cursor.span_from(open.offset));
    }

    /// Enum constants up to `;` or the closing `}` (not consumed)
    fn parse_enum_entries(&mut self) -> Vec<EnumEntry> {
        let mut entries = Vec::new();
        loop {
            if self.cursor.at(TokenKind::RBrace) || self.cursor.at_eof() {
                break;
            }
            if self.cursor.eat(TokenKind::Semicolon) {
                break;
            }
            if !self.at_enum_entry() {
                break;
            }

            let start = self.cursor.peek().offset;
            let doc = self.doc_at(self.cursor.raw_index());
            let mut annotations = Vec::new();
            while self.cursor.at(TokenKind::Annotation) {
                annotations.push(self.parse_annotation());
            }
            let Some(name) = self.expect_name("enum constant") else {
                self.recover();
                break;
            };

            let mut arguments = None;
            if self.cursor.at(TokenKind::LParen) {
                arguments = self.skip_group("enum constant arguments");
            }
            let mut entry_body = None;
            if !self.recovering() && self.cursor.at(TokenKind::LBrace) {
                entry_body = self.skip_group("enum constant body");
            }

            entries.push(EnumEntry {
                name: name.name().to_string(),
                name_span: name.span(),
                annotations,
                doc,
                arguments,
                body: entry_body,
                span: self.cursor.span_from(start),
            });

            if self.recovering() {
                self.recover();
                break;
            }
            if self.cursor.eat(TokenKind::Comma) {
                continue;
            }
            if self.cursor.eat(TokenKind::Semicolon) || self.cursor.at(TokenKind::RBrace) {
                break;
            }
            self.expected("`,`, `;` or `}`");
            self.recover();
            break;
        }
        entries
    }

    /// Enum constants are a name (or annotation) followed by `,` `;` `(` `{`
    /// or `}`; anything else begins the member declarations
    fn at_enum_entry(&self) -> bool {
        let token = self.cursor.peek();
        if token.kind == TokenKind::Annotation {
            return true;
        }
        if !token.is_name() || DECL_KEYWORDS.contains(token.kind) {
            return false;
        }
        matches!(
            self.cursor.nth(1).kind,
            TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::LParen
                | TokenKind::LBrace
                | TokenKind::RBrace
        )
    }
}
