//! Types, parameter lists and opaque spans

use super::recovery::DECL_START;
use super::Parser;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Keyword, Span, Token, TokenKind};
use codeoutline_parser_api::{Parameter, TypeParameter};

/// Where an opaque expression ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExprEnd {
    /// Default values: ends at `,` or `)`
    Argument,
    /// Initializers, expression bodies, property delegates: ends at `;`, the
    /// enclosing `}`, or a new line starting a declaration or accessor
    Statement,
    /// Class delegation `by expr`: like a statement, also ends at `{` and `where`
    Delegation,
}

impl<'src> Parser<'src> {
    /// Skip a balanced `( )`, `[ ]` or `{ }` group starting at the current token
    ///
    /// Returns the span including delimiters, or `None` after reporting a
    /// group that never closes.
    pub(crate) fn skip_group(&mut self, what: &str) -> Option<Span> {
        let open = self.cursor.bump();
        let mut stack = match closer_for(open.kind) {
            Some(close) => vec![close],
            None => return None,
        };

        loop {
            let token = self.cursor.peek();
            match token.kind {
                TokenKind::Eof => {
                    self.unterminated(what, open.offset);
                    return None;
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    if let Some(close) = closer_for(token.kind) {
                        stack.push(close);
                    }
                    self.cursor.bump();
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    match stack.iter().rposition(|k| *k == token.kind) {
                        Some(pos) => {
                            stack.truncate(pos);
                            self.cursor.bump();
                            if stack.is_empty() {
                                return Some(Span::new(open.offset, token.end()));
                            }
                        }
                        // The enclosing body's brace: the group was never closed
                        None if token.kind == TokenKind::RBrace => {
                            let expected = match stack.last() {
                                Some(TokenKind::RParen) => "`)`",
                                Some(TokenKind::RBracket) => "`]`",
                                _ => "`}`",
                            };
                            self.expected(expected);
                            return None;
                        }
                        None => {
                            self.cursor.bump();
                        }
                    }
                }
                _ => {
                    self.cursor.bump();
                }
            }
        }
    }

    /// Skip an expression, returning its span (`None` if empty)
    pub(crate) fn skip_expression(&mut self, end: ExprEnd) -> Option<Span> {
        let start = self.cursor.peek().offset;
        let mut consumed = false;

        loop {
            let token = self.cursor.peek();
            let stop = match token.kind {
                TokenKind::Eof
                | TokenKind::Semicolon
                | TokenKind::Comma
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace => true,
                TokenKind::LBrace | TokenKind::Keyword(Keyword::Where)
                    if end == ExprEnd::Delegation =>
                {
                    true
                }
                kind if consumed && end != ExprEnd::Argument && self.cursor.newline_before() => {
                    DECL_START.contains(kind)
                        || kind == TokenKind::Keyword(Keyword::Get)
                        || kind == TokenKind::Keyword(Keyword::Set)
                }
                _ => false,
            };
            if stop {
                break;
            }

            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    if self.skip_group("expression").is_none() {
                        consumed = true;
                        break;
                    }
                }
                TokenKind::LAngle if consumed => {
                    if !self.skip_explicit_type_arguments() {
                        self.cursor.bump();
                    }
                }
                _ => {
                    self.cursor.bump();
                }
            }
            consumed = true;
        }

        consumed.then(|| self.cursor.span_from(start))
    }

    /// Consume `<...>` when it is a type argument list such as the one in
    /// `mapOf<K, V>()` or `x as Map<K, V>`
    ///
    /// Otherwise `<` is a comparison: nothing is consumed and no error is kept.
    fn skip_explicit_type_arguments(&mut self) -> bool {
        let checkpoint = self.cursor.checkpoint();
        let errors = self.errors.len();
        let mode = self.mode;

        let parsed = self.parse_type_arguments().is_some() && self.errors.len() == errors;
        let next = self.cursor.peek_kind();
        let followed = self.cursor.newline_before()
            || matches!(
                next,
                TokenKind::LParen
                    | TokenKind::ColonColon
                    | TokenKind::Dot
                    | TokenKind::SafeDot
                    | TokenKind::RParen
                    | TokenKind::Comma
                    | TokenKind::Question
                    | TokenKind::RBrace
                    | TokenKind::Semicolon
                    | TokenKind::Eof
            );
        if parsed && followed {
            return true;
        }

        self.cursor.reset(checkpoint);
        self.errors.truncate(errors);
        self.mode = mode;
        false
    }

    pub(crate) fn skip_statement(&mut self) -> Option<Span> {
        self.skip_expression(ExprEnd::Statement)
    }

    /// Parse a type and return its span
    pub(crate) fn parse_type(&mut self) -> Option<Span> {
        ensure_sufficient_stack(|| self.parse_type_inner())
    }

    fn parse_type_inner(&mut self) -> Option<Span> {
        let start = self.cursor.peek().offset;

        loop {
            if self.cursor.at(TokenKind::Annotation) {
                self.parse_annotation();
            } else if self.cursor.at_keyword(Keyword::Suspend)
                && matches!(self.cursor.nth(1).kind, TokenKind::LParen | TokenKind::Ident)
            {
                self.cursor.bump();
            } else {
                break;
            }
        }

        if self.cursor.at(TokenKind::LParen) {
            self.skip_group("function type")?;
        } else if self.cursor.at_name() {
            self.parse_user_type()?;
        } else {
            self.expected("type");
            return None;
        }

        while self.cursor.eat(TokenKind::Question) {}

        // Function type with receiver: `A.(B) -> C`
        if self.cursor.at(TokenKind::Dot) && self.cursor.nth(1).kind == TokenKind::LParen {
            self.cursor.bump();
            self.skip_group("function type")?;
        }

        if self.cursor.eat(TokenKind::Arrow) {
            self.parse_type()?;
        }

        Some(self.cursor.span_from(start))
    }

    /// `a.b.C<T>.D`
    fn parse_user_type(&mut self) -> Option<()> {
        loop {
            self.expect_name("type name")?;
            if self.cursor.at(TokenKind::LAngle) {
                self.parse_type_arguments()?;
            }
            if self.cursor.at(TokenKind::Dot) && self.cursor.nth(1).is_name() {
                self.cursor.bump();
                continue;
            }
            return Some(());
        }
    }

    /// `<A, out B, *>`
    pub(crate) fn parse_type_arguments(&mut self) -> Option<()> {
        self.cursor.bump();
        loop {
            if !self.cursor.eat(TokenKind::Star) {
                if (self.cursor.at_keyword(Keyword::In) || self.cursor.at_keyword(Keyword::Out))
                    && self.cursor.nth(1).kind != TokenKind::Comma
                    && self.cursor.nth(1).kind != TokenKind::RAngle
                {
                    self.cursor.bump();
                }
                self.parse_type()?;
            }
            if self.cursor.eat(TokenKind::Comma) {
                continue;
            }
            if self.cursor.eat(TokenKind::RAngle) {
                return Some(());
            }
            self.expected("`>`");
            return None;
        }
    }

    /// `<reified T : Comparable<T>, in U>`
    pub(crate) fn parse_type_parameters(&mut self) -> Vec<TypeParameter> {
        let mut params = Vec::new();
        if !self.cursor.eat(TokenKind::LAngle) {
            return params;
        }

        loop {
            let mut modifiers = Vec::new();
            loop {
                let token = self.cursor.peek();
                if token.kind == TokenKind::Annotation {
                    self.parse_annotation();
                } else if matches!(
                    token.kind,
                    TokenKind::Keyword(Keyword::Reified | Keyword::In | Keyword::Out)
                ) && self.cursor.nth(1).is_name()
                {
                    self.cursor.bump();
                    modifiers.push(token.text);
                } else {
                    break;
                }
            }

            let Some(name) = self.expect_name("type parameter name") else {
                return params;
            };
            let mut param = TypeParameter::new(name.name());
            for modifier in modifiers {
                param = param.with_modifier(modifier);
            }
            if self.cursor.eat(TokenKind::Colon) {
                match self.parse_type() {
                    Some(bound) => param = param.with_bound(self.text(bound)),
                    None => {
                        params.push(param);
                        return params;
                    }
                }
            }
            params.push(param);

            if self.cursor.eat(TokenKind::Comma) {
                if self.cursor.eat(TokenKind::RAngle) {
                    return params;
                }
                continue;
            }
            self.expect(TokenKind::RAngle, "`>`");
            return params;
        }
    }

    /// `where T : A, T : B`; bounds are merged into `params`
    pub(crate) fn parse_where_clause(&mut self, params: &mut [TypeParameter]) {
        if self.recovering() || !self.cursor.eat_keyword(Keyword::Where) {
            return;
        }
        loop {
            while self.cursor.at(TokenKind::Annotation) {
                self.parse_annotation();
            }
            let Some(name) = self.expect_name("type parameter name") else {
                return;
            };
            if !self.expect(TokenKind::Colon, "`:`") {
                return;
            }
            let Some(bound) = self.parse_type() else {
                return;
            };
            let bound = self.text(bound);
            if let Some(param) = params.iter_mut().find(|p| p.name == name.name()) {
                param.bound = Some(match param.bound.take() {
                    Some(existing) => format!("{} & {}", existing, bound),
                    None => bound,
                });
            }
            if !self.cursor.eat(TokenKind::Comma) {
                return;
            }
        }
    }

    /// Function or constructor parameters, starting at `(`
    pub(crate) fn parse_value_parameters(&mut self) -> Vec<Parameter> {
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

            let mut variadic = false;
            loop {
                let token = self.cursor.peek();
                match token.kind {
                    TokenKind::Annotation => {
                        self.parse_annotation();
                    }
                    TokenKind::Keyword(Keyword::Vararg) if self.cursor.nth(1).is_name() => {
                        self.cursor.bump();
                        variadic = true;
                    }
                    TokenKind::Keyword(Keyword::Noinline | Keyword::Crossinline)
                        if self.cursor.nth(1).is_name() =>
                    {
                        self.cursor.bump();
                    }
                    _ => break,
                }
            }

            let Some(name) = self.expect_name("parameter name") else {
                break;
            };
            let mut param = Parameter::new(name.name());
            if self.cursor.eat(TokenKind::Colon) {
                match self.parse_type() {
                    Some(ty) => param = param.with_type(self.text(ty)),
                    None => break,
                }
            }
            if self.cursor.eat(TokenKind::Eq) {
                match self.skip_expression(ExprEnd::Argument) {
                    Some(default) => param = param.with_default(self.text(default)),
                    None => {
                        self.expected("default value");
                        break;
                    }
                }
            }
            if variadic {
                param = param.variadic();
            }
            params.push(param);

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

    /// `[Receiver.]name` for functions and properties
    ///
    /// The receiver is everything up to the last `.` before the name; it may
    /// be dotted, generic, nullable or a parenthesized function type.
    pub(crate) fn parse_receiver_and_name(
        &mut self,
        what: &str,
    ) -> Option<(Option<String>, Token<'src>)> {
        let start = self.cursor.peek().offset;
        let mut receiver_end = None;

        if self.cursor.at(TokenKind::LParen) {
            self.skip_group("receiver type")?;
            if self.cursor.eat(TokenKind::Arrow) {
                self.parse_type()?;
            }
            while self.cursor.eat(TokenKind::Question) {}
            receiver_end = Some(self.cursor.prev_end());
            if !self.cursor.eat(TokenKind::Dot) {
                self.expected(what);
                return None;
            }
        }

        loop {
            let Some(name) = self.expect_name(what) else {
                return None;
            };
            let mut is_type = false;
            if self.cursor.at(TokenKind::LAngle) {
                self.parse_type_arguments()?;
                is_type = true;
            }
            while self.cursor.eat(TokenKind::Question) {
                is_type = true;
            }

            let next = self.cursor.peek();
            if next.kind == TokenKind::Dot && self.cursor.nth(1).is_name() {
                receiver_end = Some(self.cursor.prev_end());
                self.cursor.bump();
                continue;
            }
            if next.kind == TokenKind::SafeDot && self.cursor.nth(1).is_name() {
                // `String?.orEmpty` lexes `?.` as one token
                receiver_end = Some(next.offset + 1);
                self.cursor.bump();
                continue;
            }
            if is_type {
                self.expected(what);
                return None;
            }

            let receiver = receiver_end.map(|end| self.text(Span::new(start, end)));
            return Some((receiver, name));
        }
    }
}

fn closer_for(open: TokenKind) -> Option<TokenKind> {
    match open {
        TokenKind::LParen => Some(TokenKind::RParen),
        TokenKind::LBracket => Some(TokenKind::RBracket),
        TokenKind::LBrace => Some(TokenKind::RBrace),
        _ => None,
    }
}
