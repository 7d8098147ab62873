//! Token cursor over significant tokens
//!
//! Trivia and invalid tokens stay in the underlying token list (the doc
//! extractor walks them) but the cursor steps over them. For every
//! significant token the cursor remembers whether a line break preceded it,
//! since Kotlin declarations end at newlines.

use crate::token::{Keyword, Span, Token, TokenKind};

/// Saved cursor position for backtracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pos: usize,
}

pub struct Cursor<'src> {
    tokens: Vec<Token<'src>>,
    /// Indices into `tokens` of significant tokens, ending with `Eof`
    significant: Vec<usize>,
    newline_before: Vec<bool>,
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(mut tokens: Vec<Token<'src>>) -> Self {
        // The lexer always ends with Eof; keep the invariant for hand-built lists
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let end = tokens.last().map_or(0, |t| t.end());
            tokens.push(Token::new(TokenKind::Eof, "", end));
        }

        let mut significant = Vec::new();
        let mut newline_before = Vec::new();
        let mut saw_newline = true;

        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Newline => saw_newline = true,
                kind if kind.is_trivia() || kind == TokenKind::Invalid => {
                    if token.text.contains('\n') {
                        saw_newline = true;
                    }
                }
                _ => {
                    significant.push(i);
                    newline_before.push(saw_newline);
                    saw_newline = false;
                }
            }
        }

        Self {
            tokens,
            significant,
            newline_before,
            pos: 0,
        }
    }

    /// All tokens, trivia included
    pub fn tokens(&self) -> &[Token<'src>] {
        &self.tokens
    }

    pub fn peek(&self) -> Token<'src> {
        self.nth(0)
    }

    /// `n`th significant token ahead; `Eof` past the end
    pub fn nth(&self, n: usize) -> Token<'src> {
        let idx = (self.pos + n).min(self.significant.len() - 1);
        self.tokens[self.significant[idx]]
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub fn at_keyword(&self, kw: Keyword) -> bool {
        self.at(TokenKind::Keyword(kw))
    }

    pub fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Current token can serve as a name
    pub fn at_name(&self) -> bool {
        self.peek().is_name()
    }

    /// A line break separates the current token from the previous one
    pub fn newline_before(&self) -> bool {
        let idx = self.pos.min(self.significant.len() - 1);
        self.newline_before[idx]
    }

    /// Index of the current token in [`Cursor::tokens`]
    pub fn raw_index(&self) -> usize {
        self.significant[self.pos.min(self.significant.len() - 1)]
    }

    /// End offset of the last consumed token
    pub fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.significant[self.pos - 1]].end()
        }
    }

    /// Consume the current token; `Eof` is never consumed
    pub fn bump(&mut self) -> Token<'src> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn eat_keyword(&mut self, kw: Keyword) -> bool {
        self.eat(TokenKind::Keyword(kw))
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint { pos: self.pos }
    }

    pub fn reset(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
    }

    /// Span from `start` to the end of the last consumed token
    pub fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }
}
