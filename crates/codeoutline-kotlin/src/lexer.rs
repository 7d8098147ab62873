//! Kotlin lexer built on logos.
//!
//! The lexer keeps trivia (whitespace, newlines, comments) as ordinary tokens
//! so the parser can see line breaks and the doc extractor can walk back over
//! comments. It is lazy and cheap to clone: cloning a lexer restarts from the
//! same position.
//!
//! Unrecognized input never stops lexing. The offending run of characters up
//! to the next whitespace or punctuation boundary becomes one
//! [`TokenKind::Invalid`] token and lexing resumes after it.

use crate::token::{Keyword, Token, TokenKind};
use logos::Logos;

/// Whether a string or comment found its closing delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closed {
    Yes,
    No,
}

/// Raw token from logos
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\f\r\x{FEFF}]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    // === Comments ===
    #[regex(r"//[^\n]*")]
    #[regex(r"#![^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment(Closed),

    // === Words ===
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    #[regex(r"`[^`\n]+`")]
    Ident,

    #[regex(r"@[\p{L}_][\p{L}\p{N}_]*(\.[\p{L}_][\p{L}\p{N}_]*)*(:[\p{L}_][\p{L}\p{N}_]*(\.[\p{L}_][\p{L}\p{N}_]*)*)?")]
    Annotation,

    // === Literals ===
    #[regex(r"[0-9][0-9_]*[uU]?[lL]?")]
    #[regex(r"0[xX][0-9a-fA-F_]+[uU]?[lL]?")]
    #[regex(r"0[bB][01_]+[uU]?[lL]?")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fF]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[fF]?")]
    #[regex(r"[0-9][0-9_]*[fF]")]
    Float,

    #[token("\"", string_literal)]
    Str(Closed),

    #[token("\"\"\"", raw_string_literal)]
    RawStr(Closed),

    #[regex(r"'(\\[^\n]|[^'\\\n])*'")]
    Char,

    // === Punctuation ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?.")]
    SafeDot,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Eq,
    #[token("->")]
    Arrow,
    #[token("?")]
    Question,
    #[token("?:")]
    Elvis,
    #[token("*")]
    Star,
    #[token("@")]
    At,

    #[token("==")]
    #[token("===")]
    #[token("!=")]
    #[token("!==")]
    #[token("<=")]
    #[token(">=")]
    #[token("!")]
    #[token("!!")]
    #[token("&&")]
    #[token("||")]
    #[token("+")]
    #[token("++")]
    #[token("+=")]
    #[token("-")]
    #[token("--")]
    #[token("-=")]
    #[token("*=")]
    #[token("/")]
    #[token("/=")]
    #[token("%")]
    #[token("%=")]
    #[token("..")]
    #[token("..<")]
    #[token("&")]
    #[token("|")]
    Operator,
}

impl RawToken {
    fn kind(self, text: &str) -> TokenKind {
        match self {
            RawToken::Whitespace => TokenKind::Whitespace,
            RawToken::Newline => TokenKind::Newline,
            RawToken::LineComment => TokenKind::LineComment,
            RawToken::BlockComment(Closed::No) => TokenKind::UnterminatedComment,
            RawToken::BlockComment(Closed::Yes) => {
                if text.starts_with("/**") && !text.starts_with("/**/") {
                    TokenKind::DocComment
                } else {
                    TokenKind::BlockComment
                }
            }
            RawToken::Ident => {
                Keyword::from_text(text).map_or(TokenKind::Ident, TokenKind::Keyword)
            }
            RawToken::Annotation => TokenKind::Annotation,
            RawToken::Int => TokenKind::IntLiteral,
            RawToken::Float => TokenKind::FloatLiteral,
            RawToken::Str(Closed::Yes) | RawToken::RawStr(Closed::Yes) => TokenKind::StringLiteral,
            RawToken::Str(Closed::No) | RawToken::RawStr(Closed::No) => {
                TokenKind::UnterminatedString
            }
            RawToken::Char => TokenKind::CharLiteral,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LAngle => TokenKind::LAngle,
            RawToken::RAngle => TokenKind::RAngle,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::SafeDot => TokenKind::SafeDot,
            RawToken::Colon => TokenKind::Colon,
            RawToken::ColonColon => TokenKind::ColonColon,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::Question => TokenKind::Question,
            RawToken::Elvis => TokenKind::Elvis,
            RawToken::Star => TokenKind::Star,
            RawToken::At => TokenKind::At,
            RawToken::Operator => TokenKind::Operator,
        }
    }
}

fn block_comment(lex: &mut logos::Lexer<RawToken>) -> Closed {
    let rest = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < rest.len() {
        match (rest[i], rest.get(i + 1)) {
            (b'/', Some(b'*')) => {
                depth += 1;
                i += 2;
            }
            (b'*', Some(b'/')) => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    lex.bump(i);
                    return Closed::Yes;
                }
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
    Closed::No
}

fn string_literal(lex: &mut logos::Lexer<RawToken>) -> Closed {
    let rest = lex.remainder().as_bytes();
    match scan_string(rest, 0) {
        Ok(end) => {
            lex.bump(end);
            Closed::Yes
        }
        Err(end) => {
            lex.bump(end);
            Closed::No
        }
    }
}

fn raw_string_literal(lex: &mut logos::Lexer<RawToken>) -> Closed {
    let rest = lex.remainder().as_bytes();
    match scan_raw_string(rest, 0) {
        Ok(end) => {
            lex.bump(end);
            Closed::Yes
        }
        Err(end) => {
            lex.bump(end);
            Closed::No
        }
    }
}

// The scanners below work on bytes. Every position they stop at is either
// just past an ASCII delimiter, at a newline, or at the end of input, so it
// is always a char boundary.

/// Scan a `"` string body starting after the opening quote.
///
/// Returns the offset just past the closing quote, or the offset where the
/// string was cut off (end of line or input).
fn scan_string(bytes: &[u8], mut i: usize) -> Result<usize, usize> {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Ok(i + 1),
            b'\n' => return Err(i),
            b'$' if bytes.get(i + 1) == Some(&b'{') => i = scan_template(bytes, i + 2)?,
            _ => i += 1,
        }
    }
    Err(bytes.len())
}

/// Scan a `"""` string body starting after the opening quotes
fn scan_raw_string(bytes: &[u8], mut i: usize) -> Result<usize, usize> {
    while i < bytes.len() {
        if bytes[i..].starts_with(b"\"\"\"") {
            // Extra quotes before the delimiter belong to the content
            let mut end = i + 3;
            while bytes.get(end) == Some(&b'"') {
                end += 1;
            }
            return Ok(end);
        }
        if bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{') {
            i = scan_template(bytes, i + 2)?;
        } else {
            i += 1;
        }
    }
    Err(bytes.len())
}

/// Scan a `${ ... }` template expression starting after `${`
fn scan_template(bytes: &[u8], mut i: usize) -> Result<usize, usize> {
    let mut depth = 1usize;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            b'"' => {
                i = if bytes[i..].starts_with(b"\"\"\"") {
                    scan_raw_string(bytes, i + 3)?
                } else {
                    scan_string(bytes, i + 1)?
                };
                continue;
            }
            b'\'' => {
                let mut j = i + 1;
                if bytes.get(j) == Some(&b'\\') {
                    j += 1;
                }
                j += 1;
                while j < bytes.len() && bytes[j] != b'\'' && bytes[j] != b'\n' {
                    j += 1;
                }
                i = j;
            }
            _ => {}
        }
        i += 1;
    }
    Err(bytes.len())
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || "{}()[]<>,.;:=?+-*/%!&|\"'@".contains(c)
}

/// End of an invalid run starting at `start`: at least one character, then up
/// to the next boundary
fn invalid_end(source: &str, start: usize) -> usize {
    let first = source[start..].chars().next().map_or(0, char::len_utf8);
    let rest = &source[start + first..];
    start + first + rest.find(is_boundary).unwrap_or(rest.len())
}

/// Lazy token iterator over Kotlin source
///
/// Yields every token including trivia, then exactly one
/// [`TokenKind::Eof`] token.
#[derive(Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, RawToken>,
    /// Offset of `inner`'s input within `source`
    base: usize,
    done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            inner: RawToken::lexer(source),
            base: 0,
            done: false,
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        if self.done {
            return None;
        }

        match self.inner.next() {
            Some(Ok(raw)) => {
                let span = self.inner.span();
                let start = self.base + span.start;
                let text = &self.source[start..self.base + span.end];
                Some(Token::new(raw.kind(text), text, start))
            }
            Some(Err(())) => {
                let start = self.base + self.inner.span().start;
                let end = invalid_end(self.source, start);
                self.inner = RawToken::lexer(&self.source[end..]);
                self.base = end;
                Some(Token::new(
                    TokenKind::Invalid,
                    &self.source[start..end],
                    start,
                ))
            }
            None => {
                self.done = true;
                Some(Token::new(TokenKind::Eof, "", self.source.len()))
            }
        }
    }
}

/// Lex the whole source, trivia included, ending with `Eof`
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).collect()
}
