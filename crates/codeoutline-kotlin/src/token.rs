//! Tokens produced by the Kotlin lexer

use codeoutline_parser_api::SourceRange;
use std::fmt;

/// Byte span into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Kotlin keywords, hard and soft
///
/// Soft keywords and modifier keywords are only keywords in context; the
/// parser accepts them as names wherever an identifier is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Keyword {
    // Hard keywords
    As,
    Break,
    Class,
    Continue,
    Do,
    Else,
    False,
    For,
    Fun,
    If,
    In,
    Interface,
    Is,
    Null,
    Object,
    Package,
    Return,
    Super,
    This,
    Throw,
    True,
    Try,
    Typealias,
    Typeof,
    Val,
    Var,
    When,
    While,

    // Soft keywords
    By,
    Catch,
    Constructor,
    Dynamic,
    Field,
    Finally,
    Get,
    Import,
    Init,
    Set,
    Where,

    // Modifier keywords
    Abstract,
    Actual,
    Annotation,
    Companion,
    Const,
    Crossinline,
    Data,
    Enum,
    Expect,
    External,
    Final,
    Infix,
    Inline,
    Inner,
    Internal,
    Lateinit,
    Noinline,
    Open,
    Operator,
    Out,
    Override,
    Private,
    Protected,
    Public,
    Reified,
    Sealed,
    Suspend,
    Tailrec,
    Value,
    Vararg,
}

impl Keyword {
    pub const COUNT: usize = Keyword::Vararg as usize + 1;

    pub fn from_text(text: &str) -> Option<Keyword> {
        let kw = match text {
            "as" => Keyword::As,
            "break" => Keyword::Break,
            "class" => Keyword::Class,
            "continue" => Keyword::Continue,
            "do" => Keyword::Do,
            "else" => Keyword::Else,
            "false" => Keyword::False,
            "for" => Keyword::For,
            "fun" => Keyword::Fun,
            "if" => Keyword::If,
            "in" => Keyword::In,
            "interface" => Keyword::Interface,
            "is" => Keyword::Is,
            "null" => Keyword::Null,
            "object" => Keyword::Object,
            "package" => Keyword::Package,
            "return" => Keyword::Return,
            "super" => Keyword::Super,
            "this" => Keyword::This,
            "throw" => Keyword::Throw,
            "true" => Keyword::True,
            "try" => Keyword::Try,
            "typealias" => Keyword::Typealias,
            "typeof" => Keyword::Typeof,
            "val" => Keyword::Val,
            "var" => Keyword::Var,
            "when" => Keyword::When,
            "while" => Keyword::While,
            "by" => Keyword::By,
            "catch" => Keyword::Catch,
            "constructor" => Keyword::Constructor,
            "dynamic" => Keyword::Dynamic,
            "field" => Keyword::Field,
            "finally" => Keyword::Finally,
            "get" => Keyword::Get,
            "import" => Keyword::Import,
            "init" => Keyword::Init,
            "set" => Keyword::Set,
            "where" => Keyword::Where,
            "abstract" => Keyword::Abstract,
            "actual" => Keyword::Actual,
            "annotation" => Keyword::Annotation,
            "companion" => Keyword::Companion,
            "const" => Keyword::Const,
            "crossinline" => Keyword::Crossinline,
            "data" => Keyword::Data,
            "enum" => Keyword::Enum,
            "expect" => Keyword::Expect,
            "external" => Keyword::External,
            "final" => Keyword::Final,
            "infix" => Keyword::Infix,
            "inline" => Keyword::Inline,
            "inner" => Keyword::Inner,
            "internal" => Keyword::Internal,
            "lateinit" => Keyword::Lateinit,
            "noinline" => Keyword::Noinline,
            "open" => Keyword::Open,
            "operator" => Keyword::Operator,
            "out" => Keyword::Out,
            "override" => Keyword::Override,
            "private" => Keyword::Private,
            "protected" => Keyword::Protected,
            "public" => Keyword::Public,
            "reified" => Keyword::Reified,
            "sealed" => Keyword::Sealed,
            "suspend" => Keyword::Suspend,
            "tailrec" => Keyword::Tailrec,
            "value" => Keyword::Value,
            "vararg" => Keyword::Vararg,
            _ => return None,
        };
        Some(kw)
    }

    /// Soft and modifier keywords may also be used as identifiers
    pub fn is_soft(self) -> bool {
        self as u8 >= Keyword::By as u8
    }

    /// Keywords that can appear in a declaration's modifier list
    pub fn is_modifier(self) -> bool {
        self as u8 >= Keyword::Abstract as u8
    }

    pub fn is_visibility(self) -> bool {
        matches!(
            self,
            Keyword::Public | Keyword::Private | Keyword::Protected | Keyword::Internal
        )
    }
}

/// Kind of a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Trivia
    Whitespace,
    Newline,
    LineComment,
    BlockComment,
    /// `/** ... */`
    DocComment,
    /// Block comment running to end of input
    UnterminatedComment,

    // Words
    Ident,
    Keyword(Keyword),

    // Literals
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    /// String literal running to end of line (or input, for raw strings)
    UnterminatedString,

    /// `@Name`, `@a.b.Name` or `@target:Name`
    Annotation,

    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LAngle,
    RAngle,
    Comma,
    Dot,
    SafeDot,
    Colon,
    ColonColon,
    Semicolon,
    Eq,
    Arrow,
    Question,
    Elvis,
    Star,
    /// Bare `@` (labels)
    At,
    /// Any other operator
    Operator,

    /// Unrecognized input
    Invalid,
    Eof,
}

impl TokenKind {
    /// Number of distinct values returned by [`TokenKind::index`]
    pub const INDEX_COUNT: usize = TokenKind::Eof.base_index() + 1 + Keyword::COUNT;

    const fn base_index(self) -> usize {
        match self {
            TokenKind::Whitespace => 0,
            TokenKind::Newline => 1,
            TokenKind::LineComment => 2,
            TokenKind::BlockComment => 3,
            TokenKind::DocComment => 4,
            TokenKind::UnterminatedComment => 5,
            TokenKind::Ident => 6,
            TokenKind::Keyword(_) => 7,
            TokenKind::IntLiteral => 8,
            TokenKind::FloatLiteral => 9,
            TokenKind::StringLiteral => 10,
            TokenKind::CharLiteral => 11,
            TokenKind::UnterminatedString => 12,
            TokenKind::Annotation => 13,
            TokenKind::LBrace => 14,
            TokenKind::RBrace => 15,
            TokenKind::LParen => 16,
            TokenKind::RParen => 17,
            TokenKind::LBracket => 18,
            TokenKind::RBracket => 19,
            TokenKind::LAngle => 20,
            TokenKind::RAngle => 21,
            TokenKind::Comma => 22,
            TokenKind::Dot => 23,
            TokenKind::SafeDot => 24,
            TokenKind::Colon => 25,
            TokenKind::ColonColon => 26,
            TokenKind::Semicolon => 27,
            TokenKind::Eq => 28,
            TokenKind::Arrow => 29,
            TokenKind::Question => 30,
            TokenKind::Elvis => 31,
            TokenKind::Star => 32,
            TokenKind::At => 33,
            TokenKind::Operator => 34,
            TokenKind::Invalid => 35,
            TokenKind::Eof => 36,
        }
    }

    /// Dense index, unique per kind and per keyword
    pub const fn index(self) -> usize {
        match self {
            TokenKind::Keyword(kw) => TokenKind::Eof.base_index() + 1 + kw as usize,
            other => other.base_index(),
        }
    }

    /// Whitespace, newlines and comments
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::DocComment
                | TokenKind::UnterminatedComment
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::DocComment
                | TokenKind::UnterminatedComment
        )
    }

    pub fn keyword(self) -> Option<Keyword> {
        match self {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }
}

/// A single token; `text` borrows from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub offset: usize,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, offset: usize) -> Self {
        Self { kind, text, offset }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    pub fn span(&self) -> Span {
        Span::new(self.offset, self.end())
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    /// Identifiers and soft keywords, i.e. anything usable as a name
    pub fn is_name(&self) -> bool {
        match self.kind {
            TokenKind::Ident => true,
            TokenKind::Keyword(kw) => kw.is_soft(),
            _ => false,
        }
    }

    /// Name with backticks removed
    pub fn name(&self) -> &'src str {
        self.text
            .strip_prefix('`')
            .and_then(|t| t.strip_suffix('`'))
            .unwrap_or(self.text)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of file"),
            TokenKind::Newline => f.write_str("newline"),
            _ => write!(f, "`{}`", self.text),
        }
    }
}

/// Maps byte offsets to 1-based line numbers
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    pub fn range(&self, span: Span) -> SourceRange {
        let last = if span.end > span.start {
            span.end - 1
        } else {
            span.start
        };
        SourceRange::new(span.start, span.end, self.line_of(span.start), self.line_of(last))
    }
}
