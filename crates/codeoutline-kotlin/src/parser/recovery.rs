//! Error recovery for the declaration parser.
//!
//! After an unexpected token the parser switches into
//! [`RecoveryMode::Recovering`] and skips tokens until a synchronization
//! point at the nesting depth where the error happened.

use super::cursor::Cursor;
use crate::token::{Keyword, TokenKind};

/// A set of token kinds as a bitset over [`TokenKind::index`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TokenSet(u128);

impl TokenSet {
    pub const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u128 << kind.index()))
    }

    #[must_use]
    pub const fn with_keyword(self, kw: Keyword) -> Self {
        self.with(TokenKind::Keyword(kw))
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(&self, kind: TokenKind) -> bool {
        (self.0 & (1u128 << kind.index())) != 0
    }
}

/// Keywords that introduce a declaration
pub const DECL_KEYWORDS: TokenSet = TokenSet::new()
    .with_keyword(Keyword::Class)
    .with_keyword(Keyword::Interface)
    .with_keyword(Keyword::Object)
    .with_keyword(Keyword::Fun)
    .with_keyword(Keyword::Val)
    .with_keyword(Keyword::Var)
    .with_keyword(Keyword::Typealias)
    .with_keyword(Keyword::Constructor)
    .with_keyword(Keyword::Init)
    .with_keyword(Keyword::Import)
    .with_keyword(Keyword::Package);

/// Tokens that can begin a declaration's modifier list
pub const MODIFIER_START: TokenSet = TokenSet::new()
    .with(TokenKind::Annotation)
    .with_keyword(Keyword::Public)
    .with_keyword(Keyword::Private)
    .with_keyword(Keyword::Protected)
    .with_keyword(Keyword::Internal)
    .with_keyword(Keyword::Abstract)
    .with_keyword(Keyword::Open)
    .with_keyword(Keyword::Final)
    .with_keyword(Keyword::Override)
    .with_keyword(Keyword::Sealed)
    .with_keyword(Keyword::Data)
    .with_keyword(Keyword::Enum)
    .with_keyword(Keyword::Inner)
    .with_keyword(Keyword::Companion)
    .with_keyword(Keyword::Const)
    .with_keyword(Keyword::Lateinit)
    .with_keyword(Keyword::Inline)
    .with_keyword(Keyword::Suspend)
    .with_keyword(Keyword::Operator)
    .with_keyword(Keyword::Infix)
    .with_keyword(Keyword::Tailrec)
    .with_keyword(Keyword::External)
    .with_keyword(Keyword::Expect)
    .with_keyword(Keyword::Actual)
    .with_keyword(Keyword::Annotation);

/// Resynchronize here when found at the start of a line
pub const DECL_START: TokenSet = DECL_KEYWORDS.union(MODIFIER_START);

/// Parser error state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    #[default]
    Normal,
    /// An error was reported; the current declaration is abandoned at the
    /// next synchronization point
    Recovering,
}

/// Where [`synchronize`] stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPoint {
    /// Consumed a `;`
    Semicolon,
    /// Consumed the `}` closing a group opened while skipping
    GroupEnd,
    /// At the `}` closing the enclosing body (not consumed)
    EnclosingBrace,
    /// At a declaration start on a new line (not consumed)
    DeclarationStart,
    Eof,
}

/// Skip tokens until a synchronization point at the starting depth
///
/// Stops without consuming anything if the cursor is already at a
/// declaration start on a new line, at the enclosing `}` or at `Eof`; callers
/// guarantee progress.
pub fn synchronize(cursor: &mut Cursor<'_>, starts: TokenSet) -> SyncPoint {
    let mut depth = 0usize;

    loop {
        let token = cursor.peek();
        match token.kind {
            TokenKind::Eof => return SyncPoint::Eof,
            TokenKind::Semicolon if depth == 0 => {
                cursor.bump();
                return SyncPoint::Semicolon;
            }
            TokenKind::RBrace if depth == 0 => return SyncPoint::EnclosingBrace,
            TokenKind::RBrace => {
                cursor.bump();
                depth -= 1;
                if depth == 0 {
                    return SyncPoint::GroupEnd;
                }
            }
            TokenKind::LBrace => {
                cursor.bump();
                depth += 1;
            }
            kind if depth == 0 && cursor.newline_before() && starts.contains(kind) => {
                return SyncPoint::DeclarationStart;
            }
            _ => {
                cursor.bump();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn sync(source: &str) -> (SyncPoint, String) {
        let mut cursor = Cursor::new(tokenize(source));
        let point = synchronize(&mut cursor, DECL_START);
        (point, cursor.peek().text.to_string())
    }

    #[test]
    fn test_token_set() {
        let set = TokenSet::new()
            .with(TokenKind::Semicolon)
            .with_keyword(Keyword::Fun);
        assert!(set.contains(TokenKind::Semicolon));
        assert!(set.contains(TokenKind::Keyword(Keyword::Fun)));
        assert!(!set.contains(TokenKind::Keyword(Keyword::Val)));
        assert!(!set.contains(TokenKind::RBrace));
        assert!(!TokenSet::new().contains(TokenKind::Semicolon));
        assert!(DECL_START.contains(TokenKind::Annotation));
        assert!(DECL_START.contains(TokenKind::Keyword(Keyword::Class)));
    }

    #[test]
    fn test_sync_semicolon() {
        assert_eq!(sync("= 1 + 2; val x"), (SyncPoint::Semicolon, "val".to_string()));
    }

    #[test]
    fn test_sync_group_end() {
        assert_eq!(
            sync("= { a; { b } } fun f()"),
            (SyncPoint::GroupEnd, "fun".to_string())
        );
    }

    #[test]
    fn test_sync_enclosing_brace() {
        assert_eq!(sync("= 1 + }"), (SyncPoint::EnclosingBrace, "}".to_string()));
    }

    #[test]
    fn test_sync_declaration_start_on_new_line() {
        assert_eq!(
            sync("= oops fun\nprivate fun g()"),
            (SyncPoint::DeclarationStart, "private".to_string())
        );
    }

    #[test]
    fn test_sync_eof() {
        assert_eq!(sync("= ( 1"), (SyncPoint::Eof, String::new()));
    }
}
