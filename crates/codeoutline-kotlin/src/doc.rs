//! Documentation comment extraction
//!
//! Docs are found by walking backward from a declaration's first token
//! (its first annotation or modifier, or the keyword itself). The walk skips
//! whitespace, newlines and ordinary comments and stops at the first code
//! token, so a doc comment is never taken from across another declaration.

use crate::token::{Token, TokenKind};

/// Backward cursor over a token slice
///
/// `Copy`, so a scan can fork at any point without disturbing the caller.
#[derive(Debug, Clone, Copy)]
pub struct BackCursor<'a, 'src> {
    tokens: &'a [Token<'src>],
    pos: usize,
}

impl<'a, 'src> BackCursor<'a, 'src> {
    /// Cursor positioned just before `tokens[pos]`
    pub fn new(tokens: &'a [Token<'src>], pos: usize) -> Self {
        Self {
            tokens,
            pos: pos.min(tokens.len()),
        }
    }

    /// Step back one token
    pub fn prev(&mut self) -> Option<&'a Token<'src>> {
        if self.pos == 0 {
            return None;
        }
        self.pos -= 1;
        Some(&self.tokens[self.pos])
    }
}

/// Doc for the declaration starting at `tokens[start]`
///
/// Returns the nearest `/** */` block. With `attach_line_comments`, falls back
/// to the ordinary comment block directly above the declaration.
pub fn doc_for(tokens: &[Token<'_>], start: usize, attach_line_comments: bool) -> Option<String> {
    if let Some(doc) = nearest_doc_comment(tokens, start) {
        let text = clean_block(doc.text);
        return (!text.is_empty()).then_some(text);
    }
    if attach_line_comments {
        return leading_comments(tokens, start);
    }
    None
}

/// Nearest doc comment before `start`, skipping trivia only
pub fn nearest_doc_comment<'a, 'src>(
    tokens: &'a [Token<'src>],
    start: usize,
) -> Option<&'a Token<'src>> {
    let mut cursor = BackCursor::new(tokens, start);
    while let Some(token) = cursor.prev() {
        match token.kind {
            TokenKind::DocComment => return Some(token),
            kind if kind.is_trivia() => continue,
            _ => return None,
        }
    }
    None
}

/// Ordinary comments directly above `start`, with no blank line between
fn leading_comments(tokens: &[Token<'_>], start: usize) -> Option<String> {
    let mut cursor = BackCursor::new(tokens, start);
    // Collected bottom-up
    let mut blocks: Vec<String> = Vec::new();
    let mut newlines = 0;

    while let Some(token) = cursor.prev() {
        match token.kind {
            TokenKind::Whitespace => {}
            TokenKind::Newline => {
                newlines += 1;
                if newlines > 1 {
                    break;
                }
            }
            TokenKind::LineComment => {
                blocks.push(clean_line(token.text));
                newlines = 0;
            }
            TokenKind::BlockComment => {
                blocks.push(clean_block(token.text));
                newlines = 0;
            }
            _ => {
                // A comment sharing a line with code belongs to that code
                if newlines == 0 {
                    blocks.pop();
                }
                break;
            }
        }
    }

    if blocks.is_empty() {
        return None;
    }
    blocks.reverse();
    let text = dedent(blocks.iter().flat_map(|b| b.lines()));
    (!text.is_empty()).then_some(text)
}

/// Strip `/**`, `/*`, `*/` and leading `*` markers, then dedent
pub fn clean_block(text: &str) -> String {
    let body = text
        .strip_prefix("/**")
        .or_else(|| text.strip_prefix("/*"))
        .unwrap_or(text);
    let body = body.strip_suffix("*/").unwrap_or(body);

    dedent(body.lines().map(|line| {
        let trimmed = line.trim_start();
        trimmed.strip_prefix('*').unwrap_or(line)
    }))
}

fn clean_line(text: &str) -> String {
    let body = text.strip_prefix("//").unwrap_or(text);
    body.trim_end().to_string()
}

/// Remove common indentation, trailing whitespace and blank edge lines
fn dedent<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    let lines: Vec<&str> = lines.map(str::trim_end).collect();
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let stripped: Vec<&str> = lines
        .iter()
        .map(|l| if l.len() >= indent { &l[indent..] } else { "" })
        .collect();

    let first = stripped.iter().position(|l| !l.is_empty());
    let last = stripped.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => stripped[first..=last].join("\n"),
        _ => String::new(),
    }
}
