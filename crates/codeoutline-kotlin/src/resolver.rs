//! Modifier and annotation resolution
//!
//! Turns raw modifier keywords and annotation markers into the structured
//! [`Modifier`] and [`Annotation`] types and reports modifier combinations
//! that Kotlin rejects as structural warnings.

use crate::token::{LineIndex, Span, Token};
use codeoutline_parser_api::{Annotation, Binding, Modifier, ParseError};

/// Modifier keyword as written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawModifier<'src> {
    pub text: &'src str,
    pub span: Span,
}

pub struct Resolver<'a> {
    lines: &'a LineIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(lines: &'a LineIndex) -> Self {
        Self { lines }
    }

    /// Resolve a modifier list, warning on repeats and visibility conflicts
    pub fn modifiers(&self, raw: &[RawModifier<'_>], errors: &mut Vec<ParseError>) -> Vec<Modifier> {
        let mut resolved: Vec<Modifier> = Vec::with_capacity(raw.len());
        for modifier in raw {
            let resolved_modifier = Modifier::from_keyword(modifier.text);

            if resolved.contains(&resolved_modifier) {
                errors.push(ParseError::warning(
                    format!("Repeated modifier `{}`", modifier.text),
                    self.lines.range(modifier.span),
                ));
                continue;
            }

            if resolved_modifier.is_visibility() {
                if let Some(existing) = resolved.iter().find(|m| m.is_visibility()) {
                    errors.push(ParseError::warning(
                        format!(
                            "Conflicting visibility modifiers `{}` and `{}`",
                            existing, resolved_modifier
                        ),
                        self.lines.range(modifier.span),
                    ));
                }
            }

            resolved.push(resolved_modifier);
        }
        resolved
    }

    /// Build an annotation from its `@` marker and optional argument text
    ///
    /// `arguments` is the text between the parentheses.
    pub fn annotation(&self, marker: &Token<'_>, arguments: Option<&str>, span: Span) -> Annotation {
        let text = marker.text.trim_start_matches('@');
        let mut annotation = match text.split_once(':') {
            Some((target, name)) => {
                Annotation::new(name, self.lines.range(span)).with_target(target)
            }
            None => Annotation::new(text, self.lines.range(span)),
        };
        if let Some(args) = arguments {
            annotation = annotation.with_arguments(normalize_whitespace(args));
        }
        annotation
    }

    /// Warn on class modifier combinations Kotlin rejects
    pub fn check_class(&self, modifiers: &[Modifier], span: Span, errors: &mut Vec<ParseError>) {
        if !modifiers.contains(&Modifier::Data) {
            return;
        }
        for conflicting in [
            Modifier::Abstract,
            Modifier::Open,
            Modifier::Sealed,
            Modifier::Inner,
        ] {
            if modifiers.contains(&conflicting) {
                errors.push(ParseError::warning(
                    format!("Modifier `data` cannot be combined with `{}`", conflicting),
                    self.lines.range(span),
                ));
            }
        }
    }

    /// Warn on property modifiers that contradict `val`/`var`
    pub fn check_property(
        &self,
        binding: Binding,
        modifiers: &[Modifier],
        span: Span,
        errors: &mut Vec<ParseError>,
    ) {
        let mut warn = |message: String| {
            errors.push(ParseError::warning(message, self.lines.range(span)));
        };

        match binding {
            Binding::Var => {
                if modifiers.contains(&Modifier::Const) {
                    warn("Modifier `const` is not applicable to `var`".to_string());
                }
            }
            Binding::Val => {
                if modifiers.contains(&Modifier::Lateinit) {
                    warn("Modifier `lateinit` is not applicable to `val`".to_string());
                }
                for setter in modifiers.iter().filter(|m| is_setter_visibility(m)) {
                    warn(format!("Setter visibility `{}` on a `val`", setter));
                }
            }
        }
    }
}

/// Property-level modifier for a visibility written on a setter
pub fn setter_modifier(visibility: &Modifier) -> Option<Modifier> {
    match visibility {
        Modifier::Private => Some(Modifier::PrivateSet),
        Modifier::Protected => Some(Modifier::ProtectedSet),
        Modifier::Internal => Some(Modifier::InternalSet),
        _ => None,
    }
}

fn is_setter_visibility(modifier: &Modifier) -> bool {
    matches!(
        modifier,
        Modifier::PrivateSet | Modifier::ProtectedSet | Modifier::InternalSet
    )
}

/// Collapse runs of whitespace to single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
