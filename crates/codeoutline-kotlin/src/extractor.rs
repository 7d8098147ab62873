//! Outline extraction for Kotlin source code

use codeoutline_parser_api::{ParseError, ParserConfig, SymbolOutline};
use tracing::{debug, instrument, warn};

use crate::parser::{parse_source, ParseOptions};
use crate::rules::RuleSet;
use crate::token::LineIndex;
use crate::visitor::OutlineVisitor;

pub(crate) const LANGUAGE: &str = "kotlin";

/// Build the symbol outline of one source
///
/// Sources larger than `config.max_file_size` are not parsed: the outline is
/// empty and the only error is `FileTooLarge`.
#[instrument(skip(source, config, rules), fields(bytes = source.len()))]
pub fn extract(
    source: &str,
    file_id: &str,
    config: &ParserConfig,
    rules: &RuleSet,
) -> (SymbolOutline, Vec<ParseError>) {
    let mut outline = SymbolOutline::new(file_id, LANGUAGE);

    if source.len() > config.max_file_size {
        warn!("Source too large: {} bytes", source.len());
        let error = ParseError::FileTooLarge {
            size: source.len(),
            max: config.max_file_size,
        };
        return (outline, vec![error]);
    }

    let (file, errors) = parse_source(source, rules, ParseOptions::from(config));
    debug!(
        declarations = file.declarations.len(),
        imports = file.header.imports.len(),
        "Parsed declarations"
    );

    let lines = LineIndex::new(source);
    let mut visitor = OutlineVisitor::new(source, &lines, config, outline);
    visitor.visit_file(&file);
    outline = visitor.outline;

    if errors.iter().any(|e| !e.is_warning()) {
        warn!(
            errors = errors.len(),
            partial = outline.partial_symbols().count(),
            "Source outlined with errors"
        );
    } else {
        debug!(symbols = outline.len(), warnings = errors.len(), "Source outlined");
    }

    (outline, errors)
}
