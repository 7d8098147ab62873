//! Implementation of the OutlineParser trait for Kotlin

use codeoutline_parser_api::{
    BatchOutput, OutlineParser, ParseOutput, ParserConfig, ParserError, ParserMetrics,
    ParserResult, SourceFile,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, instrument};

use crate::extractor::{self, LANGUAGE};
use crate::rules::{DeclarationRule, RuleSet};

/// Kotlin outline parser implementing the OutlineParser trait
pub struct KotlinParser {
    config: ParserConfig,
    metrics: Mutex<ParserMetrics>,
    rules: RuleSet,
}

impl KotlinParser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            metrics: Mutex::new(ParserMetrics::default()),
            rules: RuleSet::default(),
        }
    }

    /// Register a declaration rule; it takes precedence over earlier rules
    /// with the same trigger
    pub fn with_rule(mut self, rule: impl DeclarationRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    fn lock_metrics(&self) -> MutexGuard<'_, ParserMetrics> {
        // Metrics stay usable even if a panicking thread held the lock
        self.metrics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn update_metrics(&self, output: &ParseOutput) {
        self.lock_metrics().record(
            !output.has_errors(),
            output.parse_time,
            output.outline.len(),
            output.errors.len(),
        );
    }
}

impl Default for KotlinParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineParser for KotlinParser {
    fn language(&self) -> &str {
        LANGUAGE
    }

    fn file_extensions(&self) -> &[&str] {
        &[".kt", ".kts"]
    }

    fn parse(&self, source: &str, file_id: &str) -> ParseOutput {
        let start = Instant::now();
        let (outline, errors) = extractor::extract(source, file_id, &self.config, &self.rules);

        let mut output = ParseOutput::new(outline, errors);
        output.parse_time = start.elapsed();
        self.update_metrics(&output);

        output
    }

    fn parse_batch(&self, files: &[SourceFile]) -> ParserResult<BatchOutput> {
        if self.config.parallel {
            self.parse_batch_parallel(files)
        } else {
            self.parse_batch_sequential(files)
        }
    }

    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn metrics(&self) -> ParserMetrics {
        self.lock_metrics().clone()
    }

    fn reset_metrics(&mut self) {
        *self.lock_metrics() = ParserMetrics::default();
    }
}

impl KotlinParser {
    /// Parse sources one after another
    fn parse_batch_sequential(&self, files: &[SourceFile]) -> ParserResult<BatchOutput> {
        let outputs = files
            .iter()
            .map(|file| self.parse(&file.text, &file.id))
            .collect();
        Ok(BatchOutput::from_outputs(outputs))
    }

    /// Parse sources in parallel using rayon; output order matches input order
    #[instrument(skip_all, fields(files = files.len()))]
    fn parse_batch_parallel(&self, files: &[SourceFile]) -> ParserResult<BatchOutput> {
        use rayon::prelude::*;

        self.config.validate()?;

        // Configure thread pool if parallel_workers is specified
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(num_threads) = self.config.parallel_workers {
            builder = builder.num_threads(num_threads);
        }
        let pool = builder
            .build()
            .map_err(|e| ParserError::ThreadPool(e.to_string()))?;

        let outputs: Vec<ParseOutput> = pool.install(|| {
            files
                .par_iter()
                .map(|file| self.parse(&file.text, &file.id))
                .collect()
        });

        let batch = BatchOutput::from_outputs(outputs);
        debug!(
            symbols = batch.total_symbols,
            errors = batch.total_errors,
            "Batch parsed"
        );
        Ok(batch)
    }
}
