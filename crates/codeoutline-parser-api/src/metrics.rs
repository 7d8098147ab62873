use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metrics collected during parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserMetrics {
    /// Total sources outlined
    pub files_attempted: usize,

    /// Sources outlined without errors (warnings allowed)
    pub files_clean: usize,

    /// Sources that produced at least one lex or parse error
    pub files_with_errors: usize,

    /// Total time spent parsing
    #[serde(with = "duration_serde")]
    pub total_parse_time: Duration,

    /// Total symbols emitted
    pub total_symbols: usize,

    /// Total errors and warnings reported
    pub total_errors: usize,
}

// Helper module for serializing Duration
pub(crate) mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_micros() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros: u64 = u64::deserialize(deserializer)?;
        Ok(Duration::from_micros(micros))
    }
}

impl Default for ParserMetrics {
    fn default() -> Self {
        Self {
            files_attempted: 0,
            files_clean: 0,
            files_with_errors: 0,
            total_parse_time: Duration::ZERO,
            total_symbols: 0,
            total_errors: 0,
        }
    }
}

impl ParserMetrics {
    /// Record one outlined source
    pub fn record(&mut self, clean: bool, duration: Duration, symbols: usize, errors: usize) {
        self.files_attempted += 1;
        if clean {
            self.files_clean += 1;
        } else {
            self.files_with_errors += 1;
        }
        self.total_parse_time += duration;
        self.total_symbols += symbols;
        self.total_errors += errors;
    }

    /// Share of sources without errors (0.0 to 1.0)
    pub fn clean_rate(&self) -> f64 {
        if self.files_attempted == 0 {
            0.0
        } else {
            self.files_clean as f64 / self.files_attempted as f64
        }
    }

    /// Average parse time per file
    pub fn avg_parse_time(&self) -> Duration {
        if self.files_attempted == 0 {
            Duration::ZERO
        } else {
            self.total_parse_time / self.files_attempted as u32
        }
    }

    /// Average symbols per file
    pub fn avg_symbols_per_file(&self) -> f64 {
        if self.files_attempted == 0 {
            0.0
        } else {
            self.total_symbols as f64 / self.files_attempted as f64
        }
    }

    /// Merge another metrics object into this one
    pub fn merge(&mut self, other: &ParserMetrics) {
        self.files_attempted += other.files_attempted;
        self.files_clean += other.files_clean;
        self.files_with_errors += other.files_with_errors;
        self.total_parse_time += other.total_parse_time;
        self.total_symbols += other.total_symbols;
        self.total_errors += other.total_errors;
    }
}
