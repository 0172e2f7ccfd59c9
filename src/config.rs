//! Runtime configuration.
//!
//! Built from the command line in `main` and handed to `AppState`. The
//! defaults mirror the startup values of the view dials and the
//! highlighter settings.

use thiserror::Error;

/// Lowest accepted minimum-similarity percentage.
pub const MIN_SIMILARITY: u8 = 20;
/// Highest accepted minimum-similarity percentage.
pub const MAX_SIMILARITY: u8 = 100;
/// Minimum similarity used when none is given.
pub const DEFAULT_SIMILARITY: u8 = 80;
/// Largest accepted scale (nucleotides per pixel).
pub const MAX_SCALE: usize = 100_000;
/// Query added when the first sequence is created without text.
pub const PLACEHOLDER_QUERY: &str = "AAAAAAAAAAAA";

/// Errors raised while validating configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Minimum similarity must be 20-100% (got {0})")]
    SimilarityOutOfRange(u8),

    #[error("Scale must be 1-100000 bp/pixel (got {0})")]
    ScaleOutOfRange(usize),

    #[error("{0} must be at least 1")]
    NotPositive(&'static str),
}

/// Returns true if a similarity percentage is accepted.
pub fn similarity_in_range(pct: u8) -> bool {
    (MIN_SIMILARITY..=MAX_SIMILARITY).contains(&pct)
}

/// Converts an integer similarity percentage to the match fraction.
pub fn percent_match(pct: u8) -> f64 {
    f64::from(pct) / 100.0
}

/// Settings of the sequence highlighter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    /// Minimum similarity in percent
    pub similarity: u8,
    /// Also search the reverse complement of every query
    pub reverse_complement: bool,
    /// Initial queries; when empty the placeholder query is used
    pub queries: Vec<String>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            similarity: DEFAULT_SIMILARITY,
            reverse_complement: true,
            queries: Vec::new(),
        }
    }
}

impl HighlightConfig {
    /// Replaces the initial queries with imported ones.
    ///
    /// Matches the bulk import of the viewer: an import never merges.
    pub fn import_queries(&mut self, queries: Vec<String>) {
        self.queries = queries;
    }
}

/// Initial values of the shared view dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    /// Nucleotides per display row
    pub width: usize,
    /// Nucleotides per pixel
    pub scale: usize,
    /// First visible position (1-based)
    pub start: usize,
    /// Number of visible nucleotides
    pub size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 128,
            scale: 1,
            start: 1,
            size: 10_000,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub highlight: HighlightConfig,
    pub view: ViewConfig,
}

impl Config {
    /// Checks every value against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !similarity_in_range(self.highlight.similarity) {
            return Err(ConfigError::SimilarityOutOfRange(self.highlight.similarity));
        }
        if self.view.scale == 0 || self.view.scale > MAX_SCALE {
            return Err(ConfigError::ScaleOutOfRange(self.view.scale));
        }
        for (name, value) in [
            ("Width", self.view.width),
            ("Start", self.view.start),
            ("Size", self.view.size),
        ] {
            if value == 0 {
                return Err(ConfigError::NotPositive(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.highlight.similarity, 80);
        assert!(config.highlight.reverse_complement);
        assert_eq!(config.view.width, 128);
        assert_eq!(config.view.size, 10_000);
    }

    #[test]
    fn test_similarity_range() {
        assert!(!similarity_in_range(19));
        assert!(similarity_in_range(20));
        assert!(similarity_in_range(100));
        assert!(!similarity_in_range(101));

        let mut config = Config::default();
        config.highlight.similarity = 10;
        assert_eq!(config.validate(), Err(ConfigError::SimilarityOutOfRange(10)));
    }

    #[test]
    fn test_view_validation() {
        let mut config = Config::default();
        config.view.scale = 0;
        assert_eq!(config.validate(), Err(ConfigError::ScaleOutOfRange(0)));

        let mut config = Config::default();
        config.view.width = 0;
        assert_eq!(config.validate(), Err(ConfigError::NotPositive("Width")));
    }

    #[test]
    fn test_imported_queries_replace_initial_ones() {
        let mut config = HighlightConfig {
            queries: vec!["GATTACA".to_string()],
            ..HighlightConfig::default()
        };
        config.import_queries(vec!["ACGT".to_string(), "TTTT".to_string()]);
        assert_eq!(config.queries, vec!["ACGT", "TTTT"]);
    }

    #[test]
    fn test_percent_match_conversion() {
        assert!((percent_match(80) - 0.8).abs() < 1e-12);
        assert!((percent_match(100) - 1.0).abs() < 1e-12);
    }
}
