//! Sequence highlighter.
//!
//! Displays a set of query sequences highlighted in their own colors. All
//! non-matching sequence is shown in grey according to how closely it
//! almost matched a query. Zoomed out (scale > 1), every match still
//! covers at least one pixel unless it collides with another query's
//! match.
//!
//! The work is split in two stages:
//! - `matcher`: scores one query (or its reverse complement) and reduces
//!   the scores to one `PixelSignal` per pixel
//! - `compositor`: merges the signals of all queries into colors
//!
//! `HighlightDisplay` owns the queries and settings, and recomputes the
//! pixels lazily: every mutation marks it dirty and the next display
//! request does the whole computation once.

pub mod compositor;
pub mod matcher;
pub mod query;

use std::path::Path;

use log::{debug, info, warn};

use crate::config::{self, HighlightConfig};
use crate::model::{Genome, Rgb};
use crate::nucleotide::reverse_complement;
use crate::view::{SettingLine, View, ViewParams, ViewWindow};

use compositor::combine;
use matcher::Matcher;
use query::{load_query_file, Query, QueryFileError, QueryRegistry};

/// Reduced match signal of one pixel for one query.
///
/// The variant order matches the numeric encoding used for composition:
/// grey levels 0-255, then near match (258), then strong match (260).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PixelSignal {
    /// No match; grey level from the best partial score
    Grey(u8),
    /// Inside a match trail, genome differs from the query here
    NearMatch,
    /// Inside a match trail, genome agrees with the query here
    StrongMatch,
}

impl PixelSignal {
    /// Values above this threshold are match codes.
    pub const MATCH_THRESHOLD: u16 = 256;

    /// Numeric encoding of the signal.
    pub fn code(self) -> u16 {
        match self {
            PixelSignal::Grey(v) => u16::from(v),
            PixelSignal::NearMatch => 258,
            PixelSignal::StrongMatch => 260,
        }
    }

    /// Returns true for near and strong matches.
    pub fn is_match(self) -> bool {
        self.code() > Self::MATCH_THRESHOLD
    }
}

impl Default for PixelSignal {
    fn default() -> Self {
        PixelSignal::Grey(0)
    }
}

/// User-adjustable highlighter settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightSettings {
    /// Minimum fraction of matching characters, in (0, 1]
    pub percent_match: f64,
    /// Also search the reverse complement of each query
    pub reverse_complement: bool,
}

/// The sequence highlighter view.
#[derive(Debug)]
pub struct HighlightDisplay {
    queries: QueryRegistry,
    settings: HighlightSettings,
    /// Signed offset of this view relative to the shared start
    offset: i64,
    output_pixels: Vec<Rgb>,
    up_to_date: bool,
    last_window: Option<ViewWindow>,
    frame_count: usize,
}

impl HighlightDisplay {
    /// Creates the highlighter with its initial queries.
    ///
    /// Without configured queries the placeholder query is added.
    pub fn new(config: &HighlightConfig) -> Self {
        let mut queries = QueryRegistry::new();
        if config.queries.is_empty() {
            queries.add_new();
        } else {
            for text in &config.queries {
                queries.add(text.as_str());
            }
        }

        Self {
            queries,
            settings: HighlightSettings {
                percent_match: config::percent_match(config.similarity),
                reverse_complement: config.reverse_complement,
            },
            offset: 0,
            output_pixels: Vec::new(),
            up_to_date: false,
            last_window: None,
            frame_count: 0,
        }
    }

    /// Marks the pixels as stale.
    pub fn invalidate(&mut self) {
        self.up_to_date = false;
    }

    pub fn is_up_to_date(&self) -> bool {
        self.up_to_date
    }

    /// Number of full recomputations so far.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn settings(&self) -> HighlightSettings {
        self.settings
    }

    pub fn queries(&self) -> &QueryRegistry {
        &self.queries
    }

    /// Sets the minimum similarity from an integer percentage.
    pub fn set_percent_similarity(&mut self, percent: u8) {
        let value = config::percent_match(percent);
        if self.settings.percent_match != value {
            self.settings.percent_match = value;
            self.invalidate();
        }
    }

    pub fn set_reverse_complement(&mut self, enabled: bool) {
        if self.settings.reverse_complement != enabled {
            self.settings.reverse_complement = enabled;
            self.invalidate();
        }
    }

    /// Adds a query (the placeholder if it is the first one).
    pub fn add_new_sequence(&mut self) -> usize {
        self.invalidate();
        self.queries.add_new()
    }

    pub fn add_sequence(&mut self, text: impl Into<String>) -> usize {
        self.invalidate();
        self.queries.add(text)
    }

    pub fn edit_sequence(&mut self, index: usize, text: impl Into<String>) -> bool {
        let edited = self.queries.edit(index, text);
        if edited {
            self.invalidate();
        }
        edited
    }

    pub fn remove_sequence(&mut self, index: usize) -> Option<Query> {
        let removed = self.queries.remove(index);
        if removed.is_some() {
            self.invalidate();
        }
        removed
    }

    pub fn clear_all_entries(&mut self) {
        self.queries.clear();
        self.invalidate();
    }

    /// Replaces every query with the given ones.
    pub fn import_queries(&mut self, queries: Vec<String>) -> usize {
        self.queries.clear();
        let count = queries.len();
        for text in queries {
            self.queries.add(text);
        }
        self.invalidate();
        count
    }

    /// Replaces every query with the contents of a query file.
    ///
    /// The file is read completely before anything is cleared, so a read
    /// failure leaves the current queries untouched.
    pub fn open_query_file(&mut self, path: &Path) -> Result<usize, QueryFileError> {
        info!("Searching entries in: {}", path.display());
        match load_query_file(path) {
            Ok(queries) => {
                let count = self.import_queries(queries);
                info!("Imported {} queries from {}", count, path.display());
                Ok(count)
            }
            Err(e) => {
                warn!("{}", e);
                Err(e)
            }
        }
    }

    /// Computes the pixel colors for one window, without caching.
    pub fn compute(&self, genome: &[u8], window: ViewWindow) -> Vec<Rgb> {
        let matcher = Matcher::new(genome, window, self.settings.percent_match);
        let paired = self.settings.reverse_complement;

        let owners: Vec<&Query> = self.queries.active().collect();
        let mut results = Vec::with_capacity(owners.len() * if paired { 2 } else { 1 });
        for query in &owners {
            results.push(matcher.identify_matches(query.text.as_bytes()));
            if paired {
                let reversed = reverse_complement(&query.text);
                results.push(matcher.identify_matches(&reversed));
            }
        }

        combine(&results, &owners, paired, window.pixel_count())
    }

    /// Returns the pixels for a window, recomputing only when stale.
    pub fn display(&mut self, genome: &[u8], window: ViewWindow) -> &[Rgb] {
        if self.last_window != Some(window) {
            self.last_window = Some(window);
            self.up_to_date = false;
        }
        if !self.up_to_date {
            self.output_pixels = self.compute(genome, window);
            self.up_to_date = true;
            self.frame_count += 1;
            debug!(
                "Highlight recomputed: {} queries, start {}, scale {}, {} pixels",
                self.queries.active().count(),
                window.start,
                window.scale,
                self.output_pixels.len()
            );
        }
        &self.output_pixels
    }
}

impl View for HighlightDisplay {
    fn name(&self) -> &'static str {
        "Sequence Highlighter"
    }

    fn offset(&self) -> i64 {
        self.offset
    }

    fn set_offset(&mut self, offset: i64) {
        if self.offset != offset {
            self.offset = offset;
            self.invalidate();
        }
    }

    fn on_parameters_changed(&mut self) {
        self.invalidate();
    }

    fn render_frame(&mut self, genome: &Genome, params: &ViewParams) -> &[Rgb] {
        let window = params.window(self.offset);
        self.display(genome.as_bytes(), window)
    }

    fn current_frame(&self) -> &[Rgb] {
        &self.output_pixels
    }

    fn settings_descriptor(&self) -> Vec<SettingLine> {
        let mut lines = vec![
            SettingLine::new(
                "Minimum similarity",
                format!("{:.0}%", self.settings.percent_match * 100.0),
            ),
            SettingLine::new(
                "Reverse complement",
                if self.settings.reverse_complement { "on" } else { "off" },
            ),
        ];
        for query in self.queries.iter() {
            lines.push(
                SettingLine::new(query.label.clone(), query.text.clone())
                    .with_swatch(query.strong_color, query.near_color),
            );
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display_with(queries: &[&str], reverse_complement: bool) -> HighlightDisplay {
        HighlightDisplay::new(&HighlightConfig {
            similarity: 80,
            reverse_complement,
            queries: queries.iter().map(|q| q.to_string()).collect(),
        })
    }

    fn window(display_size: usize) -> ViewWindow {
        ViewWindow {
            start: 1,
            scale: 1,
            display_size,
        }
    }

    #[test]
    fn test_signal_encoding_order() {
        assert!(PixelSignal::Grey(255) < PixelSignal::NearMatch);
        assert!(PixelSignal::NearMatch < PixelSignal::StrongMatch);
        assert!(PixelSignal::Grey(3) < PixelSignal::Grey(4));
        assert_eq!(PixelSignal::NearMatch.code(), 258);
        assert_eq!(PixelSignal::StrongMatch.code(), 260);
        assert!(!PixelSignal::Grey(255).is_match());
        assert!(PixelSignal::NearMatch.is_match());
    }

    #[test]
    fn test_placeholder_query_by_default() {
        let display = HighlightDisplay::new(&HighlightConfig::default());
        assert_eq!(display.queries().len(), 1);
        assert_eq!(display.queries().get(0).unwrap().text, config::PLACEHOLDER_QUERY);
    }

    #[test]
    fn test_exact_prefix_colors_query_length() {
        let genome = b"AATCGATCGTACGCTACGATCGCTACGCAGCTAGGACGGATT";
        let query = "AATCGATCGTACG";
        let display = display_with(&[query], false);
        let strong = display.queries().get(0).unwrap().strong_color;
        let colors = display.compute(genome, window(genome.len()));
        assert!(colors[..query.len()].iter().all(|&c| c == strong));
    }

    #[test]
    fn test_reverse_complement_hit() {
        // Genome carries the reverse complement of the query
        let query = "GATTACAGGC";
        let rc = String::from_utf8(reverse_complement(query)).unwrap();
        let genome = format!("CCCCCC{}CCCCCCCCCC", rc);
        let strong = display_with(&[query], true).queries().get(0).unwrap().strong_color;

        let with_rc = display_with(&[query], true).compute(genome.as_bytes(), window(genome.len()));
        assert_eq!(with_rc[6], strong);

        let without_rc = display_with(&[query], false).compute(genome.as_bytes(), window(genome.len()));
        assert_ne!(without_rc[6], strong);
    }

    #[test]
    fn test_reverse_pass_keeps_query_length() {
        // Multi-byte characters must not change the length of the reverse pass
        let genome = b"GATTACAGATTACAGATTACA";
        let query = "GATTé";
        let matcher = Matcher::new(genome, window(genome.len()), 0.8);
        let forward = matcher.calculate(query.as_bytes());
        let reverse = matcher.calculate(&reverse_complement(query));
        assert_eq!(forward.len(), genome.len() - (query.len() - 1));
        assert_eq!(reverse.len(), forward.len());
    }

    #[test]
    fn test_empty_queries_are_skipped() {
        let genome = b"ACGTACGTACGTACGTACGT";
        let display = display_with(&["", "ACGTACGT"], true);
        let second = display.queries().get(1).unwrap().strong_color;
        let colors = display.compute(genome, window(genome.len()));
        // The empty first query must not shift color ownership
        assert_eq!(colors[0], second);
    }

    #[test]
    fn test_lazy_recompute() {
        let genome = Genome::new("g", "ACGTACGTACGTACGTACGTAAAAAAAAAAAA");
        let params = ViewParams::default();
        let mut display = HighlightDisplay::new(&HighlightConfig::default());

        display.render_frame(&genome, &params);
        display.render_frame(&genome, &params);
        assert_eq!(display.frame_count(), 1);

        display.add_sequence("ACGT");
        display.edit_sequence(1, "ACGA");
        assert!(!display.is_up_to_date());
        display.render_frame(&genome, &params);
        assert_eq!(display.frame_count(), 2);

        // Same value does not invalidate
        display.set_percent_similarity(80);
        display.render_frame(&genome, &params);
        assert_eq!(display.frame_count(), 2);

        display.set_percent_similarity(90);
        display.render_frame(&genome, &params);
        assert_eq!(display.frame_count(), 3);

        // A different window recomputes as well
        display.set_offset(4);
        display.render_frame(&genome, &params);
        assert_eq!(display.frame_count(), 4);
    }

    #[test]
    fn test_no_queries_gives_black_window() {
        let mut display = display_with(&[], true);
        display.clear_all_entries();
        let colors = display.compute(b"ACGTACGT", window(8));
        assert_eq!(colors, vec![Rgb::grey(0); 8]);
    }

    #[test]
    fn test_settings_descriptor_lists_queries() {
        let display = display_with(&["ACGT", "TTTT"], false);
        let lines = display.settings_descriptor();
        assert_eq!(lines[0].value, "80%");
        assert_eq!(lines[1].value, "off");
        assert_eq!(lines[2].label, "Sequence 1");
        assert_eq!(lines[3].value, "TTTT");
        assert!(lines[3].swatch.is_some());
    }
}
