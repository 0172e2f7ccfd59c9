//! Approximate matching of one query against the visible window.
//!
//! Scoring is an early-exit linear scan at every offset, not an edit
//! distance: once the mismatch allowance is exceeded the remaining positions
//! are never compared, so the score is `scanned - mismatches`.

use super::PixelSignal;
use crate::view::ViewWindow;

/// Tolerance for floating point products such as `5 * 0.8`.
const EPSILON: f64 = 1e-9;

/// Number of mismatches a query of `query_len` may carry and still match.
///
/// `query_len - ceil(query_len * percent_match)`.
pub fn max_mismatches(query_len: usize, percent_match: f64) -> usize {
    let required = (query_len as f64 * percent_match - EPSILON).ceil().max(0.0) as usize;
    query_len.saturating_sub(required)
}

/// Lowest grey level that counts as a match: `floor(255 * percent_match)`.
pub fn match_minimum(percent_match: f64) -> u8 {
    (255.0 * percent_match + EPSILON).floor().clamp(0.0, 255.0) as u8
}

/// Grey level of a score: `floor(score / query_len * 255)`.
pub fn grey_level(score: u32, query_len: usize) -> u8 {
    if query_len == 0 {
        return 0;
    }
    (u64::from(score) * 255 / query_len as u64).min(255) as u8
}

/// Scans `query` against `target` until the mismatch allowance is exceeded.
///
/// Returns `(scanned, mismatches)`.
#[inline]
fn scan(target: &[u8], query: &[u8], max_mismatches: usize) -> (usize, usize) {
    let mut mismatches = 0;
    let mut scanned = 0;
    while mismatches <= max_mismatches && scanned < query.len() {
        if target[scanned] != query[scanned] {
            mismatches += 1;
        }
        scanned += 1;
    }
    (scanned, mismatches)
}

/// Offset and value of the first maximum in a stride.
fn best_in_stride(stride: &[u32]) -> (usize, u32) {
    let mut best = (0, 0);
    for (offset, &score) in stride.iter().enumerate() {
        if offset == 0 || score > best.1 {
            best = (offset, score);
        }
    }
    best
}

/// Scores queries against one window of a genome.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    genome: &'a [u8],
    window: ViewWindow,
    percent_match: f64,
}

impl<'a> Matcher<'a> {
    pub fn new(genome: &'a [u8], window: ViewWindow, percent_match: f64) -> Self {
        Self {
            genome,
            window,
            percent_match,
        }
    }

    /// Scores every alignment offset of `query` in the window.
    ///
    /// The result holds one score per offset for which the whole query
    /// still fits in the genome, so it can be shorter than the window.
    pub fn calculate(&self, query: &[u8]) -> Vec<u32> {
        let query_len = query.len();
        if query_len == 0 {
            return Vec::new();
        }

        let max_mismatches = max_mismatches(query_len, self.percent_match);
        let base = self.window.base();
        let fitting = self
            .genome
            .len()
            .saturating_sub(base)
            .saturating_sub(query_len - 1);
        let count = self.window.display_size.min(fitting);

        let mut scores = Vec::with_capacity(count);
        for h in 0..count {
            let target = &self.genome[base + h..base + h + query_len];
            let (scanned, mismatches) = scan(target, query, max_mismatches);
            scores.push((scanned - mismatches) as u32);
        }
        scores
    }

    /// Reduces the scores of `query` to one signal per pixel.
    ///
    /// A stride whose best score clears the similarity threshold starts a
    /// trail of `query_len` nucleotides; every pixel of the trail reports
    /// whether the genome agrees with the query character it lines up with.
    pub fn identify_matches(&self, query: &[u8]) -> Vec<PixelSignal> {
        let scores = self.calculate(query);
        let query_len = query.len();
        let scale = self.window.scale.max(1);
        let minimum = match_minimum(self.percent_match);
        let seq = self.genome.get(self.window.base()..).unwrap_or(&[]);

        let mut pixels = Vec::with_capacity(scores.len().div_ceil(scale));
        let mut remaining = 0usize;
        let mut offset = 0usize;

        for (index, stride) in scores.chunks(scale).enumerate() {
            let stride_start = index * scale;
            let (best_offset, best_score) = best_in_stride(stride);
            let grey = grey_level(best_score, query_len);
            let mut signal = PixelSignal::Grey(grey);

            if grey >= minimum {
                offset = best_offset;
                remaining = query_len;
            }

            if remaining >= 1 {
                let actual = seq.get(stride_start + offset);
                let expected = query.get(query_len - remaining);
                signal = match (actual, expected) {
                    (Some(a), Some(e)) if a == e => PixelSignal::StrongMatch,
                    _ => PixelSignal::NearMatch,
                };
                remaining = remaining.saturating_sub(scale);
            }

            pixels.push(signal);
        }

        pixels
    }
}
