//! Views and the parameters they share.
//!
//! Every view draws the same stretch of genome, described by one
//! `ViewParams` owned by the application state:
//! - `width`: nucleotides per display row
//! - `scale`: nucleotides per pixel
//! - `start`: first visible position (1-based)
//! - `size`: number of visible nucleotides
//!
//! Each view also carries its own signed offset from the shared start.

use log::debug;

use crate::config::{ViewConfig, MAX_SCALE};
use crate::model::{Genome, Rgb};
use crate::nucleotide::classic_color;

/// Widest row, in pixels, before the scale is adjusted along with the width.
pub const MAX_SANE_WIDTH: usize = 2000;
/// Largest accepted number of visible nucleotides.
pub const MAX_SIZE: usize = 400_000_000;

/// The stretch of genome a view computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    /// First position (1-based)
    pub start: usize,
    /// Nucleotides per pixel
    pub scale: usize,
    /// Number of nucleotides in the window
    pub display_size: usize,
}

impl ViewWindow {
    /// 0-based index of the first position.
    pub fn base(&self) -> usize {
        self.start.saturating_sub(1)
    }

    /// Number of pixels needed to show the window.
    pub fn pixel_count(&self) -> usize {
        self.display_size / self.scale.max(1)
    }
}

/// View parameters shared by all views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParams {
    width: usize,
    scale: usize,
    start: usize,
    size: usize,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

impl ViewParams {
    pub fn from_config(config: &ViewConfig) -> Self {
        Self {
            width: config.width.max(1),
            scale: config.scale.clamp(1, MAX_SCALE),
            start: config.start.max(1),
            size: config.size.max(1),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Pixels in one display row.
    pub fn pixels_per_row(&self) -> usize {
        (self.width / self.scale).max(1)
    }

    /// The window seen by a view with the given offset.
    pub fn window(&self, offset: i64) -> ViewWindow {
        let start = (self.start as i64).saturating_add(offset).max(1) as usize;
        ViewWindow {
            start,
            scale: self.scale,
            display_size: self.size,
        }
    }

    /// Changes the scale while keeping the pixel layout.
    ///
    /// The number of pixels per row and of visible pixels stay the same,
    /// so width and size grow or shrink with the scale. Returns true if
    /// anything changed.
    pub fn set_scale(&mut self, scale: usize) -> bool {
        let scale = scale.clamp(1, MAX_SCALE);
        if scale == self.scale {
            return false;
        }
        let display_width = (self.width / self.scale).max(1);
        let display_size = (self.size / self.scale).max(1);
        self.width = display_width * scale;
        self.size = (display_size * scale).min(MAX_SIZE);
        self.scale = scale;
        debug!("Scale {} bp/pixel, width {} bp, size {} bp", self.scale, self.width, self.size);
        true
    }

    /// Changes the row width.
    ///
    /// When the row would drop below one pixel or grow past
    /// `MAX_SANE_WIDTH` pixels, the scale follows the width
    /// proportionally. Returns true if anything changed.
    pub fn set_width(&mut self, width: usize) -> bool {
        let width = width.max(1);
        if width == self.width {
            return false;
        }
        let display_width = width / self.scale;
        if display_width < 1 || display_width > MAX_SANE_WIDTH {
            let ratio = width as f64 / self.width as f64;
            self.scale = ((self.scale as f64 * ratio) as usize).clamp(1, MAX_SCALE);
        }
        self.width = width;
        true
    }

    /// Moves the start, clamped to position 1. Returns true if it moved.
    pub fn set_start(&mut self, start: usize) -> bool {
        let start = start.max(1);
        let changed = start != self.start;
        self.start = start;
        changed
    }

    /// Moves the start by a signed amount, clamped to position 1.
    pub fn shift_start(&mut self, delta: i64) -> bool {
        let start = (self.start as i64).saturating_add(delta).max(1) as usize;
        self.set_start(start)
    }

    /// Sets the visible size; out-of-range values are ignored.
    pub fn set_size(&mut self, size: usize) -> bool {
        if size == self.size || size < 1 || size > MAX_SIZE {
            return false;
        }
        self.size = size;
        true
    }

    /// Fits width and size to a drawable area of pixels.
    pub fn fit(&mut self, pixel_rows: usize, pixel_cols: usize) -> bool {
        let cols = pixel_cols.max(1);
        let rows = pixel_rows.max(1);
        let width = cols * self.scale;
        let size = (rows * width).min(MAX_SIZE);
        let changed = width != self.width || size != self.size;
        self.width = width;
        self.size = size;
        changed
    }
}

/// One line of a view's settings panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingLine {
    pub label: String,
    pub value: String,
    /// Strong and near colors, for query entries
    pub swatch: Option<(Rgb, Rgb)>,
}

impl SettingLine {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            swatch: None,
        }
    }

    pub fn with_swatch(mut self, strong: Rgb, near: Rgb) -> Self {
        self.swatch = Some((strong, near));
        self
    }
}

/// Behavior shared by every view.
///
/// Views react to parameter changes by invalidating themselves and
/// recompute at most once per batch of changes, in `render_frame`.
pub trait View {
    /// Title shown above the view.
    fn name(&self) -> &'static str;

    /// Signed offset of this view from the shared start.
    fn offset(&self) -> i64;

    fn set_offset(&mut self, offset: i64);

    /// Called whenever the shared view parameters change.
    fn on_parameters_changed(&mut self);

    /// Brings the pixels up to date and returns them.
    fn render_frame(&mut self, genome: &Genome, params: &ViewParams) -> &[Rgb];

    /// Pixels of the last rendered frame.
    fn current_frame(&self) -> &[Rgb];

    /// Lines for the settings panel.
    fn settings_descriptor(&self) -> Vec<SettingLine>;
}

/// Plain view of the nucleotides, one color per base.
///
/// Zoomed out, each pixel is the average color of the bases it covers.
#[derive(Debug, Default)]
pub struct NucleotideDisplay {
    offset: i64,
    pixels: Vec<Rgb>,
    up_to_date: bool,
    last_window: Option<ViewWindow>,
}

impl NucleotideDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the colors of a window.
    pub fn compute(genome: &[u8], window: ViewWindow) -> Vec<Rgb> {
        let base = window.base().min(genome.len());
        let end = base.saturating_add(window.display_size).min(genome.len());
        let visible = &genome[base..end];
        let scale = window.scale.max(1);

        if scale == 1 {
            return visible.iter().map(|&b| classic_color(b)).collect();
        }

        visible
            .chunks_exact(scale)
            .map(|stride| {
                let (mut r, mut g, mut b) = (0usize, 0usize, 0usize);
                for &nt in stride {
                    let c = classic_color(nt);
                    r += usize::from(c.r);
                    g += usize::from(c.g);
                    b += usize::from(c.b);
                }
                Rgb::new((r / scale) as u8, (g / scale) as u8, (b / scale) as u8)
            })
            .collect()
    }
}

impl View for NucleotideDisplay {
    fn name(&self) -> &'static str {
        "Nucleotide Display"
    }

    fn offset(&self) -> i64 {
        self.offset
    }

    fn set_offset(&mut self, offset: i64) {
        if self.offset != offset {
            self.offset = offset;
            self.up_to_date = false;
        }
    }

    fn on_parameters_changed(&mut self) {
        self.up_to_date = false;
    }

    fn render_frame(&mut self, genome: &Genome, params: &ViewParams) -> &[Rgb] {
        let window = params.window(self.offset);
        if self.last_window != Some(window) {
            self.last_window = Some(window);
            self.up_to_date = false;
        }
        if !self.up_to_date {
            self.pixels = Self::compute(genome.as_bytes(), window);
            self.up_to_date = true;
        }
        &self.pixels
    }

    fn current_frame(&self) -> &[Rgb] {
        &self.pixels
    }

    fn settings_descriptor(&self) -> Vec<SettingLine> {
        vec![
            SettingLine::new("Palette", "classic"),
            SettingLine::new("A / C / G / T", "black / red / green / blue"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_from_params() {
        let params = ViewParams::default();
        let window = params.window(0);
        assert_eq!(window.start, 1);
        assert_eq!(window.base(), 0);
        assert_eq!(window.display_size, 10_000);
        assert_eq!(params.window(-50).start, 1);
        assert_eq!(params.window(9).start, 10);
    }

    #[test]
    fn test_pixel_count() {
        let window = ViewWindow {
            start: 1,
            scale: 3,
            display_size: 10,
        };
        assert_eq!(window.pixel_count(), 3);
    }

    #[test]
    fn test_set_scale_keeps_pixel_layout() {
        let mut params = ViewParams::default();
        assert!(params.set_scale(4));
        assert_eq!(params.scale(), 4);
        assert_eq!(params.width(), 128 * 4);
        assert_eq!(params.size(), 10_000 * 4);
        assert_eq!(params.pixels_per_row(), 128);
        assert!(!params.set_scale(4));
        // Clamped to at least 1
        assert!(params.set_scale(0));
        assert_eq!(params.scale(), 1);
    }

    #[test]
    fn test_set_width_rescales_when_insane() {
        let mut params = ViewParams::default();
        assert!(params.set_width(200));
        assert_eq!(params.scale(), 1);

        params.set_scale(10);
        assert_eq!(params.width(), 2000);
        // Width below one pixel pulls the scale down
        assert!(params.set_width(5));
        assert_eq!(params.scale(), 1);
        assert_eq!(params.width(), 5);
    }

    #[test]
    fn test_start_is_clamped() {
        let mut params = ViewParams::default();
        assert!(!params.set_start(0));
        assert_eq!(params.start(), 1);
        assert!(params.shift_start(99));
        assert_eq!(params.start(), 100);
        assert!(params.shift_start(-1000));
        assert_eq!(params.start(), 1);
    }

    #[test]
    fn test_size_range() {
        let mut params = ViewParams::default();
        assert!(!params.set_size(0));
        assert!(!params.set_size(MAX_SIZE + 1));
        assert!(params.set_size(500));
        assert_eq!(params.size(), 500);
        assert!(!params.set_size(500));
    }

    #[test]
    fn test_fit_to_area() {
        let mut params = ViewParams::default();
        params.set_scale(2);
        assert!(params.fit(10, 50));
        assert_eq!(params.width(), 100);
        assert_eq!(params.size(), 1000);
        assert_eq!(params.pixels_per_row(), 50);
        assert!(!params.fit(10, 50));
    }

    #[test]
    fn test_nucleotide_colors() {
        let window = ViewWindow {
            start: 2,
            scale: 1,
            display_size: 3,
        };
        let colors = NucleotideDisplay::compute(b"ACGTA", window);
        assert_eq!(colors, vec![classic_color(b'C'), classic_color(b'G'), classic_color(b'T')]);
    }

    #[test]
    fn test_nucleotide_compression_averages() {
        let window = ViewWindow {
            start: 1,
            scale: 2,
            display_size: 5,
        };
        // "CG" -> (127, 127, 0); trailing partial stride is dropped
        let colors = NucleotideDisplay::compute(b"CGTTA", window);
        assert_eq!(colors, vec![Rgb::new(127, 127, 0), Rgb::new(0, 0, 255)]);
    }

    #[test]
    fn test_nucleotide_view_is_lazy() {
        let genome = Genome::new("g", "ACGTACGT");
        let params = ViewParams::default();
        let mut view = NucleotideDisplay::new();
        assert_eq!(view.render_frame(&genome, &params).len(), 8);
        view.set_offset(4);
        assert_eq!(view.render_frame(&genome, &params).len(), 4);
        assert_eq!(view.current_frame().len(), 4);
    }
}
