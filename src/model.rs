//! Data model for the genome browser.
//!
//! This module contains the data structures shared by every layer:
//! - The genome being browsed and the RGB pixel type
//! - Application mode and the complete application state
//!
//! `AppState` owns the single set of view parameters and hands it by
//! reference to each view; there is no global state.

use std::path::Path;

use crate::config::{self, Config};
use crate::highlight::HighlightDisplay;
use crate::view::{NucleotideDisplay, View, ViewParams, MAX_SIZE};

/// An RGB color for one displayed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Creates a new color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A grey shade with the same value on all three channels.
    pub const fn grey(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Scales every channel by `num / den`.
    pub fn scaled(self, num: u16, den: u16) -> Self {
        let den = den.max(1);
        let f = |c: u8| ((u16::from(c) * num / den).min(255)) as u8;
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

/// The genome being browsed.
///
/// Stored as upper-case ASCII bytes; the highlight engine compares raw
/// bytes, so anything outside A/C/G/T simply never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    /// Identifier of the first FASTA record
    pub id: String,
    /// Number of FASTA records concatenated into this genome
    pub record_count: usize,
    data: Vec<u8>,
}

impl Genome {
    /// Creates a genome from a single record.
    pub fn new(id: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::from_records(id, data, 1)
    }

    /// Creates a genome from the concatenation of several records.
    pub fn from_records(id: impl Into<String>, data: impl Into<Vec<u8>>, record_count: usize) -> Self {
        let mut data = data.into();
        data.make_ascii_uppercase();
        Self {
            id: id.into(),
            record_count,
            data,
        }
    }

    /// Returns the genome length in nucleotides.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the genome is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the raw sequence bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Application mode for handling different input states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Command input mode (after pressing ':')
    Command(String),
}

/// Which view occupies the main panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Highlight,
    Nucleotide,
}

/// The complete application state.
#[derive(Debug)]
pub struct AppState {
    /// The loaded genome
    pub genome: Genome,
    /// Display name of the genome file
    pub file_name: String,
    /// View parameters shared by every view
    pub params: ViewParams,
    /// Sequence highlighter view
    pub highlight: HighlightDisplay,
    /// Plain nucleotide view
    pub nucleotide: NucleotideDisplay,
    /// View shown in the main panel
    pub active: ActiveView,
    /// Current application mode
    pub mode: AppMode,
    /// Whether the help overlay is shown
    pub show_help: bool,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Status message to display
    pub status_message: Option<String>,
}

impl AppState {
    /// Creates a new application state for a genome.
    pub fn new(genome: Genome, file_name: String, config: &Config) -> Self {
        Self {
            genome,
            file_name,
            params: ViewParams::from_config(&config.view),
            highlight: HighlightDisplay::new(&config.highlight),
            nucleotide: NucleotideDisplay::new(),
            active: ActiveView::Highlight,
            mode: AppMode::Normal,
            show_help: false,
            should_quit: false,
            status_message: None,
        }
    }

    /// Returns the view shown in the main panel.
    pub fn active_view(&self) -> &dyn View {
        match self.active {
            ActiveView::Highlight => &self.highlight,
            ActiveView::Nucleotide => &self.nucleotide,
        }
    }

    fn active_view_mut(&mut self) -> &mut dyn View {
        match self.active {
            ActiveView::Highlight => &mut self.highlight,
            ActiveView::Nucleotide => &mut self.nucleotide,
        }
    }

    /// Brings the active view up to date before drawing.
    ///
    /// Recomputation only happens when the view is invalid.
    pub fn refresh(&mut self) {
        let view: &mut dyn View = match self.active {
            ActiveView::Highlight => &mut self.highlight,
            ActiveView::Nucleotide => &mut self.nucleotide,
        };
        view.render_frame(&self.genome, &self.params);
    }

    /// Tells every view that the shared parameters changed.
    fn parameters_changed(&mut self) {
        self.highlight.on_parameters_changed();
        self.nucleotide.on_parameters_changed();
    }

    /// Fits the view parameters to the drawable pixel area.
    pub fn update_viewport_size(&mut self, pixel_rows: usize, pixel_cols: usize) {
        if self.params.fit(pixel_rows, pixel_cols) {
            self.parameters_changed();
        }
    }

    /// Scrolls by a number of display rows (negative scrolls back).
    pub fn scroll_rows(&mut self, rows: i64) {
        let delta = rows.saturating_mul(self.params.width() as i64);
        if self.params.shift_start(delta) {
            self.parameters_changed();
        }
    }

    /// Doubles the scale.
    pub fn zoom_out(&mut self) {
        let scale = self.params.scale().saturating_mul(2);
        self.set_scale(scale);
    }

    /// Halves the scale.
    pub fn zoom_in(&mut self) {
        let scale = (self.params.scale() / 2).max(1);
        self.set_scale(scale);
    }

    fn set_scale(&mut self, scale: usize) {
        if self.params.set_scale(scale) {
            self.parameters_changed();
        }
    }

    /// Grows or shrinks the row width by one scale step.
    pub fn change_width(&mut self, steps: i64) {
        let step = self.params.scale() as i64 * steps;
        let width = (self.params.width() as i64 + step).max(1) as usize;
        if self.params.set_width(width) {
            self.parameters_changed();
        }
    }

    /// Shifts the active view's private offset by a number of rows.
    pub fn shift_offset(&mut self, rows: i64) {
        let delta = rows.saturating_mul(self.params.width() as i64);
        let view = self.active_view_mut();
        let offset = view.offset().saturating_add(delta);
        view.set_offset(offset);
    }

    /// Switches the main panel between the two views.
    pub fn toggle_view(&mut self) {
        self.active = match self.active {
            ActiveView::Highlight => ActiveView::Nucleotide,
            ActiveView::Nucleotide => ActiveView::Highlight,
        };
    }

    /// Toggles reverse-complement search.
    pub fn toggle_reverse_complement(&mut self) {
        let enabled = !self.highlight.settings().reverse_complement;
        self.set_reverse_complement(enabled);
    }

    /// Turns reverse-complement search on or off and reports it.
    pub fn set_reverse_complement(&mut self, enabled: bool) {
        self.highlight.set_reverse_complement(enabled);
        self.status_message = Some(format!(
            "Reverse complement search {}",
            if enabled { "on" } else { "off" }
        ));
    }

    /// Toggles the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Hides the help overlay.
    pub fn dismiss_help(&mut self) {
        self.show_help = false;
    }

    /// Enters command mode.
    pub fn enter_command_mode(&mut self) {
        self.mode = AppMode::Command(String::new());
    }

    /// Handles a character input in command mode.
    pub fn command_input(&mut self, c: char) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.push(c);
        }
    }

    /// Handles backspace in command mode.
    pub fn command_backspace(&mut self) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.pop();
            if cmd.is_empty() {
                self.mode = AppMode::Normal;
            }
        }
    }

    /// Cancels command mode and returns to normal mode.
    pub fn cancel_command(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Executes the current command.
    pub fn execute_command(&mut self) {
        if let AppMode::Command(cmd) = std::mem::take(&mut self.mode) {
            self.run_command(cmd.trim());
        }
        self.mode = AppMode::Normal;
    }

    fn run_command(&mut self, cmd: &str) {
        let mut parts = cmd.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("");
        let rest = parts.next().map(str::trim).unwrap_or("");

        match name {
            "q" | "quit" => self.should_quit = true,
            "h" | "help" => self.show_help = true,
            "add" => {
                let index = if rest.is_empty() {
                    self.highlight.add_new_sequence()
                } else {
                    self.highlight.add_sequence(rest)
                };
                self.status_message = Some(format!("Added sequence {}", index + 1));
            }
            "edit" => match parse_index_and_text(rest) {
                Some((index, text)) if self.highlight.edit_sequence(index, text) => {
                    self.status_message = Some(format!("Edited sequence {}", index + 1));
                }
                _ => self.status_message = Some("Usage: edit <number> <sequence>".to_string()),
            },
            "rm" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 && self.highlight.remove_sequence(n - 1).is_some() => {
                    self.status_message = Some(format!("Removed sequence {}", n));
                }
                _ => self.status_message = Some(format!("No such sequence: {}", rest)),
            },
            "clear" => {
                self.highlight.clear_all_entries();
                self.status_message = Some("Cleared all sequences".to_string());
            }
            "open" => self.open_query_file(rest),
            "sim" => match rest.trim_end_matches('%').parse::<u8>() {
                Ok(pct) if config::similarity_in_range(pct) => {
                    self.highlight.set_percent_similarity(pct);
                    self.status_message = Some(format!("Minimum similarity {}%", pct));
                }
                _ => {
                    self.status_message = Some(format!(
                        "Similarity must be {}-{} (got {})",
                        config::MIN_SIMILARITY,
                        config::MAX_SIMILARITY,
                        rest
                    ));
                }
            },
            "rc" => match rest {
                "on" => self.set_reverse_complement(true),
                "off" => self.set_reverse_complement(false),
                "" => self.toggle_reverse_complement(),
                _ => self.status_message = Some("Usage: rc [on|off]".to_string()),
            },
            "scale" => match rest.parse::<usize>() {
                Ok(scale) if scale >= 1 => self.set_scale(scale),
                _ => self.status_message = Some(format!("Invalid scale: {}", rest)),
            },
            "width" => match rest.parse::<usize>() {
                Ok(width) if width >= 1 => {
                    if self.params.set_width(width) {
                        self.parameters_changed();
                    }
                }
                _ => self.status_message = Some(format!("Invalid width: {}", rest)),
            },
            "size" => match rest.parse::<usize>() {
                Ok(size) if size >= 1 && size <= MAX_SIZE => {
                    if self.params.set_size(size) {
                        self.parameters_changed();
                    }
                }
                _ => self.status_message = Some(format!("Invalid size: {}", rest)),
            },
            _ => {
                if let Ok(pos) = cmd.parse::<usize>() {
                    if pos > 0 && pos <= self.genome.len() {
                        if self.params.set_start(pos) {
                            self.parameters_changed();
                        }
                    } else {
                        self.status_message = Some(format!("Invalid position: {}", pos));
                    }
                } else {
                    self.status_message = Some(format!("Unknown command: {}", cmd));
                }
            }
        }
    }

    /// Replaces all queries with the contents of a query file.
    ///
    /// On failure the current queries are kept and the error is shown.
    pub fn open_query_file(&mut self, path: &str) {
        if path.is_empty() {
            self.status_message = Some("Usage: open <query file>".to_string());
            return;
        }
        self.status_message = Some(match self.highlight.open_query_file(Path::new(path)) {
            Ok(count) => format!("Searching {} entries in: {}", count, path),
            Err(e) => e.to_string(),
        });
    }
}

/// Splits "N TEXT" into a 0-based index and the text.
fn parse_index_and_text(args: &str) -> Option<(usize, &str)> {
    let mut parts = args.splitn(2, char::is_whitespace);
    let n = parts.next()?.parse::<usize>().ok()?;
    let text = parts.next().map(str::trim).unwrap_or("");
    n.checked_sub(1).map(|index| (index, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        let genome = Genome::new("chr1", "ACGTACGTACGTACGTACGTACGTACGTACGT");
        AppState::new(genome, "test.fa".to_string(), &Config::default())
    }

    fn run(state: &mut AppState, cmd: &str) {
        state.enter_command_mode();
        for c in cmd.chars() {
            state.command_input(c);
        }
        state.execute_command();
    }

    #[test]
    fn test_rgb_helpers() {
        assert_eq!(Rgb::grey(7), Rgb::new(7, 7, 7));
        assert_eq!(Rgb::new(200, 100, 0).scaled(1, 2), Rgb::new(100, 50, 0));
    }

    #[test]
    fn test_genome_is_uppercased() {
        let genome = Genome::new("g", "acgtN");
        assert_eq!(genome.as_bytes(), b"ACGTN");
        assert_eq!(genome.len(), 5);
    }

    #[test]
    fn test_initial_state_has_placeholder_query() {
        let state = test_state();
        assert_eq!(state.highlight.queries().len(), 1);
        assert_eq!(state.highlight.queries().get(0).unwrap().text, "AAAAAAAAAAAA");
        assert_eq!(state.active, ActiveView::Highlight);
    }

    #[test]
    fn test_query_commands() {
        let mut state = test_state();
        run(&mut state, "add ACGT");
        assert_eq!(state.highlight.queries().len(), 2);
        run(&mut state, "edit 2 TTTT");
        assert_eq!(state.highlight.queries().get(1).unwrap().text, "TTTT");
        run(&mut state, "rm 1");
        assert_eq!(state.highlight.queries().len(), 1);
        assert_eq!(state.highlight.queries().get(0).unwrap().text, "TTTT");
        run(&mut state, "rm 9");
        assert_eq!(state.status_message.as_deref(), Some("No such sequence: 9"));
        run(&mut state, "clear");
        assert!(state.highlight.queries().is_empty());
        assert_eq!(state.mode, AppMode::Normal);
    }

    #[test]
    fn test_similarity_command() {
        let mut state = test_state();
        run(&mut state, "sim 90");
        assert!((state.highlight.settings().percent_match - 0.9).abs() < 1e-9);
        run(&mut state, "sim 10");
        assert!((state.highlight.settings().percent_match - 0.9).abs() < 1e-9);
        assert!(state.status_message.unwrap().starts_with("Similarity must be"));
    }

    #[test]
    fn test_goto_and_quit_commands() {
        let mut state = test_state();
        run(&mut state, "5");
        assert_eq!(state.params.start(), 5);
        run(&mut state, "500");
        assert_eq!(state.status_message.as_deref(), Some("Invalid position: 500"));
        run(&mut state, "bogus");
        assert_eq!(state.status_message.as_deref(), Some("Unknown command: bogus"));
        run(&mut state, "q");
        assert!(state.should_quit);
    }

    #[test]
    fn test_open_missing_query_file_keeps_queries() {
        let mut state = test_state();
        run(&mut state, "open /definitely/not/here.txt");
        assert_eq!(state.highlight.queries().len(), 1);
        assert!(state.status_message.unwrap().contains("Could not read"));
    }

    #[test]
    fn test_toggles() {
        let mut state = test_state();
        assert!(state.highlight.settings().reverse_complement);
        state.toggle_reverse_complement();
        assert!(!state.highlight.settings().reverse_complement);
        state.toggle_view();
        assert_eq!(state.active, ActiveView::Nucleotide);
        state.toggle_view();
        assert_eq!(state.active, ActiveView::Highlight);
    }

    #[test]
    fn test_rc_command_reports_state() {
        let mut state = test_state();
        run(&mut state, "rc off");
        assert!(!state.highlight.settings().reverse_complement);
        assert_eq!(state.status_message.as_deref(), Some("Reverse complement search off"));
        run(&mut state, "rc on");
        assert!(state.highlight.settings().reverse_complement);
        assert_eq!(state.status_message.as_deref(), Some("Reverse complement search on"));
        run(&mut state, "rc");
        assert_eq!(state.status_message.as_deref(), Some("Reverse complement search off"));
    }

    #[test]
    fn test_size_command() {
        let mut state = test_state();
        state.refresh();
        assert!(state.highlight.is_up_to_date());
        run(&mut state, "size 640");
        assert_eq!(state.params.size(), 640);
        assert!(!state.highlight.is_up_to_date());
        run(&mut state, "size 0");
        assert_eq!(state.params.size(), 640);
        assert_eq!(state.status_message.as_deref(), Some("Invalid size: 0"));
    }

    #[test]
    fn test_scrolling_clamps_at_start() {
        let mut state = test_state();
        state.scroll_rows(-3);
        assert_eq!(state.params.start(), 1);
        state.scroll_rows(1);
        assert_eq!(state.params.start(), 1 + state.params.width());
    }

    #[test]
    fn test_shift_offset_only_moves_active_view() {
        let mut state = test_state();
        state.shift_offset(1);
        let width = state.params.width() as i64;
        assert_eq!(state.highlight.offset(), width);
        assert_eq!(state.nucleotide.offset(), 0);
    }
}
