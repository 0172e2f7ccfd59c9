//! Application controller.
//!
//! Ties the terminal session to the application state:
//! - `TerminalSession` holds raw mode and the alternate screen
//! - `dispatch` feeds one terminal event to the state
//! - `App::run` refreshes the active view, draws, then waits for input

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::event::{apply_action, handle_event, poll_event, Action};
use crate::model::AppState;
use crate::ui::{calculate_visible_dimensions, render};

/// Terminal in raw mode on the alternate screen, restored on drop.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn open() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    /// Drawable `(pixel_rows, pixel_cols)` for the current terminal size.
    fn pixel_area(&self) -> Result<(usize, usize)> {
        let size = self.terminal.size()?;
        Ok(calculate_visible_dimensions(size.width, size.height))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Applies one terminal event to the state.
///
/// A resize refits the view parameters to the new pixel area. Returns
/// `false` once the viewer should close.
pub fn dispatch(state: &mut AppState, event: Event) -> bool {
    let action = handle_event(event, &state.mode, state.show_help);
    if let Action::Resize(width, height) = action {
        let (pixel_rows, pixel_cols) = calculate_visible_dimensions(width, height);
        debug!("Terminal resized to {}x{} ({}x{} pixels)", width, height, pixel_cols, pixel_rows);
        state.update_viewport_size(pixel_rows, pixel_cols);
    }
    apply_action(state, action)
}

/// The interactive viewer.
pub struct App {
    session: TerminalSession,
    state: AppState,
    /// Event poll timeout
    tick_rate: Duration,
}

impl App {
    /// Opens the terminal session for a prepared state.
    pub fn new(state: AppState) -> Result<Self> {
        Ok(Self {
            session: TerminalSession::open()?,
            state,
            tick_rate: Duration::from_millis(50),
        })
    }

    /// Runs until the user quits.
    pub fn run(&mut self) -> Result<()> {
        info!(
            "Viewing {} ({} bp, {} records)",
            self.state.file_name,
            self.state.genome.len(),
            self.state.genome.record_count
        );

        let (pixel_rows, pixel_cols) = self.session.pixel_area()?;
        self.state.update_viewport_size(pixel_rows, pixel_cols);

        loop {
            // Views recompute here, at most once per batch of changes
            self.state.refresh();
            let state = &self.state;
            self.session.terminal.draw(|frame| render(frame, state))?;

            if let Some(event) = poll_event(self.tick_rate) {
                if !dispatch(&mut self.state, event) {
                    return Ok(());
                }
            }
        }
    }
}

/// Runs the viewer on a prepared state.
pub fn run_app(state: AppState) -> Result<()> {
    App::new(state)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::Genome;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn test_state() -> AppState {
        let genome = Genome::new("chr1", "ACGT".repeat(5000));
        AppState::new(genome, "test.fa".to_string(), &Config::default())
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_resize_refits_view() {
        let mut state = test_state();
        assert!(dispatch(&mut state, Event::Resize(100, 50)));
        // 68 pixel columns and 94 pixel rows at one base per pixel
        assert_eq!(state.params.width(), 68);
        assert_eq!(state.params.size(), 68 * 94);
    }

    #[test]
    fn test_keys_reach_state() {
        let mut state = test_state();
        let width = state.params.width();
        assert!(dispatch(&mut state, key(KeyCode::Char('j'), KeyModifiers::NONE)));
        assert_eq!(state.params.start(), 1 + width);
        assert!(!dispatch(&mut state, key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(state.should_quit);
    }
}
