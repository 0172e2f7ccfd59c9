//! Keyboard event handling.
//!
//! Key bindings in normal mode:
//! - `j`/`k` or `Down`/`Up`: scroll one row
//! - `J`/`K` or `PageDown`/`PageUp`: scroll ten rows
//! - `h`/`l` or `Left`/`Right`: narrower/wider rows
//! - `+`/`-`: zoom out/in (more/fewer nucleotides per pixel)
//! - `r`: toggle reverse-complement search
//! - `[`/`]`: shift the active view's offset by one row
//! - `Tab`: switch between the highlight and nucleotide views
//! - `?`: show help
//! - `:`: enter command mode
//!   - `:q` or `:quit`: quit the application
//!   - `:h` or `:help`: show help
//!   - `:<number>`: go to position
//!   - `:add [SEQ]`, `:edit N SEQ`, `:rm N`, `:clear`: manage queries
//!   - `:open PATH`: import a query file
//!   - `:sim PCT`, `:rc [on|off]`, `:scale N`, `:width N`, `:size N`: settings

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use crate::model::{AppMode, AppState};

/// Rows scrolled by the page keys.
const PAGE_ROWS: i64 = 10;

/// Actions that can be triggered by keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (key not recognized)
    None,
    /// Quit the application
    Quit,
    /// Scroll by a signed number of rows
    Scroll(i64),
    /// Change the row width by a signed number of scale steps
    ChangeWidth(i64),
    /// Double the scale
    ZoomOut,
    /// Halve the scale
    ZoomIn,
    /// Toggle reverse-complement search
    ToggleReverseComplement,
    /// Shift the active view's offset by a signed number of rows
    ShiftOffset(i64),
    /// Switch the main panel to the other view
    ToggleView,
    /// Show the help overlay
    ShowHelp,
    /// Dismiss the help overlay
    DismissHelp,
    /// Enter command mode
    EnterCommandMode,
    /// Add character to command buffer
    CommandChar(char),
    /// Execute current command
    ExecuteCommand,
    /// Cancel command mode
    CancelCommand,
    /// Backspace in command mode
    CommandBackspace,
    /// Resize event (terminal resized)
    Resize(u16, u16),
}

/// Polls for keyboard events with a timeout.
///
/// Returns `None` if no event occurred within the timeout.
pub fn poll_event(timeout: Duration) -> Option<Event> {
    if event::poll(timeout).ok()? {
        event::read().ok()
    } else {
        None
    }
}

/// Converts a crossterm event to an Action based on current app mode.
pub fn handle_event(event: Event, mode: &AppMode, show_help: bool) -> Action {
    match event {
        Event::Key(key_event) => handle_key_event(key_event, mode, show_help),
        Event::Resize(width, height) => Action::Resize(width, height),
        _ => Action::None,
    }
}

/// Handles a key event based on the current application mode.
fn handle_key_event(key: KeyEvent, mode: &AppMode, show_help: bool) -> Action {
    // If help is shown, any key dismisses it
    if show_help {
        return Action::DismissHelp;
    }

    match mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Command(_) => handle_command_mode(key),
    }
}

/// Handles key events in normal mode.
fn handle_normal_mode(key: KeyEvent) -> Action {
    // Handle Ctrl+C for emergency quit
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Action::Scroll(1),
        KeyCode::Char('k') | KeyCode::Up => Action::Scroll(-1),
        KeyCode::Char('J') | KeyCode::PageDown => Action::Scroll(PAGE_ROWS),
        KeyCode::Char('K') | KeyCode::PageUp => Action::Scroll(-PAGE_ROWS),

        KeyCode::Char('l') | KeyCode::Right => Action::ChangeWidth(1),
        KeyCode::Char('h') | KeyCode::Left => Action::ChangeWidth(-1),

        KeyCode::Char('+') => Action::ZoomOut,
        KeyCode::Char('-') => Action::ZoomIn,

        KeyCode::Char('r') => Action::ToggleReverseComplement,
        KeyCode::Char(']') => Action::ShiftOffset(1),
        KeyCode::Char('[') => Action::ShiftOffset(-1),
        KeyCode::Tab => Action::ToggleView,

        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Char(':') => Action::EnterCommandMode,

        _ => Action::None,
    }
}

/// Handles key events in command mode.
fn handle_command_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::ExecuteCommand,
        KeyCode::Esc => Action::CancelCommand,
        KeyCode::Backspace => Action::CommandBackspace,
        KeyCode::Char(c) => Action::CommandChar(c),
        _ => Action::None,
    }
}

/// Applies an action to the application state.
///
/// Returns `true` if the application should continue, `false` if it should quit.
pub fn apply_action(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::None => {}
        Action::Quit => {
            state.should_quit = true;
        }
        Action::Scroll(rows) => {
            state.scroll_rows(rows);
        }
        Action::ChangeWidth(steps) => {
            state.change_width(steps);
        }
        Action::ZoomOut => {
            state.zoom_out();
        }
        Action::ZoomIn => {
            state.zoom_in();
        }
        Action::ToggleReverseComplement => {
            state.toggle_reverse_complement();
        }
        Action::ShiftOffset(rows) => {
            state.shift_offset(rows);
        }
        Action::ToggleView => {
            state.toggle_view();
        }
        Action::ShowHelp => {
            state.toggle_help();
        }
        Action::DismissHelp => {
            state.dismiss_help();
        }
        Action::EnterCommandMode => {
            state.enter_command_mode();
        }
        Action::CommandChar(c) => {
            state.command_input(c);
        }
        Action::ExecuteCommand => {
            state.execute_command();
        }
        Action::CancelCommand => {
            state.cancel_command();
        }
        Action::CommandBackspace => {
            state.command_backspace();
        }
        Action::Resize(_, _) => {
            // Resize is handled in the main loop with actual terminal dimensions
        }
    }

    !state.should_quit
}
