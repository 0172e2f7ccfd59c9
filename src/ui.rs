//! TUI rendering module.
//!
//! This module handles all visual rendering using ratatui:
//! - Settings panel on the left, listing the active view's settings and queries
//! - Pixel panel drawn with half blocks (two pixel rows per terminal row)
//! - Status bar with mode, position and highlight settings
//! - Help overlay

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::model::{AppMode, AppState, Rgb};
use crate::view::SettingLine;

/// Width reserved for the settings panel (including border).
const SETTINGS_PANEL_WIDTH: u16 = 30;
/// Minimum width for the pixel panel.
const MIN_VIEW_PANEL_WIDTH: u16 = 10;
/// Height of the status bar.
const STATUS_BAR_HEIGHT: u16 = 1;
/// Pixel rows drawn in one terminal row.
const PIXELS_PER_CELL: usize = 2;
/// Glyph whose foreground is the top pixel and background the bottom one.
const HALF_BLOCK: &str = "▀";

const HELP_TEXT: &[&str] = &[
    "Navigation",
    "  j/k, Down/Up        scroll one row",
    "  J/K, PgDn/PgUp      scroll ten rows",
    "  h/l, Left/Right     narrower/wider rows",
    "  +/-                 more/fewer bases per pixel",
    "  [ / ]               shift this view by one row",
    "  Tab                 switch highlight/nucleotide view",
    "  r                   toggle reverse-complement search",
    "",
    "Commands",
    "  :<number>           go to position",
    "  :add [SEQ]          add a query (placeholder if first)",
    "  :edit N SEQ         replace query N",
    "  :rm N               remove query N",
    "  :clear              remove all queries",
    "  :open PATH          load queries, one per line; lines starting with '>' are skipped",
    "  :sim PCT            minimum similarity (20-100)",
    "  :rc [on|off]        reverse-complement search",
    "  :scale N, :width N  bases per pixel, bases per row",
    "  :size N             bases shown in the view",
    "  :q                  quit",
    "",
    "Matches are drawn in the query's color; mismatching bases inside a match use its darker shade. Elsewhere, brighter grey means a closer partial match.",
    "",
    "Press any key to close.",
];

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Main layout: content area + status bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(STATUS_BAR_HEIGHT)])
        .split(area);

    let content_area = main_layout[0];
    let status_area = main_layout[1];

    // Split content area: settings panel (left) + pixel panel (right)
    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SETTINGS_PANEL_WIDTH),
            Constraint::Min(MIN_VIEW_PANEL_WIDTH),
        ])
        .split(content_area);

    render_settings_panel(frame, state, content_layout[0]);
    render_view_panel(frame, state, content_layout[1]);
    render_status_bar(frame, state, status_area);

    if state.show_help {
        render_help(frame, area);
    }
}

/// Renders the active view's settings.
fn render_settings_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let view = state.active_view();
    let max_len = SETTINGS_PANEL_WIDTH.saturating_sub(4) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for setting in view.settings_descriptor() {
        lines.extend(setting_lines(&setting, max_len));
    }
    if view.offset() != 0 {
        lines.push(Line::from(Span::styled(
            format!("Offset {:+} bp", view.offset()),
            Style::default().fg(Color::Yellow),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title("Settings");
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Label on one line, value (truncated) on the next.
fn setting_lines(setting: &SettingLine, max_len: usize) -> Vec<Line<'static>> {
    let mut header = Vec::new();
    if let Some((strong, near)) = setting.swatch {
        header.push(Span::styled("█", Style::default().fg(to_color(strong))));
        header.push(Span::styled("█ ", Style::default().fg(to_color(near))));
    }
    header.push(Span::styled(
        setting.label.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));

    let value = if setting.value.is_empty() {
        "(empty)".to_string()
    } else {
        truncate(&setting.value, max_len)
    };

    vec![
        Line::from(header),
        Line::from(Span::styled(format!("  {}", value), Style::default().fg(Color::Gray))),
    ]
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let kept: String = text.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    } else {
        text.to_string()
    }
}

/// Renders the active view's pixels.
fn render_view_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let view = state.active_view();
    let pixels = view.current_frame();
    let per_row = state.params.pixels_per_row();

    let inner_rows = area.height.saturating_sub(2) as usize;
    let inner_cols = (area.width.saturating_sub(2) as usize).min(per_row);

    let mut lines: Vec<Line> = Vec::with_capacity(inner_rows);
    for row in 0..inner_rows {
        let top_row = row * PIXELS_PER_CELL;
        let mut spans: Vec<Span> = Vec::with_capacity(inner_cols);
        for col in 0..inner_cols {
            let top = pixels.get(top_row * per_row + col);
            let bottom = pixels.get((top_row + 1) * per_row + col);
            let span = match (top, bottom) {
                (Some(&t), Some(&b)) => Span::styled(
                    HALF_BLOCK,
                    Style::default().fg(to_color(t)).bg(to_color(b)),
                ),
                (Some(&t), None) => Span::styled(HALF_BLOCK, Style::default().fg(to_color(t))),
                _ => Span::raw(" "),
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    let window = state.params.window(view.offset());
    let end = (window.base() + window.display_size).min(state.genome.len());
    let title = format!(
        "{} [{} | {}-{}/{}]",
        view.name(),
        state.genome.id,
        window.start,
        end,
        state.genome.len()
    );

    let block = Block::default().borders(Borders::ALL).title(title);
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Renders the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let (mode_str, command_str) = match &state.mode {
        AppMode::Normal => ("NORMAL", String::new()),
        AppMode::Command(cmd) => ("COMMAND", format!(":{}", cmd)),
    };

    let settings = state.highlight.settings();
    let position_info = format!(
        "{} | {} bp/px | sim {:.0}% | rc {} ",
        state.file_name,
        state.params.scale(),
        settings.percent_match * 100.0,
        if settings.reverse_complement { "on" } else { "off" }
    );

    // Show status message if present
    let message = state.status_message.as_deref().unwrap_or("");

    let left_content = if command_str.is_empty() {
        format!(" {} | {} ", mode_str, message)
    } else {
        format!(" {} | {} ", mode_str, command_str)
    };

    let left_len = left_content.chars().count();
    let status_line = Line::from(vec![
        Span::styled(left_content, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::styled(
            " ".repeat(
                (area.width as usize).saturating_sub(left_len + position_info.chars().count()),
            ),
            Style::default().bg(Color::Cyan),
        ),
        Span::styled(
            position_info,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let paragraph = Paragraph::new(status_line);
    frame.render_widget(paragraph, area);
}

/// Renders the help overlay centered on `area`.
fn render_help(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(area, 70, 80);
    let text_width = popup.width.saturating_sub(2).max(1) as usize;

    let lines: Vec<Line> = help_lines(text_width).into_iter().map(Line::from).collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Help")
        .style(Style::default().fg(Color::White).bg(Color::Black));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Help text wrapped to a width.
fn help_lines(width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in HELP_TEXT {
        if entry.is_empty() {
            lines.push(String::new());
            continue;
        }
        let indent: String = entry.chars().take_while(|c| *c == ' ').collect();
        let options = textwrap::Options::new(width).subsequent_indent(&indent);
        lines.extend(textwrap::wrap(entry, options).into_iter().map(|l| l.into_owned()));
    }
    lines
}

/// A rectangle covering the given percentages of `area`, centered.
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(percent_y.min(100)) / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Calculates the drawable pixel area of the view panel.
///
/// Returns `(pixel_rows, pixel_cols)`.
pub fn calculate_visible_dimensions(terminal_width: u16, terminal_height: u16) -> (usize, usize) {
    // Account for borders and status bar
    let visible_cols = (terminal_width.saturating_sub(SETTINGS_PANEL_WIDTH + 2)) as usize;
    let text_rows = (terminal_height.saturating_sub(STATUS_BAR_HEIGHT + 2)) as usize;
    (text_rows * PIXELS_PER_CELL, visible_cols)
}
