use std::str::FromStr;

use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::config::Theme;
use crate::error::StoreError;

/// Resolved colors for the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Palette {
    pub(crate) primary: Color,
    pub(crate) secondary: Color,
    pub(crate) tertiary: Color,
}

impl Palette {
    /// Parse the theme's hex strings. Anything unparseable falls back to a
    /// plain terminal color rather than failing the draw.
    pub(crate) fn from_theme(theme: &Theme) -> Self {
        Self {
            primary: parse_color(&theme.primary_color, Color::Magenta),
            secondary: parse_color(&theme.secondary_color, Color::Yellow),
            tertiary: parse_color(&theme.tertiary_color, Color::LightYellow),
        }
    }

    pub(crate) fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn selected(&self) -> Style {
        Style::default()
            .fg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn accent(&self) -> Style {
        Style::default().fg(self.tertiary)
    }

    pub(crate) fn key(&self) -> Style {
        Style::default()
            .fg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }
}

fn parse_color(raw: &str, fallback: Color) -> Color {
    Color::from_str(raw.trim()).unwrap_or(fallback)
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Validation problems read as-is; storage failures keep their prefix so the
/// user can tell the two apart.
pub(crate) fn surface_store_error(err: &StoreError) -> String {
    err.to_string()
}

/// A `[key] label` hint sequence for the footer.
pub(crate) fn key_hints(palette: &Palette, hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (idx, (key, label)) in hints.iter().enumerate() {
        spans.push(Span::styled(format!("[{key}]"), palette.key()));
        let sep = if idx + 1 == hints.len() { "" } else { "   " };
        spans.push(Span::raw(format!(" {label}{sep}")));
    }
    Line::from(spans)
}

/// Prefix a menu row with a cursor marker when it is selected.
pub(crate) fn choice_line(label: &str, selected: bool, palette: &Palette) -> Line<'static> {
    if selected {
        Line::from(Span::styled(format!("> {label}"), palette.selected()))
    } else {
        Line::from(format!("  {label}"))
    }
}
