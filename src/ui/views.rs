//! Rendering for each screen. Nothing here mutates state; the router hands
//! each function the screen it should draw plus the active palette.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::format::{different_day, format_date, truncate_notes};

use super::export::{ExportChoice, ExportScreen, ExportStage, PathSlot};
use super::forms::{BookForm, BookSlot};
use super::helpers::{centered_rect, choice_line, Palette};
use super::input::TextInput;
use super::screens::{
    BackupScreen, BackupState, BookListScreen, DetailAction, DetailScreen, MenuScreen,
    ThemeScreen, UtilitiesScreen, UtilityItem,
};

/// Notes longer than this are cut in the list view.
const NOTES_PREVIEW_CHARS: usize = 60;

fn framed(title: &str, palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {title} "), palette.title()))
}

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub(crate) fn draw_menu(frame: &mut Frame, area: Rect, menu: &MenuScreen, palette: &Palette) {
    let popup = centered_rect(50, 60, area);
    let block = framed("Libros", palette);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let summary = match menu.count() {
        0 => "Your library is empty.".to_string(),
        1 => "1 book in your library.".to_string(),
        n => format!("{n} books in your library."),
    };
    let mut lines = vec![Line::from(Span::styled(summary, palette.accent())), Line::from("")];
    for (idx, item) in menu.items().iter().enumerate() {
        lines.push(choice_line(item.label(), idx == menu.selected(), palette));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn input_line(label: &str, input: &TextInput, palette: &Palette) -> Line<'static> {
    let label_style = if input.focused() {
        palette.selected()
    } else {
        Style::default()
    };
    let value = if input.is_empty() {
        Span::styled(input.placeholder().to_string(), muted())
    } else {
        Span::raw(input.value())
    };
    Line::from(vec![Span::styled(format!("{label}: "), label_style), value])
}

pub(crate) fn draw_book_form(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    form: &BookForm,
    palette: &Palette,
) {
    let block = framed(title, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let focused = form.focused_slot();
    let mut lines = vec![
        input_line("Title", &form.title, palette),
        input_line("Author", &form.author, palette),
    ];

    let type_label_style = if focused == BookSlot::Type {
        palette.selected()
    } else {
        Style::default()
    };
    let mut type_spans = vec![Span::styled("Type: ", type_label_style)];
    for (idx, choice) in form.book_type.choices().iter().enumerate() {
        let style = if idx == form.book_type.index() {
            palette.selected().add_modifier(Modifier::REVERSED)
        } else {
            muted()
        };
        type_spans.push(Span::styled(format!(" {} ", choice.label()), style));
    }
    lines.push(Line::from(type_spans));
    lines.push(Line::from(""));

    let notes_style = if form.notes.focused() {
        palette.selected()
    } else {
        Style::default()
    };
    lines.push(Line::from(Span::styled("Notes:", notes_style)));
    let notes_top = lines.len() as u16;
    if form.notes.is_empty() {
        lines.push(Line::from(Span::styled(
            form.notes.placeholder().to_string(),
            muted(),
        )));
    } else {
        for row in form.notes.wrapped_lines() {
            lines.push(Line::from(row));
        }
    }
    lines.push(Line::from(""));

    let submit_label = if form.is_submitting() {
        "[ Saving... ]"
    } else {
        "[ Submit ]"
    };
    let submit_style = if focused == BookSlot::Submit {
        palette.selected().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    lines.push(Line::from(Span::styled(submit_label, submit_style)));

    frame.render_widget(Paragraph::new(lines), inner);

    let cursor = match focused {
        BookSlot::Title => Some(("Title: ".len() + form.title.cursor(), 0)),
        BookSlot::Author => Some(("Author: ".len() + form.author.cursor(), 1)),
        BookSlot::Notes => {
            let (row, col) = form.notes.cursor_position();
            Some((col, notes_top as usize + row))
        }
        BookSlot::Type | BookSlot::Submit => None,
    };
    if let Some((x, y)) = cursor {
        let x = inner.x + (x as u16).min(inner.width.saturating_sub(1));
        let y = inner.y + (y as u16).min(inner.height.saturating_sub(1));
        frame.set_cursor_position((x, y));
    }
}

pub(crate) fn draw_book_list(
    frame: &mut Frame,
    area: Rect,
    list: &BookListScreen,
    palette: &Palette,
) {
    let (page, pages) = list.page();
    let title = format!("Your Books ({}) - page {page}/{pages}", list.books().len());
    let block = framed(&title, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if list.books().is_empty() {
        let message = Paragraph::new("No books yet. Add one from the main menu.")
            .alignment(Alignment::Center)
            .style(muted());
        frame.render_widget(message, inner);
        return;
    }

    let mut lines = Vec::new();
    for (idx, book) in list.visible() {
        let selected = idx == list.selected();
        let marker = if selected { "> " } else { "  " };
        let title_style = if selected {
            palette.selected()
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", book.title),
            title_style,
        )));
        lines.push(Line::from(vec![
            Span::raw(format!("    by {}", book.author)),
            Span::styled(format!("  [{}]", book.book_type.label()), palette.accent()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    Added {}", format_date(&book.created_at)),
            muted(),
        )));
        if !book.notes.is_empty() {
            lines.push(Line::from(format!(
                "    {}",
                truncate_notes(&book.notes, NOTES_PREVIEW_CHARS)
            )));
        }
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

pub(crate) fn draw_detail(frame: &mut Frame, area: Rect, detail: &DetailScreen, palette: &Palette) {
    let Some(book) = detail.book() else {
        let block = framed("Book", palette);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new("No book selected.").style(muted()), inner);
        return;
    };

    let block = framed(&book.title, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(vec![Span::styled("Author: ", palette.accent()), Span::raw(book.author.clone())]),
        Line::from(vec![
            Span::styled("Type: ", palette.accent()),
            Span::raw(book.book_type.label()),
        ]),
        Line::from(vec![
            Span::styled("Added: ", palette.accent()),
            Span::raw(format_date(&book.created_at)),
        ]),
    ];
    if different_day(&book.created_at, &book.updated_at) {
        lines.push(Line::from(vec![
            Span::styled("Last updated: ", palette.accent()),
            Span::raw(format_date(&book.updated_at)),
        ]));
    }
    if !book.notes.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Notes:", palette.accent())));
        for row in book.notes.lines() {
            lines.push(Line::from(row.to_string()));
        }
    }
    lines.push(Line::from(""));
    for (idx, action) in DetailAction::ALL.iter().enumerate() {
        lines.push(choice_line(action.label(), idx == detail.selected(), palette));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

pub(crate) fn draw_utilities(
    frame: &mut Frame,
    area: Rect,
    utilities: &UtilitiesScreen,
    palette: &Palette,
) {
    let popup = centered_rect(50, 50, area);
    let block = framed("Utilities", palette);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines: Vec<Line> = UtilityItem::ALL
        .iter()
        .enumerate()
        .map(|(idx, item)| choice_line(item.label(), idx == utilities.selected(), palette))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

pub(crate) fn draw_export(frame: &mut Frame, area: Rect, export: &ExportScreen, palette: &Palette) {
    let popup = centered_rect(70, 60, area);
    let block = framed("Export Data", palette);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    match export.stage() {
        ExportStage::PathInput => {
            let submit_style = if export.focused_slot() == PathSlot::Submit {
                palette.selected().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let lines = vec![
                Line::from("Where should the export be written?"),
                Line::from(""),
                input_line("Directory", &export.path, palette),
                Line::from(""),
                Line::from(Span::styled("[ Continue ]", submit_style)),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

            if export.focused_slot() == PathSlot::Path {
                let x = "Directory: ".len() as u16 + export.path.cursor() as u16;
                frame.set_cursor_position((
                    inner.x + x.min(inner.width.saturating_sub(1)),
                    inner.y + 2,
                ));
            }
        }
        ExportStage::FormatSelection => {
            let target = export
                .dir()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default();
            let mut lines = vec![
                Line::from(vec![
                    Span::raw("Exporting to "),
                    Span::styled(target, palette.accent()),
                ]),
                Line::from(""),
            ];
            for (idx, choice) in ExportChoice::ALL.iter().enumerate() {
                lines.push(choice_line(choice.label(), idx == export.selected(), palette));
            }
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
        }
        ExportStage::Exporting => {
            frame.render_widget(Paragraph::new("Exporting..."), inner);
        }
        ExportStage::ShowResult => {
            let line = match &export.result {
                Some(Ok(path)) => Line::from(Span::styled(
                    format!("Exported to {}", path.display()),
                    Style::default().fg(Color::Green),
                )),
                Some(Err(message)) => Line::from(Span::styled(
                    format!("Export failed: {message}"),
                    Style::default().fg(Color::Red),
                )),
                None => Line::from(""),
            };
            frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: false }), inner);
        }
    }
}

pub(crate) fn draw_backup(frame: &mut Frame, area: Rect, backup: &BackupScreen, palette: &Palette) {
    let popup = centered_rect(60, 40, area);
    let block = framed("Backup Database", palette);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let line = match &backup.state {
        BackupState::Running => Line::from("Backing up..."),
        BackupState::Done(path) => Line::from(Span::styled(
            format!("Backup written to {}", path.display()),
            Style::default().fg(Color::Green),
        )),
        BackupState::Failed(message) => Line::from(Span::styled(
            format!("Backup failed: {message}"),
            Style::default().fg(Color::Red),
        )),
    };
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: false }), inner);
}

pub(crate) fn draw_themes(frame: &mut Frame, area: Rect, themes: &ThemeScreen, palette: &Palette) {
    let popup = centered_rect(50, 50, area);
    let block = framed("Theme", palette);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines: Vec<Line> = themes
        .themes()
        .iter()
        .enumerate()
        .map(|(idx, theme)| {
            let swatch = Palette::from_theme(theme);
            let mut line = choice_line(&theme.name, idx == themes.selected(), palette);
            line.spans.push(Span::raw("  "));
            line.spans
                .push(Span::styled("■", Style::default().fg(swatch.primary)));
            line.spans
                .push(Span::styled("■", Style::default().fg(swatch.secondary)));
            line.spans
                .push(Span::styled("■", Style::default().fg(swatch.tertiary)));
            line
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
