//! Export flow: pick a directory, pick a format, show where the file landed.

use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::AppPaths;
use crate::export::ExportFormat;
use crate::validation::resolve_export_dir;

use super::app::{Outcome, Screen};
use super::forms::FocusRing;
use super::helpers::surface_error;
use super::input::TextInput;
use super::tasks::Command;

const PATH_MAX_LENGTH: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportStage {
    PathInput,
    FormatSelection,
    Exporting,
    ShowResult,
}

/// Slots of the path entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathSlot {
    Path,
    Submit,
}

const PATH_SLOTS: [PathSlot; 2] = [PathSlot::Path, PathSlot::Submit];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportChoice {
    Format(ExportFormat),
    BackToUtilities,
    BackToMenu,
}

impl ExportChoice {
    pub(crate) const ALL: [ExportChoice; 4] = [
        ExportChoice::Format(ExportFormat::Json),
        ExportChoice::Format(ExportFormat::Markdown),
        ExportChoice::BackToUtilities,
        ExportChoice::BackToMenu,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            ExportChoice::Format(format) => format.label(),
            ExportChoice::BackToUtilities => "Back to Utilities",
            ExportChoice::BackToMenu => "Back to Main Menu",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ExportScreen {
    stage: ExportStage,
    pub(crate) path: TextInput,
    focus: FocusRing,
    dir: Option<PathBuf>,
    selected: usize,
    default_dir: PathBuf,
    home: PathBuf,
    pub(crate) error: Option<String>,
    pub(crate) result: Option<Result<PathBuf, String>>,
}

impl ExportScreen {
    pub(crate) fn new(paths: &AppPaths) -> Self {
        let mut screen = Self {
            stage: ExportStage::PathInput,
            path: TextInput::new(
                format!("{} (leave empty for default)", paths.exports.display()),
                PATH_MAX_LENGTH,
            ),
            focus: FocusRing::new(PATH_SLOTS.len()),
            dir: None,
            selected: 0,
            default_dir: paths.exports.clone(),
            home: paths.home.clone(),
            error: None,
            result: None,
        };
        screen.sync_focus();
        screen
    }

    /// Start over at path entry with a blank field.
    pub(crate) fn reset(&mut self) {
        self.stage = ExportStage::PathInput;
        self.path.set_value("");
        self.focus.reset();
        self.dir = None;
        self.selected = 0;
        self.error = None;
        self.result = None;
        self.sync_focus();
    }

    pub(crate) fn stage(&self) -> ExportStage {
        self.stage
    }

    pub(crate) fn focused_slot(&self) -> PathSlot {
        PATH_SLOTS[self.focus.index()]
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn dir(&self) -> Option<&PathBuf> {
        self.dir.as_ref()
    }

    /// Path entry is a text form; global soft-quit must not fire there.
    pub(crate) fn is_data_entry(&self) -> bool {
        self.stage == ExportStage::PathInput
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        match self.stage {
            ExportStage::PathInput => self.handle_path_key(key),
            ExportStage::FormatSelection => self.handle_format_key(key),
            ExportStage::Exporting => Outcome::none(),
            ExportStage::ShowResult => match key.code {
                KeyCode::Enter | KeyCode::Esc => {
                    self.result = None;
                    self.stage = ExportStage::FormatSelection;
                    Outcome::none()
                }
                _ => Outcome::none(),
            },
        }
    }

    pub(crate) fn on_exported(&mut self, result: Result<PathBuf>) -> Outcome {
        self.result = Some(result.map_err(|err| surface_error(&err)));
        self.stage = ExportStage::ShowResult;
        Outcome::none()
    }

    fn handle_path_key(&mut self, key: KeyEvent) -> Outcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.error = None;
                Outcome::go(Screen::Utilities)
            }
            KeyCode::Char('a') if ctrl => {
                self.path.cursor_to_start();
                Outcome::none()
            }
            KeyCode::Char('e') if ctrl => {
                self.path.cursor_to_end();
                Outcome::none()
            }
            KeyCode::Enter if self.focused_slot() == PathSlot::Submit => {
                match resolve_export_dir(&self.path.value(), &self.default_dir, &self.home) {
                    Ok(dir) => {
                        self.dir = Some(dir);
                        self.error = None;
                        self.selected = 0;
                        self.stage = ExportStage::FormatSelection;
                    }
                    Err(err) => self.error = Some(surface_error(&err)),
                }
                Outcome::none()
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.focus.prev();
                self.sync_focus();
                Outcome::none()
            }
            KeyCode::Down | KeyCode::Tab | KeyCode::Enter => {
                self.focus.next();
                self.sync_focus();
                Outcome::none()
            }
            _ => {
                if self.focused_slot() == PathSlot::Path && self.path.apply_key(key) {
                    self.error = None;
                }
                Outcome::none()
            }
        }
    }

    fn handle_format_key(&mut self, key: KeyEvent) -> Outcome {
        let last = ExportChoice::ALL.len() - 1;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Outcome::none()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(last);
                Outcome::none()
            }
            KeyCode::Esc => {
                self.stage = ExportStage::PathInput;
                self.sync_focus();
                Outcome::none()
            }
            KeyCode::Enter => match ExportChoice::ALL[self.selected] {
                ExportChoice::Format(format) => match &self.dir {
                    Some(dir) => {
                        self.stage = ExportStage::Exporting;
                        Outcome::run(Command::Export {
                            dir: dir.clone(),
                            format,
                        })
                    }
                    None => {
                        self.stage = ExportStage::PathInput;
                        Outcome::none()
                    }
                },
                ExportChoice::BackToUtilities => Outcome::go(Screen::Utilities),
                ExportChoice::BackToMenu => Outcome::go(Screen::Menu),
            },
            _ => Outcome::none(),
        }
    }

    fn sync_focus(&mut self) {
        if self.focused_slot() == PathSlot::Path {
            self.path.focus();
            self.path.cursor_to_end();
        } else {
            self.path.blur();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> (tempfile::TempDir, ExportScreen) {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::new(tmp.path().to_path_buf(), tmp.path().join(".libros"));
        (tmp, ExportScreen::new(&paths))
    }

    fn type_str(screen: &mut ExportScreen, text: &str) {
        for ch in text.chars() {
            screen.handle_key(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn path_focus_wraps() {
        let (_tmp, mut screen) = screen();
        assert!(screen.path.focused());
        screen.handle_key(key(KeyCode::Up));
        assert_eq!(screen.focused_slot(), PathSlot::Submit);
        assert!(!screen.path.focused());
        screen.handle_key(key(KeyCode::Tab));
        assert_eq!(screen.focused_slot(), PathSlot::Path);
    }

    #[test]
    fn empty_path_selects_default_dir() {
        let (tmp, mut screen) = screen();
        screen.handle_key(key(KeyCode::Enter));
        screen.handle_key(key(KeyCode::Enter));
        assert_eq!(screen.stage(), ExportStage::FormatSelection);
        assert_eq!(
            screen.dir(),
            Some(&tmp.path().join(".libros").join("exports"))
        );
    }

    #[test]
    fn relative_path_is_rejected_in_place() {
        let (_tmp, mut screen) = screen();
        type_str(&mut screen, "relative/dir");
        screen.handle_key(key(KeyCode::Tab));
        screen.handle_key(key(KeyCode::Enter));
        assert_eq!(screen.stage(), ExportStage::PathInput);
        assert!(screen.error.is_some());
        assert_eq!(screen.path.value(), "relative/dir");
    }

    #[test]
    fn choosing_format_dispatches_export() {
        let (tmp, mut screen) = screen();
        type_str(&mut screen, &tmp.path().display().to_string());
        screen.handle_key(key(KeyCode::Down));
        screen.handle_key(key(KeyCode::Enter));
        screen.handle_key(key(KeyCode::Down));

        let outcome = screen.handle_key(key(KeyCode::Enter));
        assert_eq!(
            outcome.command,
            Some(Command::Export {
                dir: tmp.path().to_path_buf(),
                format: ExportFormat::Markdown,
            })
        );
        assert_eq!(screen.stage(), ExportStage::Exporting);
        assert!(!screen.is_data_entry());

        screen.on_exported(Err(anyhow!("disk full")));
        assert_eq!(screen.result, Some(Err("disk full".to_string())));
        screen.handle_key(key(KeyCode::Esc));
        assert_eq!(screen.stage(), ExportStage::FormatSelection);
    }

    #[test]
    fn escape_walks_back_through_stages() {
        let (_tmp, mut screen) = screen();
        screen.handle_key(key(KeyCode::Enter));
        screen.handle_key(key(KeyCode::Enter));
        screen.handle_key(key(KeyCode::Esc));
        assert_eq!(screen.stage(), ExportStage::PathInput);
        assert!(screen.is_data_entry());
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)).screen,
            Some(Screen::Utilities)
        );
    }

    #[test]
    fn back_choices_leave_the_flow() {
        let (_tmp, mut screen) = screen();
        screen.handle_key(key(KeyCode::Enter));
        screen.handle_key(key(KeyCode::Enter));
        for _ in 0..5 {
            screen.handle_key(key(KeyCode::Down));
        }
        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)).screen,
            Some(Screen::Menu)
        );
    }
}
