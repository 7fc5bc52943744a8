//! Editable text fields used by every form. The owning form decides which
//! field is focused; a field never focuses or blurs itself.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single-line text value with a cursor, placeholder and character limit.
#[derive(Debug, Clone, Default)]
pub(crate) struct TextInput {
    chars: Vec<char>,
    cursor: usize,
    placeholder: String,
    char_limit: usize,
    focused: bool,
}

impl TextInput {
    pub(crate) fn new(placeholder: impl Into<String>, char_limit: usize) -> Self {
        Self {
            chars: Vec::new(),
            cursor: 0,
            placeholder: placeholder.into(),
            char_limit,
            focused: false,
        }
    }

    /// Replace the value, dropping anything past the limit, and park the
    /// cursor at the end.
    pub(crate) fn set_value(&mut self, value: &str) {
        self.chars = value.chars().take(self.char_limit).collect();
        self.cursor = self.chars.len();
    }

    pub(crate) fn value(&self) -> String {
        self.chars.iter().collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub(crate) fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub(crate) fn focus(&mut self) {
        self.focused = true;
    }

    pub(crate) fn blur(&mut self) {
        self.focused = false;
    }

    pub(crate) fn focused(&self) -> bool {
        self.focused
    }

    /// Cursor position counted in characters from the start.
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn cursor_to_end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Insert a character at the cursor. Returns `false` (and changes
    /// nothing) when the field is already full.
    pub(crate) fn insert_char(&mut self, ch: char) -> bool {
        if self.chars.len() >= self.char_limit {
            return false;
        }
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
        true
    }

    /// Apply an editing or cursor key. Returns whether the key was used.
    pub(crate) fn apply_key(&mut self, key: KeyEvent) -> bool {
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Char(ch) if plain && !ch.is_control() => self.insert_char(ch),
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                self.chars.remove(self.cursor);
                true
            }
            KeyCode::Delete => {
                if self.cursor >= self.chars.len() {
                    return false;
                }
                self.chars.remove(self.cursor);
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.chars.len());
                true
            }
            KeyCode::Home => {
                self.cursor_to_start();
                true
            }
            KeyCode::End => {
                self.cursor_to_end();
                true
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.chars.drain(..self.cursor);
                self.cursor = 0;
                true
            }
            _ => false,
        }
    }
}

/// Multi-line variant: same focus and limit contract, but accepts newlines
/// (Ctrl+J or Alt+Enter, since plain Enter moves focus) and wraps at a fixed
/// width for display.
#[derive(Debug, Clone, Default)]
pub(crate) struct TextArea {
    inner: TextInput,
    width: usize,
}

impl TextArea {
    pub(crate) fn new(placeholder: impl Into<String>, char_limit: usize, width: usize) -> Self {
        Self {
            inner: TextInput::new(placeholder, char_limit),
            width: width.max(1),
        }
    }

    pub(crate) fn set_value(&mut self, value: &str) {
        self.inner.set_value(value);
    }

    pub(crate) fn value(&self) -> String {
        self.inner.value()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub(crate) fn placeholder(&self) -> &str {
        self.inner.placeholder()
    }

    pub(crate) fn focus(&mut self) {
        self.inner.focus();
    }

    pub(crate) fn blur(&mut self) {
        self.inner.blur();
    }

    pub(crate) fn focused(&self) -> bool {
        self.inner.focused()
    }

    pub(crate) fn cursor_to_start(&mut self) {
        self.inner.cursor_to_start();
    }

    pub(crate) fn cursor_to_end(&mut self) {
        self.inner.cursor_to_end();
    }

    pub(crate) fn apply_key(&mut self, key: KeyEvent) -> bool {
        let newline = (key.code == KeyCode::Char('j')
            && key.modifiers.contains(KeyModifiers::CONTROL))
            || (key.code == KeyCode::Enter && key.modifiers.contains(KeyModifiers::ALT));
        if newline {
            return self.inner.insert_char('\n');
        }
        self.inner.apply_key(key)
    }

    /// Split the value into display rows no wider than the configured width,
    /// honoring explicit newlines.
    pub(crate) fn wrapped_lines(&self) -> Vec<String> {
        self.layout().0
    }

    /// Row and column of the cursor within [`Self::wrapped_lines`].
    pub(crate) fn cursor_position(&self) -> (usize, usize) {
        self.layout().1
    }

    fn layout(&self) -> (Vec<String>, (usize, usize)) {
        let mut lines = vec![String::new()];
        let mut col = 0;
        let mut cursor = (0, 0);

        for (idx, ch) in self.inner.chars.iter().enumerate() {
            if idx == self.inner.cursor {
                cursor = (lines.len() - 1, col);
            }
            if *ch == '\n' {
                lines.push(String::new());
                col = 0;
                continue;
            }
            if col == self.width {
                lines.push(String::new());
                col = 0;
            }
            if let Some(line) = lines.last_mut() {
                line.push(*ch);
            }
            col += 1;
        }

        if self.inner.cursor >= self.inner.chars.len() {
            cursor = if col == self.width {
                (lines.len(), 0)
            } else {
                (lines.len() - 1, col)
            };
        }
        (lines, cursor)
    }
}
