//! Text entry widgets used by the editor screens. The state machine talks to
//! them only through [`TitleInput`] and [`BodyInput`], so any widget that
//! honours those contracts can be swapped in.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::{CursorMove, Input, Key, TextArea};

/// Behaviour shared by every editing widget.
pub trait EditWidget {
    /// Clear the value and move the cursor home.
    fn reset(&mut self);
    fn set_focused(&mut self, focused: bool);
    fn is_focused(&self) -> bool;
    fn value(&self) -> String;
    /// Feed one key press to the widget. Returns `true` when the key changed
    /// the value; cursor movement alone reports `false`.
    fn handle_key(&mut self, key: KeyEvent) -> bool;
    /// Visual lines, in order, for the renderer.
    fn lines(&self) -> Vec<String>;
    /// Cursor as `(row, column)` in characters.
    fn cursor(&self) -> (usize, usize);
}

/// Single-line title entry.
pub trait TitleInput: EditWidget {
    fn set_max_length(&mut self, max: usize);
}

/// Multi-line body entry.
pub trait BodyInput: EditWidget {
    fn set_value(&mut self, value: &str);
    fn move_cursor_to_end(&mut self);
}

/// Keys carrying Ctrl or Alt are commands, never text.
fn is_text_key(key: &KeyEvent) -> bool {
    !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Single-line input with an optional character limit.
#[derive(Debug, Default, Clone)]
pub struct LineInput {
    chars: Vec<char>,
    cursor: usize,
    max_length: Option<usize>,
    focused: bool,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `ch` at the cursor unless the limit is reached.
    fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        if let Some(max) = self.max_length {
            if self.chars.len() >= max {
                return false;
            }
        }
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
        true
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }
}

impl EditWidget for LineInput {
    fn reset(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn value(&self) -> String {
        self.chars.iter().collect()
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !self.focused || !is_text_key(&key) {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) => self.push_char(ch),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.chars.len());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.chars.len();
                false
            }
            _ => false,
        }
    }

    fn lines(&self) -> Vec<String> {
        vec![self.value()]
    }

    fn cursor(&self) -> (usize, usize) {
        (0, self.cursor)
    }
}

impl TitleInput for LineInput {
    fn set_max_length(&mut self, max: usize) {
        self.max_length = Some(max);
        if self.chars.len() > max {
            self.chars.truncate(max);
            self.cursor = self.cursor.min(max);
        }
    }
}

/// Multi-line body editor backed by [`tui_textarea::TextArea`]. The wrapper
/// adds focus and the plain-string value the state machine expects.
#[derive(Debug, Clone, Default)]
pub struct BodyArea {
    inner: TextArea<'static>,
    focused: bool,
}

impl BodyArea {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditWidget for BodyArea {
    fn reset(&mut self) {
        self.inner = TextArea::default();
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn value(&self) -> String {
        self.inner.lines().join("\n")
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !self.focused {
            return false;
        }
        self.inner.input(to_input(key))
    }

    fn lines(&self) -> Vec<String> {
        self.inner.lines().to_vec()
    }

    fn cursor(&self) -> (usize, usize) {
        self.inner.cursor()
    }
}

impl BodyInput for BodyArea {
    fn set_value(&mut self, value: &str) {
        self.inner = TextArea::from(value.split('\n'));
    }

    fn move_cursor_to_end(&mut self) {
        self.inner.move_cursor(CursorMove::Bottom);
        self.inner.move_cursor(CursorMove::End);
    }
}

/// Translate a terminal key press into the editor's input type. Done by hand
/// because the app's crossterm release differs from the one ratatui re-exports.
fn to_input(key: KeyEvent) -> Input {
    let key_code = match key.code {
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::F(n) => Key::F(n),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Tab => Key::Tab,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Esc => Key::Esc,
        _ => Key::Null,
    };
    Input {
        key: key_code,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    }
}
