use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use tracing::{debug, error, info, warn};

use crate::config::{Config, SaveErrorPolicy};
use crate::db::NoteStore;
use crate::models::Note;

use super::helpers::surface_error;
use super::view::Theme;
use super::widgets::{BodyArea, BodyInput, LineInput, TitleInput};

/// Which of the three mutually exclusive screens is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    EditTitle,
    EditBody,
}

/// Footer message plus its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    pub(crate) fn style(&self, theme: &Theme) -> Style {
        match self {
            StatusKind::Info => theme.info,
            StatusKind::Error => theme.error,
        }
    }
}

/// Application state: the persisted note list, the active screen, and the
/// draft being edited. All storage goes through the owned [`NoteStore`].
///
/// `notes` is never patched in place. Every successful save is followed by a
/// full reload so the list always mirrors what is on disk.
pub struct App<T = LineInput, B = BodyArea> {
    store: NoteStore,
    config: Config,
    notes: Vec<Note>,
    selected: usize,
    screen: Screen,
    draft: Option<Note>,
    title_input: T,
    body_input: B,
    status: Option<StatusMessage>,
}

impl App {
    /// Load the note list and start on the list screen with the bundled
    /// widgets. Fails when the initial read fails.
    pub fn new(store: NoteStore, config: Config) -> Result<Self> {
        Self::with_widgets(store, config, LineInput::new(), BodyArea::new())
    }
}

impl<T: TitleInput, B: BodyInput> App<T, B> {
    pub fn with_widgets(
        store: NoteStore,
        config: Config,
        title_input: T,
        body_input: B,
    ) -> Result<Self> {
        let notes = store.all().context("failed to load notes")?;
        info!(count = notes.len(), "notes loaded at startup");
        Ok(Self {
            store,
            config,
            notes,
            selected: 0,
            screen: Screen::List,
            draft: None,
            title_input,
            body_input,
            status: None,
        })
    }

    /// Process one key press. Returns `Ok(true)` when the app should exit and
    /// `Err` when a failure must end the session.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if is_ctrl(&key, 'c') {
            info!("quit requested");
            return Ok(true);
        }

        match self.screen {
            Screen::List => Ok(self.handle_list_key(key)),
            Screen::EditTitle => {
                self.handle_title_key(key);
                Ok(false)
            }
            Screen::EditBody => {
                self.handle_body_key(key)?;
                Ok(false)
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Char('q') => {
                info!("quit requested");
                return true;
            }
            KeyCode::Char('n') => self.start_new_note(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Enter => self.open_selected(),
            _ => {}
        }
        false
    }

    fn handle_title_key(&mut self, key: KeyEvent) {
        if is_cancel(&key) {
            self.discard_draft("New note discarded.");
            return;
        }
        if key.code == KeyCode::Enter && !key.modifiers.contains(KeyModifiers::CONTROL) {
            self.confirm_title();
            return;
        }
        self.title_input.handle_key(key);
    }

    fn handle_body_key(&mut self, key: KeyEvent) -> Result<()> {
        if is_cancel(&key) {
            self.discard_draft("Changes discarded.");
            return Ok(());
        }
        if is_ctrl(&key, 's') {
            return self.save_draft();
        }
        if self.body_input.handle_key(key) {
            self.clear_status();
        }
        Ok(())
    }

    fn start_new_note(&mut self) {
        self.draft = Some(Note::default());
        self.title_input.reset();
        self.title_input.set_max_length(self.config.title_max_len);
        self.title_input.set_focused(true);
        self.body_input.set_focused(false);
        self.clear_status();
        self.enter(Screen::EditTitle);
    }

    fn open_selected(&mut self) {
        let Some(note) = self.notes.get(self.selected).cloned() else {
            return;
        };
        self.body_input.set_value(&note.body);
        self.body_input.set_focused(true);
        self.body_input.move_cursor_to_end();
        self.title_input.set_focused(false);
        debug!(id = note.id, "editing note");
        self.draft = Some(note);
        self.clear_status();
        self.enter(Screen::EditBody);
    }

    fn confirm_title(&mut self) {
        let title = self.title_input.value();
        if title.is_empty() {
            return;
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.title = title;
        }
        self.title_input.set_focused(false);
        self.body_input.reset();
        self.body_input.set_focused(true);
        self.enter(Screen::EditBody);
    }

    /// Persist the draft. On success the list is reloaded from the store and
    /// the draft dropped; on failure the configured policy decides.
    fn save_draft(&mut self) -> Result<()> {
        let Some(mut draft) = self.draft.take() else {
            return Ok(());
        };
        draft.body = self.body_input.value();

        match self.store.save(&draft) {
            Ok(saved) => {
                self.reload_notes()?;
                self.leave_editor();
                self.set_status(format!("Saved \"{saved}\"."), StatusKind::Info);
                Ok(())
            }
            Err(err) => match self.config.save_errors {
                SaveErrorPolicy::Fatal => {
                    error!(error = %err, "save failed, exiting");
                    Err(err).context("failed to save note")
                }
                SaveErrorPolicy::Recover => {
                    let err = anyhow::Error::new(err);
                    warn!("save failed, draft kept: {err:#}");
                    self.set_status(
                        format!("Save failed: {}", surface_error(&err)),
                        StatusKind::Error,
                    );
                    self.draft = Some(draft);
                    Ok(())
                }
            },
        }
    }

    fn reload_notes(&mut self) -> Result<()> {
        self.notes = self
            .store
            .all()
            .context("failed to reload notes after saving")?;
        if !self.notes.is_empty() && self.selected >= self.notes.len() {
            self.selected = self.notes.len() - 1;
        }
        debug!(count = self.notes.len(), "notes reloaded");
        Ok(())
    }

    fn discard_draft(&mut self, message: &str) {
        self.leave_editor();
        self.set_status(message, StatusKind::Info);
    }

    fn leave_editor(&mut self) {
        self.draft = None;
        self.title_input.set_focused(false);
        self.body_input.set_focused(false);
        self.enter(Screen::List);
    }

    fn enter(&mut self, screen: Screen) {
        debug!(from = ?self.screen, to = ?screen, "screen change");
        self.screen = screen;
    }

    fn move_selection(&mut self, offset: isize) {
        if self.notes.is_empty() {
            return;
        }
        let last = self.notes.len() - 1;
        self.selected = self.selected.saturating_add_signed(offset).min(last);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn draft(&self) -> Option<&Note> {
        self.draft.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn title_input(&self) -> &T {
        &self.title_input
    }

    pub fn body_input(&self) -> &B {
        &self.body_input
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &NoteStore {
        &self.store
    }
}

fn is_ctrl(key: &KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(ch)
}

/// `Esc` and `Ctrl+Q` both back out of an editor. Some terminals swallow a
/// lone `Esc`, hence the chord.
fn is_cancel(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc || is_ctrl(key, 'q')
}
