//! Renders the application state into text. Everything here is a pure
//! function of the [`App`]; styling comes from the [`Theme`] in the config.

use ratatui::layout::Position;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::app::{App, Screen};
use super::helpers::scroll_to_show;
use super::widgets::{BodyInput, EditWidget, TitleInput};

pub const HEADER: &str = "NOTES";
pub const EMPTY_LIST: &str = "No notes yet. Press 'n' to create one.";
pub const TITLE_PLACEHOLDER: &str = "Write the note title";

const LIST_HELP: &str = "n new • enter edit • q quit";
const TITLE_HELP: &str = "enter next • esc discard";
const BODY_HELP: &str = "ctrl+s save • esc discard";

/// Rows above the list or the active widget: header and a blank spacer.
const LIST_TOP: usize = 2;
/// Rows above the active widget: header, spacer, label, spacer.
const WIDGET_TOP: usize = 4;

/// Presentation styles handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub header: Style,
    pub marker: Style,
    pub faint: Style,
    pub info: Style,
    pub error: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header: Style::default()
                .bg(Color::Indexed(99))
                .add_modifier(Modifier::BOLD),
            marker: Style::default().fg(Color::Indexed(99)),
            faint: Style::default()
                .fg(Color::Indexed(255))
                .add_modifier(Modifier::DIM),
            info: Style::default().fg(Color::Green),
            error: Style::default().fg(Color::Red),
        }
    }
}

/// Build every line of the current frame.
pub fn render<T: TitleInput, B: BodyInput>(app: &App<T, B>) -> Vec<Line<'static>> {
    let theme = &app.config().theme;
    let mut lines = vec![
        Line::from(Span::styled(format!(" {HEADER} "), theme.header)),
        Line::from(""),
    ];

    let help = match app.screen() {
        Screen::List => {
            render_list(app, &mut lines);
            LIST_HELP
        }
        Screen::EditTitle => {
            lines.push(Line::from("Note title:"));
            lines.push(Line::from(""));
            let value = app.title_input().value();
            if value.is_empty() {
                lines.push(Line::from(Span::styled(TITLE_PLACEHOLDER, theme.faint)));
            } else {
                lines.push(Line::from(value));
            }
            TITLE_HELP
        }
        Screen::EditBody => {
            let title = app.draft().map(|d| d.title.clone()).unwrap_or_default();
            lines.push(Line::from(format!("Note: {title}")));
            lines.push(Line::from(""));
            lines.extend(app.body_input().lines().into_iter().map(Line::from));
            BODY_HELP
        }
    };

    lines.push(Line::from(""));
    if let Some(status) = app.status() {
        lines.push(Line::from(Span::styled(
            status.text.clone(),
            status.kind.style(theme),
        )));
    }
    lines.push(Line::from(Span::styled(help, theme.faint)));
    lines
}

fn render_list<T: TitleInput, B: BodyInput>(app: &App<T, B>, lines: &mut Vec<Line<'static>>) {
    let theme = &app.config().theme;
    if app.notes().is_empty() {
        lines.push(Line::from(Span::styled(EMPTY_LIST, theme.faint)));
        return;
    }

    let preview_len = app.config().preview_len;
    for (idx, note) in app.notes().iter().enumerate() {
        let marker = if idx == app.selected() { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, theme.marker),
            Span::raw(note.title.clone()),
            Span::raw(" | "),
            Span::styled(note.preview(preview_len), theme.faint),
        ]));
    }
}

/// Row that must stay visible, plus the cursor column when a widget is active.
fn focus<T: TitleInput, B: BodyInput>(app: &App<T, B>) -> (usize, Option<usize>) {
    match app.screen() {
        Screen::List => (LIST_TOP + app.selected(), None),
        Screen::EditTitle => {
            let (row, col) = app.title_input().cursor();
            (WIDGET_TOP + row, Some(col))
        }
        Screen::EditBody => {
            let (row, col) = app.body_input().cursor();
            (WIDGET_TOP + row, Some(col))
        }
    }
}

/// Draw the frame, scrolling so the selection or cursor stays on screen.
pub(crate) fn draw<T: TitleInput, B: BodyInput>(frame: &mut Frame, app: &App<T, B>) {
    let area = frame.area();
    let (row, col) = focus(app);
    let row = u16::try_from(row).unwrap_or(u16::MAX);
    let scroll = scroll_to_show(row, area.height);

    frame.render_widget(Paragraph::new(render(app)).scroll((scroll, 0)), area);

    if let Some(col) = col {
        let col = u16::try_from(col).unwrap_or(u16::MAX);
        let y = row - scroll;
        if col < area.width && y < area.height {
            frame.set_cursor_position(Position::new(area.x + col, area.y + y));
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::config::Config;
    use crate::db::NoteStore;
    use crate::models::Note;

    fn app(notes: &[(&str, &str)]) -> App {
        let mut store = NoteStore::open_in_memory().unwrap();
        for (title, body) in notes {
            store.save(&Note::new(*title, *body)).unwrap();
        }
        App::new(store, Config::default()).unwrap()
    }

    fn text(app: &App) -> Vec<String> {
        render(app)
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    #[test]
    fn empty_list_shows_hint_and_help() {
        let lines = text(&app(&[]));
        assert_eq!(lines[0], " NOTES ");
        assert!(lines.contains(&EMPTY_LIST.to_string()));
        assert_eq!(lines.last().unwrap(), LIST_HELP);
    }

    #[test]
    fn list_rows_show_marker_title_and_preview() {
        let body = "x".repeat(50);
        let mut app = app(&[("Long", body.as_str()), ("Short", "a\nb")]);
        let lines = text(&app);
        assert_eq!(lines[2], format!("> Long | {}", "x".repeat(30)));
        assert_eq!(lines[3], "  Short | ab");

        press(&mut app, KeyCode::Down);
        let lines = text(&app);
        assert!(lines[2].starts_with("  Long"));
        assert!(lines[3].starts_with("> Short"));
    }

    #[test]
    fn title_screen_shows_placeholder_then_value() {
        let mut app = app(&[]);
        press(&mut app, KeyCode::Char('n'));
        let lines = text(&app);
        assert_eq!(lines[2], "Note title:");
        assert_eq!(lines[4], TITLE_PLACEHOLDER);
        assert_eq!(lines.last().unwrap(), TITLE_HELP);

        press(&mut app, KeyCode::Char('H'));
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(text(&app)[4], "Hi");
    }

    #[test]
    fn body_screen_shows_every_line() {
        let mut app = app(&[("Groceries", "Milk\nEggs")]);
        press(&mut app, KeyCode::Enter);
        let lines = text(&app);
        assert_eq!(lines[2], "Note: Groceries");
        assert_eq!(&lines[4..6], ["Milk", "Eggs"]);
        assert_eq!(lines.last().unwrap(), BODY_HELP);
    }

    #[test]
    fn status_sits_above_help() {
        let mut app = app(&[("a", "")]);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        let lines = text(&app);
        let n = lines.len();
        assert_eq!(lines[n - 2], "Changes discarded.");
        assert_eq!(lines[n - 1], LIST_HELP);
    }

    fn buffer_rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn draw_places_cursor_inside_body_widget() {
        let mut app = app(&[("Groceries", "Milk\nEggs")]);
        press(&mut app, KeyCode::Enter);

        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let rows = buffer_rows(&terminal);
        assert_eq!(rows[0], " NOTES");
        assert_eq!(rows[4], "Milk");
        assert_eq!(rows[5], "Eggs");
        assert_eq!(
            terminal.get_cursor_position().unwrap(),
            Position::new(4, 5)
        );
    }

    #[test]
    fn draw_scrolls_to_keep_selection_visible() {
        let titles: Vec<String> = (0..10).map(|i| format!("note {i}")).collect();
        let notes: Vec<(&str, &str)> = titles.iter().map(|t| (t.as_str(), "")).collect();
        let mut app = app(&notes);
        for _ in 0..9 {
            press(&mut app, KeyCode::Down);
        }

        let mut terminal = Terminal::new(TestBackend::new(30, 6)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let rows = buffer_rows(&terminal);
        assert_eq!(rows[5], "> note 9 |");
    }
}
