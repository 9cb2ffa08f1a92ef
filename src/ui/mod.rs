//! Ratatui front-end: the note state machine, its editing widgets, the
//! renderer, and the terminal loop that drives them.

mod app;
mod helpers;
mod terminal;
mod view;
mod widgets;

pub use app::{App, Screen, StatusKind, StatusMessage};
pub use terminal::run_app;
pub use view::{render, Theme};
pub use widgets::{BodyArea, BodyInput, EditWidget, LineInput, TitleInput};
