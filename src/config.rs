//! Runtime configuration, resolved once at startup and passed down by value.
//! Every setting has a default and can be overridden through the environment.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::ui::Theme;

/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "notes.sqlite";
/// Log file name stored next to the database.
const LOG_FILE_NAME: &str = "notes.log";

pub const ENV_DB_PATH: &str = "NOTES_DB_PATH";
pub const ENV_LOG_FILE: &str = "NOTES_LOG_FILE";
pub const ENV_SAVE_ERRORS: &str = "NOTES_SAVE_ERRORS";
pub const ENV_TITLE_MAX_LEN: &str = "NOTES_TITLE_MAX_LEN";
pub const ENV_PREVIEW_LEN: &str = "NOTES_PREVIEW_LEN";

pub const DEFAULT_TITLE_MAX_LEN: usize = 100;
pub const DEFAULT_PREVIEW_LEN: usize = 30;

/// What the editor does when writing a note fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveErrorPolicy {
    /// Stop the interaction loop and propagate the error.
    Fatal,
    /// Stay on the body screen with the draft intact and show the error.
    #[default]
    Recover,
}

impl FromStr for SaveErrorPolicy {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fatal" => Ok(SaveErrorPolicy::Fatal),
            "recover" => Ok(SaveErrorPolicy::Recover),
            other => Err(anyhow!(
                "unknown save error policy '{other}' (expected 'fatal' or 'recover')"
            )),
        }
    }
}

impl fmt::Display for SaveErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveErrorPolicy::Fatal => write!(f, "fatal"),
            SaveErrorPolicy::Recover => write!(f, "recover"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub save_errors: SaveErrorPolicy,
    /// Character limit applied to the title widget.
    pub title_max_len: usize,
    /// Characters of body shown next to each title in the list.
    pub preview_len: usize,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = data_dir();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_path: data_dir.join(LOG_FILE_NAME),
            save_errors: SaveErrorPolicy::default(),
            title_max_len: DEFAULT_TITLE_MAX_LEN,
            preview_len: DEFAULT_PREVIEW_LEN,
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_LOG_FILE).filter(|v| !v.trim().is_empty()) {
            config.log_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_SAVE_ERRORS) {
            config.save_errors = raw
                .parse()
                .with_context(|| format!("invalid {ENV_SAVE_ERRORS}"))?;
        }
        if let Some(raw) = lookup(ENV_TITLE_MAX_LEN) {
            config.title_max_len = parse_len(&raw, ENV_TITLE_MAX_LEN)?;
        }
        if let Some(raw) = lookup(ENV_PREVIEW_LEN) {
            config.preview_len = parse_len(&raw, ENV_PREVIEW_LEN)?;
        }

        Ok(config)
    }
}

fn parse_len(raw: &str, key: &str) -> Result<usize> {
    let value = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("{key} must be a positive integer"))?;
    if value == 0 {
        return Err(anyhow!("{key} must be greater than zero"));
    }
    Ok(value)
}

/// Platform data directory for the app, falling back to the working directory
/// when no home directory can be resolved.
fn data_dir() -> PathBuf {
    ProjectDirs::from("", "", "notes-tui")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
