//! Binary entry point: resolve configuration, start logging, open the note
//! store, and hand control to the terminal loop.
use notes_tui::{logging, run_app, App, Config, NoteStore};
use tracing::{error, info};

/// Any error returned here ends the process with a non-zero status after the
/// terminal has been restored.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    if let Err(err) = logging::init(&config.log_path) {
        eprintln!("warning: running without a log file: {err:#}");
    }
    info!(
        db = %config.db_path.display(),
        save_errors = %config.save_errors,
        "starting"
    );

    let store = NoteStore::open(&config.db_path).inspect_err(|err| {
        error!(error = %err, "notes storage unavailable");
    })?;

    let mut app = App::new(store, config)?;
    let result = run_app(&mut app);
    if let Err(err) = &result {
        error!("session ended with error: {err:#}");
    }
    result
}
