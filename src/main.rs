//! Binary entry point that glues the SQLite-backed movie provider to the TUI.
//! We resolve where files live, start logging into a file (the terminal
//! belongs to the UI), seed the fixed movie list and drive the Ratatui event
//! loop until the user exits.
use std::fs::{self, OpenOptions};
use std::rc::Rc;
use std::sync::Mutex;

use anyhow::Context;
use tomatillos::{run_app, App, Config, DbHelper, MovieProvider, ObserverRegistry};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    fs::create_dir_all(&config.data_dir).context("failed to create data directory")?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .context("failed to open log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let registry = Rc::new(ObserverRegistry::new());
    let provider = MovieProvider::new(DbHelper::new(&config.db_path), Rc::clone(&registry));

    let mut app = App::new(provider, registry);
    app.insert_data()?;
    tracing::info!(db = %config.db_path.display(), "movie database ready");
    run_app(&mut app)
}
