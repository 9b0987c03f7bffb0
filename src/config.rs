use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".tomatillos";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "movies.sqlite";
/// Log file written next to the database; the terminal is owned by the UI.
const LOG_FILE_NAME: &str = "tomatillos.log";
/// Filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info,tomatillos=debug";

/// Where the application keeps its files and how chatty it is.
#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolve everything beneath `~/.tomatillos`.
    pub fn load() -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::at(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Root every file in an explicit directory.
    pub fn at(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let log_filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_path: data_dir.join(LOG_FILE_NAME),
            data_dir,
            log_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_inside_the_data_dir() {
        let config = Config::at("/tmp/tomatillos-test");
        assert_eq!(config.db_path, Path::new("/tmp/tomatillos-test/movies.sqlite"));
        assert_eq!(config.log_path, Path::new("/tmp/tomatillos-test/tomatillos.log"));
    }
}
