use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::debug;

use crate::contract::movie;
use crate::error::{ProviderError, Result};

/// Where the helper should open its database.
#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// Owns the single SQLite connection behind the provider.
///
/// Nothing touches the disk until the first call to [`DbHelper::readable`]
/// or [`DbHelper::writable`]; that call creates the data directory, opens the
/// file and creates the `movies` table if it is missing.
pub struct DbHelper {
    location: Location,
    conn: OnceCell<Connection>,
}

impl DbHelper {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            location: Location::File(path.as_ref().to_path_buf()),
            conn: OnceCell::new(),
        }
    }

    /// A private database that disappears with the helper.
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: OnceCell::new(),
        }
    }

    /// Handle for queries. Shares the connection used for writes.
    pub fn readable(&self) -> Result<&Connection> {
        self.connection()
    }

    /// Handle for inserts, updates, deletes and transactions.
    pub fn writable(&self) -> Result<&Connection> {
        self.connection()
    }

    fn connection(&self) -> Result<&Connection> {
        if let Some(conn) = self.conn.get() {
            return Ok(conn);
        }
        let conn = self.open()?;
        Ok(self.conn.get_or_init(|| conn))
    }

    fn open(&self) -> Result<Connection> {
        let conn = match &self.location {
            Location::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|err| init_error(path, err))?;
                }
                debug!(path = %path.display(), "opening movie database");
                Connection::open(path).map_err(|err| init_error(path, err))?
            }
            Location::Memory => {
                debug!("opening in-memory movie database");
                Connection::open_in_memory().map_err(|err| init_error(&self.display_path(), err))?
            }
        };

        create_schema(&conn).map_err(|err| init_error(&self.display_path(), err))?;
        Ok(conn)
    }

    fn display_path(&self) -> PathBuf {
        match &self.location {
            Location::File(path) => path.clone(),
            Location::Memory => PathBuf::from(":memory:"),
        }
    }
}

fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                {id} INTEGER PRIMARY KEY AUTOINCREMENT,
                {title} TEXT NOT NULL UNIQUE,
                {rating} INTEGER NOT NULL
            )",
            table = movie::TABLE_NAME,
            id = movie::ID,
            title = movie::TITLE,
            rating = movie::RATING,
        ),
        [],
    )?;
    Ok(())
}

fn init_error<E>(path: &Path, err: E) -> ProviderError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ProviderError::StorageInit {
        path: path.to_path_buf(),
        source: Box::new(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_creates_the_movies_table() {
        let helper = DbHelper::in_memory();
        let conn = helper.readable().expect("open database");
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [movie::TABLE_NAME],
                |row| row.get(0),
            )
            .expect("inspect schema");
        assert_eq!(count, 1);
    }

    #[test]
    fn readable_and_writable_share_a_connection() {
        let helper = DbHelper::in_memory();
        let read = helper.readable().expect("readable") as *const Connection;
        let write = helper.writable().expect("writable") as *const Connection;
        assert_eq!(read, write);
    }

    #[test]
    fn unusable_path_is_a_storage_init_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"file").expect("write blocker");

        let helper = DbHelper::new(blocker.join("movies.sqlite"));
        let err = helper.writable().unwrap_err();
        assert!(matches!(err, ProviderError::StorageInit { .. }));
    }
}
