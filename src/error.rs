//! Error type shared by the contract, storage and provider layers.
//!
//! Duplicate titles are deliberately absent from this enum: the provider
//! swallows them and reports a smaller count instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// The URI does not address the movie collection or a single movie.
    #[error("Unknown uri: {0}")]
    UnsupportedUri(String),

    /// The value set was absent, empty, or carried an out-of-range rating.
    #[error("{0}")]
    InvalidInput(String),

    /// The database file or its table could not be created. Nothing else in
    /// the application can work after this.
    #[error("failed to initialize movie database at {}", .path.display())]
    StorageInit {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other SQLite failure while a statement runs.
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
