//! Core library surface for the Tomatillos movie-rating application.
//!
//! The provider owns the SQLite store and routes content URIs to CRUD
//! operations; the `ui` module is one consumer of it and the `bin` target
//! wires the two together.
pub mod config;
pub mod contract;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod provider;
pub mod ui;

/// Addressing and table names shared by every layer.
pub use contract::{movie, ContentUri};

pub use config::Config;
pub use db::{Cursor, CursorRow, DbHelper};
pub use error::{ProviderError, Result};
pub use models::{Movie, MovieValues};
pub use notify::{ChangeNotifier, NoopNotifier, ObserverId, ObserverRegistry};
pub use provider::{MovieProvider, UriMatch};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
