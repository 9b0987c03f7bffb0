//! Persistence module split across the connection owner and the cursor type
//! handed back from queries.

mod connection;
mod cursor;

pub use connection::DbHelper;
pub use cursor::{Cursor, CursorRow};
