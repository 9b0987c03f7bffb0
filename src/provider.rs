//! Managed access to the movie table.
//!
//! Callers address data with a [`ContentUri`]: the collection URI reaches
//! every row, an item URI reaches the single row whose id it embeds. Every
//! write that changes stored data is announced through the injected
//! [`ChangeNotifier`].

use rusqlite::types::Value;
use rusqlite::{Connection, ErrorCode};
use tracing::{debug, info, warn};

use crate::contract::{movie, ContentUri, CONTENT_AUTHORITY, CONTENT_SCHEME};
use crate::db::{Cursor, DbHelper};
use crate::error::{ProviderError, Result};
use crate::models::MovieValues;
use crate::notify::ChangeNotifier;

/// Lowest rating the provider accepts on writes.
pub const MIN_RATING: i64 = 1;
/// Highest rating the provider accepts on writes.
pub const MAX_RATING: i64 = 5;

/// What a URI points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriMatch {
    /// `content://<authority>/movies`
    Collection,
    /// `content://<authority>/movies/<id>`
    Item(i64),
    Unmatched,
}

/// Classify a URI. Only the two movie shapes under our authority match.
pub fn match_uri(uri: &ContentUri) -> UriMatch {
    if uri.scheme() != CONTENT_SCHEME || uri.authority() != CONTENT_AUTHORITY {
        return UriMatch::Unmatched;
    }

    match uri.path_segments() {
        [table] if table == movie::TABLE_NAME => UriMatch::Collection,
        [table, _] if table == movie::TABLE_NAME => {
            uri.parse_id().map_or(UriMatch::Unmatched, UriMatch::Item)
        }
        _ => UriMatch::Unmatched,
    }
}

/// Reject writes with no value set or with a rating outside 1..=5. A missing
/// rating passes; the table's NOT NULL constraint deals with that.
pub fn check_input(values: Option<&MovieValues>) -> Result<&MovieValues> {
    let values =
        values.ok_or_else(|| ProviderError::InvalidInput("Cannot have null content values".into()))?;

    if let Some(rating) = values.rating {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ProviderError::InvalidInput(format!(
                "The rating {rating} is not between {MIN_RATING} and {MAX_RATING}."
            )));
        }
    }

    Ok(values)
}

/// URI-routed CRUD over the `movies` table.
pub struct MovieProvider {
    helper: DbHelper,
    notifier: Box<dyn ChangeNotifier>,
}

impl MovieProvider {
    pub fn new(helper: DbHelper, notifier: impl ChangeNotifier + 'static) -> Self {
        Self {
            helper,
            notifier: Box::new(notifier),
        }
    }

    pub fn resolve(&self, uri: &ContentUri) -> UriMatch {
        match_uri(uri)
    }

    /// Read rows. For an item URI the selection is replaced by an id match and
    /// any selection the caller passed is ignored. A missing row yields an
    /// empty cursor.
    pub fn query(
        &self,
        uri: &ContentUri,
        projection: Option<&[&str]>,
        selection: Option<&str>,
        selection_args: &[&str],
        sort_order: Option<&str>,
    ) -> Result<Cursor> {
        let (selection, params) = self.scoped_selection(uri, selection, selection_args)?;
        let columns = projection_clause(projection)?;

        let mut sql = format!("SELECT {columns} FROM {}", movie::TABLE_NAME);
        push_where(&mut sql, selection.as_deref());
        if let Some(order) = sort_order.filter(|order| !order.trim().is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        let conn = self.helper.readable()?;
        let mut stmt = conn.prepare(&sql)?;
        Cursor::from_statement(&mut stmt, &params)
    }

    pub fn get_type(&self, uri: &ContentUri) -> Result<&'static str> {
        match self.resolve(uri) {
            UriMatch::Collection => Ok(movie::CONTENT_DIR_TYPE),
            UriMatch::Item(_) => Ok(movie::CONTENT_ITEM_TYPE),
            UriMatch::Unmatched => Err(unsupported(uri)),
        }
    }

    /// Insert one movie through the collection URI and return the new row's
    /// URI. A title that is already stored is skipped and yields `Ok(None)`.
    pub fn insert(&self, uri: &ContentUri, values: Option<&MovieValues>) -> Result<Option<ContentUri>> {
        let values = check_input(values)?;

        match self.resolve(uri) {
            UriMatch::Collection => {
                let conn = self.helper.writable()?;
                let Some(id) = insert_row(conn, values)? else {
                    return Ok(None);
                };
                self.notifier.notify_change(uri);
                Ok(Some(ContentUri::movies().with_appended_id(id)))
            }
            _ => Err(unsupported(uri)),
        }
    }

    /// Insert a batch and return how many rows were actually added.
    ///
    /// Through the collection URI the batch runs in one transaction: stored
    /// titles are skipped, and an invalid row rolls back everything before it.
    /// Any other URI goes through [`MovieProvider::insert`] row by row.
    pub fn bulk_insert(&self, uri: &ContentUri, values: &[MovieValues]) -> Result<usize> {
        match self.resolve(uri) {
            UriMatch::Collection => {
                let conn = self.helper.writable()?;
                let tx = conn.unchecked_transaction()?;

                let mut inserted = 0;
                for row in values {
                    let row = check_input(Some(row))?;
                    if insert_row(&tx, row)?.is_some() {
                        inserted += 1;
                    }
                }
                tx.commit()?;

                if inserted > 0 {
                    self.notifier.notify_change(uri);
                }
                Ok(inserted)
            }
            _ => {
                let mut inserted = 0;
                for row in values {
                    if self.insert(uri, Some(row))?.is_some() {
                        inserted += 1;
                    }
                }
                Ok(inserted)
            }
        }
    }

    /// Overwrite the columns set in `values` on every selected row. Item URIs
    /// ignore the caller's selection.
    pub fn update(
        &self,
        uri: &ContentUri,
        values: Option<&MovieValues>,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> Result<usize> {
        let values = check_input(values)?;
        let (selection, where_params) = self.scoped_selection(uri, selection, selection_args)?;
        if values.is_empty() {
            return Err(ProviderError::InvalidInput("Empty values".into()));
        }

        let columns = values.columns();
        let assignments = columns
            .iter()
            .map(|(name, _)| format!("{name} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {} SET {assignments}", movie::TABLE_NAME);
        push_where(&mut sql, selection.as_deref());

        let params: Vec<Value> = columns
            .into_iter()
            .map(|(_, value)| value)
            .chain(where_params)
            .collect();

        let conn = self.helper.writable()?;
        let updated = conn.execute(&sql, rusqlite::params_from_iter(params))?;
        if updated != 0 {
            self.notifier.notify_change(uri);
        }
        Ok(updated)
    }

    /// Remove selected rows. With no selection the whole collection goes, and
    /// that always counts as a change even if the table was already empty.
    pub fn delete(&self, uri: &ContentUri, selection: Option<&str>, selection_args: &[&str]) -> Result<usize> {
        let (scoped, params) = self.scoped_selection(uri, selection, selection_args)?;

        let mut sql = format!("DELETE FROM {}", movie::TABLE_NAME);
        push_where(&mut sql, scoped.as_deref());

        let conn = self.helper.writable()?;
        let deleted = conn.execute(&sql, rusqlite::params_from_iter(params))?;
        if selection.is_none() || deleted != 0 {
            self.notifier.notify_change(uri);
        }
        Ok(deleted)
    }

    /// Resolve the WHERE clause and its parameters for a URI. Item URIs always
    /// become `_id = ?` bound to the embedded id.
    fn scoped_selection(
        &self,
        uri: &ContentUri,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> Result<(Option<String>, Vec<Value>)> {
        match self.resolve(uri) {
            UriMatch::Collection => Ok((
                selection
                    .filter(|clause| !clause.trim().is_empty())
                    .map(str::to_string),
                selection_args
                    .iter()
                    .map(|arg| Value::Text((*arg).to_string()))
                    .collect(),
            )),
            UriMatch::Item(id) => {
                if selection.is_some() {
                    debug!(%uri, "ignoring explicit selection for item uri");
                }
                Ok((Some(format!("{} = ?", movie::ID)), vec![Value::Integer(id)]))
            }
            UriMatch::Unmatched => Err(unsupported(uri)),
        }
    }
}

fn unsupported(uri: &ContentUri) -> ProviderError {
    warn!(%uri, "no match for uri");
    ProviderError::UnsupportedUri(uri.to_string())
}

fn projection_clause(projection: Option<&[&str]>) -> Result<String> {
    let Some(columns) = projection.filter(|columns| !columns.is_empty()) else {
        return Ok("*".to_string());
    };

    if let Some(unknown) = columns.iter().find(|column| !movie::ALL_COLUMNS.contains(*column)) {
        return Err(ProviderError::InvalidInput(format!("Invalid column {unknown}")));
    }
    Ok(columns.join(", "))
}

fn push_where(sql: &mut String, selection: Option<&str>) {
    if let Some(clause) = selection {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }
}

/// Insert one validated row. Returns `None` when the title is already stored.
fn insert_row(conn: &Connection, values: &MovieValues) -> Result<Option<i64>> {
    let columns = values.columns();
    let sql = if columns.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES", movie::TABLE_NAME)
    } else {
        let names = columns.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!("INSERT INTO {} ({names}) VALUES ({placeholders})", movie::TABLE_NAME)
    };
    let params = columns.into_iter().map(|(_, value)| value);

    match conn.execute(&sql, rusqlite::params_from_iter(params)) {
        Ok(_) => Ok(Some(conn.last_insert_rowid())),
        Err(err) if is_duplicate_title(&err) => {
            info!(
                title = values.title.as_deref().unwrap_or_default(),
                "movie already in the database, skipping insert"
            );
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Only the UNIQUE constraint on `movies.title` counts as a duplicate; any
/// other constraint failure is a real error.
fn is_duplicate_title(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(message)) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && message.contains(&format!("{}.{}", movie::TABLE_NAME, movie::TITLE))
        }
        _ => false,
    }
}
