use std::vec;

use rusqlite::types::{FromSql, FromSqlError, Value, ValueRef};
use rusqlite::Statement;

use crate::contract::movie;
use crate::error::{ProviderError, Result};
use crate::models::Movie;

/// Result of a provider query: the projected column names plus a one-pass
/// iterator over the rows.
///
/// Rows are read out of the SQLite statement before the cursor is handed
/// back, so holding or dropping a cursor never keeps a statement alive.
#[derive(Debug)]
pub struct Cursor {
    columns: Vec<String>,
    rows: vec::IntoIter<Vec<Value>>,
}

impl Cursor {
    pub(crate) fn from_statement(stmt: &mut Statement<'_>, params: &[Value]) -> Result<Self> {
        let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();
        let width = columns.len();

        let mut rows = stmt.query(rusqlite::params_from_iter(params))?;
        let mut buffered = Vec::new();
        while let Some(row) = rows.next()? {
            let values = (0..width)
                .map(|idx| row.get::<_, Value>(idx))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            buffered.push(values);
        }

        Ok(Self {
            columns,
            rows: buffered.into_iter(),
        })
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Iterator for Cursor {
    type Item = CursorRow;

    fn next(&mut self) -> Option<Self::Item> {
        let values = self.rows.next()?;
        Some(CursorRow {
            columns: self.columns.clone(),
            values,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Cursor {}

/// One projected row.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorRow {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl CursorRow {
    /// Convert the value at `idx` using SQLite's usual conversions.
    pub fn get<T: FromSql>(&self, idx: usize) -> Result<T> {
        let value = self.values.get(idx).ok_or_else(|| {
            ProviderError::Storage(rusqlite::Error::InvalidColumnIndex(idx))
        })?;
        T::column_result(ValueRef::from(value)).map_err(|err| {
            let err = match err {
                FromSqlError::InvalidType => rusqlite::Error::InvalidColumnType(
                    idx,
                    self.columns[idx].clone(),
                    value.data_type(),
                ),
                other => rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    value.data_type(),
                    Box::new(other),
                ),
            };
            ProviderError::Storage(err)
        })
    }

    pub fn get_by_name<T: FromSql>(&self, name: &str) -> Result<T> {
        let idx = self
            .columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| ProviderError::Storage(rusqlite::Error::InvalidColumnName(name.to_string())))?;
        self.get(idx)
    }

    pub fn get_string(&self, idx: usize) -> Result<String> {
        self.get(idx)
    }

    pub fn get_int(&self, idx: usize) -> Result<i64> {
        self.get(idx)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Hydrate a [`Movie`] when the row carries all three columns.
    pub fn to_movie(&self) -> Result<Movie> {
        Ok(Movie {
            id: self.get_by_name(movie::ID)?,
            title: self.get_by_name(movie::TITLE)?,
            rating: self.get_by_name(movie::RATING)?,
        })
    }
}
