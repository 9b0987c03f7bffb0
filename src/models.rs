//! Domain types that travel between the provider and its callers. `Movie` is
//! a fully hydrated row, `MovieValues` is the partial value set a caller hands
//! to insert or update.

use std::fmt;

use rusqlite::types::Value;

use crate::contract::movie;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `movies` table.
pub struct Movie {
    pub id: i64,
    pub title: String,
    /// Stored as-is; ratings are only checked on the way in.
    pub rating: i64,
}

impl fmt::Display for Movie {
    /// `<title> <rating>/5`, the line format used by the listing screen.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/5", self.title, self.rating)
    }
}

/// Column values for a write. Fields left as `None` are not written at all,
/// so an update carrying only a rating leaves the title untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieValues {
    pub title: Option<String>,
    pub rating: Option<i64>,
}

impl MovieValues {
    pub fn new(title: impl Into<String>, rating: i64) -> Self {
        Self {
            title: Some(title.into()),
            rating: Some(rating),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_rating(mut self, rating: i64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.rating.is_none()
    }

    /// Column name and SQL value for every field that is set, in table order.
    pub fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut columns = Vec::with_capacity(2);
        if let Some(title) = &self.title {
            columns.push((movie::TITLE, Value::Text(title.clone())));
        }
        if let Some(rating) = self.rating {
            columns.push((movie::RATING, Value::Integer(rating)));
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_out_of_five_format() {
        let movie = Movie {
            id: 1,
            title: "Akira".to_string(),
            rating: 3,
        };
        assert_eq!(movie.to_string(), "Akira 3/5");
    }

    #[test]
    fn columns_skip_unset_fields() {
        let values = MovieValues::default().with_rating(4);
        let columns = values.columns();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].0, movie::RATING);
        assert_eq!(columns[0].1, Value::Integer(4));
        assert!(MovieValues::default().is_empty());
    }
}
