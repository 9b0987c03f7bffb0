use anyhow::Error;

use crate::db::Cursor;
use crate::error::Result;

/// Turn a `[title, rating]` cursor into `"<title> <rating>/5"` lines. The
/// cursor is consumed, so every row is read exactly once.
pub(crate) fn rating_lines(cursor: Cursor) -> Result<Vec<String>> {
    cursor
        .map(|row| -> Result<String> {
            let title = row.get_string(0)?;
            let rating = row.get_int(1)?;
            Ok(format!("{title} {rating}/5"))
        })
        .collect()
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;
    use crate::contract::{movie, ContentUri};
    use crate::db::DbHelper;
    use crate::models::MovieValues;
    use crate::notify::NoopNotifier;
    use crate::provider::MovieProvider;

    #[test]
    fn rating_lines_format_title_and_score() {
        let provider = MovieProvider::new(DbHelper::in_memory(), NoopNotifier);
        provider
            .bulk_insert(
                &ContentUri::movies(),
                &[MovieValues::new("Oldboy", 5), MovieValues::new("Ponyo", 1)],
            )
            .expect("seed");

        let cursor = provider
            .query(
                &ContentUri::movies(),
                Some(&[movie::TITLE, movie::RATING]),
                None,
                &[],
                None,
            )
            .expect("query");

        let lines = rating_lines(cursor).expect("render");
        assert_eq!(lines, vec!["Oldboy 5/5".to_string(), "Ponyo 1/5".to_string()]);
    }

    #[test]
    fn surface_error_prefers_root_cause() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("disk full")).context("failed to seed");
        assert_eq!(surface_error(&err.unwrap_err()), "disk full");
    }
}
