//! Names shared by everything that touches the movie table: the content
//! authority, the table and column names, the content-type strings, and the
//! `ContentUri` value used to address the collection or a single row.

use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

/// Authority segment of every URI the provider answers to.
pub const CONTENT_AUTHORITY: &str = "android.example.com.rottentomatillos";
/// Scheme of every URI the provider answers to.
pub const CONTENT_SCHEME: &str = "content";

const CURSOR_DIR_BASE_TYPE: &str = "vnd.android.cursor.dir";
const CURSOR_ITEM_BASE_TYPE: &str = "vnd.android.cursor.item";

/// Table layout for the single `movies` table.
pub mod movie {
    pub const TABLE_NAME: &str = "movies";

    pub const ID: &str = "_id";
    pub const TITLE: &str = "title";
    pub const RATING: &str = "rating";

    /// Every column in table order.
    pub const ALL_COLUMNS: &[&str] = &[ID, TITLE, RATING];

    /// Content type returned for the whole collection.
    pub const CONTENT_DIR_TYPE: &str =
        "vnd.android.cursor.dir/android.example.com.rottentomatillos/movies";
    /// Content type returned for a single row.
    pub const CONTENT_ITEM_TYPE: &str =
        "vnd.android.cursor.item/android.example.com.rottentomatillos/movies";
}

/// A parsed `content://authority/segment/...` reference.
///
/// Empty path segments are dropped and anything after `?` or `#` is ignored,
/// so `content://a/movies/` and `content://a/movies` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentUri {
    scheme: String,
    authority: String,
    segments: Vec<String>,
}

impl ContentUri {
    pub fn new<I, S>(authority: &str, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scheme: CONTENT_SCHEME.to_string(),
            authority: authority.to_string(),
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|segment: &String| !segment.is_empty())
                .collect(),
        }
    }

    /// `content://<authority>`
    pub fn base() -> Self {
        Self::new(CONTENT_AUTHORITY, std::iter::empty::<String>())
    }

    /// `content://<authority>/movies`, the URI addressing every row.
    pub fn movies() -> Self {
        Self::base().with_appended_path(movie::TABLE_NAME)
    }

    /// `content://<authority>/movies/<id>`
    pub fn movie(id: i64) -> Self {
        Self::movies().with_appended_id(id)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn path_segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last_path_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn with_appended_path(&self, segment: &str) -> Self {
        let mut uri = self.clone();
        if !segment.is_empty() {
            uri.segments.push(segment.to_string());
        }
        uri
    }

    pub fn with_appended_id(&self, id: i64) -> Self {
        self.with_appended_path(&id.to_string())
    }

    /// Read the row id from the last path segment. Only plain decimal digits
    /// count, so `-1` or `3a` yield `None`.
    pub fn parse_id(&self) -> Option<i64> {
        let last = self.last_path_segment()?;
        if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        last.parse().ok()
    }

    /// True when `self` sits strictly below `ancestor` in the same authority.
    pub fn is_descendant_of(&self, ancestor: &ContentUri) -> bool {
        self.scheme == ancestor.scheme
            && self.authority == ancestor.authority
            && self.segments.len() > ancestor.segments.len()
            && self.segments.starts_with(&ancestor.segments)
    }
}

impl FromStr for ContentUri {
    type Err = ProviderError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (scheme, rest) = raw
            .split_once("://")
            .ok_or_else(|| ProviderError::UnsupportedUri(raw.to_string()))?;
        if scheme.is_empty() {
            return Err(ProviderError::UnsupportedUri(raw.to_string()));
        }

        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let mut parts = rest.split('/');
        let authority = parts.next().unwrap_or_default();

        Ok(Self {
            scheme: scheme.to_string(),
            authority: authority.to_string(),
            segments: parts
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Build a content type string the way the platform convention expects.
pub fn content_type(item: bool, path: &str) -> String {
    let base = if item {
        CURSOR_ITEM_BASE_TYPE
    } else {
        CURSOR_DIR_BASE_TYPE
    };
    format!("{base}/{CONTENT_AUTHORITY}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_uri_renders_authority_and_table() {
        assert_eq!(
            ContentUri::movies().to_string(),
            "content://android.example.com.rottentomatillos/movies"
        );
    }

    #[test]
    fn parse_round_trips_item_uri() {
        let uri: ContentUri = "content://android.example.com.rottentomatillos/movies/42"
            .parse()
            .expect("parse uri");
        assert_eq!(uri, ContentUri::movie(42));
        assert_eq!(uri.parse_id(), Some(42));
    }

    #[test]
    fn parse_ignores_trailing_slash_and_query() {
        let uri: ContentUri = "content://android.example.com.rottentomatillos/movies/?x=1"
            .parse()
            .expect("parse uri");
        assert_eq!(uri, ContentUri::movies());
    }

    #[test]
    fn parse_rejects_missing_scheme() {
        let err = "movies/1".parse::<ContentUri>().unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedUri(_)));
    }

    #[test]
    fn parse_id_only_accepts_digits() {
        assert_eq!(ContentUri::movies().with_appended_path("3a").parse_id(), None);
        assert_eq!(ContentUri::movies().with_appended_path("-1").parse_id(), None);
        assert_eq!(ContentUri::movies().parse_id(), None);
    }

    #[test]
    fn descendant_check_requires_strict_prefix() {
        let movies = ContentUri::movies();
        assert!(ContentUri::movie(1).is_descendant_of(&movies));
        assert!(movies.is_descendant_of(&ContentUri::base()));
        assert!(!movies.is_descendant_of(&movies));
        assert!(!movies.is_descendant_of(&ContentUri::movie(1)));
    }

    #[test]
    fn content_types_match_constants() {
        assert_eq!(content_type(false, movie::TABLE_NAME), movie::CONTENT_DIR_TYPE);
        assert_eq!(content_type(true, movie::TABLE_NAME), movie::CONTENT_ITEM_TYPE);
    }
}
