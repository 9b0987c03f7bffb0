#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use tomatillos::{ContentUri, DbHelper, MovieProvider, MovieValues, ObserverRegistry};

/// Provider backed by an in-memory database plus a log of every URI it
/// announced as changed.
pub struct Harness {
    pub provider: MovieProvider,
    pub registry: Rc<ObserverRegistry>,
    pub changes: Rc<RefCell<Vec<ContentUri>>>,
}

impl Harness {
    pub fn in_memory() -> Self {
        Self::with_helper(DbHelper::in_memory())
    }

    pub fn with_helper(helper: DbHelper) -> Self {
        let registry = Rc::new(ObserverRegistry::new());
        let changes = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&changes);
        registry.register(ContentUri::base(), true, move |uri| {
            log.borrow_mut().push(uri.clone())
        });

        Self {
            provider: MovieProvider::new(helper, Rc::clone(&registry)),
            registry,
            changes,
        }
    }

    pub fn change_count(&self) -> usize {
        self.changes.borrow().len()
    }

    pub fn clear_changes(&self) {
        self.changes.borrow_mut().clear();
    }

    pub fn row_count(&self) -> usize {
        self.provider
            .query(&ContentUri::movies(), None, None, &[], None)
            .expect("count rows")
            .count()
    }

    pub fn titles(&self) -> Vec<String> {
        self.provider
            .query(&ContentUri::movies(), Some(&["title"]), None, &[], Some("_id"))
            .expect("query titles")
            .map(|row| row.get_string(0).expect("title column"))
            .collect()
    }
}

pub fn ten_movies() -> Vec<MovieValues> {
    [
        ("Eternal Sunshine of the Spotless Mind", 5),
        ("Oldboy", 5),
        ("Ponyo", 1),
        ("Frozen", 2),
        ("Let the Right One In", 3),
        ("Amelie", 5),
        ("Pan's Labyrinth", 5),
        ("City of God", 4),
        ("Akira", 3),
        ("Some Like It Hot", 4),
    ]
    .into_iter()
    .map(|(title, rating)| MovieValues::new(title, rating))
    .collect()
}

pub fn temp_db_path(name: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let path = dir.path().join("nested").join(name);
    (dir, path)
}
