use std::cell::Cell;
use std::rc::Rc;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tracing::info;

use crate::contract::{movie, ContentUri};
use crate::models::MovieValues;
use crate::notify::{ObserverId, ObserverRegistry};
use crate::provider::MovieProvider;

use super::helpers::{rating_lines, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Movies seeded on every start. Titles already stored are skipped.
const SEED_MOVIES: &[(&str, i64)] = &[
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
];

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// The single movie-rating screen.
pub struct App {
    provider: MovieProvider,
    registry: Rc<ObserverRegistry>,
    observer: ObserverId,
    changed: Rc<Cell<bool>>,
    lines: Vec<String>,
    scroll: u16,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the screen on top of a provider that reports its changes to
    /// `registry`. The screen watches the whole collection.
    pub fn new(provider: MovieProvider, registry: Rc<ObserverRegistry>) -> Self {
        let changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&changed);
        let observer = registry.register(ContentUri::movies(), true, move |_| flag.set(true));

        Self {
            provider,
            registry,
            observer,
            changed,
            lines: Vec::new(),
            scroll: 0,
            status: None,
        }
    }

    /// Seed the fixed movie list and load the listing.
    pub fn insert_data(&mut self) -> Result<()> {
        let inserted = seed_movies(&self.provider)?;
        self.set_status(format!("Added {inserted} movies."), StatusKind::Info);
        self.reload()
    }

    /// Re-read the listing if the provider announced a change since the last
    /// look.
    pub fn refresh_if_changed(&mut self) -> Result<()> {
        if self.changed.replace(false) {
            self.reload()?;
        }
        Ok(())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('r') => {
                if let Err(err) = self.insert_data() {
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
            }
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => {
                let max = self.lines.len().saturating_sub(1) as u16;
                self.scroll = (self.scroll + 1).min(max);
            }
            _ => {}
        }
        Ok(false)
    }

    pub fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(FOOTER_HEIGHT)])
            .split(frame.area());

        let body: Vec<Line> = if self.lines.is_empty() {
            vec![Line::from("No movies rated yet.")]
        } else {
            self.lines.iter().map(|line| Line::from(line.as_str())).collect()
        };
        let listing = Paragraph::new(body)
            .block(Block::default().borders(Borders::ALL).title("Rotten Tomatillos"))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(listing, chunks[0]);

        let footer = match &self.status {
            Some(status) => Line::from(Span::styled(status.text.clone(), status.kind.style())),
            None => Line::from("r: reseed  ↑/↓: scroll  q: quit"),
        };
        frame.render_widget(
            Paragraph::new(footer).block(Block::default().borders(Borders::ALL)),
            chunks[1],
        );
    }

    fn reload(&mut self) -> Result<()> {
        let cursor = self
            .provider
            .query(
                &ContentUri::movies(),
                Some(&[movie::TITLE, movie::RATING]),
                None,
                &[],
                None,
            )
            .context("failed to query movies")?;
        self.lines = rating_lines(cursor).context("failed to read movie rows")?;
        self.changed.set(false);
        Ok(())
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.registry.unregister(self.observer);
    }
}

/// Bulk-insert the fixed movie list and return how many rows were new.
pub fn seed_movies(provider: &MovieProvider) -> Result<usize> {
    let values: Vec<MovieValues> = SEED_MOVIES
        .iter()
        .map(|(title, rating)| MovieValues::new(*title, *rating))
        .collect();

    let inserted = provider
        .bulk_insert(&ContentUri::movies(), &values)
        .context("failed to seed movies")?;
    info!(inserted, "seeded movie ratings");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbHelper;

    fn app() -> App {
        let registry = Rc::new(ObserverRegistry::new());
        let provider = MovieProvider::new(DbHelper::in_memory(), Rc::clone(&registry));
        App::new(provider, registry)
    }

    #[test]
    fn insert_data_renders_all_seed_movies() {
        let mut app = app();
        app.insert_data().expect("seed and load");

        assert_eq!(app.lines().len(), SEED_MOVIES.len());
        assert_eq!(app.lines()[0], "Eternal Sunshine of the Spotless Mind 5/5");
        assert_eq!(app.lines()[2], "Ponyo 1/5");
    }

    #[test]
    fn reseeding_adds_nothing() {
        let mut app = app();
        app.insert_data().expect("first seed");
        assert_eq!(seed_movies(&app.provider).expect("second seed"), 0);
        assert_eq!(app.lines().len(), SEED_MOVIES.len());
    }

    #[test]
    fn provider_changes_trigger_reload() {
        let mut app = app();
        app.insert_data().expect("seed");

        app.provider
            .insert(&ContentUri::movies(), Some(&MovieValues::new("Paprika", 4)))
            .expect("insert");
        app.refresh_if_changed().expect("refresh");

        assert!(app.lines().contains(&"Paprika 4/5".to_string()));
    }

    #[test]
    fn dropping_the_screen_unregisters_its_observer() {
        let registry = Rc::new(ObserverRegistry::new());
        let provider = MovieProvider::new(DbHelper::in_memory(), Rc::clone(&registry));
        let app = App::new(provider, Rc::clone(&registry));
        assert_eq!(registry.len(), 1);
        drop(app);
        assert!(registry.is_empty());
    }

    #[test]
    fn quit_keys_exit() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')).expect("q"));
        assert!(app.handle_key(KeyCode::Esc).expect("esc"));
        assert!(!app.handle_key(KeyCode::Down).expect("down"));
    }
}
