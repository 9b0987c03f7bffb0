//! Terminal presentation: a single screen listing every movie with its
//! rating.

mod app;
mod helpers;
mod terminal;

pub use app::{seed_movies, App};
pub use terminal::run_app;
