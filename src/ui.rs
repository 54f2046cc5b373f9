//! Ratatui front-end: a navigation bar over four pages, modal forms for adding
//! and editing, and a two-step confirmation before anything is deleted.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::{App, Screen};
pub use terminal::run_app;
