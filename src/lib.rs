//! Core library surface for the Student Records Admin TUI.
//!
//! The `bin` target wires these pieces together; tests and other tooling can
//! drive the page controllers against any [`api::RecordsApi`] implementation.
pub mod api;
pub mod config;
pub mod logging;
pub mod models;
pub mod pages;
pub mod ui;

pub use api::{ApiError, HttpApi, RecordsApi};
pub use config::Config;

/// The domain records every page works with.
pub use models::{Course, Enrollment, Grade, Student};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
