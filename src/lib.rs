//! Tunedeck: a desktop shell for a music streaming web app.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod host;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod plugins;
pub mod services;
pub mod types;

#[cfg(feature = "gui")]
pub mod ui;
