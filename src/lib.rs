//! Exercise Tracker Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod exercise;
/// Application state management
///
/// Holds the injected exercise service shared by all handlers.
pub mod state;
