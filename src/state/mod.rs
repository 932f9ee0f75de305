// State management module
// Shared, injected handles available to every request handler

pub mod app_state;

pub use app_state::AppState;
