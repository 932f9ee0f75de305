// Application state
// Holds the exercise service; cloned into every handler by axum

use crate::exercise::{ExerciseDb, ExerciseService};
use std::sync::Arc;

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Exercise tracker operations
    pub exercises: Arc<ExerciseService>,
}

impl AppState {
    /// Create application state around an already connected store
    pub fn new(db: ExerciseDb) -> Self {
        Self {
            exercises: Arc::new(ExerciseService::new(db)),
        }
    }
}
