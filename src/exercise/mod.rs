//! Exercise module
//!
//! Users, their exercise logs, the SQLite store behind them and the service
//! that validates and serves every request.

pub mod db;
pub mod models;
pub mod service;

pub use db::ExerciseDb;
pub use models::{
    AddExerciseInput, AddedExercise, Exercise, ExerciseLog, LogFilter, LogQuery, NewExercise,
    User, UserId, UserSummary,
};
pub use service::ExerciseService;
