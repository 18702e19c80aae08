#![forbid(unsafe_code)]

//! HTTP API for the exercise tracker.
//!
//! Routes requests to the operations in `exercise_core` and translates their
//! results into JSON responses and plain-text errors.

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use server::{router, ExerciseServer};
