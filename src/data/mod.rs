//! Data layer module
//!
//! Handles all data persistence and in-memory hand-off state:
//! - SQLite database operations (inbox messages, saved analyses)
//! - Share bridge (volatile)

mod database;
mod models;
mod seed;
mod share;

pub use database::Database;
pub use models::*;
pub use share::{InMemoryShareBridge, ShareBridge};
