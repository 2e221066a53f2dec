//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite database operations
//! - Row models for accounts and friendship edges

mod database;
mod models;

pub use database::Database;
pub use models::*;
