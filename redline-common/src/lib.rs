//! # Redline Common Library
//!
//! Shared code for the Redline design-review backend:
//! - Error taxonomy
//! - Configuration resolution
//! - Database initialization, models, and queries
//! - Catalog synchronization (CSV source loader + reconciler)

pub mod config;
pub mod db;
pub mod error;
pub mod sync;

pub use error::{Error, Result};
