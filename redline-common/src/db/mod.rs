//! Database models and queries

pub mod comments;
pub mod init;
pub mod uploads;
pub mod wireframes;

pub use init::init_database;
