pub mod connection;
pub mod matches;
pub mod messages;
pub mod migrations;
pub mod swipes;
pub mod users;

pub use connection::{DatabaseConfig, get_db_pool};
