pub mod auth;
pub mod matches;
pub mod messages;
pub mod realtime;
pub mod swipes;
pub mod users;

pub use auth::AuthUser;
