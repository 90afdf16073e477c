pub mod matching;
pub mod messages;
pub mod users;

pub use matching::{Match, MatchWithCounterpart, Swipe, SwipeAction, TargetType};
pub use messages::Message;
pub use users::User;
