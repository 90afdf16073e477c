use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::User;

/// What a swipe was performed on: another developer's profile or a tool card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TargetType {
    Developer,
    Tool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SwipeAction {
    Like,
    Pass,
    SuperLike,
}

impl SwipeAction {
    /// `like` and `super_like` both count as interest for reciprocity.
    pub fn is_positive(self) -> bool {
        matches!(self, SwipeAction::Like | SwipeAction::SuperLike)
    }
}

/// A recorded directional preference. One row per
/// (swiper, target, target type); immutable, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Swipe {
    pub id: i64,
    pub swiper_id: String,
    pub target_id: String,
    pub target_type: TargetType,
    pub action: SwipeAction,
    pub created_at: DateTime<Utc>,
}

/// A mutual-like relationship. Pair order is whatever the triggering swipe
/// produced; callers must not assume user1 < user2.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i64,
    pub user1_id: String,
    pub user2_id: String,
    pub matched_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Match {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// The other member relative to `user_id`.
    pub fn counterpart_id(&self, user_id: &str) -> &str {
        if self.user1_id == user_id {
            &self.user2_id
        } else {
            &self.user1_id
        }
    }
}

/// A match as listed for one member, enriched with the other member's record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchWithCounterpart {
    pub id: i64,
    pub user1_id: String,
    pub user2_id: String,
    pub matched_at: DateTime<Utc>,
    pub is_active: bool,
    pub counterpart: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_actions() {
        assert!(SwipeAction::Like.is_positive());
        assert!(SwipeAction::SuperLike.is_positive());
        assert!(!SwipeAction::Pass.is_positive());
    }

    #[test]
    fn counterpart_resolution() {
        let m = Match {
            id: 1,
            user1_id: "alice".into(),
            user2_id: "bob".into(),
            matched_at: Utc::now(),
            is_active: true,
        };
        assert!(m.is_member("alice"));
        assert!(m.is_member("bob"));
        assert!(!m.is_member("carol"));
        assert_eq!(m.counterpart_id("alice"), "bob");
        assert_eq!(m.counterpart_id("bob"), "alice");
    }
}
