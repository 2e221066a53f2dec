//! Data models
//!
//! Rust structs representing database rows.
//! All models use ULID for IDs and chrono for timestamps.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::error::AppError;

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Account
// =============================================================================

/// A registered user profile
///
/// Owned by the account directory. Friendship edges only reference `id`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Lower-cased, unique
    pub email: String,
    pub position: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub expertise: Json<Vec<String>>,
    pub hobbies: Json<Vec<String>>,
    /// Platform name to profile URL
    pub social_links: Json<BTreeMap<String, String>>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Display attributes used when rendering search results and friend lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub position: Option<String>,
    pub location: Option<String>,
    pub profile_picture_url: Option<String>,
    pub expertise: Json<Vec<String>>,
    pub hobbies: Json<Vec<String>>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            position: account.position.clone(),
            location: account.location.clone(),
            profile_picture_url: account.profile_picture_url.clone(),
            expertise: Json(account.expertise.0.clone()),
            hobbies: Json(account.hobbies.0.clone()),
        }
    }
}

// =============================================================================
// Friendship edges
// =============================================================================

/// Status of a directed friendship edge
///
/// Stored as lowercase text. New values are only produced through the
/// transition methods on [`FriendshipEdge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Blocked,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One directed relationship claim from `requester_id` to `target_id`
///
/// A mutual friendship is two accepted edges, one per direction.
/// A pending request is a single edge with no reverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FriendshipEdge {
    pub id: String,
    pub requester_id: String,
    pub target_id: String,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
}

impl FriendshipEdge {
    /// Build a new pending request edge
    ///
    /// # Errors
    /// Returns `Validation` if both ends are the same account
    pub fn request(requester_id: &str, target_id: &str) -> Result<Self, AppError> {
        if requester_id == target_id {
            return Err(AppError::Validation(
                "cannot send a friend request to yourself".to_string(),
            ));
        }

        Ok(Self {
            id: EntityId::new().0,
            requester_id: requester_id.to_string(),
            target_id: target_id.to_string(),
            status: FriendshipStatus::Pending,
            created_at: Utc::now(),
        })
    }

    /// Promote a pending request
    ///
    /// Returns the promoted edge and the new reciprocal edge
    /// (`target → requester`, accepted).
    ///
    /// # Errors
    /// Returns `Validation` unless the edge is pending
    pub fn accept(self) -> Result<(Self, Self), AppError> {
        if self.status != FriendshipStatus::Pending {
            return Err(AppError::Validation(format!(
                "cannot accept a friendship that is {}",
                self.status
            )));
        }

        let reciprocal = Self {
            id: EntityId::new().0,
            requester_id: self.target_id.clone(),
            target_id: self.requester_id.clone(),
            status: FriendshipStatus::Accepted,
            created_at: Utc::now(),
        };
        let promoted = Self {
            status: FriendshipStatus::Accepted,
            ..self
        };

        Ok((promoted, reciprocal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_rejects_self_edge() {
        let error = FriendshipEdge::request("a", "a").expect_err("self edge must fail");
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[test]
    fn request_starts_pending() {
        let edge = FriendshipEdge::request("a", "b").unwrap();
        assert_eq!(edge.status, FriendshipStatus::Pending);
        assert_eq!(edge.requester_id, "a");
        assert_eq!(edge.target_id, "b");
    }

    #[test]
    fn accept_produces_mirrored_accepted_pair() {
        let edge = FriendshipEdge::request("a", "b").unwrap();
        let original_id = edge.id.clone();

        let (promoted, reciprocal) = edge.accept().unwrap();

        assert_eq!(promoted.id, original_id);
        assert_eq!(promoted.status, FriendshipStatus::Accepted);
        assert_eq!(reciprocal.status, FriendshipStatus::Accepted);
        assert_eq!(reciprocal.requester_id, "b");
        assert_eq!(reciprocal.target_id, "a");
        assert_ne!(reciprocal.id, original_id);
    }

    #[test]
    fn accept_refuses_non_pending_edges() {
        let edge = FriendshipEdge::request("a", "b").unwrap();
        let (promoted, _) = edge.accept().unwrap();
        assert!(matches!(promoted.accept(), Err(AppError::Validation(_))));

        let blocked = FriendshipEdge {
            status: FriendshipStatus::Blocked,
            ..FriendshipEdge::request("a", "b").unwrap()
        };
        assert!(blocked.accept().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&FriendshipStatus::Accepted).unwrap();
        assert_eq!(json, "\"accepted\"");
        assert_eq!(FriendshipStatus::Blocked.to_string(), "blocked");
    }
}
