//! API request and response DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{Account, FriendshipEdge, FriendshipStatus};

/// Full account profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub position: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub expertise: Vec<String>,
    pub hobbies: Vec<String>,
    pub social_links: BTreeMap<String, String>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            position: account.position,
            location: account.location,
            bio: account.bio,
            expertise: account.expertise.0,
            hobbies: account.hobbies.0,
            social_links: account.social_links.0,
            profile_picture_url: account.profile_picture_url,
            created_at: account.created_at,
        }
    }
}

/// Registration result: the new account and a session token for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub account: AccountResponse,
    pub token: String,
}

/// One directed friendship edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendshipResponse {
    pub id: String,
    pub requester_id: String,
    pub target_id: String,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
}

impl From<FriendshipEdge> for FriendshipResponse {
    fn from(edge: FriendshipEdge) -> Self {
        Self {
            id: edge.id,
            requester_id: edge.requester_id,
            target_id: edge.target_id,
            status: edge.status,
            created_at: edge.created_at,
        }
    }
}

/// Query string for account search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Substring matched against name or email
    #[serde(default)]
    pub q: String,
}
