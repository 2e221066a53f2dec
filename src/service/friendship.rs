//! Friendship service
//!
//! Enforces the request/accept/reject/remove protocol over directed
//! friendship edges and answers graph queries for one account.
//!
//! A mutual friendship is two accepted edges. A pending request is one
//! edge from requester to target. Every operation resolves the acting
//! account first and fails with `Unauthenticated` if it is unknown.

use std::sync::Arc;

use super::AccountDirectory;
use crate::data::{AccountSummary, Database, FriendshipEdge, FriendshipStatus};
use crate::error::AppError;
use crate::metrics::observe_friendship_operation;

/// Friendship service
pub struct FriendshipService {
    db: Arc<Database>,
    directory: Arc<dyn AccountDirectory>,
}

impl FriendshipService {
    /// Create new friendship service
    pub fn new(db: Arc<Database>, directory: Arc<dyn AccountDirectory>) -> Self {
        Self { db, directory }
    }

    async fn require_actor(&self, actor: &str) -> Result<(), AppError> {
        if actor.is_empty() || !self.directory.account_exists(actor).await? {
            return Err(AppError::Unauthenticated);
        }
        Ok(())
    }

    /// Send a friend request from `actor` to `target`
    ///
    /// # Errors
    /// - `Validation` if `actor == target`
    /// - `NotFound` if `target` is not a registered account
    /// - `AlreadyExists` if any edge exists between the pair, either direction
    pub async fn send_friend_request(
        &self,
        actor: &str,
        target: &str,
    ) -> Result<FriendshipEdge, AppError> {
        let result = self.send_friend_request_inner(actor, target).await;
        observe_friendship_operation("send_request", &result);
        result
    }

    async fn send_friend_request_inner(
        &self,
        actor: &str,
        target: &str,
    ) -> Result<FriendshipEdge, AppError> {
        self.require_actor(actor).await?;
        let edge = FriendshipEdge::request(actor, target)?;

        if !self.directory.account_exists(target).await? {
            return Err(AppError::NotFound);
        }

        if !self.db.insert_friend_request_if_unrelated(&edge).await? {
            return Err(AppError::AlreadyExists);
        }

        tracing::info!(requester = %actor, target = %target, "Friend request sent");
        Ok(edge)
    }

    /// Accept the pending request `requester → actor`
    ///
    /// Promotes the request and inserts the reciprocal edge atomically.
    ///
    /// # Returns
    /// The promoted edge (`requester → actor`, accepted)
    ///
    /// # Errors
    /// Returns `NotFound` if no such pending request exists
    pub async fn accept_friend_request(
        &self,
        actor: &str,
        requester: &str,
    ) -> Result<FriendshipEdge, AppError> {
        let result = async {
            self.require_actor(actor).await?;

            let promoted = self
                .db
                .accept_friend_request(requester, actor)
                .await?
                .ok_or(AppError::NotFound)?;

            tracing::info!(requester = %requester, target = %actor, "Friend request accepted");
            Ok::<_, AppError>(promoted)
        }
        .await;

        observe_friendship_operation("accept_request", &result);
        result
    }

    /// Reject the pending request `requester → actor`
    ///
    /// # Errors
    /// Returns `NotFound` if no such pending request exists
    pub async fn reject_friend_request(&self, actor: &str, requester: &str) -> Result<(), AppError> {
        let result = async {
            self.require_actor(actor).await?;

            if !self.db.delete_pending_request(requester, actor).await? {
                return Err(AppError::NotFound);
            }

            tracing::info!(requester = %requester, target = %actor, "Friend request rejected");
            Ok::<_, AppError>(())
        }
        .await;

        observe_friendship_operation("reject_request", &result);
        result
    }

    /// Remove every edge between `actor` and `other`
    ///
    /// Removing a relationship that does not exist succeeds.
    ///
    /// # Returns
    /// Number of edges removed
    pub async fn remove_friend(&self, actor: &str, other: &str) -> Result<u64, AppError> {
        let result = async {
            self.require_actor(actor).await?;

            let removed = self.db.delete_friendship_pair(actor, other).await?;
            if removed > 0 {
                tracing::info!(actor = %actor, other = %other, removed, "Friendship removed");
            }
            Ok::<_, AppError>(removed)
        }
        .await;

        observe_friendship_operation("remove", &result);
        result
    }

    /// Accounts `actor` is friends with, most recent edge first
    pub async fn get_friends(&self, actor: &str) -> Result<Vec<AccountSummary>, AppError> {
        self.require_actor(actor).await?;
        let ids = self
            .db
            .get_outgoing_ids(actor, FriendshipStatus::Accepted)
            .await?;
        self.directory.summaries(&ids).await
    }

    /// Accounts `actor` has sent a still-pending request to
    pub async fn get_pending_requests(
        &self,
        actor: &str,
    ) -> Result<Vec<AccountSummary>, AppError> {
        self.require_actor(actor).await?;
        let ids = self
            .db
            .get_outgoing_ids(actor, FriendshipStatus::Pending)
            .await?;
        self.directory.summaries(&ids).await
    }

    /// Accounts that have sent `actor` a still-pending request
    pub async fn get_incoming_requests(
        &self,
        actor: &str,
    ) -> Result<Vec<AccountSummary>, AppError> {
        self.require_actor(actor).await?;
        let ids = self
            .db
            .get_incoming_ids(actor, FriendshipStatus::Pending)
            .await?;
        self.directory.summaries(&ids).await
    }

    /// The edge `actor → other`, if any
    ///
    /// Only this direction is inspected. A request `other → actor` is not
    /// reported here; callers check the reverse direction themselves.
    pub async fn get_friendship_status(
        &self,
        actor: &str,
        other: &str,
    ) -> Result<Option<FriendshipEdge>, AppError> {
        self.require_actor(actor).await?;
        self.db.get_friendship(actor, other).await
    }
}
