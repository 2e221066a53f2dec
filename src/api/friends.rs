//! Friendship endpoints
//!
//! Every handler acts on behalf of the account named by the session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::dto::FriendshipResponse;
use crate::data::AccountSummary;
use crate::{AppState, auth::CurrentAccount, error::AppError};

/// GET /api/v1/friends
pub async fn list_friends(
    State(state): State<AppState>,
    CurrentAccount(session): CurrentAccount,
) -> Result<Json<Vec<AccountSummary>>, AppError> {
    let friends = state.friendships.get_friends(&session.account_id).await?;
    Ok(Json(friends))
}

/// GET /api/v1/friends/requests/outgoing
/// Requests the caller sent that are still pending
pub async fn list_outgoing_requests(
    State(state): State<AppState>,
    CurrentAccount(session): CurrentAccount,
) -> Result<Json<Vec<AccountSummary>>, AppError> {
    let accounts = state
        .friendships
        .get_pending_requests(&session.account_id)
        .await?;
    Ok(Json(accounts))
}

/// GET /api/v1/friends/requests/incoming
/// Requests the caller received that are still pending
pub async fn list_incoming_requests(
    State(state): State<AppState>,
    CurrentAccount(session): CurrentAccount,
) -> Result<Json<Vec<AccountSummary>>, AppError> {
    let accounts = state
        .friendships
        .get_incoming_requests(&session.account_id)
        .await?;
    Ok(Json(accounts))
}

/// GET /api/v1/friends/:id
///
/// Returns the edge caller → `id`, or `null`.
pub async fn get_friendship_status(
    State(state): State<AppState>,
    CurrentAccount(session): CurrentAccount,
    Path(id): Path<String>,
) -> Result<Json<Option<FriendshipResponse>>, AppError> {
    let edge = state
        .friendships
        .get_friendship_status(&session.account_id, &id)
        .await?;
    Ok(Json(edge.map(FriendshipResponse::from)))
}

/// POST /api/v1/friends/:id/request
pub async fn send_friend_request(
    State(state): State<AppState>,
    CurrentAccount(session): CurrentAccount,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<FriendshipResponse>), AppError> {
    let edge = state
        .friendships
        .send_friend_request(&session.account_id, &id)
        .await?;
    Ok((StatusCode::CREATED, Json(edge.into())))
}

/// POST /api/v1/friends/:id/accept
/// Accept the pending request `id` → caller
pub async fn accept_friend_request(
    State(state): State<AppState>,
    CurrentAccount(session): CurrentAccount,
    Path(id): Path<String>,
) -> Result<Json<FriendshipResponse>, AppError> {
    let edge = state
        .friendships
        .accept_friend_request(&session.account_id, &id)
        .await?;
    Ok(Json(edge.into()))
}

/// POST /api/v1/friends/:id/reject
pub async fn reject_friend_request(
    State(state): State<AppState>,
    CurrentAccount(session): CurrentAccount,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .friendships
        .reject_friend_request(&session.account_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/friends/:id
pub async fn remove_friend(
    State(state): State<AppState>,
    CurrentAccount(session): CurrentAccount,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .friendships
        .remove_friend(&session.account_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
