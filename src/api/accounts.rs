//! Account directory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use super::dto::{AccountResponse, RegisterResponse, SearchParams};
use crate::auth::issue_session_token;
use crate::data::AccountSummary;
use crate::service::NewAccount;
use crate::{AppState, auth::CurrentAccount, error::AppError};

/// POST /api/v1/accounts
/// Register an account and sign a session for it
pub async fn register_account(
    State(state): State<AppState>,
    Json(new_account): Json<NewAccount>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let account = state.accounts.register(new_account).await?;
    let token = issue_session_token(&account.id, &account.email, &state.config.auth)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            account: account.into(),
            token,
        }),
    ))
}

/// GET /api/v1/accounts/:id
pub async fn get_account(
    State(state): State<AppState>,
    CurrentAccount(_session): CurrentAccount,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state.accounts.get_account(&id).await?;
    Ok(Json(account.into()))
}

/// GET /api/v1/accounts/search?q=
/// Name or email search, excluding the caller
pub async fn search_accounts(
    State(state): State<AppState>,
    CurrentAccount(session): CurrentAccount,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<AccountSummary>>, AppError> {
    let accounts = state
        .accounts
        .search_users(&session.account_id, &params.q)
        .await?;
    Ok(Json(accounts))
}
