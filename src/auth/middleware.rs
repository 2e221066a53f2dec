//! Authentication middleware
//!
//! Protects routes that require an acting account.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, State},
    http::{HeaderMap, Request, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use super::session::{Session, verify_session_token};
use crate::AppState;
use crate::error::AppError;

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
        .or_else(|| {
            let jar = CookieJar::from_headers(headers);
            jar.get("session").map(|cookie| cookie.value().to_owned())
        })
}

fn authenticate_headers(headers: &HeaderMap, state: &AppState) -> Result<Session, AppError> {
    let token = extract_token_from_headers(headers).ok_or(AppError::Unauthenticated)?;
    verify_session_token(&token, &state.config.auth.session_secret)
}

/// Middleware to require authentication
///
/// Extracts and verifies the session from the Authorization header or the
/// `session` cookie. Adds Session to request extensions if valid.
///
/// # Usage
/// ```ignore
/// let protected_routes = Router::new()
///     .route("/v1/friends", ...)
///     .layer(middleware::from_fn_with_state(state, require_auth));
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = authenticate_headers(request.headers(), &state)?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Extractor for the acting account
///
/// Handlers pass `account_id` to the services, which confirm the account
/// still exists.
///
/// # Usage
/// ```ignore
/// async fn handler(
///     CurrentAccount(session): CurrentAccount,
/// ) -> impl IntoResponse {
///     format!("Hello, {}", session.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>().cloned() {
            return Ok(CurrentAccount(session));
        }

        let state = AppState::from_ref(state);
        let session = authenticate_headers(&parts.headers, &state)?;
        parts.extensions.insert(session.clone());

        Ok(CurrentAccount(session))
    }
}
