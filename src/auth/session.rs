//! Session management
//!
//! Uses HMAC-signed bearer tokens.
//! No server-side session storage needed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Session data carried inside a signed token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Acting account identifier
    pub account_id: String,
    /// Account email at sign-in time
    pub email: String,
    /// When session was created
    pub created_at: DateTime<Utc>,
    /// When session expires
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session for `account_id` valid for `max_age_seconds`
    pub fn new(account_id: &str, email: &str, max_age_seconds: i64) -> Self {
        let now = Utc::now();
        Self {
            account_id: account_id.to_string(),
            email: email.to_string(),
            created_at: now,
            expires_at: now + Duration::seconds(max_age_seconds),
        }
    }

    /// Check if session is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

type HmacSha256 = hmac::Hmac<sha2::Sha256>;

/// Create a signed session token
///
/// Token format: base64(payload).base64(hmac_sha256(payload))
pub fn create_session_token(session: &Session, secret: &str) -> Result<String, AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::Mac;

    // 1. Serialize session to JSON
    let payload = serde_json::to_string(session).map_err(|e| AppError::Internal(e.into()))?;

    // 2. Base64 encode the payload
    let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());

    // 3. Create HMAC-SHA256 signature
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid session secret: {}", e)))?;
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();
    let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

    // 4. Return "{payload}.{signature}"
    Ok(format!("{}.{}", payload_b64, signature_b64))
}

/// Create a session for an account and sign it
pub fn issue_session_token(
    account_id: &str,
    email: &str,
    config: &crate::config::AuthConfig,
) -> Result<String, AppError> {
    let session = Session::new(account_id, email, config.session_max_age);
    create_session_token(&session, &config.session_secret)
}

/// Verify and decode a session token
///
/// # Errors
/// Returns `Unauthenticated` if the signature is invalid, the token is
/// malformed, or the session has expired
pub fn verify_session_token(token: &str, secret: &str) -> Result<Session, AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::Mac;

    // 1. Split token into payload and signature
    let Some((payload_b64, signature_b64)) = token.split_once('.') else {
        return Err(AppError::Unauthenticated);
    };
    if signature_b64.contains('.') {
        return Err(AppError::Unauthenticated);
    }

    // 2. Verify HMAC signature
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid session secret: {}", e)))?;
    mac.update(payload_b64.as_bytes());

    let expected_signature = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AppError::Unauthenticated)?;

    mac.verify_slice(&expected_signature)
        .map_err(|_| AppError::Unauthenticated)?;

    // 3. Decode and deserialize payload
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| AppError::Unauthenticated)?;

    let session: Session =
        serde_json::from_slice(&payload_bytes).map_err(|_| AppError::Unauthenticated)?;

    // 4. Check if session is expired
    if session.is_expired() {
        return Err(AppError::Unauthenticated);
    }

    Ok(session)
}
