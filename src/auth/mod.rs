//! Authentication collaborator
//!
//! Handles:
//! - Session token signing and verification
//! - Current account extraction for handlers

mod middleware;
pub mod session;

pub use middleware::{CurrentAccount, require_auth};
pub use session::{Session, create_session_token, issue_session_token, verify_session_token};
