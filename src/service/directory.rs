//! Account directory capability
//!
//! The friendship manager stores account identifiers only. Anything it needs
//! to know about an account goes through this trait.

use async_trait::async_trait;

use crate::data::AccountSummary;
use crate::error::AppError;

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Whether the identifier names a registered account
    async fn account_exists(&self, id: &str) -> Result<bool, AppError>;

    /// Display attributes for `ids`, in the same order; unknown IDs are skipped
    async fn summaries(&self, ids: &[String]) -> Result<Vec<AccountSummary>, AppError>;
}
