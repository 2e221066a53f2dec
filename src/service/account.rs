//! Account service
//!
//! Registration, lookup and search over the account directory.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use sqlx::types::Json;

use super::validation::{self, optional};
use crate::data::{Account, AccountSummary, Database, EntityId};
use crate::error::AppError;

/// Profile submitted at registration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub position: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
    pub profile_picture_url: Option<String>,
}

/// Account service
pub struct AccountService {
    db: Arc<Database>,
    search_limit: usize,
}

impl AccountService {
    /// Create new account service
    ///
    /// `search_limit` bounds every `search_users` result.
    pub fn new(db: Arc<Database>, search_limit: usize) -> Self {
        Self { db, search_limit }
    }

    /// Register a new account
    ///
    /// # Errors
    /// - `Validation` if a field is malformed
    /// - `AlreadyExists` if the email is already registered
    pub async fn register(&self, new: NewAccount) -> Result<Account, AppError> {
        let name = validation::validate_name(&new.name)
            .ok_or_else(|| AppError::Validation("invalid name".to_string()))?;
        let email = validation::validate_email(&new.email)
            .ok_or_else(|| AppError::Validation("invalid email".to_string()))?;

        let position = optional(new.position.as_deref(), "position", |v| {
            validation::validate_text(v, validation::MAX_POSITION_CHARS)
        })?;
        let location = optional(
            new.location.as_deref(),
            "location",
            validation::validate_location,
        )?;
        let bio = optional(new.bio.as_deref(), "bio", |v| {
            validation::validate_text(v, validation::MAX_BIO_CHARS)
        })?;
        let profile_picture_url = optional(
            new.profile_picture_url.as_deref(),
            "profile_picture_url",
            validation::validate_url,
        )?;
        let social_links = validation::validate_social_links(&new.social_links)?;

        let now = chrono::Utc::now();
        let account = Account {
            id: EntityId::new().0,
            name,
            email,
            position,
            location,
            bio,
            expertise: Json(validation::validate_tags(&new.expertise)),
            hobbies: Json(validation::validate_tags(&new.hobbies)),
            social_links: Json(social_links),
            profile_picture_url,
            created_at: now,
            updated_at: now,
        };

        self.db.insert_account(&account).await?;
        crate::metrics::ACCOUNTS_REGISTERED_TOTAL.inc();

        tracing::info!(account_id = %account.id, "Account registered");

        Ok(account)
    }

    /// Get account by ID
    pub async fn get_account(&self, id: &str) -> Result<Account, AppError> {
        self.db.get_account(id).await?.ok_or(AppError::NotFound)
    }

    /// Search accounts by name or email, excluding `actor`
    ///
    /// A blank query returns no results without querying the store.
    ///
    /// # Errors
    /// Returns `Unauthenticated` if `actor` is not a registered account
    pub async fn search_users(
        &self,
        actor: &str,
        query: &str,
    ) -> Result<Vec<AccountSummary>, AppError> {
        if !self.db.account_exists(actor).await? {
            return Err(AppError::Unauthenticated);
        }

        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        // Names are stored escaped; compare against the escaped query
        let name_query = validation::sanitize_html(query);
        self.db
            .search_accounts(actor, &name_query, query, self.search_limit)
            .await
    }
}
