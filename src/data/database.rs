//! SQLite database operations
//!
//! All database access goes through this module.
//! Multi-statement writes run inside a single transaction whose first
//! statement is a write, so concurrent writers queue on the busy timeout
//! instead of failing on a stale read snapshot.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{Pool, QueryBuilder, Sqlite, SqlitePool};

use super::models::*;
use crate::error::AppError;
use crate::service::AccountDirectory;

const ACCOUNT_SUMMARY_COLUMNS: &str =
    "id, name, email, position, location, profile_picture_url, expertise, hobbies";

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Database connection pool wrapper
pub struct Database {
    pub(super) pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::StoreUnavailable(sqlx::Error::Io(e)))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePool::connect_with(options).await?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Insert a new account
    ///
    /// # Errors
    /// Returns `AlreadyExists` if the email is taken
    pub async fn insert_account(&self, account: &Account) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, name, email, position, location, bio, expertise, hobbies,
                social_links, profile_picture_url, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.position)
        .bind(&account.location)
        .bind(&account.bio)
        .bind(&account.expertise)
        .bind(&account.hobbies)
        .bind(&account.social_links)
        .bind(&account.profile_picture_url)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get account by ID
    pub async fn get_account(&self, id: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Check whether an account with this ID exists
    pub async fn account_exists(&self, id: &str) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Fetch display summaries for the given IDs
    ///
    /// The result follows the order of `ids`. Unknown IDs are skipped.
    pub async fn get_account_summaries(
        &self,
        ids: &[String],
    ) -> Result<Vec<AccountSummary>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM accounts WHERE id IN (",
            ACCOUNT_SUMMARY_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows = builder
            .build_query_as::<AccountSummary>()
            .fetch_all(&self.pool)
            .await?;

        let mut by_id: HashMap<String, AccountSummary> = rows
            .into_iter()
            .map(|summary| (summary.id.clone(), summary))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Case-insensitive substring search on name or email
    ///
    /// Names are stored HTML-escaped, so `name_query` must be escaped the
    /// same way. Emails are stored as entered. `exclude_id` is never part of
    /// the result.
    pub async fn search_accounts(
        &self,
        exclude_id: &str,
        name_query: &str,
        email_query: &str,
        limit: usize,
    ) -> Result<Vec<AccountSummary>, AppError> {
        let name_pattern = format!("%{}%", escape_like(name_query));
        let email_pattern = format!("%{}%", escape_like(email_query));
        let sql = format!(
            r#"
            SELECT {} FROM accounts
            WHERE id <> ?
              AND (name LIKE ? ESCAPE '\' OR email LIKE ? ESCAPE '\')
            ORDER BY name COLLATE NOCASE ASC, id ASC
            LIMIT ?
            "#,
            ACCOUNT_SUMMARY_COLUMNS
        );

        let accounts = sqlx::query_as::<_, AccountSummary>(&sql)
            .bind(exclude_id)
            .bind(&name_pattern)
            .bind(&email_pattern)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }

    // =========================================================================
    // Friendship edges
    // =========================================================================

    /// Get the edge `requester → target`, whatever its status
    pub async fn get_friendship(
        &self,
        requester_id: &str,
        target_id: &str,
    ) -> Result<Option<FriendshipEdge>, AppError> {
        let edge = sqlx::query_as::<_, FriendshipEdge>(
            "SELECT id, requester_id, target_id, status, created_at FROM friendships WHERE requester_id = ? AND target_id = ?",
        )
        .bind(requester_id)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(edge)
    }

    /// Insert a pending request unless the pair is already related
    ///
    /// The both-direction check and the insert are one statement, so two
    /// racing requests on the same pair serialize on the write lock and the
    /// later one sees the earlier edge.
    ///
    /// # Returns
    /// `false` if any edge already exists between the pair
    pub async fn insert_friend_request_if_unrelated(
        &self,
        edge: &FriendshipEdge,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO friendships (id, requester_id, target_id, status, created_at)
            SELECT ?, ?, ?, ?, ?
            WHERE NOT EXISTS (
                SELECT 1 FROM friendships
                WHERE (requester_id = ? AND target_id = ?)
                   OR (requester_id = ? AND target_id = ?)
            )
            "#,
        )
        .bind(&edge.id)
        .bind(&edge.requester_id)
        .bind(&edge.target_id)
        .bind(edge.status)
        .bind(edge.created_at)
        .bind(&edge.requester_id)
        .bind(&edge.target_id)
        .bind(&edge.target_id)
        .bind(&edge.requester_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Promote the pending edge `requester → target` and insert its reciprocal
    ///
    /// Both writes commit together or not at all.
    ///
    /// # Returns
    /// The promoted edge, or `None` if no such pending edge exists
    ///
    /// # Errors
    /// Returns `AlreadyExists` if the reciprocal edge clashes with an existing
    /// one; the pending edge is left untouched in that case
    pub async fn accept_friend_request(
        &self,
        requester_id: &str,
        target_id: &str,
    ) -> Result<Option<FriendshipEdge>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Claiming the row is the first statement of the transaction; the
        // edge comes back as it was matched, before promotion.
        let pending = sqlx::query_as::<_, FriendshipEdge>(
            r#"
            UPDATE friendships SET status = ?
            WHERE requester_id = ? AND target_id = ? AND status = ?
            RETURNING id, requester_id, target_id, 'pending' AS status, created_at
            "#,
        )
        .bind(FriendshipStatus::Accepted)
        .bind(requester_id)
        .bind(target_id)
        .bind(FriendshipStatus::Pending)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(pending) = pending else {
            return Ok(None);
        };

        let (promoted, reciprocal) = pending.accept()?;

        sqlx::query(
            "INSERT INTO friendships (id, requester_id, target_id, status, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&reciprocal.id)
        .bind(&reciprocal.requester_id)
        .bind(&reciprocal.target_id)
        .bind(reciprocal.status)
        .bind(reciprocal.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(promoted))
    }

    /// Delete the pending edge `requester → target`
    ///
    /// # Returns
    /// `true` if an edge was deleted
    pub async fn delete_pending_request(
        &self,
        requester_id: &str,
        target_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM friendships WHERE requester_id = ? AND target_id = ? AND status = ?",
        )
        .bind(requester_id)
        .bind(target_id)
        .bind(FriendshipStatus::Pending)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every edge between the unordered pair
    ///
    /// # Returns
    /// Number of edges deleted
    pub async fn delete_friendship_pair(&self, a: &str, b: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE (requester_id = ? AND target_id = ?)
               OR (requester_id = ? AND target_id = ?)
            "#,
        )
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Targets of `requester`'s edges with the given status, newest edge first
    pub async fn get_outgoing_ids(
        &self,
        requester_id: &str,
        status: FriendshipStatus,
    ) -> Result<Vec<String>, AppError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT target_id FROM friendships WHERE requester_id = ? AND status = ? ORDER BY rowid DESC",
        )
        .bind(requester_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Requesters of edges pointing at `target` with the given status, newest first
    pub async fn get_incoming_ids(
        &self,
        target_id: &str,
        status: FriendshipStatus,
    ) -> Result<Vec<String>, AppError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT requester_id FROM friendships WHERE target_id = ? AND status = ? ORDER BY rowid DESC",
        )
        .bind(target_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

#[async_trait]
impl AccountDirectory for Database {
    async fn account_exists(&self, id: &str) -> Result<bool, AppError> {
        Database::account_exists(self, id).await
    }

    async fn summaries(&self, ids: &[String]) -> Result<Vec<AccountSummary>, AppError> {
        self.get_account_summaries(ids).await
    }
}
