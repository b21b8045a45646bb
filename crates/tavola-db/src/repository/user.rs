//! # User Repository
//!
//! Read access to staff accounts (the credential store), plus the insert
//! used by the seed binary. Accounts are never modified by the server.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tavola_core::{Role, User};

/// Repository for staff accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Looks up an account by its login name.
    ///
    /// Exact, case-sensitive match.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, password_hash, role
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets an account by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, password_hash, role FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts an account with an already-hashed password.
    ///
    /// ## Returns
    /// The new account id.
    pub async fn insert(
        &self,
        name: &str,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> DbResult<i64> {
        debug!(username = %username, role = %role, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, username, password_hash, role)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(name)
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, username),
            other => other,
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Number of accounts (used by the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
