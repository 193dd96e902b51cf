use async_trait::async_trait;
use sqlx::PgPool;

use crate::accounts::error::AccountError;
use crate::accounts::password::PasswordDigest;
use crate::accounts::repo_types::{LookupKind, User, UserRow};

/// Persistence backend for users.
///
/// Implementations must enforce username/email uniqueness atomically with the
/// write itself and report violations as [`AccountError::Conflict`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &PasswordDigest,
    ) -> Result<User, AccountError>;

    /// Replaces every column of row `id`. `Ok(None)` if no such row.
    async fn update(
        &self,
        id: i32,
        username: &str,
        email: &str,
        password_hash: &PasswordDigest,
    ) -> Result<Option<User>, AccountError>;

    async fn list(&self) -> Result<Vec<User>, AccountError>;

    async fn find_by(&self, kind: LookupKind, identifier: &str)
        -> Result<Option<User>, AccountError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &PasswordDigest,
    ) -> Result<User, AccountError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash.as_str())
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: i32,
        username: &str,
        email: &str,
        password_hash: &PasswordDigest,
    ) -> Result<Option<User>, AccountError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
               SET username = $1, email = $2, password_hash = $3
             WHERE id = $4
            RETURNING id, username, email, password_hash
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash.as_str())
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(User::from))
    }

    async fn list(&self) -> Result<Vec<User>, AccountError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash
              FROM users
             ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by(
        &self,
        kind: LookupKind,
        identifier: &str,
    ) -> Result<Option<User>, AccountError> {
        let sql = match kind {
            LookupKind::ByEmail => {
                "SELECT id, username, email, password_hash FROM users WHERE email = $1"
            }
            LookupKind::ByUsername => {
                "SELECT id, username, email, password_hash FROM users WHERE username = $1"
            }
        };
        let row = sqlx::query_as::<_, UserRow>(sql)
            .bind(identifier)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(User::from))
    }
}
