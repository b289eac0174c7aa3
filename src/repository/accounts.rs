//! Accounts repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::account::{Account, Role},
};

#[derive(Clone)]
pub struct AccountsRepository {
    pool: Pool<Postgres>,
}

impl AccountsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get account by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Account> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account with id {} not found", id)))
    }

    /// Get account by username (exact, case-sensitive match)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Insert a new account. `credential` must already be hashed.
    pub async fn create(
        &self,
        username: &str,
        credential: &str,
        email: Option<&str>,
        role: Role,
    ) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (username, credential, email, role, points)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(credential)
        .bind(email)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
        .map_err(|e| {
            if e.is_unique_violation() {
                AppError::DuplicateUsername(username.to_string())
            } else {
                e
            }
        })
    }

    /// Add points to an account inside the caller's transaction, returning the new balance
    pub async fn award_points(conn: &mut PgConnection, account_id: i32, delta: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE accounts SET points = points + $1 WHERE id = $2 RETURNING points",
        )
        .bind(delta)
        .bind(account_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account with id {} not found", account_id)))
    }

    /// Count accounts with the given role
    pub async fn count_by_role(&self, role: Role) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
