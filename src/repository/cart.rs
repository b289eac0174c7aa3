//! Cart repository for database operations

use sqlx::{PgConnection, Pool, Postgres, Row};

use super::book_from_row;
use crate::{
    error::{AppError, AppResult},
    models::cart::{CartEntry, CartLine},
};

#[derive(Clone)]
pub struct CartRepository {
    pool: Pool<Postgres>,
}

impl CartRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Stage a book. Availability is checked here but nothing is reserved.
    pub async fn add(&self, account_id: i32, book_id: i32) -> AppResult<CartEntry> {
        let book = sqlx::query("SELECT title, available_copies FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        let available: i32 = book.get("available_copies");
        if available <= 0 {
            return Err(AppError::BookUnavailable(book.get("title")));
        }

        sqlx::query_as::<_, CartEntry>(
            r#"
            INSERT INTO cart_entries (account_id, book_id)
            VALUES ($1, $2)
            ON CONFLICT (account_id, book_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::DuplicateEntry(book_id))
    }

    /// Cart entries of an account joined with their books
    pub async fn list(&self, account_id: i32) -> AppResult<Vec<CartLine>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT c.account_id, c.book_id, c.added_at, {}
            FROM cart_entries c
            JOIN books b ON c.book_id = b.id
            WHERE c.account_id = $1
            ORDER BY c.added_at
            "#,
            super::BOOK_COLUMNS
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            lines.push(CartLine {
                entry: CartEntry {
                    account_id: row.get("account_id"),
                    book_id: row.get("book_id"),
                    added_at: row.get("added_at"),
                },
                book: book_from_row(&row)?,
            });
        }

        Ok(lines)
    }

    /// Remove a single staged book
    pub async fn remove(&self, account_id: i32, book_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cart_entries WHERE account_id = $1 AND book_id = $2")
            .bind(account_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} is not in the cart", book_id)));
        }
        Ok(())
    }

    /// Empty the cart, returning how many entries were removed
    pub async fn clear(&self, account_id: i32) -> AppResult<u64> {
        let mut conn = self.pool.acquire().await?;
        Self::clear_in(&mut conn, account_id).await
    }

    /// Empty the cart inside the caller's transaction
    pub async fn clear_in(conn: &mut PgConnection, account_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM cart_entries WHERE account_id = $1")
            .bind(account_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remove exactly the entries a checkout consumed. Entries staged after the
    /// checkout read the cart stay for the next one.
    pub async fn remove_staged(conn: &mut PgConnection, account_id: i32, book_ids: &[i32]) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM cart_entries WHERE account_id = $1 AND book_id = ANY($2)")
            .bind(account_id)
            .bind(book_ids)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
