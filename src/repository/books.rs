//! Books repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// All books, newest first
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Create a new book with every copy available
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, category, year, total_copies, available_copies, image_ref, description)
            VALUES ($1, $2, $3, $4, $5, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(book.year)
        .bind(book.total_copies)
        .bind(&book.image_ref)
        .bind(&book.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Add `delta` copies to both the total and the available count
    pub async fn restock(&self, id: i32, delta: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET total_copies = total_copies + $1,
                available_copies = available_copies + $1
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book unless an open borrow record still references it.
    /// Cart entries go with the book; closed records keep their title snapshot.
    pub async fn delete(&self, id: i32) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so no checkout can open a record while we decide
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let in_use: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrow_records WHERE book_id = $1 AND status = 'open')",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if in_use {
            return Err(AppError::BookInUse(id));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(book)
    }

    /// (titles, total copies, available copies) over the whole catalog
    pub async fn copy_totals(&self) -> AppResult<(i64, i64, i64)> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS titles,
                   COALESCE(SUM(total_copies), 0)::bigint AS total,
                   COALESCE(SUM(available_copies), 0)::bigint AS available
            FROM books
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((row.get("titles"), row.get("total"), row.get("available")))
    }
}
