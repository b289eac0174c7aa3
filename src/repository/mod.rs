//! Repository layer for database operations

pub mod accounts;
pub mod books;
pub mod borrows;
pub mod cart;

use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::models::{account::AccountSummary, book::Book};

/// Book columns aliased with a `b_` prefix, for joins against `books b`
pub(crate) const BOOK_COLUMNS: &str = "b.id AS b_id, b.title AS b_title, b.author AS b_author, \
     b.category AS b_category, b.year AS b_year, b.total_copies AS b_total_copies, \
     b.available_copies AS b_available_copies, b.image_ref AS b_image_ref, \
     b.description AS b_description, b.created_at AS b_created_at";

/// Account columns aliased with an `a_` prefix, for joins against `accounts a`
pub(crate) const ACCOUNT_COLUMNS: &str =
    "a.id AS a_id, a.username AS a_username, a.role AS a_role, a.points AS a_points";

pub(crate) fn book_from_row(row: &PgRow) -> Result<Book, sqlx::Error> {
    Ok(Book {
        id: row.try_get("b_id")?,
        title: row.try_get("b_title")?,
        author: row.try_get("b_author")?,
        category: row.try_get("b_category")?,
        year: row.try_get("b_year")?,
        total_copies: row.try_get("b_total_copies")?,
        available_copies: row.try_get("b_available_copies")?,
        image_ref: row.try_get("b_image_ref")?,
        description: row.try_get("b_description")?,
        created_at: row.try_get("b_created_at")?,
    })
}

/// Same as [`book_from_row`] for LEFT JOINs where the book may be gone
pub(crate) fn optional_book_from_row(row: &PgRow) -> Result<Option<Book>, sqlx::Error> {
    let id: Option<i32> = row.try_get("b_id")?;
    match id {
        Some(_) => book_from_row(row).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn account_summary_from_row(row: &PgRow) -> Result<AccountSummary, sqlx::Error> {
    Ok(AccountSummary {
        id: row.try_get("a_id")?,
        username: row.try_get("a_username")?,
        role: row.try_get("a_role")?,
        points: row.try_get("a_points")?,
    })
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub accounts: accounts::AccountsRepository,
    pub books: books::BooksRepository,
    pub cart: cart::CartRepository,
    pub borrows: borrows::BorrowsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            accounts: accounts::AccountsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            cart: cart::CartRepository::new(pool.clone()),
            borrows: borrows::BorrowsRepository::new(pool.clone()),
            pool,
        }
    }
}
