//! Borrow ledger repository: checkout and return transactions

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, Pool, Postgres};

use super::{
    account_summary_from_row, accounts::AccountsRepository, book_from_row, cart::CartRepository,
    optional_book_from_row, ACCOUNT_COLUMNS, BOOK_COLUMNS,
};
use crate::{
    error::{AppError, AppResult},
    models::borrow::{
        BorrowRecord, CheckoutPlan, CheckoutReceipt, LedgerEntry, OpenBorrow, ReturnReceipt,
        StagedBook,
    },
    services::points,
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Turn every staged cart entry of the account into an open borrow record.
    ///
    /// Runs as one transaction: the staged entries and their books are locked
    /// and re-checked, and any book without a free copy aborts the whole
    /// checkout with the cart left untouched. A second checkout of the same
    /// cart waits on the entry locks and then finds the entries gone.
    pub async fn checkout(&self, account_id: i32, now: DateTime<Utc>) -> AppResult<CheckoutReceipt> {
        let mut tx = self.pool.begin().await?;

        let staged = sqlx::query_as::<_, StagedBook>(
            r#"
            SELECT b.id AS book_id, b.title, b.available_copies
            FROM cart_entries c
            JOIN books b ON b.id = c.book_id
            WHERE c.account_id = $1
            ORDER BY b.id
            FOR UPDATE OF c, b
            "#,
        )
        .bind(account_id)
        .fetch_all(&mut *tx)
        .await?;

        let plan = CheckoutPlan::new(staged)?;
        let due_at = points::due_date(now);
        let mut record_ids = Vec::with_capacity(plan.len());

        for book in plan.books() {
            let record_id = sqlx::query_scalar::<_, i32>(
                r#"
                INSERT INTO borrow_records (account_id, book_id, book_title, borrow_at, due_at, status, points_awarded)
                VALUES ($1, $2, $3, $4, $5, 'open', 0)
                RETURNING id
                "#,
            )
            .bind(account_id)
            .bind(book.book_id)
            .bind(&book.title)
            .bind(now)
            .bind(due_at)
            .fetch_one(&mut *tx)
            .await?;

            let updated = sqlx::query(
                "UPDATE books SET available_copies = available_copies - 1 WHERE id = $1 AND available_copies > 0",
            )
            .bind(book.book_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(AppError::BookUnavailable(book.title.clone()));
            }

            record_ids.push(record_id);
        }

        let book_ids: Vec<i32> = plan.books().iter().map(|b| b.book_id).collect();
        let consumed = CartRepository::remove_staged(&mut tx, account_id, &book_ids).await?;
        if consumed != book_ids.len() as u64 {
            // Dropping the transaction rolls back the records created above
            tracing::warn!(
                "Checkout for account {} consumed {} of {} cart entries, rolling back",
                account_id,
                consumed,
                book_ids.len()
            );
            return Err(AppError::EmptyCart);
        }

        tx.commit().await?;

        Ok(CheckoutReceipt {
            count: record_ids.len(),
            record_ids,
            due_at,
        })
    }

    /// Close an open record of the account, restore the copy and award points.
    pub async fn return_book(
        &self,
        account_id: i32,
        record_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<ReturnReceipt> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            SELECT * FROM borrow_records
            WHERE id = $1 AND account_id = $2 AND status = 'open'
            FOR UPDATE
            "#,
        )
        .bind(record_id)
        .bind(account_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::RecordNotFound(record_id))?;

        let book_id = record.book_id.ok_or_else(|| {
            AppError::Internal(format!("Open borrow record {} has no book", record_id))
        })?;

        let late = points::is_late(record.due_at, now);
        let awarded = points::points_for_return(record.due_at, now);

        sqlx::query(
            r#"
            UPDATE borrow_records
            SET status = 'closed', return_at = $1, points_awarded = $2
            WHERE id = $3
            "#,
        )
        .bind(now)
        .bind(awarded)
        .bind(record_id)
        .execute(&mut *tx)
        .await?;

        let restored = sqlx::query(
            "UPDATE books SET available_copies = available_copies + 1 WHERE id = $1 AND available_copies < total_copies",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if restored.rows_affected() == 0 {
            return Err(AppError::Internal(format!(
                "Book {} has no borrowed copy to restore",
                book_id
            )));
        }

        AccountsRepository::award_points(&mut tx, account_id, awarded).await?;

        tx.commit().await?;

        Ok(ReturnReceipt {
            record_id,
            points: awarded,
            late,
        })
    }

    /// Open records of an account with their books, soonest due first
    pub async fn list_open(&self, account_id: i32) -> AppResult<Vec<OpenBorrow>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT r.*, {}
            FROM borrow_records r
            JOIN books b ON b.id = r.book_id
            WHERE r.account_id = $1 AND r.status = 'open'
            ORDER BY r.due_at, r.id
            "#,
            BOOK_COLUMNS
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            result.push(OpenBorrow {
                record: BorrowRecord::from_row(&row)?,
                book: book_from_row(&row)?,
            });
        }

        Ok(result)
    }

    /// Every record of an account, newest first
    pub async fn list_history(&self, account_id: i32) -> AppResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE account_id = $1 ORDER BY borrow_at DESC, id DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Latest records across all accounts, newest borrow first
    pub async fn list_recent(&self, limit: i64) -> AppResult<Vec<LedgerEntry>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT r.*, {}, {}
            FROM borrow_records r
            JOIN accounts a ON a.id = r.account_id
            LEFT JOIN books b ON b.id = r.book_id
            ORDER BY r.borrow_at DESC, r.id DESC
            LIMIT $1
            "#,
            ACCOUNT_COLUMNS, BOOK_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            result.push(LedgerEntry {
                record: BorrowRecord::from_row(&row)?,
                account: account_summary_from_row(&row)?,
                book: optional_book_from_row(&row)?,
            });
        }

        Ok(result)
    }

    /// Count open records
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE status = 'open'")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count open records past their due date
    pub async fn count_overdue(&self, today: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE status = 'open' AND due_at < $1",
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
