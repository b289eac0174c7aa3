//! Borrow ledger service: checkout, return and history

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowRecord, CheckoutReceipt, LedgerEntry, OpenBorrow, ReturnReceipt},
    repository::Repository,
};

/// Default size of the administrative audit view
pub const RECENT_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct LedgerService {
    repository: Repository,
}

impl LedgerService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow everything in the account's cart
    pub async fn checkout(&self, account_id: i32) -> AppResult<CheckoutReceipt> {
        self.checkout_at(account_id, Utc::now()).await
    }

    /// Same as [`checkout`](Self::checkout) with an explicit clock
    pub async fn checkout_at(&self, account_id: i32, now: DateTime<Utc>) -> AppResult<CheckoutReceipt> {
        match self.repository.borrows.checkout(account_id, now).await {
            Ok(receipt) => {
                tracing::info!(
                    "Ledger: account={} borrowed {} book(s), due {}",
                    account_id,
                    receipt.count,
                    receipt.due_at
                );
                Ok(receipt)
            }
            Err(e @ (AppError::EmptyCart | AppError::BookUnavailable(_))) => {
                tracing::warn!("Ledger: checkout rejected for account={}: {}", account_id, e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Return a borrowed book
    pub async fn return_book(&self, account_id: i32, record_id: i32) -> AppResult<ReturnReceipt> {
        self.return_book_at(account_id, record_id, Utc::now()).await
    }

    /// Same as [`return_book`](Self::return_book) with an explicit clock
    pub async fn return_book_at(
        &self,
        account_id: i32,
        record_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<ReturnReceipt> {
        let receipt = self
            .repository
            .borrows
            .return_book(account_id, record_id, now)
            .await?;

        tracing::info!(
            "Ledger: account={} returned record={} (+{} points{})",
            account_id,
            record_id,
            receipt.points,
            if receipt.late { ", late" } else { "" }
        );
        Ok(receipt)
    }

    pub async fn list_open(&self, account_id: i32) -> AppResult<Vec<OpenBorrow>> {
        self.repository.borrows.list_open(account_id).await
    }

    pub async fn list_history(&self, account_id: i32) -> AppResult<Vec<BorrowRecord>> {
        self.repository.borrows.list_history(account_id).await
    }

    /// Latest borrow records across all accounts, `RECENT_LIMIT` by default
    pub async fn list_recent(&self, limit: Option<i64>) -> AppResult<Vec<LedgerEntry>> {
        let limit = limit.unwrap_or(RECENT_LIMIT).clamp(1, 500);
        self.repository.borrows.list_recent(limit).await
    }
}
