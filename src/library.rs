//! Entry point for callers: every lending operation behind a permission check

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::AppConfig,
    error::AppResult,
    models::{
        account::{Account, Permission, RegisterAccount},
        book::{Book, CreateBook},
        borrow::{BorrowRecord, CheckoutReceipt, LedgerEntry, OpenBorrow, ReturnReceipt},
        cart::{CartEntry, CartLine},
        stats::LibraryStats,
    },
    repository::Repository,
    services::Services,
};

/// Lending context shared by all callers.
///
/// Built once from a pool and configuration and cloned into whatever serves
/// requests. Operations that act for an account take the already
/// authenticated [`Account`] and check its role first.
#[derive(Clone)]
pub struct Library {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl Library {
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(Services::new(Repository::new(pool))),
        }
    }

    /// Seed the configured administrator account, plus the demo catalog and
    /// member when `bootstrap.sample_data` is set
    pub async fn bootstrap(&self) -> AppResult<Account> {
        let admin = self.services.accounts.ensure_admin(&self.config.bootstrap).await?;

        if self.config.bootstrap.sample_data {
            self.services.catalog.seed_samples().await?;
            self.services.accounts.ensure_demo_member().await?;
        }

        Ok(admin)
    }

    // Accounts

    pub async fn register(&self, username: &str, credential: &str, email: Option<&str>) -> AppResult<Account> {
        self.services
            .accounts
            .register(RegisterAccount::new(username, credential, email))
            .await
    }

    pub async fn login(&self, username: &str, credential: &str) -> AppResult<Account> {
        self.services.accounts.authenticate(username, credential).await
    }

    /// Fresh copy of an account (points change on every return)
    pub async fn account(&self, account_id: i32) -> AppResult<Account> {
        self.services.accounts.get(account_id).await
    }

    // Catalog, open to visitors

    pub async fn books(&self) -> AppResult<Vec<Book>> {
        self.services.catalog.list_all().await
    }

    pub async fn book(&self, book_id: i32) -> AppResult<Book> {
        self.services.catalog.get(book_id).await
    }

    // Cart

    pub async fn add_to_cart(&self, actor: &Account, book_id: i32) -> AppResult<CartEntry> {
        actor.require(Permission::BorrowBooks)?;
        self.services.cart.add(actor.id, book_id).await
    }

    pub async fn cart(&self, actor: &Account) -> AppResult<Vec<CartLine>> {
        actor.require(Permission::BorrowBooks)?;
        self.services.cart.list(actor.id).await
    }

    pub async fn remove_from_cart(&self, actor: &Account, book_id: i32) -> AppResult<()> {
        actor.require(Permission::BorrowBooks)?;
        self.services.cart.remove(actor.id, book_id).await
    }

    pub async fn clear_cart(&self, actor: &Account) -> AppResult<u64> {
        actor.require(Permission::BorrowBooks)?;
        self.services.cart.clear(actor.id).await
    }

    // Ledger

    pub async fn checkout(&self, actor: &Account) -> AppResult<CheckoutReceipt> {
        actor.require(Permission::BorrowBooks)?;
        self.services.ledger.checkout(actor.id).await
    }

    pub async fn return_book(&self, actor: &Account, record_id: i32) -> AppResult<ReturnReceipt> {
        actor.require(Permission::ReturnBooks)?;
        self.services.ledger.return_book(actor.id, record_id).await
    }

    pub async fn borrowed(&self, actor: &Account) -> AppResult<Vec<OpenBorrow>> {
        actor.require(Permission::ReturnBooks)?;
        self.services.ledger.list_open(actor.id).await
    }

    pub async fn history(&self, actor: &Account) -> AppResult<Vec<BorrowRecord>> {
        actor.require(Permission::BorrowBooks)?;
        self.services.ledger.list_history(actor.id).await
    }

    // Administration

    pub async fn add_book(&self, actor: &Account, book: CreateBook) -> AppResult<Book> {
        actor.require(Permission::ManageCatalog)?;
        self.services.catalog.add(book).await
    }

    pub async fn remove_book(&self, actor: &Account, book_id: i32) -> AppResult<()> {
        actor.require(Permission::ManageCatalog)?;
        self.services.catalog.remove(book_id).await
    }

    pub async fn restock(&self, actor: &Account, book_id: i32, delta: i32) -> AppResult<Book> {
        actor.require(Permission::ManageCatalog)?;
        self.services.catalog.restock(book_id, delta).await
    }

    pub async fn recent_ledger(&self, actor: &Account, limit: Option<i64>) -> AppResult<Vec<LedgerEntry>> {
        actor.require(Permission::ViewLedger)?;
        self.services.ledger.list_recent(limit).await
    }

    pub async fn statistics(&self, actor: &Account) -> AppResult<LibraryStats> {
        actor.require(Permission::ViewStatistics)?;
        self.services.stats.get_stats().await
    }
}
