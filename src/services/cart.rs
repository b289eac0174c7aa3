//! Cart service

use crate::{
    error::AppResult,
    models::cart::{CartEntry, CartLine},
    repository::Repository,
};

#[derive(Clone)]
pub struct CartService {
    repository: Repository,
}

impl CartService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn add(&self, account_id: i32, book_id: i32) -> AppResult<CartEntry> {
        let entry = self.repository.cart.add(account_id, book_id).await?;
        tracing::debug!("Cart: account={} staged book={}", account_id, book_id);
        Ok(entry)
    }

    pub async fn list(&self, account_id: i32) -> AppResult<Vec<CartLine>> {
        self.repository.cart.list(account_id).await
    }

    pub async fn remove(&self, account_id: i32, book_id: i32) -> AppResult<()> {
        self.repository.cart.remove(account_id, book_id).await
    }

    pub async fn clear(&self, account_id: i32) -> AppResult<u64> {
        self.repository.cart.clear(account_id).await
    }
}
