//! Cart entries: books staged by an account before checkout

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::book::Book;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartEntry {
    pub account_id: i32,
    pub book_id: i32,
    pub added_at: DateTime<Utc>,
}

/// Cart entry joined with its book for display
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub entry: CartEntry,
    pub book: Book,
}
