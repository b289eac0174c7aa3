//! Borrow records and the checkout/return results built from them

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};

use super::{account::AccountSummary, book::Book};
use crate::error::{AppError, AppResult};

/// Borrow record lifecycle: `Open` until returned, then `Closed` for good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Open,
    Closed,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Open => "open",
            BorrowStatus::Closed => "closed",
        }
    }
}

impl std::str::FromStr for BorrowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(BorrowStatus::Open),
            "closed" => Ok(BorrowStatus::Closed),
            _ => Err(format!("Invalid borrow status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for BorrowStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BorrowStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BorrowStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Borrow record row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BorrowRecord {
    pub id: i32,
    pub account_id: i32,
    /// Null once the book has been removed from the catalog (closed records only)
    pub book_id: Option<i32>,
    pub book_title: String,
    pub borrow_at: DateTime<Utc>,
    pub due_at: NaiveDate,
    pub return_at: Option<DateTime<Utc>>,
    pub status: BorrowStatus,
    pub points_awarded: i32,
}

impl BorrowRecord {
    pub fn is_open(&self) -> bool {
        self.status == BorrowStatus::Open
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_open() && today > self.due_at
    }
}

/// Open record with the borrowed book, for the member dashboard
#[derive(Debug, Clone, Serialize)]
pub struct OpenBorrow {
    pub record: BorrowRecord,
    pub book: Book,
}

/// Administrative audit line
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub record: BorrowRecord,
    pub account: AccountSummary,
    pub book: Option<Book>,
}

/// A cart entry's book as seen (and locked) at checkout time
#[derive(Debug, Clone, FromRow)]
pub struct StagedBook {
    pub book_id: i32,
    pub title: String,
    pub available_copies: i32,
}

/// Books that a checkout will convert into borrow records.
///
/// Construction fails unless every staged book still has a copy, so a plan
/// either covers the whole cart or does not exist.
#[derive(Debug, Clone)]
pub struct CheckoutPlan {
    books: Vec<StagedBook>,
}

impl CheckoutPlan {
    pub fn new(books: Vec<StagedBook>) -> AppResult<Self> {
        if books.is_empty() {
            return Err(AppError::EmptyCart);
        }

        if let Some(missing) = books.iter().find(|b| b.available_copies <= 0) {
            return Err(AppError::BookUnavailable(missing.title.clone()));
        }

        Ok(Self { books })
    }

    pub fn books(&self) -> &[StagedBook] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Result of a successful checkout
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub count: usize,
    pub record_ids: Vec<i32>,
    pub due_at: NaiveDate,
}

impl CheckoutReceipt {
    pub fn message(&self) -> String {
        format!("Borrowed {} book(s), due {}", self.count, self.due_at)
    }
}

/// Result of a successful return
#[derive(Debug, Clone, Serialize)]
pub struct ReturnReceipt {
    pub record_id: i32,
    pub points: i32,
    pub late: bool,
}

impl ReturnReceipt {
    pub fn message(&self) -> String {
        format!("Book returned! +{} points", self.points)
    }
}
