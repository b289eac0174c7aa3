//! Data models for the lending core

pub mod account;
pub mod book;
pub mod borrow;
pub mod cart;
pub mod stats;

// Re-export commonly used types
pub use account::{Account, AccountSummary, Permission, RegisterAccount, Role};
pub use book::{Book, CreateBook};
pub use borrow::{
    BorrowRecord, BorrowStatus, CheckoutPlan, CheckoutReceipt, LedgerEntry, OpenBorrow,
    ReturnReceipt, StagedBook,
};
pub use cart::{CartEntry, CartLine};
pub use stats::LibraryStats;
