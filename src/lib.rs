//! Library lending core
//!
//! Catalog, per-account cart, borrow ledger and loyalty points for a small
//! lending library, backed by PostgreSQL.

pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult, Notice};
pub use library::Library;
