//! Book model and catalog requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Book row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub category: String,
    pub year: Option<i32>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub image_ref: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    pub fn borrowed_copies(&self) -> i32 {
        self.total_copies - self.available_copies
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,
    pub year: Option<i32>,
    #[validate(range(min = 0, message = "Copies cannot be negative"))]
    pub total_copies: i32,
    pub image_ref: Option<String>,
    pub description: Option<String>,
}
