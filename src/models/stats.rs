//! Catalog and lending statistics

use serde::Serialize;

/// Administrator dashboard figures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    /// Number of distinct titles
    pub total_titles: i64,
    pub total_copies: i64,
    pub available_copies: i64,
    pub borrowed_copies: i64,
    pub member_count: i64,
    pub active_borrows: i64,
    /// Open records past their due date
    pub overdue_borrows: i64,
}
