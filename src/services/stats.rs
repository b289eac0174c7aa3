//! Statistics service

use chrono::Utc;

use crate::{
    error::AppResult,
    models::{account::Role, stats::LibraryStats},
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_stats(&self) -> AppResult<LibraryStats> {
        let (total_titles, total_copies, available_copies) = self.repository.books.copy_totals().await?;
        let member_count = self.repository.accounts.count_by_role(Role::Member).await?;
        let active_borrows = self.repository.borrows.count_active().await?;
        let overdue_borrows = self
            .repository
            .borrows
            .count_overdue(Utc::now().date_naive())
            .await?;

        Ok(LibraryStats {
            total_titles,
            total_copies,
            available_copies,
            borrowed_copies: total_copies - available_copies,
            member_count,
            active_borrows,
            overdue_borrows,
        })
    }
}
