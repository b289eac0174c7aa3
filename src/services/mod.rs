//! Business logic services

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod ledger;
pub mod points;
pub mod stats;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub accounts: accounts::AccountsService,
    pub catalog: catalog::CatalogService,
    pub cart: cart::CartService,
    pub ledger: ledger::LedgerService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            accounts: accounts::AccountsService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            cart: cart::CartService::new(repository.clone()),
            ledger: ledger::LedgerService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}
