//! Application state for Axum handlers.

use cardstack_core::Card;
use cardstack_repository::{Dao, DatabasePool};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub card_dao: Arc<dyn Dao<Card>>,
    /// Pool checked by `/ready`, when the DAO is backed by one.
    pub db_pool: Option<Arc<DatabasePool>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(card_dao: Arc<dyn Dao<Card>>) -> Self {
        Self {
            card_dao,
            db_pool: None,
        }
    }

    #[must_use]
    pub fn with_database_pool(mut self, pool: Arc<DatabasePool>) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
