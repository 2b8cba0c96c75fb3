//! Shared application state.
//!
//! Handlers receive this via `State<AppState>`. The database handle wraps a
//! connection pool, so cloning per request is cheap.

use bazaar_db::Database;

/// State shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
