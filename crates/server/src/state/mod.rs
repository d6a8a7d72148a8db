use std::sync::Arc;

use axum::extract::FromRef;
use deadpool_sqlite::Pool;

use crate::cli::Cli;

/// Shared by every handler. Both fields are reference counted, clones are cheap
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: Pool,
    pub args: Arc<Cli>,
}

impl FromRef<AppState> for Pool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
