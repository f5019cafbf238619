pub mod accounts;
pub mod board;
pub mod directory;
pub mod error;
pub mod messages;
pub mod router;

use std::sync::Arc;

use anyhow::anyhow;
use tracing::error;

use murmur_db::Database;

use crate::board::MessageBoard;
use crate::directory::AccountDirectory;
use crate::error::ApiError;

pub use crate::router::router;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub accounts: AccountDirectory,
    pub messages: MessageBoard<AccountDirectory>,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>) -> AppState {
        let accounts = AccountDirectory::new(db.clone());
        let messages = MessageBoard::new(db, accounts.clone());
        Arc::new(Self { accounts, messages })
    }
}

/// Run blocking DB work off the async runtime.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow!("background task failed: {}", e))
    })
}
