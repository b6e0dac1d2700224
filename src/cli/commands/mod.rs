pub mod add;
pub mod backup;
pub mod config;
pub mod db;
pub mod del;
pub mod draft;
pub mod edit;
pub mod import;
pub mod init;
pub mod insights;
pub mod list;
pub mod log;
pub mod progress;
pub mod reset;
pub mod session;
pub mod settings;
pub mod toggle;

use crate::config::Config;
use crate::core::notify::Notifier;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Open the configured database (migrations run on open).
pub(crate) fn open_db(cfg: &Config) -> AppResult<DbPool> {
    DbPool::new(&cfg.database)
}

/// Notifier for one command run; events end up in the diagnostics log.
pub(crate) fn notifier() -> Notifier {
    let mut n = Notifier::new();
    n.subscribe(|event| tracing::debug!(event = event.name(), "store changed"));
    n
}
