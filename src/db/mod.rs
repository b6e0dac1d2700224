pub mod log;
pub mod migrate;
pub mod pool;
pub mod repo;
pub mod sqlite_store;
pub mod stats;
pub mod store;

pub use pool::DbPool;
pub use store::{Collection, MemoryStore, Store};

/// The SQLite-backed [`Store`].
pub type SqliteStore = DbPool;
