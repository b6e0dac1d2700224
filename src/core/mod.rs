//! Domain logic: analytics, progression, and the actions that mutate the store.

pub mod achievements;
pub mod add;
pub mod analytics;
pub mod backup;
pub mod completion;
pub mod config;
pub mod del;
pub mod draft;
pub mod edit;
pub mod log;
pub mod notify;
pub mod progression;
pub mod session;
