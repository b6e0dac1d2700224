//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate id '{id}' in collection '{collection}'")]
    DuplicateId { collection: String, id: String },

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid grade prefix: {0} (expected C or V)")]
    InvalidGradePrefix(String),

    #[error("Invalid time range: {0} (expected 7d, 30d, 1y or all)")]
    InvalidRange(String),

    #[error("Invalid attempt: {0}")]
    InvalidAttempt(String),

    #[error("Invalid theme: {0} (expected light or dark)")]
    InvalidTheme(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("Problem not found: {0}")]
    ProblemNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Attempt {attempt} not found in session {session}")]
    AttemptNotFound { session: String, attempt: String },

    #[error("Invalid backup: {0}")]
    InvalidBackup(String),

    #[error("Operation cancelled")]
    Cancelled,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
