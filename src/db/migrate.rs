use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};

/// A schema step, recorded in the `log` table once applied.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20251019_0001_create_records",
        description: "Created records table (problems, sessions)",
        sql: r#"
        CREATE TABLE IF NOT EXISTS records (
            seq        INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL CHECK (collection IN ('problems','sessions')),
            id         TEXT NOT NULL,
            body       TEXT NOT NULL,          -- JSON object
            UNIQUE (collection, id)
        );
        "#,
    },
    Migration {
        version: "20251019_0002_create_settings",
        description: "Created settings table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS settings (
            name  TEXT PRIMARY KEY,
            value TEXT NOT NULL                -- JSON value
        );
        "#,
    },
    Migration {
        version: "20251019_0003_index_records",
        description: "Indexed records by collection",
        sql: r#"
        CREATE INDEX IF NOT EXISTS idx_records_collection_seq ON records(collection, seq);
        "#,
    },
];

/// Ensure that the `log` table exists; it also tracks applied migrations.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let batch = format!(
        "BEGIN;\n{}\nINSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', '{}', '{}');\nCOMMIT;",
        m.sql, m.version, m.description
    );

    if let Err(e) = conn.execute_batch(&batch) {
        let _ = conn.execute_batch("ROLLBACK;");
        return Err(AppError::Migration(format!("{}: {}", m.version, e)));
    }

    tracing::info!(version = m.version, "{}", m.description);
    Ok(())
}

/// Versions not yet applied to this database.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations, returning the versions applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied.push(m.version);
    }

    Ok(applied)
}
