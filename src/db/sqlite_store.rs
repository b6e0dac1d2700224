//! `Store` backed by the SQLite `records` and `settings` tables.

use crate::db::pool::DbPool;
use crate::db::store::{Collection, Store, merge_patch, record_id};
use crate::errors::{AppError, AppResult};
use rusqlite::{OptionalExtension, params};
use serde_json::{Map, Value};

const UPSERT_SETTING: &str = "INSERT INTO settings (name, value) VALUES (?1, ?2)
     ON CONFLICT(name) DO UPDATE SET value = excluded.value";

fn parse_body(raw: &str) -> AppResult<Value> {
    Ok(serde_json::from_str(raw)?)
}

impl DbPool {
    fn load_body(&self, collection: Collection, id: &str) -> AppResult<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM records WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;
        raw.as_deref().map(parse_body).transpose()
    }
}

impl Store for DbPool {
    fn get_all(&self, collection: Collection) -> AppResult<Vec<Value>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT body FROM records WHERE collection = ?1 ORDER BY seq ASC")?;
        let rows = stmt.query_map([collection.as_str()], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(parse_body(&r?)?);
        }
        Ok(out)
    }

    fn save(&mut self, collection: Collection, record: Value) -> AppResult<Value> {
        let id = record_id(&record)?;
        if self.load_body(collection, &id)?.is_some() {
            return Err(AppError::DuplicateId {
                collection: collection.to_string(),
                id,
            });
        }

        self.conn.execute(
            "INSERT INTO records (collection, id, body) VALUES (?1, ?2, ?3)",
            params![collection.as_str(), id, serde_json::to_string(&record)?],
        )?;
        Ok(record)
    }

    fn put(&mut self, collection: Collection, id: &str, patch: Value) -> AppResult<Option<Value>> {
        let Some(mut record) = self.load_body(collection, id)? else {
            return Ok(None);
        };
        merge_patch(&mut record, patch)?;

        self.conn.execute(
            "UPDATE records SET body = ?1 WHERE collection = ?2 AND id = ?3",
            params![serde_json::to_string(&record)?, collection.as_str(), id],
        )?;
        Ok(Some(record))
    }

    fn remove(&mut self, collection: Collection, id: &str) -> AppResult<()> {
        self.conn.execute(
            "DELETE FROM records WHERE collection = ?1 AND id = ?2",
            params![collection.as_str(), id],
        )?;
        Ok(())
    }

    fn clear_collection(&mut self, collection: Collection) -> AppResult<()> {
        self.conn.execute(
            "DELETE FROM records WHERE collection = ?1",
            [collection.as_str()],
        )?;
        Ok(())
    }

    fn clear_all(&mut self) -> AppResult<()> {
        self.conn
            .execute_batch("BEGIN; DELETE FROM records; DELETE FROM settings; COMMIT;")?;
        Ok(())
    }

    fn setting(&self, name: &str) -> AppResult<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM settings WHERE name = ?1", [name], |row| {
                row.get(0)
            })
            .optional()?;
        raw.as_deref().map(parse_body).transpose()
    }

    fn set_setting(&mut self, name: &str, value: Value) -> AppResult<()> {
        self.conn.execute(UPSERT_SETTING, params![name, serde_json::to_string(&value)?])?;
        Ok(())
    }

    fn set_settings(&mut self, entries: &[(&str, Value)]) -> AppResult<()> {
        let tx = self.conn.transaction()?;
        for (name, value) in entries {
            tx.execute(UPSERT_SETTING, params![name, serde_json::to_string(value)?])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get_all_settings(&self) -> AppResult<Map<String, Value>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT name, value FROM settings ORDER BY name ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut out = Map::new();
        for r in rows {
            let (name, raw) = r?;
            out.insert(name, parse_body(&raw)?);
        }
        Ok(out)
    }
}
