use crate::core::notify::{ChangeEvent, Notifier};
use crate::db::repo::{load_problems, load_sessions, save_problem, save_session};
use crate::db::store::Store;
use crate::errors::{AppError, AppResult};
use crate::models::{Problem, Session};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

/// Full export of the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub problems: Vec<Problem>,
    pub sessions: Vec<Session>,
    pub settings: Map<String, Value>,
    pub exported_at: DateTime<Utc>,
}

/// A validated backup. Absent sections are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBackup {
    pub problems: Option<Vec<Problem>>,
    pub sessions: Option<Vec<Session>>,
    pub settings: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Clear everything, then load the backup.
    #[default]
    Replace,
    /// Add records with unknown ids and overwrite the listed settings.
    Merge,
}

impl ImportMode {
    pub fn parse(code: &str) -> AppResult<Self> {
        match code.trim().to_lowercase().as_str() {
            "replace" => Ok(ImportMode::Replace),
            "merge" => Ok(ImportMode::Merge),
            other => Err(AppError::Other(format!(
                "Invalid import mode '{}' (expected replace or merge)",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Replace => "replace",
            ImportMode::Merge => "merge",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub problems_added: usize,
    pub problems_skipped: usize,
    pub sessions_added: usize,
    pub sessions_skipped: usize,
    pub settings_applied: usize,
}

pub struct BackupLogic;

impl BackupLogic {
    pub fn snapshot(store: &dyn Store) -> AppResult<Backup> {
        Ok(Backup {
            problems: load_problems(store)?,
            sessions: load_sessions(store)?,
            settings: store.get_all_settings()?,
            exported_at: Utc::now(),
        })
    }

    /// Write the backup JSON to `dest`, or into a zip next to it when
    /// `compress` is set. Returns the file written.
    pub fn export(store: &dyn Store, dest: &Path, compress: bool) -> AppResult<PathBuf> {
        let backup = Self::snapshot(store)?;

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json_path = if compress && dest.extension().is_some_and(|e| e == "zip") {
            dest.with_extension("json")
        } else {
            dest.to_path_buf()
        };

        let json = serde_json::to_string_pretty(&backup)?;
        fs::write(&json_path, json)?;
        tracing::info!(
            path = %json_path.display(),
            problems = backup.problems.len(),
            sessions = backup.sessions.len(),
            "backup written"
        );

        if !compress {
            return Ok(json_path);
        }

        let compressed = compress_backup(&json_path)?;
        if let Err(e) = fs::remove_file(&json_path) {
            tracing::warn!(path = %json_path.display(), error = %e, "failed to remove uncompressed backup");
        }
        Ok(compressed)
    }

    /// Validate a backup document. Nothing is written here, so a rejected
    /// file leaves the store untouched.
    pub fn parse(text: &str) -> AppResult<ParsedBackup> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| AppError::InvalidBackup(format!("not valid JSON: {}", e)))?;
        let Value::Object(mut root) = value else {
            return Err(AppError::InvalidBackup("expected a JSON object".into()));
        };

        let problems = take_section::<Problem>(&mut root, "problems", |p| &p.id)?;
        let sessions = take_section::<Session>(&mut root, "sessions", |s| &s.id)?;
        let settings = match root.remove("settings") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                return Err(AppError::InvalidBackup("'settings' must be an object".into()));
            }
        };

        if problems.is_none() && sessions.is_none() && settings.is_none() {
            return Err(AppError::InvalidBackup(
                "no problems, sessions or settings section found".into(),
            ));
        }

        Ok(ParsedBackup {
            problems,
            sessions,
            settings,
        })
    }

    pub fn import(
        store: &mut dyn Store,
        notifier: &Notifier,
        backup: ParsedBackup,
        mode: ImportMode,
    ) -> AppResult<ImportReport> {
        let mut report = ImportReport::default();

        if mode == ImportMode::Replace {
            store.clear_all()?;
        }

        let known_problems: HashSet<String> =
            load_problems(store)?.into_iter().map(|p| p.id).collect();
        let known_sessions: HashSet<String> =
            load_sessions(store)?.into_iter().map(|s| s.id).collect();

        for p in backup.problems.iter().flatten() {
            if known_problems.contains(&p.id) {
                report.problems_skipped += 1;
                continue;
            }
            save_problem(store, p)?;
            report.problems_added += 1;
        }

        for s in backup.sessions.iter().flatten() {
            if known_sessions.contains(&s.id) {
                report.sessions_skipped += 1;
                continue;
            }
            save_session(store, s)?;
            report.sessions_added += 1;
        }

        for (name, value) in backup.settings.into_iter().flatten() {
            store.set_setting(&name, value)?;
            report.settings_applied += 1;
        }

        let events = match mode {
            ImportMode::Replace => vec![
                ChangeEvent::ProblemsUpdated,
                ChangeEvent::SessionsUpdated,
                ChangeEvent::AchievementsUpdated,
                ChangeEvent::SettingsUpdated,
            ],
            ImportMode::Merge => {
                let mut ev = Vec::new();
                if report.problems_added > 0 {
                    ev.push(ChangeEvent::ProblemsUpdated);
                }
                if report.sessions_added > 0 {
                    ev.push(ChangeEvent::SessionsUpdated);
                }
                if report.settings_applied > 0 {
                    ev.push(ChangeEvent::AchievementsUpdated);
                    ev.push(ChangeEvent::SettingsUpdated);
                }
                ev
            }
        };
        notifier.emit_all(&events);

        tracing::info!(mode = mode.as_str(), ?report, "backup imported");
        Ok(report)
    }
}

/// Decode an optional array section, rejecting bad records and repeated ids.
fn take_section<T: DeserializeOwned>(
    root: &mut Map<String, Value>,
    name: &str,
    id_of: impl Fn(&T) -> &String,
) -> AppResult<Option<Vec<T>>> {
    let items = match root.remove(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(AppError::InvalidBackup(format!("'{}' must be an array", name)));
        }
    };

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let record: T = serde_json::from_value(item)
            .map_err(|e| AppError::InvalidBackup(format!("{}[{}]: {}", name, i, e)))?;
        let id = id_of(&record).clone();
        if !seen.insert(id.clone()) {
            return Err(AppError::InvalidBackup(format!(
                "duplicate id '{}' in {}",
                id, name
            )));
        }
        out.push(record);
    }
    Ok(Some(out))
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cruxlog-backup.json".to_string());

    let mut f = fs::File::open(path)?;
    zip.start_file(entry, options)
        .map_err(std::io::Error::other)?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    Ok(zip_path)
}
