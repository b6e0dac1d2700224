use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::{BackupLogic, ImportMode};
use crate::db::log::audit;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::ui::prompt::ask_confirmation;
use crate::utils::path::expand_tilde;
use std::fs;

use super::{notifier, open_db};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file, mode, yes } = cmd {
        let mode = ImportMode::parse(mode)?;
        let path = expand_tilde(file);

        // validate everything before touching the store
        let text = fs::read_to_string(&path)?;
        let parsed = BackupLogic::parse(&text)?;

        if mode == ImportMode::Replace
            && !ask_confirmation(
                "Replace ALL current data with the backup? This action is irreversible.",
                *yes,
            )
        {
            info("Operation cancelled.");
            return Ok(());
        }

        let mut pool = open_db(cfg)?;
        let notifier = notifier();
        let report = BackupLogic::import(&mut pool, &notifier, parsed, mode)?;

        audit(
            &pool.conn,
            "import",
            &path.to_string_lossy(),
            &format!(
                "Imported ({}): {} problems, {} sessions, {} settings",
                mode.as_str(),
                report.problems_added,
                report.sessions_added,
                report.settings_applied
            ),
        );

        success(format!(
            "Imported {} problem(s), {} session(s), {} setting(s) [{}].",
            report.problems_added,
            report.sessions_added,
            report.settings_applied,
            mode.as_str()
        ));
        if report.problems_skipped + report.sessions_skipped > 0 {
            info(format!(
                "Skipped {} problem(s) and {} session(s) already present.",
                report.problems_skipped, report.sessions_skipped
            ));
        }
    }
    Ok(())
}
