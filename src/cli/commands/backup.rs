use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::log::audit;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::ui::prompt::ensure_writable;
use crate::utils::path::expand_tilde;

use super::open_db;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let dest = expand_tilde(file);
        let final_path = if *compress {
            dest.with_extension("zip")
        } else {
            dest.clone()
        };
        ensure_writable(&final_path, *force)?;

        let pool = open_db(cfg)?;
        let written = BackupLogic::export(&pool, &dest, *compress)?;

        audit(
            &pool.conn,
            "backup",
            &written.to_string_lossy(),
            if *compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );
        success(format!("Backup created: {}", written.display()));
    }
    Ok(())
}
