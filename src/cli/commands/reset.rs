use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::del::DeleteLogic;
use crate::db::log::audit;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::ui::prompt::ask_confirmation;

use super::{notifier, open_db};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Reset { yes } = cmd {
        if !ask_confirmation(
            "Delete ALL problems, sessions, settings and XP? This action is irreversible.",
            *yes,
        ) {
            info("Operation cancelled.");
            return Ok(());
        }

        let mut pool = open_db(cfg)?;
        let notifier = notifier();
        DeleteLogic::reset_all(&mut pool, &notifier)?;

        audit(&pool.conn, "reset", "", "All data cleared");
        success("All data has been cleared.");
    }
    Ok(())
}
