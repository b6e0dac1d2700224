use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::EditLogic;
use crate::db::log::audit;
use crate::errors::AppResult;
use crate::ui::messages::success;

use super::{notifier, open_db};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Toggle { session, attempt } = cmd {
        let mut pool = open_db(cfg)?;
        let notifier = notifier();

        let toggled = EditLogic::toggle_attempt(&mut pool, &notifier, session, attempt)?;

        audit(
            &pool.conn,
            "toggle",
            &toggled.id,
            &format!("Attempt marked as {}", toggled.result.as_str()),
        );
        success(format!(
            "Attempt {} marked as {}.",
            toggled.id,
            toggled.result.as_str()
        ));
    }
    Ok(())
}
