use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::notify::ChangeEvent;
use crate::db::log::audit;
use crate::db::repo::{load_state, set_grade_prefix, set_theme};
use crate::errors::AppResult;
use crate::models::{GradePrefix, Theme};
use crate::ui::messages::{header, success};
use crate::utils::colors::{CYAN, RESET};

use super::{notifier, open_db};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Settings {
        theme,
        prefix,
        print,
    } = cmd
    {
        let mut pool = open_db(cfg)?;
        let notifier = notifier();

        if let Some(t) = theme {
            let theme = Theme::parse(t)?;
            set_theme(&mut pool, theme)?;
            notifier.emit(ChangeEvent::SettingsUpdated);
            audit(&pool.conn, "settings", "theme", &format!("Theme set to {}", theme.as_str()));
            success(format!("Theme set to {}.", theme.as_str()));
        }

        if let Some(p) = prefix {
            let prefix = GradePrefix::parse(p)?;
            set_grade_prefix(&mut pool, prefix)?;
            notifier.emit(ChangeEvent::SettingsUpdated);
            audit(&pool.conn, "settings", "gradePrefix", &format!("Grade prefix set to {}", prefix));
            success(format!("Grade prefix set to {}.", prefix));
        }

        if *print || (theme.is_none() && prefix.is_none()) {
            let state = load_state(&pool)?;
            header("Settings");
            println!("{CYAN}theme:{RESET}        {}", state.theme.as_str());
            println!("{CYAN}grade prefix:{RESET} {}", state.grade_prefix);
            println!("{CYAN}xp:{RESET}           {}", state.xp);
            println!(
                "{CYAN}achievements:{RESET} {}",
                state.achievements_unlocked.len()
            );
            println!(
                "{CYAN}draft:{RESET}        {}",
                state
                    .draft_session
                    .map(|d| format!("{} attempt(s)", d.attempts.len()))
                    .unwrap_or_else(|| "none".into())
            );
        }
    }
    Ok(())
}
