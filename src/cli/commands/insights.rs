use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::analytics::{TimeRange, compute_insights};
use crate::db::repo::{load_problems, load_sessions, load_state};
use crate::db::store::Store;
use crate::errors::AppResult;
use crate::models::GradePrefix;
use crate::models::settings::SETTING_GRADE_PREFIX;
use crate::ui::messages::{header, info};
use crate::utils::colors::{CYAN, GREEN, RESET};
use crate::utils::formatting::{bold, format_avg};
use chrono::Utc;

use super::open_db;

const BAR_WIDTH: usize = 30;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Insights { prefix, range } = cmd {
        let pool = open_db(cfg)?;
        let state = load_state(&pool)?;

        // explicit flag, then the stored setting, then the config default
        let prefix = match prefix {
            Some(code) => GradePrefix::parse(code)?,
            None if pool.setting(SETTING_GRADE_PREFIX)?.is_some() => state.grade_prefix,
            None => GradePrefix::parse(&cfg.default_grade_prefix)?,
        };
        let range = TimeRange::parse(range.as_deref().unwrap_or(cfg.default_range.as_str()))?;

        let sessions = load_sessions(&pool)?;
        let problems = load_problems(&pool)?;
        let insights = compute_insights(&sessions, &problems, prefix, range, Utc::now());

        header(format!("Insights ({} grades, last {})", prefix, range));
        println!(
            "{CYAN}Sessions with sends:{RESET} {}   {CYAN}Highest grade:{RESET} {}",
            insights.session_count,
            bold(&insights.highest_label())
        );

        if insights.points.is_empty() {
            info("No sends in this range yet.");
            return Ok(());
        }

        println!("\n{}", bold("Grade trend"));
        for p in &insights.points {
            println!(
                "  {}  avg {:>4}  max {}",
                p.date.date_naive(),
                format_avg(p.avg),
                prefix.label(p.max)
            );
        }

        println!("\n{}", bold("Sends per grade"));
        let peak = insights.histogram.iter().map(|b| b.count).max().unwrap_or(0);
        for b in &insights.histogram {
            let len = if peak == 0 { 0 } else { b.count * BAR_WIDTH / peak };
            println!(
                "  {:>4} │{GREEN}{}{RESET} {}",
                prefix.label(b.grade),
                "█".repeat(len),
                b.count
            );
        }
        println!();
    }
    Ok(())
}
