use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::achievements::{ACHIEVEMENTS, Category};
use crate::core::progression::level_for;
use crate::db::repo::load_state;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{GREY, RESET};
use crate::utils::formatting::{bold, italic, progress_bar, xp_label};

use super::open_db;

const WRAP: usize = 72;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Progress { all } = cmd {
        let pool = open_db(cfg)?;
        let state = load_state(&pool)?;

        let level = level_for(state.xp);
        let percent = level.progress_percent(state.xp);

        header("Progress");
        println!(
            "{} {}",
            level.emoji,
            bold(&format!("Level {}: {}", level.level, level.name))
        );
        for line in textwrap::wrap(level.description, WRAP) {
            println!("   {}", italic(&line));
        }
        println!(
            "   {} {}%  {}",
            progress_bar(percent, 24),
            percent,
            xp_label(level, state.xp)
        );
        if let Some(next) = level.next() {
            println!(
                "   {} XP to {} {}",
                next.min_xp.saturating_sub(state.xp),
                next.emoji,
                next.name
            );
        }

        let unlocked = ACHIEVEMENTS
            .iter()
            .filter(|a| state.achievements_unlocked.contains(a.id))
            .count();
        println!();
        header(format!("Achievements {}/{}", unlocked, ACHIEVEMENTS.len()));

        for category in [
            Category::Milestones,
            Category::Exploration,
            Category::Skill,
            Category::Endurance,
        ] {
            let entries: Vec<_> = ACHIEVEMENTS
                .iter()
                .filter(|a| a.category == category)
                .filter(|a| *all || state.achievements_unlocked.contains(a.id))
                .collect();
            if entries.is_empty() {
                continue;
            }

            println!("{}", bold(category.title()));
            for a in entries {
                if state.achievements_unlocked.contains(a.id) {
                    println!("  {} {} (+{} XP): {}", a.emoji, a.name, a.xp_reward, a.description);
                } else {
                    println!(
                        "  {GREY}🔒 {} (+{} XP): {}{RESET}",
                        a.name, a.xp_reward, a.description
                    );
                }
            }
            println!();
        }
    }
    Ok(())
}
