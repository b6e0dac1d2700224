use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::repo::{load_problems, load_sessions};
use crate::errors::AppResult;
use crate::models::{Problem, Session};
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_result, colorize_optional};
use crate::utils::table::{Column, Table};
use std::collections::HashMap;

use super::open_db;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { problems, sessions } = cmd {
        let pool = open_db(cfg)?;
        let all_problems = load_problems(&pool)?;
        let show_both = !*problems && !*sessions;

        if *problems || show_both {
            print_problems(&all_problems);
        }
        if *sessions || show_both {
            let mut all_sessions = load_sessions(&pool)?;
            all_sessions.sort_by_key(|s| s.date);
            print_sessions(&all_sessions, &all_problems);
        }
    }
    Ok(())
}

fn print_problems(problems: &[Problem]) {
    header("Problems");
    if problems.is_empty() {
        info("No problems yet. Add one with `cruxlog add <name> --grade C3`.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("ID", 40),
        Column::new("NAME", 24),
        Column::new("GRADE", 7),
        Column::new("AREA", 16),
        Column::new("SENT", 10),
    ]);
    for p in problems {
        table.add_row(vec![
            p.id.clone(),
            p.name.clone(),
            p.grade.clone(),
            p.area.clone(),
            p.completed_date
                .map(|d| d.date_naive().to_string())
                .unwrap_or_else(|| "--".into()),
        ]);
    }
    println!("{}", table.render());
}

fn print_sessions(sessions: &[Session], problems: &[Problem]) {
    header("Sessions");
    if sessions.is_empty() {
        info("No sessions logged yet.");
        return;
    }

    let names: HashMap<&str, String> = problems
        .iter()
        .map(|p| (p.id.as_str(), format!("{} ({})", p.name, p.grade)))
        .collect();

    for s in sessions {
        let location = colorize_optional(&s.location);
        println!(
            "📅 {}  📍 {}  ({} attempts, {} sends)  {}",
            s.day(),
            location,
            s.attempts.len(),
            s.send_count(),
            s.id
        );
        for a in &s.attempts {
            // a dangling reference shows the raw problem id
            let label = names
                .get(a.problem_id.as_str())
                .cloned()
                .unwrap_or_else(|| a.problem_id.clone());
            let mark = if a.is_send() { "✔" } else { "·" };
            println!(
                "    {}{} {:<7}{} {}  [{}]",
                color_for_result(a.is_send()),
                mark,
                a.result.as_str(),
                RESET,
                label,
                a.id
            );
        }
        if !s.notes.is_empty() {
            println!("    📝 {}", s.notes);
        }
    }
    println!();
}
