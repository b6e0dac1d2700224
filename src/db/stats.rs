use crate::db::pool::DbPool;
use crate::db::repo::{load_problems, load_sessions};
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use std::fs;

pub fn print_db_info(pool: &DbPool) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(&pool.path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, pool.path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    //
    // 2) RECORD COUNTS
    //
    let problems = load_problems(pool)?;
    let sessions = load_sessions(pool)?;
    let attempts: usize = sessions.iter().map(|s| s.attempts.len()).sum();
    let completed = problems.iter().filter(|p| p.is_completed()).count();

    println!(
        "{}• Problems:{} {}{}{} ({} completed)",
        CYAN,
        RESET,
        GREEN,
        problems.len(),
        RESET,
        completed
    );
    println!(
        "{}• Sessions:{} {}{}{} ({} attempts)",
        CYAN,
        RESET,
        GREEN,
        sessions.len(),
        RESET,
        attempts
    );

    //
    // 3) DATE RANGE
    //
    let first = sessions.iter().map(|s| s.day()).min();
    let last = sessions.iter().map(|s| s.day()).max();

    let fmt = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.to_string())
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };

    println!("{}• Session range:{}", CYAN, RESET);
    println!("    from: {}", fmt(first));
    println!("    to:   {}", fmt(last));

    //
    // 4) AVERAGE ATTEMPTS/SESSION
    //
    if !sessions.is_empty() {
        let avg = attempts as f64 / sessions.len() as f64;
        println!("{}• Average attempts/session:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
