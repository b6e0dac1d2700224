//! Formatting utilities used for CLI outputs.

use crate::core::progression::Level;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn italic(s: &str) -> String {
    format!("\x1b[3m{}\x1b[0m", s)
}

/// Text progress bar, e.g. `[██████░░░░]`.
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// "250 / 499 XP" style label for a level, or "4200 XP (max level)".
pub fn xp_label(level: &Level, xp: u64) -> String {
    match level.max_xp {
        Some(max) => format!("{} / {} XP", xp, max + 1),
        None => format!("{} XP (max level)", xp),
    }
}

/// Average grade rounded to one decimal.
pub fn format_avg(avg: f64) -> String {
    format!("{:.1}", avg)
}

