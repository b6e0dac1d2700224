use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

static ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid regex"));

const MAX_OP_WIDTH: usize = 60;

fn strip_ansi(s: &str) -> String {
    ANSI.replace_all(s, "").into_owned()
}

/// ANSI colour used for an operation name.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "session" => Colour::Green,
        "del" | "reset" => Colour::Red,
        "edit" | "toggle" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "backup" | "import" => Colour::Blue,
        "settings" | "draft" => Colour::Cyan,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// Cut to `MAX_OP_WIDTH` visible characters and colour the operation word.
fn render_op(operation: &str, target: &str) -> String {
    let color = color_for_operation(operation);
    let visible = if target.is_empty() {
        operation.to_string()
    } else {
        format!("{operation} ({target})")
    };

    let truncated = if visible.chars().count() > MAX_OP_WIDTH {
        let mut s: String = visible.chars().take(MAX_OP_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    match truncated.split_once(' ') {
        Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
        None => color.paint(truncated.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let rows: Vec<(i64, String, String)> = entries
            .iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| e.date.clone());
                (e.id, date, render_op(&e.operation, &e.target))
            })
            .collect();

        let op_w = rows
            .iter()
            .map(|(_, _, op)| strip_ansi(op).chars().count())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let id_w = rows.iter().map(|(id, _, _)| id.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|(_, d, _)| d.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for ((id, date, op), entry) in rows.iter().zip(&entries) {
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(op).chars().count()));
            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                op,
                padding,
                entry.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
