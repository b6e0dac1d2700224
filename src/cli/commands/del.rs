use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::del::{AttemptRemoval, DeleteLogic};
use crate::db::log::audit;
use crate::db::repo::resolve_problem;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::ui::prompt::ask_confirmation;

use super::{notifier, open_db};

/// Split `SESSION:ATTEMPT`.
fn split_attempt_ref(s: &str) -> AppResult<(&str, &str)> {
    s.split_once(':')
        .filter(|(a, b)| !a.trim().is_empty() && !b.trim().is_empty())
        .map(|(a, b)| (a.trim(), b.trim()))
        .ok_or_else(|| AppError::InvalidAttempt(format!("expected SESSION:ATTEMPT, got '{}'", s)))
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del {
        problem,
        session,
        attempt,
        yes,
    } = cmd
    {
        let selected = [problem.is_some(), session.is_some(), attempt.is_some()]
            .iter()
            .filter(|b| **b)
            .count();
        if selected != 1 {
            return Err(AppError::Other(
                "Specify exactly one of --problem, --session or --attempt.".into(),
            ));
        }

        let mut pool = open_db(cfg)?;
        let notifier = notifier();

        //
        // PROBLEM
        //
        if let Some(key) = problem {
            let p = resolve_problem(&pool, key)?;
            let prompt = format!(
                "Delete problem '{}' ({})? Attempts logged on it stay in their sessions.",
                p.name, p.grade
            );
            if !ask_confirmation(&prompt, *yes) {
                info("Operation cancelled.");
                return Ok(());
            }

            DeleteLogic::problem(&mut pool, &notifier, &p.id)?;
            audit(&pool.conn, "del", &p.id, &format!("Deleted problem '{}'", p.name));
            success(format!("Problem '{}' has been deleted.", p.name));
        }

        //
        // SESSION
        //
        if let Some(id) = session {
            let prompt = format!("Delete session {}? This action is irreversible.", id);
            if !ask_confirmation(&prompt, *yes) {
                info("Operation cancelled.");
                return Ok(());
            }

            let s = DeleteLogic::session(&mut pool, &notifier, id)?;
            audit(
                &pool.conn,
                "del",
                &s.id,
                &format!("Deleted session of {} ({} attempts)", s.day(), s.attempts.len()),
            );
            success(format!("Session {} has been deleted.", s.id));
        }

        //
        // ATTEMPT
        //
        if let Some(r) = attempt {
            let (session_id, attempt_id) = split_attempt_ref(r)?;
            let prompt = format!("Remove attempt {} from session {}?", attempt_id, session_id);
            if !ask_confirmation(&prompt, *yes) {
                info("Operation cancelled.");
                return Ok(());
            }

            match DeleteLogic::attempt(&mut pool, &notifier, session_id, attempt_id)? {
                AttemptRemoval::Kept(s) => {
                    audit(&pool.conn, "del", attempt_id, &format!("Removed attempt from session {}", s.id));
                    success(format!(
                        "Attempt removed; session {} has {} attempt(s) left.",
                        s.id,
                        s.attempts.len()
                    ));
                }
                AttemptRemoval::SessionDeleted(id) => {
                    audit(&pool.conn, "del", &id, "Removed last attempt; session deleted");
                    success(format!(
                        "Attempt removed; session {} had no attempts left and was deleted.",
                        id
                    ));
                }
            }
        }
    }
    Ok(())
}
