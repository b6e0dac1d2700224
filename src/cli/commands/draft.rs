use crate::cli::parser::{Commands, DraftAction};
use crate::config::Config;
use crate::core::draft::DraftLogic;
use crate::db::log::audit;
use crate::db::repo::{load_problems, resolve_problem};
use crate::errors::AppResult;
use crate::models::AttemptResult;
use crate::ui::messages::{header, info, success};
use std::collections::HashMap;

use super::{notifier, open_db};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Draft { action } = cmd {
        let mut pool = open_db(cfg)?;
        let notifier = notifier();

        match action {
            DraftAction::Add {
                problem,
                send,
                notes,
            } => {
                let p = resolve_problem(&pool, problem)?;
                let result = if *send {
                    AttemptResult::Send
                } else {
                    AttemptResult::Attempt
                };
                let draft =
                    DraftLogic::add_attempt(&mut pool, &notifier, &p.id, result, notes.clone())?;
                audit(&pool.conn, "draft", &p.id, &format!("Draft attempt ({})", result.as_str()));
                success(format!(
                    "Added {} on '{}' to the draft ({} attempt(s)).",
                    result.as_str(),
                    p.name,
                    draft.attempts.len()
                ));
            }

            DraftAction::Set { location, notes } => {
                DraftLogic::set_details(&mut pool, &notifier, location.clone(), notes.clone())?;
                success("Draft updated.");
            }

            DraftAction::Show => {
                let Some(draft) = DraftLogic::current(&pool)? else {
                    info("There is no draft session.");
                    return Ok(());
                };

                let names: HashMap<String, String> = load_problems(&pool)?
                    .into_iter()
                    .map(|p| (p.id, format!("{} ({})", p.name, p.grade)))
                    .collect();

                header("Draft session");
                println!("started:  {}", draft.started_at.format("%Y-%m-%d %H:%M"));
                if !draft.location.is_empty() {
                    println!("location: {}", draft.location);
                }
                if !draft.notes.is_empty() {
                    println!("notes:    {}", draft.notes);
                }
                for (i, a) in draft.attempts.iter().enumerate() {
                    let label = names.get(&a.problem_id).unwrap_or(&a.problem_id);
                    println!("  {:>2}. {:<7} {}", i + 1, a.result.as_str(), label);
                }
                if draft.attempts.is_empty() {
                    info("No attempts yet.");
                }
            }

            DraftAction::Discard => {
                if DraftLogic::discard(&mut pool, &notifier)? {
                    audit(&pool.conn, "draft", "", "Draft discarded");
                    success("Draft session discarded.");
                } else {
                    info("There is no draft session.");
                }
            }
        }
    }
    Ok(())
}
