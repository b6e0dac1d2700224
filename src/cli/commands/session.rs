use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::draft::DraftLogic;
use crate::core::notify::Notifier;
use crate::core::session::{ProgressionOutcome, SessionLogic};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::repo::{find_problem, load_problems};
use crate::errors::{AppError, AppResult};
use crate::models::{Attempt, AttemptResult, Problem, SessionFields};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{CYAN, GREEN, MAGENTA, RESET, YELLOW};
use crate::utils::date::parse_optional_date;

use super::{notifier, open_db};

/// Parse `PROBLEM[:send|:attempt]`. A suffix that is not a result code is
/// part of the problem name.
pub(crate) fn parse_attempt_spec(spec: &str) -> (String, AttemptResult) {
    if let Some((key, code)) = spec.rsplit_once(':')
        && let Some(result) = AttemptResult::from_code(code)
    {
        return (key.trim().to_string(), result);
    }
    (spec.trim().to_string(), AttemptResult::Attempt)
}

fn build_attempts(problems: &[Problem], specs: &[String]) -> AppResult<Vec<Attempt>> {
    specs
        .iter()
        .map(|spec| {
            let (key, result) = parse_attempt_spec(spec);
            if key.is_empty() {
                return Err(AppError::InvalidAttempt(spec.clone()));
            }
            let problem =
                find_problem(problems, &key).ok_or_else(|| AppError::ProblemNotFound(key.clone()))?;
            Ok(Attempt::new(problem.id.clone(), result, None))
        })
        .collect()
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Session {
        attempts,
        date,
        location,
        notes,
        from_draft,
    } = cmd
    {
        let mut pool = open_db(cfg)?;
        let notifier = notifier();
        let problems = load_problems(&pool)?;

        let mut fields = if *from_draft {
            let draft = DraftLogic::current(&pool)?
                .ok_or_else(|| AppError::Other("There is no draft session.".into()))?;
            DraftLogic::to_fields(&draft)
        } else {
            SessionFields::default()
        };

        fields.attempts.extend(build_attempts(&problems, attempts)?);
        if fields.attempts.is_empty() {
            return Err(AppError::InvalidAttempt(
                "a session needs at least one --attempt".into(),
            ));
        }
        fields.date = parse_optional_date(date.as_ref())?;
        if let Some(l) = location {
            fields.location = Some(l.clone());
        }
        if let Some(n) = notes {
            fields.notes = Some(n.clone());
        }

        log_session(&mut pool, &notifier, fields, &problems)?;

        if *from_draft {
            DraftLogic::discard(&mut pool, &notifier)?;
            info("Draft session cleared.");
        }
    }
    Ok(())
}

fn log_session(
    pool: &mut DbPool,
    notifier: &Notifier,
    fields: SessionFields,
    problems: &[Problem],
) -> AppResult<()> {
    let outcome = SessionLogic::log(pool, notifier, fields)?;
    let session = &outcome.session;

    audit(
        &pool.conn,
        "session",
        &session.id,
        &format!(
            "Logged session of {} with {} attempts ({} sends)",
            session.day(),
            session.attempts.len(),
            session.send_count()
        ),
    );

    success(format!(
        "Session {} logged for {}: {} attempt(s), {} send(s).",
        session.id,
        session.day(),
        session.attempts.len(),
        session.send_count()
    ));

    for id in &outcome.completed {
        if let Some(p) = problems.iter().find(|p| &p.id == id) {
            println!("  {GREEN}✔ First send:{RESET} {} ({})", p.name, p.grade);
        }
    }

    match (&outcome.progression, &outcome.secondary_error) {
        (Some(p), _) => print_progression(pool, p),
        (None, Some(err)) => {
            audit(&pool.conn, "session", &session.id, &format!("Progression update failed: {}", err));
            warning(format!(
                "Session saved, but XP and achievements could not be updated: {}",
                err
            ));
        }
        (None, None) => {}
    }
    Ok(())
}

fn print_progression(pool: &DbPool, p: &ProgressionOutcome) {
    println!();
    println!(
        "{CYAN}XP:{RESET} +{} (base {}, attempts {}, sends {}, personal bests {})",
        p.award.total(),
        p.award.base,
        p.award.attempt_xp,
        p.award.send_xp,
        p.award.personal_best_xp
    );
    for gn in &p.award.new_personal_bests {
        println!("  {YELLOW}★ New personal best:{RESET} grade {}", gn);
    }

    if !p.unlocked.is_empty() {
        header("Achievements unlocked");
        for a in &p.unlocked {
            println!("  {} {} (+{} XP): {}", a.emoji, a.name, a.xp_reward, a.description);
            audit(&pool.conn, "achievement", a.id, &format!("Unlocked '{}'", a.name));
        }
    }

    println!("{CYAN}Total XP:{RESET} {} → {}", p.xp_before, p.xp_after);

    if p.leveled_up() {
        println!(
            "{MAGENTA}🎉 Level up!{RESET} {} {} → {} {} (level {})",
            p.level_before.emoji,
            p.level_before.name,
            p.level_after.emoji,
            p.level_after.name,
            p.level_after.level
        );
    }
}
