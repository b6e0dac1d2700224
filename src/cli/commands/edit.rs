use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::{EditLogic, ProblemPatch, SessionPatch};
use crate::db::log::audit;
use crate::db::repo::resolve_problem;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::date::parse_optional_date;

use super::{notifier, open_db};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        target,
        session,
        name,
        grade,
        area,
        photo,
        notes,
        date,
        location,
    } = cmd
    {
        let mut pool = open_db(cfg)?;
        let notifier = notifier();

        if *session {
            let patch = SessionPatch {
                date: parse_optional_date(date.as_ref())?,
                location: location.clone(),
                notes: notes.clone(),
            };
            let updated = EditLogic::session(&mut pool, &notifier, target, patch)?;

            audit(&pool.conn, "edit", &updated.id, "Edited session");
            success(format!(
                "Session {} updated ({}).",
                updated.id,
                updated.day()
            ));
            return Ok(());
        }

        let problem = resolve_problem(&pool, target)?;
        let patch = ProblemPatch {
            name: name.clone(),
            grade: grade.clone(),
            area: area.clone(),
            notes: notes.clone(),
            photo_url: photo.clone(),
        };
        let updated = EditLogic::problem(&mut pool, &notifier, &problem.id, patch)?;

        audit(
            &pool.conn,
            "edit",
            &updated.id,
            &format!("Edited problem '{}' ({})", updated.name, updated.grade),
        );
        success(format!(
            "Problem '{}' ({}) updated.",
            updated.name, updated.grade
        ));
    }
    Ok(())
}
