use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::add::AddLogic;
use crate::db::log::audit;
use crate::errors::AppResult;
use crate::models::ProblemFields;
use crate::ui::messages::success;

use super::{notifier, open_db};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        name,
        grade,
        area,
        notes,
        photo,
    } = cmd
    {
        let mut pool = open_db(cfg)?;
        let notifier = notifier();

        let problem = AddLogic::problem(
            &mut pool,
            &notifier,
            ProblemFields {
                name: name.clone(),
                grade: grade.clone(),
                area: area.clone(),
                notes: notes.clone(),
                photo_url: photo.clone(),
            },
        )?;

        audit(
            &pool.conn,
            "add",
            &problem.id,
            &format!("Added problem '{}' ({})", problem.name, problem.grade),
        );

        success(format!(
            "Problem '{}' ({}) added with id {}",
            problem.name, problem.grade, problem.id
        ));
    }
    Ok(())
}
