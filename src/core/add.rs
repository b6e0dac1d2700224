use crate::core::notify::{ChangeEvent, Notifier};
use crate::db::repo::save_problem;
use crate::db::store::Store;
use crate::errors::{AppError, AppResult};
use crate::models::{Problem, ProblemFields};

/// High-level business logic for the `add` command.
pub struct AddLogic;

impl AddLogic {
    pub fn problem(
        store: &mut dyn Store,
        notifier: &Notifier,
        fields: ProblemFields,
    ) -> AppResult<Problem> {
        if fields.name.trim().is_empty() {
            return Err(AppError::Other("Problem name cannot be empty.".into()));
        }

        let problem = Problem::new(ProblemFields {
            name: fields.name.trim().to_string(),
            ..fields
        });
        save_problem(store, &problem)?;
        notifier.emit(ChangeEvent::ProblemsUpdated);

        tracing::info!(problem = %problem.id, grade = %problem.grade, "problem added");
        Ok(problem)
    }
}
