//! Domain records: problems, sessions with their embedded attempts, and the
//! settings bag.

pub mod attempt;
pub mod grade;
pub mod problem;
pub mod session;
pub mod settings;

pub use attempt::{Attempt, AttemptResult};
pub use grade::{GradePrefix, grade_number, parse_grade_number};
pub use problem::{Problem, ProblemFields};
pub use session::{Session, SessionFields};
pub use settings::{AppState, DraftSession, Theme};

use uuid::Uuid;

/// Collision-resistant record id, e.g. `problem_4f1c…`.
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}
