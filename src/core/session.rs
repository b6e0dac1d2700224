//! Logging a session: persist it, then award XP and achievements.

use crate::core::achievements::{self, Achievement, AchievementContext};
use crate::core::completion::mark_session_sends;
use crate::core::notify::{ChangeEvent, Notifier};
use crate::core::progression::{Level, XpAward, level_for, personal_best, session_xp};
use crate::db::repo::{
    commit_achievements, load_problems, load_sessions, load_state, save_session, set_xp,
};
use crate::db::store::Store;
use crate::errors::AppResult;
use crate::models::{Problem, Session, SessionFields};
use chrono::{DateTime, Utc};

/// XP and achievement changes produced by one session.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionOutcome {
    pub award: XpAward,
    pub xp_before: u64,
    pub xp_after_session: u64,
    pub unlocked: Vec<&'static Achievement>,
    pub achievement_xp: u64,
    pub xp_after: u64,
    pub level_before: &'static Level,
    pub level_after: &'static Level,
}

impl ProgressionOutcome {
    pub fn leveled_up(&self) -> bool {
        self.level_after.level > self.level_before.level
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub session: Session,
    /// Problems whose `completedDate` was stamped by this session.
    pub completed: Vec<String>,
    /// `None` when the progression stage failed.
    pub progression: Option<ProgressionOutcome>,
    pub secondary_error: Option<String>,
    pub events: Vec<ChangeEvent>,
}

pub struct SessionLogic;

impl SessionLogic {
    pub fn log(
        store: &mut dyn Store,
        notifier: &Notifier,
        fields: SessionFields,
    ) -> AppResult<SessionOutcome> {
        Self::log_at(store, notifier, fields, Utc::now())
    }

    /// A store error in the first stage aborts with nothing applied. Errors in
    /// the progression stage are reported on the outcome and the session stays.
    pub fn log_at(
        store: &mut dyn Store,
        notifier: &Notifier,
        fields: SessionFields,
        now: DateTime<Utc>,
    ) -> AppResult<SessionOutcome> {
        let mut events = Vec::new();
        let mut publish = |e: ChangeEvent| {
            notifier.emit(e);
            events.push(e);
        };

        // ------------------------------------------------
        // 1️⃣ PRIMARY: persist session and completion dates
        // ------------------------------------------------
        let problems_before = load_problems(store)?;
        let past_sessions = load_sessions(store)?;
        let prior_pb = personal_best(&problems_before);

        let session = Session::new_at(fields, now);
        save_session(store, &session)?;
        publish(ChangeEvent::SessionsUpdated);

        let completed = mark_session_sends(store, &session)?;
        if !completed.is_empty() {
            publish(ChangeEvent::ProblemsUpdated);
        }

        tracing::info!(
            session = %session.id,
            attempts = session.attempts.len(),
            sends = session.send_count(),
            "session saved"
        );

        // ------------------------------------------------
        // 2️⃣ SECONDARY: XP and achievements
        // ------------------------------------------------
        let (progression, secondary_error) = match apply_progression(
            store,
            &session,
            &problems_before,
            &past_sessions,
            prior_pb,
            &mut publish,
        ) {
            Ok(p) => (Some(p), None),
            Err(e) => {
                tracing::warn!(session = %session.id, error = %e, "progression update failed");
                (None, Some(e.to_string()))
            }
        };

        Ok(SessionOutcome {
            session,
            completed,
            progression,
            secondary_error,
            events,
        })
    }
}

fn apply_progression(
    store: &mut dyn Store,
    session: &Session,
    problems_before: &[Problem],
    past_sessions: &[Session],
    prior_pb: u32,
    publish: &mut dyn FnMut(ChangeEvent),
) -> AppResult<ProgressionOutcome> {
    let state = load_state(store)?;

    let award = session_xp(session, problems_before, prior_pb);
    let xp_after_session = state.xp + award.total();
    set_xp(store, xp_after_session)?;
    publish(ChangeEvent::SettingsUpdated);

    let problems_now = load_problems(store)?;
    let ctx = AchievementContext {
        session,
        problems: &problems_now,
        past_sessions,
        prior_pb,
        current_xp: xp_after_session,
    };
    let granted = achievements::grant(&achievements::evaluate(&ctx), &state.achievements_unlocked);

    let mut xp_after = xp_after_session;
    if !granted.unlocked.is_empty() {
        let mut unlocked = state.achievements_unlocked.clone();
        unlocked.extend(granted.unlocked.iter().map(|a| a.id.to_string()));
        xp_after += granted.xp;
        commit_achievements(store, &unlocked, xp_after)?;
        publish(ChangeEvent::AchievementsUpdated);

        tracing::info!(
            count = granted.unlocked.len(),
            xp = granted.xp,
            "achievements unlocked"
        );
    }

    Ok(ProgressionOutcome {
        award,
        xp_before: state.xp,
        xp_after_session,
        unlocked: granted.unlocked,
        achievement_xp: granted.xp,
        xp_after,
        level_before: level_for(state.xp),
        level_after: level_for(xp_after),
    })
}
