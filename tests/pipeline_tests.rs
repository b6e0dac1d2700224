use cruxlog::core::achievements::find_achievement;
use cruxlog::core::del::{AttemptRemoval, DeleteLogic};
use cruxlog::core::draft::DraftLogic;
use cruxlog::core::edit::{EditLogic, ProblemPatch};
use cruxlog::core::notify::{ChangeEvent, Notifier};
use cruxlog::core::session::SessionLogic;
use cruxlog::db::repo::{load_problems, load_sessions, load_state, save_problem};
use cruxlog::db::store::{Collection, MemoryStore, Store};
use cruxlog::errors::{AppError, AppResult};
use cruxlog::models::{AttemptResult, Problem, SessionFields};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;

mod common;
use common::{day, miss, problem, send};

/// Store wrapper that fails chosen operations.
struct FlakyStore {
    inner: MemoryStore,
    fail_session_save: bool,
    fail_setting: Option<&'static str>,
    /// Fail the n-th write (1-based) that touches `xp`.
    fail_xp_write: Option<usize>,
    xp_writes: usize,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_session_save: false,
            fail_setting: None,
            fail_xp_write: None,
            xp_writes: 0,
        }
    }
}

impl FlakyStore {
    fn check_setting(&mut self, name: &str) -> AppResult<()> {
        if self.fail_setting == Some(name) {
            return Err(AppError::Other("settings unavailable".into()));
        }
        if name == "xp" {
            self.xp_writes += 1;
            if self.fail_xp_write == Some(self.xp_writes) {
                return Err(AppError::Other("transient".into()));
            }
        }
        Ok(())
    }
}

impl Store for FlakyStore {
    fn get_all(&self, c: Collection) -> AppResult<Vec<Value>> {
        self.inner.get_all(c)
    }
    fn save(&mut self, c: Collection, r: Value) -> AppResult<Value> {
        if self.fail_session_save && c == Collection::Sessions {
            return Err(AppError::Other("disk full".into()));
        }
        self.inner.save(c, r)
    }
    fn put(&mut self, c: Collection, id: &str, patch: Value) -> AppResult<Option<Value>> {
        self.inner.put(c, id, patch)
    }
    fn remove(&mut self, c: Collection, id: &str) -> AppResult<()> {
        self.inner.remove(c, id)
    }
    fn clear_collection(&mut self, c: Collection) -> AppResult<()> {
        self.inner.clear_collection(c)
    }
    fn clear_all(&mut self) -> AppResult<()> {
        self.inner.clear_all()
    }
    fn setting(&self, name: &str) -> AppResult<Option<Value>> {
        self.inner.setting(name)
    }
    fn set_setting(&mut self, name: &str, value: Value) -> AppResult<()> {
        self.check_setting(name)?;
        self.inner.set_setting(name, value)
    }
    fn set_settings(&mut self, entries: &[(&str, Value)]) -> AppResult<()> {
        for (name, _) in entries {
            self.check_setting(name)?;
        }
        self.inner.set_settings(entries)
    }
    fn get_all_settings(&self) -> AppResult<Map<String, Value>> {
        self.inner.get_all_settings()
    }
}

fn seeded(store: &mut dyn Store, grade: &str) -> Problem {
    let p = problem("seed", grade, day(2025, 6, 1));
    save_problem(store, &p).expect("save problem");
    p
}

fn fields(date_day: u32, attempts: Vec<cruxlog::models::Attempt>) -> SessionFields {
    SessionFields {
        date: Some(day(2025, 6, date_day)),
        attempts,
        ..SessionFields::default()
    }
}

#[test]
fn first_session_awards_xp_achievements_and_level_up() {
    let mut store = MemoryStore::new();
    let notifier = Notifier::new();
    let c3 = seeded(&mut store, "C3");

    let out = SessionLogic::log(&mut store, &notifier, fields(2, vec![send(&c3)])).expect("log");
    let prog = out.progression.expect("progression applied");

    assert_eq!(prog.award.total(), 110);
    assert_eq!(prog.achievement_xp, 200);
    assert_eq!(prog.xp_after, 310);
    assert!(prog.leveled_up());
    assert_eq!(prog.level_after.level, 3);
    assert!(out.secondary_error.is_none());
    assert_eq!(out.completed, vec![c3.id.clone()]);

    let state = load_state(&store).expect("state");
    assert_eq!(state.xp, 310);
    assert!(state.achievements_unlocked.contains("first-grip"));

    let problems = load_problems(&store).expect("problems");
    assert_eq!(problems[0].completed_date, Some(day(2025, 6, 2)));
}

#[test]
fn completed_date_is_not_overwritten() {
    let mut store = MemoryStore::new();
    let notifier = Notifier::new();
    let p = seeded(&mut store, "C2");

    SessionLogic::log(&mut store, &notifier, fields(2, vec![send(&p)])).expect("first");
    let out = SessionLogic::log(&mut store, &notifier, fields(5, vec![send(&p)])).expect("second");

    assert!(out.completed.is_empty());
    let problems = load_problems(&store).expect("problems");
    assert_eq!(problems[0].completed_date, Some(day(2025, 6, 2)));
}

#[test]
fn xp_never_decreases_across_sessions() {
    let mut store = MemoryStore::new();
    let notifier = Notifier::new();
    let p = seeded(&mut store, "C4");

    let mut last = 0;
    for (d, a) in [(2, miss(&p)), (3, send(&p)), (4, miss(&p)), (9, send(&p))] {
        SessionLogic::log(&mut store, &notifier, fields(d, vec![a])).expect("log");
        let xp = load_state(&store).expect("state").xp;
        assert!(xp >= last);
        last = xp;
    }
}

#[test]
fn primary_failure_applies_nothing() {
    let mut store = FlakyStore::new();
    store.fail_session_save = true;
    let notifier = Notifier::new();
    let p = seeded(&mut store, "C3");

    let res = SessionLogic::log(&mut store, &notifier, fields(2, vec![send(&p)]));
    assert!(res.is_err());

    assert!(load_sessions(&store).expect("sessions").is_empty());
    assert_eq!(load_state(&store).expect("state").xp, 0);
    assert!(load_problems(&store).expect("problems")[0].completed_date.is_none());
}

#[test]
fn secondary_failure_keeps_the_session() {
    let mut store = FlakyStore::new();
    store.fail_setting = Some("xp");
    let notifier = Notifier::new();
    let p = seeded(&mut store, "C3");

    let out = SessionLogic::log(&mut store, &notifier, fields(2, vec![send(&p)])).expect("log");
    assert!(out.progression.is_none());
    assert!(out.secondary_error.is_some());

    assert_eq!(load_sessions(&store).expect("sessions").len(), 1);
    assert_eq!(load_state(&store).expect("state").xp, 0);
}

#[test]
fn failed_achievement_write_leaves_nothing_half_applied() {
    let mut store = FlakyStore::new();
    store.fail_xp_write = Some(2);
    let notifier = Notifier::new();
    let c3 = seeded(&mut store, "C3");

    let out = SessionLogic::log(&mut store, &notifier, fields(2, vec![send(&c3)])).expect("log");
    assert!(out.progression.is_none());
    assert!(out.secondary_error.is_some());

    // session XP landed, the unlock batch did not
    let state = load_state(&store).expect("state");
    assert_eq!(state.xp, 110);
    assert!(state.achievements_unlocked.is_empty());

    // the next qualifying session can still grant the reward
    let out = SessionLogic::log(&mut store, &notifier, fields(3, vec![send(&c3)])).expect("log");
    let prog = out.progression.expect("progression applied");
    assert!(prog.unlocked.iter().any(|a| a.id == "the-finisher"));

    let state = load_state(&store).expect("state");
    let rewards: u64 = state
        .achievements_unlocked
        .iter()
        .filter_map(|id| find_achievement(id))
        .map(|a| a.xp_reward)
        .sum();
    assert_eq!(state.xp, 110 + 25 + rewards);
}

#[test]
fn subscribers_receive_change_events() {
    let mut store = MemoryStore::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut notifier = Notifier::new();
    let sink = Rc::clone(&seen);
    notifier.subscribe(move |e| sink.borrow_mut().push(e));

    let p = seeded(&mut store, "C3");
    let out = SessionLogic::log(&mut store, &notifier, fields(2, vec![send(&p)])).expect("log");

    let seen = seen.borrow();
    assert_eq!(*seen, out.events);
    assert!(seen.contains(&ChangeEvent::SessionsUpdated));
    assert!(seen.contains(&ChangeEvent::ProblemsUpdated));
    assert!(seen.contains(&ChangeEvent::AchievementsUpdated));
    assert_eq!(ChangeEvent::SessionsUpdated.name(), "cruxlog:sessions:updated");
}

#[test]
fn toggle_updates_completion_but_not_xp() {
    let mut store = MemoryStore::new();
    let notifier = Notifier::new();
    let p = seeded(&mut store, "C3");

    let out = SessionLogic::log(&mut store, &notifier, fields(2, vec![send(&p)])).expect("log");
    let xp = load_state(&store).expect("state").xp;
    let attempt_id = out.session.attempts[0].id.clone();

    let t = EditLogic::toggle_attempt(&mut store, &notifier, &out.session.id, &attempt_id)
        .expect("toggle");
    assert_eq!(t.result, AttemptResult::Attempt);
    assert!(load_problems(&store).expect("problems")[0].completed_date.is_none());

    EditLogic::toggle_attempt(&mut store, &notifier, &out.session.id, &attempt_id).expect("toggle");
    assert_eq!(
        load_problems(&store).expect("problems")[0].completed_date,
        Some(day(2025, 6, 2))
    );
    assert_eq!(load_state(&store).expect("state").xp, xp);
}

#[test]
fn completion_survives_while_another_send_exists() {
    let mut store = MemoryStore::new();
    let notifier = Notifier::new();
    let p = seeded(&mut store, "C3");

    let first = SessionLogic::log(&mut store, &notifier, fields(2, vec![send(&p)])).expect("log");
    SessionLogic::log(&mut store, &notifier, fields(3, vec![send(&p)])).expect("log");

    DeleteLogic::session(&mut store, &notifier, &first.session.id).expect("delete");
    assert!(load_problems(&store).expect("problems")[0].completed_date.is_some());
}

#[test]
fn removing_last_attempt_deletes_session() {
    let mut store = MemoryStore::new();
    let notifier = Notifier::new();
    let p = seeded(&mut store, "C3");

    let out = SessionLogic::log(&mut store, &notifier, fields(2, vec![miss(&p), send(&p)]))
        .expect("log");
    let ids: Vec<String> = out.session.attempts.iter().map(|a| a.id.clone()).collect();

    let r = DeleteLogic::attempt(&mut store, &notifier, &out.session.id, &ids[1]).expect("remove");
    assert!(matches!(r, AttemptRemoval::Kept(ref s) if s.attempts.len() == 1));
    assert!(load_problems(&store).expect("problems")[0].completed_date.is_none());

    let r = DeleteLogic::attempt(&mut store, &notifier, &out.session.id, &ids[0]).expect("remove");
    assert_eq!(r, AttemptRemoval::SessionDeleted(out.session.id.clone()));
    assert!(load_sessions(&store).expect("sessions").is_empty());

    let missing = DeleteLogic::attempt(&mut store, &notifier, &out.session.id, &ids[0]);
    assert!(matches!(missing, Err(AppError::SessionNotFound(_))));
}

#[test]
fn edit_problem_bumps_updated_at() {
    let mut store = MemoryStore::new();
    let notifier = Notifier::new();
    let p = seeded(&mut store, "C3");

    let updated = EditLogic::problem(
        &mut store,
        &notifier,
        &p.id,
        ProblemPatch {
            grade: Some("C5".into()),
            photo_url: Some(String::new()),
            ..ProblemPatch::default()
        },
    )
    .expect("edit");
    assert_eq!(updated.grade, "C5");
    assert_eq!(updated.photo_url, None);
    assert!(updated.updated_at > p.updated_at);
    assert_eq!(updated.created_at, p.created_at);

    let blank = EditLogic::problem(
        &mut store,
        &notifier,
        &p.id,
        ProblemPatch {
            grade: Some("  ".into()),
            ..ProblemPatch::default()
        },
    )
    .expect("edit");
    assert_eq!(blank.grade, "C1");

    let none = EditLogic::problem(&mut store, &notifier, "problem_nope", ProblemPatch {
        name: Some("x".into()),
        ..ProblemPatch::default()
    });
    assert!(matches!(none, Err(AppError::ProblemNotFound(_))));
}

#[test]
fn draft_round_trip_into_session() {
    let mut store = MemoryStore::new();
    let notifier = Notifier::new();
    let p = seeded(&mut store, "C3");

    DraftLogic::add_attempt(&mut store, &notifier, &p.id, AttemptResult::Attempt, None)
        .expect("draft");
    let draft = DraftLogic::add_attempt(&mut store, &notifier, &p.id, AttemptResult::Send, None)
        .expect("draft");
    assert_eq!(draft.attempts.len(), 2);

    let stored = DraftLogic::current(&store).expect("current").expect("draft present");
    let out = SessionLogic::log(&mut store, &notifier, DraftLogic::to_fields(&stored)).expect("log");
    assert_eq!(out.session.send_count(), 1);

    assert!(DraftLogic::discard(&mut store, &notifier).expect("discard"));
    assert!(DraftLogic::current(&store).expect("current").is_none());
    assert!(!DraftLogic::discard(&mut store, &notifier).expect("discard"));
}

#[test]
fn reset_clears_xp() {
    let mut store = MemoryStore::new();
    let notifier = Notifier::new();
    let p = seeded(&mut store, "C3");
    SessionLogic::log(&mut store, &notifier, fields(2, vec![send(&p)])).expect("log");

    DeleteLogic::reset_all(&mut store, &notifier).expect("reset");
    let state = load_state(&store).expect("state");
    assert_eq!(state.xp, 0);
    assert!(state.achievements_unlocked.is_empty());
    assert!(load_problems(&store).expect("problems").is_empty());
}
