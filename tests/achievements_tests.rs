use chrono::Duration;
use cruxlog::core::achievements::{
    ACHIEVEMENTS, AchievementContext, evaluate, evaluate_temporal_achievements, find_achievement,
    grant,
};
use cruxlog::models::{Problem, Session};
use std::collections::BTreeSet;

mod common;
use common::{day, miss, problem, send, session_on};

fn ctx<'a>(
    session: &'a Session,
    problems: &'a [Problem],
    past: &'a [Session],
    prior_pb: u32,
    xp: u64,
) -> AchievementContext<'a> {
    AchievementContext {
        session,
        problems,
        past_sessions: past,
        prior_pb,
        current_xp: xp,
    }
}

#[test]
fn catalog_has_unique_ids() {
    let ids: BTreeSet<&str> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
    assert_eq!(ids.len(), 17);
    assert_eq!(find_achievement("legend-status").map(|a| a.xp_reward), Some(500));
    assert!(find_achievement("nope").is_none());
}

#[test]
fn first_session_unlocks_first_grip_no_fear_and_finisher() {
    let t = day(2025, 6, 2);
    let c3 = problem("three", "C3", t);
    let s = session_on(t, vec![send(&c3)]);
    let problems = vec![c3];

    let got = evaluate(&ctx(&s, &problems, &[], 0, 110));
    let expected: BTreeSet<&str> = ["first-grip", "no-fear", "the-finisher"].into();
    assert_eq!(got, expected);
}

#[test]
fn empty_session_unlocks_nothing() {
    let t = day(2025, 6, 3);
    let past = vec![session_on(day(2025, 6, 1), vec![]), session_on(day(2025, 6, 2), vec![])];
    let s = session_on(t, vec![]);

    assert!(evaluate(&ctx(&s, &[], &past, 0, 9000)).is_empty());
}

#[test]
fn volume_and_flash_rules() {
    let t = day(2025, 6, 2);
    let ps: Vec<Problem> = (1..=5).map(|i| problem(&format!("p{i}"), "C1", t)).collect();
    let mut attempts = vec![miss(&ps[0])];
    attempts.extend(ps.iter().map(send));
    let s = session_on(t, attempts);

    let got = evaluate(&ctx(&s, &ps, &[], 5, 0));
    assert!(got.contains("breaking-sweat"));
    // p1 opened with a miss, p2..p5 were flashed
    assert!(got.contains("smooth-operator"));
    assert!(!got.contains("the-finisher"));
    assert!(!got.contains("first-grip"));
}

#[test]
fn comeback_and_crux_destroyer_use_prior_history() {
    let t = day(2025, 6, 10);
    let hard = problem("hard", "C5", day(2025, 6, 1));
    let past: Vec<Session> = (1..=5)
        .map(|d| session_on(day(2025, 6, d), vec![miss(&hard)]))
        .collect();
    let s = session_on(t, vec![send(&hard)]);
    let problems = vec![hard];

    let got = evaluate(&ctx(&s, &problems, &past, 5, 0));
    assert!(got.contains("comeback-kid"));
    assert!(got.contains("crux-destroyer"));
    // created 9 days before the send
    assert!(got.contains("top-out-titan"));
}

#[test]
fn comeback_needs_no_prior_send() {
    let t = day(2025, 6, 10);
    let p = problem("p", "C2", t);
    let past = vec![session_on(day(2025, 6, 1), vec![miss(&p), send(&p)])];
    let s = session_on(t, vec![send(&p)]);
    let problems = vec![p];

    let got = evaluate(&ctx(&s, &problems, &past, 2, 0));
    assert!(!got.contains("comeback-kid"));
    assert!(!got.contains("crux-destroyer"));
}

#[test]
fn new_territory_compares_trimmed_areas() {
    let t = day(2025, 6, 2);
    let mut p = problem("p", "C2", t);
    p.area = "The Cave ".to_string();
    let problems = vec![p.clone()];

    let mut s = session_on(t, vec![send(&p)]);
    s.location = " The Cave".to_string();
    assert!(!evaluate(&ctx(&s, &problems, &[], 2, 0)).contains("new-territory"));

    s.location = "Boulder Barn".to_string();
    assert!(evaluate(&ctx(&s, &problems, &[], 2, 0)).contains("new-territory"));
}

#[test]
fn xp_thresholds() {
    let t = day(2025, 6, 2);
    let p = problem("p", "C1", t);
    let s = session_on(t, vec![miss(&p)]);
    let problems = vec![p];

    let got = evaluate(&ctx(&s, &problems, &[], 1, 4000));
    assert!(got.contains("legend-status"));
    assert!(!got.contains("trailblazer"));

    let got = evaluate(&ctx(&s, &problems, &[], 1, 5000));
    assert!(got.contains("trailblazer"));
}

#[test]
fn three_day_streak_and_weekend() {
    let p = problem("p", "C1", day(2025, 6, 1));
    let problems = vec![p.clone()];

    // Fri 6th, Sat 7th, Sun 8th of June 2025
    let past = vec![
        session_on(day(2025, 6, 6), vec![miss(&p)]),
        session_on(day(2025, 6, 7), vec![miss(&p)]),
    ];
    let s = session_on(day(2025, 6, 8), vec![miss(&p)]);

    let got = evaluate_temporal_achievements(&ctx(&s, &problems, &past, 1, 0));
    assert!(got.contains("consistency"));
    assert!(got.contains("weekend-warrior"));
    assert!(!got.contains("chalked-up"));
}

#[test]
fn weekend_across_iso_weeks_does_not_count() {
    let p = problem("p", "C1", day(2025, 6, 1));
    let problems = vec![p.clone()];

    // Sun 1st belongs to the week before Sat 7th
    let past = vec![session_on(day(2025, 6, 1), vec![miss(&p)])];
    let s = session_on(day(2025, 6, 7), vec![miss(&p)]);

    let got = evaluate_temporal_achievements(&ctx(&s, &problems, &past, 1, 0));
    assert!(!got.contains("weekend-warrior"));
    assert!(!got.contains("consistency"));
}

#[test]
fn ten_days_in_a_month() {
    let p = problem("p", "C1", day(2025, 6, 1));
    let problems = vec![p.clone()];
    let past: Vec<Session> = (1..=9)
        .map(|d| session_on(day(2025, 6, d * 2), vec![miss(&p)]))
        .collect();
    let s = session_on(day(2025, 6, 25), vec![miss(&p)]);

    let got = evaluate_temporal_achievements(&ctx(&s, &problems, &past, 1, 0));
    assert!(got.contains("chalked-up"));
}

#[test]
fn same_day_sessions_count_once_per_month() {
    let p = problem("p", "C1", day(2025, 6, 1));
    let problems = vec![p.clone()];
    // ten sessions, but only nine distinct days
    let mut past: Vec<Session> = (1..=8)
        .map(|d| session_on(day(2025, 6, d * 2), vec![miss(&p)]))
        .collect();
    past.push(session_on(day(2025, 6, 25), vec![miss(&p)]));
    let s = session_on(day(2025, 6, 25), vec![miss(&p)]);

    let got = evaluate_temporal_achievements(&ctx(&s, &problems, &past, 1, 0));
    assert!(!got.contains("chalked-up"));
}

#[test]
fn hundred_problems_unlock_hundred_grips() {
    let t = day(2025, 6, 2);
    let mut problems: Vec<Problem> = (0..99)
        .map(|i| problem(&format!("p{i}"), "C1", t))
        .collect();
    let s = session_on(t, vec![miss(&problems[0])]);

    let got = evaluate(&ctx(&s, &problems, &[], 1, 0));
    assert!(!got.contains("hundred-grips"));

    problems.push(problem("p99", "C1", t));
    let got = evaluate(&ctx(&s, &problems, &[], 1, 0));
    assert!(got.contains("hundred-grips"));
}

#[test]
fn eight_weeks_in_a_row() {
    let p = problem("p", "C1", day(2025, 1, 1));
    let problems = vec![p.clone()];
    let today = day(2025, 6, 2);
    let past: Vec<Session> = (1..=7)
        .map(|w| session_on(today - Duration::weeks(w), vec![miss(&p)]))
        .collect();
    let s = session_on(today, vec![miss(&p)]);

    let got = evaluate_temporal_achievements(&ctx(&s, &problems, &past, 1, 0));
    assert!(got.contains("never-skipping"));

    // a gap three weeks back breaks the run
    let gapped: Vec<Session> = past
        .iter()
        .filter(|x| x.date != today - Duration::weeks(3))
        .cloned()
        .collect();
    let got = evaluate_temporal_achievements(&ctx(&s, &problems, &gapped, 1, 0));
    assert!(!got.contains("never-skipping"));
}

#[test]
fn year_long_streak() {
    let p = problem("p", "C1", day(2024, 1, 1));
    let problems = vec![p.clone()];
    let today = day(2025, 6, 2);
    let past: Vec<Session> = (1..365)
        .map(|d| session_on(today - Duration::days(d), vec![]))
        .collect();
    let s = session_on(today, vec![miss(&p)]);

    let got = evaluate_temporal_achievements(&ctx(&s, &problems, &past, 1, 0));
    assert!(got.contains("long-haul-hero"));
    assert!(got.contains("consistency"));
}

#[test]
fn re_evaluation_grants_nothing_new() {
    let t = day(2025, 6, 2);
    let c3 = problem("three", "C3", t);
    let s = session_on(t, vec![send(&c3)]);
    let problems = vec![c3];

    let candidates = evaluate(&ctx(&s, &problems, &[], 0, 110));
    let first = grant(&candidates, &BTreeSet::new());
    assert_eq!(first.xp, 25 + 50 + 125);

    let unlocked: BTreeSet<String> = first.unlocked.iter().map(|a| a.id.to_string()).collect();
    let again = grant(&candidates, &unlocked);
    assert!(again.unlocked.is_empty());
    assert_eq!(again.xp, 0);
}

#[test]
fn dangling_references_do_not_break_rules() {
    let t = day(2025, 6, 2);
    let ghost = problem("ghost", "C9", t);
    let s = session_on(t, vec![send(&ghost), miss(&ghost)]);

    let got = evaluate(&ctx(&s, &[], &[], 0, 0));
    assert!(got.contains("first-grip"));
    assert!(!got.contains("no-fear"));
}
