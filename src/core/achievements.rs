//! Achievement catalog and the rules that unlock each entry.
//!
//! Every rule is an independent predicate over the session just saved and the
//! history before it. Time-based rules use session dates (UTC calendar days),
//! never the wall clock, so evaluation can be replayed from history.

use crate::models::{Problem, Session, grade_number};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Milestones,
    Exploration,
    Skill,
    Endurance,
}

impl Category {
    pub fn title(&self) -> &'static str {
        match self {
            Category::Milestones => "🧗 Climbing Milestones",
            Category::Exploration => "🧭 Exploration & Logging",
            Category::Skill => "💪 Skill & Performance",
            Category::Endurance => "🌟 Endurance & Dedication",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub category: Category,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub xp_reward: u64,
}

macro_rules! achievement {
    ($id:literal, $cat:ident, $name:literal, $emoji:literal, $desc:literal, $xp:literal) => {
        Achievement {
            id: $id,
            category: Category::$cat,
            name: $name,
            emoji: $emoji,
            description: $desc,
            xp_reward: $xp,
        }
    };
}

pub static ACHIEVEMENTS: [Achievement; 17] = [
    achievement!("first-grip", Milestones, "First Grip", "✋", "Log your very first send.", 25),
    achievement!("new-territory", Exploration, "New Territory", "🗺️", "Log a session at a new gym or area.", 25),
    achievement!("breaking-sweat", Milestones, "Breaking Sweat", "💦", "Send 5 problems in one session.", 50),
    achievement!("no-fear", Skill, "No Fear", "😎", "Attempt a problem above your personal best.", 50),
    achievement!("smooth-operator", Skill, "Smooth Operator", "🌀", "Flash 3 problems in one session.", 75),
    achievement!("consistency", Milestones, "Consistency is Key", "📆", "Climb 3 days in a row.", 75),
    achievement!("weekend-warrior", Milestones, "Weekend Warrior", "🪓", "Climb on both Saturday and Sunday of the same week.", 75),
    achievement!("comeback-kid", Skill, "Comeback Kid", "🔁", "Send a problem you previously failed on.", 100),
    achievement!("crux-destroyer", Skill, "Crux Destroyer", "💥", "Send a problem after 5+ earlier attempts.", 125),
    achievement!("the-finisher", Skill, "The Finisher", "🧩", "Send every attempt in a session.", 125),
    achievement!("hundred-grips", Milestones, "100 Grips Later", "💯", "Log your 100th problem.", 150),
    achievement!("top-out-titan", Milestones, "Top Out Titan", "🏁", "Send a project you have tracked for over a week.", 175),
    achievement!("chalked-up", Endurance, "Chalked Up", "🧴", "Climb on 10 different days in one calendar month.", 200),
    achievement!("never-skipping", Endurance, "Never Skipping Wall Day", "🧗", "Climb every week for 8 weeks straight.", 250),
    achievement!("long-haul-hero", Endurance, "Long Haul Hero", "🚀", "Keep a 365-day climbing streak.", 350),
    achievement!("trailblazer", Endurance, "Trailblazer", "🪙", "Earn 5000 total XP.", 400),
    achievement!("legend-status", Endurance, "Legend Status", "🐉", "Reach level 10, Legend of the Wall.", 500),
];

const VOLUME_SENDS: usize = 5;
const FLASHES_NEEDED: usize = 3;
const GRINDER_ATTEMPTS: u32 = 5;
const HUNDRED_PROBLEMS: usize = 100;
const PATIENCE_DAYS: i64 = 7;
const STREAK_DAYS: u32 = 3;
const MONTH_DAYS: usize = 10;
const WEEK_STREAK: i64 = 8;
const YEAR_STREAK: u32 = 365;
const TRAILBLAZER_XP: u64 = 5000;
const LEGEND_XP: u64 = 4000;

pub fn find_achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Inputs for one evaluation pass.
#[derive(Debug, Clone, Copy)]
pub struct AchievementContext<'a> {
    pub session: &'a Session,
    /// All problems after completion dates were stamped for this session.
    pub problems: &'a [Problem],
    /// Sessions saved before this one.
    pub past_sessions: &'a [Session],
    pub prior_pb: u32,
    /// XP after the session award was applied.
    pub current_xp: u64,
}

#[derive(Debug, Default, Clone, Copy)]
struct History {
    attempts: u32,
    non_sends: u32,
    sends: u32,
}

/// Rules that only look at the session and its problems.
pub fn evaluate_session_achievements(ctx: &AchievementContext<'_>) -> BTreeSet<&'static str> {
    let mut unlocked = BTreeSet::new();
    let session = ctx.session;
    let attempts = &session.attempts;
    if attempts.is_empty() {
        return unlocked;
    }

    let problems: HashMap<&str, &Problem> =
        ctx.problems.iter().map(|p| (p.id.as_str(), p)).collect();
    let send_count = session.send_count();

    if ctx.prior_pb == 0 && send_count > 0 {
        unlocked.insert("first-grip");
    }

    let location = session.location.trim();
    if !location.is_empty() {
        let known_areas: HashSet<&str> = ctx
            .problems
            .iter()
            .map(|p| p.area.trim())
            .filter(|a| !a.is_empty())
            .collect();
        if !known_areas.contains(location) {
            unlocked.insert("new-territory");
        }
    }

    if send_count >= VOLUME_SENDS {
        unlocked.insert("breaking-sweat");
    }

    let above_pb = attempts.iter().any(|a| {
        let grade = problems
            .get(a.problem_id.as_str())
            .map(|p| p.grade.as_str())
            .unwrap_or("");
        grade_number(grade) > ctx.prior_pb
    });
    if above_pb {
        unlocked.insert("no-fear");
    }

    // first attempt per problem, in session order
    let mut first_results: HashMap<&str, bool> = HashMap::new();
    for a in attempts {
        first_results
            .entry(a.problem_id.as_str())
            .or_insert_with(|| a.is_send());
    }
    if first_results.values().filter(|&&sent| sent).count() >= FLASHES_NEEDED {
        unlocked.insert("smooth-operator");
    }

    if attempts.iter().all(|a| a.is_send()) {
        unlocked.insert("the-finisher");
    }

    let mut history: HashMap<&str, History> = HashMap::new();
    for a in ctx.past_sessions.iter().flat_map(|s| s.attempts.iter()) {
        let h = history.entry(a.problem_id.as_str()).or_default();
        h.attempts += 1;
        if a.is_send() {
            h.sends += 1;
        } else {
            h.non_sends += 1;
        }
    }
    for send in session.sends() {
        let h = history
            .get(send.problem_id.as_str())
            .copied()
            .unwrap_or_default();
        if h.non_sends > 0 && h.sends == 0 {
            unlocked.insert("comeback-kid");
        }
        if h.attempts >= GRINDER_ATTEMPTS {
            unlocked.insert("crux-destroyer");
        }
    }

    if ctx.problems.len() >= HUNDRED_PROBLEMS {
        unlocked.insert("hundred-grips");
    }

    let patient = session.sends().any(|a| {
        problems
            .get(a.problem_id.as_str())
            .is_some_and(|p| session.date - p.created_at > Duration::days(PATIENCE_DAYS))
    });
    if patient {
        unlocked.insert("top-out-titan");
    }

    if ctx.current_xp >= TRAILBLAZER_XP {
        unlocked.insert("trailblazer");
    }
    if ctx.current_xp >= LEGEND_XP {
        unlocked.insert("legend-status");
    }

    unlocked
}

fn consecutive_days_ending_on(day: NaiveDate, days: &HashSet<NaiveDate>) -> u32 {
    let mut count = 0;
    let mut d = day;
    while days.contains(&d) {
        count += 1;
        match d.pred_opt() {
            Some(prev) => d = prev,
            None => break,
        }
    }
    count
}

/// ISO (year, week) key.
fn week_key(day: NaiveDate) -> (i32, u32) {
    let w = day.iso_week();
    (w.year(), w.week())
}

/// Streak and calendar rules over every session date including this one.
pub fn evaluate_temporal_achievements(ctx: &AchievementContext<'_>) -> BTreeSet<&'static str> {
    let mut unlocked = BTreeSet::new();
    if ctx.session.attempts.is_empty() {
        return unlocked;
    }

    let days: HashSet<NaiveDate> = ctx
        .past_sessions
        .iter()
        .chain(std::iter::once(ctx.session))
        .map(Session::day)
        .collect();
    let today = ctx.session.day();
    let streak = consecutive_days_ending_on(today, &days);

    if streak >= STREAK_DAYS {
        unlocked.insert("consistency");
    }

    let mut weeks: HashMap<(i32, u32), HashSet<Weekday>> = HashMap::new();
    let mut months: HashMap<(i32, u32), usize> = HashMap::new();
    for d in &days {
        weeks.entry(week_key(*d)).or_default().insert(d.weekday());
        *months.entry((d.year(), d.month())).or_default() += 1;
    }

    if weeks
        .values()
        .any(|w| w.contains(&Weekday::Sat) && w.contains(&Weekday::Sun))
    {
        unlocked.insert("weekend-warrior");
    }

    if months.values().any(|&n| n >= MONTH_DAYS) {
        unlocked.insert("chalked-up");
    }

    let every_week = (0..WEEK_STREAK).all(|i| {
        today
            .checked_sub_signed(Duration::weeks(i))
            .is_some_and(|d| weeks.contains_key(&week_key(d)))
    });
    if every_week {
        unlocked.insert("never-skipping");
    }

    if streak >= YEAR_STREAK {
        unlocked.insert("long-haul-hero");
    }

    unlocked
}

/// Union of all rules for this pass.
pub fn evaluate(ctx: &AchievementContext<'_>) -> BTreeSet<&'static str> {
    let mut all = evaluate_session_achievements(ctx);
    all.extend(evaluate_temporal_achievements(ctx));
    all
}

/// Achievements that newly unlock and the XP they are worth together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AchievementGrant {
    pub unlocked: Vec<&'static Achievement>,
    pub xp: u64,
}

/// Filter out ids already unlocked; order follows the catalog.
pub fn grant(candidates: &BTreeSet<&'static str>, already: &BTreeSet<String>) -> AchievementGrant {
    let unlocked: Vec<&'static Achievement> = ACHIEVEMENTS
        .iter()
        .filter(|a| candidates.contains(a.id) && !already.contains(a.id))
        .collect();
    let xp = unlocked.iter().map(|a| a.xp_reward).sum();
    AchievementGrant { unlocked, xp }
}
