//! XP awards and the level ladder.

use crate::models::{Problem, Session};
use std::collections::HashMap;

pub const BASE_SESSION_XP: u64 = 10;
pub const ATTEMPT_XP: u64 = 5;
pub const SEND_XP: u64 = 15;
pub const PERSONAL_BEST_XP: u64 = 100;

#[derive(Debug, PartialEq, Eq)]
pub struct Level {
    pub level: u8,
    pub name: &'static str,
    pub emoji: &'static str,
    pub min_xp: u64,
    /// `None` for the open-ended top level.
    pub max_xp: Option<u64>,
    pub description: &'static str,
}

impl Level {
    pub fn contains(&self, xp: u64) -> bool {
        xp >= self.min_xp && self.max_xp.is_none_or(|max| xp <= max)
    }

    /// Progress through this level in percent; the top level is always full.
    pub fn progress_percent(&self, xp: u64) -> u8 {
        let Some(max) = self.max_xp else {
            return 100;
        };
        let span = max - self.min_xp;
        if span == 0 {
            return 100;
        }
        let done = xp.saturating_sub(self.min_xp).min(span);
        ((done * 100 + span / 2) / span) as u8
    }

    pub fn next(&self) -> Option<&'static Level> {
        LEVELS.get(self.level as usize)
    }
}

pub static LEVELS: [Level; 10] = [
    Level {
        level: 1,
        name: "Base Camper",
        emoji: "🏕️",
        min_xp: 0,
        max_xp: Some(99),
        description: "Setting out on your journey — every climb starts with the first move.",
    },
    Level {
        level: 2,
        name: "Trail Scout",
        emoji: "🥾",
        min_xp: 100,
        max_xp: Some(249),
        description: "Learning the ropes, finding your rhythm, and chasing that next hold.",
    },
    Level {
        level: 3,
        name: "Rock Hopper",
        emoji: "🪨",
        min_xp: 250,
        max_xp: Some(499),
        description: "Confidence is growing — movement feels smoother and flow begins to form.",
    },
    Level {
        level: 4,
        name: "Cliff Climber",
        emoji: "🧗",
        min_xp: 500,
        max_xp: Some(799),
        description: "You're pushing limits and discovering what you're really capable of.",
    },
    Level {
        level: 5,
        name: "Summit Seeker",
        emoji: "🏔️",
        min_xp: 800,
        max_xp: Some(1199),
        description: "You're chasing goals, refining beta, and starting to own the wall.",
    },
    Level {
        level: 6,
        name: "Crux Crusher",
        emoji: "💥",
        min_xp: 1200,
        max_xp: Some(1699),
        description: "Tough problems don't scare you — you attack the crux with purpose.",
    },
    Level {
        level: 7,
        name: "Route Ranger",
        emoji: "🧭",
        min_xp: 1700,
        max_xp: Some(2299),
        description: "You read routes like a map — efficient, precise, and deliberate.",
    },
    Level {
        level: 8,
        name: "Beta Master",
        emoji: "📜",
        min_xp: 2300,
        max_xp: Some(2999),
        description: "Your climbing knowledge shines — you see sequences others miss.",
    },
    Level {
        level: 9,
        name: "Peak Prodigy",
        emoji: "⛰️",
        min_xp: 3000,
        max_xp: Some(3999),
        description: "Everything clicks — balance, strength, and focus merge into flow.",
    },
    Level {
        level: 10,
        name: "Legend of the Wall",
        emoji: "🐉",
        min_xp: 4000,
        max_xp: None,
        description: "You move with mastery — every climb tells a story of skill and grit.",
    },
];

pub fn level_for(xp: u64) -> &'static Level {
    LEVELS.iter().find(|l| l.contains(xp)).unwrap_or(&LEVELS[0])
}

/// Highest grade number among completed problems, across grading systems.
pub fn personal_best(problems: &[Problem]) -> u32 {
    problems
        .iter()
        .filter(|p| p.is_completed())
        .map(Problem::grade_number)
        .max()
        .unwrap_or(0)
}

/// Breakdown of the XP earned by one session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XpAward {
    pub base: u64,
    pub attempt_xp: u64,
    pub send_xp: u64,
    pub personal_best_xp: u64,
    /// Grade numbers that set a new personal best, in session order.
    pub new_personal_bests: Vec<u32>,
}

impl XpAward {
    pub fn total(&self) -> u64 {
        self.base + self.attempt_xp + self.send_xp + self.personal_best_xp
    }
}

/// XP for a session given the personal best before it.
///
/// The bar rises within the session: a later send is compared against any
/// personal best set earlier in the same session.
pub fn session_xp(session: &Session, problems: &[Problem], prior_pb: u32) -> XpAward {
    let grades: HashMap<&str, u32> = problems
        .iter()
        .map(|p| (p.id.as_str(), p.grade_number()))
        .collect();

    let mut award = XpAward {
        base: BASE_SESSION_XP,
        ..XpAward::default()
    };
    let mut working_pb = prior_pb;

    for attempt in &session.attempts {
        if !attempt.is_send() {
            award.attempt_xp += ATTEMPT_XP;
            continue;
        }

        let gn = grades.get(attempt.problem_id.as_str()).copied().unwrap_or(0);
        if gn > working_pb {
            award.personal_best_xp += PERSONAL_BEST_XP;
            award.new_personal_bests.push(gn);
            working_pb = gn;
        } else {
            award.send_xp += SEND_XP;
        }
    }

    award
}
