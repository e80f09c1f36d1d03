use chrono::NaiveDateTime;
use log::{debug, warn};
use rand::Rng;

use crate::models::{Task, TaskStatus};

pub const XP_PER_COMPLETED: u32 = 20;
pub const XP_PER_IN_PROGRESS: u32 = 5;

/// XP needed to clear level 1; each later level costs `LEVEL_STEP_XP` more.
pub const BASE_LEVEL_XP: u32 = 50;
pub const LEVEL_STEP_XP: u32 = 25;

pub const QUOTES: [&str; 7] = [
    "Discipline equals freedom. – Jocko Willink",
    "Push yourself, because no one else is going to do it for you.",
    "Success doesn’t just find you. You have to go out and get it.",
    "Great things never come from comfort zones.",
    "The harder you work for something, the greater you’ll feel when you achieve it.",
    "Don’t watch the clock; do what it does. Keep going.",
    "Dream it. Wish it. Do it.",
];

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Number of tasks per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub total: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub in_progress: usize,
}

impl StatusCounts {
    pub fn of(tasks: &[Task]) -> Self {
        let mut counts = StatusCounts {
            total: tasks.len(),
            ..Default::default()
        };
        for t in tasks {
            match t.status {
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Cancelled => counts.cancelled += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
            }
        }
        counts
    }

    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Completed => self.completed,
            TaskStatus::Cancelled => self.cancelled,
            TaskStatus::InProgress => self.in_progress,
        }
    }
}

/// Profile summary derived from one snapshot of the task collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub counts: StatusCounts,
    pub xp: u32,
    pub level: u32,
    /// XP earned inside the current level.
    pub xp_current: u32,
    /// XP the current level costs in total.
    pub xp_required: u32,
    /// Index 6 is today, index 0 is six days ago.
    pub weekly: [u32; 7],
    pub badge_unlocked: bool,
    pub master_achiever: bool,
    pub quote: &'static str,
}

impl Statistics {
    /// Progress bar fraction within the current level.
    pub fn progress(&self) -> f64 {
        f64::from(self.xp_current) / f64::from(self.xp_required)
    }
}

/// XP cost of going from level `level - 1` to `level`.
pub fn xp_for_level(level: u32) -> u32 {
    BASE_LEVEL_XP + level.saturating_sub(1) * LEVEL_STEP_XP
}

/// Cumulative XP needed to clear levels `1..=level`. Zero for level 0.
pub fn total_xp_for_level(level: u32) -> u32 {
    (1..=level).map(xp_for_level).sum()
}

pub fn experience(counts: &StatusCounts) -> u32 {
    counts.completed as u32 * XP_PER_COMPLETED + counts.in_progress as u32 * XP_PER_IN_PROGRESS
}

/// Current level for `xp`. Starts at 1 and climbs past every cleared threshold.
pub fn level_for(xp: u32) -> u32 {
    let mut level = 1;
    while xp >= total_xp_for_level(level) {
        level += 1;
    }
    level
}

/// Buckets tasks dated within the trailing seven days relative to `now`.
///
/// Future-dated, older and unreadable tasks are skipped.
pub fn weekly_activity(tasks: &[Task], now: NaiveDateTime) -> [u32; 7] {
    let mut weekly = [0u32; 7];
    for t in tasks {
        let Some(due) = t.due() else {
            warn!("stats::weekly_activity: invalid task date '{}' id={}", t.date, t.id);
            continue;
        };
        let diff = (now - due).num_milliseconds() as f64 / MS_PER_DAY;
        if !(0.0..7.0).contains(&diff) {
            debug!("stats::weekly_activity: outside window days={:.2} id={}", diff, t.id);
            continue;
        }
        weekly[6 - diff.floor() as usize] += 1;
    }
    weekly
}

pub fn pick_quote<R: Rng>(rng: &mut R) -> &'static str {
    QUOTES[rng.random_range(0..QUOTES.len())]
}

/// Computes the full summary. Nothing is cached between calls.
pub fn compute<R: Rng>(tasks: &[Task], now: NaiveDateTime, rng: &mut R) -> Statistics {
    let counts = StatusCounts::of(tasks);
    let xp = experience(&counts);
    let level = level_for(xp);
    Statistics {
        counts,
        xp,
        level,
        xp_current: xp - total_xp_for_level(level - 1),
        xp_required: xp_for_level(level),
        weekly: weekly_activity(tasks, now),
        badge_unlocked: level >= 2 || counts.completed >= 5,
        master_achiever: level >= 5,
        quote: pick_quote(rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_costs() {
        assert_eq!(xp_for_level(1), 50);
        assert_eq!(xp_for_level(2), 75);
        assert_eq!(xp_for_level(3), 100);
        assert_eq!(total_xp_for_level(0), 0);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(49), 1);
        assert_eq!(level_for(50), 2);
        assert_eq!(level_for(124), 2);
        assert_eq!(level_for(125), 3);
    }
}
