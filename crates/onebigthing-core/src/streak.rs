//! Within-week streak engine.
//!
//! The engine keeps a 7-slot completion vector (Monday=0 .. Sunday=6) for the
//! current calendar week and derives the streak from it by walking backward
//! from today. The streak never reaches into the previous week.
//!
//! The engine remembers the week it last computed for. When a call arrives
//! in a later week the vector and streak are wiped before anything else
//! happens, so a full week of completions does not leak into the next one.
//!
//! ```ignore
//! let mut engine = StreakEngine::new();
//! let snapshot = engine.compute(&history, today);
//! // after the user ticks today's task:
//! let snapshot = engine.update_weekly_completion(today);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::DailyTask;
use crate::week::{weekday_index, WeekBounds, DAYS_PER_WEEK};

/// Result of a streak computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSnapshot {
    pub streak: u32,
    pub weekly_completion: [u8; DAYS_PER_WEEK],
    pub week_start: NaiveDate,
}

/// Count contiguous completed slots ending at `today_index`.
///
/// Returns 0 when today's own slot is not completed.
pub fn backward_streak(weekly: &[u8; DAYS_PER_WEEK], today_index: usize) -> u32 {
    let today_index = today_index.min(DAYS_PER_WEEK - 1);
    weekly[..=today_index]
        .iter()
        .rev()
        .take_while(|&&slot| slot != 0)
        .count() as u32
}

#[derive(Debug, Clone, Default)]
pub struct StreakEngine {
    week_start: Option<NaiveDate>,
    weekly: [u8; DAYS_PER_WEEK],
    streak: u32,
}

impl StreakEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Week start the engine last computed for, if any.
    pub fn week_start(&self) -> Option<NaiveDate> {
        self.week_start
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn weekly_completion(&self) -> [u8; DAYS_PER_WEEK] {
        self.weekly
    }

    /// Recompute from history.
    ///
    /// Entries inside the current week overwrite their weekday slot with
    /// their completion state, in the order given. Pass deduplicated
    /// history; with duplicates the last one processed wins.
    pub fn compute(&mut self, history: &[DailyTask], today: NaiveDate) -> StreakSnapshot {
        let week = self.roll_to(today);

        for task in history {
            let day = task.day();
            if week.contains(day) {
                self.weekly[weekday_index(day)] = u8::from(task.completed);
            }
        }

        self.recompute_streak(today)
    }

    /// Force `day`'s slot to completed without a history reload.
    ///
    /// Days outside the current week are ignored apart from rollover.
    pub fn update_weekly_completion(&mut self, day: NaiveDate) -> StreakSnapshot {
        let week = self.roll_to(day);
        if week.contains(day) {
            self.weekly[weekday_index(day)] = 1;
        }
        self.recompute_streak(day)
    }

    /// Forget the remembered week and every slot.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Adopt the week containing `today`, wiping state if it is a new week.
    fn roll_to(&mut self, today: NaiveDate) -> WeekBounds {
        let week = WeekBounds::containing(today);
        match self.week_start {
            Some(previous) if previous != week.start => {
                tracing::info!(%previous, current = %week.start, "week rolled over; streak reset");
                self.weekly = [0; DAYS_PER_WEEK];
                self.streak = 0;
                self.week_start = Some(week.start);
            }
            Some(_) => {}
            None => self.week_start = Some(week.start),
        }
        week
    }

    fn recompute_streak(&mut self, today: NaiveDate) -> StreakSnapshot {
        self.streak = backward_streak(&self.weekly, weekday_index(today));
        self.snapshot(today)
    }

    fn snapshot(&self, today: NaiveDate) -> StreakSnapshot {
        StreakSnapshot {
            streak: self.streak,
            weekly_completion: self.weekly,
            week_start: self
                .week_start
                .unwrap_or_else(|| WeekBounds::containing(today).start),
        }
    }
}
