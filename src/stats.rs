//! Stats & streak engine
//!
//! Every qualifying content-creation event awards XP, bumps the lifetime
//! generation count, and advances or resets the consecutive-day streak.
//! Streak comparison is by UTC calendar date, not elapsed duration.

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use tracing::debug;

use crate::db::{map_user_stats, Database};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::UserStats;
use crate::schema::user_stats;
use crate::validation::InputValidator;

/// XP awarded per generation event
pub const XP_PER_GENERATION: i64 = 2;

/// Updates per-account stats in response to generation events
pub struct StatsEngine<'a> {
    db: &'a Database,
    metrics: MetricsCollector,
}

impl<'a> StatsEngine<'a> {
    /// Create a stats engine backed by the given database
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            metrics: MetricsCollector::default(),
        }
    }

    /// Record one generation event for `account` at the current UTC time.
    ///
    /// Each call represents exactly one generation; callers invoke it once
    /// per qualifying content creation, after the content row is committed.
    pub fn record_generation(&self, account: &str) -> Result<UserStats> {
        self.record_generation_at(account, Utc::now().naive_utc())
    }

    /// Record one generation event at an explicit UTC timestamp.
    ///
    /// The read-modify-write runs in an IMMEDIATE transaction so concurrent
    /// calls for the same account serialize instead of losing updates.
    pub fn record_generation_at(&self, account: &str, now: NaiveDateTime) -> Result<UserStats> {
        InputValidator::validate_account(account)?;

        let mut conn = self.db.get_connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing = tx
            .query_row(
                &format!(
                    "SELECT * FROM {} WHERE {} = ?",
                    user_stats::TABLE,
                    user_stats::USER_ACCOUNT
                ),
                params![account],
                map_user_stats,
            )
            .optional()?;

        let stats = match existing {
            Some(mut stats) => {
                let (streak, reset) = streak_transition(stats.streak_days, stats.last_generation, now);
                stats.xp += XP_PER_GENERATION;
                stats.total_generations += 1;
                stats.streak_days = streak;
                stats.last_generation = Some(now);

                tx.execute(
                    &format!(
                        "UPDATE {} SET {} = ?, {} = ?, {} = ?, {} = ? WHERE {} = ?",
                        user_stats::TABLE,
                        user_stats::XP,
                        user_stats::TOTAL_GENERATIONS,
                        user_stats::STREAK_DAYS,
                        user_stats::LAST_GENERATION,
                        user_stats::ID
                    ),
                    params![stats.xp, stats.total_generations, stats.streak_days, now, stats.id],
                )?;

                self.metrics.record_generation(reset);
                stats
            },
            None => {
                // First qualifying event for this account: stats are created
                // lazily and the streak starts at one.
                tx.execute(
                    &format!(
                        "INSERT INTO {} ({}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?)",
                        user_stats::TABLE,
                        user_stats::USER_ACCOUNT,
                        user_stats::XP,
                        user_stats::TOTAL_GENERATIONS,
                        user_stats::STREAK_DAYS,
                        user_stats::LAST_GENERATION
                    ),
                    params![account, XP_PER_GENERATION, 1, 1, now],
                )?;

                self.metrics.record_generation(false);
                UserStats {
                    id: tx.last_insert_rowid(),
                    user_account: account.to_string(),
                    xp: XP_PER_GENERATION,
                    total_generations: 1,
                    streak_days: 1,
                    last_generation: Some(now),
                }
            },
        };

        tx.commit()?;

        debug!(
            account,
            xp = stats.xp,
            streak_days = stats.streak_days,
            "Recorded generation"
        );

        Ok(stats)
    }

    /// Fetch the stored stats for an account, if any
    pub fn stats_for(&self, account: &str) -> Result<Option<UserStats>> {
        InputValidator::validate_account(account)?;

        let conn = self.db.get_connection()?;
        let stats = conn
            .query_row(
                &format!(
                    "SELECT * FROM {} WHERE {} = ?",
                    user_stats::TABLE,
                    user_stats::USER_ACCOUNT
                ),
                params![account],
                map_user_stats,
            )
            .optional()?;

        Ok(stats)
    }
}

/// Compute the next streak value and whether this transition was a reset.
///
/// Rules, compared by UTC calendar date:
/// - no prior generation: streak starts at 1
/// - prior date is yesterday: streak advances
/// - prior date is today: streak unchanged (same-day repeats are absorbed)
/// - anything else, including future prior dates from clock skew: reset to 1
fn streak_transition(current: i64, last: Option<NaiveDateTime>, now: NaiveDateTime) -> (i64, bool) {
    let Some(prev) = last else {
        return (1, false);
    };

    let prev_date = prev.date();
    let today = now.date();

    if prev_date.succ_opt() == Some(today) {
        (current + 1, false)
    } else if prev_date == today {
        (current, false)
    } else {
        (1, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .expect("valid test date")
    }

    #[test]
    fn test_first_generation_starts_streak() {
        assert_eq!(streak_transition(0, None, at(2025, 6, 1, 12)), (1, false));
    }

    #[test]
    fn test_consecutive_day_advances() {
        let prev = at(2025, 6, 1, 23);
        assert_eq!(streak_transition(3, Some(prev), at(2025, 6, 2, 0)), (4, false));
    }

    #[test]
    fn test_same_day_unchanged() {
        let prev = at(2025, 6, 1, 8);
        assert_eq!(streak_transition(3, Some(prev), at(2025, 6, 1, 22)), (3, false));
    }

    #[test]
    fn test_gap_resets() {
        let prev = at(2025, 6, 1, 8);
        assert_eq!(streak_transition(7, Some(prev), at(2025, 6, 3, 8)), (1, true));
    }

    #[test]
    fn test_future_prior_date_resets() {
        let prev = at(2025, 6, 5, 8);
        assert_eq!(streak_transition(7, Some(prev), at(2025, 6, 1, 8)), (1, true));
    }

    #[test]
    fn test_month_boundary_advances() {
        let prev = at(2025, 5, 31, 12);
        assert_eq!(streak_transition(2, Some(prev), at(2025, 6, 1, 12)), (3, false));
    }
}
