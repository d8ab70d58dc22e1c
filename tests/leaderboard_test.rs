//! Integration tests for the leaderboard ranker
//!
//! Every page is padded with exactly ten synthetic entries and the reported
//! total counts them; the filler rows are never persisted.

use chrono::{Duration, Utc};
use tempfile::TempDir;

use prompt_social_rust::db::Database;
use prompt_social_rust::error::SocialError;
use prompt_social_rust::leaderboard::Leaderboard;
use prompt_social_rust::stats::StatsEngine;

fn test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db = Database::new(db_path.to_str().expect("Non-UTF8 temp path")).expect("Failed to create database");
    (dir, db)
}

#[test]
fn test_xp_ranking_with_filler() {
    let (_dir, db) = test_db();
    let engine = StatsEngine::new(&db);

    // u1 has two generations (4 xp), u2 has one (2 xp).
    engine.record_generation("u1").expect("Failed to record generation");
    engine.record_generation("u1").expect("Failed to record generation");
    engine.record_generation("u2").expect("Failed to record generation");

    let page = Leaderboard::new(&db).xp(1, 10).expect("Failed to rank");

    // 2 real entries + 10 filler, total adjusted the same way.
    assert_eq!(page.results.len(), 12);
    assert_eq!(page.total, 12);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 10);

    assert_eq!(page.results[0].user_account, "u1");
    assert_eq!(page.results[0].score, 4);
    assert_eq!(page.results[1].user_account, "u2");
    assert_eq!(page.results[1].score, 2);
}

#[test]
fn test_filler_entries_shape() {
    let (_dir, db) = test_db();

    // Empty database: the page is pure filler.
    let page = Leaderboard::new(&db).xp(1, 10).expect("Failed to rank");
    assert_eq!(page.results.len(), 10);
    assert_eq!(page.total, 10);

    for entry in &page.results {
        assert!(entry.user_account.starts_with("0x"));
        assert_eq!(entry.user_account.len(), 66);
        assert!(entry.user_account[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert!((1..=1000).contains(&entry.score));
    }
}

#[test]
fn test_streak_ranking() {
    let (_dir, db) = test_db();
    let engine = StatsEngine::new(&db);
    let now = Utc::now().naive_utc();

    // u1 generated on two consecutive days, u2 only today.
    engine
        .record_generation_at("u1", now - Duration::days(1))
        .expect("Failed to record generation");
    engine.record_generation_at("u1", now).expect("Failed to record generation");
    engine.record_generation_at("u2", now).expect("Failed to record generation");

    let page = Leaderboard::new(&db).streaks(1, 10).expect("Failed to rank");

    assert_eq!(page.total, 12);
    assert_eq!(page.results[0].user_account, "u1");
    assert_eq!(page.results[0].score, 2);
    assert_eq!(page.results[1].user_account, "u2");
    assert_eq!(page.results[1].score, 1);

    for filler in &page.results[2..] {
        assert!((1..=30).contains(&filler.score));
    }
}

#[test]
fn test_generations_24h_excludes_stale_accounts() {
    let (_dir, db) = test_db();
    let engine = StatsEngine::new(&db);
    let now = Utc::now().naive_utc();

    engine.record_generation_at("active", now).expect("Failed to record generation");
    engine
        .record_generation_at("stale", now - Duration::hours(48))
        .expect("Failed to record generation");

    let page = Leaderboard::new(&db)
        .generations_24h(1, 10)
        .expect("Failed to rank");

    // One real entry plus filler.
    assert_eq!(page.total, 11);
    assert_eq!(page.results[0].user_account, "active");
    assert!(page
        .results
        .iter()
        .all(|entry| entry.user_account != "stale"));
}

#[test]
fn test_filler_never_persists() {
    let (_dir, db) = test_db();
    let engine = StatsEngine::new(&db);
    let leaderboard = Leaderboard::new(&db);

    engine.record_generation("u1").expect("Failed to record generation");

    let first = leaderboard.xp(1, 10).expect("Failed to rank");
    let second = leaderboard.xp(1, 10).expect("Failed to rank");

    // If filler leaked into storage, the real total would grow between calls.
    assert_eq!(first.total, 11);
    assert_eq!(second.total, 11);
}

#[test]
fn test_pagination_beyond_real_entries_still_padded() {
    let (_dir, db) = test_db();
    let engine = StatsEngine::new(&db);

    engine.record_generation("u1").expect("Failed to record generation");

    let page = Leaderboard::new(&db).xp(5, 10).expect("Failed to rank");

    // Past the real rows the page is filler-only, and the total is unchanged.
    assert_eq!(page.results.len(), 10);
    assert_eq!(page.total, 11);
    assert_eq!(page.page, 5);
}

#[test]
fn test_pagination_bounds_enforced() {
    let (_dir, db) = test_db();
    let leaderboard = Leaderboard::new(&db);

    let err = leaderboard.xp(0, 10).expect_err("Page 0 must be rejected");
    assert!(matches!(err, SocialError::Validation(_)));

    let err = leaderboard.streaks(1, 0).expect_err("Page size 0 must be rejected");
    assert!(matches!(err, SocialError::Validation(_)));
}
