//! Integration tests for the prompt catalog

use chrono::{Duration, Utc};
use rusqlite::params;
use tempfile::TempDir;

use prompt_social_rust::catalog::PromptCatalog;
use prompt_social_rust::db::Database;
use prompt_social_rust::engagement::Engagement;
use prompt_social_rust::error::SocialError;
use prompt_social_rust::models::{
    NewPremiumPrompt, NewPublicPrompt, PremiumFilter, PromptTag, PromptType,
};
use prompt_social_rust::stats::StatsEngine;

fn test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db = Database::new(db_path.to_str().expect("Non-UTF8 temp path")).expect("Failed to create database");
    (dir, db)
}

fn new_public(account: &str, name: &str, tag: PromptTag) -> NewPublicPrompt {
    NewPublicPrompt {
        ipfs_image_url: "ipfs://QmTest".to_string(),
        prompt: "city at dusk".to_string(),
        account_address: account.to_string(),
        post_name: name.to_string(),
        prompt_tag: tag,
    }
}

fn new_premium(account: &str, name: &str) -> NewPremiumPrompt {
    NewPremiumPrompt {
        ipfs_image_url: "ipfs://QmPremium".to_string(),
        prompt: "encrypted payload".to_string(),
        account_address: account.to_string(),
        post_name: name.to_string(),
        prompt_tag: PromptTag::Abstract,
        cid: "bafy123".to_string(),
        chain: "ethereum".to_string(),
        ai_model: "sd-xl".to_string(),
        collection_name: "night collection".to_string(),
        max_supply: 50,
        prompt_nft_price: 0.5,
        video_url: None,
    }
}

#[test]
fn test_create_public_prompt() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);

    let created = catalog
        .create_public(new_public("creator", "dusk", PromptTag::Photography))
        .expect("Failed to create prompt");

    assert_eq!(created.prompt.account_address, "creator");
    assert_eq!(created.prompt.prompt_type, PromptType::Public);
    assert!(created.prompt.public);
    assert!(created.prompt.premium.is_none());
    assert_eq!(created.likes_count, 0);
    assert_eq!(created.comments_count, 0);
}

#[test]
fn test_creation_records_generation() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);
    let engine = StatsEngine::new(&db);

    catalog
        .create_public(new_public("creator", "one", PromptTag::Anime))
        .expect("Failed to create prompt");
    catalog
        .create_premium(new_premium("creator", "two"))
        .expect("Failed to create prompt");

    let stats = engine
        .stats_for("creator")
        .expect("Lookup failed")
        .expect("Stats must exist after creation");

    assert_eq!(stats.total_generations, 2);
    assert_eq!(stats.xp, 4);
}

#[test]
fn test_create_premium_prompt() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);

    let created = catalog
        .create_premium(new_premium("creator", "gated"))
        .expect("Failed to create prompt");

    assert_eq!(created.prompt.prompt_type, PromptType::Premium);
    assert!(!created.prompt.public);

    let premium = created.prompt.premium.as_ref().expect("Premium details must be present");
    assert_eq!(premium.collection_name, "night collection");
    assert_eq!(premium.max_supply, 50);
    assert!(!premium.grant_access);
}

#[test]
fn test_premium_requires_cid() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);

    let mut incomplete = new_premium("creator", "gated");
    incomplete.cid = String::new();

    let err = catalog
        .create_premium(incomplete)
        .expect_err("Missing cid must be rejected");
    assert!(matches!(err, SocialError::Validation(_)));
}

#[test]
fn test_public_page_newest_first_with_counts() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);
    let engagement = Engagement::new(&db);

    let older = catalog
        .create_public(new_public("creator", "older", PromptTag::Anime))
        .expect("Failed to create prompt")
        .prompt
        .id;
    let newer = catalog
        .create_public(new_public("creator", "newer", PromptTag::Anime))
        .expect("Failed to create prompt")
        .prompt
        .id;

    engagement
        .add_like(older, PromptType::Public, "fan")
        .expect("Failed to like prompt");

    let page = catalog.public_page(1, 10).expect("Failed to list prompts");

    assert_eq!(page.total, 2);
    assert_eq!(page.results[0].prompt.id, newer);
    assert_eq!(page.results[0].likes_count, 0);
    assert_eq!(page.results[1].prompt.id, older);
    assert_eq!(page.results[1].likes_count, 1);
}

#[test]
fn test_filter_public_by_tag() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);

    catalog
        .create_public(new_public("creator", "anime", PromptTag::Anime))
        .expect("Failed to create prompt");
    catalog
        .create_public(new_public("creator", "scifi", PromptTag::SciFi))
        .expect("Failed to create prompt");

    let page = catalog
        .filter_public(Some(PromptTag::Anime), None, 1, 10)
        .expect("Failed to filter prompts");

    assert_eq!(page.total, 1);
    assert_eq!(page.results[0].prompt.post_name, "anime");

    let all = catalog
        .filter_public(None, None, 1, 10)
        .expect("Failed to filter prompts");
    assert_eq!(all.total, 2);
}

#[test]
fn test_premium_listing_excludes_public() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);

    catalog
        .create_public(new_public("creator", "open", PromptTag::Anime))
        .expect("Failed to create prompt");
    catalog
        .create_premium(new_premium("creator", "gated"))
        .expect("Failed to create prompt");

    let page = catalog.premium_page(1, 10).expect("Failed to list prompts");

    assert_eq!(page.total, 1);
    assert_eq!(page.results[0].prompt.post_name, "gated");
}

#[test]
fn test_filter_premium_recent_excludes_old() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);

    let old = catalog
        .create_premium(new_premium("creator", "old"))
        .expect("Failed to create prompt")
        .prompt
        .id;
    catalog
        .create_premium(new_premium("creator", "fresh"))
        .expect("Failed to create prompt");

    // Age the first prompt past the 24h window.
    let conn = db.get_connection().expect("Failed to get connection");
    conn.execute(
        "UPDATE prompts SET created_at = ? WHERE id = ?",
        params![Utc::now().naive_utc() - Duration::hours(30), old],
    )
    .expect("Failed to age prompt");
    drop(conn);

    let page = catalog
        .filter_premium(Some(PremiumFilter::Recent), 1, 10)
        .expect("Failed to filter prompts");

    assert_eq!(page.total, 1);
    assert_eq!(page.results[0].prompt.post_name, "fresh");
}

#[test]
fn test_filter_premium_trending_orders_by_likes() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);
    let engagement = Engagement::new(&db);

    let quiet = catalog
        .create_premium(new_premium("creator", "quiet"))
        .expect("Failed to create prompt")
        .prompt
        .id;
    let hot = catalog
        .create_premium(new_premium("creator", "hot"))
        .expect("Failed to create prompt")
        .prompt
        .id;

    for liker in ["a", "b"] {
        engagement
            .add_like(hot, PromptType::Premium, liker)
            .expect("Failed to like prompt");
    }

    let page = catalog
        .filter_premium(Some(PremiumFilter::Trending), 1, 10)
        .expect("Failed to filter prompts");

    assert_eq!(page.total, 2);
    assert_eq!(page.results[0].prompt.id, hot);
    assert_eq!(page.results[0].likes_count, 2);
    assert_eq!(page.results[1].prompt.id, quiet);
}

#[test]
fn test_filter_premium_popular_returns_full_set() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);

    for name in ["one", "two", "three"] {
        catalog
            .create_premium(new_premium("creator", name))
            .expect("Failed to create prompt");
    }

    // Random order: assert the set, not the sequence.
    let page = catalog
        .filter_premium(Some(PremiumFilter::Popular), 1, 10)
        .expect("Failed to filter prompts");

    assert_eq!(page.total, 3);
    assert_eq!(page.results.len(), 3);
}

#[test]
fn test_grant_access_flow() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);

    let premium_id = catalog
        .create_premium(new_premium("creator", "gated"))
        .expect("Failed to create prompt")
        .prompt
        .id;

    catalog.grant_access(premium_id).expect("Failed to grant access");

    let page = catalog.premium_page(1, 10).expect("Failed to list prompts");
    let premium = page.results[0]
        .prompt
        .premium
        .as_ref()
        .expect("Premium details must be present");
    assert!(premium.grant_access);
}

#[test]
fn test_grant_access_rejects_public_prompts() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);

    let public_id = catalog
        .create_public(new_public("creator", "open", PromptTag::Anime))
        .expect("Failed to create prompt")
        .prompt
        .id;

    let err = catalog
        .grant_access(public_id)
        .expect_err("Public prompt must be rejected");
    assert!(matches!(err, SocialError::Validation(_)));
}

#[test]
fn test_grant_access_missing_prompt() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);

    let err = catalog.grant_access(404).expect_err("Missing prompt must be rejected");
    assert!(matches!(err, SocialError::PromptNotFound(404)));
}

#[test]
fn test_top_prompts_ordering_and_limit() {
    let (_dir, db) = test_db();
    let catalog = PromptCatalog::new(&db);
    let engagement = Engagement::new(&db);

    let mut ids = Vec::new();
    for i in 0..7 {
        let id = catalog
            .create_public(new_public("creator", &format!("post {i}"), PromptTag::Anime))
            .expect("Failed to create prompt")
            .prompt
            .id;
        ids.push(id);
    }

    // Give the last prompt the most likes.
    let favorite = ids[6];
    for liker in ["a", "b", "c"] {
        engagement
            .add_like(favorite, PromptType::Public, liker)
            .expect("Failed to like prompt");
    }

    let top = catalog.top_prompts("creator", 5).expect("Failed to rank prompts");

    assert_eq!(top.len(), 5);
    assert_eq!(top[0].prompt.id, favorite);
    assert_eq!(top[0].likes_count, 3);
}
