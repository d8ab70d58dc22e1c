//! Prompt Social - Marketplace Feed and Engagement Core
//!
//! A Rust library implementing the social core of a prompt marketplace:
//! engagement counters, creator follow graph, multi-source feed assembly,
//! per-account generation stats, and padded leaderboards.
//!
//! # Features
//!
//! - Public and premium prompt catalog with tag and marketplace filters
//! - Like/comment tracking with recomputed totals and comment previews
//! - Directed follower graph between opaque account identities
//! - Batched, paginated feed aggregation across four source policies
//! - XP / generation-count / streak stats and leaderboard rankings

/// Prompt creation and listing
pub mod catalog;
/// Configuration management
pub mod config;
/// Database operations and connection pooling
pub mod db;
/// Like and comment counters
pub mod engagement;
/// Error taxonomy
pub mod error;
/// Feed assembly
pub mod feed;
/// Follower graph
pub mod follows;
/// Leaderboard rankings
pub mod leaderboard;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Database schema definitions
pub mod schema;
/// Generation stats and streaks
pub mod stats;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use catalog::PromptCatalog;
pub use db::Database;
pub use engagement::Engagement;
pub use error::{Result, SocialError};
pub use feed::FeedAggregator;
pub use follows::FollowGraph;
pub use leaderboard::Leaderboard;
pub use models::{FeedSource, Page, PromptTag, PromptType};
pub use stats::StatsEngine;
