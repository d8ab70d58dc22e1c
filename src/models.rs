//! Data models for prompts, engagement, follows, and account stats
//!
//! This module contains all data structures used throughout the application,
//! including prompt records, feed entries, and pagination envelopes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::SocialError;

/// Visibility class of a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromptType {
    /// Openly visible prompt
    #[serde(rename = "PUBLIC")]
    Public,
    /// NFT-gated prompt sold on the marketplace
    #[serde(rename = "PREMIUM")]
    Premium,
}

impl PromptType {
    /// Database representation of the type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Premium => "PREMIUM",
        }
    }
}

impl std::str::FromStr for PromptType {
    type Err = SocialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Self::Public),
            "PREMIUM" => Ok(Self::Premium),
            other => Err(SocialError::Validation(format!("Unknown prompt type: {other}"))),
        }
    }
}

/// Curated tag vocabulary for prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptTag {
    /// 3D rendered art
    #[serde(rename = "3D Art")]
    ThreeDArt,
    /// Anime style art
    #[serde(rename = "Anime")]
    Anime,
    /// Photographic style
    #[serde(rename = "Photography")]
    Photography,
    /// Drawn illustration
    #[serde(rename = "Illustration")]
    Illustration,
    /// Abstract art
    #[serde(rename = "Abstract")]
    Abstract,
    /// Portrait art
    #[serde(rename = "Portrait")]
    Portrait,
    /// Science fiction themes
    #[serde(rename = "Sci-Fi")]
    SciFi,
    /// Fantasy themes
    #[serde(rename = "Fantasy")]
    Fantasy,
}

impl PromptTag {
    /// All known tags, in display order
    pub const ALL: [Self; 8] = [
        Self::ThreeDArt,
        Self::Anime,
        Self::Photography,
        Self::Illustration,
        Self::Abstract,
        Self::Portrait,
        Self::SciFi,
        Self::Fantasy,
    ];

    /// Display and database representation of the tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThreeDArt => "3D Art",
            Self::Anime => "Anime",
            Self::Photography => "Photography",
            Self::Illustration => "Illustration",
            Self::Abstract => "Abstract",
            Self::Portrait => "Portrait",
            Self::SciFi => "Sci-Fi",
            Self::Fantasy => "Fantasy",
        }
    }
}

impl std::str::FromStr for PromptTag {
    type Err = SocialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SocialError::Validation(format!("Unknown prompt tag: {s}")))
    }
}

/// Marketplace listing filter for premium prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PremiumFilter {
    /// Created within the last 24 hours
    Recent,
    /// Random order per request
    Popular,
    /// Ordered by like count descending
    Trending,
}

impl std::str::FromStr for PremiumFilter {
    type Err = SocialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recent" => Ok(Self::Recent),
            "popular" => Ok(Self::Popular),
            "trending" => Ok(Self::Trending),
            other => Err(SocialError::Validation(format!("Unknown premium filter: {other}"))),
        }
    }
}

/// Premium-only fields of a prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PremiumDetails {
    /// Content identifier of the encrypted prompt payload
    pub cid: Option<String>,
    /// Chain the collection is minted on
    pub chain: Option<String>,
    /// Model that generated the image
    pub ai_model: Option<String>,
    /// NFT collection name
    pub collection_name: String,
    /// Maximum NFT supply
    pub max_supply: i64,
    /// NFT price
    pub prompt_nft_price: f64,
    /// Optional preview video reference
    pub video_url: Option<String>,
    /// True once marketplace access has been granted
    pub grant_access: bool,
}

/// A stored prompt, public or premium
#[derive(Debug, Clone, Serialize)]
pub struct Prompt {
    /// Database primary key
    pub id: i64,
    /// IPFS reference to the generated image
    pub ipfs_image_url: String,
    /// Prompt text (encrypted for premium prompts)
    pub prompt: String,
    /// Owner account, an opaque identity string
    pub account_address: String,
    /// Display name of the post
    pub post_name: String,
    /// Visibility flag
    pub public: bool,
    /// Curated tag
    pub prompt_tag: PromptTag,
    /// Visibility class discriminant
    pub prompt_type: PromptType,
    /// Creation timestamp (UTC)
    pub created_at: NaiveDateTime,
    /// Premium fields, present only for premium prompts
    pub premium: Option<PremiumDetails>,
}

/// Data for creating a new public prompt
#[derive(Debug, Clone, Deserialize)]
pub struct NewPublicPrompt {
    /// IPFS reference to the generated image
    pub ipfs_image_url: String,
    /// Prompt text
    pub prompt: String,
    /// Owner account
    pub account_address: String,
    /// Display name of the post
    pub post_name: String,
    /// Curated tag
    pub prompt_tag: PromptTag,
}

/// Data for creating a new premium prompt
#[derive(Debug, Clone, Deserialize)]
pub struct NewPremiumPrompt {
    /// IPFS reference to the generated image
    pub ipfs_image_url: String,
    /// Encrypted prompt text
    pub prompt: String,
    /// Owner account
    pub account_address: String,
    /// Display name of the post
    pub post_name: String,
    /// Curated tag
    pub prompt_tag: PromptTag,
    /// Content identifier of the encrypted payload
    pub cid: String,
    /// Chain the collection is minted on
    pub chain: String,
    /// Model that generated the image
    pub ai_model: String,
    /// NFT collection name
    pub collection_name: String,
    /// Maximum NFT supply
    pub max_supply: i64,
    /// NFT price
    pub prompt_nft_price: f64,
    /// Optional preview video reference
    pub video_url: Option<String>,
}

/// A prompt enriched with recomputed engagement counts
#[derive(Debug, Clone, Serialize)]
pub struct PromptWithCounts {
    /// The prompt itself
    #[serde(flatten)]
    pub prompt: Prompt,
    /// Number of likes on the prompt
    pub likes_count: i64,
    /// Number of comments on the prompt
    pub comments_count: i64,
}

/// Like and comment totals for one prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct EngagementCounts {
    /// Number of likes
    pub likes: i64,
    /// Number of comments
    pub comments: i64,
}

/// A short comment record used in previews and listings
#[derive(Debug, Clone, Serialize)]
pub struct CommentPreview {
    /// Commenting account
    pub user_account: String,
    /// Comment text
    pub comment: String,
    /// Creation timestamp (UTC)
    pub created_at: NaiveDateTime,
}

/// Result of liking a prompt
#[derive(Debug, Clone, Serialize)]
pub struct LikeResult {
    /// Total likes on the prompt after the insert
    pub total_likes: i64,
}

/// Result of commenting on a prompt
#[derive(Debug, Clone, Serialize)]
pub struct CommentResult {
    /// Total comments on the prompt after the insert
    pub total_comments: i64,
    /// The two most recent comments, newest first
    pub latest_comments: Vec<CommentPreview>,
}

/// A bounded listing of comments with the unbounded total
#[derive(Debug, Clone, Serialize)]
pub struct CommentList {
    /// Up to the requested number of comments, newest first
    pub comments: Vec<CommentPreview>,
    /// Total comments on the prompt
    pub total_comments: i64,
}

/// Like count plus whether a given account has liked the prompt
#[derive(Debug, Clone, Serialize)]
pub struct LikeStatus {
    /// Prompt the status refers to
    pub prompt_id: i64,
    /// Total likes on the prompt
    pub likes_count: i64,
    /// True if the queried account has liked the prompt
    pub user_liked: bool,
}

/// Per-account stats driven by generation events
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    /// Database primary key
    pub id: i64,
    /// Account the stats belong to
    pub user_account: String,
    /// Experience points, 2 per generation
    pub xp: i64,
    /// Lifetime generation count
    pub total_generations: i64,
    /// Consecutive calendar days (UTC) with at least one generation
    pub streak_days: i64,
    /// Timestamp of the most recent generation (UTC)
    pub last_generation: Option<NaiveDateTime>,
}

/// Source policy for feed assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    /// Followed creators plus discovery content, newest first
    Home,
    /// Prompts authored by accounts that follow the viewer, random order
    Followers,
    /// Prompts authored by accounts the viewer follows, random order
    Following,
    /// Prompts from followers and followed accounts combined, random order
    Combined,
}

impl FeedSource {
    /// Stable label used in logs and metrics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Followers => "followers",
            Self::Following => "following",
            Self::Combined => "combined",
        }
    }
}

impl std::str::FromStr for FeedSource {
    type Err = SocialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "followers" => Ok(Self::Followers),
            "following" => Ok(Self::Following),
            "combined" => Ok(Self::Combined),
            other => Err(SocialError::Validation(format!("Unknown feed source: {other}"))),
        }
    }
}

/// One enriched entry of an assembled feed page
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    /// Prompt primary key
    pub prompt_id: i64,
    /// IPFS reference to the generated image
    pub ipfs_image_url: String,
    /// Prompt text
    pub prompt: String,
    /// Visibility class
    pub prompt_type: PromptType,
    /// Owner account
    pub account_address: String,
    /// Display name of the post
    pub post_name: String,
    /// Visibility flag
    pub public: bool,
    /// Creation timestamp (UTC)
    pub created_at: NaiveDateTime,
    /// Total likes, 0 when the prompt has none
    pub likes_count: i64,
    /// Total comments, 0 when the prompt has none
    pub comments_count: i64,
    /// Up to two most recent comments, newest first
    pub top_comments: Vec<CommentPreview>,
}

/// Pagination envelope shared by every listing operation
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Entries of the current page
    pub results: Vec<T>,
    /// Unpaginated total (post-filler where filler applies)
    pub total: i64,
    /// Current page number, 1-based
    pub page: u32,
    /// Page size used for the query
    pub page_size: u32,
}

/// One row of a leaderboard page
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    /// Ranked account (synthetic for filler rows)
    pub user_account: String,
    /// Metric value the ranking is ordered by
    pub score: i64,
}

/// An account together with its most-liked prompts
#[derive(Debug, Clone, Serialize)]
pub struct AccountPrompts {
    /// The related account
    pub account: String,
    /// Up to five prompts ordered by like count descending
    pub top_prompts: Vec<PromptWithCounts>,
}
