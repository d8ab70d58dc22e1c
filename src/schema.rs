//! Database schema definitions
//!
//! This module provides constants for table and column names used with rusqlite.

/// Prompts table schema
pub mod prompts {
    /// Table name
    pub const TABLE: &str = "prompts";
    /// Primary key column
    pub const ID: &str = "id";
    /// IPFS image reference column
    pub const IPFS_IMAGE_URL: &str = "ipfs_image_url";
    /// Prompt text column
    pub const PROMPT: &str = "prompt";
    /// Owner account column
    pub const ACCOUNT_ADDRESS: &str = "account_address";
    /// Post display name column
    pub const POST_NAME: &str = "post_name";
    /// Visibility flag column
    pub const PUBLIC: &str = "public";
    /// Prompt tag column
    pub const PROMPT_TAG: &str = "prompt_tag";
    /// Prompt type column (PUBLIC or PREMIUM)
    pub const PROMPT_TYPE: &str = "prompt_type";
    /// Content identifier column (premium only)
    pub const CID: &str = "cid";
    /// Chain name column (premium only)
    pub const CHAIN: &str = "chain";
    /// Generating model column (premium only)
    pub const AI_MODEL: &str = "ai_model";
    /// NFT collection name column (premium only)
    pub const COLLECTION_NAME: &str = "collection_name";
    /// Maximum NFT supply column (premium only)
    pub const MAX_SUPPLY: &str = "max_supply";
    /// NFT price column (premium only)
    pub const PROMPT_NFT_PRICE: &str = "prompt_nft_price";
    /// Video reference column (premium only)
    pub const VIDEO_URL: &str = "video_url";
    /// Access grant flag column (premium only)
    pub const GRANT_ACCESS: &str = "grant_access";
    /// Creation timestamp column
    pub const CREATED_AT: &str = "created_at";
}

/// Post likes table schema
pub mod post_likes {
    /// Table name
    pub const TABLE: &str = "post_likes";
    /// Primary key column
    pub const ID: &str = "id";
    /// Foreign key to prompts table
    pub const PROMPT_ID: &str = "prompt_id";
    /// Denormalized prompt type column
    pub const PROMPT_TYPE: &str = "prompt_type";
    /// Liking account column
    pub const USER_ACCOUNT: &str = "user_account";
    /// Creation timestamp column
    pub const CREATED_AT: &str = "created_at";
}

/// Post comments table schema
pub mod post_comments {
    /// Table name
    pub const TABLE: &str = "post_comments";
    /// Primary key column
    pub const ID: &str = "id";
    /// Foreign key to prompts table
    pub const PROMPT_ID: &str = "prompt_id";
    /// Denormalized prompt type column
    pub const PROMPT_TYPE: &str = "prompt_type";
    /// Commenting account column
    pub const USER_ACCOUNT: &str = "user_account";
    /// Comment text column
    pub const COMMENT: &str = "comment";
    /// Creation timestamp column
    pub const CREATED_AT: &str = "created_at";
}

/// Follow edges table schema
pub mod follows {
    /// Table name
    pub const TABLE: &str = "follows";
    /// Primary key column
    pub const ID: &str = "id";
    /// Account doing the following
    pub const FOLLOWER_ACCOUNT: &str = "follower_account";
    /// Account being followed
    pub const CREATOR_ACCOUNT: &str = "creator_account";
}

/// User stats table schema
pub mod user_stats {
    /// Table name
    pub const TABLE: &str = "user_stats";
    /// Primary key column
    pub const ID: &str = "id";
    /// Account column, unique per row
    pub const USER_ACCOUNT: &str = "user_account";
    /// Experience points column
    pub const XP: &str = "xp";
    /// Lifetime generation count column
    pub const TOTAL_GENERATIONS: &str = "total_generations";
    /// Consecutive-day streak column
    pub const STREAK_DAYS: &str = "streak_days";
    /// Timestamp of the most recent generation
    pub const LAST_GENERATION: &str = "last_generation";
}
