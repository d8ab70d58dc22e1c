//! Prompt catalog
//!
//! Creation and listing of PUBLIC and PREMIUM prompts. Successful creation
//! records a generation event for the owner after the insert commits.
//! Listings recompute engagement counts in one batch per page.

use chrono::{Duration, Utc};
use rusqlite::{params, params_from_iter, ToSql};
use tracing::debug;

use crate::db::{self, map_prompt, Database};
use crate::engagement::Engagement;
use crate::error::{Result, SocialError};
use crate::models::{
    NewPremiumPrompt, NewPublicPrompt, Page, PremiumFilter, Prompt, PromptTag, PromptType,
    PromptWithCounts,
};
use crate::schema::{post_comments, post_likes, prompts};
use crate::stats::StatsEngine;
use crate::validation::InputValidator;

/// Page size ceiling for catalog listings
const MAX_PAGE_SIZE: u32 = 100;

/// Stores and lists marketplace prompts
pub struct PromptCatalog<'a> {
    db: &'a Database,
}

impl<'a> PromptCatalog<'a> {
    /// Create a prompt catalog backed by the given database
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new public prompt and record the owner's generation event
    pub fn create_public(&self, new_prompt: NewPublicPrompt) -> Result<PromptWithCounts> {
        InputValidator::validate_account(&new_prompt.account_address)?;
        InputValidator::validate_post_name(&new_prompt.post_name)?;
        InputValidator::validate_prompt_text(&new_prompt.prompt)?;
        InputValidator::validate_image_url(&new_prompt.ipfs_image_url)?;

        let conn = self.db.get_connection()?;
        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                prompts::TABLE,
                prompts::IPFS_IMAGE_URL,
                prompts::PROMPT,
                prompts::ACCOUNT_ADDRESS,
                prompts::POST_NAME,
                prompts::PUBLIC,
                prompts::PROMPT_TAG,
                prompts::PROMPT_TYPE,
                prompts::CREATED_AT
            ),
            params![
                new_prompt.ipfs_image_url,
                new_prompt.prompt,
                new_prompt.account_address,
                new_prompt.post_name,
                true,
                new_prompt.prompt_tag,
                PromptType::Public,
                Utc::now().naive_utc()
            ],
        )?;
        let prompt_id = conn.last_insert_rowid();
        drop(conn);

        // Creation is a qualifying generation event; stats update after the
        // insert has committed.
        StatsEngine::new(self.db).record_generation(&new_prompt.account_address)?;

        debug!(prompt_id, account = %new_prompt.account_address, "Public prompt created");
        self.with_counts(prompt_id)
    }

    /// Insert a new premium prompt and record the owner's generation event
    pub fn create_premium(&self, new_prompt: NewPremiumPrompt) -> Result<PromptWithCounts> {
        InputValidator::validate_account(&new_prompt.account_address)?;
        InputValidator::validate_post_name(&new_prompt.post_name)?;
        InputValidator::validate_prompt_text(&new_prompt.prompt)?;
        InputValidator::validate_image_url(&new_prompt.ipfs_image_url)?;
        validate_premium_details(&new_prompt)?;

        let conn = self.db.get_connection()?;
        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                prompts::TABLE,
                prompts::IPFS_IMAGE_URL,
                prompts::PROMPT,
                prompts::ACCOUNT_ADDRESS,
                prompts::POST_NAME,
                prompts::PUBLIC,
                prompts::PROMPT_TAG,
                prompts::PROMPT_TYPE,
                prompts::CID,
                prompts::CHAIN,
                prompts::AI_MODEL,
                prompts::COLLECTION_NAME,
                prompts::MAX_SUPPLY,
                prompts::PROMPT_NFT_PRICE,
                prompts::VIDEO_URL,
                prompts::GRANT_ACCESS,
                prompts::CREATED_AT
            ),
            params![
                new_prompt.ipfs_image_url,
                new_prompt.prompt,
                new_prompt.account_address,
                new_prompt.post_name,
                false,
                new_prompt.prompt_tag,
                PromptType::Premium,
                new_prompt.cid,
                new_prompt.chain,
                new_prompt.ai_model,
                new_prompt.collection_name,
                new_prompt.max_supply,
                new_prompt.prompt_nft_price,
                new_prompt.video_url,
                false,
                Utc::now().naive_utc()
            ],
        )?;
        let prompt_id = conn.last_insert_rowid();
        drop(conn);

        StatsEngine::new(self.db).record_generation(&new_prompt.account_address)?;

        debug!(prompt_id, account = %new_prompt.account_address, "Premium prompt created");
        self.with_counts(prompt_id)
    }

    /// Public prompts, newest first
    pub fn public_page(&self, page: u32, page_size: u32) -> Result<Page<PromptWithCounts>> {
        self.filter_public(None, None, page, page_size)
    }

    /// Public prompts filtered by tag and/or visibility flag, newest first.
    /// A `None` tag means "all".
    pub fn filter_public(
        &self,
        tag: Option<PromptTag>,
        public: Option<bool>,
        page: u32,
        page_size: u32,
    ) -> Result<Page<PromptWithCounts>> {
        let mut filter = format!(" WHERE {} = ?", prompts::PROMPT_TYPE);
        let mut filter_params: Vec<Box<dyn ToSql>> = vec![Box::new(PromptType::Public)];

        if let Some(tag) = tag {
            filter.push_str(&format!(" AND {} = ?", prompts::PROMPT_TAG));
            filter_params.push(Box::new(tag));
        }

        if let Some(public) = public {
            filter.push_str(&format!(" AND {} = ?", prompts::PUBLIC));
            filter_params.push(Box::new(public));
        }

        let order = format!(" ORDER BY {} DESC, {} DESC", prompts::CREATED_AT, prompts::ID);
        self.paged(&filter, &order, filter_params, page, page_size)
    }

    /// Premium prompts, newest first
    pub fn premium_page(&self, page: u32, page_size: u32) -> Result<Page<PromptWithCounts>> {
        let filter = format!(" WHERE {} = ?", prompts::PROMPT_TYPE);
        let order = format!(" ORDER BY {} DESC, {} DESC", prompts::CREATED_AT, prompts::ID);
        self.paged(&filter, &order, vec![Box::new(PromptType::Premium)], page, page_size)
    }

    /// Premium prompts under a marketplace filter
    pub fn filter_premium(
        &self,
        filter: Option<PremiumFilter>,
        page: u32,
        page_size: u32,
    ) -> Result<Page<PromptWithCounts>> {
        let mut where_clause = format!(" WHERE {} = ?", prompts::PROMPT_TYPE);
        let mut filter_params: Vec<Box<dyn ToSql>> = vec![Box::new(PromptType::Premium)];

        let order = match filter {
            Some(PremiumFilter::Recent) => {
                let cutoff = Utc::now().naive_utc() - Duration::hours(24);
                where_clause.push_str(&format!(" AND {} >= ?", prompts::CREATED_AT));
                filter_params.push(Box::new(cutoff));
                format!(" ORDER BY {} DESC, {} DESC", prompts::CREATED_AT, prompts::ID)
            },
            Some(PremiumFilter::Popular) => " ORDER BY RANDOM()".to_string(),
            Some(PremiumFilter::Trending) => {
                return self.trending_premium(page, page_size);
            },
            None => format!(" ORDER BY {} DESC, {} DESC", prompts::CREATED_AT, prompts::ID),
        };

        self.paged(&where_clause, &order, filter_params, page, page_size)
    }

    /// Grant marketplace access on a premium prompt
    pub fn grant_access(&self, prompt_id: i64) -> Result<()> {
        let conn = self.db.get_connection()?;

        let prompt = db::prompt_by_id(&conn, prompt_id)?.ok_or(SocialError::PromptNotFound(prompt_id))?;
        if prompt.prompt_type != PromptType::Premium {
            return Err(SocialError::Validation("Prompt is not a premium prompt".to_string()));
        }

        conn.execute(
            &format!(
                "UPDATE {} SET {} = ? WHERE {} = ?",
                prompts::TABLE,
                prompts::GRANT_ACCESS,
                prompts::ID
            ),
            params![true, prompt_id],
        )?;

        debug!(prompt_id, "Access granted to premium prompt");
        Ok(())
    }

    /// An account's prompts ordered by like count descending
    pub fn top_prompts(&self, account: &str, limit: usize) -> Result<Vec<PromptWithCounts>> {
        InputValidator::validate_account(account)?;

        let conn = self.db.get_connection()?;
        let sql = format!(
            "SELECT p.*, \
                    COUNT(DISTINCT l.{like_id}) AS likes_count, \
                    COUNT(DISTINCT c.{comment_id}) AS comments_count \
             FROM {prompts} p \
             LEFT JOIN {likes} l ON l.{like_prompt} = p.{id} \
             LEFT JOIN {comments} c ON c.{comment_prompt} = p.{id} \
             WHERE p.{owner} = ? \
             GROUP BY p.{id} \
             ORDER BY likes_count DESC \
             LIMIT ?",
            like_id = post_likes::ID,
            comment_id = post_comments::ID,
            prompts = prompts::TABLE,
            likes = post_likes::TABLE,
            comments = post_comments::TABLE,
            like_prompt = post_likes::PROMPT_ID,
            comment_prompt = post_comments::PROMPT_ID,
            id = prompts::ID,
            owner = prompts::ACCOUNT_ADDRESS,
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![account, limit as i64], |row| {
            Ok(PromptWithCounts {
                prompt: map_prompt(row)?,
                likes_count: row.get("likes_count")?,
                comments_count: row.get("comments_count")?,
            })
        })?;

        let mut top = Vec::new();
        for row in rows {
            top.push(row?);
        }

        Ok(top)
    }

    /// Premium prompts ordered by like count descending.
    ///
    /// The ordering needs the likes join, so this bypasses the shared
    /// filter/order page helper; the total still counts the plain filtered
    /// set.
    fn trending_premium(&self, page: u32, page_size: u32) -> Result<Page<PromptWithCounts>> {
        InputValidator::validate_pagination(page, page_size, MAX_PAGE_SIZE)?;

        let conn = self.db.get_connection()?;

        let total: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?",
                prompts::TABLE,
                prompts::PROMPT_TYPE
            ),
            params![PromptType::Premium],
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT p.* FROM {prompts} p \
             LEFT JOIN {likes} l ON l.{like_prompt} = p.{id} \
             WHERE p.{ty} = ? \
             GROUP BY p.{id} \
             ORDER BY COUNT(l.{like_id}) DESC \
             LIMIT ? OFFSET ?",
            prompts = prompts::TABLE,
            likes = post_likes::TABLE,
            like_prompt = post_likes::PROMPT_ID,
            like_id = post_likes::ID,
            id = prompts::ID,
            ty = prompts::PROMPT_TYPE,
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                PromptType::Premium,
                i64::from(page_size),
                (i64::from(page) - 1) * i64::from(page_size)
            ],
            map_prompt,
        )?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        drop(stmt);
        drop(conn);

        Ok(Page {
            results: self.attach_counts(items)?,
            total,
            page,
            page_size,
        })
    }

    /// Shared listing shape: filter, order, paginate, then batch-enrich.
    fn paged(
        &self,
        filter: &str,
        order: &str,
        filter_params: Vec<Box<dyn ToSql>>,
        page: u32,
        page_size: u32,
    ) -> Result<Page<PromptWithCounts>> {
        InputValidator::validate_pagination(page, page_size, MAX_PAGE_SIZE)?;

        let conn = self.db.get_connection()?;

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}{}", prompts::TABLE, filter),
            params_from_iter(filter_params.iter()),
            |row| row.get(0),
        )?;

        let limit = i64::from(page_size);
        let offset = (i64::from(page) - 1) * i64::from(page_size);
        let mut page_params: Vec<&dyn ToSql> = filter_params.iter().map(|param| param.as_ref()).collect();
        page_params.push(&limit);
        page_params.push(&offset);

        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {}{}{} LIMIT ? OFFSET ?",
            prompts::TABLE,
            filter,
            order
        ))?;

        let rows = stmt.query_map(params_from_iter(page_params), map_prompt)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        drop(stmt);
        drop(conn);

        Ok(Page {
            results: self.attach_counts(items)?,
            total,
            page,
            page_size,
        })
    }

    /// Batch-attach like/comment counts to a page of prompts
    fn attach_counts(&self, items: Vec<Prompt>) -> Result<Vec<PromptWithCounts>> {
        let ids: Vec<i64> = items.iter().map(|prompt| prompt.id).collect();
        let counts = Engagement::new(self.db).counts_for(&ids)?;

        Ok(items
            .into_iter()
            .map(|prompt| {
                let engagement = counts.get(&prompt.id).copied().unwrap_or_default();
                PromptWithCounts {
                    prompt,
                    likes_count: engagement.likes,
                    comments_count: engagement.comments,
                }
            })
            .collect())
    }

    /// Fetch one prompt with recomputed engagement counts
    fn with_counts(&self, prompt_id: i64) -> Result<PromptWithCounts> {
        let conn = self.db.get_connection()?;
        let prompt = db::prompt_by_id(&conn, prompt_id)?.ok_or(SocialError::PromptNotFound(prompt_id))?;
        drop(conn);

        let counts = Engagement::new(self.db).counts_for(&[prompt_id])?;
        let engagement = counts.get(&prompt_id).copied().unwrap_or_default();

        Ok(PromptWithCounts {
            prompt,
            likes_count: engagement.likes,
            comments_count: engagement.comments,
        })
    }
}

/// Premium-specific field validation
fn validate_premium_details(new_prompt: &NewPremiumPrompt) -> Result<()> {
    if new_prompt.cid.trim().is_empty() {
        return Err(SocialError::Validation("cid is required for premium prompts".to_string()));
    }

    if new_prompt.collection_name.trim().is_empty() {
        return Err(SocialError::Validation("collection_name is required for premium prompts".to_string()));
    }

    if new_prompt.max_supply < 1 {
        return Err(SocialError::Validation("max_supply must be at least 1".to_string()));
    }

    if !new_prompt.prompt_nft_price.is_finite() || new_prompt.prompt_nft_price < 0.0 {
        return Err(SocialError::Validation("prompt_nft_price must be non-negative".to_string()));
    }

    Ok(())
}
