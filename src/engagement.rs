//! Engagement counter
//!
//! Likes and comments per prompt. Totals are always recomputed by counting,
//! never cached, so a successful write is reflected in the value returned
//! from the same call. Uniqueness of (prompt, type, account) likes is checked
//! in-transaction with the storage UNIQUE index as the backstop for races.

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, TransactionBehavior};
use tracing::debug;

use crate::db::{self, map_comment_preview, map_constraint, Database};
use crate::error::{Result, SocialError};
use crate::metrics::MetricsCollector;
use crate::models::{
    CommentList, CommentPreview, CommentResult, EngagementCounts, LikeResult, LikeStatus, PromptType,
};
use crate::schema::{post_comments, post_likes, prompts};
use crate::validation::InputValidator;

/// Number of recent comments returned as a preview alongside totals
pub const PREVIEW_COMMENTS: usize = 2;

/// Tracks likes and comments per prompt
pub struct Engagement<'a> {
    db: &'a Database,
    metrics: MetricsCollector,
}

impl<'a> Engagement<'a> {
    /// Create an engagement counter backed by the given database
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            metrics: MetricsCollector::default(),
        }
    }

    /// Like a prompt on behalf of an account.
    ///
    /// Fails with `PromptNotFound` if no prompt matches the id and visibility
    /// class, and `DuplicateLike` if the account already liked it.
    pub fn add_like(&self, prompt_id: i64, prompt_type: PromptType, account: &str) -> Result<LikeResult> {
        InputValidator::validate_account(account)?;

        let mut conn = self.db.get_connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if db::prompt_by_id_and_type(&tx, prompt_id, prompt_type)?.is_none() {
            return Err(SocialError::PromptNotFound(prompt_id));
        }

        let already_liked: bool = tx.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ? AND {} = ? AND {} = ?)",
                post_likes::TABLE,
                post_likes::PROMPT_ID,
                post_likes::PROMPT_TYPE,
                post_likes::USER_ACCOUNT
            ),
            params![prompt_id, prompt_type, account],
            |row| row.get(0),
        )?;

        if already_liked {
            return Err(SocialError::DuplicateLike);
        }

        tx.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}) VALUES (?, ?, ?, ?)",
                post_likes::TABLE,
                post_likes::PROMPT_ID,
                post_likes::PROMPT_TYPE,
                post_likes::USER_ACCOUNT,
                post_likes::CREATED_AT
            ),
            params![prompt_id, prompt_type, account, Utc::now().naive_utc()],
        )
        .map_err(|e| map_constraint(e, SocialError::DuplicateLike))?;

        let total_likes = count_likes(&tx, prompt_id, Some(prompt_type))?;
        tx.commit()?;

        self.metrics.record_engagement_write("like");
        debug!(prompt_id, account, total_likes, "Prompt liked");

        Ok(LikeResult { total_likes })
    }

    /// Comment on a prompt on behalf of an account.
    ///
    /// Returns the recomputed total and the two most recent comments,
    /// newest first.
    pub fn add_comment(
        &self,
        prompt_id: i64,
        prompt_type: PromptType,
        account: &str,
        text: &str,
    ) -> Result<CommentResult> {
        InputValidator::validate_account(account)?;
        InputValidator::validate_comment(text)?;

        let mut conn = self.db.get_connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if db::prompt_by_id_and_type(&tx, prompt_id, prompt_type)?.is_none() {
            return Err(SocialError::PromptNotFound(prompt_id));
        }

        tx.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?)",
                post_comments::TABLE,
                post_comments::PROMPT_ID,
                post_comments::PROMPT_TYPE,
                post_comments::USER_ACCOUNT,
                post_comments::COMMENT,
                post_comments::CREATED_AT
            ),
            params![prompt_id, prompt_type, account, text, Utc::now().naive_utc()],
        )?;

        let total_comments = count_comments(&tx, prompt_id, prompt_type)?;
        let latest_comments = latest_comments(&tx, prompt_id, prompt_type, PREVIEW_COMMENTS)?;
        tx.commit()?;

        self.metrics.record_engagement_write("comment");
        debug!(prompt_id, account, total_comments, "Prompt commented");

        Ok(CommentResult {
            total_comments,
            latest_comments,
        })
    }

    /// Like count for a prompt plus whether the given account has liked it
    pub fn like_status(&self, prompt_id: i64, account: &str) -> Result<LikeStatus> {
        InputValidator::validate_account(account)?;

        let conn = self.db.get_connection()?;

        if db::prompt_by_id(&conn, prompt_id)?.is_none() {
            return Err(SocialError::PromptNotFound(prompt_id));
        }

        let likes_count = count_likes(&conn, prompt_id, None)?;
        let user_liked: bool = conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ? AND {} = ?)",
                post_likes::TABLE,
                post_likes::PROMPT_ID,
                post_likes::USER_ACCOUNT
            ),
            params![prompt_id, account],
            |row| row.get(0),
        )?;

        Ok(LikeStatus {
            prompt_id,
            likes_count,
            user_liked,
        })
    }

    /// Fetch up to `limit` most recent comments for a prompt with the total count
    pub fn comments(&self, prompt_id: i64, prompt_type: PromptType, limit: usize) -> Result<CommentList> {
        let conn = self.db.get_connection()?;

        if db::prompt_by_id_and_type(&conn, prompt_id, prompt_type)?.is_none() {
            return Err(SocialError::PromptNotFound(prompt_id));
        }

        let comments = latest_comments(&conn, prompt_id, prompt_type, limit)?;
        let total_comments = count_comments(&conn, prompt_id, prompt_type)?;

        Ok(CommentList {
            comments,
            total_comments,
        })
    }

    /// Batch like/comment counts for a set of prompt ids.
    ///
    /// One outer-join aggregation keyed by prompt id; prompts without any
    /// engagement are present in the result with zero counts.
    pub fn counts_for(&self, prompt_ids: &[i64]) -> Result<HashMap<i64, EngagementCounts>> {
        if prompt_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let conn = self.db.get_connection()?;
        let sql = format!(
            "SELECT p.{id} AS prompt_id, \
                    COUNT(DISTINCT l.{like_id}) AS likes_count, \
                    COUNT(DISTINCT c.{comment_id}) AS comments_count \
             FROM {prompts} p \
             LEFT JOIN {likes} l ON l.{like_prompt} = p.{id} \
             LEFT JOIN {comments} c ON c.{comment_prompt} = p.{id} \
             WHERE p.{id} IN ({placeholders}) \
             GROUP BY p.{id}",
            id = prompts::ID,
            like_id = post_likes::ID,
            comment_id = post_comments::ID,
            prompts = prompts::TABLE,
            likes = post_likes::TABLE,
            comments = post_comments::TABLE,
            like_prompt = post_likes::PROMPT_ID,
            comment_prompt = post_comments::PROMPT_ID,
            placeholders = db::placeholders(prompt_ids.len()),
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(prompt_ids.iter()), |row| {
            Ok((
                row.get::<_, i64>("prompt_id")?,
                EngagementCounts {
                    likes: row.get("likes_count")?,
                    comments: row.get("comments_count")?,
                },
            ))
        })?;

        let mut counts = HashMap::with_capacity(prompt_ids.len());
        for row in rows {
            let (prompt_id, entry) = row?;
            counts.insert(prompt_id, entry);
        }

        Ok(counts)
    }

    /// Batch recent-comment previews for a set of prompt ids.
    ///
    /// One fetch over the id set, grouped client-side with each group
    /// truncated to `per_prompt` newest-first entries.
    pub fn previews_for(
        &self,
        prompt_ids: &[i64],
        per_prompt: usize,
    ) -> Result<HashMap<i64, Vec<CommentPreview>>> {
        if prompt_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let conn = self.db.get_connection()?;
        let sql = format!(
            "SELECT {prompt_id}, {account}, {comment}, {created_at} \
             FROM {table} \
             WHERE {prompt_id} IN ({placeholders}) \
             ORDER BY {prompt_id}, {created_at} DESC, {id} DESC",
            prompt_id = post_comments::PROMPT_ID,
            account = post_comments::USER_ACCOUNT,
            comment = post_comments::COMMENT,
            created_at = post_comments::CREATED_AT,
            id = post_comments::ID,
            table = post_comments::TABLE,
            placeholders = db::placeholders(prompt_ids.len()),
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(prompt_ids.iter()), |row| {
            Ok((row.get::<_, i64>(post_comments::PROMPT_ID)?, map_comment_preview(row)?))
        })?;

        let mut grouped: HashMap<i64, Vec<CommentPreview>> = HashMap::new();
        for row in rows {
            let (prompt_id, preview) = row?;
            let group = grouped.entry(prompt_id).or_default();
            if group.len() < per_prompt {
                group.push(preview);
            }
        }

        Ok(grouped)
    }
}

/// Count likes for a prompt, optionally restricted to one visibility class
fn count_likes(conn: &Connection, prompt_id: i64, prompt_type: Option<PromptType>) -> Result<i64> {
    let count = match prompt_type {
        Some(prompt_type) => conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ? AND {} = ?",
                post_likes::TABLE,
                post_likes::PROMPT_ID,
                post_likes::PROMPT_TYPE
            ),
            params![prompt_id, prompt_type],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?",
                post_likes::TABLE,
                post_likes::PROMPT_ID
            ),
            params![prompt_id],
            |row| row.get(0),
        )?,
    };

    Ok(count)
}

/// Count comments for a prompt and visibility class
fn count_comments(conn: &Connection, prompt_id: i64, prompt_type: PromptType) -> Result<i64> {
    let count = conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ? AND {} = ?",
            post_comments::TABLE,
            post_comments::PROMPT_ID,
            post_comments::PROMPT_TYPE
        ),
        params![prompt_id, prompt_type],
        |row| row.get(0),
    )?;

    Ok(count)
}

/// Fetch the most recent comments for a prompt, newest first.
/// Timestamp ties break on insertion order via the id column.
fn latest_comments(
    conn: &Connection,
    prompt_id: i64,
    prompt_type: PromptType,
    limit: usize,
) -> Result<Vec<CommentPreview>> {
    let sql = format!(
        "SELECT {account}, {comment}, {created_at} FROM {table} \
         WHERE {prompt_id} = ? AND {ty} = ? \
         ORDER BY {created_at} DESC, {id} DESC LIMIT ?",
        account = post_comments::USER_ACCOUNT,
        comment = post_comments::COMMENT,
        created_at = post_comments::CREATED_AT,
        table = post_comments::TABLE,
        prompt_id = post_comments::PROMPT_ID,
        ty = post_comments::PROMPT_TYPE,
        id = post_comments::ID,
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![prompt_id, prompt_type, limit as i64], map_comment_preview)?;

    let mut comments = Vec::new();
    for row in rows {
        comments.push(row?);
    }

    Ok(comments)
}
