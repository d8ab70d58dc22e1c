//! Feed aggregator
//!
//! Assembles paginated feed pages from a declared source policy, enriched
//! with like/comment counts and a bounded preview of recent comments. All
//! engagement enrichment is batched over the page's prompt ids; nothing here
//! issues one lookup per item. A failure in any lookup aborts the whole page.

use std::collections::BTreeSet;
use std::time::Instant;

use rusqlite::{params, params_from_iter, ToSql};
use tracing::debug;

use crate::config::FeedConfig;
use crate::db::{self, map_prompt, Database};
use crate::engagement::{Engagement, PREVIEW_COMMENTS};
use crate::error::Result;
use crate::follows::FollowGraph;
use crate::metrics::MetricsCollector;
use crate::models::{FeedEntry, FeedSource, Page, Prompt};
use crate::schema::prompts;
use crate::validation::InputValidator;

/// Page size ceiling applied when no configuration is supplied
const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Builds enriched, paginated feed pages
pub struct FeedAggregator<'a> {
    db: &'a Database,
    max_page_size: u32,
    metrics: MetricsCollector,
}

impl<'a> FeedAggregator<'a> {
    /// Create a feed aggregator with default limits
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            metrics: MetricsCollector::default(),
        }
    }

    /// Create a feed aggregator honoring configured limits
    #[must_use]
    pub fn from_config(db: &'a Database, config: &FeedConfig) -> Self {
        Self {
            db,
            max_page_size: config.max_page_size,
            metrics: MetricsCollector::default(),
        }
    }

    /// Assemble one page of the feed for `viewer` under the given policy.
    ///
    /// The three follow-derived policies return their items in random order;
    /// repeated calls may reorder. The home policy is newest first.
    pub fn page(
        &self,
        viewer: &str,
        source: FeedSource,
        page: u32,
        page_size: u32,
    ) -> Result<Page<FeedEntry>> {
        InputValidator::validate_account(viewer)?;
        InputValidator::validate_pagination(page, page_size, self.max_page_size)?;

        let started = Instant::now();

        let (items, total) = match source {
            FeedSource::Home => self.recent_prompts(page, page_size)?,
            FeedSource::Followers | FeedSource::Following | FeedSource::Combined => {
                let accounts = self.resolve_accounts(viewer, source)?;
                if accounts.is_empty() {
                    // No related accounts is an empty page, not an error.
                    return Ok(Page {
                        results: Vec::new(),
                        total: 0,
                        page,
                        page_size,
                    });
                }
                self.random_prompts_by_accounts(&accounts, page, page_size)?
            },
        };

        let results = self.enrich(items)?;
        self.metrics
            .record_feed_page(source.as_str(), results.len(), started.elapsed());
        debug!(
            viewer,
            source = source.as_str(),
            page,
            returned = results.len(),
            total,
            "Feed page assembled"
        );

        Ok(Page {
            results,
            total,
            page,
            page_size,
        })
    }

    /// Resolve the account set a follow-derived policy draws content from
    fn resolve_accounts(&self, viewer: &str, source: FeedSource) -> Result<Vec<String>> {
        let graph = FollowGraph::new(self.db);

        let accounts = match source {
            FeedSource::Followers => graph.followers(viewer)?,
            FeedSource::Following => graph.following(viewer)?,
            FeedSource::Combined => {
                // Union of both sides, deduplicated.
                let mut set: BTreeSet<String> = graph.followers(viewer)?.into_iter().collect();
                set.extend(graph.following(viewer)?);
                set.into_iter().collect()
            },
            FeedSource::Home => Vec::new(),
        };

        Ok(accounts)
    }

    /// Home policy: the union of followed-creator and discovery content spans
    /// every prompt, ordered by creation time descending and paginated after
    /// the union.
    fn recent_prompts(&self, page: u32, page_size: u32) -> Result<(Vec<Prompt>, i64)> {
        let conn = self.db.get_connection()?;

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", prompts::TABLE),
            params![],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY {} DESC, {} DESC LIMIT ? OFFSET ?",
            prompts::TABLE,
            prompts::CREATED_AT,
            prompts::ID
        ))?;

        let rows = stmt.query_map(
            params![i64::from(page_size), offset(page, page_size)],
            map_prompt,
        )?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }

        Ok((items, total))
    }

    /// Prompts authored by the given accounts, randomly ordered per request
    fn random_prompts_by_accounts(
        &self,
        accounts: &[String],
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Prompt>, i64)> {
        let conn = self.db.get_connection()?;
        let marks = db::placeholders(accounts.len());

        let account_params: Vec<Box<dyn ToSql>> = accounts
            .iter()
            .map(|account| Box::new(account.clone()) as Box<dyn ToSql>)
            .collect();

        let total: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {} IN ({marks})",
                prompts::TABLE,
                prompts::ACCOUNT_ADDRESS
            ),
            params_from_iter(account_params.iter()),
            |row| row.get(0),
        )?;

        let mut page_params = account_params;
        page_params.push(Box::new(i64::from(page_size)));
        page_params.push(Box::new(offset(page, page_size)));

        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} WHERE {} IN ({marks}) ORDER BY RANDOM() LIMIT ? OFFSET ?",
            prompts::TABLE,
            prompts::ACCOUNT_ADDRESS
        ))?;

        let rows = stmt.query_map(params_from_iter(page_params.iter()), map_prompt)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }

        Ok((items, total))
    }

    /// Merge batched engagement data into the page's prompts.
    ///
    /// Prompts with no engagement report zero counts and an empty preview;
    /// they are never omitted.
    fn enrich(&self, items: Vec<Prompt>) -> Result<Vec<FeedEntry>> {
        let ids: Vec<i64> = items.iter().map(|prompt| prompt.id).collect();

        let engagement = Engagement::new(self.db);
        let counts = engagement.counts_for(&ids)?;
        let previews = engagement.previews_for(&ids, PREVIEW_COMMENTS)?;

        let entries = items
            .into_iter()
            .map(|prompt| {
                let engagement_counts = counts.get(&prompt.id).copied().unwrap_or_default();
                let top_comments = previews.get(&prompt.id).cloned().unwrap_or_default();

                FeedEntry {
                    prompt_id: prompt.id,
                    ipfs_image_url: prompt.ipfs_image_url,
                    prompt: prompt.prompt,
                    prompt_type: prompt.prompt_type,
                    account_address: prompt.account_address,
                    post_name: prompt.post_name,
                    public: prompt.public,
                    created_at: prompt.created_at,
                    likes_count: engagement_counts.likes,
                    comments_count: engagement_counts.comments,
                    top_comments,
                }
            })
            .collect();

        Ok(entries)
    }
}

/// Offset for 1-based page numbers
const fn offset(page: u32, page_size: u32) -> i64 {
    (page as i64 - 1) * page_size as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_math() {
        assert_eq!(offset(1, 10), 0);
        assert_eq!(offset(2, 10), 10);
        assert_eq!(offset(3, 25), 50);
    }
}
