//! Follow graph
//!
//! Directed follower -> creator edges between opaque account strings. This is
//! a general directed graph: self-loops and mutual follows are both valid,
//! only exact duplicate edges are rejected.

use rusqlite::{params, Connection, TransactionBehavior};
use tracing::debug;

use crate::catalog::PromptCatalog;
use crate::db::{map_constraint, Database};
use crate::error::{Result, SocialError};
use crate::models::AccountPrompts;
use crate::schema::follows;
use crate::validation::InputValidator;

/// Number of top-liked prompts attached per account in overview listings
const OVERVIEW_PROMPTS: usize = 5;

/// Maintains and queries follower -> creator edges
pub struct FollowGraph<'a> {
    db: &'a Database,
}

impl<'a> FollowGraph<'a> {
    /// Create a follow graph backed by the given database
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Add a follow edge. Fails with `AlreadyFollowing` if it exists.
    pub fn follow(&self, follower: &str, creator: &str) -> Result<()> {
        InputValidator::validate_account(follower)?;
        InputValidator::validate_account(creator)?;

        let mut conn = self.db.get_connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if edge_exists(&tx, follower, creator)? {
            return Err(SocialError::AlreadyFollowing);
        }

        tx.execute(
            &format!(
                "INSERT INTO {} ({}, {}) VALUES (?, ?)",
                follows::TABLE,
                follows::FOLLOWER_ACCOUNT,
                follows::CREATOR_ACCOUNT
            ),
            params![follower, creator],
        )
        .map_err(|e| map_constraint(e, SocialError::AlreadyFollowing))?;

        tx.commit()?;
        debug!(follower, creator, "Follow edge added");

        Ok(())
    }

    /// Remove a follow edge. Fails with `NotFollowing` if it does not exist.
    pub fn unfollow(&self, follower: &str, creator: &str) -> Result<()> {
        InputValidator::validate_account(follower)?;
        InputValidator::validate_account(creator)?;

        let conn = self.db.get_connection()?;
        let removed = conn.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ? AND {} = ?",
                follows::TABLE,
                follows::FOLLOWER_ACCOUNT,
                follows::CREATOR_ACCOUNT
            ),
            params![follower, creator],
        )?;

        if removed == 0 {
            return Err(SocialError::NotFollowing);
        }

        debug!(follower, creator, "Follow edge removed");
        Ok(())
    }

    /// Accounts following the given creator
    pub fn followers(&self, creator: &str) -> Result<Vec<String>> {
        InputValidator::validate_account(creator)?;

        let conn = self.db.get_connection()?;
        accounts_where(&conn, follows::FOLLOWER_ACCOUNT, follows::CREATOR_ACCOUNT, creator)
    }

    /// Accounts the given follower is following
    pub fn following(&self, follower: &str) -> Result<Vec<String>> {
        InputValidator::validate_account(follower)?;

        let conn = self.db.get_connection()?;
        accounts_where(&conn, follows::CREATOR_ACCOUNT, follows::FOLLOWER_ACCOUNT, follower)
    }

    /// Followers of a creator, each with their top-liked prompts
    pub fn followers_overview(&self, creator: &str) -> Result<Vec<AccountPrompts>> {
        let accounts = self.followers(creator)?;
        self.overview(accounts)
    }

    /// Creators an account follows, each with their top-liked prompts
    pub fn following_overview(&self, follower: &str) -> Result<Vec<AccountPrompts>> {
        let accounts = self.following(follower)?;
        self.overview(accounts)
    }

    fn overview(&self, accounts: Vec<String>) -> Result<Vec<AccountPrompts>> {
        let catalog = PromptCatalog::new(self.db);

        let mut overview = Vec::with_capacity(accounts.len());
        for account in accounts {
            let top_prompts = catalog.top_prompts(&account, OVERVIEW_PROMPTS)?;
            overview.push(AccountPrompts { account, top_prompts });
        }

        Ok(overview)
    }
}

/// Check whether a follower -> creator edge exists
fn edge_exists(conn: &Connection, follower: &str, creator: &str) -> Result<bool> {
    let exists = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ? AND {} = ?)",
            follows::TABLE,
            follows::FOLLOWER_ACCOUNT,
            follows::CREATOR_ACCOUNT
        ),
        params![follower, creator],
        |row| row.get(0),
    )?;

    Ok(exists)
}

/// Select one side of the edge table filtered by the other side
fn accounts_where(conn: &Connection, select: &str, filter: &str, value: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {select} FROM {} WHERE {filter} = ? ORDER BY {}",
        follows::TABLE,
        follows::ID,
    ))?;

    let rows = stmt.query_map(params![value], |row| row.get::<_, String>(0))?;

    let mut accounts = Vec::new();
    for row in rows {
        accounts.push(row?);
    }

    Ok(accounts)
}
