use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::config::{AppConfig, DatabaseConfig};
use crate::error::{Result, SocialError};
use crate::models::{CommentPreview, PremiumDetails, Prompt, PromptTag, PromptType, UserStats};
use crate::schema::prompts;

// Type alias for the database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database manager for handling connections and operations
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database connection pool with default pool settings
    pub fn new(database_path: &str) -> Result<Self> {
        Self::build(database_path, None)
    }

    /// Create a new database connection pool from configuration
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::build(&config.url, Some(config))
    }

    fn build(database_path: &str, config: Option<&DatabaseConfig>) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Set up connection manager and pool. Foreign keys are off by default
        // in SQLite and the cascade deletes on likes/comments rely on them.
        let manager = SqliteConnectionManager::file(database_path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

        let mut builder = Pool::builder();
        if let Some(config) = config {
            builder = builder
                .max_size(config.max_connections)
                .connection_timeout(Duration::from_secs(config.connection_timeout_secs));
        }
        let pool = builder
            .build(manager)
            .map_err(|e| SocialError::Pool(e.to_string()))?;

        // Run migrations
        let conn = pool.get().map_err(|e| SocialError::Pool(e.to_string()))?;
        Self::run_migrations(&conn)?;
        debug!(path = database_path, "Database pool ready");

        Ok(Self { pool })
    }

    /// Run database migrations
    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(include_str!(
            "../migrations/2025-05-02-000000_create_prompts/up.sql"
        ))?;

        conn.execute_batch(include_str!(
            "../migrations/2025-05-02-000001_create_social_graph/up.sql"
        ))?;

        conn.execute_batch(include_str!(
            "../migrations/2025-05-14-000000_create_user_stats/up.sql"
        ))?;

        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<DbConnection> {
        self.pool.get().map_err(|e| SocialError::Pool(e.to_string()))
    }

    /// Current number of idle plus in-use connections
    #[must_use]
    pub fn pool_size(&self) -> u32 {
        self.pool.state().connections
    }
}

/// Initialize the database connection from configuration, honoring the
/// DATABASE_URL environment override.
pub fn establish_connection(config: &AppConfig) -> Result<Database> {
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| config.database.url.clone());

    let mut db_config = config.database.clone();
    db_config.url = database_url;

    Database::from_config(&db_config)
}

impl ToSql for PromptType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PromptType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: SocialError| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for PromptTag {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PromptTag {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: SocialError| FromSqlError::Other(Box::new(e)))
    }
}

/// Map a database row to a Prompt
pub(crate) fn map_prompt(row: &Row) -> rusqlite::Result<Prompt> {
    let prompt_type: PromptType = row.get("prompt_type")?;

    // Premium columns are NULL for public rows; the discriminant decides
    // whether the details block exists at all.
    let premium = match prompt_type {
        PromptType::Public => None,
        PromptType::Premium => Some(PremiumDetails {
            cid: row.get("cid")?,
            chain: row.get("chain")?,
            ai_model: row.get("ai_model")?,
            collection_name: row.get::<_, Option<String>>("collection_name")?.unwrap_or_default(),
            max_supply: row.get::<_, Option<i64>>("max_supply")?.unwrap_or_default(),
            prompt_nft_price: row.get::<_, Option<f64>>("prompt_nft_price")?.unwrap_or_default(),
            video_url: row.get("video_url")?,
            grant_access: row.get("grant_access")?,
        }),
    };

    Ok(Prompt {
        id: row.get("id")?,
        ipfs_image_url: row.get("ipfs_image_url")?,
        prompt: row.get("prompt")?,
        account_address: row.get("account_address")?,
        post_name: row.get("post_name")?,
        public: row.get("public")?,
        prompt_tag: row.get("prompt_tag")?,
        prompt_type,
        created_at: row.get("created_at")?,
        premium,
    })
}

/// Map a database row to a UserStats
pub(crate) fn map_user_stats(row: &Row) -> rusqlite::Result<UserStats> {
    Ok(UserStats {
        id: row.get("id")?,
        user_account: row.get("user_account")?,
        xp: row.get("xp")?,
        total_generations: row.get("total_generations")?,
        streak_days: row.get("streak_days")?,
        last_generation: row.get("last_generation")?,
    })
}

/// Map a database row to a CommentPreview
pub(crate) fn map_comment_preview(row: &Row) -> rusqlite::Result<CommentPreview> {
    Ok(CommentPreview {
        user_account: row.get("user_account")?,
        comment: row.get("comment")?,
        created_at: row.get("created_at")?,
    })
}

/// Fetch a prompt by id and visibility class
pub(crate) fn prompt_by_id_and_type(
    conn: &Connection,
    prompt_id: i64,
    prompt_type: PromptType,
) -> Result<Option<Prompt>> {
    let prompt = conn
        .query_row(
            &format!(
                "SELECT * FROM {} WHERE {} = ? AND {} = ?",
                prompts::TABLE,
                prompts::ID,
                prompts::PROMPT_TYPE
            ),
            params![prompt_id, prompt_type],
            map_prompt,
        )
        .optional()?;

    Ok(prompt)
}

/// Fetch a prompt by id regardless of visibility class
pub(crate) fn prompt_by_id(conn: &Connection, prompt_id: i64) -> Result<Option<Prompt>> {
    let prompt = conn
        .query_row(
            &format!("SELECT * FROM {} WHERE {} = ?", prompts::TABLE, prompts::ID),
            params![prompt_id],
            map_prompt,
        )
        .optional()?;

    Ok(prompt)
}

/// Build a "?, ?, ?" placeholder list for dynamic IN clauses
pub(crate) fn placeholders(count: usize) -> String {
    let mut out = String::with_capacity(count * 3);
    for i in 0..count {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('?');
    }
    out
}

/// Map a storage-level uniqueness violation to the matching domain conflict,
/// passing every other database failure through unchanged.
pub(crate) fn map_constraint(err: rusqlite::Error, conflict: SocialError) -> SocialError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            conflict
        },
        _ => SocialError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
