use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use prompt_social_rust::config::AppConfig;
use prompt_social_rust::db::establish_connection;
use prompt_social_rust::logging::init_logging;
use prompt_social_rust::models::{
    FeedSource, NewPremiumPrompt, NewPublicPrompt, PremiumFilter, PromptTag, PromptType,
};
use prompt_social_rust::{Engagement, FeedAggregator, FollowGraph, Leaderboard, PromptCatalog, StatsEngine};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and run migrations
    Init,

    /// Print the effective configuration as YAML
    Config,

    /// Add a public prompt
    AddPublic {
        /// Owner account
        #[arg(short, long)]
        account: String,

        /// Prompt text
        #[arg(short, long)]
        prompt: String,

        /// IPFS image reference
        #[arg(short, long)]
        image_url: String,

        /// Post display name
        #[arg(short, long)]
        name: String,

        /// Prompt tag (e.g. "3D Art", "Anime")
        #[arg(short, long)]
        tag: String,
    },

    /// Add a premium prompt
    AddPremium {
        /// Owner account
        #[arg(short, long)]
        account: String,

        /// Encrypted prompt text
        #[arg(short, long)]
        prompt: String,

        /// IPFS image reference
        #[arg(short, long)]
        image_url: String,

        /// Post display name
        #[arg(short, long)]
        name: String,

        /// Prompt tag (e.g. "3D Art", "Anime")
        #[arg(short, long)]
        tag: String,

        /// Content identifier of the encrypted payload
        #[arg(long)]
        cid: String,

        /// Chain the collection is minted on
        #[arg(long, default_value = "ethereum")]
        chain: String,

        /// Model that generated the image
        #[arg(long, default_value = "unknown")]
        ai_model: String,

        /// NFT collection name
        #[arg(long)]
        collection: String,

        /// Maximum NFT supply
        #[arg(long, default_value = "100")]
        max_supply: i64,

        /// NFT price
        #[arg(long, default_value = "1.0")]
        price: f64,
    },

    /// Like a prompt
    Like {
        /// Prompt id
        #[arg(short, long)]
        prompt_id: i64,

        /// Prompt type (public or premium)
        #[arg(short = 't', long, default_value = "public")]
        prompt_type: String,

        /// Liking account
        #[arg(short, long)]
        account: String,
    },

    /// Comment on a prompt
    Comment {
        /// Prompt id
        #[arg(short, long)]
        prompt_id: i64,

        /// Prompt type (public or premium)
        #[arg(short = 't', long, default_value = "public")]
        prompt_type: String,

        /// Commenting account
        #[arg(short, long)]
        account: String,

        /// Comment text
        #[arg(short = 'x', long)]
        text: String,
    },

    /// Follow a creator
    Follow {
        /// Following account
        #[arg(short, long)]
        follower: String,

        /// Creator account
        #[arg(short, long)]
        creator: String,
    },

    /// Unfollow a creator
    Unfollow {
        /// Following account
        #[arg(short, long)]
        follower: String,

        /// Creator account
        #[arg(short, long)]
        creator: String,
    },

    /// Print a feed page for an account
    Feed {
        /// Viewing account
        #[arg(short, long)]
        account: String,

        /// Source policy: home, followers, following, or combined
        #[arg(short, long, default_value = "home")]
        source: String,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Page size
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Print a leaderboard page
    Leaderboard {
        /// Metric: xp, streaks, or generations-24h
        #[arg(short, long, default_value = "xp")]
        metric: String,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Page size
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Print premium prompts under a marketplace filter
    Premium {
        /// Filter: recent, popular, or trending
        #[arg(short, long)]
        filter: Option<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Page size
        #[arg(long, default_value = "10")]
        page_size: u32,
    },

    /// Print stored stats for an account
    Stats {
        /// Account to look up
        #[arg(short, long)]
        account: String,
    },
}

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging; the guard must outlive the process
    let _guard = init_logging(Some(&config.get_log_level()), None)?;

    info!("Starting prompt-social-rust application");

    // Parse command line arguments
    let cli = Cli::parse();

    if let Commands::Config = cli.command {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Initialize database with configuration
    let db = establish_connection(&config)?;

    match cli.command {
        Commands::Init => {
            info!("Database initialized");
            Ok(())
        },
        Commands::Config => Ok(()), // handled above
        Commands::AddPublic {
            account,
            prompt,
            image_url,
            name,
            tag,
        } => {
            let created = PromptCatalog::new(&db).create_public(NewPublicPrompt {
                ipfs_image_url: image_url,
                prompt,
                account_address: account,
                post_name: name,
                prompt_tag: tag.parse::<PromptTag>()?,
            })?;
            print_json(&created)
        },
        Commands::AddPremium {
            account,
            prompt,
            image_url,
            name,
            tag,
            cid,
            chain,
            ai_model,
            collection,
            max_supply,
            price,
        } => {
            let created = PromptCatalog::new(&db).create_premium(NewPremiumPrompt {
                ipfs_image_url: image_url,
                prompt,
                account_address: account,
                post_name: name,
                prompt_tag: tag.parse::<PromptTag>()?,
                cid,
                chain,
                ai_model,
                collection_name: collection,
                max_supply,
                prompt_nft_price: price,
                video_url: None,
            })?;
            print_json(&created)
        },
        Commands::Like {
            prompt_id,
            prompt_type,
            account,
        } => {
            let result =
                Engagement::new(&db).add_like(prompt_id, prompt_type.parse::<PromptType>()?, &account)?;
            print_json(&result)
        },
        Commands::Comment {
            prompt_id,
            prompt_type,
            account,
            text,
        } => {
            let result = Engagement::new(&db).add_comment(
                prompt_id,
                prompt_type.parse::<PromptType>()?,
                &account,
                &text,
            )?;
            print_json(&result)
        },
        Commands::Follow { follower, creator } => {
            FollowGraph::new(&db).follow(&follower, &creator)?;
            info!(%follower, %creator, "Followed");
            Ok(())
        },
        Commands::Unfollow { follower, creator } => {
            FollowGraph::new(&db).unfollow(&follower, &creator)?;
            info!(%follower, %creator, "Unfollowed");
            Ok(())
        },
        Commands::Feed {
            account,
            source,
            page,
            page_size,
        } => {
            let aggregator = FeedAggregator::from_config(&db, &config.feed);
            let page = aggregator.page(
                &account,
                source.parse::<FeedSource>()?,
                page,
                page_size.unwrap_or(config.feed.default_page_size),
            )?;
            print_json(&page)
        },
        Commands::Leaderboard { metric, page, page_size } => {
            let leaderboard = Leaderboard::from_config(&db, &config.leaderboard);
            let page_size = page_size.unwrap_or(config.leaderboard.default_page_size);
            let result = match metric.as_str() {
                "xp" => leaderboard.xp(page, page_size)?,
                "streaks" => leaderboard.streaks(page, page_size)?,
                "generations-24h" => leaderboard.generations_24h(page, page_size)?,
                other => anyhow::bail!("Unknown leaderboard metric: {other}"),
            };
            print_json(&result)
        },
        Commands::Premium { filter, page, page_size } => {
            let filter = filter.map(|f| f.parse::<PremiumFilter>()).transpose()?;
            let result = PromptCatalog::new(&db).filter_premium(filter, page, page_size)?;
            print_json(&result)
        },
        Commands::Stats { account } => {
            let stats = StatsEngine::new(&db).stats_for(&account)?;
            match stats {
                Some(stats) => print_json(&stats),
                None => {
                    info!(%account, "No stats recorded for account");
                    Ok(())
                },
            }
        },
    }
}

/// Print a serializable value as pretty JSON on stdout
#[allow(clippy::print_stdout)]
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
