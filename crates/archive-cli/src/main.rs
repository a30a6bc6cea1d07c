//! archive: command-line client for the image archive contract.
//!
//! Reads go through the shared query cache; uploads and comparisons go
//! through the coordinators, so the CLI exercises the same paths a
//! graphical front end would.

mod commands;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use archive_core::{defaults, Rarity, SearchFilters, ValidationError};
use archive_gateway::{GatewayConfig, JsonRpcGateway};
use archive_query::{ArchiveClient, NoticeLevel};

use crate::output::Format;

#[derive(Parser)]
#[command(name = "archive")]
#[command(author, version, about = "Browse, search, upload and compare archived images")]
#[command(propagate_version = true)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// TOML config file (default: $ARCHIVE_CONFIG, then ARCHIVE_* variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Number of archived images
    Count,

    /// Most recently uploaded images
    Recent {
        /// How many records to list
        #[arg(short, long, default_value_t = defaults::RECENT_COUNT)]
        count: usize,
    },

    /// Show one image record
    Show {
        /// Record id
        id: String,
    },

    /// Search the archive (no filters lists recent images)
    Search {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Collection statistics over the matching images
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Upload an image for analysis
    Upload {
        /// Image file (JPEG, PNG or WebP, at most 10MB)
        file: PathBuf,

        /// Title for the image
        #[arg(short, long)]
        title: String,

        /// Uploader name (default: Anonymous)
        #[arg(short, long)]
        uploader: Option<String>,

        /// Content type to assume when the bytes are not recognized
        #[arg(long)]
        mime: Option<String>,
    },

    /// Compare two images head to head
    Compare {
        /// First record id
        first: String,

        /// Second record id
        second: String,
    },

    /// Check that the contract endpoint answers
    Health,
}

/// Search criteria shared by `search` and `stats`.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Rarity tier (unique, rare, common)
    #[arg(long)]
    pub rarity: Option<Rarity>,

    /// Minimum rating, 0 to 10
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Free-text keyword
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Style tag (takes precedence over every other filter)
    #[arg(long)]
    pub style_tag: Option<String>,

    /// Dominant color token, e.g. "#ff0000"
    #[arg(long = "color")]
    pub dominant_color: Option<String>,
}

impl FilterArgs {
    pub fn to_filters(&self) -> Result<SearchFilters, ValidationError> {
        let mut filters = SearchFilters {
            rarity: self.rarity,
            min_rating: self.min_rating,
            ..SearchFilters::default()
        };
        filters.check_rating()?;

        if let Some(rating) = self.min_rating {
            filters.set_min_rating(rating);
        }
        if let Some(keyword) = &self.keyword {
            filters.set_keyword(keyword);
        }
        if let Some(tag) = &self.style_tag {
            filters.set_style_tag(tag);
        }
        if let Some(color) = &self.dominant_color {
            filters.set_dominant_color(color);
        }
        Ok(filters)
    }
}

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   RUST_LOG    - standard env filter (default: "warn")
///
/// Logs go to stderr so command output stays clean on stdout.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    info!(log_format = %log_format, "Logging initialized");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let format = if cli.json { Format::Json } else { Format::Text };

    let config = match &cli.config {
        Some(path) => GatewayConfig::from_file(path)?,
        None => GatewayConfig::load()?,
    };
    let gateway = Arc::new(JsonRpcGateway::new(&config)?);

    if let Commands::Health = cli.command {
        let healthy = gateway.health_check().await?;
        println!("{}", output::health(format, gateway.endpoint(), healthy)?);
        if !healthy {
            anyhow::bail!("contract endpoint unreachable: {}", gateway.endpoint());
        }
        return Ok(());
    }

    let client = ArchiveClient::new(gateway);
    let mut notices = client.notifier().subscribe();

    let result = commands::run(&client, cli.command, format).await;

    while let Ok(notice) = notices.try_recv() {
        match notice.level {
            NoticeLevel::Success => eprintln!("{}", notice.message),
            NoticeLevel::Error => eprintln!("Error: {}", notice.message),
        }
    }

    println!("{}", result?);
    Ok(())
}
