//! CLI administration tool for suri.
//!
//! Creates, inspects and resolves links and checks the database without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a link that expires in one day
//! cargo run --bin admin -- shorten example.com/page --expires-in 86400
//!
//! # Show a link without counting a visit
//! cargo run --bin admin -- show k7Qm2x
//!
//! # Resolve a link (counts a visit)
//! cargo run --bin admin -- resolve k7Qm2x
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; `DATABASE_URL` (or `DB_*`) is required.

use suri::config::{self, Config};
use suri::server;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;

/// CLI tool for managing suri.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Shorten {
        /// URL to shorten (scheme defaults to https)
        url: String,

        /// Lifetime of the link in seconds
        #[arg(short, long)]
        expires_in: Option<u64>,
    },

    /// Resolve a short code and count a visit
    Resolve {
        code: String,
    },

    /// Show a link's details
    Show {
        code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL must be set")?;

    match cli.command {
        Commands::Shorten { url, expires_in } => shorten(&config, &url, expires_in).await?,
        Commands::Resolve { code } => resolve(&config, &code).await?,
        Commands::Show { code } => show(&config, &code).await?,
        Commands::Db { action } => {
            let pool = server::connect_database(&config, &database_url).await?;
            handle_db_action(action, &pool).await?
        }
    }

    Ok(())
}

/// Creates a link and prints its short URL.
async fn shorten(config: &Config, url: &str, expires_in: Option<u64>) -> Result<()> {
    let state = server::build_state(config).await?;

    let expires_at = match expires_in {
        Some(secs) => {
            let lifetime = i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .context("--expires-in is too large")?;
            Some(Utc::now() + lifetime)
        }
        None => None,
    };

    let link = state
        .shortener
        .shorten_with_expiry(url, expires_at)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "✅ Link created".green().bold());
    println!();
    println!("  Code:        {}", link.code.cyan());
    println!("  Destination: {}", link.destination.bright_white());
    println!(
        "  Short URL:   {}",
        state.shortener.short_url(&link.code).bright_yellow().bold()
    );
    if let Some(expires_at) = link.expires_at {
        println!(
            "  Expires:     {}",
            expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
        );
    }
    println!();

    Ok(())
}

/// Resolves a code the way a redirect would.
async fn resolve(config: &Config, code: &str) -> Result<()> {
    let state = server::build_state(config).await?;

    let destination = state
        .resolver
        .resolve(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{} → {}", code.cyan(), destination.bright_white());

    Ok(())
}

/// Displays a link's stored state.
async fn show(config: &Config, code: &str) -> Result<()> {
    let state = server::build_state(config).await?;

    let link = state
        .shortener
        .get_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let status = if link.is_expired() {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    };

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  Code:        {}", link.code.cyan());
    println!("  Destination: {}", link.destination.bright_white());
    println!(
        "  Visits:      {}",
        link.visit_count.to_string().bright_green().bold()
    );
    println!(
        "  Created:     {}",
        link.created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    match link.expires_at {
        Some(expires_at) => println!(
            "  Expires:     {}",
            expires_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
        ),
        None => println!("  Expires:     {}", "never".bright_black()),
    }
    println!("  Status:      {}", status);
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await?;

            let visits: i64 =
                sqlx::query_scalar("SELECT COALESCE(SUM(visit_count), 0)::BIGINT FROM links")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Links:      {}",
                links_count.to_string().bright_green().bold()
            );
            println!(
                "  Visits:     {}",
                visits.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
