//! CLI administration tool for the shortener.
//!
//! Runs the same allocation and lookup logic as the HTTP service directly
//! against the configured PostgreSQL database.
//!
//! # Usage
//!
//! ```bash
//! # Allocate a short code
//! cargo run --bin admin -- shorten https://example.com/page
//!
//! # Allocate with a custom length and attempt budget
//! cargo run --bin admin -- shorten https://example.com/page --length 8 --attempts 10
//!
//! # Inspect a code without counting an access
//! cargo run --bin admin -- inspect aZ3k9Q
//!
//! # Resolve a code, counting an access
//! cargo run --bin admin -- resolve aZ3k9Q
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the service; see [`shortener::config`]. The `memory` backend is
//! rejected since nothing would outlive the command.

use shortener::application::services::ShortenerService;
use shortener::config::{self, StorageBackend};
use shortener::domain::entities::ShortenedUrl;
use shortener::infrastructure::persistence::PgUrlRepository;
use shortener::server::connect_pool;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;

/// CLI tool for managing the shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Allocate a short code for a URL
    Shorten {
        /// URL to shorten
        url: String,

        /// Symbols per code (defaults to CODE_LENGTH)
        #[arg(short, long)]
        length: Option<usize>,

        /// Attempt budget (defaults to MAX_ATTEMPTS)
        #[arg(short, long)]
        attempts: Option<u32>,
    },

    /// Show a mapping without counting an access
    Inspect {
        /// Short code to look up
        short_code: String,
    },

    /// Resolve a short code, counting an access
    Resolve {
        /// Short code to resolve
        short_code: String,
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
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    if config.storage_backend != StorageBackend::Postgres {
        bail!("admin requires STORAGE_BACKEND=postgres");
    }

    let pool = connect_pool(&config).await?;
    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    let service = ShortenerService::new(
        repository,
        config.reserved_words(),
        config.allocation_policy(),
    );

    match cli.command {
        Commands::Shorten {
            url,
            length,
            attempts,
        } => {
            let policy = service.policy();
            let record = service
                .allocate_with(
                    &url,
                    length.unwrap_or(policy.code_length),
                    attempts.unwrap_or(policy.max_attempts),
                )
                .await?;

            println!("{}", "Short code allocated".green().bold());
            print_record(&record);
        }
        Commands::Inspect { short_code } => {
            let record = service.peek(&short_code).await?;
            print_record(&record);
        }
        Commands::Resolve { short_code } => {
            let record = service.resolve(&short_code).await?;
            println!("{} {}", "→".cyan(), record.url.bright_white());
            print_record(&record);
        }
        Commands::Db {
            action: DbAction::Check,
        } => match service.ping().await {
            Ok(()) => println!("{}", "Database connection OK".green().bold()),
            Err(e) => {
                println!("{} {}", "Database connection failed:".red().bold(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

/// Prints a record as aligned key/value lines.
fn print_record(record: &ShortenedUrl) {
    println!("  {:<14} {}", "ID:".bright_black(), record.id);
    println!(
        "  {:<14} {}",
        "Short code:".bright_black(),
        record.short_code.bright_cyan().bold()
    );
    println!("  {:<14} {}", "URL:".bright_black(), record.url);
    println!(
        "  {:<14} {}",
        "Accesses:".bright_black(),
        record.access_count.to_string().yellow()
    );
    println!(
        "  {:<14} {}",
        "Created:".bright_black(),
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  {:<14} {}",
        "Updated:".bright_black(),
        record.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}
