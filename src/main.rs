//! # Photorama CLI (`photorama`)
//!
//! ## Usage
//!
//! ```bash
//! photorama --config ./config/photorama.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `photorama init` | Create the SQLite database and schema |
//! | `photorama fetch` | Fetch interesting photos and store new ones |
//! | `photorama list` | List stored photos, oldest capture first |
//! | `photorama get <photo_id>` | Show one stored photo |
//! | `photorama image <photo_id>` | Download a stored photo's image |
//! | `photorama stats` | Database summary |
//!
//! Diagnostics go to stderr and are controlled with `RUST_LOG`
//! (default `warn`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use photorama::{config, get, image_cmd, ingest, list, migrate, stats};

/// Photorama — fetch interesting Flickr photos into a local catalog.
#[derive(Parser)]
#[command(name = "photorama", version)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/photorama.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent; running it multiple times is safe.
    Init,

    /// Fetch the current interesting-photos list.
    ///
    /// Photos already stored are left untouched; new ones are inserted.
    /// Either the whole batch is stored or none of it is.
    Fetch,

    /// List stored photos ordered by capture date.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show a stored photo by its Flickr photo ID.
    Get {
        photo_id: String,
    },

    /// Download the image of a stored photo.
    Image {
        photo_id: String,

        /// Output path. Defaults to `<photo_id>.<ext>`.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show database statistics.
    Stats,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Fetch => {
            ingest::run_fetch(&cfg).await?;
        }
        Commands::List { json } => {
            list::run_list(&cfg, json).await?;
        }
        Commands::Get { photo_id } => {
            get::run_get(&cfg, &photo_id).await?;
        }
        Commands::Image { photo_id, out } => {
            image_cmd::run_image(&cfg, &photo_id, out).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
