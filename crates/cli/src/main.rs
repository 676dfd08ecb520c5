//! Tankstellen CLI - collection setup, seeding and record management.
//!
//! # Usage
//!
//! ```bash
//! # Create the schema and collection table
//! tankstellen migrate
//!
//! # Import the bundled sample records (or a feature file of your own)
//! tankstellen seed
//! tankstellen seed data/streets.json
//!
//! # Work with records through the running API
//! tankstellen list --filter neustadt --sort asc
//! tankstellen create --address "Bonner Str. 98" --longitude 6.96 --latitude 50.92
//! tankstellen update 67e55044-10b1-426f-9247-bb680e5fe0c8 --address "Bonner Str. 100"
//! tankstellen delete 67e55044-10b1-426f-9247-bb680e5fe0c8
//! ```
//!
//! # Commands
//!
//! - `migrate`, `seed` - Talk to the database directly (`STREETS_DATABASE_URL`)
//! - `list`, `create`, `update`, `delete` - Talk to the API (`STREETS_API_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "tankstellen")]
#[command(author, version, about = "Tankstellen Streets CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and collection table
    Migrate,
    /// Import street features into the collection
    Seed {
        /// Feature file to import (defaults to the bundled sample data)
        file: Option<PathBuf>,
    },
    /// List streets
    List {
        /// Only show addresses containing this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Order by address
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Add a street
    Create {
        #[command(flatten)]
        street: commands::streets::StreetArgs,
    },
    /// Replace a street's address and coordinates
    Update {
        /// Street identifier
        id: String,

        #[command(flatten)]
        street: commands::streets::StreetArgs,
    },
    /// Delete a street
    Delete {
        /// Street identifier
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Asc,
    Desc,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tankstellen_cli=info,warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::run(file.as_deref()).await?,
        Commands::List { filter, sort } => {
            let sort = sort.map(|s| match s {
                SortArg::Asc => tankstellen_client::SortOrder::Ascending,
                SortArg::Desc => tankstellen_client::SortOrder::Descending,
            });
            commands::streets::list(filter.as_deref(), sort).await?;
        }
        Commands::Create { street } => commands::streets::create(street).await?,
        Commands::Update { id, street } => commands::streets::update(&id, street).await?,
        Commands::Delete { id } => commands::streets::delete(&id).await?,
    }
    Ok(())
}
