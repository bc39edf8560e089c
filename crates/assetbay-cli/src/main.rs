//! Assetbay CLI — command-line client for the Assetbay API.
//!
//! Set ASSETBAY_API_KEY and ASSETBAY_API_URL. Uses X-API-Key auth.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;

use assetbay_api_client::ApiClient;
use assetbay_cli::{format_size, init_tracing, truncate_string};
use assetbay_core::config::ENV_API_KEY;
use assetbay_core::models::{UploadFile, UploadStatus};
use assetbay_core::Pager;
use assetbay_session::{NotificationLevel, Notifier, RefreshSignal, UploadQueue};

#[derive(Parser)]
#[command(name = "assetbay", about = "Assetbay API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List assets with pagination and optional search
    List {
        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: u64,
        /// Items per page
        #[arg(long, default_value = "50")]
        per_page: u32,
        /// Filter by name
        #[arg(long)]
        search: Option<String>,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Get a single asset by ID
    Get {
        /// Asset ID
        id: String,
    },
    /// Upload one or more files
    Upload {
        /// Paths of the files to upload
        #[arg(required = true)]
        files: Vec<std::path::PathBuf>,
    },
    /// Delete an asset by ID
    Delete {
        /// Asset ID
        id: String,
    },
    /// Print the download URL for an asset
    Url {
        /// Asset ID
        id: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let client = ApiClient::from_env().context("Failed to create API client")?;
    let cli = Cli::parse();

    // Everything except URL construction talks to the server.
    if !matches!(cli.command, Commands::Url { .. }) && !client.keys().is_configured() {
        bail!("No API key configured. Set {ENV_API_KEY}");
    }

    match cli.command {
        Commands::List {
            page,
            per_page,
            search,
            json,
        } => {
            let offset = page.saturating_sub(1) * u64::from(per_page.max(1));
            let result = client
                .list_assets(per_page, offset, search.as_deref())
                .await?;

            if json {
                print_json(&result)?;
            } else {
                let mut pager = Pager::new(per_page);
                pager.set_total(result.total);

                println!(
                    "{:<24} {:<32} {:>10} {:<24} {}",
                    "ID", "NAME", "SIZE", "TYPE", "CREATED"
                );
                for asset in &result.assets {
                    println!(
                        "{:<24} {:<32} {:>10} {:<24} {}",
                        truncate_string(&asset.id, 24),
                        truncate_string(&asset.name, 32),
                        format_size(asset.size),
                        truncate_string(&asset.mime_type, 24),
                        asset.created_at.format("%Y-%m-%d %H:%M"),
                    );
                }
                println!(
                    "\n{} assets total, page {} of {}",
                    result.total,
                    page.max(1),
                    pager.total_pages()
                );
            }
        }
        Commands::Get { id } => {
            let asset = client.get_asset(&id).await?;
            print_json(&asset)?;
        }
        Commands::Upload { files } => {
            upload_files(client, files).await?;
        }
        Commands::Delete { id } => {
            let deleted = client.delete_asset(&id).await?;
            if !deleted {
                bail!("Server refused to delete asset {id}");
            }
            println!("Deleted {id}");
        }
        Commands::Url { id } => {
            println!("{}", client.download_url(&id));
        }
    }

    Ok(())
}

/// Drive the upload queue until every entry is terminal, printing progress
/// and surfacing notifications as they arrive.
async fn upload_files(client: ApiClient, paths: Vec<std::path::PathBuf>) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        files.push(UploadFile::new(name, bytes));
    }

    let total = files.len();
    let (notifier, mut notifications) = Notifier::channel(64);
    let queue = UploadQueue::new(Arc::new(client), notifier, RefreshSignal::new());
    queue.submit(files);

    let mut ticker = tokio::time::interval(Duration::from_millis(300));
    loop {
        ticker.tick().await;

        while let Ok(note) = notifications.try_recv() {
            match note.level {
                NotificationLevel::Success => println!("\r{}", note.message),
                NotificationLevel::Error => eprintln!("\r{}", note.message),
            }
        }

        if queue.in_flight() == 0 {
            break;
        }

        let line: Vec<String> = queue
            .status()
            .iter()
            .filter(|item| !item.status.is_terminal())
            .map(|item| format!("{} {}%", item.name, item.progress))
            .collect();
        print!("\ruploading: {}", line.join("  "));
        std::io::stdout().flush().ok();
    }

    while let Ok(note) = notifications.try_recv() {
        match note.level {
            NotificationLevel::Success => println!("\r{}", note.message),
            NotificationLevel::Error => eprintln!("\r{}", note.message),
        }
    }

    let failed = queue
        .status()
        .iter()
        .filter(|item| item.status == UploadStatus::Error)
        .count();
    if failed > 0 {
        bail!("{failed} of {total} uploads failed");
    }
    Ok(())
}
