//! Gallery CLI - serve the frontend and inspect Arweave uploads
//!
//! ```bash
//! gallery serve                      # Serve frontend/dist on port 8080
//! gallery list <address>             # URLs of images published by an address
//! gallery stage a.png b.jpg          # Dry-run staging and tagging
//! ```

use clap::{Parser, Subcommand};
use gallery::logs::init_console_logger;
use gallery::mime::format_bytes;
use gallery::{
    DiskFile, FileSource, GalleryConfig, GalleryLoader, GatewayClient, PathPreviews, StagingStore,
    Tag, TransactionBuilder,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Publish images to Arweave from a browser wallet", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the built frontend with cross-origin isolation headers
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Frontend build directory
        #[arg(short, long, default_value = "frontend/dist")]
        dist: PathBuf,
    },

    /// List images an address published under the configured App-Name
    List {
        /// Owner address
        owner: String,

        /// Print id and URL as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stage files from disk and show the tags each would be published with
    Stage {
        /// Image files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StagedLine {
    name: String,
    content_type: Option<String>,
    size: u64,
    preview: String,
    tags: Vec<Tag>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_console_logger(cli.verbose) {
        eprintln!("❌ Logger already installed: {}", e);
    }

    let result = run(cli.command).await;

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let config = GalleryConfig::from_env()?;

    match command {
        Commands::Serve { port, dist } => cmd_serve(port, dist, config).await,
        Commands::List { owner, json } => cmd_list(&owner, json, config).await,
        Commands::Stage { paths, json } => cmd_stage(&paths, json, config).await,
    }
}

async fn cmd_serve(
    port: u16,
    dist: PathBuf,
    config: GalleryConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    gallery::server::start_server(port, dist, config).await?;
    Ok(())
}

async fn cmd_list(
    owner: &str,
    json: bool,
    config: GalleryConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔎 Querying {} for {}", config.gateway, owner);

    let loader = GalleryLoader::new(GatewayClient::new(&config), config);
    let items = loader.load(owner).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for item in &items {
            println!("{}", item.url);
        }
    }

    eprintln!("✅ {} image(s)", items.len());
    Ok(())
}

async fn cmd_stage(
    paths: &[PathBuf],
    json: bool,
    config: GalleryConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match DiskFile::open(path) {
            Ok(file) => files.push(file),
            Err(e) => eprintln!("⚠️  Skipping {}: {}", path.display(), e),
        }
    }

    let mut staging = StagingStore::new(PathPreviews);
    let report = staging.add(files);
    for name in &report.rejected {
        eprintln!("⚠️  Not an image: {}", name);
    }

    let builder = TransactionBuilder::from_config(&config);
    let mut lines = Vec::with_capacity(staging.len());
    for staged in staging.files() {
        let unit = builder.build(staged.source()).await?;
        lines.push(StagedLine {
            name: staged.name().to_string(),
            content_type: unit.content_type().map(str::to_string),
            size: staged.source().size(),
            preview: staged.preview_url().unwrap_or_default().to_string(),
            tags: unit.tags().to_vec(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    eprintln!("📄 Staged {} file(s)\n", lines.len());
    for line in &lines {
        println!("  🖼️  {} ({})", line.name, format_bytes(line.size));
        println!("     Preview: {}", line.preview);
        for tag in &line.tags {
            println!("     {}: {}", tag.name, tag.value);
        }
        println!();
    }

    Ok(())
}
