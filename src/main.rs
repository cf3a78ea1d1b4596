mod catalog;
mod corpus;
mod curate;
mod fetch;
mod sync;
mod text;
mod tree;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use clap::{Parser, Subcommand};

use crate::fetch::HttpFetcher;
use crate::sync::SyncConfig;

#[derive(Parser)]
#[command(name = "hig_sync", about = "Apple HIG source sync for iOS-focused reference corpora")]
struct Cli {
    /// Path to the skill root (must contain SKILL.md)
    #[arg(long, default_value = ".")]
    skill_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch index + pages, mirror the JSON, write catalog and corpora
    Sync {
        /// Delay between page requests in milliseconds (0 disables)
        #[arg(long, default_value = "120")]
        sleep_ms: u64,
    },
    /// Rebuild the markdown corpora from the existing catalog and mirror
    Assemble,
    /// Show totals from the existing catalog
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    if !cli.skill_dir.join("SKILL.md").is_file() {
        bail!(
            "Skill dir looks invalid (missing SKILL.md): {}",
            cli.skill_dir.display()
        );
    }

    let result = match cli.command {
        Commands::Sync { sleep_ms } => {
            let config = SyncConfig {
                sleep_ms,
                ..SyncConfig::default()
            };
            let fetcher = HttpFetcher::new()?;
            let catalog = sync::run_sync(&fetcher, &config, &cli.skill_dir).await?;
            println!(
                "Synced HIG sources: total={} ok={} err={}",
                catalog.total_nodes, catalog.download_ok, catalog.download_error
            );
            println!(
                "Wrote references/{}, references/{}, references/{}, and references/raw/catalog.json",
                corpus::RAW_BASENAME,
                corpus::FULLTEXT_BASENAME,
                corpus::CURATED_BASENAME
            );
            Ok(())
        }
        Commands::Assemble => {
            let config = SyncConfig::default();
            let catalog = sync::assemble(&config, &cli.skill_dir)?;
            println!(
                "Rebuilt corpora for {} pages (catalog generated at {})",
                catalog.total_nodes, catalog.generated_at
            );
            Ok(())
        }
        Commands::Stats => {
            let config = SyncConfig::default();
            let catalog = sync::load_existing_catalog(&cli.skill_dir)?;
            let curated = catalog
                .rows
                .iter()
                .filter(|r| curate::is_curated(r, &config.curated_exclude))
                .count();
            println!("Total:     {}", catalog.total_nodes);
            println!("Ok:        {}", catalog.download_ok);
            println!("Errors:    {}", catalog.download_error);
            println!("Curated:   {}", curated);
            println!("Generated: {}", catalog.generated_at);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
