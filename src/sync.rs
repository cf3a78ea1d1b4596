use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::{self, Catalog, CatalogRow, DownloadStatus};
use crate::corpus;
use crate::fetch::Fetch;
use crate::text::{extract_abstract, normalize_space};
use crate::tree::collect_nodes;

const INDEX_URL: &str =
    "https://developer.apple.com/tutorials/data/index/design--human-interface-guidelines";
const DATA_BASE: &str = "https://developer.apple.com/tutorials/data";
const SITE_BASE: &str = "https://developer.apple.com";
const PAGE_PREFIX: &str = "/design/human-interface-guidelines";
const LANGUAGE_KEY: &str = "swift";

// Platform landing pages that drown out the iOS-focused corpus.
const NON_IOS_SLUGS: &[&str] = &[
    "designing-for-ipados",
    "designing-for-macos",
    "designing-for-tvos",
    "designing-for-visionos",
    "designing-for-watchos",
    "designing-for-games",
];

/// Endpoints and scope for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub index_url: String,
    pub page_base: String,
    pub site_base: String,
    pub page_prefix: String,
    pub language: String,
    pub curated_exclude: Vec<String>,
    pub sleep_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> SyncConfig {
        SyncConfig {
            index_url: INDEX_URL.to_string(),
            page_base: DATA_BASE.to_string(),
            site_base: SITE_BASE.to_string(),
            page_prefix: PAGE_PREFIX.to_string(),
            language: LANGUAGE_KEY.to_string(),
            curated_exclude: NON_IOS_SLUGS.iter().map(|s| s.to_string()).collect(),
            sleep_ms: 120,
        }
    }
}

/// Run one full sync: fetch the index, mirror every in-scope page,
/// persist the catalog, and build the three corpora.
///
/// An index fetch failure is fatal and leaves nothing on disk. A page
/// fetch failure is recorded in that row and the run continues.
pub async fn run_sync(
    fetcher: &dyn Fetch,
    config: &SyncConfig,
    skill_dir: &Path,
) -> Result<Catalog> {
    let references_dir = skill_dir.join("references");
    let raw_dir = references_dir.join("raw");
    let generated_at = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    info!("Fetching index: {}", config.index_url);
    let index_json = fetcher
        .fetch_json(&config.index_url)
        .await
        .context("Failed to fetch index")?;
    catalog::write_json(&index_mirror_path(&raw_dir, &config.index_url), &index_json)?;

    let nodes = collect_nodes(&index_json, &config.language, &config.page_prefix);
    let total = nodes.len();
    info!("Collected {} nodes under {}", total, config.page_prefix);

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut rows: Vec<CatalogRow> = Vec::with_capacity(total);
    let mut ok_count = 0usize;

    for (i, node) in nodes.iter().enumerate() {
        let mut row = CatalogRow::pending(node, &config.site_base, &config.page_base);
        let local_path = references_dir.join(&row.local_json);

        match fetch_and_mirror(fetcher, &row.data_url, &local_path).await {
            Ok(page_json) => {
                row.abstract_text = extract_abstract(&page_json);
                row.download_status = DownloadStatus::Ok;
                ok_count += 1;
            }
            Err(e) => {
                warn!("Page fetch failed for {}: {:#}", row.path, e);
                row.download_status = DownloadStatus::Error;
                row.error = normalize_space(&format!("{:#}", e));
            }
        }

        rows.push(row);
        pb.inc(1);

        if config.sleep_ms > 0 && i + 1 < total {
            tokio::time::sleep(Duration::from_millis(config.sleep_ms)).await;
        }
    }
    pb.finish_and_clear();

    let catalog = Catalog {
        generated_at,
        index_url: config.index_url.clone(),
        page_base: config.page_base.clone(),
        page_prefix: config.page_prefix.clone(),
        total_nodes: total,
        download_ok: ok_count,
        download_error: total - ok_count,
        rows,
    };
    catalog::write_json(&raw_dir.join("catalog.json"), &catalog)?;

    corpus::write_corpora(&catalog, &references_dir, &config.curated_exclude)?;
    Ok(catalog)
}

/// Rebuild the three corpora from an existing catalog and page mirror,
/// without touching the network. The catalog carries its own timestamp,
/// so a rebuild reproduces the producing run byte for byte.
pub fn assemble(config: &SyncConfig, skill_dir: &Path) -> Result<Catalog> {
    let references_dir = skill_dir.join("references");
    let catalog = catalog::load_catalog(&references_dir.join("raw").join("catalog.json"))?;
    corpus::write_corpora(&catalog, &references_dir, &config.curated_exclude)?;
    Ok(catalog)
}

/// Load the persisted catalog of a previous run.
pub fn load_existing_catalog(skill_dir: &Path) -> Result<Catalog> {
    catalog::load_catalog(&skill_dir.join("references").join("raw").join("catalog.json"))
}

async fn fetch_and_mirror(fetcher: &dyn Fetch, url: &str, local_path: &Path) -> Result<Value> {
    let page_json = fetcher.fetch_json(url).await?;
    catalog::write_json(local_path, &page_json)?;
    Ok(page_json)
}

fn index_mirror_path(raw_dir: &Path, index_url: &str) -> PathBuf {
    let name = index_url.rsplit('/').next().unwrap_or("index");
    raw_dir.join("index").join(format!("{}.json", name))
}

// ── Tests ──
