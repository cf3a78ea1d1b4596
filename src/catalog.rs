use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::tree::Node;

/// Fetch outcome for one catalog row. Pending rows move to exactly one
/// terminal state and are never touched again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Pending,
    Ok,
    Error,
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DownloadStatus::Pending => "pending",
            DownloadStatus::Ok => "ok",
            DownloadStatus::Error => "error",
        })
    }
}

/// One synced page: tree metadata plus its fetch outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRow {
    pub path: String,
    pub title: String,
    pub kind: String,
    pub parent_path: Option<String>,
    pub source_url: String,
    pub data_url: String,
    pub local_json: String,
    pub download_status: DownloadStatus,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub error: String,
}

impl CatalogRow {
    /// Build a pending row for a collected node. URLs and the mirror
    /// location derive deterministically from the node path.
    pub fn pending(node: &Node, site_base: &str, page_base: &str) -> CatalogRow {
        CatalogRow {
            path: node.path.clone(),
            title: node.title.clone(),
            kind: node.kind.clone(),
            parent_path: node.parent_path.clone(),
            source_url: format!("{}{}", site_base, node.path),
            data_url: format!("{}{}.json", page_base, node.path),
            local_json: local_json_rel(&node.path),
            download_status: DownloadStatus::Pending,
            abstract_text: String::new(),
            error: String::new(),
        }
    }
}

/// The persisted record of one sync run, rows sorted by path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub generated_at: String,
    pub index_url: String,
    pub page_base: String,
    pub page_prefix: String,
    pub total_nodes: usize,
    pub download_ok: usize,
    pub download_error: usize,
    pub rows: Vec<CatalogRow>,
}

/// Mirror location of a page JSON, relative to the references dir.
pub fn local_json_rel(path: &str) -> String {
    format!("raw/pages/{}.json", path.trim_start_matches('/'))
}

/// Write a JSON document, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(payload)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let catalog =
        serde_json::from_str(&raw).with_context(|| format!("Invalid catalog {}", path.display()))?;
    Ok(catalog)
}

// ── Tests ──
