use crate::catalog::{CatalogRow, DownloadStatus};
use crate::tree::last_segment;

/// Whether a row belongs in the curated iOS corpus: fetched ok, an
/// article page, and not one of the excluded platform-overview slugs.
pub fn is_curated(row: &CatalogRow, excluded_slugs: &[String]) -> bool {
    if row.download_status != DownloadStatus::Ok {
        return false;
    }
    if row.kind != "article" {
        return false;
    }

    let slug = last_segment(&row.path);
    !excluded_slugs.iter().any(|s| s == slug)
}

// ── Tests ──
