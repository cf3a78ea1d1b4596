use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::catalog::{Catalog, CatalogRow, DownloadStatus};
use crate::curate::is_curated;
use crate::text::extract_full_text;

pub const RAW_BASENAME: &str = "apple-hig-ios-raw.md";
pub const FULLTEXT_BASENAME: &str = "apple-hig-ios-fulltext.md";
pub const CURATED_BASENAME: &str = "apple-hig-ios-curated.md";

/// Render and write all three corpora under the references dir.
pub fn write_corpora(
    catalog: &Catalog,
    references_dir: &Path,
    excluded_slugs: &[String],
) -> Result<()> {
    write_doc(&references_dir.join(RAW_BASENAME), &render_raw_index(catalog))?;
    write_doc(
        &references_dir.join(FULLTEXT_BASENAME),
        &render_fulltext(catalog, references_dir),
    )?;
    write_doc(
        &references_dir.join(CURATED_BASENAME),
        &render_curated(catalog, references_dir, excluded_slugs),
    )?;
    Ok(())
}

/// Raw index: metadata and abstract for every row, whatever its status.
/// Needs no page lookups, so it renders even when every fetch failed.
pub fn render_raw_index(catalog: &Catalog) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("# Apple HIG Raw Index (iOS-focused usage)".to_string());
    lines.push(String::new());
    lines.push("This file is auto-generated from Apple source endpoints.".to_string());
    lines.push(format!("Generated at: {}", catalog.generated_at));
    lines.push(String::new());
    lines.push("## Source endpoints".to_string());
    lines.push(String::new());
    lines.push(format!("- Index JSON: `{}`", catalog.index_url));
    lines.push(format!("- Page JSON pattern: `{}{{path}}.json`", catalog.page_base));
    lines.push(String::new());
    lines.push("## Pages".to_string());
    lines.push(String::new());

    for row in &catalog.rows {
        lines.push(format!("### {}", row.title));
        lines.push(String::new());
        lines.push(format!("- Path: `{}`", row.path));
        lines.push(format!("- Kind: `{}`", row.kind));
        if let Some(parent) = &row.parent_path {
            lines.push(format!("- Parent: `{}`", parent));
        }
        lines.push(format!("- Source URL: {}", row.source_url));
        lines.push(format!("- Data URL: {}", row.data_url));
        lines.push(format!("- Local JSON: `{}`", row.local_json));
        if row.abstract_text.is_empty() {
            lines.push("- Abstract: (empty)".to_string());
        } else {
            lines.push(format!("- Abstract: {}", row.abstract_text));
        }
        lines.push(format!("- Download: `{}`", row.download_status));
        lines.push(String::new());
    }

    finish(lines)
}

/// Full-text dump: one section per successfully fetched row, with the
/// flattened text of its mirrored page JSON. Rows whose mirror file is
/// missing or unparsable are skipped.
pub fn render_fulltext(catalog: &Catalog, references_dir: &Path) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("# Apple HIG Full Text Dump (iOS-focused usage)".to_string());
    lines.push(String::new());
    lines.push("This file is auto-generated from Apple source endpoints.".to_string());
    lines.push("The content below is extracted from all `text` fields in each page JSON.".to_string());
    lines.push(format!("Generated at: {}", catalog.generated_at));
    lines.push(String::new());

    for row in &catalog.rows {
        if row.download_status != DownloadStatus::Ok {
            continue;
        }
        let Some(page) = read_mirrored_page(references_dir, row) else {
            continue;
        };

        lines.push(format!("## {}", row.title));
        lines.push(String::new());
        lines.push(format!("- Path: `{}`", row.path));
        lines.push(format!("- Source URL: {}", row.source_url));
        lines.push(format!("- Data URL: {}", row.data_url));
        lines.push(String::new());
        lines.push(section_text(&page));
        lines.push(String::new());
    }

    finish(lines)
}

/// Curated dump: the full-text rendering restricted to curated rows, with
/// the included-page count recorded in the header.
pub fn render_curated(
    catalog: &Catalog,
    references_dir: &Path,
    excluded_slugs: &[String],
) -> String {
    let curated: Vec<&CatalogRow> = catalog
        .rows
        .iter()
        .filter(|row| is_curated(row, excluded_slugs))
        .collect();

    let mut lines: Vec<String> = Vec::new();
    lines.push("# Apple HIG iOS Curated Text".to_string());
    lines.push(String::new());
    lines.push("This file is auto-generated for practical iOS design-spec writing.".to_string());
    lines.push("It excludes index/module/symbol nodes and non-iOS platform overview pages.".to_string());
    lines.push(format!("Generated at: {}", catalog.generated_at));
    lines.push(format!("Included pages: {}", curated.len()));
    lines.push(String::new());

    for row in curated {
        let Some(page) = read_mirrored_page(references_dir, row) else {
            continue;
        };

        lines.push(format!("## {}", row.title));
        lines.push(String::new());
        lines.push(format!("- Path: `{}`", row.path));
        lines.push(format!("- Source URL: {}", row.source_url));
        lines.push(String::new());
        lines.push(section_text(&page));
        lines.push(String::new());
    }

    finish(lines)
}

fn section_text(page: &Value) -> String {
    let full_text = extract_full_text(page);
    if full_text.is_empty() {
        "(no extracted text)".to_string()
    } else {
        full_text
    }
}

/// Load a row's mirrored page JSON; None when missing or unparsable.
fn read_mirrored_page(references_dir: &Path, row: &CatalogRow) -> Option<Value> {
    let path = references_dir.join(&row.local_json);
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

fn finish(lines: Vec<String>) -> String {
    let mut doc = lines.join("\n").trim_end().to_string();
    doc.push('\n');
    doc
}

fn write_doc(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// ── Tests ──
