//! # File Loading
//!
//! Export settings in RON, camera paths and bookmark lists in JSON.

use anyhow::{Context, Result};
use scriptcam_core::data::CameraPath;
use scriptcam_core::{Bookmark, ExportOptions};
use serde::Serialize;
use std::path::Path;

/// Parses export settings. Missing fields take their defaults.
pub fn parse_export_options(content: &str) -> Result<ExportOptions> {
    let options: ExportOptions = ron::from_str(content)?;
    Ok(options)
}

/// Load export settings from a RON file.
pub fn load_export_options(path: &Path) -> Result<ExportOptions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_export_options(&content).with_context(|| format!("Invalid config {}", path.display()))
}

pub fn read_path(path: &Path) -> Result<CameraPath> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a camera path", path.display()))
}

pub fn read_bookmarks(path: &Path) -> Result<Vec<Bookmark>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a bookmark list", path.display()))
}

/// Pretty JSON to `output`, or stdout when no file is given.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(output) => {
            std::fs::write(output, text)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("Wrote {}", output.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
