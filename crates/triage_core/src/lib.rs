//! Screenshot triage from pixel statistics.
//!
//! [`extract`] turns one image into [`ImageStatistics`]; [`classify`] maps
//! those to a [`Category`]. [`analyze_batch`] runs both over many files in
//! parallel, and [`scan_folder`] finds the files in the first place.

pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod report;
pub mod stats;

pub use batch::{
    ImageReport, Outcome, Summary, analyze_batch, analyze_batch_with_progress, analyze_one,
};
pub use classify::{Category, Signals, classify};
pub use config::Thresholds;
pub use error::{AnalyzeError, ConfigError, Failure};
pub use report::{export_csv, export_json};
pub use stats::{COMMON_SAMPLE_LEN, ImageStatistics, extract, extract as analyze};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Options controlling how folder scanning behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// When true, scan subdirectories recursively.
    pub recursive: bool,
}

/// Scan a folder for screenshots, non-recursively.
pub fn scan_folder(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    scan_folder_with(path, ScanOptions::default())
}

/// Scan a folder with options. Results are sorted by path.
pub fn scan_folder_with(path: impl AsRef<Path>, opts: ScanOptions) -> Result<Vec<PathBuf>> {
    let root = path.as_ref();
    if !root.exists() {
        anyhow::bail!("Path does not exist: {}", root.display());
    }
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let walker = if opts.recursive {
        WalkDir::new(root).into_iter()
    } else {
        WalkDir::new(root).max_depth(1).into_iter()
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("walkdir error: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && is_supported_image(path) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();

    Ok(files)
}

/// True when the extension is one of the screenshot formats picked up by folder scans.
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            matches!(
                ext.as_str(),
                "png" | "jpg" | "jpeg" | "bmp" | "webp" | "gif"
            )
        }
        None => false,
    }
}
