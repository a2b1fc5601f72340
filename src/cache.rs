//! On-disk cache of backend responses.
//!
//! Each request maps to a filename stem derived from its parameters. The metadata
//! sidecar is stored as `<stem>.json` and the measurement rows as `<stem>.csv`, both
//! under the configured output directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::query::DataRequest;

/// Build the cache filename stem for a request.
///
/// The stem is a pure function of the request parameters, so identical requests
/// always land on the same files.
pub fn cache_stem(request: &DataRequest) -> String {
    let mut depth = String::new();
    if let Some(depth_min) = request.depth_min {
        depth.push_str(&format!("__{:.2}", depth_min));
    }
    if let Some(depth_max) = request.depth_max {
        if request.depth_min.is_none() {
            depth.push_str("__0");
        }
        depth.push_str(&format!("_{:.2}", depth_max));
    }

    let start = request
        .start_date
        .as_deref()
        .map(|start| format!("{}_", compact_date(start)))
        .unwrap_or_default();

    let bbox = &request.bbox;
    let raw = format!(
        "{}_{}{}__{:.2}_{:.2}_{:.2}_{:.2}__{}{}",
        request.label(),
        request.source_id,
        depth,
        bbox.lon_min,
        bbox.lon_max,
        bbox.lat_min,
        bbox.lat_max,
        start,
        compact_date(&request.end_date),
    );

    sanitize(&raw)
}

/// Name a cached file is served under.
///
/// When the request was keyed by program the stem leads with the program; the
/// download name swaps that leading segment for the resolved project.
pub fn download_name(file_name: &str, project: Option<&str>) -> String {
    let Some(project) = project else {
        return file_name.to_string();
    };
    if file_name.contains(project) {
        return file_name.to_string();
    }
    match file_name.split_once('_') {
        Some((_, rest)) => format!("{}_{}", project, rest),
        None => file_name.to_string(),
    }
}

fn compact_date(date: &str) -> String {
    date.chars()
        .filter(|c| !matches!(c, ':' | '-' | 'T' | 'Z'))
        .collect()
}

fn sanitize(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    kept.trim_end().to_string()
}

/// The cache directory
#[derive(Debug, Clone)]
pub struct CacheDir {
    root: PathBuf,
    keep_files: bool,
}

impl CacheDir {
    /// Create a cache rooted at `root`. With `keep_files` unset, files are removed
    /// once a response has been assembled from them.
    pub fn new(root: impl Into<PathBuf>, keep_files: bool) -> Self {
        Self {
            root: root.into(),
            keep_files,
        }
    }

    /// Create the cache directory if it does not exist yet
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Root directory of the cache
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether cached files outlive the request that fetched them
    pub fn keeps_files(&self) -> bool {
        self.keep_files
    }

    /// Files belonging to a request
    pub fn entry(&self, request: &DataRequest) -> CacheEntry {
        let stem = cache_stem(request);
        CacheEntry {
            csv_path: self.root.join(format!("{}.csv", stem)),
            json_path: self.root.join(format!("{}.json", stem)),
            stem,
        }
    }

    /// Drop the files of an entry unless the cache is configured to keep them
    pub async fn release(&self, entry: &CacheEntry) -> Result<()> {
        if self.keep_files {
            return Ok(());
        }
        self.remove(entry).await
    }

    /// Drop the files of an entry regardless of the cache setting
    pub async fn remove(&self, entry: &CacheEntry) -> Result<()> {
        for path in [&entry.csv_path, &entry.json_path] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => debug!(path = %path.display(), "Removed cache file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// The cache files of a single request
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub stem: String,
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
}

impl CacheEntry {
    pub fn csv_name(&self) -> String {
        format!("{}.csv", self.stem)
    }

    pub fn json_name(&self) -> String {
        format!("{}.json", self.stem)
    }

    pub fn zip_name(&self) -> String {
        format!("{}.zip", self.stem)
    }
}

/// Whether a cache file is already present
pub async fn is_cached(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
