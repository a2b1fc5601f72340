//! Request orchestration.
//!
//! Resolves a validated request into a response body: metadata and measurements are
//! read from the disk cache when present and fetched from the backend otherwise,
//! then shaped into the requested format.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::archive::{bundle, BundleEntry};
use crate::cache::{download_name, is_cached, CacheEntry};
use crate::error::Result;
use crate::format::OutputFormat;
use crate::metadata::TrackMetadata;
use crate::query::DataRequest;
use crate::state::AppState;

/// An assembled response
#[derive(Debug, Clone)]
pub struct DataResponse {
    pub format: OutputFormat,
    /// Name offered to the client in `Content-Disposition`
    pub filename: String,
    pub body: Bytes,
}

/// Produce the response for a request, releasing its cache files afterwards
pub async fn get_data(state: &AppState, request: &DataRequest) -> Result<DataResponse> {
    let entry = state.cache.entry(request);
    let result = assemble(state, request, &entry).await;

    if let Err(e) = state.cache.release(&entry).await {
        warn!(error = %e, stem = %entry.stem, "Failed to release cache files");
    }

    result
}

async fn assemble(
    state: &AppState,
    request: &DataRequest,
    entry: &CacheEntry,
) -> Result<DataResponse> {
    let metadata = load_metadata(state, request, entry).await?;
    let project = request
        .project
        .clone()
        .or_else(|| metadata.datasource().map(str::to_string));

    if request.format.needs_data() {
        ensure_data(state, request, entry, project.as_deref(), &metadata).await?;
    }

    let (filename, body) = match request.format {
        OutputFormat::Csv => (
            entry.csv_name(),
            Bytes::from(tokio::fs::read(&entry.csv_path).await?),
        ),
        OutputFormat::Json => (
            entry.json_name(),
            Bytes::from(tokio::fs::read(&entry.json_path).await?),
        ),
        OutputFormat::Zip => {
            let csv = tokio::fs::read(&entry.csv_path).await?;
            let json = tokio::fs::read(&entry.json_path).await?;
            let csv_name = download_name(&entry.csv_name(), project.as_deref());
            let json_name = download_name(&entry.json_name(), project.as_deref());
            let archive = bundle(&[
                BundleEntry {
                    name: &csv_name,
                    content: &csv,
                },
                BundleEntry {
                    name: &json_name,
                    content: &json,
                },
            ])?;
            // Bundled files are never kept, whatever the cache setting
            state.cache.remove(entry).await?;
            (entry.zip_name(), Bytes::from(archive))
        }
    };

    Ok(DataResponse {
        format: request.format,
        filename: download_name(&filename, project.as_deref()),
        body,
    })
}

/// Read the metadata sidecar, fetching it from the backend on a cache miss
async fn load_metadata(
    state: &AppState,
    request: &DataRequest,
    entry: &CacheEntry,
) -> Result<TrackMetadata> {
    if is_cached(&entry.json_path).await {
        debug!(stem = %entry.stem, "Metadata cache hit");
        let content = tokio::fs::read_to_string(&entry.json_path).await?;
        return TrackMetadata::from_json(&content);
    }

    let url = state.solr.metadata_url(request);
    let metadata = state.solr.fetch_metadata(url).await?;
    tokio::fs::write(&entry.json_path, metadata.to_pretty_json()?).await?;
    Ok(metadata)
}

/// Make sure the measurement CSV is on disk
async fn ensure_data(
    state: &AppState,
    request: &DataRequest,
    entry: &CacheEntry,
    project: Option<&str>,
    metadata: &TrackMetadata,
) -> Result<()> {
    if is_cached(&entry.csv_path).await {
        debug!(stem = %entry.stem, "Data cache hit");
        return Ok(());
    }

    let url = state.solr.data_url(request, project, &metadata.field_names());
    let body = state.solr.fetch_data(url).await?;
    tokio::fs::write(&entry.csv_path, &body).await?;
    Ok(())
}
