//! Application state management for trackgate.
//!
//! This module defines the shared state that is passed to all handlers: the
//! configuration, the backend client and the disk cache.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheDir;
use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormat;
use crate::solr::SolrClient;

/// The main application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Client for the Solr select endpoint
    pub solr: SolrClient,
    /// Cache of backend responses
    pub cache: CacheDir,
    /// Format used when a request does not name one
    pub default_format: OutputFormat,
}

impl AppState {
    /// Build the state from a configuration
    pub fn new(config: Config) -> Result<Self> {
        let solr = SolrClient::new(
            &config.backend.solr_url,
            Duration::from_secs(config.backend.timeout_secs),
        )?;
        let cache = CacheDir::new(&config.output.output_dir, config.output.cache_files);
        let default_format = OutputFormat::from_param(&config.output.default_format)?;

        Ok(Self {
            config,
            solr,
            cache,
            default_format,
        })
    }

    /// Build the state wrapped in an Arc for shared ownership, creating the
    /// output directory on the way
    pub async fn new_shared(config: Config) -> Result<Arc<Self>> {
        let state = Self::new(config)?;
        state.cache.ensure().await?;
        Ok(Arc::new(state))
    }
}
