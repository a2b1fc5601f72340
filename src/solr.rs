//! Solr backend client.
//!
//! Two queries are issued per track: one against `datatype:track` documents for the
//! metadata (JSON), one against `datatype:data` documents for the measurements (CSV).

use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{GatewayError, Result};
use crate::metadata::TrackMetadata;
use crate::query::{DataRequest, WILDCARD};

/// Upper bound on the number of measurement rows requested
pub const MAX_ROWS: &str = "10000000";

/// HTTP client for the Solr select endpoint
#[derive(Debug, Clone)]
pub struct SolrClient {
    client: Client,
    base_url: Url,
}

impl SolrClient {
    /// Create a client for the select endpoint at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trackgate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the metadata query for a request
    pub fn metadata_url(&self, request: &DataRequest) -> Url {
        let q = format!(
            "datatype:track AND program:{}* AND project:{} AND source_id: {}",
            request.program.as_deref().unwrap_or(WILDCARD),
            request.project.as_deref().unwrap_or(WILDCARD),
            request.source_id,
        );
        self.select_url(&[("wt", "json"), ("q", &q)])
    }

    /// URL of the measurement query for a request.
    ///
    /// `project` overrides the request's project when it was resolved from the
    /// metadata; `fields` are the backend names of the variables to return.
    pub fn data_url(&self, request: &DataRequest, project: Option<&str>, fields: &[String]) -> Url {
        let bbox = &request.bbox;
        let q = format!(
            "datatype:data AND project:{} AND source_id: {} AND lat:[{} TO {}] AND lon:[{} TO {}] AND measurement_date_time:[{} TO {}] AND depth:[{} TO {}]",
            project.unwrap_or(WILDCARD),
            request.source_id,
            bbox.lat_min,
            bbox.lat_max,
            bbox.lon_min,
            bbox.lon_max,
            request.start_date.as_deref().unwrap_or(WILDCARD),
            request.end_date,
            bound(request.depth_min),
            bound(request.depth_max),
        );
        let fl = format!("measurement_date_time,lon,lat,depth,{}", fields.join(","));
        self.select_url(&[
            ("wt", "csv"),
            ("rows", MAX_ROWS),
            ("sort", "measurement_date_time ASC"),
            ("fl", &fl),
            ("q", &q),
        ])
    }

    /// Fetch the metadata document of a track
    pub async fn fetch_metadata(&self, url: Url) -> Result<TrackMetadata> {
        let body = self.get(url, "metadata").await?;
        TrackMetadata::from_solr_response(&body)
    }

    /// Fetch the measurement rows of a track as CSV
    pub async fn fetch_data(&self, url: Url) -> Result<Bytes> {
        let body = self.get(url, "data").await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            warn!(kind = "data", "Backend returned an empty body");
            return Err(GatewayError::DataNotAvailable);
        }
        Ok(body)
    }

    async fn get(&self, url: Url, kind: &'static str) -> Result<Bytes> {
        let start = Instant::now();
        debug!(kind = kind, url = %url, "Querying backend");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(kind = kind, status = status.as_u16(), "Backend returned an error status");
            return Err(GatewayError::DataNotAvailable);
        }
        let body = response.bytes().await?;

        info!(
            kind = kind,
            bytes = body.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Backend query completed"
        );
        Ok(body)
    }

    fn select_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs(params);
        url
    }
}

fn bound(value: Option<f64>) -> String {
    value.map_or_else(|| WILDCARD.to_string(), |v| v.to_string())
}
