//! Request parameter parsing and validation.
//!
//! [`DataQuery`] is the raw query string as axum deserializes it. [`DataRequest`] is
//! the validated form every later stage works with, with defaults applied and
//! wildcards represented as `None`.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{GatewayError, Result};
use crate::format::OutputFormat;

/// Wildcard accepted by the backend for an open value or range bound
pub const WILDCARD: &str = "*";

/// Query parameters for the data endpoint
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DataQuery {
    /// Backend identifier of the track (required)
    pub source_id: Option<String>,
    /// Program the track belongs to
    pub program: Option<String>,
    /// Datasource the track belongs to
    pub datasource: Option<String>,
    /// Project the track belongs to (defaults to `datasource`)
    pub project: Option<String>,
    /// Output format (csv, json or zip)
    pub format: Option<String>,
    pub lat_min: Option<String>,
    pub lat_max: Option<String>,
    pub lon_min: Option<String>,
    pub lon_max: Option<String>,
    /// ISO-8601 start of the measurement window
    pub start_date: Option<String>,
    /// ISO-8601 end of the measurement window
    pub end_date: Option<String>,
    pub depth_min: Option<String>,
    pub depth_max: Option<String>,
}

/// Geographic bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for BoundingBox {
    /// The whole globe
    fn default() -> Self {
        Self {
            lat_min: -90.0,
            lat_max: 90.0,
            lon_min: -180.0,
            lon_max: 180.0,
        }
    }
}

/// A validated data request
#[derive(Debug, Clone, PartialEq)]
pub struct DataRequest {
    /// Program, `None` when wildcarded
    pub program: Option<String>,
    /// Project, `None` when wildcarded
    pub project: Option<String>,
    pub source_id: String,
    pub bbox: BoundingBox,
    /// Start of the window, `None` for open-ended
    pub start_date: Option<String>,
    pub end_date: String,
    pub depth_min: Option<f64>,
    pub depth_max: Option<f64>,
    pub format: OutputFormat,
}

impl DataRequest {
    /// Validate a raw query, filling in defaults.
    ///
    /// `now` supplies the default `end_date`.
    pub fn from_query(
        query: &DataQuery,
        default_format: OutputFormat,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let source_id = present(&query.source_id).ok_or_else(|| GatewayError::MissingParameter {
            param: "source_id".to_string(),
        })?;

        let program = concrete(&query.program);
        let datasource = concrete(&query.datasource);
        let project = concrete(&query.project).or(datasource);
        if program.is_none() && project.is_none() {
            return Err(GatewayError::MissingParameter {
                param: "program or datasource".to_string(),
            });
        }

        if source_id.contains(WILDCARD) {
            return Err(GatewayError::InvalidSourceId);
        }

        let format = match present(&query.format) {
            Some(value) => OutputFormat::from_param(value)?,
            None => default_format,
        };

        let defaults = BoundingBox::default();
        let bbox = BoundingBox {
            lat_min: parse_float("lat_min", &query.lat_min)?.unwrap_or(defaults.lat_min),
            lat_max: parse_float("lat_max", &query.lat_max)?.unwrap_or(defaults.lat_max),
            lon_min: parse_float("lon_min", &query.lon_min)?.unwrap_or(defaults.lon_min),
            lon_max: parse_float("lon_max", &query.lon_max)?.unwrap_or(defaults.lon_max),
        };

        let end_date = match present(&query.end_date) {
            Some(end) => end.to_string(),
            None => now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        };

        Ok(Self {
            program: program.map(str::to_string),
            project: project.map(str::to_string),
            source_id: source_id.to_string(),
            bbox,
            start_date: present(&query.start_date).map(str::to_string),
            end_date,
            depth_min: parse_float("depth_min", &query.depth_min)?,
            depth_max: parse_float("depth_max", &query.depth_max)?,
            format,
        })
    }

    /// The grouping value that leads the cache filename: the program when one was
    /// given, the project otherwise.
    pub fn label(&self) -> &str {
        self.program
            .as_deref()
            .or(self.project.as_deref())
            .unwrap_or(WILDCARD)
    }
}

/// A parameter value, treating empty strings as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A parameter value that is neither absent nor the wildcard
fn concrete(value: &Option<String>) -> Option<&str> {
    present(value).filter(|v| *v != WILDCARD)
}

fn parse_float(param: &str, value: &Option<String>) -> Result<Option<f64>> {
    present(value)
        .map(|raw| {
            raw.trim().parse::<f64>().map_err(|_| {
                GatewayError::invalid_parameter(param, format!("'{}' is not a number", raw))
            })
        })
        .transpose()
}
