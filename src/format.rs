//! Output format table.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GatewayError, Result};

/// The response formats the gateway can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Measurement rows as returned by the backend
    Csv,
    /// The metadata sidecar
    Json,
    /// Both files bundled in a zip archive
    Zip,
}

impl OutputFormat {
    /// All formats, in matching priority order
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Zip];

    /// Resolve a `format` parameter.
    ///
    /// Matching is by substring so that both `csv` and a MIME type such as
    /// `text/csv` select the same format.
    pub fn from_param(value: &str) -> Result<Self> {
        let value = value.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| value.contains(format.name()))
            .ok_or_else(|| {
                GatewayError::invalid_parameter(
                    "format",
                    format!("Unsupported format: {}. Must be one of: csv, json, zip", value),
                )
            })
    }

    /// Short name, also used as the file extension
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Zip => "zip",
        }
    }

    /// Value for the `Content-Type` header
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Json => "application/json",
            OutputFormat::Zip => "application/zip",
        }
    }

    /// Whether the measurement CSV has to be fetched for this format
    pub fn needs_data(self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::Zip)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_param_short_names() {
        assert_eq!(OutputFormat::from_param("csv").unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_param("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_param("zip").unwrap(), OutputFormat::Zip);
    }

    #[test]
    fn test_from_param_mime_types() {
        assert_eq!(OutputFormat::from_param("text/csv").unwrap(), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_param("application/zip").unwrap(),
            OutputFormat::Zip
        );
        assert_eq!(OutputFormat::from_param("JSON").unwrap(), OutputFormat::Json);
    }

    #[test]
    fn test_from_param_unknown() {
        let err = OutputFormat::from_param("netcdf").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidParameter { ref param, .. } if param == "format"));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(OutputFormat::Csv.content_type(), "text/csv");
        assert_eq!(OutputFormat::Json.content_type(), "application/json");
        assert_eq!(OutputFormat::Zip.content_type(), "application/zip");
        assert!(OutputFormat::Zip.needs_data());
        assert!(!OutputFormat::Json.needs_data());
    }
}
