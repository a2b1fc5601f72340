//! Track metadata sidecar.
//!
//! The backend returns full Solr documents; only a whitelisted subset of their
//! fields is kept and written next to the measurement CSV.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, Result};

/// Field list used when the track lists no variables
pub const ALL_MEASUREMENT_FIELDS: &str = "*_d";

/// Whitelisted track metadata.
///
/// Fields are declared in alphabetical order so the serialized sidecar has
/// sorted keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Copied from the document's `project` field
    #[serde(default)]
    pub datasource: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub instrument: Value,
    #[serde(default)]
    pub mission: Value,
    #[serde(default)]
    pub platform: Value,
    #[serde(default)]
    pub program: Value,
    #[serde(default)]
    pub source_id: Value,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub variables: Value,
    #[serde(default)]
    pub variables_units: Value,
}

impl TrackMetadata {
    /// Pick the whitelisted fields out of a Solr document
    pub fn from_document(doc: &Value) -> Self {
        let field = |name: &str| doc.get(name).cloned().unwrap_or(Value::Null);
        Self {
            datasource: field("project"),
            description: field("description"),
            instrument: field("instrument"),
            mission: field("mission"),
            platform: field("platform"),
            program: field("program"),
            source_id: field("source_id"),
            title: field("title"),
            variables: field("variables"),
            variables_units: field("variables_units"),
        }
    }

    /// Extract the first document of a Solr JSON response
    pub fn from_solr_response(body: &[u8]) -> Result<Self> {
        let response: Value =
            serde_json::from_slice(body).map_err(|_| GatewayError::DataNotAvailable)?;
        response
            .pointer("/response/docs/0")
            .map(Self::from_document)
            .ok_or(GatewayError::DataNotAvailable)
    }

    /// Read a sidecar back from disk
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Render the sidecar with four-space indentation.
    ///
    /// Non-ASCII text is written as raw UTF-8 rather than `\uXXXX` escapes, so the
    /// bytes can differ from sidecars cached by an ASCII-escaping writer even though
    /// the parsed content is the same.
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| GatewayError::Server {
            message: format!("Metadata is not valid UTF-8: {}", e),
        })
    }

    /// Datasource of the track, when it is a plain string
    pub fn datasource(&self) -> Option<&str> {
        self.datasource.as_str().filter(|s| !s.is_empty())
    }

    /// Backend field names of the track's measured variables
    pub fn field_names(&self) -> Vec<String> {
        let names: Vec<String> = self
            .variables
            .as_array()
            .map(|vars| {
                vars.iter()
                    .filter_map(Value::as_str)
                    .map(|var| format!("{}_d", var.to_lowercase().replace(' ', "_")))
                    .collect()
            })
            .unwrap_or_default();

        if names.is_empty() {
            vec![ALL_MEASUREMENT_FIELDS.to_string()]
        } else {
            names
        }
    }
}
