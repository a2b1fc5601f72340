//! Configuration management for trackgate.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{GatewayError, Result};
use crate::format::OutputFormat;

/// Command-line arguments for trackgate
#[derive(Parser, Debug, Default)]
#[command(name = "trackgate")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host address to bind to
    #[arg(short = 'H', long, env = "TRACKGATE_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "TRACKGATE_PORT")]
    pub port: Option<u16>,

    /// Number of worker threads
    #[arg(short, long, env = "TRACKGATE_WORKERS")]
    pub workers: Option<usize>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "TRACKGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Solr select endpoint queried for tracks and measurements
    #[arg(long, env = "TRACKGATE_SOLR_URL")]
    pub solr_url: Option<String>,

    /// Backend request timeout in seconds
    #[arg(long, env = "TRACKGATE_BACKEND_TIMEOUT")]
    pub backend_timeout: Option<u64>,

    /// Directory holding cached metadata and data files
    #[arg(short, long, env = "TRACKGATE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Format served when a request does not specify one (csv, json, zip)
    #[arg(long, env = "TRACKGATE_DEFAULT_FORMAT")]
    pub default_format: Option<String>,

    /// Keep cached files after serving them
    #[arg(long, env = "TRACKGATE_CACHE_FILES")]
    pub cache_files: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TRACKGATE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads (None = number of CPU cores)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Search backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Solr select endpoint
    #[serde(default = "default_solr_url")]
    pub solr_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Output and cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for cached files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Format used when a request has none
    #[serde(default = "default_format")]
    pub default_format: String,

    /// Keep cached files between requests
    #[serde(default)]
    pub cache_files: bool,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Build the configuration from parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments and environment
        config.apply_args(args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.server.host = other.server.host;
        self.server.port = other.server.port;
        if other.server.workers.is_some() {
            self.server.workers = other.server.workers;
        }
        self.backend = other.backend;
        self.output = other.output;
        self.log_level = other.log_level;
    }

    fn apply_args(&mut self, args: Args) {
        if let Some(host) = args.host {
            self.server.host = host;
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if args.workers.is_some() {
            self.server.workers = args.workers;
        }
        if let Some(solr_url) = args.solr_url {
            self.backend.solr_url = solr_url;
        }
        if let Some(timeout) = args.backend_timeout {
            self.backend.timeout_secs = timeout;
        }
        if let Some(output_dir) = args.output_dir {
            self.output.output_dir = output_dir;
        }
        if let Some(format) = args.default_format {
            self.output.default_format = format;
        }
        if args.cache_files {
            self.output.cache_files = true;
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate server host (must be a valid IP or hostname)
        if self.server.host.is_empty() {
            return Err(GatewayError::Config {
                message: "Server host cannot be empty".to_string(),
            });
        }

        // Validate port (0 is not a valid port for users)
        if self.server.port == 0 {
            return Err(GatewayError::Config {
                message: "Server port cannot be 0".to_string(),
            });
        }

        if self.server.workers == Some(0) {
            return Err(GatewayError::Config {
                message: "Worker count cannot be 0".to_string(),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(GatewayError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        url::Url::parse(&self.backend.solr_url).map_err(|e| GatewayError::Config {
            message: format!("Invalid Solr URL {}: {}", self.backend.solr_url, e),
        })?;

        if self.backend.timeout_secs == 0 {
            return Err(GatewayError::Config {
                message: "Backend timeout cannot be 0".to_string(),
            });
        }

        OutputFormat::from_param(&self.output.default_format).map_err(|_| {
            GatewayError::Config {
                message: format!(
                    "Invalid default format: {}. Must be one of: csv, json, zip",
                    self.output.default_format
                ),
            }
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            output: OutputConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            solr_url: default_solr_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_format: default_format(),
            cache_files: false,
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8104
}

fn default_solr_url() -> String {
    "http://localhost/solr/".to_string()
}

fn default_timeout_secs() -> u64 {
    900
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_format() -> String {
    "zip".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
