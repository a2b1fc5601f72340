//! # trackgate
//!
//! A small HTTP gateway that serves oceanographic track data held in a Solr index.
//!
//! A single `GET /iss` endpoint takes simplified query parameters (program,
//! datasource, source_id, bounding box, date and depth ranges), turns them into Solr
//! queries, caches the answers on disk and returns them as CSV, JSON or a zip of both.
//!
//! ## Architecture
//!
//! - **Front door**: [`router`] and [`handlers`] expose the endpoint and set download headers
//! - **Validation**: [`query`] turns raw parameters into a [`DataRequest`]
//! - **Backend**: [`solr`] builds and issues the metadata and measurement queries
//! - **Cache**: [`cache`] derives filenames and manages the output directory
//! - **Assembly**: [`service`] ties it together, [`archive`] builds zip bundles

pub mod archive;
pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod handlers;
pub mod logging;
pub mod metadata;
pub mod query;
pub mod router;
pub mod service;
pub mod solr;
pub mod state;

pub use config::Config;
pub use error::{GatewayError, Result};
pub use format::OutputFormat;
pub use logging::{create_http_trace_layer, generate_request_id, init_tracing};
pub use query::{DataQuery, DataRequest};
pub use router::build_app;
pub use state::AppState;
