//! Common test utilities for trackgate.
//!
//! This module provides shared utilities for testing the trackgate server.
#![allow(dead_code)]

// Re-export all common test utilities
pub mod assertions;
pub mod fake_solr;
pub mod http_client;
