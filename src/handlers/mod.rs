//! HTTP request handlers for the trackgate API.
//!
//! This module contains the endpoint handlers for the web server.

pub mod data;

pub use data::data_handler;
