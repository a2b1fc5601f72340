//! HTTP client utilities for testing.
//!
//! This module provides helper functions for making HTTP requests to the trackgate
//! server during tests.

use reqwest::{Client, Response, Url};
use std::error::Error;
use std::net::SocketAddr;
use std::time::Duration;

/// Default timeout for HTTP requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Origin sent with every test request so CORS headers are produced
pub const TEST_ORIGIN: &str = "http://viewer.example.org";

/// Create a default test client
pub fn create_test_client() -> Client {
    Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .no_proxy()
        .build()
        .expect("Failed to build test HTTP client")
}

/// Build a URL for a trackgate server endpoint
pub fn build_url(addr: &SocketAddr, path: &str) -> Url {
    format!("http://{}{}", addr, path)
        .parse()
        .expect("Failed to parse URL")
}

/// Make a GET request to the trackgate server
pub async fn get(addr: &SocketAddr, path: &str) -> Result<Response, Box<dyn Error>> {
    let client = create_test_client();
    let url = build_url(addr, path);
    println!("Making request to: {}", url);
    Ok(client
        .get(url)
        .header(reqwest::header::ORIGIN, TEST_ORIGIN)
        .send()
        .await?)
}

/// Send a CORS preflight for a GET to the trackgate server
pub async fn preflight(addr: &SocketAddr, path: &str) -> Result<Response, Box<dyn Error>> {
    let client = create_test_client();
    let url = build_url(addr, path);
    Ok(client
        .request(reqwest::Method::OPTIONS, url)
        .header(reqwest::header::ORIGIN, TEST_ORIGIN)
        .header(reqwest::header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .send()
        .await?)
}

/// Make a GET request and return the status and body text
pub async fn get_text(addr: &SocketAddr, path: &str) -> Result<(u16, String), Box<dyn Error>> {
    let response = get(addr, path).await?;
    let status = response.status().as_u16();
    Ok((status, response.text().await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let addr: SocketAddr = ([127, 0, 0, 1], 8104).into();
        let url = build_url(&addr, "/iss?source_id=1");
        assert_eq!(url.as_str(), "http://127.0.0.1:8104/iss?source_id=1");
    }
}
