//! Assertion utilities for testing.
//!
//! Helpers for inspecting download responses and zip bundles.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use reqwest::header::HeaderMap;

/// Read every entry of a zip archive into memory, keyed by entry name.
///
/// # Panics
///
/// Panics if the bytes are not a readable zip archive.
pub fn zip_entries(bytes: &[u8]) -> BTreeMap<String, Vec<u8>> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("Response is not a zip archive");
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).expect("Failed to read zip entry");
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .expect("Failed to decompress zip entry");
        entries.insert(file.name().to_string(), content);
    }
    entries
}

/// Assert that a header is present with the expected value.
///
/// # Panics
///
/// Panics if the header is missing or differs.
pub fn assert_header(headers: &HeaderMap, name: &str, expected: &str) {
    let value = headers
        .get(name)
        .unwrap_or_else(|| panic!("Missing header {}", name))
        .to_str()
        .expect("Header is not valid ASCII");
    assert_eq!(value, expected, "Unexpected value for header {}", name);
}

/// Extract the filename from an `attachment; filename="..."` header value
pub fn attachment_filename(headers: &HeaderMap) -> String {
    let value = headers
        .get("content-disposition")
        .expect("Missing Content-Disposition header")
        .to_str()
        .expect("Header is not valid ASCII");
    value
        .strip_prefix("attachment; filename=\"")
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or_else(|| panic!("Not an attachment header: {}", value))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_attachment_filename() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-disposition",
            HeaderValue::from_static("attachment; filename=\"a_b.zip\""),
        );
        assert_eq!(attachment_filename(&headers), "a_b.zip");
        assert_header(&headers, "content-disposition", "attachment; filename=\"a_b.zip\"");
    }
}
