//! In-memory zip bundles.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// A named file to place in a bundle
#[derive(Debug, Clone, Copy)]
pub struct BundleEntry<'a> {
    pub name: &'a str,
    pub content: &'a [u8],
}

/// Deflate the given entries into a zip archive held in memory
pub fn bundle(entries: &[BundleEntry<'_>]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        writer.start_file(entry.name, options)?;
        writer.write_all(entry.content)?;
    }

    Ok(writer.finish()?.into_inner())
}
