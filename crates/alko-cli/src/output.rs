//! JSON output for a finished run.

use std::path::Path;

use alko_core::ProductRecord;
use anyhow::Context;
use serde::Serialize;

/// Writes `records` to `path` as a 4-space indented JSON array, creating
/// missing parent directories. Non-ASCII text is written as-is.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, serialization fails,
/// or the file cannot be written.
pub(crate) fn write_aggregate(path: &Path, records: &[ProductRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut serializer)
        .context("failed to serialize products")?;

    std::fs::write(path, &buf)
        .with_context(|| format!("failed to write output file {}", path.display()))?;
    Ok(())
}

/// Orders records by canonical URL.
pub(crate) fn sort_by_url(records: &mut [ProductRecord]) {
    records.sort_by(|a, b| a.url.cmp(&b.url));
}
