//! Metrics file loading.

use std::fs;
use std::io;
use std::path::Path;

use latprobe_core::error::{LatProbeError, Result};

/// Read the whole metrics snapshot. A missing file and any other read
/// failure are reported as distinct errors.
pub fn read_metrics(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LatProbeError::NotFound(path.display().to_string()),
        _ => LatProbeError::Unreadable(e.to_string()),
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "metrics file loaded");
    Ok(text)
}
