//! Rule-extension config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use latprobe_core::error::{LatProbeError, Result};

pub use schema::{ConnectionPoolEntry, ProbeConfig, RulesSection, ThreadPoolEntry};

pub fn load_from_file(path: &Path) -> Result<ProbeConfig> {
    let s = fs::read_to_string(path).map_err(|e| {
        LatProbeError::BadConfig(format!("read config {} failed: {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ProbeConfig> {
    let cfg: ProbeConfig = serde_yaml::from_str(s)
        .map_err(|e| LatProbeError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
