use serde::Deserialize;

use latprobe_core::error::{LatProbeError, Result};
use latprobe_core::{PoolPattern, RuleSet};

/// Optional YAML config. It can only add lookup patterns; thresholds are fixed.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    pub version: u32,

    #[serde(default)]
    pub rules: RulesSection,
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(LatProbeError::UnsupportedVersion);
        }
        self.rules.validate()
    }

    /// Built-in tables with this config's entries appended.
    pub fn rule_set(&self) -> RuleSet {
        let r = &self.rules;
        RuleSet::default().extend(
            r.thread_pool
                .iter()
                .map(|e| PoolPattern::new(e.busy.as_str(), e.max.as_str())),
            r.connection_pool
                .iter()
                .map(|e| PoolPattern::new(e.active.as_str(), e.max.as_str())),
            r.latency_histograms.iter().cloned(),
        )
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RulesSection {
    #[serde(default)]
    pub thread_pool: Vec<ThreadPoolEntry>,

    #[serde(default)]
    pub connection_pool: Vec<ConnectionPoolEntry>,

    #[serde(default)]
    pub latency_histograms: Vec<String>,
}

impl RulesSection {
    pub fn validate(&self) -> Result<()> {
        for (i, e) in self.thread_pool.iter().enumerate() {
            check_pattern(&e.busy, || format!("rules.thread_pool[{i}].busy"))?;
            check_pattern(&e.max, || format!("rules.thread_pool[{i}].max"))?;
        }
        for (i, e) in self.connection_pool.iter().enumerate() {
            check_pattern(&e.active, || format!("rules.connection_pool[{i}].active"))?;
            check_pattern(&e.max, || format!("rules.connection_pool[{i}].max"))?;
        }
        for (i, p) in self.latency_histograms.iter().enumerate() {
            check_pattern(p, || format!("rules.latency_histograms[{i}]"))?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThreadPoolEntry {
    pub busy: String,
    pub max: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionPoolEntry {
    pub active: String,
    pub max: String,
}

fn check_pattern(p: &str, field: impl FnOnce() -> String) -> Result<()> {
    if p.is_empty() || p.chars().any(char::is_whitespace) {
        return Err(LatProbeError::BadConfig(format!(
            "{} must be a non-empty pattern without whitespace",
            field()
        )));
    }
    Ok(())
}
