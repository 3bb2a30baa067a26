//! latprobe cli library entry.
//!
//! Holds the pieces the `latprobe` binary wires together: metrics file
//! loading, the optional rule-extension config, and report rendering. Kept as
//! a library so integration tests can drive them without spawning a process.

pub mod config;
pub mod input;
pub mod report;

use latprobe_core::{Issue, IssueDetector, MetricSet, RuleSet};

/// Parse a metrics snapshot and run every check against it.
pub fn analyze(metrics_text: &str, rules: RuleSet) -> Vec<Issue> {
    let metrics = MetricSet::parse(metrics_text);
    IssueDetector::with_rules(&metrics, rules).detect_all()
}
