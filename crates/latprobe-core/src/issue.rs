//! Issue records produced by the detector.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// What kind of latency cause was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    ThreadPoolSaturation,
    ConnectionPoolSaturation,
    LatencyTail,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::ThreadPoolSaturation => "thread_pool_saturation",
            IssueKind::ConnectionPoolSaturation => "connection_pool_saturation",
            IssueKind::LatencyTail => "latency_tail",
        }
    }

    /// Human title: `Thread Pool Saturation`.
    pub fn title(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Kind-specific figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IssueDetail {
    /// Pool usage: `current / max * 100`.
    Usage { percent: f64, current: f64, max: f64 },
    /// Latency tail, values in seconds.
    Tail { p50: f64, p95: f64 },
}

impl IssueDetail {
    /// `95.0%`
    pub fn usage(&self) -> Option<String> {
        match self {
            IssueDetail::Usage { percent, .. } => Some(format!("{percent:.1}%")),
            IssueDetail::Tail { .. } => None,
        }
    }

    /// (`p50`, `p95`, `ratio`) as `12.0ms`, `50.0ms`, `4.2x`. A zero p50 has
    /// no finite ratio and renders as `unbounded`.
    pub fn tail(&self) -> Option<(String, String, String)> {
        match self {
            IssueDetail::Usage { .. } => None,
            IssueDetail::Tail { p50, p95 } => Some((
                format_ms(*p50),
                format_ms(*p95),
                ratio_text(*p50, *p95).unwrap_or_else(|| "unbounded".to_string()),
            )),
        }
    }
}

pub(crate) fn format_ms(seconds: f64) -> String {
    format!("{:.1}ms", seconds * 1000.0)
}

/// `p95 / p50` as `4.2x`; `None` when p50 is not positive.
pub(crate) fn ratio_text(p50: f64, p95: f64) -> Option<String> {
    (p50 > 0.0).then(|| format!("{:.1}x", p95 / p50))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    /// Metric identifier (pattern pair or histogram name).
    pub metric: String,
    pub detail: IssueDetail,
    pub explanation: String,
}

// Flat record: `type`, `severity`, `metric`, the kind-specific formatted
// figures, then `explanation`.
impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.kind)?;
        map.serialize_entry("severity", &self.severity)?;
        map.serialize_entry("metric", &self.metric)?;
        if let Some(usage) = self.detail.usage() {
            map.serialize_entry("usage", &usage)?;
        }
        if let Some((p50, p95, ratio)) = self.detail.tail() {
            map.serialize_entry("p50", &p50)?;
            map.serialize_entry("p95", &p95)?;
            map.serialize_entry("ratio", &ratio)?;
        }
        map.serialize_entry("explanation", &self.explanation)?;
        map.end()
    }
}
