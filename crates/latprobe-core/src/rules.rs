//! Rule tables for the detector.
//!
//! Each table is an ordered list; the detector walks it front to back and the
//! first resolvable entry wins. Built-in entries come first, configured
//! extensions are appended after them.

/// Usage above this percentage is reported.
pub const WARN_USAGE_PERCENT: f64 = 80.0;
/// Usage at or above this percentage is reported as `high`.
pub const HIGH_USAGE_PERCENT: f64 = 90.0;
/// p95 above this multiple of p50 is a latency tail.
pub const TAIL_RATIO: f64 = 3.0;

/// A (current, max) pair of metric name patterns for one pool flavor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolPattern {
    /// Pattern for the in-use value (busy threads / active connections).
    pub current: String,
    /// Pattern for the pool capacity.
    pub max: String,
}

impl PoolPattern {
    pub fn new(current: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            max: max.into(),
        }
    }

    /// Identifier shown in reports (`current/max`).
    pub fn label(&self) -> String {
        format!("{}/{}", self.current, self.max)
    }
}

// Micrometer dotted names first, then the underscore form Prometheus exports.
const THREAD_POOL: &[(&str, &str)] = &[
    ("tomcat.threads.busy", "tomcat.threads.max"),
    ("tomcat_threads_busy", "tomcat_threads_max"),
    ("thread_pool_active", "thread_pool_max"),
    ("threads_active", "threads_max"),
];

const CONNECTION_POOL: &[(&str, &str)] = &[
    ("hikaricp.connections.active", "hikaricp.connections.max"),
    ("hikaricp_connections_active", "hikaricp_connections_max"),
    ("db_connections_active", "db_connections_max"),
    ("connection_pool_active", "connection_pool_max"),
    ("datasource_active", "datasource_max"),
];

const LATENCY_HISTOGRAMS: &[&str] = &[
    "http_request_duration_seconds_bucket",
    "http_server_request_duration_seconds_bucket",
    "http_client_request_duration_seconds_bucket",
    "request_duration_seconds_bucket",
];

/// Ordered lookup tables consumed by [`crate::IssueDetector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pub thread_pool: Vec<PoolPattern>,
    pub connection_pool: Vec<PoolPattern>,
    pub latency_histograms: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            thread_pool: pairs(THREAD_POOL),
            connection_pool: pairs(CONNECTION_POOL),
            latency_histograms: LATENCY_HISTOGRAMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RuleSet {
    /// Append extra entries after the built-in ones (lower priority).
    pub fn extend(
        mut self,
        thread_pool: impl IntoIterator<Item = PoolPattern>,
        connection_pool: impl IntoIterator<Item = PoolPattern>,
        latency_histograms: impl IntoIterator<Item = String>,
    ) -> Self {
        self.thread_pool.extend(thread_pool);
        self.connection_pool.extend(connection_pool);
        self.latency_histograms.extend(latency_histograms);
        self
    }
}

fn pairs(raw: &[(&str, &str)]) -> Vec<PoolPattern> {
    raw.iter().map(|(c, m)| PoolPattern::new(*c, *m)).collect()
}
