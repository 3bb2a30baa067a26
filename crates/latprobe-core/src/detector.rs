//! Issue detector: saturation and tail-latency checks.
//!
//! Every check is a pure function over the parsed [`MetricSet`]. Checks run in
//! a fixed order (thread pool, connection pool, latency tail) and never affect
//! one another; a check with no data simply reports nothing.

use crate::issue::{format_ms, ratio_text, Issue, IssueDetail, IssueKind, Severity};
use crate::latency;
use crate::parser::MetricSet;
use crate::rules::{PoolPattern, RuleSet, HIGH_USAGE_PERCENT, TAIL_RATIO, WARN_USAGE_PERCENT};

pub struct IssueDetector<'a> {
    metrics: &'a MetricSet,
    rules: RuleSet,
}

impl<'a> IssueDetector<'a> {
    /// Detector with the built-in rule tables.
    pub fn new(metrics: &'a MetricSet) -> Self {
        Self::with_rules(metrics, RuleSet::default())
    }

    pub fn with_rules(metrics: &'a MetricSet, rules: RuleSet) -> Self {
        Self { metrics, rules }
    }

    /// Run all checks in order and collect their issues.
    pub fn detect_all(&self) -> Vec<Issue> {
        let issues: Vec<Issue> = [
            self.check_thread_pool(),
            self.check_connection_pool(),
            self.check_latency_distribution(),
        ]
        .into_iter()
        .flatten()
        .collect();

        tracing::debug!(issues = issues.len(), "detection finished");
        issues
    }

    /// Thread-pool saturation (busy / max threads).
    pub fn check_thread_pool(&self) -> Option<Issue> {
        let (pattern, percent, busy, max) = self.resolve_pool(&self.rules.thread_pool)?;
        let severity = usage_severity(percent)?;
        Some(Issue {
            kind: IssueKind::ThreadPoolSaturation,
            severity,
            metric: pattern.label(),
            detail: IssueDetail::Usage {
                percent,
                current: busy,
                max,
            },
            explanation: format!(
                "Thread pool is {percent:.1}% utilized ({busy:.1}/{max:.1} threads). \
                 Worker threads are running out, so requests queue up before they are \
                 processed and latency grows. Consider increasing the thread pool size \
                 or reducing per-request processing time."
            ),
        })
    }

    /// Database connection-pool saturation (active / max connections).
    pub fn check_connection_pool(&self) -> Option<Issue> {
        let (pattern, percent, active, max) =
            self.resolve_pool(&self.rules.connection_pool)?;
        let severity = usage_severity(percent)?;
        Some(Issue {
            kind: IssueKind::ConnectionPoolSaturation,
            severity,
            metric: pattern.label(),
            detail: IssueDetail::Usage {
                percent,
                current: active,
                max,
            },
            explanation: format!(
                "Database connection pool is {percent:.1}% utilized ({active:.1}/{max:.1} connections). \
                 Requests are waiting for a free database connection, which adds directly \
                 to request latency. Check for slow queries and connection leaks, or \
                 consider increasing the pool size."
            ),
        })
    }

    /// Long-tail latency: p95 more than 3x p50 on the request histogram.
    pub fn check_latency_distribution(&self) -> Option<Issue> {
        let name = latency::find_latency_histogram(self.metrics, &self.rules.latency_histograms)?;
        let buckets = self.metrics.get_histogram(name);
        if buckets.is_empty() {
            return None;
        }

        let Some(total) = latency::total_count(self.metrics, name) else {
            tracing::debug!(histogram = name, "no total count, tail check skipped");
            return None;
        };

        let percentiles = latency::calculate_percentiles(buckets, total);
        tracing::debug!(histogram = name, total, ?percentiles, "latency percentiles");

        let (p50, p95) = (percentiles.p50?, percentiles.p95?);
        if p95 <= TAIL_RATIO * p50 {
            return None;
        }

        Some(Issue {
            kind: IssueKind::LatencyTail,
            severity: Severity::High,
            metric: name.to_string(),
            detail: IssueDetail::Tail { p50, p95 },
            explanation: format!(
                "Latency tail detected: p95 ({}) is {} p50 ({}). \
                 A small share of requests is much slower than the majority. Common \
                 causes: slow database queries, external API calls, garbage collection \
                 pauses, or resource contention. Investigate what makes these requests \
                 different from the majority.",
                format_ms(p95),
                match ratio_text(p50, p95) {
                    Some(ratio) => format!("{ratio} higher than"),
                    None => "far above".to_string(),
                },
                format_ms(p50),
            ),
        })
    }

    /// Usage of the first pattern pair whose values both resolve with a
    /// positive max. Later pairs are never consulted once one resolves.
    fn resolve_pool<'r>(
        &self,
        patterns: &'r [PoolPattern],
    ) -> Option<(&'r PoolPattern, f64, f64, f64)> {
        patterns.iter().find_map(|pattern| {
            let current = self.metrics.get_metric(&pattern.current)?;
            let max = self.metrics.get_metric(&pattern.max)?;
            if max <= 0.0 {
                return None;
            }
            let percent = current / max * 100.0;
            tracing::debug!(pair = %pattern.label(), percent, "pool usage resolved");
            Some((pattern, percent, current, max))
        })
    }
}

fn usage_severity(percent: f64) -> Option<Severity> {
    if percent <= WARN_USAGE_PERCENT {
        None
    } else if percent >= HIGH_USAGE_PERCENT {
        Some(Severity::High)
    } else {
        Some(Severity::Medium)
    }
}
