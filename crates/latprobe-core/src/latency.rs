//! Percentile estimation over cumulative histogram buckets.
//!
//! Estimates are nearest-rank lookups: the smallest bucket upper bound whose
//! cumulative count reaches the target rank. No interpolation is done, so
//! results are always one of the histogram's own `le` bounds (seconds).

use serde::Serialize;

use crate::parser::{Bucket, MetricSet};

/// Percentile estimates in the histogram's unit (seconds). A missing field
/// means no bucket reached that rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Percentiles {
    pub p50: Option<f64>,
    pub p95: Option<f64>,
    pub p99: Option<f64>,
}

impl Percentiles {
    pub fn is_empty(&self) -> bool {
        self.p50.is_none() && self.p95.is_none() && self.p99.is_none()
    }
}

/// Compute p50/p95/p99 from a bucket list and a total observation count.
///
/// Buckets without a finite `le` bound (including `+Inf`) are ignored.
/// An empty bucket list or a zero total yields an empty result.
pub fn calculate_percentiles(buckets: &[Bucket], total_count: f64) -> Percentiles {
    if buckets.is_empty() || total_count == 0.0 {
        return Percentiles::default();
    }

    let mut bounds: Vec<(f64, f64)> = buckets
        .iter()
        .filter_map(|b| b.upper_bound().map(|le| (le, b.count)))
        .collect();
    bounds.sort_by(|a, b| a.0.total_cmp(&b.0));

    let rank = |p: f64| -> Option<f64> {
        let target = total_count * p;
        bounds
            .iter()
            .find(|(_, count)| *count >= target)
            .map(|(le, _)| *le)
    };

    Percentiles {
        p50: rank(0.50),
        p95: rank(0.95),
        p99: rank(0.99),
    }
}

/// Find the request-latency histogram to analyze.
///
/// Patterns are tried in priority order; within a pattern, histogram names
/// are scanned in first-seen order and the first substring match wins.
pub fn find_latency_histogram<'a, S: AsRef<str>>(
    metrics: &'a MetricSet,
    patterns: &[S],
) -> Option<&'a str> {
    patterns.iter().find_map(|pattern| {
        metrics
            .histogram_names()
            .find(|name| name.contains(pattern.as_ref()))
    })
}

/// Establish the total observation count for a histogram.
///
/// Prefers the `+Inf` bucket; falls back to the matching `_count` series.
/// Returns `None` when neither yields a non-zero total.
pub fn total_count(metrics: &MetricSet, histogram_name: &str) -> Option<f64> {
    let from_inf = metrics
        .get_histogram(histogram_name)
        .iter()
        .find(|b| b.is_inf())
        .map(|b| b.count)
        .filter(|c| *c != 0.0);
    if from_inf.is_some() {
        return from_inf;
    }

    let count_name = count_series_name(histogram_name);
    let total = metrics
        .first_sample_named(&count_name)
        .map(|s| s.value)
        .filter(|c| *c != 0.0);
    if total.is_some() {
        tracing::debug!(histogram = histogram_name, series = %count_name, "total taken from _count series");
    }
    total
}

fn count_series_name(histogram_name: &str) -> String {
    match histogram_name.strip_suffix("_bucket") {
        Some(base) => format!("{base}_count"),
        None => histogram_name.replacen("_bucket", "_count", 1),
    }
}
