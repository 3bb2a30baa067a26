//! Nearest-rank percentile estimation and histogram discovery.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use latprobe_core::latency::{calculate_percentiles, find_latency_histogram, total_count};
use latprobe_core::{MetricSet, RuleSet};

fn buckets_of(text: &str, name: &str) -> Vec<latprobe_core::Bucket> {
    MetricSet::parse(text).get_histogram(name).to_vec()
}

#[test]
fn empty_buckets_or_zero_total_is_empty() {
    assert!(calculate_percentiles(&[], 100.0).is_empty());

    let b = buckets_of("x_bucket{le=\"0.1\"} 5\n", "x_bucket");
    assert!(calculate_percentiles(&b, 0.0).is_empty());
}

#[test]
fn nearest_rank_lookup() {
    let b = buckets_of(
        "lat_bucket{le=\"0.1\"} 50\nlat_bucket{le=\"0.5\"} 90\nlat_bucket{le=\"1.0\"} 100\n",
        "lat_bucket",
    );
    let p = calculate_percentiles(&b, 100.0);
    assert_eq!(p.p50, Some(0.1));
    assert_eq!(p.p95, Some(1.0));
    assert_eq!(p.p99, Some(1.0));
}

#[test]
fn buckets_are_sorted_by_bound() {
    let b = buckets_of(
        "lat_bucket{le=\"1.0\"} 100\nlat_bucket{le=\"+Inf\"} 100\nlat_bucket{le=\"0.1\"} 50\nlat_bucket{le=\"0.5\"} 90\n",
        "lat_bucket",
    );
    let p = calculate_percentiles(&b, 100.0);
    assert_eq!(p.p50, Some(0.1));
    assert_eq!(p.p95, Some(1.0));
}

#[test]
fn unreachable_rank_is_omitted() {
    // Only the finite buckets count; nothing reaches 95 or 99.
    let b = buckets_of(
        "lat_bucket{le=\"0.1\"} 50\nlat_bucket{le=\"0.5\"} 90\nlat_bucket{le=\"+Inf\"} 100\n",
        "lat_bucket",
    );
    let p = calculate_percentiles(&b, 100.0);
    assert_eq!(p.p50, Some(0.1));
    assert_eq!(p.p95, None);
    assert_eq!(p.p99, None);
    assert!(!p.is_empty());
}

#[test]
fn buckets_without_le_are_dropped() {
    let b = buckets_of(
        "lat_bucket{path=\"/\"} 100\nlat_bucket{le=\"abc\"} 100\nlat_bucket{le=\"0.2\"} 60\n",
        "lat_bucket",
    );
    let p = calculate_percentiles(&b, 100.0);
    assert_eq!(p.p50, Some(0.2));
    assert_eq!(p.p95, None);
}

#[test]
fn histogram_discovery_follows_priority() {
    let text = "\
request_duration_seconds_bucket{le=\"1\"} 1
http_client_request_duration_seconds_bucket{le=\"1\"} 1
http_server_request_duration_seconds_bucket{le=\"1\"} 1
";
    let m = MetricSet::parse(text);
    let rules = RuleSet::default();
    assert_eq!(
        find_latency_histogram(&m, &rules.latency_histograms),
        Some("http_server_request_duration_seconds_bucket")
    );

    let m = MetricSet::parse("grpc_server_handling_seconds_bucket{le=\"1\"} 1\n");
    assert_eq!(find_latency_histogram(&m, &rules.latency_histograms), None);
    assert_eq!(
        find_latency_histogram(&m, &["grpc_server_handling_seconds"]),
        Some("grpc_server_handling_seconds_bucket")
    );
}

#[test]
fn total_prefers_inf_bucket() {
    let m = MetricSet::parse(
        "lat_bucket{le=\"0.1\"} 5\nlat_bucket{le=\"+inf\"} 9\nlat_count 12\n",
    );
    assert_eq!(total_count(&m, "lat_bucket"), Some(9.0));
}

#[test]
fn total_falls_back_to_count_series() {
    let m = MetricSet::parse("lat_bucket{le=\"0.1\"} 5\nlat_count 12\nlat_sum 3.5\n");
    assert_eq!(total_count(&m, "lat_bucket"), Some(12.0));

    let m = MetricSet::parse("lat_bucket{le=\"+Inf\"} 0\nlat_count 7\n");
    assert_eq!(total_count(&m, "lat_bucket"), Some(7.0));
}

#[test]
fn no_total_when_nothing_resolves() {
    let m = MetricSet::parse("lat_bucket{le=\"0.1\"} 5\nlat_sum 3.5\n");
    assert_eq!(total_count(&m, "lat_bucket"), None);
}

#[test]
fn unparseable_label_block_still_yields_le() {
    let text = "\
lat_bucket{le=\"0.1\",instance=host:1} 50
lat_bucket{le=\"1.0\",instance=host:1} 100
lat_bucket{le=\"+Inf\",instance=host:1} 100
";
    let m = MetricSet::parse(text);
    let buckets = m.get_histogram("lat_bucket");
    assert_eq!(buckets.len(), 3);
    assert!(buckets.iter().all(|b| b.labels.is_empty()));
    assert_eq!(buckets[0].upper_bound(), Some(0.1));
    assert!(buckets[2].is_inf());

    assert_eq!(total_count(&m, "lat_bucket"), Some(100.0));
    let p = calculate_percentiles(buckets, 100.0);
    assert_eq!(p.p50, Some(0.1));
    assert_eq!(p.p95, Some(1.0));
}
