//! latprobe core: metrics parsing, percentile estimation, and latency heuristics.
//!
//! This crate turns a Prometheus text-format snapshot into a [`MetricSet`] and
//! runs the saturation / tail-latency checks over it. It performs no I/O and
//! carries no runtime dependencies so the CLI and tests can drive it directly.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed metric lines are skipped rather than reported, and fallible
//! paths surface as `LatProbeError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod detector;
pub mod error;
pub mod issue;
pub mod labels;
pub mod latency;
pub mod parser;
pub mod rules;

/// Shared result type.
pub use error::{LatProbeError, Result};

pub use detector::IssueDetector;
pub use issue::{Issue, IssueDetail, IssueKind, Severity};
pub use latency::Percentiles;
pub use parser::{Bucket, MetricSet, Sample, SeriesKey};
pub use rules::{PoolPattern, RuleSet};
