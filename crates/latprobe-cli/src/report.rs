//! Report rendering (human text and JSON).
//!
//! Renderers write into a `String` so the binary prints once and tests can
//! assert on the exact output.

use std::fmt::Write;

use clap::ValueEnum;
use serde::Serialize;

use latprobe_core::error::{LatProbeError, Result};
use latprobe_core::{Issue, Severity};

const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render issues in the requested format.
pub fn render(issues: &[Issue], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(issues)),
        OutputFormat::Json => render_json(issues),
    }
}

/// Numbered, severity-tagged issue list followed by the next-steps block.
pub fn render_text(issues: &[Issue]) -> String {
    let mut out = String::new();

    if issues.is_empty() {
        let _ = writeln!(out, "✅ No issues detected! Your metrics look healthy.");
        let _ = writeln!(out);
        let _ = writeln!(out, "Note: This tool checks for common patterns. Make sure your metrics file");
        let _ = writeln!(
            out,
            "contains the expected metric names (thread pools, connection pools, latency histograms)."
        );
        return out;
    }

    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let _ = writeln!(out, "\n⚠️  Found {} potential issue(s):\n", issues.len());
    let _ = writeln!(out, "{heavy}");

    for (i, issue) in issues.iter().enumerate() {
        let marker = match issue.severity {
            Severity::High => "🔴",
            Severity::Medium => "🟡",
        };
        let _ = writeln!(out, "\n{marker} Issue #{}: {}", i + 1, issue.kind.title());
        let _ = writeln!(out, "{light}");

        if let Some(usage) = issue.detail.usage() {
            let _ = writeln!(out, "Usage: {usage}");
        }
        if let Some((p50, p95, ratio)) = issue.detail.tail() {
            let _ = writeln!(out, "p50: {p50}, p95: {p95} (ratio: {ratio})");
        }
        let _ = writeln!(out, "Metric: {}", issue.metric);

        let _ = writeln!(out, "\n💡 Explanation:");
        let _ = writeln!(out, "   {}", issue.explanation);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "\n💼 Next Steps:");
    let _ = writeln!(out, "   1. Verify these metrics in your monitoring dashboard");
    let _ = writeln!(out, "   2. Check application logs around the time these metrics were collected");
    let _ = writeln!(out, "   3. Review recent deployments or configuration changes");
    let _ = writeln!(out, "   4. Consider increasing resource limits or optimizing slow operations");
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    issues: &'a [Issue],
}

/// `{"issues": [...]}`, pretty-printed.
pub fn render_json(issues: &[Issue]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(&JsonReport { issues })
        .map_err(|e| LatProbeError::Internal(format!("json render failed: {e}")))?;
    out.push('\n');
    Ok(out)
}
