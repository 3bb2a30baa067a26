//! Prometheus text exposition parser.
//!
//! Parsing rules:
//! - One sample per line: `name{labels} value` or `name value`.
//! - Blank lines and `#` lines (HELP/TYPE/comments) are skipped.
//! - Lines that do not fit the shape are ignored, never reported as errors.
//! - Names containing `_bucket` are collected as histogram buckets (append),
//!   everything else is a scalar sample (last write wins).

use std::collections::HashMap;

use crate::labels::{self, Label};

const BUCKET_MARKER: &str = "_bucket";

/// Structured series identity: metric name plus canonical (sorted) labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub name: String,
    /// Sorted `k="v"` rendering, or the trimmed raw block when it could not
    /// be parsed into pairs.
    pub labels: String,
}

impl SeriesKey {
    pub fn new(name: impl Into<String>, labels: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: labels.into(),
        }
    }
}

/// A scalar metric instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub key: SeriesKey,
    /// Label block exactly as written in the input (may be empty).
    pub raw_labels: String,
    pub labels: Vec<Label>,
    pub value: f64,
}

impl Sample {
    /// `name` without labels, `name{raw_labels}` otherwise.
    pub fn composite_key(&self) -> String {
        if self.raw_labels.is_empty() {
            self.key.name.clone()
        } else {
            format!("{}{{{}}}", self.key.name, self.raw_labels)
        }
    }
}

/// One cumulative histogram bucket line.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub raw_labels: String,
    pub labels: Vec<Label>,
    pub count: f64,
}

impl Bucket {
    /// Raw `le` label value, if present. Blocks that did not parse into
    /// pairs are searched textually.
    pub fn le(&self) -> Option<&str> {
        if self.labels.is_empty() {
            return labels::scan_raw(&self.raw_labels, labels::LE);
        }
        labels::find(&self.labels, labels::LE)
    }

    /// Finite numeric upper bound. `+Inf` and unparseable bounds yield `None`.
    pub fn upper_bound(&self) -> Option<f64> {
        self.le()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// True for the `le="+Inf"` bucket (case-insensitive).
    pub fn is_inf(&self) -> bool {
        self.le()
            .map(|v| v.trim().eq_ignore_ascii_case("+inf"))
            .unwrap_or(false)
    }
}

/// All bucket lines seen for one `_bucket` metric name, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub name: String,
    pub buckets: Vec<Bucket>,
}

/// Line counters collected while parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub comments: usize,
    pub samples: usize,
    pub buckets: usize,
    pub skipped: usize,
}

/// Parsed snapshot: scalar samples and histogram bucket lists, both in
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSet {
    samples: Vec<Sample>,
    index: HashMap<SeriesKey, usize>,
    histograms: Vec<Histogram>,
    histogram_index: HashMap<String, usize>,
    stats: ParseStats,
}

impl MetricSet {
    /// Parse a full exposition-format text blob.
    pub fn parse(text: &str) -> Self {
        let mut set = MetricSet::default();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            set.stats.lines += 1;
            if line.starts_with('#') {
                set.stats.comments += 1;
                continue;
            }

            match parse_line(line) {
                Some(raw) => set.insert(raw),
                None => {
                    set.stats.skipped += 1;
                    tracing::trace!(line = lineno + 1, "skipping unrecognized metric line");
                }
            }
        }

        tracing::debug!(
            lines = set.stats.lines,
            samples = set.samples.len(),
            histograms = set.histograms.len(),
            buckets = set.stats.buckets,
            skipped = set.stats.skipped,
            "metrics parsed"
        );
        set
    }

    fn insert(&mut self, raw: RawLine<'_>) {
        let raw_labels = raw.labels.unwrap_or_default();
        let (labels, canonical) = resolve_labels(raw_labels);

        if raw.name.contains(BUCKET_MARKER) {
            self.stats.buckets += 1;
            let bucket = Bucket {
                raw_labels: raw_labels.to_string(),
                labels,
                count: raw.value,
            };
            match self.histogram_index.get(raw.name) {
                Some(&i) => {
                    if let Some(h) = self.histograms.get_mut(i) {
                        h.buckets.push(bucket);
                    }
                }
                None => {
                    self.histogram_index
                        .insert(raw.name.to_string(), self.histograms.len());
                    self.histograms.push(Histogram {
                        name: raw.name.to_string(),
                        buckets: vec![bucket],
                    });
                }
            }
            return;
        }

        self.stats.samples += 1;
        let sample = Sample {
            key: SeriesKey::new(raw.name, canonical),
            raw_labels: raw_labels.to_string(),
            labels,
            value: raw.value,
        };
        match self.index.get(&sample.key) {
            // Repeated series: overwrite in place, keep the first-seen position.
            Some(&i) => {
                if let Some(slot) = self.samples.get_mut(i) {
                    *slot = sample;
                }
            }
            None => {
                self.index.insert(sample.key.clone(), self.samples.len());
                self.samples.push(sample);
            }
        }
    }

    /// Best-effort pattern lookup.
    ///
    /// Linear scan over scalar samples in insertion order, returning the value
    /// of the first one whose composite key (`name` or `name{raw_labels}`)
    /// contains `pattern`. When several series match, only the first one
    /// encountered is returned; the others are not inspected.
    pub fn get_metric(&self, pattern: &str) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| s.composite_key().contains(pattern))
            .map(|s| s.value)
    }

    /// Exact series lookup.
    pub fn sample(&self, key: &SeriesKey) -> Option<&Sample> {
        self.index.get(key).and_then(|&i| self.samples.get(i))
    }

    /// First scalar sample whose metric name equals `name` (labels ignored).
    pub fn first_sample_named(&self, name: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.key.name == name)
    }

    /// Bucket list for an exact histogram metric name; empty when absent.
    pub fn get_histogram(&self, name: &str) -> &[Bucket] {
        self.histogram_index
            .get(name)
            .and_then(|&i| self.histograms.get(i))
            .map(|h| h.buckets.as_slice())
            .unwrap_or(&[])
    }

    /// Histogram names in first-seen order.
    pub fn histogram_names(&self) -> impl Iterator<Item = &str> {
        self.histograms.iter().map(|h| h.name.as_str())
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn histograms(&self) -> &[Histogram] {
        &self.histograms
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}

/// Borrowed view of one recognized data line.
#[derive(Debug)]
struct RawLine<'a> {
    name: &'a str,
    labels: Option<&'a str>,
    value: f64,
}

fn is_name_char(c: char, first: bool) -> bool {
    if first {
        c.is_ascii_alphabetic() || c == '_' || c == ':'
    } else {
        c.is_ascii_alphanumeric() || c == '_' || c == ':' || c == '.'
    }
}

fn is_value_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')
}

/// Match `name[{labels}]<ws>value[anything]` on a trimmed line.
fn parse_line(line: &str) -> Option<RawLine<'_>> {
    let name_end = line
        .char_indices()
        .find(|&(i, c)| !is_name_char(c, i == 0))
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    if name_end == 0 {
        return None;
    }
    let (name, rest) = line.split_at(name_end);

    let (labels, rest) = match rest.strip_prefix('{') {
        Some(body) => {
            let (labels, rest) = body.split_once('}')?;
            (Some(labels), rest)
        }
        None => (None, rest),
    };

    let value_part = rest.trim_start();
    if value_part.len() == rest.len() {
        // No separating whitespace.
        return None;
    }

    let token = value_part.split(|c: char| !is_value_char(c)).next()?;
    let value = token.parse::<f64>().ok()?;

    Some(RawLine {
        name,
        labels,
        value,
    })
}

fn resolve_labels(raw: &str) -> (Vec<Label>, String) {
    if raw.trim().is_empty() {
        return (Vec::new(), String::new());
    }
    match labels::parse_label_block(raw) {
        Ok(parsed) => {
            let canonical = labels::canonical(&parsed);
            (parsed, canonical)
        }
        Err(e) => {
            tracing::trace!(error = %e, "label block kept verbatim");
            (Vec::new(), raw.trim().to_string())
        }
    }
}
