//! Detector vector tests: fixture metrics files with expected issue lists.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use latprobe_core::{IssueDetector, MetricSet};

use vector_loader::TestVector;

#[test]
fn detect_vectors() {
    let files = [
        "healthy.json",
        "hikari_only.json",
        "tomcat_dotted.json",
        "latency_tail.json",
        "count_fallback.json",
        "mixed.json",
    ];

    for f in files {
        let v = TestVector::load(f);
        let metrics = MetricSet::parse(&v.metrics_text());
        let issues = IssueDetector::new(&metrics).detect_all();

        assert_eq!(issues.len(), v.expect.len(), "vector={}", v.description);

        for (issue, ex) in issues.iter().zip(&v.expect) {
            let actual = serde_json::to_value(issue).unwrap();
            for (field, want) in ex {
                assert_eq!(&actual[field], want, "vector={} field={field}", v.description);
            }
            assert!(
                actual["explanation"].as_str().is_some_and(|s| !s.is_empty()),
                "vector={}",
                v.description
            );
        }
    }
}
