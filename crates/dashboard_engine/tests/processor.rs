use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashboard_engine::{
    DatasetProcessor, InsightProvider, ProcessingError, FALLBACK_EMPTY, FALLBACK_ERROR,
};
use pretty_assertions::assert_eq;

const SAMPLE_CSV: &str = "\
Date,Platform,Sentiment,Location,Engagements,Media Type
2024-01-02,Twitter,Positive,Austin,10,Video
2024-01-01,Reddit,Negative,Berlin,40,Article
2024-01-01,Twitter,Positive,Austin,30,Video
2024-01-03,News,Neutral,Cairo,5,Article
";

/// Canned provider with per-title overrides and delays, so completion order
/// can be skewed away from declaration order.
struct CannedProvider {
    default: Vec<String>,
    overrides: HashMap<String, Vec<String>>,
    delays: HashMap<String, u64>,
}

impl CannedProvider {
    fn answering(default: &[&str]) -> Self {
        Self {
            default: default.iter().map(|s| s.to_string()).collect(),
            overrides: HashMap::new(),
            delays: HashMap::new(),
        }
    }

    fn with_override(mut self, title: &str, insights: &[&str]) -> Self {
        self.overrides.insert(
            title.to_string(),
            insights.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    fn with_delay(mut self, title: &str, millis: u64) -> Self {
        self.delays.insert(title.to_string(), millis);
        self
    }
}

#[async_trait]
impl InsightProvider for CannedProvider {
    async fn generate(&self, title: &str, _summary: &str) -> Vec<String> {
        if let Some(delay) = self.delays.get(title) {
            tokio::time::sleep(Duration::from_millis(*delay)).await;
        }
        self.overrides
            .get(title)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

#[tokio::test]
async fn produces_five_panels_in_fixed_order_regardless_of_timing() {
    // The slowest panels come first so completion order inverts declaration
    // order; assembly order must not follow it.
    let provider = CannedProvider::answering(&["A", "B", "C"])
        .with_delay("Sentiment Breakdown", 120)
        .with_delay("Engagement Trend Over Time", 90)
        .with_delay("Engagements by Platform", 60)
        .with_delay("Media Type Mix", 30);
    let processor = DatasetProcessor::new(Arc::new(provider));

    let dataset = processor.process(SAMPLE_CSV).await.expect("dataset");

    let keys: Vec<&str> = dataset
        .panels()
        .iter()
        .map(|panel| panel.key.as_str())
        .collect();
    assert_eq!(
        keys,
        vec![
            "sentiment",
            "engagement-trend",
            "platform",
            "media-type",
            "locations"
        ]
    );
    for panel in dataset.panels() {
        assert_eq!(panel.insights, vec!["A", "B", "C"], "{}", panel.key);
    }
}

#[tokio::test]
async fn provider_failure_is_isolated_to_its_panel() {
    let provider = CannedProvider::answering(&["A", "B", "C"])
        .with_override("Engagements by Platform", &[FALLBACK_ERROR]);
    let processor = DatasetProcessor::new(Arc::new(provider));

    let dataset = processor.process(SAMPLE_CSV).await.expect("dataset");
    let panels = dataset.panels();

    assert_eq!(panels.len(), 5);
    assert_eq!(panels[2].insights, vec![FALLBACK_ERROR]);
    assert_eq!(panels[0].insights, vec!["A", "B", "C"]);
    assert_eq!(panels[4].insights, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn panel_insight_invariants_are_enforced() {
    // A misbehaving provider may return nothing or too much; panels still
    // carry between one and three entries.
    let provider = CannedProvider::answering(&["A", "B", "C"])
        .with_override("Sentiment Breakdown", &[])
        .with_override("Media Type Mix", &["1", "2", "3", "4", "5"]);
    let processor = DatasetProcessor::new(Arc::new(provider));

    let dataset = processor.process(SAMPLE_CSV).await.expect("dataset");
    let panels = dataset.panels();

    assert_eq!(panels[0].insights, vec![FALLBACK_EMPTY]);
    assert_eq!(panels[3].insights, vec!["1", "2", "3"]);
    for panel in panels {
        assert!(!panel.insights.is_empty());
        assert!(panel.insights.len() <= 3);
    }
}

/// Provider whose text changes on every call.
struct VaryingProvider {
    calls: AtomicU64,
}

#[async_trait]
impl InsightProvider for VaryingProvider {
    async fn generate(&self, _title: &str, _summary: &str) -> Vec<String> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        vec![format!("observation {call}")]
    }
}

#[tokio::test]
async fn chart_fields_are_idempotent_even_when_insights_vary() {
    let processor = DatasetProcessor::new(Arc::new(VaryingProvider {
        calls: AtomicU64::new(0),
    }));

    let one = processor.process(SAMPLE_CSV).await.expect("first run");
    let two = processor.process(SAMPLE_CSV).await.expect("second run");

    for (a, b) in one.panels().iter().zip(two.panels()) {
        assert_eq!(a.key, b.key);
        assert_eq!(a.title, b.title);
        assert_eq!(a.chart, b.chart);
        assert_ne!(a.insights, b.insights, "{}", a.key);
    }
}

#[tokio::test]
async fn table_failures_become_processing_errors() {
    let provider = CannedProvider::answering(&["A"]);
    let processor = DatasetProcessor::new(Arc::new(provider));

    let err = processor.process("Date,Platform\n").await.unwrap_err();

    assert!(matches!(err, ProcessingError::Table(_)), "{err:?}");
}
