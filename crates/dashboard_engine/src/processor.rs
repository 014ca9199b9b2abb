use std::sync::Arc;

use futures_util::future::join_all;
use log::info;
use thiserror::Error;

use dashboard_core::{ChartSpec, DashboardDataset, Panel};

use crate::aggregate::{standard_aggregators, Aggregator};
use crate::insight::{InsightProvider, FALLBACK_EMPTY, MAX_INSIGHTS};
use crate::table::{MentionTable, TableError};

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("could not read upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode table: {0}")]
    Table(#[from] TableError),
}

/// Builds the dashboard dataset for one validated upload.
pub struct DatasetProcessor {
    aggregators: Vec<Box<dyn Aggregator>>,
    provider: Arc<dyn InsightProvider>,
}

impl DatasetProcessor {
    pub fn new(provider: Arc<dyn InsightProvider>) -> Self {
        Self {
            aggregators: standard_aggregators(),
            provider,
        }
    }

    /// Transform CSV text into the five-panel dataset.
    ///
    /// Insight calls run concurrently, but panels are assembled in the fixed
    /// declared order regardless of completion order; no partial dataset is
    /// ever returned.
    pub async fn process(&self, csv_text: &str) -> Result<DashboardDataset, ProcessingError> {
        let table = MentionTable::parse(csv_text)?;
        info!("table decoded: {} mention record(s)", table.len());

        let prepared: Vec<(&'static str, &'static str, ChartSpec, String)> = self
            .aggregators
            .iter()
            .map(|agg| (agg.key(), agg.title(), agg.chart(&table), agg.summary(&table)))
            .collect();

        let insight_calls = prepared
            .iter()
            .map(|(_, title, _, summary)| self.provider.generate(title, summary));
        let insight_lists = join_all(insight_calls).await;

        let panels = prepared
            .into_iter()
            .zip(insight_lists)
            .map(|((key, title, chart, _), insights)| Panel {
                key: key.to_string(),
                title: title.to_string(),
                chart,
                insights: clamp_insights(insights),
            })
            .collect();
        Ok(DashboardDataset::new(panels))
    }
}

/// Panel invariant: at least one entry, at most [`MAX_INSIGHTS`].
fn clamp_insights(mut insights: Vec<String>) -> Vec<String> {
    insights.truncate(MAX_INSIGHTS);
    if insights.is_empty() {
        insights.push(FALLBACK_EMPTY.to_string());
    }
    insights
}
