use std::collections::BTreeMap;

use chrono::NaiveDate;
use dashboard_core::ChartSpec;

use crate::table::{MentionRecord, MentionTable};

/// How many locations the locations panel keeps after ranking.
pub const TOP_LOCATIONS_LIMIT: usize = 5;

/// A pure transformation from the normalized table to one chart, plus a
/// textual summary of the same numbers for the insight prompt.
///
/// Implementations must be deterministic: the same table yields the same
/// chart and the same summary.
pub trait Aggregator: Send + Sync {
    fn key(&self) -> &'static str;
    fn title(&self) -> &'static str;
    fn chart(&self, table: &MentionTable) -> ChartSpec;
    fn summary(&self, table: &MentionTable) -> String;
}

/// The five panels in their fixed display order.
pub fn standard_aggregators() -> Vec<Box<dyn Aggregator>> {
    vec![
        Box::new(SentimentBreakdown),
        Box::new(EngagementTrend),
        Box::new(PlatformEngagements),
        Box::new(MediaTypeMix),
        Box::new(TopLocations),
    ]
}

struct SentimentBreakdown;
struct EngagementTrend;
struct PlatformEngagements;
struct MediaTypeMix;
struct TopLocations;

impl Aggregator for SentimentBreakdown {
    fn key(&self) -> &'static str {
        "sentiment"
    }

    fn title(&self) -> &'static str {
        "Sentiment Breakdown"
    }

    fn chart(&self, table: &MentionTable) -> ChartSpec {
        let counts = count_by(table, |record| record.sentiment.as_str());
        ChartSpec::Pie {
            labels: counts.keys().cloned().collect(),
            values: counts.values().copied().collect(),
        }
    }

    fn summary(&self, table: &MentionTable) -> String {
        let counts = count_by(table, |record| record.sentiment.as_str());
        format!(
            "Mention counts by sentiment across {} records: {}.",
            table.len(),
            describe(counts.into_iter())
        )
    }
}

impl Aggregator for EngagementTrend {
    fn key(&self) -> &'static str {
        "engagement-trend"
    }

    fn title(&self) -> &'static str {
        "Engagement Trend Over Time"
    }

    fn chart(&self, table: &MentionTable) -> ChartSpec {
        let daily = daily_engagements(table);
        ChartSpec::Line {
            x: daily.keys().map(|date| date.to_string()).collect(),
            y: daily.values().copied().collect(),
        }
    }

    fn summary(&self, table: &MentionTable) -> String {
        let daily = daily_engagements(table);
        let total: u64 = daily.values().sum();
        let peak = daily.iter().max_by_key(|(_, engagements)| **engagements);
        match (daily.keys().next(), daily.keys().last(), peak) {
            (Some(first), Some(last), Some((peak_date, peak_value))) => format!(
                "Daily engagement totals from {first} to {last}: {total} engagements over {} day(s), peaking at {peak_value} on {peak_date}.",
                daily.len()
            ),
            _ => "No engagement data.".to_string(),
        }
    }
}

impl Aggregator for PlatformEngagements {
    fn key(&self) -> &'static str {
        "platform"
    }

    fn title(&self) -> &'static str {
        "Engagements by Platform"
    }

    fn chart(&self, table: &MentionTable) -> ChartSpec {
        let ranked = ranked(sum_by(table, |record| record.platform.as_str()));
        ChartSpec::Bar {
            categories: ranked.iter().map(|(name, _)| name.clone()).collect(),
            values: ranked.iter().map(|(_, value)| *value).collect(),
        }
    }

    fn summary(&self, table: &MentionTable) -> String {
        let ranked = ranked(sum_by(table, |record| record.platform.as_str()));
        format!(
            "Total engagements by platform: {}.",
            describe(ranked.into_iter())
        )
    }
}

impl Aggregator for MediaTypeMix {
    fn key(&self) -> &'static str {
        "media-type"
    }

    fn title(&self) -> &'static str {
        "Media Type Mix"
    }

    fn chart(&self, table: &MentionTable) -> ChartSpec {
        let counts = count_by(table, |record| record.media_type.as_str());
        ChartSpec::Pie {
            labels: counts.keys().cloned().collect(),
            values: counts.values().copied().collect(),
        }
    }

    fn summary(&self, table: &MentionTable) -> String {
        let counts = count_by(table, |record| record.media_type.as_str());
        format!(
            "Mention counts by media type: {}.",
            describe(counts.into_iter())
        )
    }
}

impl Aggregator for TopLocations {
    fn key(&self) -> &'static str {
        "locations"
    }

    fn title(&self) -> &'static str {
        "Top Locations by Mentions"
    }

    fn chart(&self, table: &MentionTable) -> ChartSpec {
        let ranked = top_locations(table);
        ChartSpec::Bar {
            categories: ranked.iter().map(|(name, _)| name.clone()).collect(),
            values: ranked.iter().map(|(_, value)| *value).collect(),
        }
    }

    fn summary(&self, table: &MentionTable) -> String {
        let ranked = top_locations(table);
        format!(
            "Top {} location(s) by mention count: {}.",
            ranked.len(),
            describe(ranked.into_iter())
        )
    }
}

fn top_locations(table: &MentionTable) -> Vec<(String, u64)> {
    let mut entries = ranked(count_by(table, |record| record.location.as_str()));
    entries.truncate(TOP_LOCATIONS_LIMIT);
    entries
}

fn count_by<F>(table: &MentionTable, field: F) -> BTreeMap<String, u64>
where
    F: Fn(&MentionRecord) -> &str,
{
    let mut counts = BTreeMap::new();
    for record in table.records() {
        *counts.entry(field(record).to_string()).or_insert(0) += 1;
    }
    counts
}

fn sum_by<F>(table: &MentionTable, field: F) -> BTreeMap<String, u64>
where
    F: Fn(&MentionRecord) -> &str,
{
    let mut sums = BTreeMap::new();
    for record in table.records() {
        *sums.entry(field(record).to_string()).or_insert(0) += record.engagements;
    }
    sums
}

fn daily_engagements(table: &MentionTable) -> BTreeMap<NaiveDate, u64> {
    let mut daily = BTreeMap::new();
    for record in table.records() {
        *daily.entry(record.date).or_insert(0) += record.engagements;
    }
    daily
}

/// Highest value first; equal values keep the map's alphabetical order.
fn ranked(map: BTreeMap<String, u64>) -> Vec<(String, u64)> {
    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

fn describe(entries: impl Iterator<Item = (String, u64)>) -> String {
    entries
        .map(|(name, value)| format!("{name} {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}
