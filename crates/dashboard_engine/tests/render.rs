use std::sync::Arc;

use dashboard_core::{ChartSpec, DashboardDataset, Panel};
use dashboard_engine::{panel_filename, DashboardBundleWriter, PlotlyRenderer};
use serde_json::json;

fn dataset() -> DashboardDataset {
    DashboardDataset::new(vec![
        Panel {
            key: "sentiment".to_string(),
            title: "Sentiment Breakdown".to_string(),
            chart: ChartSpec::Pie {
                labels: vec!["Positive".to_string(), "Negative".to_string()],
                values: vec![3, 1],
            },
            insights: vec!["Positive mentions dominate.".to_string()],
        },
        Panel {
            key: "engagement-trend".to_string(),
            title: "Engagement Trend Over Time".to_string(),
            chart: ChartSpec::Line {
                x: vec!["2024-01-01".to_string(), "2024-01-02".to_string()],
                y: vec![70, 10],
            },
            insights: vec!["Engagement fell after day one.".to_string()],
        },
    ])
}

#[test]
fn figure_carries_the_fixed_renderer_config() {
    let renderer = PlotlyRenderer::default();
    let figure = renderer.figure(
        "Sentiment Breakdown",
        &ChartSpec::Pie {
            labels: vec!["Positive".to_string()],
            values: vec![3],
        },
    );

    assert_eq!(figure["config"]["responsive"], json!(true));
    assert_eq!(figure["config"]["displayModeBar"], json!(false));
    assert_eq!(figure["data"][0]["type"], json!("pie"));
    assert_eq!(figure["layout"]["title"]["text"], json!("Sentiment Breakdown"));
}

#[test]
fn chart_families_map_to_their_trace_types() {
    let renderer = PlotlyRenderer::default();
    let line = renderer.figure(
        "Trend",
        &ChartSpec::Line {
            x: vec!["2024-01-01".to_string()],
            y: vec![5],
        },
    );
    assert_eq!(line["data"][0]["type"], json!("scatter"));

    let bar = renderer.figure(
        "Platforms",
        &ChartSpec::Bar {
            categories: vec!["Twitter".to_string()],
            values: vec![40],
        },
    );
    assert_eq!(bar["data"][0]["type"], json!("bar"));
    assert_eq!(bar["data"][0]["x"][0], json!("Twitter"));
}

#[test]
fn bundle_contains_panels_page_and_index() {
    let dir = tempfile::tempdir().expect("tempdir");
    let writer = DashboardBundleWriter::new(
        dir.path().to_path_buf(),
        Arc::new(|| "2026-01-01T00:00:00Z".to_string()),
    );

    let summary = writer.write(&dataset()).expect("bundle");

    assert_eq!(summary.panel_count, 2);
    assert!(dir.path().join(panel_filename("sentiment")).exists());
    assert!(dir.path().join(panel_filename("engagement-trend")).exists());

    let page = std::fs::read_to_string(dir.path().join("dashboard.html")).expect("page");
    assert!(page.contains("id=\"dashboard-content\""));
    assert!(page.contains("chart-sentiment"));
    assert!(page.contains("Positive mentions dominate."));

    let index: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("dashboard.index.json")).expect("index"),
    )
    .expect("json");
    assert_eq!(index["generated_utc"], json!("2026-01-01T00:00:00Z"));
    assert_eq!(index["panel_count"], json!(2));
    assert_eq!(index["panels"][0]["key"], json!("sentiment"));
    assert_eq!(index["panels"][0]["file"], json!("panel.sentiment.json"));
}

#[test]
fn panel_document_includes_figure_and_insights() {
    let dir = tempfile::tempdir().expect("tempdir");
    let writer = DashboardBundleWriter::new(
        dir.path().to_path_buf(),
        Arc::new(|| String::new()),
    );
    writer.write(&dataset()).expect("bundle");

    let document: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join(panel_filename("sentiment"))).expect("panel"),
    )
    .expect("json");

    assert_eq!(document["title"], json!("Sentiment Breakdown"));
    assert_eq!(document["figure"]["data"][0]["labels"][0], json!("Positive"));
    assert_eq!(document["insights"][0], json!("Positive mentions dominate."));
}
