use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use dashboard_core::{ChartSpec, DashboardDataset, DASHBOARD_REGION_ID};

use crate::persist::{AtomicFileWriter, PersistError};

/// Renderer configuration recognized by the chart surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub responsive: bool,
    pub display_mode_bar: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            responsive: true,
            display_mode_bar: false,
        }
    }
}

/// Maps a `ChartSpec` to a plotly-shaped figure document.
#[derive(Debug, Clone, Default)]
pub struct PlotlyRenderer {
    config: RenderConfig,
}

impl PlotlyRenderer {
    pub fn figure(&self, title: &str, spec: &ChartSpec) -> Value {
        let data = match spec {
            ChartSpec::Pie { labels, values } => json!([{
                "type": "pie",
                "labels": labels,
                "values": values,
            }]),
            ChartSpec::Line { x, y } => json!([{
                "type": "scatter",
                "mode": "lines+markers",
                "x": x,
                "y": y,
            }]),
            ChartSpec::Bar { categories, values } => json!([{
                "type": "bar",
                "x": categories,
                "y": values,
            }]),
        };
        json!({
            "data": data,
            "layout": { "title": { "text": title }, "margin": { "t": 48 } },
            "config": self.config,
        })
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    pub panel_count: usize,
    pub files: Vec<PathBuf>,
}

/// Writes the visual bundle for a processed dataset: one figure document per
/// panel, the dashboard page, and an index manifest.
pub struct DashboardBundleWriter {
    out_dir: PathBuf,
    renderer: PlotlyRenderer,
    // Timestamp source injected by the shell; the engine never reads the
    // wall clock itself.
    generated_at: Arc<dyn Fn() -> String + Send + Sync>,
}

impl DashboardBundleWriter {
    pub fn new(out_dir: PathBuf, generated_at: Arc<dyn Fn() -> String + Send + Sync>) -> Self {
        Self {
            out_dir,
            renderer: PlotlyRenderer::default(),
            generated_at,
        }
    }

    pub fn write(&self, dataset: &DashboardDataset) -> Result<BundleSummary, RenderError> {
        let writer = AtomicFileWriter::new(self.out_dir.clone());
        let mut files = Vec::new();

        for panel in dataset.panels() {
            let document = json!({
                "key": panel.key,
                "title": panel.title,
                "figure": self.renderer.figure(&panel.title, &panel.chart),
                "insights": panel.insights,
            });
            let path = writer.write(
                &panel_filename(&panel.key),
                &serde_json::to_string_pretty(&document)?,
            )?;
            files.push(path);
        }

        files.push(writer.write("dashboard.html", &render_page(dataset))?);

        let index = json!({
            "generated_utc": (self.generated_at)(),
            "panel_count": dataset.len(),
            "panels": dataset.panels().iter().map(|panel| json!({
                "key": panel.key,
                "title": panel.title,
                "file": panel_filename(&panel.key),
            })).collect::<Vec<_>>(),
        });
        files.push(writer.write(
            "dashboard.index.json",
            &serde_json::to_string_pretty(&index)?,
        )?);

        Ok(BundleSummary {
            panel_count: dataset.len(),
            files,
        })
    }
}

pub fn panel_filename(key: &str) -> String {
    format!("panel.{key}.json")
}

/// Static page: one chart target div per panel plus its insight list.
/// Figures load from the per-panel documents written next to the page.
fn render_page(dataset: &DashboardDataset) -> String {
    let mut body = String::new();
    for panel in dataset.panels() {
        body.push_str(&format!(
            "    <section class=\"panel\">\n      <h2>{}</h2>\n      <div id=\"chart-{}\" class=\"chart\"></div>\n      <ul class=\"insights\">\n",
            escape_html(&panel.title),
            panel.key,
        ));
        for insight in &panel.insights {
            body.push_str(&format!("        <li>{}</li>\n", escape_html(insight)));
        }
        body.push_str("      </ul>\n    </section>\n");
    }
    let loader: String = dataset
        .panels()
        .iter()
        .map(|panel| {
            format!(
                "      load(\"{}\", \"chart-{}\");\n",
                panel_filename(&panel.key),
                panel.key
            )
        })
        .collect();
    format!(
        "<!doctype html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>Media Mentions Dashboard</title>\n  <script src=\"https://cdn.plot.ly/plotly-2.35.2.min.js\"></script>\n</head>\n<body>\n  <main id=\"{region}\">\n{body}  </main>\n  <script>\n    function load(file, target) {{\n      fetch(file)\n        .then((response) => response.json())\n        .then((panel) => Plotly.newPlot(target, panel.figure.data, panel.figure.layout, panel.figure.config));\n    }}\n{loader}  </script>\n</body>\n</html>\n",
        region = DASHBOARD_REGION_ID,
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
