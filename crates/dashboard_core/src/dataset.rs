use serde::{Deserialize, Serialize};

/// Opaque handle to user-supplied content, as reported by the upload surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
}

/// Typed chart description consumed by the render layer.
///
/// Immutable once produced; all values are counts or sums over the uploaded
/// mention records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChartSpec {
    Pie {
        labels: Vec<String>,
        values: Vec<u64>,
    },
    Line {
        x: Vec<String>,
        y: Vec<u64>,
    },
    Bar {
        categories: Vec<String>,
        values: Vec<u64>,
    },
}

/// One chart-plus-insights unit displayed in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub key: String,
    pub title: String,
    pub chart: ChartSpec,
    pub insights: Vec<String>,
}

/// Ordered collection of panels for one processed upload.
///
/// Insertion order is display order. Replaced wholesale on reprocessing,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardDataset {
    panels: Vec<Panel>,
}

impl DashboardDataset {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self { panels }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}
