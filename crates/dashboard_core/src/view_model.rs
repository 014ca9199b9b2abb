use crate::state::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardViewModel {
    pub phase: Phase,
    pub file_name: Option<String>,
    pub error: Option<String>,
    pub panels: Vec<PanelView>,
    pub last_export: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub key: String,
    pub title: String,
    pub insights: Vec<String>,
}
