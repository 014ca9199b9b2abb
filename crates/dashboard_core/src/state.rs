use crate::dataset::{DashboardDataset, SelectedFile};
use crate::view_model::{DashboardViewModel, PanelView};

/// Monotonic identifier for processing requests; stale results are dropped
/// by comparing against the currently active id.
pub type RequestId = u64;

/// Controller phase. `Error` is recoverable by re-selecting a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    FileSelected,
    Processing,
    Ready,
    Exporting,
    Error,
}

/// Whether an export renderer was injected at construction.
///
/// The shell decides this once when wiring the controller; the state machine
/// never probes ambient library availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportCapability {
    Available,
    Unavailable,
}

/// The controller's process-wide UI state. Exclusively owned and mutated by
/// whoever runs the update loop; the render layer only reads projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    phase: Phase,
    file: Option<SelectedFile>,
    dataset: Option<DashboardDataset>,
    error: Option<String>,
    exporter: ExportCapability,
    next_request: RequestId,
    active_request: Option<RequestId>,
    last_export: Option<String>,
    dirty: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(ExportCapability::Unavailable)
    }
}

impl DashboardState {
    pub fn new(exporter: ExportCapability) -> Self {
        Self {
            phase: Phase::Idle,
            file: None,
            dataset: None,
            error: None,
            exporter,
            next_request: 0,
            active_request: None,
            last_export: None,
            dirty: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dataset(&self) -> Option<&DashboardDataset> {
        self.dataset.as_ref()
    }

    pub fn view(&self) -> DashboardViewModel {
        let panels = self
            .dataset
            .iter()
            .flat_map(|dataset| dataset.panels())
            .map(|panel| PanelView {
                key: panel.key.clone(),
                title: panel.title.clone(),
                insights: panel.insights.clone(),
            })
            .collect();
        DashboardViewModel {
            phase: self.phase,
            file_name: self.file.as_ref().map(|file| file.name.clone()),
            error: self.error.clone(),
            panels,
            last_export: self.last_export.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it; the shell re-renders on `true`.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn exporter(&self) -> ExportCapability {
        self.exporter
    }

    pub(crate) fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub(crate) fn is_active_request(&self, request: RequestId) -> bool {
        self.active_request == Some(request)
    }

    /// Accept a valid upload; any in-flight processing request is abandoned.
    pub(crate) fn select_file(&mut self, file: SelectedFile) {
        self.file = Some(file);
        self.error = None;
        self.active_request = None;
        self.phase = Phase::FileSelected;
        self.dirty = true;
    }

    /// Reject an upload with the wrong content type.
    pub(crate) fn reject_file(&mut self, message: &str) {
        self.file = None;
        self.error = Some(message.to_string());
        self.active_request = None;
        self.phase = Phase::Error;
        self.dirty = true;
    }

    pub(crate) fn begin_processing(&mut self) -> RequestId {
        self.next_request += 1;
        let request = self.next_request;
        self.active_request = Some(request);
        self.dataset = None;
        self.error = None;
        self.phase = Phase::Processing;
        self.dirty = true;
        request
    }

    pub(crate) fn finish_processing(&mut self, dataset: DashboardDataset) {
        self.dataset = Some(dataset);
        self.active_request = None;
        self.phase = Phase::Ready;
        self.dirty = true;
    }

    /// Enter `Error` with a user-visible message. The selected file is kept
    /// so the user can retry without re-selecting.
    pub(crate) fn fail(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.active_request = None;
        self.phase = Phase::Error;
        self.dirty = true;
    }

    pub(crate) fn begin_export(&mut self) {
        self.phase = Phase::Exporting;
        self.dirty = true;
    }

    pub(crate) fn finish_export(&mut self, path: String) {
        self.last_export = Some(path);
        self.error = None;
        self.phase = Phase::Ready;
        self.dirty = true;
    }

    /// Export runtime failure: back to `Ready` with a visible message — the
    /// dataset is intact, only the document was lost.
    pub(crate) fn fail_export(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.phase = Phase::Ready;
        self.dirty = true;
    }
}
