use crate::dataset::DashboardDataset;
use crate::state::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file in the upload surface.
    FileChosen { name: String, mime_type: String },
    /// User asked for the selected upload to be processed.
    ProcessRequested,
    /// Engine completion for a processing request.
    ProcessingFinished {
        request: RequestId,
        result: Result<DashboardDataset, ProcessFailure>,
    },
    /// User asked for the rendered dashboard to be exported.
    ExportRequested,
    /// Engine completion for an export request.
    ExportFinished {
        result: Result<String, ExportFailure>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
}

/// Reduced processing failure carried across the engine boundary.
/// The reason is diagnostic only; the user-visible message is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessFailure {
    pub reason: String,
}

/// Reduced export failure carried across the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub reason: String,
}
