use crate::state::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the dataset processor against the currently selected file.
    ProcessFile { request: RequestId, file_name: String },
    /// Capture the rendered region and compose the export document.
    ExportDashboard { region_id: String },
    /// Diagnostic-only note for the shell's log; no user-visible surface.
    Diagnostic { message: String },
}
