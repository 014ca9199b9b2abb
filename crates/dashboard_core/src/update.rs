use crate::{DashboardState, Effect, ExportCapability, Msg, Phase, SelectedFile};

pub const ERR_INVALID_FILE: &str = "Please upload a valid CSV file.";
pub const ERR_NO_FILE: &str = "No CSV file selected.";
pub const ERR_PROCESSING: &str = "Failed to process CSV. Please try again.";
pub const ERR_EXPORT: &str = "Failed to export dashboard. Please try again.";

/// Element id of the rendered region the export path captures.
pub const DASHBOARD_REGION_ID: &str = "dashboard-content";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: DashboardState, msg: Msg) -> (DashboardState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileChosen { name, mime_type } => {
            // The upload surface is inert while a document is being composed.
            if state.phase() == Phase::Exporting {
                return (state, Vec::new());
            }
            if is_csv_mime(&mime_type) {
                state.select_file(SelectedFile { name, mime_type });
            } else {
                state.reject_file(ERR_INVALID_FILE);
            }
            Vec::new()
        }
        Msg::ProcessRequested => match (state.phase(), state.file().cloned()) {
            (Phase::Processing | Phase::Exporting, _) => Vec::new(),
            (_, Some(file)) => {
                let request = state.begin_processing();
                vec![Effect::ProcessFile {
                    request,
                    file_name: file.name,
                }]
            }
            (_, None) => {
                state.fail(ERR_NO_FILE);
                Vec::new()
            }
        },
        Msg::ProcessingFinished { request, result } => {
            // A result for an abandoned request must not clobber whatever the
            // user has done since; drop it and leave a trace in the log.
            if state.phase() != Phase::Processing || !state.is_active_request(request) {
                return (
                    state,
                    vec![Effect::Diagnostic {
                        message: format!("dropping stale processing result for request {request}"),
                    }],
                );
            }
            match result {
                Ok(dataset) => state.finish_processing(dataset),
                Err(_) => state.fail(ERR_PROCESSING),
            }
            Vec::new()
        }
        Msg::ExportRequested => {
            if state.phase() != Phase::Ready {
                return (state, Vec::new());
            }
            match state.exporter() {
                ExportCapability::Available => {
                    state.begin_export();
                    vec![Effect::ExportDashboard {
                        region_id: DASHBOARD_REGION_ID.to_string(),
                    }]
                }
                ExportCapability::Unavailable => vec![Effect::Diagnostic {
                    message: "export renderer unavailable; export skipped".to_string(),
                }],
            }
        }
        Msg::ExportFinished { result } => {
            if state.phase() != Phase::Exporting {
                return (state, Vec::new());
            }
            match result {
                Ok(path) => state.finish_export(path),
                Err(_) => state.fail_export(ERR_EXPORT),
            }
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn is_csv_mime(mime_type: &str) -> bool {
    let essence = mime_type.split(';').next().unwrap_or(mime_type).trim();
    essence.eq_ignore_ascii_case("text/csv")
}
