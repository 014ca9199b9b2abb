use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Utc;
use dashboard_core::{
    update, DashboardState, DashboardViewModel, ExportCapability, Msg, Phase,
};
use dashboard_engine::{DashboardBundleWriter, ExportRenderer, ProviderSettings};
use dashboard_logging::{dash_info, dash_warn};

use crate::effects::EffectRunner;

/// Drive one upload through the controller until it settles.
pub fn run(input: PathBuf, output_dir: PathBuf, export: bool) -> Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();

    // Headless shell: no capture backend exists here, so the export renderer
    // is declared unavailable up front rather than probed for at export time.
    let exporter = ExportRenderer::Unavailable;
    let capability = if exporter.is_available() {
        ExportCapability::Available
    } else {
        ExportCapability::Unavailable
    };

    let runner = EffectRunner::new(
        msg_tx.clone(),
        ProviderSettings::from_env(),
        exporter,
        input.clone(),
    )?;
    let bundle_writer =
        DashboardBundleWriter::new(output_dir, Arc::new(|| Utc::now().to_rfc3339()));

    let mut state = DashboardState::new(capability);

    // The upload surface: hand the picked file to the controller, then ask
    // for processing.
    let _ = msg_tx.send(Msg::FileChosen {
        name: file_name_of(&input),
        mime_type: mime_for_path(&input).to_string(),
    });
    let _ = msg_tx.send(Msg::ProcessRequested);

    let mut rendered = false;
    let mut export_requested = false;
    loop {
        let msg = match msg_rx.recv_timeout(Duration::from_millis(75)) {
            Ok(msg) => msg,
            Err(mpsc::RecvTimeoutError::Timeout) => Msg::Tick,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };
        let ends_export_cycle = matches!(msg, Msg::ExportRequested | Msg::ExportFinished { .. });

        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);

        if state.consume_dirty() {
            render_status(&state.view());
            match state.phase() {
                Phase::Processing => rendered = false,
                Phase::Ready if !rendered => {
                    if let Some(dataset) = state.dataset() {
                        let summary = bundle_writer.write(dataset)?;
                        dash_info!("dashboard bundle written: {} panel(s)", summary.panel_count);
                    }
                    rendered = true;
                }
                _ => {}
            }
        }

        match state.phase() {
            Phase::Error => {
                let message = state
                    .view()
                    .error
                    .unwrap_or_else(|| "dashboard failed".to_string());
                return Err(anyhow!(message));
            }
            Phase::Ready => {
                if export && !export_requested {
                    export_requested = true;
                    let _ = msg_tx.send(Msg::ExportRequested);
                } else if !export || ends_export_cycle {
                    if let Some(path) = state.view().last_export {
                        dash_info!("document saved to {}", path);
                    }
                    return Ok(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn render_status(view: &DashboardViewModel) {
    match &view.error {
        Some(error) => dash_warn!("status {:?}: {}", view.phase, error),
        None => dash_info!("status {:?}", view.phase),
    }
    if view.phase == Phase::Ready {
        for panel in &view.panels {
            dash_info!("panel {}: {}", panel.key, panel.title);
            for insight in &panel.insights {
                dash_info!("  - {}", insight);
            }
        }
    }
}

/// The CLI stand-in for the picker's type sniff: extension-based MIME.
fn mime_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
