use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use log::warn;

use dashboard_core::{DashboardDataset, RequestId};

use crate::export::{ExportError, ExportRenderer, ExportSummary};
use crate::insight::{HttpInsightProvider, InsightProvider, ProviderInitError, ProviderSettings};
use crate::processor::{DatasetProcessor, ProcessingError};

enum EngineCommand {
    Process { request: RequestId, path: PathBuf },
    Export { region_id: String },
}

#[derive(Debug)]
pub enum EngineEvent {
    ProcessingFinished {
        request: RequestId,
        result: Result<DashboardDataset, ProcessingError>,
    },
    ExportFinished {
        result: Result<ExportSummary, ExportError>,
    },
}

/// Handle to the background worker that executes engine commands on its own
/// tokio runtime. Events come back over the receiver returned by [`new`].
///
/// [`new`]: EngineHandle::new
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        settings: ProviderSettings,
        exporter: ExportRenderer,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), ProviderInitError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let provider: Arc<dyn InsightProvider> = Arc::new(HttpInsightProvider::new(settings)?);
        let processor = Arc::new(DatasetProcessor::new(provider));
        let exporter = Arc::new(exporter);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    warn!("engine runtime failed to start: {err}");
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let processor = processor.clone();
                let exporter = exporter.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(processor.as_ref(), exporter.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn process(&self, request: RequestId, path: impl Into<PathBuf>) {
        let _ = self.cmd_tx.send(EngineCommand::Process {
            request,
            path: path.into(),
        });
    }

    pub fn export(&self, region_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Export {
            region_id: region_id.into(),
        });
    }
}

async fn handle_command(
    processor: &DatasetProcessor,
    exporter: &ExportRenderer,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Process { request, path } => {
            let result = match std::fs::read_to_string(&path) {
                Ok(text) => processor.process(&text).await,
                Err(err) => Err(ProcessingError::Io(err)),
            };
            let _ = event_tx.send(EngineEvent::ProcessingFinished { request, result });
        }
        EngineCommand::Export { region_id } => {
            let result = match exporter {
                ExportRenderer::Available(pipeline) => pipeline.export(&region_id).await,
                ExportRenderer::Unavailable => Err(ExportError::RendererUnavailable),
            };
            let _ = event_tx.send(EngineEvent::ExportFinished { result });
        }
    }
}
