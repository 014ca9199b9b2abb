use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use dashboard_core::{Effect, ExportFailure, Msg, ProcessFailure};
use dashboard_engine::{
    EngineEvent, EngineHandle, ExportRenderer, ProviderInitError, ProviderSettings,
};
use dashboard_logging::{dash_info, dash_warn};

/// Executes controller effects against the engine and forwards engine events
/// back into the message loop.
pub struct EffectRunner {
    engine: EngineHandle,
    csv_path: PathBuf,
}

impl EffectRunner {
    pub fn new(
        msg_tx: mpsc::Sender<Msg>,
        settings: ProviderSettings,
        exporter: ExportRenderer,
        csv_path: PathBuf,
    ) -> Result<Self, ProviderInitError> {
        let (engine, events) = EngineHandle::new(settings, exporter)?;
        spawn_event_loop(events, msg_tx);
        Ok(Self { engine, csv_path })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ProcessFile { request, file_name } => {
                    dash_info!("processing request {} for {}", request, file_name);
                    self.engine.process(request, self.csv_path.clone());
                }
                Effect::ExportDashboard { region_id } => {
                    dash_info!("export requested for region {}", region_id);
                    self.engine.export(region_id);
                }
                Effect::Diagnostic { message } => {
                    dash_warn!("{}", message);
                }
            }
        }
    }
}

fn spawn_event_loop(events: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || loop {
        match events.try_recv() {
            Ok(event) => {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            }
            Err(mpsc::TryRecvError::Empty) => thread::sleep(Duration::from_millis(20)),
            Err(mpsc::TryRecvError::Disconnected) => break,
        }
    });
}

/// Reduce engine results to core payloads, logging the detail here so the
/// state machine only carries what the user can see.
fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProcessingFinished { request, result } => Msg::ProcessingFinished {
            request,
            result: result.map_err(|err| {
                dash_warn!("processing request {} failed: {}", request, err);
                ProcessFailure {
                    reason: err.to_string(),
                }
            }),
        },
        EngineEvent::ExportFinished { result } => Msg::ExportFinished {
            result: match result {
                Ok(summary) => {
                    dash_info!(
                        "export composed {} page(s) at {}",
                        summary.page_count,
                        summary.output_path.display()
                    );
                    Ok(summary.output_path.display().to_string())
                }
                Err(err) => {
                    dash_warn!("export failed: {}", err);
                    Err(ExportFailure {
                        reason: err.to_string(),
                    })
                }
            },
        },
    }
}
