//! Dashboard engine: dataset construction and effect execution.
mod aggregate;
mod engine;
mod export;
mod insight;
mod persist;
mod processor;
mod prompt;
mod render;
mod table;

pub use aggregate::{standard_aggregators, Aggregator, TOP_LOCATIONS_LIMIT};
pub use engine::{EngineEvent, EngineHandle};
pub use export::{
    page_offsets, Bitmap, ComposedDocument, DocumentComposer, ExportError, ExportOptions,
    ExportPipeline, ExportRenderer, ExportSummary, PageSize, RegionCapture, A4, CAPTURE_SCALE,
    EXPORT_FILENAME,
};
pub use insight::{
    HttpInsightProvider, InsightProvider, ProviderInitError, ProviderSettings, FALLBACK_EMPTY,
    FALLBACK_ERROR, MAX_INSIGHTS,
};
pub use persist::{AtomicFileWriter, PersistError};
pub use processor::{DatasetProcessor, ProcessingError};
pub use prompt::insight_request;
pub use render::{
    panel_filename, BundleSummary, DashboardBundleWriter, PlotlyRenderer, RenderConfig,
    RenderError,
};
pub use table::{MentionRecord, MentionTable, TableError};
