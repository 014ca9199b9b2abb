use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Fixed output filename for the exported document.
pub const EXPORT_FILENAME: &str = "media_mentions_report.pdf";
/// Fixed upscaling factor applied at capture time for legibility.
pub const CAPTURE_SCALE: f64 = 2.0;

/// Page proportions of the composed document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// A4 portrait, in millimeters.
pub const A4: PageSize = PageSize {
    width: 210.0,
    height: 297.0,
};

/// Vertical slice offsets for paginating a captured image.
///
/// Returns `ceil(image_height / page_height)` offsets. An image height that
/// is an exact multiple of the page height yields exactly that quotient —
/// no trailing blank page. Non-positive heights yield no pages.
pub fn page_offsets(image_height: f64, page_height: f64) -> Vec<f64> {
    if image_height <= 0.0 || page_height <= 0.0 {
        return Vec::new();
    }
    let pages = (image_height / page_height).ceil() as usize;
    (0..pages).map(|page| page as f64 * page_height).collect()
}

/// Raster produced by the capture collaborator. Pixel layout is owned by the
/// composing side; the pipeline only consults the dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Document produced by the composer, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument {
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export renderer unavailable")]
    RendererUnavailable,
    #[error("render region not found: {0}")]
    RegionMissing(String),
    #[error("capture failed: {0}")]
    Capture(String),
    #[error("compose failed: {0}")]
    Compose(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Precondition failures stay diagnostic-only; runtime failures surface.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::RendererUnavailable | Self::RegionMissing(_))
    }
}

/// Captures a rendered region as a bitmap at the given upscale.
#[async_trait]
pub trait RegionCapture: Send + Sync {
    async fn capture(&self, region_id: &str, scale: f64) -> Result<Bitmap, ExportError>;
}

/// Composes a captured bitmap into a paginated document and saves it.
pub trait DocumentComposer: Send + Sync {
    fn compose(&self, bitmap: &Bitmap, page: PageSize) -> Result<ComposedDocument, ExportError>;
    fn save(&self, document: ComposedDocument, filename: &str) -> Result<PathBuf, ExportError>;
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_filename: String,
    pub page: PageSize,
    pub capture_scale: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_filename: EXPORT_FILENAME.to_string(),
            page: A4,
            capture_scale: CAPTURE_SCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub page_count: usize,
    pub output_path: PathBuf,
}

/// The export orchestration: capture, paginate, compose, save.
pub struct ExportPipeline {
    capture: Arc<dyn RegionCapture>,
    composer: Arc<dyn DocumentComposer>,
    options: ExportOptions,
}

impl ExportPipeline {
    pub fn new(
        capture: Arc<dyn RegionCapture>,
        composer: Arc<dyn DocumentComposer>,
        options: ExportOptions,
    ) -> Self {
        Self {
            capture,
            composer,
            options,
        }
    }

    pub async fn export(&self, region_id: &str) -> Result<ExportSummary, ExportError> {
        let bitmap = self
            .capture
            .capture(region_id, self.options.capture_scale)
            .await?;
        // Page height in image pixels once the image is fitted to page width.
        let page_height =
            f64::from(bitmap.width) * self.options.page.height / self.options.page.width;
        let offsets = page_offsets(f64::from(bitmap.height), page_height);
        let document = self.composer.compose(&bitmap, self.options.page)?;
        let output_path = self.composer.save(document, &self.options.output_filename)?;
        Ok(ExportSummary {
            page_count: offsets.len(),
            output_path,
        })
    }
}

/// Export collaborator injection point: the shell either wires a concrete
/// pipeline or states up front that none is available.
pub enum ExportRenderer {
    Available(ExportPipeline),
    Unavailable,
}

impl ExportRenderer {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}
