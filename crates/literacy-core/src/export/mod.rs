//! Paginated document export of the results dashboard.

mod capability;
mod exporter;
mod page;
mod pdf;
mod raster;
mod rasterizer;
mod region;

pub use capability::{Capability, CapabilityProbe, CapabilityStatus};
pub use exporter::{ExportOutcome, ExportSettings, Exporter};
pub use page::{paginate, Band, PageGeometry};
pub use pdf::{DocumentAssembler, PdfAssembler};
pub use raster::{Raster, Rgb};
pub use rasterizer::{render, ChartRasterizer, Palette, Rasterizer, BASE_WIDTH, MAX_SCALE};
pub use region::{ModeOverride, RenderMode, ReportRegion};
