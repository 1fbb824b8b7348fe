//! Export orchestration: probe, snapshot, paginate, assemble, write.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::capability::{Capability, CapabilityProbe, CapabilityStatus};
use super::page::{paginate, PageGeometry};
use super::pdf::DocumentAssembler;
use super::raster::Raster;
use super::rasterizer::Rasterizer;
use super::region::{RenderMode, ReportRegion};
use crate::error::ExportError;
use crate::storage::ExportConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub file_name: String,
    pub output_dir: PathBuf,
    pub scale: u32,
    pub geometry: PageGeometry,
    pub poll_interval: Duration,
    pub probe_timeout: Duration,
    pub settle_delay: Duration,
}

impl ExportSettings {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            file_name: config.file_name.clone(),
            output_dir: config.output_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            scale: config.scale,
            geometry: PageGeometry::A4,
            poll_interval: config.poll_interval(),
            probe_timeout: config.probe_timeout(),
            settle_delay: config.settle_delay(),
        }
    }

    pub fn target_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { path: PathBuf, pages: usize },
    /// Another export was already running; nothing was done.
    Busy,
}

pub struct Exporter<R, A> {
    rasterizer: R,
    assembler: A,
    probe: CapabilityProbe,
    settings: ExportSettings,
    in_flight: AtomicBool,
}

impl<R: Rasterizer, A: DocumentAssembler> Exporter<R, A> {
    pub fn new(rasterizer: R, assembler: A, settings: ExportSettings) -> Self {
        Self {
            rasterizer,
            assembler,
            probe: CapabilityProbe::new(),
            settings,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn status(&self) -> CapabilityStatus {
        self.probe.status()
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Wait for the rasterizer and assembler to become usable.
    pub async fn prepare(&mut self) -> CapabilityStatus {
        let capabilities: [&dyn Capability; 2] = [&self.rasterizer, &self.assembler];
        self.probe
            .run(
                &capabilities,
                self.settings.poll_interval,
                self.settings.probe_timeout,
            )
            .await
    }

    /// Export `region` to the configured file.
    ///
    /// At most one export runs at a time; a call made while another is in
    /// progress returns [`ExportOutcome::Busy`] immediately.
    pub async fn export(&self, region: &ReportRegion) -> Result<ExportOutcome, ExportError> {
        match self.probe.status() {
            CapabilityStatus::Ready => {}
            CapabilityStatus::Unavailable => return Err(ExportError::NotReady),
            CapabilityStatus::Error => {
                return Err(ExportError::CapabilityUnavailable(
                    self.probe.missing().join(", "),
                ))
            }
        }

        let Some(_flight) = FlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("export already in progress, ignoring trigger");
            return Ok(ExportOutcome::Busy);
        };

        let result = self.run(region).await;
        match &result {
            Ok(ExportOutcome::Saved { path, pages }) => {
                tracing::info!(path = %path.display(), pages, "report exported");
            }
            Ok(ExportOutcome::Busy) => {}
            Err(e) => tracing::error!(error = %e, "report export failed"),
        }
        result
    }

    async fn run(&self, region: &ReportRegion) -> Result<ExportOutcome, ExportError> {
        tokio::time::sleep(self.settings.settle_delay).await;

        let image = {
            let _print = region.override_mode(RenderMode::Print);
            self.rasterizer.snapshot(region, self.settings.scale).await?
        };

        let pages: Vec<Raster> = paginate(image.width(), image.height(), &self.settings.geometry)
            .into_iter()
            .map(|band| image.crop_rows(band.y, band.height))
            .collect();
        let document = self.assembler.assemble(&pages, &self.settings.geometry)?;

        let path = self.settings.target_path();
        write_atomically(&path, &document)?;
        Ok(ExportOutcome::Saved {
            path,
            pages: pages.len(),
        })
    }
}

/// Holds the single-flight flag for the duration of one export.
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Write to a hidden sibling first so a failed export never leaves a
/// truncated document under the real name.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let partial = path.with_file_name(format!(".{name}.partial"));

    let write = || -> std::io::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&partial, bytes)?;
        std::fs::rename(&partial, path)
    };

    write().map_err(|source| {
        let _ = std::fs::remove_file(&partial);
        ExportError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}
