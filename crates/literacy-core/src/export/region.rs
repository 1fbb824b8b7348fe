//! The report region that gets snapshotted, and its temporary render mode.

use std::sync::{Mutex, PoisonError};

use crate::report::ReportView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Screen,
    /// Solid colours, no translucency; applied only while capturing.
    Print,
}

/// A rendered report plus the visual mode it is currently drawn in.
#[derive(Debug)]
pub struct ReportRegion {
    view: ReportView,
    mode: Mutex<RenderMode>,
}

impl ReportRegion {
    pub fn new(view: ReportView) -> Self {
        Self {
            view,
            mode: Mutex::new(RenderMode::Screen),
        }
    }

    pub fn view(&self) -> &ReportView {
        &self.view
    }

    pub fn mode(&self) -> RenderMode {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_mode(&self, mode: RenderMode) -> RenderMode {
        let mut guard = self.mode.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, mode)
    }

    /// Switch to `mode` until the returned guard is dropped.
    pub fn override_mode(&self, mode: RenderMode) -> ModeOverride<'_> {
        let previous = self.set_mode(mode);
        ModeOverride {
            region: self,
            previous,
        }
    }
}

/// Restores the previous render mode on drop.
#[must_use = "the override ends when this guard is dropped"]
pub struct ModeOverride<'a> {
    region: &'a ReportRegion,
    previous: RenderMode,
}

impl Drop for ModeOverride<'_> {
    fn drop(&mut self) {
        self.region.set_mode(self.previous);
    }
}
