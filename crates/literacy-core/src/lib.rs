//! # Literacy Core Library
//!
//! Core logic for the AI literacy self-assessment: a multi-category Likert
//! survey, score normalization, persisted progress, and a results dashboard
//! that can be exported as a paginated PDF. The `literacy` CLI is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Survey**: Question catalog, answer map and the category score math
//! - **Session**: State machine driving Welcome → Survey → Loading → Results,
//!   persisting progress on every change
//! - **Analysis**: Pluggable narrative generator; the bundled one is a
//!   fixed-delay mock returning canned content
//! - **Storage**: SQLite key-value store for progress and TOML configuration
//! - **Report / Export**: Dashboard projection, terminal rendering and
//!   single-flight PDF export
//!
//! ## Key Components
//!
//! - [`Session`]: Survey state machine
//! - [`ProgressStore`]: Persisted step, answers and result
//! - [`ReportView`]: Dashboard projection of an [`AnalysisResult`]
//! - [`Exporter`]: Capability probe plus snapshot → paginate → assemble pipeline

pub mod analysis;
pub mod error;
pub mod events;
pub mod export;
pub mod report;
pub mod sample;
pub mod session;
pub mod storage;
pub mod survey;

pub use analysis::{AnalysisResult, Analyzer, MockAnalyzer, Narrative, Persona};
pub use error::{AnalysisError, ConfigError, CoreError, ExportError, StoreError, ValidationError};
pub use events::SessionEvent;
pub use export::{
    CapabilityStatus, ChartRasterizer, ExportOutcome, ExportSettings, Exporter, PdfAssembler,
    ReportRegion,
};
pub use report::ReportView;
pub use session::{AppState, Session};
pub use storage::{Config, Database, ProgressStore, SavedProgress};
pub use survey::{Catalog, CategoryScore, Likert, SurveyData};
