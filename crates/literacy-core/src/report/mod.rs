//! Results dashboard: emphasis markup, the dashboard projection, and a
//! terminal renderer.

pub mod markup;
pub mod text;
mod view;

pub use markup::Span;
pub use view::{Radar, ReportView, ScoreTile, Section, SectionKind, SCORE_DOMAIN, TICK_COUNT};
