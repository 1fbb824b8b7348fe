//! Survey session: navigation state machine and progress restore.

mod machine;
mod state;

pub use machine::Session;
pub use state::{AppState, Progress, StepStatus, StepperEntry};
