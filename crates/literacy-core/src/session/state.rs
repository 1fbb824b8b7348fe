use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level screen of the application.
///
/// ```text
/// Welcome -> Survey -> Loading -> Results -> (restart) Welcome
///    |                    |
///    |                    +-- analysis failure --> Survey
///    +-> SampleSurvey -> Welcome | Results (sample data)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    Welcome,
    Survey,
    Loading,
    Results,
    SampleSurvey,
}

impl AppState {
    pub fn as_str(self) -> &'static str {
        match self {
            AppState::Welcome => "welcome",
            AppState::Survey => "survey",
            AppState::Loading => "loading",
            AppState::Results => "results",
            AppState::SampleSurvey => "sample_survey",
        }
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stepper marker for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Done,
    Current,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepperEntry {
    pub title: String,
    pub status: StepStatus,
}

/// Answered / total for the current category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// 0..=100 fill of the progress bar.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64 * 100.0
    }
}
