use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::AppState;
use crate::survey::CategoryScore;

/// Every successful session transition produces an Event.
/// Blocked transitions produce none and leave the session untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    SurveyStarted {
        at: DateTime<Utc>,
    },
    AnswerRecorded {
        question_id: String,
        score: u8,
        step: usize,
        at: DateTime<Utc>,
    },
    StepChanged {
        from_step: usize,
        to_step: usize,
        at: DateTime<Utc>,
    },
    /// Scores computed, waiting on the analyzer.
    AnalysisStarted {
        scores: Vec<CategoryScore>,
        at: DateTime<Utc>,
    },
    AnalysisCompleted {
        overall: u8,
        at: DateTime<Utc>,
    },
    /// Analyzer rejected; the session is back on the last survey step.
    AnalysisFailed {
        message: String,
        step: usize,
        at: DateTime<Utc>,
    },
    SampleOpened {
        at: DateTime<Utc>,
    },
    SampleSurveyOpened {
        at: DateTime<Utc>,
    },
    SampleSurveyClosed {
        at: DateTime<Utc>,
    },
    SessionRestarted {
        from: AppState,
        at: DateTime<Utc>,
    },
}

impl SessionEvent {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::SurveyStarted { at }
            | Self::AnswerRecorded { at, .. }
            | Self::StepChanged { at, .. }
            | Self::AnalysisStarted { at, .. }
            | Self::AnalysisCompleted { at, .. }
            | Self::AnalysisFailed { at, .. }
            | Self::SampleOpened { at }
            | Self::SampleSurveyOpened { at }
            | Self::SampleSurveyClosed { at }
            | Self::SessionRestarted { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = SessionEvent::StepChanged {
            from_step: 0,
            to_step: 1,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "StepChanged");
        assert_eq!(json["to_step"], 1);

        let restarted = SessionEvent::SessionRestarted {
            from: AppState::Results,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&restarted).unwrap();
        assert_eq!(json["from"], "results");
    }
}
