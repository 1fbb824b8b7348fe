use async_trait::async_trait;
use std::time::Duration;

use super::{Analyzer, Narrative};
use crate::error::AnalysisError;
use crate::sample;
use crate::survey::CategoryScore;

/// Stand-in analyzer: fixed delay, then the sample narrative.
///
/// No external call is made.
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    delay: Duration,
    failure: Option<String>,
}

impl MockAnalyzer {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
        }
    }

    /// An analyzer that rejects with `message` after the delay.
    pub fn failing(delay: Duration, message: impl Into<String>) -> Self {
        Self {
            delay,
            failure: Some(message.into()),
        }
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, scores: &[CategoryScore]) -> Result<Narrative, AnalysisError> {
        tracing::info!(?scores, "generating mock analysis from sample data");
        tokio::time::sleep(self.delay).await;

        match &self.failure {
            Some(message) => Err(AnalysisError::Rejected(message.clone())),
            None => Ok(sample::sample_result().analysis),
        }
    }
}
