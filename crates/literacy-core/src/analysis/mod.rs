//! Narrative analysis of category scores.
//!
//! The [`Analyzer`] trait is the seam where an external reasoning service
//! plugs in. This build ships [`MockAnalyzer`], which waits a fixed delay
//! and returns canned content.

mod mock;

pub use mock::MockAnalyzer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::survey::CategoryScore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub description: String,
}

/// Narrative payload returned by an analyzer.
///
/// Lines may contain paired `**` emphasis markers; only the report
/// renderer interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub persona: Persona,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Scores plus the narrative that decorates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scores: Vec<CategoryScore>,
    pub analysis: Narrative,
}

/// External analysis collaborator.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Produce a narrative for the given category scores.
    async fn analyze(&self, scores: &[CategoryScore]) -> Result<Narrative, AnalysisError>;
}

/// Progress messages shown while an analysis is outstanding.
pub const LOADING_MESSAGES: [&str; 5] = [
    "The AI consultant is analyzing your answers...",
    "Building your personalized report...",
    "Identifying strengths and areas to improve...",
    "Assessing your AI literacy and designing a growth strategy...",
    "Almost done. Please wait a moment.",
];

/// Message to show for the `tick`-th loading interval.
pub fn loading_message(tick: usize) -> &'static str {
    LOADING_MESSAGES[tick % LOADING_MESSAGES.len()]
}
