//! Session state container.
//!
//! The session is the single writable source of truth. Every mutation goes
//! through a named command which returns `Some(SessionEvent)` when the
//! transition happened and `None` when it was blocked (state unchanged).
//! Persistence is best-effort: write failures are logged, never propagated.

use chrono::Utc;

use super::state::{AppState, Progress, StepStatus, StepperEntry};
use crate::analysis::{AnalysisResult, Analyzer, Narrative};
use crate::error::{AnalysisError, StoreError, ValidationError};
use crate::events::SessionEvent;
use crate::sample;
use crate::storage::{ProgressStore, SavedProgress};
use crate::survey::{
    answered_count, compute_category_scores, is_category_complete, overall_score, Catalog,
    Category, CategoryScore, Likert, SurveyData,
};

pub struct Session {
    catalog: Catalog,
    store: ProgressStore,
    app_state: AppState,
    current_step: usize,
    answers: SurveyData,
    result: Option<AnalysisResult>,
    is_sample: bool,
    sample_answers: SurveyData,
    pending_scores: Option<Vec<CategoryScore>>,
}

impl Session {
    /// Fresh session at `Welcome`, ignoring anything persisted.
    pub fn new(catalog: Catalog, store: ProgressStore) -> Self {
        Self {
            catalog,
            store,
            app_state: AppState::Welcome,
            current_step: 0,
            answers: SurveyData::new(),
            result: None,
            is_sample: false,
            sample_answers: SurveyData::new(),
            pending_scores: None,
        }
    }

    /// Rehydrate from the store.
    ///
    /// A saved result restores straight to `Results`. Saved progress
    /// restores to `Survey` when its step fits the catalog. Corrupt records
    /// wipe the store; any read failure starts a fresh session.
    pub fn restore(catalog: Catalog, store: ProgressStore) -> Self {
        let loaded = store.load();
        let mut session = Self::new(catalog, store);

        match loaded {
            Ok(Some(SavedProgress::Completed(result))) => {
                session.result = Some(result);
                session.app_state = AppState::Results;
            }
            Ok(Some(SavedProgress::InProgress { step, answers })) => {
                if step < session.catalog.len() {
                    session.current_step = step;
                    session.answers = answers;
                    session.app_state = AppState::Survey;
                } else {
                    tracing::debug!(step, "saved step outside catalog, starting fresh");
                }
            }
            Ok(None) => {}
            Err(e @ StoreError::Corrupt { .. }) => {
                tracing::warn!(error = %e, "discarding corrupt saved progress");
                if let Err(e) = session.store.clear() {
                    tracing::warn!(error = %e, "failed to clear corrupt saved progress");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load saved progress");
            }
        }

        tracing::debug!(state = %session.app_state, step = session.current_step, "session restored");
        session
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> AppState {
        self.app_state
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn answers(&self) -> &SurveyData {
        &self.answers
    }

    pub fn sample_answers(&self) -> &SurveyData {
        &self.sample_answers
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn is_sample(&self) -> bool {
        self.is_sample
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn current_category(&self) -> Option<&Category> {
        self.catalog.get(self.current_step)
    }

    /// Category shown in the sample survey.
    pub fn sample_category(&self) -> Option<&Category> {
        self.catalog.get(0)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == self.catalog.last_step()
    }

    pub fn progress(&self) -> Progress {
        let category = self.current_category();
        Progress {
            answered: category.map_or(0, |c| answered_count(c, &self.answers)),
            total: category.map_or(0, |c| c.questions.len()),
        }
    }

    fn current_complete(&self) -> bool {
        self.current_category()
            .is_some_and(|c| is_category_complete(c, &self.answers))
    }

    /// Forward motion is allowed once the current category is complete.
    pub fn can_advance(&self) -> bool {
        self.app_state == AppState::Survey && !self.is_last_step() && self.current_complete()
    }

    pub fn can_submit(&self) -> bool {
        self.app_state == AppState::Survey && self.is_last_step() && self.current_complete()
    }

    pub fn stepper(&self) -> Vec<StepperEntry> {
        self.catalog
            .categories
            .iter()
            .enumerate()
            .map(|(index, category)| StepperEntry {
                title: category.short_title().to_string(),
                status: match index.cmp(&self.current_step) {
                    std::cmp::Ordering::Less => StepStatus::Done,
                    std::cmp::Ordering::Equal => StepStatus::Current,
                    std::cmp::Ordering::Greater => StepStatus::Pending,
                },
            })
            .collect()
    }

    /// Scores for the current answer map.
    pub fn scores(&self) -> Vec<CategoryScore> {
        compute_category_scores(&self.catalog, &self.answers)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<SessionEvent> {
        if self.app_state != AppState::Welcome {
            return None;
        }
        self.app_state = AppState::Survey;
        self.current_step = 0;
        self.is_sample = false;
        self.persist_progress();
        tracing::debug!("survey started");
        Some(SessionEvent::SurveyStarted { at: Utc::now() })
    }

    /// Record an answer while in the survey.
    ///
    /// # Errors
    /// Returns [`ValidationError::UnknownQuestion`] when the id is not in
    /// the catalog.
    pub fn record_answer(
        &mut self,
        question_id: &str,
        score: Likert,
    ) -> Result<Option<SessionEvent>, ValidationError> {
        if self.app_state != AppState::Survey {
            return Ok(None);
        }
        if self.catalog.question(question_id).is_none() {
            return Err(ValidationError::UnknownQuestion(question_id.to_string()));
        }

        self.answers.record(question_id, score);
        self.persist_progress();
        Ok(Some(SessionEvent::AnswerRecorded {
            question_id: question_id.to_string(),
            score: score.value(),
            step: self.current_step,
            at: Utc::now(),
        }))
    }

    pub fn next(&mut self) -> Option<SessionEvent> {
        if !self.can_advance() {
            return None;
        }
        self.move_to(self.current_step + 1)
    }

    /// Step back; unconditional but bounded at step 0.
    pub fn prev(&mut self) -> Option<SessionEvent> {
        if self.app_state != AppState::Survey || self.current_step == 0 {
            return None;
        }
        self.move_to(self.current_step - 1)
    }

    fn move_to(&mut self, to_step: usize) -> Option<SessionEvent> {
        let from_step = self.current_step;
        self.current_step = to_step;
        self.persist_progress();
        tracing::debug!(from_step, to_step, "step changed");
        Some(SessionEvent::StepChanged {
            from_step,
            to_step,
            at: Utc::now(),
        })
    }

    /// Enter `Loading` and compute the scores to analyze.
    pub fn begin_submit(&mut self) -> Option<SessionEvent> {
        if !self.can_submit() {
            return None;
        }
        let scores = self.scores();
        self.app_state = AppState::Loading;
        self.pending_scores = Some(scores.clone());
        tracing::info!(categories = scores.len(), "analysis started");
        Some(SessionEvent::AnalysisStarted {
            scores,
            at: Utc::now(),
        })
    }

    /// Scores awaiting analysis, while `Loading`.
    pub fn pending_scores(&self) -> Option<&[CategoryScore]> {
        self.pending_scores.as_deref()
    }

    /// Apply the analyzer's outcome to a `Loading` session.
    ///
    /// Success stores and persists the result and shows `Results`. Failure
    /// returns to the last survey step with answers intact.
    pub fn complete_submit(
        &mut self,
        outcome: Result<Narrative, AnalysisError>,
    ) -> Option<SessionEvent> {
        if self.app_state != AppState::Loading {
            return None;
        }
        let scores = self.pending_scores.take().unwrap_or_else(|| self.scores());

        match outcome {
            Ok(analysis) => {
                let overall = overall_score(&scores).unwrap_or(0);
                let result = AnalysisResult { scores, analysis };
                if let Err(e) = self.store.save_result(&result) {
                    tracing::warn!(error = %e, "failed to persist analysis result");
                }
                self.result = Some(result);
                self.is_sample = false;
                self.app_state = AppState::Results;
                tracing::info!(overall, "analysis completed");
                Some(SessionEvent::AnalysisCompleted {
                    overall,
                    at: Utc::now(),
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "analysis failed");
                self.app_state = AppState::Survey;
                Some(SessionEvent::AnalysisFailed {
                    message: e.to_string(),
                    step: self.current_step,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Run the whole `Survey -> Loading -> Results | Survey` sequence.
    pub async fn submit(&mut self, analyzer: &dyn Analyzer) -> Option<SessionEvent> {
        self.begin_submit()?;
        let scores = self.pending_scores.clone().unwrap_or_default();
        let outcome = analyzer.analyze(&scores).await;
        self.complete_submit(outcome)
    }

    /// Show the precomputed sample result. Never persisted.
    pub fn view_sample(&mut self) -> Option<SessionEvent> {
        if !matches!(self.app_state, AppState::Welcome | AppState::SampleSurvey) {
            return None;
        }
        self.result = Some(sample::sample_result());
        self.is_sample = true;
        self.sample_answers.clear();
        self.app_state = AppState::Results;
        Some(SessionEvent::SampleOpened { at: Utc::now() })
    }

    pub fn open_sample_survey(&mut self) -> Option<SessionEvent> {
        if self.app_state != AppState::Welcome {
            return None;
        }
        self.sample_answers.clear();
        self.app_state = AppState::SampleSurvey;
        Some(SessionEvent::SampleSurveyOpened { at: Utc::now() })
    }

    /// Answer a question of the sample category. Sandbox only.
    ///
    /// # Errors
    /// Returns [`ValidationError::UnknownQuestion`] when the id is not part
    /// of the sample category.
    pub fn answer_sample(
        &mut self,
        question_id: &str,
        score: Likert,
    ) -> Result<Option<SessionEvent>, ValidationError> {
        if self.app_state != AppState::SampleSurvey {
            return Ok(None);
        }
        if !self.sample_category().is_some_and(|c| c.contains(question_id)) {
            return Err(ValidationError::UnknownQuestion(question_id.to_string()));
        }
        self.sample_answers.record(question_id, score);
        Ok(Some(SessionEvent::AnswerRecorded {
            question_id: question_id.to_string(),
            score: score.value(),
            step: 0,
            at: Utc::now(),
        }))
    }

    pub fn leave_sample_survey(&mut self) -> Option<SessionEvent> {
        if self.app_state != AppState::SampleSurvey {
            return None;
        }
        self.sample_answers.clear();
        self.app_state = AppState::Welcome;
        Some(SessionEvent::SampleSurveyClosed { at: Utc::now() })
    }

    /// Clear memory and every persisted field; back to `Welcome`.
    pub fn restart(&mut self) -> Option<SessionEvent> {
        let from = self.app_state;
        self.app_state = AppState::Welcome;
        self.current_step = 0;
        self.answers.clear();
        self.sample_answers.clear();
        self.result = None;
        self.is_sample = false;
        self.pending_scores = None;
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear saved progress");
        }
        tracing::debug!(%from, "session restarted");
        Some(SessionEvent::SessionRestarted {
            from,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist_progress(&self) {
        if let Err(e) = self.store.save(self.current_step, &self.answers) {
            tracing::warn!(error = %e, "failed to save progress");
        }
    }
}
