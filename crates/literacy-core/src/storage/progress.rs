//! Persisted survey progress.
//!
//! Three independent entries in the kv table:
//!
//! | key              | value                                  |
//! |------------------|----------------------------------------|
//! | `surveyStep`     | current step, integer as string        |
//! | `surveyData`     | answer map as flat `{"id": n}` JSON    |
//! | `analysisResult` | full analysis result as JSON           |
//!
//! A stored result always wins over in-progress answers. There is no
//! version field; unparseable records surface as [`StoreError::Corrupt`].

use super::database::Database;
use crate::analysis::AnalysisResult;
use crate::error::StoreError;
use crate::survey::SurveyData;

pub const STEP_KEY: &str = "surveyStep";
pub const ANSWERS_KEY: &str = "surveyData";
pub const RESULT_KEY: &str = "analysisResult";

/// What `load` found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedProgress {
    /// A finished analysis; step and answers are ignored.
    Completed(AnalysisResult),
    InProgress { step: usize, answers: SurveyData },
}

pub struct ProgressStore {
    db: Database,
}

impl ProgressStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Store over a fresh in-memory database.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(Database::open_memory()?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Overwrite the step pointer and answer map.
    pub fn save(&self, step: usize, answers: &SurveyData) -> Result<(), StoreError> {
        let answers_json = serde_json::to_string(answers).map_err(|e| StoreError::Corrupt {
            key: ANSWERS_KEY.into(),
            message: e.to_string(),
        })?;
        self.db.transaction(|db| {
            db.kv_set(STEP_KEY, &step.to_string())?;
            db.kv_set(ANSWERS_KEY, &answers_json)
        })
    }

    pub fn save_result(&self, result: &AnalysisResult) -> Result<(), StoreError> {
        let json = serde_json::to_string(result).map_err(|e| StoreError::Corrupt {
            key: RESULT_KEY.into(),
            message: e.to_string(),
        })?;
        self.db.kv_set(RESULT_KEY, &json)
    }

    /// Read whatever was saved.
    ///
    /// In-progress state needs both the step and the answers; one without
    /// the other counts as nothing saved.
    ///
    /// # Errors
    /// Returns [`StoreError::Corrupt`] when a present record cannot be
    /// parsed, or a query error if the database cannot be read.
    pub fn load(&self) -> Result<Option<SavedProgress>, StoreError> {
        if let Some(raw) = self.db.kv_get(RESULT_KEY)? {
            let result = serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                key: RESULT_KEY.into(),
                message: e.to_string(),
            })?;
            return Ok(Some(SavedProgress::Completed(result)));
        }

        let step = self.db.kv_get(STEP_KEY)?;
        let answers = self.db.kv_get(ANSWERS_KEY)?;
        let (Some(step), Some(answers)) = (step, answers) else {
            return Ok(None);
        };

        let step = step.trim().parse::<usize>().map_err(|e| StoreError::Corrupt {
            key: STEP_KEY.into(),
            message: e.to_string(),
        })?;
        let answers = serde_json::from_str(&answers).map_err(|e| StoreError::Corrupt {
            key: ANSWERS_KEY.into(),
            message: e.to_string(),
        })?;
        Ok(Some(SavedProgress::InProgress { step, answers }))
    }

    /// Remove all three entries.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.db.transaction(|db| {
            db.kv_delete(STEP_KEY)?;
            db.kv_delete(ANSWERS_KEY)?;
            db.kv_delete(RESULT_KEY)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_result;
    use crate::survey::Likert;

    fn answers() -> SurveyData {
        [("k1", Likert::new(4).unwrap()), ("k2", Likert::new(2).unwrap())]
            .into_iter()
            .collect()
    }

    #[test]
    fn empty_store_loads_nothing() {
        let store = ProgressStore::in_memory().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_load_in_progress() {
        let store = ProgressStore::in_memory().unwrap();
        store.save(2, &answers()).unwrap();
        assert_eq!(
            store.load().unwrap(),
            Some(SavedProgress::InProgress {
                step: 2,
                answers: answers()
            })
        );
        assert_eq!(
            store.database().kv_get(ANSWERS_KEY).unwrap().as_deref(),
            Some(r#"{"k1":4,"k2":2}"#)
        );
        assert_eq!(store.database().kv_get(STEP_KEY).unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn result_takes_precedence_over_stale_progress() {
        let store = ProgressStore::in_memory().unwrap();
        store.save(3, &answers()).unwrap();
        store.save_result(&sample_result()).unwrap();
        assert_eq!(
            store.load().unwrap(),
            Some(SavedProgress::Completed(sample_result()))
        );

        // even a corrupt answer map is ignored once a result exists
        store.database().kv_set(ANSWERS_KEY, "{broken").unwrap();
        assert!(matches!(
            store.load().unwrap(),
            Some(SavedProgress::Completed(_))
        ));
    }

    #[test]
    fn malformed_records_are_corrupt() {
        let store = ProgressStore::in_memory().unwrap();
        store.database().kv_set(STEP_KEY, "two").unwrap();
        store.database().kv_set(ANSWERS_KEY, "{}").unwrap();
        assert!(matches!(
            store.load(),
            Err(StoreError::Corrupt { ref key, .. }) if key == STEP_KEY
        ));

        store.database().kv_set(STEP_KEY, "1").unwrap();
        store.database().kv_set(ANSWERS_KEY, r#"{"k1": 7}"#).unwrap();
        assert!(matches!(
            store.load(),
            Err(StoreError::Corrupt { ref key, .. }) if key == ANSWERS_KEY
        ));

        store.database().kv_set(RESULT_KEY, "[]").unwrap();
        assert!(matches!(
            store.load(),
            Err(StoreError::Corrupt { ref key, .. }) if key == RESULT_KEY
        ));
    }

    #[test]
    fn half_written_progress_counts_as_nothing() {
        let store = ProgressStore::in_memory().unwrap();
        store.database().kv_set(STEP_KEY, "1").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clear_removes_all_three_entries() {
        let store = ProgressStore::in_memory().unwrap();
        store.save(1, &answers()).unwrap();
        store.save_result(&sample_result()).unwrap();
        store.clear().unwrap();
        for key in [STEP_KEY, ANSWERS_KEY, RESULT_KEY] {
            assert!(store.database().kv_get(key).unwrap().is_none());
        }
        assert_eq!(store.load().unwrap(), None);
    }
}
