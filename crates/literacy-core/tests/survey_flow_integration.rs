//! Integration tests for the survey lifecycle.
//!
//! Drives a file-backed session from Welcome to Results, reopening the
//! database between steps the way a relaunch would, then exports the
//! dashboard.

use std::path::Path;
use std::time::Duration;

use literacy_core::export::{Capability, DocumentAssembler, PageGeometry, Raster};
use literacy_core::{
    AppState, Catalog, CapabilityStatus, ChartRasterizer, Database, ExportError, ExportOutcome,
    ExportSettings, Exporter, Likert, MockAnalyzer, PdfAssembler, ProgressStore, ReportRegion,
    ReportView, SavedProgress, Session,
};

fn open(path: &Path) -> Session {
    let store = ProgressStore::new(Database::open_at(path).unwrap());
    Session::restore(Catalog::builtin(), store)
}

fn answer_current(session: &mut Session, value: u8) {
    let ids: Vec<String> = session
        .current_category()
        .unwrap()
        .questions
        .iter()
        .map(|q| q.id.clone())
        .collect();
    for id in ids {
        session
            .record_answer(&id, Likert::new(value).unwrap())
            .unwrap()
            .unwrap();
    }
}

#[tokio::test]
async fn test_full_survey_survives_relaunches() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("literacy.db");

    let mut session = open(&db_path);
    assert_eq!(session.state(), AppState::Welcome);
    session.start().unwrap();
    answer_current(&mut session, 4);
    session.next().unwrap();
    drop(session);

    // relaunch mid-survey
    let mut session = open(&db_path);
    assert_eq!(session.state(), AppState::Survey);
    assert_eq!(session.current_step(), 1);
    assert_eq!(session.answers().len(), 4);
    assert!(session.next().is_none(), "step 1 is not answered yet");

    while !session.is_last_step() {
        answer_current(&mut session, 4);
        session.next().unwrap();
    }
    answer_current(&mut session, 4);
    assert!(session.can_submit());

    session.submit(&MockAnalyzer::new(Duration::ZERO)).await.unwrap();
    assert_eq!(session.state(), AppState::Results);
    let result = session.result().unwrap().clone();
    assert_eq!(result.scores.len(), 7);
    assert!(result.scores.iter().all(|s| s.score == 75));
    drop(session);

    // relaunch after completion goes straight to the results
    let session = open(&db_path);
    assert_eq!(session.state(), AppState::Results);
    assert_eq!(session.result(), Some(&result));
    assert!(!session.is_sample());
}

#[tokio::test]
async fn test_failed_analysis_keeps_answers_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("literacy.db");

    let mut session = open(&db_path);
    session.start().unwrap();
    while !session.is_last_step() {
        answer_current(&mut session, 2);
        session.next().unwrap();
    }
    answer_current(&mut session, 2);

    let event = session
        .submit(&MockAnalyzer::failing(Duration::ZERO, "upstream unavailable"))
        .await
        .unwrap();
    assert!(matches!(
        event,
        literacy_core::SessionEvent::AnalysisFailed { .. }
    ));
    assert_eq!(session.state(), AppState::Survey);
    drop(session);

    let session = open(&db_path);
    assert_eq!(session.state(), AppState::Survey);
    assert_eq!(session.current_step(), 6);
    assert_eq!(session.answers().len(), 28);
}

#[test]
fn test_restart_clears_disk_state() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("literacy.db");

    let mut session = open(&db_path);
    session.start().unwrap();
    answer_current(&mut session, 5);
    session.restart().unwrap();
    drop(session);

    let store = ProgressStore::new(Database::open_at(&db_path).unwrap());
    assert!(store.load().unwrap().is_none());
    assert_eq!(open(&db_path).state(), AppState::Welcome);
}

#[test]
fn test_sample_is_never_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("literacy.db");

    let mut session = open(&db_path);
    session.view_sample().unwrap();
    assert!(session.is_sample());
    drop(session);

    assert_eq!(open(&db_path).state(), AppState::Welcome);
}

/// Assembler that is never ready.
struct MissingAssembler;

impl Capability for MissingAssembler {
    fn name(&self) -> &str {
        "pdf-writer"
    }

    fn is_ready(&self) -> bool {
        false
    }
}

impl DocumentAssembler for MissingAssembler {
    fn assemble(&self, _: &[Raster], _: &PageGeometry) -> Result<Vec<u8>, ExportError> {
        unreachable!("never ready")
    }
}

#[tokio::test(start_paused = true)]
async fn test_export_writes_pdf_without_touching_session() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("literacy.db");

    let mut session = open(&db_path);
    session.view_sample().unwrap();
    let region = ReportRegion::new(ReportView::from_result(session.result().unwrap(), true));

    let settings = ExportSettings {
        output_dir: dir.path().join("out"),
        ..ExportSettings::default()
    };
    let mut exporter = Exporter::new(ChartRasterizer, PdfAssembler::default(), settings);
    assert_eq!(exporter.prepare().await, CapabilityStatus::Ready);

    let outcome = exporter.export(&region).await.unwrap();
    let ExportOutcome::Saved { path, pages } = outcome else {
        panic!("export reported busy");
    };
    assert_eq!(path, dir.path().join("out").join("AI_Literacy_Report.pdf"));
    assert!(pages >= 1);
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));

    assert_eq!(session.state(), AppState::Results);
    assert!(session.is_sample());
    assert!(matches!(session.store().load(), Ok(None)));
}

#[tokio::test(start_paused = true)]
async fn test_export_error_state_is_permanent() {
    let dir = tempfile::tempdir().unwrap();
    let settings = ExportSettings {
        output_dir: dir.path().to_path_buf(),
        ..ExportSettings::default()
    };
    let mut exporter = Exporter::new(ChartRasterizer, MissingAssembler, settings);

    let started = tokio::time::Instant::now();
    assert_eq!(exporter.prepare().await, CapabilityStatus::Error);
    assert!(started.elapsed() >= Duration::from_millis(8000));

    let region = ReportRegion::new(ReportView::from_result(
        &literacy_core::sample::sample_result(),
        true,
    ));
    let err = exporter.export(&region).await.unwrap_err();
    assert!(err.to_string().contains("pdf-writer"));
    assert!(!dir.path().join("AI_Literacy_Report.pdf").exists());
}

#[test]
fn test_saved_progress_shape() {
    let store = ProgressStore::in_memory().unwrap();
    let mut answers = literacy_core::SurveyData::new();
    answers.record("k1", Likert::new(3).unwrap());
    store.save(0, &answers).unwrap();

    assert_eq!(
        store.database().kv_get("surveyData").unwrap().as_deref(),
        Some(r#"{"k1":3}"#)
    );
    assert_eq!(
        store.database().kv_get("surveyStep").unwrap().as_deref(),
        Some("0")
    );
    assert!(matches!(
        store.load().unwrap(),
        Some(SavedProgress::InProgress { step: 0, .. })
    ));
}
