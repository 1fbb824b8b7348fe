use std::time::Duration;

use clap::Subcommand;
use literacy_core::analysis::loading_message;
use literacy_core::session::{Progress, StepStatus, StepperEntry};
use literacy_core::{
    AnalysisError, Analyzer, AppState, CategoryScore, Config, Likert, MockAnalyzer, Narrative,
    Session, SessionEvent,
};
use serde::Serialize;

use super::{blocked, open_session, runtime};

#[derive(Subcommand)]
pub enum SurveyAction {
    /// Begin the survey
    Start,
    /// Print the current survey state
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the questions of the current category
    Show,
    /// Answer a question of the current survey
    Answer {
        /// Question ID (e.g. "k1")
        id: String,
        /// Agreement from 1 (strongly disagree) to 5 (strongly agree)
        value: u8,
    },
    /// Go to the next category
    Next,
    /// Go back to the previous category
    Prev,
    /// Submit the answers for analysis
    Submit,
    /// Discard all progress and results
    Restart,
}

#[derive(Serialize)]
struct StatusView<'a> {
    state: AppState,
    step: usize,
    steps: usize,
    category: Option<&'a str>,
    progress: Progress,
    can_advance: bool,
    can_submit: bool,
    stepper: Vec<StepperEntry>,
}

fn status_view(session: &Session) -> StatusView<'_> {
    StatusView {
        state: session.state(),
        step: session.current_step(),
        steps: session.catalog().len(),
        category: session.current_category().map(|c| c.short_title()),
        progress: session.progress(),
        can_advance: session.can_advance(),
        can_submit: session.can_submit(),
        stepper: session.stepper(),
    }
}

fn print_event(event: &SessionEvent) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

fn require_survey(session: &Session) {
    match session.state() {
        AppState::Survey => {}
        AppState::Results => blocked("survey already submitted; run `survey restart` to retake it"),
        _ => blocked("survey not started; run `survey start`"),
    }
}

/// Await the analysis, printing a rotating progress message meanwhile.
async fn analyze_with_progress(
    analyzer: &dyn Analyzer,
    scores: &[CategoryScore],
    every: Duration,
) -> Result<Narrative, AnalysisError> {
    let mut analysis = analyzer.analyze(scores);
    let mut ticker = tokio::time::interval(every);
    let mut tick = 0;
    loop {
        tokio::select! {
            outcome = &mut analysis => return outcome,
            _ = ticker.tick() => {
                eprintln!("{}", loading_message(tick));
                tick += 1;
            }
        }
    }
}

pub fn run(action: SurveyAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut session = open_session(&config)?;

    match action {
        SurveyAction::Start => match session.start() {
            Some(event) => print_event(&event)?,
            None => blocked(&format!(
                "survey cannot start from the {} screen; run `survey restart` first",
                session.state()
            )),
        },
        SurveyAction::Status { json } => {
            let view = status_view(&session);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("State: {}", view.state);
                if view.state == AppState::Survey {
                    println!(
                        "Step {}/{}: {}",
                        view.step + 1,
                        view.steps,
                        view.category.unwrap_or("").replace('\n', " ")
                    );
                    println!(
                        "Answered: {}/{} ({:.0}%)",
                        view.progress.answered,
                        view.progress.total,
                        view.progress.percent()
                    );
                    for entry in &view.stepper {
                        let marker = match entry.status {
                            StepStatus::Done => "[x]",
                            StepStatus::Current => "[>]",
                            StepStatus::Pending => "[ ]",
                        };
                        println!("  {marker} {}", entry.title.replace('\n', " "));
                    }
                }
            }
        }
        SurveyAction::Show => {
            require_survey(&session);
            let Some(category) = session.current_category() else {
                blocked("no category at the current step");
            };
            println!("{}", category.title.replace('\n', " "));
            println!("{}", category.description);
            println!();
            for question in &category.questions {
                let answer = session
                    .answers()
                    .get(&question.id)
                    .map_or_else(|| "-".to_string(), |l| l.to_string());
                println!("  [{answer}] {:<4} {}", question.id, question.text);
            }
            println!();
            let scale: Vec<String> = Likert::all()
                .map(|l| format!("{} = {}", l.value(), l.label()))
                .collect();
            println!("{}", scale.join(", "));
        }
        SurveyAction::Answer { id, value } => {
            require_survey(&session);
            let score = Likert::try_from(value)?;
            if let Some(event) = session.record_answer(&id, score)? {
                print_event(&event)?;
            }
        }
        SurveyAction::Next => {
            require_survey(&session);
            match session.next() {
                Some(event) => print_event(&event)?,
                None if session.is_last_step() => {
                    blocked("already at the last category; run `survey submit`")
                }
                None => blocked("answer every question in this category first"),
            }
        }
        SurveyAction::Prev => {
            require_survey(&session);
            match session.prev() {
                Some(event) => print_event(&event)?,
                None => blocked("already at the first category"),
            }
        }
        SurveyAction::Submit => {
            require_survey(&session);
            if session.begin_submit().is_none() {
                if session.is_last_step() {
                    blocked("answer every question in this category first");
                }
                blocked("submit is only available on the last category");
            }

            let scores = session.pending_scores().unwrap_or_default().to_vec();
            let analyzer = MockAnalyzer::new(config.analysis.delay());
            let outcome = runtime()?.block_on(analyze_with_progress(
                &analyzer,
                &scores,
                config.analysis.loading_message_interval(),
            ));

            match session.complete_submit(outcome) {
                Some(SessionEvent::AnalysisFailed { message, .. }) => {
                    return Err(format!("analysis failed, your answers are kept: {message}").into());
                }
                Some(event) => print_event(&event)?,
                None => blocked("analysis is not in progress"),
            }
        }
        SurveyAction::Restart => {
            if let Some(event) = session.restart() {
                print_event(&event)?;
            }
        }
    }
    Ok(())
}
