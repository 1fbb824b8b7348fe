use std::io::IsTerminal;

use clap::Subcommand;
use literacy_core::report::text::{self, Style};
use literacy_core::{Config, Likert, ReportView};

use super::{blocked, scratch_session};

#[derive(Subcommand)]
pub enum SampleAction {
    /// Show the dashboard filled with sample results
    View {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Preview the questions of the first category
    Questions,
    /// Try answering one question of the sample category
    Answer {
        /// Question id (e.g. "k1")
        id: String,
        /// Likert value 1-5
        value: u8,
    },
}

pub fn run(action: SampleAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut session = scratch_session(&config)?;

    match action {
        SampleAction::View { json } => {
            if session.view_sample().is_none() {
                blocked("sample results are unavailable");
            }
            let Some(result) = session.result() else {
                blocked("sample results are unavailable");
            };
            let view = ReportView::from_result(result, session.is_sample());
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                let style = if std::io::stdout().is_terminal() {
                    Style::Ansi
                } else {
                    Style::Plain
                };
                print!("{}", text::render(&view, style));
            }
        }
        SampleAction::Questions => {
            if session.open_sample_survey().is_none() {
                blocked("sample survey is unavailable");
            }
            let Some(category) = session.sample_category() else {
                blocked("the catalog has no categories");
            };
            println!("{} (sample)", category.title.replace('\n', " "));
            println!("{}", category.description);
            println!();
            for question in &category.questions {
                println!("  {:<4} {}", question.id, question.text);
            }
            println!();
            for likert in Likert::all() {
                println!("  {} = {}", likert.value(), likert.label());
            }
            println!();
            println!("Sample answers are not saved. Run `survey start` to take the survey.");
        }
        SampleAction::Answer { id, value } => {
            if session.open_sample_survey().is_none() {
                blocked("sample survey is unavailable");
            }
            let score = Likert::try_from(value)?;
            let Some(event) = session.answer_sample(&id, score)? else {
                blocked("sample survey is not open");
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
            if let Some(closed) = session.leave_sample_survey() {
                println!("{}", serde_json::to_string_pretty(&closed)?);
            }
        }
    }
    Ok(())
}
