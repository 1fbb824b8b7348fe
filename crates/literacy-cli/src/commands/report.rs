use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Subcommand;
use literacy_core::report::text::{self, Style};
use literacy_core::{
    AppState, ChartRasterizer, Config, ExportOutcome, ExportSettings, Exporter, PdfAssembler,
    ReportRegion, ReportView,
};

use super::{blocked, open_session, runtime, scratch_session};

#[derive(Subcommand)]
pub enum ReportAction {
    /// Show the results dashboard
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Disable ANSI emphasis
        #[arg(long)]
        plain: bool,
        /// Use the sample results
        #[arg(long)]
        sample: bool,
    },
    /// Export the dashboard as a PDF
    Export {
        /// Directory to write the document to
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Use the sample results
        #[arg(long)]
        sample: bool,
    },
}

fn load_view(config: &Config, sample: bool) -> Result<ReportView, Box<dyn std::error::Error>> {
    let session = if sample {
        let mut session = scratch_session(config)?;
        session.view_sample();
        session
    } else {
        open_session(config)?
    };

    match (session.state(), session.result()) {
        (AppState::Results, Some(result)) => Ok(ReportView::from_result(result, session.is_sample())),
        _ => blocked("no results yet; finish the survey or pass --sample"),
    }
}

pub fn run(action: ReportAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        ReportAction::Show {
            json,
            plain,
            sample,
        } => {
            let view = load_view(&config, sample)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                let style = if plain || !std::io::stdout().is_terminal() {
                    Style::Plain
                } else {
                    Style::Ansi
                };
                print!("{}", text::render(&view, style));
            }
        }
        ReportAction::Export { out_dir, sample } => {
            let view = load_view(&config, sample)?;
            let mut settings = ExportSettings::from_config(&config.export);
            if let Some(dir) = out_dir {
                settings.output_dir = dir;
            }

            let assembler = PdfAssembler::new(view.title());
            let region = ReportRegion::new(view);
            let mut exporter = Exporter::new(ChartRasterizer, assembler, settings);

            let outcome = runtime()?.block_on(async {
                exporter.prepare().await;
                exporter.export(&region).await
            })?;
            match outcome {
                ExportOutcome::Saved { path, pages } => {
                    println!("saved {} ({pages} page{})", path.display(), if pages == 1 { "" } else { "s" });
                }
                ExportOutcome::Busy => blocked("an export is already in progress"),
            }
        }
    }
    Ok(())
}
