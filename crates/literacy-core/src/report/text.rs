//! Terminal rendering of a [`ReportView`].

use std::fmt::Write;

use super::markup::Span;
use super::view::{ReportView, ScoreTile};

const BAR_CELLS: usize = 20;
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Emphasis rendered with ANSI bold.
    Ansi,
    Plain,
}

/// Render the dashboard as text.
pub fn render(view: &ReportView, style: Style) -> String {
    let mut out = String::new();
    let title = view.title();
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    out.push('\n');

    let _ = writeln!(out, "Overall competency");
    let _ = writeln!(out, "  {} / 100", view.overall);
    let _ = writeln!(out, "  {}", emphasize(&view.persona.name, style));
    let _ = writeln!(out, "  {}", view.persona.description);
    out.push('\n');

    let width = label_width(&view.tiles);
    let _ = writeln!(out, "Category scores");
    for tile in &view.tiles {
        let _ = writeln!(out, "  {:<width$}  {:>3}", one_line(&tile.label), tile.score);
    }
    out.push('\n');

    let _ = writeln!(out, "Focus areas (weakest first)");
    for tile in &view.ranked {
        let _ = writeln!(
            out,
            "  {:<width$}  {} {:>3}",
            one_line(&tile.label),
            bar(tile.score),
            tile.score
        );
    }

    for section in &view.sections {
        out.push('\n');
        let _ = writeln!(out, "{}", section.title);
        let _ = writeln!(out, "{}", "-".repeat(section.title.chars().count()));
        for item in &section.items {
            let _ = writeln!(out, "  › {}", spans(item, style));
        }
    }
    out
}

fn one_line(label: &str) -> String {
    label.split('\n').map(str::trim).collect::<Vec<_>>().join(" ")
}

fn label_width(tiles: &[ScoreTile]) -> usize {
    tiles
        .iter()
        .map(|t| one_line(&t.label).chars().count())
        .max()
        .unwrap_or(0)
}

fn bar(score: u8) -> String {
    let filled = (usize::from(score.min(100)) * BAR_CELLS + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

fn emphasize(text: &str, style: Style) -> String {
    match style {
        Style::Ansi => format!("{BOLD}{text}{RESET}"),
        Style::Plain => text.to_string(),
    }
}

fn spans(items: &[Span], style: Style) -> String {
    items
        .iter()
        .map(|s| {
            if s.emphasis {
                emphasize(&s.text, style)
            } else {
                s.text.clone()
            }
        })
        .collect()
}
