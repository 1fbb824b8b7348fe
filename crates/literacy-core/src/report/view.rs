//! Results dashboard projection.
//!
//! [`ReportView`] is recomputed from an [`AnalysisResult`] whenever it is
//! needed and never stored on its own.

use serde::{Deserialize, Serialize};

use super::markup::{self, Span};
use crate::analysis::{AnalysisResult, Persona};
use crate::survey::{overall_score, short_title};

/// Fixed radial domain of the radar chart.
pub const SCORE_DOMAIN: (u8, u8) = (0, 100);
/// Ticks on the radar radius axis and the bar chart value axis.
pub const TICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTile {
    pub label: String,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Radar {
    /// One axis per category, in category order.
    pub axes: Vec<ScoreTile>,
    pub domain: (u8, u8),
}

impl Radar {
    pub fn ticks(&self) -> Vec<u8> {
        let (lo, hi) = self.domain;
        let step = (hi - lo) as usize / (TICK_COUNT - 1);
        (0..TICK_COUNT).map(|i| lo + (i * step) as u8).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Strengths,
    Weaknesses,
    Recommendations,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Strengths => "Personal strengths",
            SectionKind::Weaknesses => "Areas to improve",
            SectionKind::Recommendations => "Recommended actions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    /// One entry per list item, already stripped of list numbering.
    pub items: Vec<Vec<Span>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportView {
    pub overall: u8,
    pub persona: Persona,
    pub tiles: Vec<ScoreTile>,
    pub radar: Radar,
    /// Same scores sorted ascending, weakest first.
    pub ranked: Vec<ScoreTile>,
    pub sections: Vec<Section>,
    pub is_sample: bool,
}

impl ReportView {
    pub fn from_result(result: &AnalysisResult, is_sample: bool) -> Self {
        let tiles: Vec<ScoreTile> = result
            .scores
            .iter()
            .map(|s| ScoreTile {
                label: short_title(&s.category).to_string(),
                score: s.score,
            })
            .collect();

        let mut ranked = tiles.clone();
        ranked.sort_by_key(|t| t.score);

        let narrative = &result.analysis;
        let sections = [
            (SectionKind::Strengths, &narrative.strengths),
            (SectionKind::Weaknesses, &narrative.weaknesses),
            (SectionKind::Recommendations, &narrative.recommendations),
        ]
        .into_iter()
        .map(|(kind, lines)| Section {
            kind,
            title: kind.title().to_string(),
            items: lines
                .iter()
                .map(|line| markup::parse(markup::strip_list_number(line)))
                .collect(),
        })
        .collect();

        Self {
            overall: overall_score(&result.scores).unwrap_or(0),
            persona: narrative.persona.clone(),
            radar: Radar {
                axes: tiles.clone(),
                domain: SCORE_DOMAIN,
            },
            tiles,
            ranked,
            sections,
            is_sample,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.is_sample {
            "AI Literacy Assessment Results (Sample)"
        } else {
            "AI Literacy Assessment Results"
        }
    }
}
