//! Precomputed sample result shown from the welcome screen and returned by
//! the mock analyzer.

use crate::analysis::{AnalysisResult, Narrative, Persona};
use crate::survey::CategoryScore;

const SAMPLE_SCORES: [(&str, u8); 7] = [
    ("AI Fundamentals (Knowledge)", 85),
    ("AI Application (Application)", 65),
    ("Data Literacy (Data Literacy)", 75),
    ("Critical Thinking &\nEthical Use (Critical Thinking & Ethics)", 90),
    ("Collaboration &\nCommunication (Collaboration)", 70),
    ("Learning &\nGrowth Mindset (Growth Mindset)", 88),
    ("Strategic Use &\nInnovation (Strategy & Innovation)", 60),
];

pub fn sample_result() -> AnalysisResult {
    AnalysisResult {
        scores: SAMPLE_SCORES
            .iter()
            .map(|(category, score)| CategoryScore {
                category: (*category).to_string(),
                score: *score,
            })
            .collect(),
        analysis: Narrative {
            persona: Persona {
                name: "Growth-Oriented Pioneer".into(),
                description: "You combine a solid understanding of AI with strong ethical awareness, \
                    and you keep learning new technology as it appears. With more hands-on \
                    experience applying it, you have the potential to become a key talent of \
                    the AI era."
                    .into(),
            },
            strengths: vec![
                "Your critical thinking about the ethical side of AI is outstanding. It lets you \
                 spot risks early when AI is introduced and helps build a healthy culture of use."
                    .into(),
                "Your strong will to learn gives you room to grow fast. A positive attitude toward \
                 change is an important driver of your organization's AI transition."
                    .into(),
            ],
            weaknesses: vec![
                "**Strategic use & innovation** and **AI application** are relatively weak. This \
                 can make it hard to turn ideas into concrete results."
                    .into(),
                "Beyond conceptual understanding, you need practical experience using specific AI \
                 tools to improve processes or uncover business opportunities."
                    .into(),
            ],
            recommendations: vec![
                "**Start a no-code AI project:** use tools such as Teachable Machine or Power \
                 Automate to automate a small repetitive task of your own."
                    .into(),
                "**Join an internal AI case study group:** learn from other teams' successes and \
                 turn them into concrete ideas for your own team."
                    .into(),
                "**Study one AI business article or lecture a week:** follow innovation cases in \
                 business journals and online courses to broaden your strategic thinking."
                    .into(),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{overall_score, Catalog};

    #[test]
    fn sample_titles_match_builtin_catalog() {
        let catalog = Catalog::builtin();
        let result = sample_result();
        assert_eq!(result.scores.len(), catalog.len());
        for (score, category) in result.scores.iter().zip(&catalog.categories) {
            assert_eq!(score.category, category.title);
        }
    }

    #[test]
    fn sample_overall_score() {
        // (85 + 65 + 75 + 90 + 70 + 88 + 60) / 7 = 76.14
        assert_eq!(overall_score(&sample_result().scores), Some(76));
    }
}
