//! Category score normalization.
//!
//! Each category's raw answer sum is rescaled linearly from the Likert
//! range `[n * 1, n * 5]` onto `[0, 100]`:
//!
//! ```text
//! score = round((sum - n) / (n * 4) * 100)
//! ```
//!
//! A raw sum of zero (nothing answered) scores 0. Missing answers count as
//! zero but the denominator is always the full question count, so a
//! partially answered category is deflated rather than rescaled.

use serde::{Deserialize, Serialize};

use super::answers::{Likert, SurveyData};
use super::catalog::{Catalog, Category};

/// Normalized 0..=100 score for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: u8,
}

/// Score a single category.
pub fn category_score(category: &Category, answers: &SurveyData) -> CategoryScore {
    let n = category.questions.len() as u32;
    let total: u32 = category
        .questions
        .iter()
        .map(|q| answers.get(&q.id).map_or(0, |a| u32::from(a.value())))
        .sum();

    let score = if total == 0 || n == 0 {
        0
    } else {
        let min = f64::from(n * u32::from(Likert::MIN));
        let span = f64::from(n * u32::from(Likert::MAX - Likert::MIN));
        let normalized = (f64::from(total) - min) / span * 100.0;
        normalized.round().clamp(0.0, 100.0) as u8
    };

    CategoryScore {
        category: category.title.clone(),
        score,
    }
}

/// One score per category, in catalog order.
pub fn compute_category_scores(catalog: &Catalog, answers: &SurveyData) -> Vec<CategoryScore> {
    catalog
        .categories
        .iter()
        .map(|c| category_score(c, answers))
        .collect()
}

/// True iff every question in `category` has an answer.
pub fn is_category_complete(category: &Category, answers: &SurveyData) -> bool {
    category.questions.iter().all(|q| answers.contains(&q.id))
}

pub fn answered_count(category: &Category, answers: &SurveyData) -> usize {
    category
        .questions
        .iter()
        .filter(|q| answers.contains(&q.id))
        .count()
}

/// Rounded arithmetic mean of the scores; `None` when there are none.
pub fn overall_score(scores: &[CategoryScore]) -> Option<u8> {
    if scores.is_empty() {
        return None;
    }
    let sum: u32 = scores.iter().map(|s| u32::from(s.score)).sum();
    let mean = f64::from(sum) / scores.len() as f64;
    Some(mean.round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::catalog::Question;
    use proptest::prelude::*;

    fn category(n: usize) -> Category {
        Category {
            title: "A".into(),
            description: String::new(),
            questions: (1..=n)
                .map(|i| Question {
                    id: format!("q{i}"),
                    text: String::new(),
                })
                .collect(),
        }
    }

    fn answers(values: &[u8]) -> SurveyData {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("q{}", i + 1), Likert::new(*v).unwrap()))
            .collect()
    }

    #[test]
    fn two_question_example_rounds_half_up() {
        // sum 7, min 2, span 8 -> 62.5 -> 63
        let score = category_score(&category(2), &answers(&[3, 4]));
        assert_eq!(score.score, 63);
        assert_eq!(score.category, "A");
    }

    #[test]
    fn unanswered_category_scores_zero() {
        assert_eq!(category_score(&category(4), &SurveyData::new()).score, 0);
        assert_eq!(category_score(&category(0), &SurveyData::new()).score, 0);
    }

    #[test]
    fn partial_answers_use_full_denominator() {
        // sum 5 over 2 questions: (5 - 2) / 8 -> 37.5 -> 38
        let data: SurveyData = [("q1", Likert::new(5).unwrap())].into_iter().collect();
        assert_eq!(category_score(&category(2), &data).score, 38);
        // sum 1 over 2 questions would be negative; clamped
        let data: SurveyData = [("q1", Likert::new(1).unwrap())].into_iter().collect();
        assert_eq!(category_score(&category(2), &data).score, 0);
    }

    #[test]
    fn completeness_and_progress() {
        let cat = category(3);
        let data = answers(&[1, 2]);
        assert!(!is_category_complete(&cat, &data));
        assert_eq!(answered_count(&cat, &data), 2);
        assert!(is_category_complete(&cat, &answers(&[1, 2, 3])));
    }

    #[test]
    fn overall_is_rounded_mean() {
        let scores = vec![
            CategoryScore { category: "a".into(), score: 85 },
            CategoryScore { category: "b".into(), score: 65 },
            CategoryScore { category: "c".into(), score: 76 },
        ];
        // 226 / 3 = 75.33
        assert_eq!(overall_score(&scores), Some(75));
        assert_eq!(overall_score(&[]), None);
    }

    #[test]
    fn scores_follow_catalog_order() {
        let catalog = Catalog::builtin();
        let scores = compute_category_scores(&catalog, &SurveyData::new());
        let titles: Vec<_> = scores.iter().map(|s| s.category.as_str()).collect();
        let expected: Vec<_> = catalog.categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, expected);
    }

    proptest! {
        #[test]
        fn all_minimum_is_zero_and_all_maximum_is_hundred(n in 1usize..12) {
            prop_assert_eq!(category_score(&category(n), &answers(&vec![1; n])).score, 0);
            prop_assert_eq!(category_score(&category(n), &answers(&vec![5; n])).score, 100);
        }

        #[test]
        fn score_is_monotonic_in_sum(values in proptest::collection::vec(1u8..=5, 1..10), idx in 0usize..10) {
            let n = values.len();
            let idx = idx % n;
            let base = category_score(&category(n), &answers(&values)).score;
            let mut bumped = values.clone();
            bumped[idx] = (bumped[idx] + 1).min(5);
            let higher = category_score(&category(n), &answers(&bumped)).score;
            prop_assert!(higher >= base);
        }

        #[test]
        fn scoring_is_deterministic(values in proptest::collection::vec(1u8..=5, 1..10)) {
            let cat = category(values.len());
            let catalog = Catalog { categories: vec![cat] };
            let data = answers(&values);
            prop_assert_eq!(
                compute_category_scores(&catalog, &data),
                compute_category_scores(&catalog, &data)
            );
        }

        #[test]
        fn overall_matches_rounded_mean(raw in proptest::collection::vec(0u8..=100, 1..12)) {
            let scores: Vec<_> = raw
                .iter()
                .map(|s| CategoryScore { category: String::new(), score: *s })
                .collect();
            let mean = raw.iter().map(|s| f64::from(*s)).sum::<f64>() / raw.len() as f64;
            prop_assert_eq!(overall_score(&scores), Some(mean.round() as u8));
        }
    }
}
