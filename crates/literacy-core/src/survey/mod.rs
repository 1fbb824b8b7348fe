//! Survey model: questionnaire catalog, answer map, and scoring.

pub mod answers;
pub mod catalog;
pub mod scoring;

pub use answers::{Likert, SurveyData};
pub use catalog::{short_title, Catalog, Category, Question};
pub use scoring::{
    answered_count, category_score, compute_category_scores, is_category_complete, overall_score,
    CategoryScore,
};
