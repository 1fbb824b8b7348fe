//! Static questionnaire definition.
//!
//! Categories are ordered; the order drives the survey step sequence and
//! the stepper. A catalog can also be loaded from TOML:
//!
//! ```toml
//! [[categories]]
//! title = "AI Fundamentals (Knowledge)"
//! description = "..."
//!
//! [[categories.questions]]
//! id = "k1"
//! text = "..."
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{ConfigError, CoreError, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
}

impl Category {
    /// Title up to the first `(`, trimmed. Keeps embedded line breaks.
    pub fn short_title(&self) -> &str {
        short_title(&self.title)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.questions.iter().any(|q| q.id == question_id)
    }
}

/// Shorten a category title for stepper and chart labels.
pub fn short_title(title: &str) -> &str {
    title.split('(').next().unwrap_or(title).trim()
}

/// Ordered set of survey categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog, rejecting empty categories and duplicate ids.
    pub fn new(categories: Vec<Category>) -> Result<Self, ValidationError> {
        if categories.is_empty() {
            return Err(ValidationError::EmptyCollection("catalog categories".into()));
        }
        let mut seen = HashSet::new();
        for category in &categories {
            if category.questions.is_empty() {
                return Err(ValidationError::EmptyCollection(format!(
                    "questions of '{}'",
                    category.title
                )));
            }
            for q in &category.questions {
                if !seen.insert(q.id.as_str()) {
                    return Err(ValidationError::DuplicateQuestion(q.id.clone()));
                }
            }
        }
        Ok(Self { categories })
    }

    /// Load a catalog from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// parsed catalog fails validation.
    pub fn from_toml_file(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let raw: Catalog = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self::new(raw.categories)?)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<&Category> {
        self.categories.get(step)
    }

    pub fn last_step(&self) -> usize {
        self.categories.len().saturating_sub(1)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.categories
            .iter()
            .flat_map(|c| c.questions.iter())
            .find(|q| q.id == id)
    }

    /// Index of the category that owns `question_id`.
    pub fn category_of(&self, question_id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.contains(question_id))
    }

    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }

    /// The built-in seven-category AI literacy questionnaire.
    pub fn builtin() -> Self {
        let categories = BUILTIN
            .iter()
            .map(|(title, description, questions)| Category {
                title: (*title).to_string(),
                description: (*description).to_string(),
                questions: questions
                    .iter()
                    .map(|(id, text)| Question {
                        id: (*id).to_string(),
                        text: (*text).to_string(),
                    })
                    .collect(),
            })
            .collect();
        Self { categories }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

type CategorySeed = (&'static str, &'static str, &'static [(&'static str, &'static str)]);

const BUILTIN: &[CategorySeed] = &[
    (
        "AI Fundamentals (Knowledge)",
        "How well you understand what AI is, how it works, and where its limits are.",
        &[
            ("k1", "I can explain the difference between AI, machine learning, and generative AI."),
            ("k2", "I understand that language models predict text and can produce confident but wrong answers."),
            ("k3", "I know roughly how the AI tools I use were trained and what data they rely on."),
            ("k4", "I keep up with major developments and new capabilities in AI."),
        ],
    ),
    (
        "AI Application (Application)",
        "How effectively you use AI tools in your day-to-day work.",
        &[
            ("a1", "I use AI tools regularly to draft, summarize, or review my work."),
            ("a2", "I can write prompts that reliably get the output I need."),
            ("a3", "I have automated at least one repetitive task with an AI tool."),
            ("a4", "I pick the right AI tool for a given task instead of using one for everything."),
        ],
    ),
    (
        "Data Literacy (Data Literacy)",
        "How comfortably you read, question, and prepare the data AI depends on.",
        &[
            ("d1", "I can tell when a chart or statistic is misleading."),
            ("d2", "I know which of my work data is sensitive and must not be shared with AI tools."),
            ("d3", "I can clean and structure data so that a tool can use it."),
            ("d4", "I base decisions on data rather than intuition when data is available."),
        ],
    ),
    (
        "Critical Thinking &\nEthical Use (Critical Thinking & Ethics)",
        "How carefully you verify AI output and weigh its ethical implications.",
        &[
            ("e1", "I verify facts and sources in AI-generated content before using it."),
            ("e2", "I consider bias and fairness when AI influences a decision."),
            ("e3", "I disclose when AI substantially contributed to my work."),
            ("e4", "I understand copyright and privacy concerns around AI-generated material."),
        ],
    ),
    (
        "Collaboration &\nCommunication (Collaboration)",
        "How you share AI knowledge and work with others around AI.",
        &[
            ("c1", "I share useful AI tips and workflows with my colleagues."),
            ("c2", "I can explain AI-assisted results clearly to people without a technical background."),
            ("c3", "My team has agreed ways of working with AI tools."),
            ("c4", "I ask for feedback on how I use AI in shared work."),
        ],
    ),
    (
        "Learning &\nGrowth Mindset (Growth Mindset)",
        "How open you are to learning and experimenting with new AI capabilities.",
        &[
            ("g1", "I enjoy trying out new AI tools as soon as they appear."),
            ("g2", "I set aside time to learn about AI deliberately."),
            ("g3", "I treat failed AI experiments as learning opportunities."),
            ("g4", "I believe my AI skills can grow significantly with practice."),
        ],
    ),
    (
        "Strategic Use &\nInnovation (Strategy & Innovation)",
        "How you connect AI to goals, new value, and organizational change.",
        &[
            ("s1", "I can identify where AI would create the most value in my team's work."),
            ("s2", "I have proposed a new product, service, or process idea that uses AI."),
            ("s3", "I can estimate the cost, risk, and benefit of an AI initiative."),
            ("s4", "I think about how AI will change my role over the next few years."),
        ],
    ),
];
