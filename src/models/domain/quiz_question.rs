use serde::{Deserialize, Serialize};

use crate::models::decimal;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    pub question_type: QuizQuestionType,
    #[serde(default = "default_points", deserialize_with = "decimal::deserialize")]
    pub points: f64,
    #[serde(default = "default_required")]
    pub is_required: bool,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub options: Vec<QuizQuestionOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestionOption {
    pub id: String,
    pub text: String,
    // Read from the wire only; never sent back and never consulted while answering.
    #[serde(default, skip_serializing)]
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "snake_case")]
pub enum QuizQuestionType {
    MultipleChoice, // One option out of several
    TrueFalse,      // Two implicit options, "true" and "false"
    ShortAnswer,    // Free text, may need manual grading
}

pub const TRUE_VALUE: &str = "true";
pub const FALSE_VALUE: &str = "false";

fn default_points() -> f64 {
    1.0
}

fn default_required() -> bool {
    true
}

impl QuizQuestion {
    /// Whether `value` names a selectable option of this question.
    pub fn accepts_option(&self, value: &str) -> bool {
        match self.question_type {
            QuizQuestionType::MultipleChoice => self.options.iter().any(|o| o.id == value),
            QuizQuestionType::TrueFalse => {
                value == TRUE_VALUE
                    || value == FALSE_VALUE
                    || self.options.iter().any(|o| o.id == value)
            }
            QuizQuestionType::ShortAnswer => false,
        }
    }
}
