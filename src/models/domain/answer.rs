use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_question::{QuizQuestion, QuizQuestionType};

/// A learner's current answer to one question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AnswerValue {
    Option(String), // Selected option id, or "true"/"false"
    Text(String),
}

impl AnswerValue {
    pub fn option(id: impl Into<String>) -> Self {
        AnswerValue::Option(id.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        AnswerValue::Text(text.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            AnswerValue::Option(id) => id,
            AnswerValue::Text(text) => text,
        }
    }

    /// Builds the value a raw input should have for the given question.
    pub fn for_question(question: &QuizQuestion, raw: impl Into<String>) -> Self {
        match question.question_type {
            QuizQuestionType::ShortAnswer => AnswerValue::Text(raw.into()),
            QuizQuestionType::MultipleChoice | QuizQuestionType::TrueFalse => {
                AnswerValue::Option(raw.into())
            }
        }
    }

    /// Whether this value fits the question's type and options.
    pub fn fits(&self, question: &QuizQuestion) -> bool {
        match (self, question.question_type) {
            (AnswerValue::Text(_), QuizQuestionType::ShortAnswer) => true,
            (AnswerValue::Option(id), _) => question.accepts_option(id),
            (AnswerValue::Text(_), _) => false,
        }
    }
}
