use serde::{Deserialize, Serialize};

use crate::models::decimal;
use crate::models::domain::quiz_question::QuizQuestion;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>, // None means the quiz is untimed
    #[serde(deserialize_with = "decimal::deserialize")]
    pub passing_score_percentage: f64,
    pub max_attempts: u32,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>, // Filled from the questions endpoint
}

impl Quiz {
    /// Countdown length for one attempt, if the quiz is timed.
    pub fn time_limit_seconds(&self) -> Option<u32> {
        self.time_limit_minutes
            .filter(|minutes| *minutes > 0)
            .map(|minutes| minutes.saturating_mul(60))
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, question_id: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Replaces the question list, keeping the author's ordering.
    pub fn with_questions(mut self, mut questions: Vec<QuizQuestion>) -> Self {
        questions.sort_by_key(|q| q.order);
        self.questions = questions;
        self
    }
}
