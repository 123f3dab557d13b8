use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::decimal;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub learner_id: String,
    pub attempt_number: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub total_score: f64,
    #[serde(default, deserialize_with = "decimal::deserialize")]
    pub max_possible_score: f64,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub grading_status: GradingStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum GradingStatus {
    #[default]
    Pending, // Free-text answers still waiting for an instructor
    Finalized,
}

impl QuizAttempt {
    pub fn is_finalized(&self) -> bool {
        self.completed_at.is_some() && self.grading_status == GradingStatus::Finalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::test_attempt;

    #[test]
    fn quiz_attempt_accepts_decimal_strings_for_scores() {
        let json = r#"{
            "id": "attempt-1",
            "quiz_id": "quiz-1",
            "learner_id": "learner-1",
            "attempt_number": 1,
            "started_at": "2026-03-01T10:00:00Z",
            "completed_at": "2026-03-01T10:12:00Z",
            "total_score": "7.00",
            "max_possible_score": "10.00",
            "passed": true,
            "grading_status": "finalized"
        }"#;

        let parsed: QuizAttempt = serde_json::from_str(json).expect("attempt should deserialize");

        assert_eq!(parsed.total_score, 7.0);
        assert_eq!(parsed.max_possible_score, 10.0);
        assert!(parsed.passed);
        assert!(parsed.is_finalized());
    }

    #[test]
    fn quiz_attempt_defaults_to_pending_without_scores() {
        let json = r#"{
            "id": "attempt-2",
            "quiz_id": "quiz-1",
            "learner_id": "learner-1",
            "attempt_number": 2,
            "started_at": "2026-03-01T10:00:00Z"
        }"#;

        let parsed: QuizAttempt = serde_json::from_str(json).expect("attempt should deserialize");

        assert_eq!(parsed.grading_status, GradingStatus::Pending);
        assert_eq!(parsed.total_score, 0.0);
        assert!(parsed.completed_at.is_none());
        assert!(!parsed.is_finalized());
    }

    #[test]
    fn pending_attempt_is_not_finalized_even_when_completed() {
        let mut attempt = test_attempt(1, 4.0, 5.0);
        attempt.grading_status = GradingStatus::Pending;

        assert!(attempt.completed_at.is_some());
        assert!(!attempt.is_finalized());
    }
}
