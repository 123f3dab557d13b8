use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Answer, AnswerValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StartAttemptRequest {
    #[validate(length(min = 1, max = 100))]
    pub quiz_id: String,

    #[validate(length(min = 1, max = 100))]
    pub learner_id: String,
}

/// One answered question as the submit endpoint expects it.
/// Exactly one of `selected_option_id` and `text_answer` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnswerSubmission {
    #[validate(length(min = 1, max = 100))]
    pub question_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_answer: Option<String>,
}

impl From<&Answer> for AnswerSubmission {
    fn from(answer: &Answer) -> Self {
        let (selected_option_id, text_answer) = match &answer.value {
            AnswerValue::Option(id) => (Some(id.clone()), None),
            AnswerValue::Text(text) => (None, Some(text.clone())),
        };

        AnswerSubmission {
            question_id: answer.question_id.clone(),
            selected_option_id,
            text_answer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    #[validate(nested)]
    pub answers: Vec<AnswerSubmission>,
}
