use async_trait::async_trait;
use validator::Validate;

use crate::{
    client::ApiClient,
    errors::AppResult,
    models::{
        domain::QuizAttempt,
        dto::{
            request::{StartAttemptRequest, SubmitAttemptRequest},
            response::{StartAttemptResponse, SubmitAttemptResponse},
        },
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    /// Opens a new attempt. The backend owns the attempt numbering and
    /// answers with a conflict once the attempt limit is used up.
    async fn start_attempt(&self, request: &StartAttemptRequest) -> AppResult<StartAttemptResponse>;
    async fn submit_attempt(
        &self,
        attempt_id: &str,
        request: &SubmitAttemptRequest,
    ) -> AppResult<SubmitAttemptResponse>;
    async fn fetch_attempts(&self, quiz_id: &str, learner_id: &str) -> AppResult<Vec<QuizAttempt>>;
}

pub struct HttpQuizAttemptRepository {
    client: ApiClient,
}

impl HttpQuizAttemptRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuizAttemptRepository for HttpQuizAttemptRepository {
    async fn start_attempt(&self, request: &StartAttemptRequest) -> AppResult<StartAttemptResponse> {
        request.validate()?;

        let response: StartAttemptResponse = self
            .client
            .post_json(&format!("quizzes/{}/attempts/", request.quiz_id), request)
            .await?;

        log::info!(
            "Started attempt {} (number {:?}) for quiz {}",
            response.attempt_id,
            response.attempt_number,
            request.quiz_id
        );
        Ok(response)
    }

    async fn submit_attempt(
        &self,
        attempt_id: &str,
        request: &SubmitAttemptRequest,
    ) -> AppResult<SubmitAttemptResponse> {
        request.validate()?;

        let response = self
            .client
            .post_json(&format!("attempts/{}/submit/", attempt_id), request)
            .await?;
        Ok(response)
    }

    async fn fetch_attempts(&self, quiz_id: &str, learner_id: &str) -> AppResult<Vec<QuizAttempt>> {
        self.client
            .get_list(
                &format!("quizzes/{}/attempts/", quiz_id),
                &[("learner_id", learner_id)],
            )
            .await
    }
}
