use async_trait::async_trait;

use crate::{
    client::ApiClient,
    errors::AppResult,
    models::domain::{Quiz, QuizQuestion},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn fetch_quiz(&self, quiz_id: &str) -> AppResult<Quiz>;
    async fn fetch_questions(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>>;
}

pub struct HttpQuizRepository {
    client: ApiClient,
}

impl HttpQuizRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuizRepository for HttpQuizRepository {
    async fn fetch_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        let quiz = self
            .client
            .get_json(&format!("quizzes/{}/", quiz_id), &[])
            .await?;
        Ok(quiz)
    }

    async fn fetch_questions(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>> {
        self.client
            .get_list(&format!("quizzes/{}/questions/", quiz_id), &[])
            .await
    }
}
