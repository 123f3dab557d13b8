use std::sync::Arc;

use crate::{
    client::ApiClient,
    config::Config,
    errors::AppResult,
    repositories::{HttpQuizAttemptRepository, HttpQuizRepository},
    services::quiz_attempt_service::QuizAttemptService,
};

#[derive(Clone)]
pub struct AppState {
    pub client: ApiClient,
    pub quiz_attempt_service: Arc<QuizAttemptService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        config.validate()?;

        let client = ApiClient::new(&config)?;

        let quiz_repository = Arc::new(HttpQuizRepository::new(client.clone()));
        let attempt_repository = Arc::new(HttpQuizAttemptRepository::new(client.clone()));
        let quiz_attempt_service = Arc::new(QuizAttemptService::new(
            quiz_repository,
            attempt_repository,
            config.tick_period(),
        ));

        Ok(Self {
            client,
            quiz_attempt_service,
            config: Arc::new(config),
        })
    }
}
