use std::{sync::Arc, time::Duration};

use crate::{
    errors::{AppError, AppResult},
    models::domain::Quiz,
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{
        attempt_controller::AttemptController,
        attempt_history::AttemptHistory,
        attempt_session::{AttemptSession, AttemptSessionHandle},
    },
};

/// Entry point for the attempt page: loads the quiz and the learner's
/// history, then hands out a running session.
pub struct QuizAttemptService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    tick_period: Duration,
}

/// Everything the attempt page needs before a session exists.
pub struct OpenedAttempt {
    pub quiz: Arc<Quiz>,
    pub history: AttemptHistory,
    pub session: AttemptSessionHandle,
}

impl QuizAttemptService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        tick_period: Duration,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            tick_period,
        }
    }

    pub async fn load_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        let quiz = self.quizzes.fetch_quiz(quiz_id).await?;
        let questions = self.quizzes.fetch_questions(quiz_id).await?;

        if questions.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Quiz '{}' has no questions",
                quiz_id
            )));
        }

        Ok(quiz.with_questions(questions))
    }

    pub async fn load_history(&self, quiz_id: &str, learner_id: &str) -> AppResult<AttemptHistory> {
        let quiz = self.quizzes.fetch_quiz(quiz_id).await?;
        self.history_for(&quiz, learner_id).await
    }

    async fn history_for(&self, quiz: &Quiz, learner_id: &str) -> AppResult<AttemptHistory> {
        let attempts = self.attempts.fetch_attempts(&quiz.id, learner_id).await?;
        let history = AttemptHistory::new(attempts, quiz.max_attempts);

        log::debug!(
            "Learner {} has used {} of {} attempts on quiz {}",
            learner_id,
            history.attempts_used(),
            history.max_attempts(),
            quiz.id
        );
        Ok(history)
    }

    /// Loads everything and spawns the session. A learner who has used up
    /// the attempt limit still gets a session, in the blocked state.
    pub async fn open_session(&self, quiz_id: &str, learner_id: &str) -> AppResult<OpenedAttempt> {
        let quiz = Arc::new(self.load_quiz(quiz_id).await?);
        let history = self.history_for(&quiz, learner_id).await?;

        if !history.can_attempt() {
            log::info!(
                "Learner {} is blocked from quiz {}: {} of {} attempts used",
                learner_id,
                quiz.id,
                history.attempts_used(),
                history.max_attempts()
            );
        }

        let controller = AttemptController::new(Arc::clone(&quiz), learner_id, history.can_attempt());
        let session = AttemptSession::spawn(controller, Arc::clone(&self.attempts), self.tick_period);

        Ok(OpenedAttempt {
            quiz,
            history,
            session,
        })
    }
}
