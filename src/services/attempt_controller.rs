use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AnswerValue, Quiz, QuizQuestion},
        dto::{
            request::{StartAttemptRequest, SubmitAttemptRequest},
            response::{StartAttemptResponse, SubmitAttemptResponse},
        },
    },
    services::{
        answer_ledger::AnswerLedger,
        attempt_clock::{AttemptClock, ClockTick},
        attempt_history::score_percentage,
    },
};

const TIME_EXPIRED_MESSAGE: &str =
    "Time has expired. Your answers are saved, please retry the submission.";

/// What caused a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Learner,
    TimeExpired,
}

/// Lifecycle of one attempt session.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptState {
    /// The attempt limit is used up; starting is not allowed.
    Blocked,
    NotStarted,
    Starting,
    InProgress {
        attempt_id: String,
    },
    Submitting {
        attempt_id: String,
        trigger: SubmitTrigger,
    },
    Completed {
        attempt_id: String,
        result: SubmitAttemptResponse,
    },
    /// The server no longer knows the quiz or attempt. Terminal until the
    /// page is reloaded.
    Unavailable,
}

impl AttemptState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            AttemptState::Blocked => SessionPhase::Blocked,
            AttemptState::NotStarted => SessionPhase::NotStarted,
            AttemptState::Starting => SessionPhase::Starting,
            AttemptState::InProgress { .. } => SessionPhase::InProgress,
            AttemptState::Submitting { .. } => SessionPhase::Submitting,
            AttemptState::Completed { .. } => SessionPhase::Completed,
            AttemptState::Unavailable => SessionPhase::Unavailable,
        }
    }

    pub fn attempt_id(&self) -> Option<&str> {
        match self {
            AttemptState::InProgress { attempt_id }
            | AttemptState::Submitting { attempt_id, .. }
            | AttemptState::Completed { attempt_id, .. } => Some(attempt_id),
            AttemptState::Blocked
            | AttemptState::NotStarted
            | AttemptState::Starting
            | AttemptState::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Blocked,
    NotStarted,
    Starting,
    InProgress,
    Submitting,
    Completed,
    Unavailable,
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub attempt_id: Option<String>,
    pub attempt_number: Option<u32>,
    pub question_index: usize,
    pub question_count: usize,
    pub answered: usize,
    pub remaining_seconds: Option<u32>,
    pub remaining_display: Option<String>,
    pub time_expired: bool,
    pub can_submit: bool,
    pub error: Option<String>,
    pub result: Option<SubmitAttemptResponse>,
}

impl SessionView {
    pub fn progress_label(&self) -> String {
        format!("{} of {} answered", self.answered, self.question_count)
    }

    pub fn score_percentage(&self) -> Option<String> {
        self.result
            .as_ref()
            .and_then(|r| score_percentage(r.total_score, r.max_possible_score))
    }
}

/// State machine for a single attempt. Performs no I/O: every transition
/// that needs the backend is split into `begin_*`, which hands back the
/// request to send, and `complete_*`, which takes the outcome.
#[derive(Debug)]
pub struct AttemptController {
    quiz: Arc<Quiz>,
    learner_id: String,
    state: AttemptState,
    ledger: AnswerLedger,
    clock: AttemptClock,
    question_index: usize,
    attempt_number: Option<u32>,
    time_expired: bool,
    last_error: Option<AppError>,
}

impl AttemptController {
    /// `eligible` comes from the attempt history; an ineligible session
    /// starts out blocked.
    pub fn new(quiz: Arc<Quiz>, learner_id: impl Into<String>, eligible: bool) -> Self {
        let state = if eligible {
            AttemptState::NotStarted
        } else {
            AttemptState::Blocked
        };

        Self {
            quiz,
            learner_id: learner_id.into(),
            state,
            ledger: AnswerLedger::new(),
            clock: AttemptClock::new(),
            question_index: 0,
            attempt_number: None,
            time_expired: false,
            last_error: None,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    pub fn clock(&self) -> &AttemptClock {
        &self.clock
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.quiz.questions.get(self.question_index)
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    pub fn is_on_last_question(&self) -> bool {
        self.question_index + 1 >= self.quiz.question_count()
    }

    /// Manual submission is offered on the last question only.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, AttemptState::InProgress { .. }) && self.is_on_last_question()
    }

    /// Required questions that have no answer yet.
    pub fn unanswered_required(&self) -> Vec<&QuizQuestion> {
        self.quiz
            .questions
            .iter()
            .filter(|q| q.is_required && !self.ledger.is_answered(&q.id))
            .collect()
    }

    pub fn begin_start(&mut self) -> AppResult<Option<StartAttemptRequest>> {
        match self.state {
            AttemptState::Blocked => {
                let err = AppError::Conflict(format!(
                    "maximum attempts ({}) reached for quiz {}",
                    self.quiz.max_attempts, self.quiz.id
                ));
                self.last_error = Some(err.clone());
                Err(err)
            }
            AttemptState::NotStarted => {
                self.state = AttemptState::Starting;
                self.last_error = None;
                Ok(Some(StartAttemptRequest {
                    quiz_id: self.quiz.id.clone(),
                    learner_id: self.learner_id.clone(),
                }))
            }
            _ => Ok(None),
        }
    }

    pub fn complete_start(&mut self, result: AppResult<StartAttemptResponse>) -> AppResult<()> {
        if self.state != AttemptState::Starting {
            log::warn!("Ignoring start result outside of the starting phase");
            return Ok(());
        }

        match result {
            Ok(response) => {
                self.ledger.clear();
                self.question_index = 0;
                self.time_expired = false;
                self.last_error = None;
                self.attempt_number = response.attempt_number;

                if let Some(total_seconds) = self.quiz.time_limit_seconds() {
                    self.clock.start(total_seconds)?;
                }

                log::info!(
                    "Attempt {} in progress for quiz {} ({} questions, time limit {:?}s)",
                    response.attempt_id,
                    self.quiz.id,
                    self.quiz.question_count(),
                    self.quiz.time_limit_seconds()
                );
                self.state = AttemptState::InProgress {
                    attempt_id: response.attempt_id,
                };
                Ok(())
            }
            Err(err) => {
                self.state = match err {
                    AppError::Conflict(_) => AttemptState::Blocked,
                    AppError::NotFound(_) => AttemptState::Unavailable,
                    _ => AttemptState::NotStarted,
                };
                log::warn!("[{}] Failed to start attempt: {}", err.error_code(), err);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn answer(&mut self, question_id: &str, value: AnswerValue) -> AppResult<()> {
        let result = self.try_answer(question_id, value);
        if let Err(err) = &result {
            log::warn!("Answer for question {} rejected: {}", question_id, err);
            self.last_error = Some(err.clone());
        }
        result
    }

    fn try_answer(&mut self, question_id: &str, value: AnswerValue) -> AppResult<()> {
        if !matches!(self.state, AttemptState::InProgress { .. }) {
            return Err(AppError::InvalidState(
                "Answers can only be changed while the attempt is in progress.".to_string(),
            ));
        }

        let question = self.quiz.question(question_id).ok_or_else(|| {
            AppError::ValidationError(format!("question '{}' is not part of this quiz", question_id))
        })?;

        if !value.fits(question) {
            return Err(AppError::ValidationError(format!(
                "'{}' is not a valid answer for question '{}'",
                value.as_str(),
                question_id
            )));
        }

        self.ledger.set_answer(question_id, value);
        Ok(())
    }

    /// Moves by `delta` questions. Targets outside the quiz are ignored.
    pub fn navigate(&mut self, delta: i64) -> usize {
        if !matches!(self.state, AttemptState::InProgress { .. }) {
            return self.question_index;
        }

        let target = i64::try_from(self.question_index)
            .ok()
            .and_then(|index| index.checked_add(delta))
            .and_then(|target| usize::try_from(target).ok());

        if let Some(target) = target {
            if target < self.quiz.question_count() {
                self.question_index = target;
            }
        }
        self.question_index
    }

    /// Advances the countdown. Yields a submit trigger on the tick that
    /// reaches zero while the attempt is in progress.
    pub fn tick(&mut self) -> Option<SubmitTrigger> {
        match self.clock.tick() {
            ClockTick::Expired => {
                log::info!("Time expired for quiz {}", self.quiz.id);
                matches!(self.state, AttemptState::InProgress { .. })
                    .then_some(SubmitTrigger::TimeExpired)
            }
            ClockTick::Remaining(remaining) => {
                log::debug!("{}s remaining for quiz {}", remaining, self.quiz.id);
                None
            }
            ClockTick::Idle => None,
        }
    }

    /// The single entry point for both learner and timer submissions.
    /// Returns `None` when no attempt is in progress, which makes a second
    /// trigger (double click, timer racing the learner) a no-op.
    pub fn begin_submit(
        &mut self,
        trigger: SubmitTrigger,
    ) -> AppResult<Option<(String, SubmitAttemptRequest)>> {
        let attempt_id = match &self.state {
            AttemptState::InProgress { attempt_id } => attempt_id.clone(),
            _ => return Ok(None),
        };

        if trigger == SubmitTrigger::Learner && !self.is_on_last_question() {
            let err = AppError::InvalidState("Submit is available on the last question.".to_string());
            self.last_error = Some(err.clone());
            return Err(err);
        }

        self.clock.stop();
        self.last_error = None;

        let request = SubmitAttemptRequest {
            answers: self.ledger.to_submission_list(),
        };
        log::info!(
            "Submitting attempt {} with {} of {} answers ({:?})",
            attempt_id,
            request.answers.len(),
            self.quiz.question_count(),
            trigger
        );

        self.state = AttemptState::Submitting {
            attempt_id: attempt_id.clone(),
            trigger,
        };
        Ok(Some((attempt_id, request)))
    }

    /// Finishes a submission. On failure the attempt returns to in-progress
    /// on the last question with every answer still in the ledger and the
    /// remaining time pinned at zero; only a manual retry can submit again.
    pub fn complete_submit(
        &mut self,
        result: AppResult<SubmitAttemptResponse>,
    ) -> AppResult<SubmitAttemptResponse> {
        let (attempt_id, trigger) = match &self.state {
            AttemptState::Submitting {
                attempt_id,
                trigger,
            } => (attempt_id.clone(), *trigger),
            _ => {
                return Err(AppError::InvalidState(
                    "No submission is in flight.".to_string(),
                ))
            }
        };

        match result {
            Ok(response) => {
                self.clock.stop();
                self.last_error = None;
                log::info!(
                    "Attempt {} completed: {}/{} (passed: {}, grading: {:?})",
                    attempt_id,
                    response.total_score,
                    response.max_possible_score,
                    response.is_passed,
                    response.grading_status
                );
                self.state = AttemptState::Completed {
                    attempt_id,
                    result: response.clone(),
                };
                Ok(response)
            }
            Err(err) => {
                match &err {
                    AppError::ValidationError(_) => {
                        log::error!("Attempt {} was rejected: {}", attempt_id, err)
                    }
                    _ => log::warn!(
                        "[{}] Failed to submit attempt {}: {}",
                        err.error_code(),
                        attempt_id,
                        err
                    ),
                }

                self.question_index = self.quiz.question_count().saturating_sub(1);
                if trigger == SubmitTrigger::TimeExpired {
                    self.time_expired = true;
                }
                self.clock.pin_at_zero();

                self.last_error = Some(err.clone());
                self.state = match err {
                    AppError::NotFound(_) => AttemptState::Unavailable,
                    _ => AttemptState::InProgress { attempt_id },
                };
                Err(err)
            }
        }
    }

    /// Stops the countdown when the learner leaves the page.
    pub fn abandon(&mut self) {
        self.clock.stop();
    }

    pub fn view(&self) -> SessionView {
        let error = self.last_error.as_ref().map(|err| {
            if self.time_expired && matches!(self.state, AttemptState::InProgress { .. }) {
                format!("{} {}", TIME_EXPIRED_MESSAGE, err.user_message())
            } else {
                err.user_message()
            }
        });

        let result = match &self.state {
            AttemptState::Completed { result, .. } => Some(result.clone()),
            _ => None,
        };

        SessionView {
            phase: self.state.phase(),
            attempt_id: self.state.attempt_id().map(str::to_string),
            attempt_number: self.attempt_number,
            question_index: self.question_index,
            question_count: self.quiz.question_count(),
            answered: self.ledger.count(),
            remaining_seconds: self.clock.remaining_seconds(),
            remaining_display: self.clock.display(),
            time_expired: self.time_expired,
            can_submit: self.can_submit(),
            error,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::GradingStatus;
    use crate::test_utils::fixtures::{test_quiz, timed_quiz};

    fn started(quiz: Quiz) -> AttemptController {
        let mut controller = AttemptController::new(Arc::new(quiz), "learner-1", true);
        controller
            .begin_start()
            .expect("start allowed")
            .expect("start request");
        controller
            .complete_start(Ok(StartAttemptResponse {
                attempt_id: "attempt-1".to_string(),
                attempt_number: Some(1),
                started_at: None,
            }))
            .expect("start should complete");
        controller
    }

    fn graded() -> SubmitAttemptResponse {
        SubmitAttemptResponse {
            total_score: 7.0,
            max_possible_score: 10.0,
            is_passed: true,
            grading_status: GradingStatus::Finalized,
        }
    }

    #[test]
    fn blocked_session_refuses_to_start() {
        let mut controller = AttemptController::new(Arc::new(test_quiz()), "learner-1", false);

        let result = controller.begin_start();

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(controller.state(), &AttemptState::Blocked);
        assert_eq!(
            controller.view().error.as_deref(),
            Some("Maximum attempts reached for this quiz.")
        );
    }

    #[test]
    fn start_guard_rejects_second_start_while_pending() {
        let mut controller = AttemptController::new(Arc::new(test_quiz()), "learner-1", true);

        let first = controller.begin_start().expect("start allowed");
        let second = controller.begin_start().expect("no error");

        assert_eq!(
            first,
            Some(StartAttemptRequest {
                quiz_id: "quiz-1".to_string(),
                learner_id: "learner-1".to_string(),
            })
        );
        assert!(second.is_none());
        assert_eq!(controller.state().phase(), SessionPhase::Starting);
    }

    #[test]
    fn failed_start_allows_retry() {
        let mut controller = AttemptController::new(Arc::new(test_quiz()), "learner-1", true);
        controller.begin_start().expect("start allowed");

        let result = controller.complete_start(Err(AppError::NetworkError("timeout".into())));

        assert!(result.is_err());
        assert_eq!(controller.state(), &AttemptState::NotStarted);
        assert!(controller.view().error.is_some());
        assert!(controller.begin_start().expect("retry allowed").is_some());
    }

    #[test]
    fn server_conflict_on_start_blocks_the_session() {
        let mut controller = AttemptController::new(Arc::new(test_quiz()), "learner-1", true);
        controller.begin_start().expect("start allowed");

        let _ = controller.complete_start(Err(AppError::Conflict("limit".into())));

        assert_eq!(controller.state(), &AttemptState::Blocked);
        assert!(controller.begin_start().is_err());
    }

    #[test]
    fn missing_quiz_on_start_requires_reload() {
        let mut controller = AttemptController::new(Arc::new(test_quiz()), "learner-1", true);
        controller.begin_start().expect("start allowed");

        let result = controller.complete_start(Err(AppError::NotFound("quiz-1".into())));

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(controller.state(), &AttemptState::Unavailable);
        assert_eq!(
            controller.view().error.as_deref(),
            Some("This quiz or attempt could not be found. Please reload the page.")
        );
        assert!(controller.begin_start().expect("no error").is_none());
    }

    #[test]
    fn unknown_attempt_on_submit_requires_reload() {
        let mut controller = started(test_quiz());
        controller.answer("q-1", AnswerValue::option("q-1-a")).expect("answer");
        controller.navigate(2);
        controller.begin_submit(SubmitTrigger::Learner).expect("submit");

        let _ = controller.complete_submit(Err(AppError::NotFound("attempt-1".into())));

        assert_eq!(controller.view().phase, SessionPhase::Unavailable);
        assert!(!controller.can_submit());
        assert!(controller
            .begin_submit(SubmitTrigger::Learner)
            .expect("no error")
            .is_none());
        assert!(controller.answer("q-2", AnswerValue::option("true")).is_err());
    }

    #[test]
    fn untimed_quiz_does_not_start_the_clock() {
        let controller = started(test_quiz());

        assert!(!controller.clock().is_running());
        assert!(controller.view().remaining_seconds.is_none());
        assert_eq!(controller.view().attempt_number, Some(1));
    }

    #[test]
    fn timed_quiz_starts_clock_at_limit() {
        let controller = started(timed_quiz(1));

        assert!(controller.clock().is_running());
        assert_eq!(controller.view().remaining_seconds, Some(60));
        assert_eq!(controller.view().remaining_display.as_deref(), Some("1:00"));
    }

    #[test]
    fn answer_validates_question_and_value() {
        let mut controller = started(test_quiz());

        assert!(controller.answer("q-1", AnswerValue::option("q-1-a")).is_ok());
        assert!(controller.answer("q-1", AnswerValue::option("q-1-b")).is_ok());
        assert!(matches!(
            controller.answer("q-9", AnswerValue::option("x")),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            controller.answer("q-2", AnswerValue::option("maybe")),
            Err(AppError::ValidationError(_))
        ));

        assert_eq!(controller.ledger().count(), 1);
        assert_eq!(
            controller.ledger().get_answer("q-1"),
            Some(&AnswerValue::option("q-1-b"))
        );
    }

    #[test]
    fn answer_before_start_is_rejected() {
        let mut controller = AttemptController::new(Arc::new(test_quiz()), "learner-1", true);

        let result = controller.answer("q-1", AnswerValue::option("q-1-a"));

        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[test]
    fn navigate_ignores_out_of_range_targets() {
        let mut controller = started(test_quiz());

        assert_eq!(controller.navigate(-1), 0);
        assert_eq!(controller.navigate(1), 1);
        assert_eq!(controller.navigate(1), 2);
        assert_eq!(controller.navigate(1), 2);
        assert_eq!(controller.navigate(-5), 2);
        assert_eq!(controller.navigate(-1), 1);
        assert_eq!(controller.current_question().map(|q| q.id.as_str()), Some("q-2"));
    }

    #[test]
    fn learner_submit_requires_last_question() {
        let mut controller = started(test_quiz());

        assert!(!controller.can_submit());
        assert!(matches!(
            controller.begin_submit(SubmitTrigger::Learner),
            Err(AppError::InvalidState(_))
        ));

        controller.navigate(2);
        assert!(controller.can_submit());
        assert!(controller
            .begin_submit(SubmitTrigger::Learner)
            .expect("submit allowed")
            .is_some());
    }

    #[test]
    fn second_submit_while_submitting_is_a_no_op() {
        let mut controller = started(test_quiz());
        controller.navigate(2);

        let first = controller.begin_submit(SubmitTrigger::Learner).expect("first");
        let second = controller.begin_submit(SubmitTrigger::Learner).expect("second");
        let from_timer = controller.begin_submit(SubmitTrigger::TimeExpired).expect("timer");

        assert!(first.is_some());
        assert!(second.is_none());
        assert!(from_timer.is_none());
    }

    #[test]
    fn expiry_triggers_exactly_one_submit_with_answers() {
        let mut controller = started(timed_quiz(1));
        controller
            .answer("q-1", AnswerValue::option("q-1-a"))
            .expect("answer accepted");

        let mut requests = Vec::new();
        for _ in 0..75 {
            if let Some(trigger) = controller.tick() {
                if let Some(request) = controller.begin_submit(trigger).expect("submit") {
                    requests.push(request);
                }
            }
        }

        assert_eq!(requests.len(), 1);
        let (attempt_id, request) = &requests[0];
        assert_eq!(attempt_id, "attempt-1");
        assert_eq!(request.answers.len(), 1);
        assert_eq!(request.answers[0].question_id, "q-1");
        assert_eq!(controller.view().remaining_seconds, Some(0));
    }

    #[test]
    fn expiry_submit_may_happen_on_any_question() {
        let mut controller = started(timed_quiz(1));

        let trigger = (0..60).find_map(|_| controller.tick());

        assert_eq!(trigger, Some(SubmitTrigger::TimeExpired));
        assert_eq!(controller.question_index(), 0);
        assert!(controller
            .begin_submit(SubmitTrigger::TimeExpired)
            .expect("submit")
            .is_some());
    }

    #[test]
    fn failed_submit_keeps_answers_and_returns_to_last_question() {
        let mut controller = started(test_quiz());
        controller.answer("q-1", AnswerValue::option("q-1-a")).expect("answer");
        controller.navigate(2);
        controller.begin_submit(SubmitTrigger::Learner).expect("submit");

        let result = controller.complete_submit(Err(AppError::NetworkError("offline".into())));

        assert!(result.is_err());
        assert_eq!(controller.state().phase(), SessionPhase::InProgress);
        assert_eq!(controller.question_index(), 2);
        assert_eq!(controller.ledger().count(), 1);
        assert!(controller.view().error.is_some());

        controller
            .answer("q-3", AnswerValue::text("Borrowing"))
            .expect("still answerable");
        let (_, retry) = controller
            .begin_submit(SubmitTrigger::Learner)
            .expect("retry allowed")
            .expect("retry request");

        let ids: Vec<&str> = retry.answers.iter().map(|a| a.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q-1", "q-3"]);
    }

    #[test]
    fn failed_expiry_submit_pins_clock_and_informs_learner() {
        let mut controller = started(timed_quiz(1));
        controller.answer("q-2", AnswerValue::option("true")).expect("answer");
        let trigger = (0..60).find_map(|_| controller.tick()).expect("expiry");
        controller.begin_submit(trigger).expect("submit");

        let _ = controller.complete_submit(Err(AppError::NetworkError("offline".into())));
        let view = controller.view();

        assert!(view.time_expired);
        assert_eq!(view.remaining_seconds, Some(0));
        assert_eq!(view.question_index, 2);
        assert!(view.can_submit);
        assert!(view
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("Time has expired")));
        assert_eq!(controller.tick(), None);
        assert_eq!(controller.ledger().count(), 1);
    }

    #[test]
    fn failed_learner_submit_pins_clock_at_zero() {
        let mut controller = started(timed_quiz(1));
        controller.answer("q-1", AnswerValue::option("q-1-b")).expect("answer");
        controller.navigate(2);
        controller.tick();
        controller.begin_submit(SubmitTrigger::Learner).expect("submit");

        let _ = controller.complete_submit(Err(AppError::NetworkError("offline".into())));
        let view = controller.view();

        assert!(!controller.clock().is_running());
        assert_eq!(view.remaining_seconds, Some(0));
        assert_eq!(view.remaining_display.as_deref(), Some("0:00"));
        assert!(!view.time_expired);
        assert!(view.can_submit);
        assert_eq!(controller.ledger().count(), 1);
        // No forced submit follows; the retry is up to the learner.
        assert!((0..120).all(|_| controller.tick().is_none()));
        assert!(controller
            .begin_submit(SubmitTrigger::Learner)
            .expect("retry allowed")
            .is_some());
    }

    #[test]
    fn successful_submit_completes_and_is_terminal() {
        let mut controller = started(test_quiz());
        controller.navigate(2);
        controller.begin_submit(SubmitTrigger::Learner).expect("submit");

        let response = controller.complete_submit(Ok(graded())).expect("completed");

        assert_eq!(response.total_score, 7.0);
        let view = controller.view();
        assert_eq!(view.phase, SessionPhase::Completed);
        assert_eq!(view.score_percentage().as_deref(), Some("70.0"));
        assert!(!view.can_submit);

        assert!(controller.begin_start().expect("no error").is_none());
        assert!(controller
            .begin_submit(SubmitTrigger::Learner)
            .expect("no error")
            .is_none());
        assert!(controller.answer("q-1", AnswerValue::option("q-1-a")).is_err());
        assert!(controller.complete_submit(Ok(graded())).is_err());
    }

    #[test]
    fn unanswered_required_lists_missing_questions() {
        let mut controller = started(test_quiz());
        controller.answer("q-1", AnswerValue::option("q-1-a")).expect("answer");

        let missing: Vec<&str> = controller
            .unanswered_required()
            .iter()
            .map(|q| q.id.as_str())
            .collect();

        assert_eq!(missing, vec!["q-2", "q-3"]);
        assert_eq!(controller.view().progress_label(), "1 of 3 answered");
    }
}
