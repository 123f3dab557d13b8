use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::AnswerValue,
        dto::response::{StartAttemptResponse, SubmitAttemptResponse},
    },
    repositories::QuizAttemptRepository,
    services::{
        attempt_clock::ClockDriver,
        attempt_controller::{AttemptController, AttemptState, SessionView, SubmitTrigger},
    },
};

const CHANNEL_CAPACITY: usize = 32;

/// Learner actions accepted by a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Answer {
        question_id: String,
        value: AnswerValue,
    },
    Navigate(i64),
    Submit,
    Leave,
}

#[derive(Debug, Clone)]
enum SessionEvent {
    Tick,
    Started(AppResult<StartAttemptResponse>),
    Submitted(AppResult<SubmitAttemptResponse>),
}

enum SessionInput {
    Command(Option<SessionCommand>),
    Event(SessionEvent),
}

/// How a session ended.
#[derive(Debug)]
pub struct SessionExit {
    pub outcome: Option<SubmitAttemptResponse>,
    /// A submission whose result the session never processed, whether still
    /// in flight or already finished. It is never cancelled; await it to
    /// learn whether the answers were recorded.
    pub pending_submit: Option<JoinHandle<AppResult<SubmitAttemptResponse>>>,
}

/// Caller side of a running attempt session.
pub struct AttemptSessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    view: watch::Receiver<SessionView>,
    task: JoinHandle<SessionExit>,
}

impl AttemptSessionHandle {
    pub async fn send(&self, command: SessionCommand) -> AppResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| AppError::InvalidState("The attempt session has ended.".to_string()))
    }

    pub async fn start(&self) -> AppResult<()> {
        self.send(SessionCommand::Start).await
    }

    pub async fn answer(&self, question_id: impl Into<String>, value: AnswerValue) -> AppResult<()> {
        self.send(SessionCommand::Answer {
            question_id: question_id.into(),
            value,
        })
        .await
    }

    pub async fn navigate(&self, delta: i64) -> AppResult<()> {
        self.send(SessionCommand::Navigate(delta)).await
    }

    pub async fn submit(&self) -> AppResult<()> {
        self.send(SessionCommand::Submit).await
    }

    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    /// Waits until a published snapshot satisfies `condition`.
    pub async fn wait_for<F>(&self, condition: F) -> AppResult<SessionView>
    where
        F: FnMut(&SessionView) -> bool,
    {
        let mut view = self.view.clone();
        let snapshot = view
            .wait_for(condition)
            .await
            .map_err(|_| AppError::InvalidState("The attempt session has ended.".to_string()))?
            .clone();
        Ok(snapshot)
    }

    /// Leaves the attempt page: the clock stops, an in-flight submit keeps going.
    pub async fn leave(self) -> AppResult<SessionExit> {
        // The session may already be gone after completing.
        let _ = self.commands.send(SessionCommand::Leave).await;
        self.join().await
    }

    pub async fn join(self) -> AppResult<SessionExit> {
        self.task
            .await
            .map_err(|e| AppError::InternalError(format!("Attempt session task failed: {}", e)))
    }
}

/// Event loop owning one attempt: the controller, its clock driver and any
/// outstanding backend calls. Commands, ticks and call results are handled
/// one at a time, in arrival order.
pub struct AttemptSession {
    controller: AttemptController,
    attempts: Arc<dyn QuizAttemptRepository>,
    tick_period: Duration,
    clock: ClockDriver,
    events_tx: mpsc::Sender<SessionEvent>,
    events_rx: mpsc::Receiver<SessionEvent>,
    view_tx: watch::Sender<SessionView>,
    pending_submit: Option<JoinHandle<AppResult<SubmitAttemptResponse>>>,
}

impl AttemptSession {
    pub fn spawn(
        controller: AttemptController,
        attempts: Arc<dyn QuizAttemptRepository>,
        tick_period: Duration,
    ) -> AttemptSessionHandle {
        let (commands_tx, commands_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (session, view_rx) = Self::build(controller, attempts, tick_period);

        AttemptSessionHandle {
            commands: commands_tx,
            view: view_rx,
            task: tokio::spawn(session.run(commands_rx)),
        }
    }

    fn build(
        controller: AttemptController,
        attempts: Arc<dyn QuizAttemptRepository>,
        tick_period: Duration,
    ) -> (Self, watch::Receiver<SessionView>) {
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (view_tx, view_rx) = watch::channel(controller.view());

        let session = AttemptSession {
            controller,
            attempts,
            tick_period,
            clock: ClockDriver::new(),
            events_tx,
            events_rx,
            view_tx,
            pending_submit: None,
        };
        (session, view_rx)
    }

    async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) -> SessionExit {
        loop {
            let input = tokio::select! {
                command = commands.recv() => SessionInput::Command(command),
                Some(event) = self.events_rx.recv() => SessionInput::Event(event),
            };

            let keep_running = match input {
                SessionInput::Command(Some(command)) => self.handle_command(command),
                SessionInput::Command(None) => {
                    log::info!("Attempt session handle dropped, leaving");
                    false
                }
                SessionInput::Event(event) => self.handle_event(event),
            };

            self.publish();
            if !keep_running {
                break;
            }
        }

        self.finish()
    }

    fn finish(mut self) -> SessionExit {
        self.clock.stop();

        // A submit result may already be queued behind the command that ended the loop.
        while let Ok(event) = self.events_rx.try_recv() {
            if let SessionEvent::Submitted(result) = event {
                self.pending_submit = None;
                let _ = self.controller.complete_submit(result);
            }
        }

        self.controller.abandon();
        self.publish();

        let outcome = match self.controller.state() {
            AttemptState::Completed { result, .. } => Some(result.clone()),
            _ => None,
        };
        let pending_submit = self.pending_submit.take();
        if let Some(handle) = &pending_submit {
            if handle.is_finished() {
                log::info!("Leaving attempt session with an unprocessed submission result");
            } else {
                log::info!("Leaving attempt session with a submission still in flight");
            }
        }

        SessionExit {
            outcome,
            pending_submit,
        }
    }

    fn handle_command(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Start => {
                if let Ok(Some(request)) = self.controller.begin_start() {
                    let attempts = Arc::clone(&self.attempts);
                    let events = self.events_tx.clone();
                    tokio::spawn(async move {
                        let result = attempts.start_attempt(&request).await;
                        let _ = events.send(SessionEvent::Started(result)).await;
                    });
                }
                true
            }
            SessionCommand::Answer { question_id, value } => {
                let _ = self.controller.answer(&question_id, value);
                true
            }
            SessionCommand::Navigate(delta) => {
                self.controller.navigate(delta);
                true
            }
            SessionCommand::Submit => {
                self.submit(SubmitTrigger::Learner);
                true
            }
            SessionCommand::Leave => {
                log::info!("Learner left quiz {}", self.controller.quiz().id);
                false
            }
        }
    }

    fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Tick => {
                if let Some(trigger) = self.controller.tick() {
                    self.submit(trigger);
                }
                if !self.controller.clock().is_running() {
                    self.clock.stop();
                }
                true
            }
            SessionEvent::Started(result) => {
                let _ = self.controller.complete_start(result);
                self.sync_clock();
                true
            }
            SessionEvent::Submitted(result) => {
                self.pending_submit = None;
                match self.controller.complete_submit(result) {
                    Ok(_) => false,
                    Err(_) => {
                        self.sync_clock();
                        true
                    }
                }
            }
        }
    }

    fn submit(&mut self, trigger: SubmitTrigger) {
        match self.controller.begin_submit(trigger) {
            Ok(Some((attempt_id, request))) => {
                self.clock.stop();
                let attempts = Arc::clone(&self.attempts);
                let events = self.events_tx.clone();
                self.pending_submit = Some(tokio::spawn(async move {
                    let result = attempts.submit_attempt(&attempt_id, &request).await;
                    let _ = events.send(SessionEvent::Submitted(result.clone())).await;
                    result
                }));
            }
            Ok(None) => log::debug!("Submit ignored, no attempt in progress"),
            Err(err) => log::debug!("Submit refused: {}", err),
        }
    }

    fn sync_clock(&mut self) {
        if self.controller.clock().is_running() {
            self.clock
                .start(self.tick_period, self.events_tx.clone(), SessionEvent::Tick);
        } else {
            self.clock.stop();
        }
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.controller.view());
    }
}
