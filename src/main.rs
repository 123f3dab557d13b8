use std::{process::ExitCode, sync::Arc};

use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};

use quiz_attempt_engine::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{AnswerValue, Quiz, QuizQuestion, QuizQuestionType},
    services::{
        attempt_controller::{SessionPhase, SessionView},
        attempt_history::{score_percentage, AttemptHistory},
        attempt_session::AttemptSessionHandle,
    },
};

const HELP: &str = "Commands: start, next, prev, answer <value>, submit, quit";

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("[{}] {}", err.error_code(), err);
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<()> {
    let quiz_id = std::env::args()
        .nth(1)
        .ok_or_else(|| AppError::ConfigError("usage: quiz-attempt <quiz-id>".to_string()))?;

    let state = AppState::new(Config::from_env())?;
    if let Err(err) = state.client.health_check().await {
        log::warn!("Backend health check failed: {}", err);
    }

    let opened = state
        .quiz_attempt_service
        .open_session(&quiz_id, &state.config.learner_id)
        .await?;

    print_overview(&opened.quiz, &opened.history);
    if !opened.history.can_attempt() {
        println!("Maximum attempts reached.");
        opened.session.leave().await?;
        return Ok(());
    }
    println!("{}", HELP);

    let quiz = opened.quiz;
    let session = opened.session;
    let renderer = tokio::spawn(render_changes(Arc::clone(&quiz), session.subscribe()));

    command_loop(&quiz, &session).await?;

    let exit = session.leave().await?;
    let outcome = match (exit.outcome, exit.pending_submit) {
        (Some(result), _) => Some(result),
        (None, Some(pending)) => {
            println!("Waiting for the submission to finish...");
            match pending.await {
                Ok(result) => result.ok(),
                Err(err) => {
                    log::error!("Submission task failed: {}", err);
                    None
                }
            }
        }
        (None, None) => None,
    };
    renderer.abort();

    match outcome {
        Some(result) => println!(
            "Score: {}/{} ({}%), {}",
            result.total_score,
            result.max_possible_score,
            score_percentage(result.total_score, result.max_possible_score)
                .unwrap_or_else(|| "-".to_string()),
            if result.is_passed { "passed" } else { "not passed" }
        ),
        None => println!("Left the quiz without a graded result."),
    }
    Ok(())
}

async fn command_loop(quiz: &Quiz, session: &AttemptSessionHandle) -> AppResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut completed = session.subscribe();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.map_err(|e| AppError::InternalError(format!("stdin: {}", e)))?,
            _ = completed.wait_for(|v| matches!(v.phase, SessionPhase::Completed | SessionPhase::Unavailable)) => return Ok(()),
        };
        let Some(line) = line else {
            return Ok(());
        };

        let (command, argument) = match line.trim().split_once(' ') {
            Some((command, argument)) => (command, argument.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "" => {}
            "start" => session.start().await?,
            "next" => session.navigate(1).await?,
            "prev" => session.navigate(-1).await?,
            "submit" => session.submit().await?,
            "answer" => {
                let view = session.view();
                match quiz.questions.get(view.question_index) {
                    Some(question) if !argument.is_empty() => {
                        session
                            .answer(question.id.clone(), parse_answer(question, argument))
                            .await?
                    }
                    _ => println!("Usage: answer <value>"),
                }
            }
            "quit" | "leave" => return Ok(()),
            _ => println!("{}", HELP),
        }
    }
}

/// Multiple-choice answers may be given by 1-based position.
fn parse_answer(question: &QuizQuestion, raw: &str) -> AnswerValue {
    if question.question_type == QuizQuestionType::MultipleChoice {
        let position = raw.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
        if let Some(option) = position.and_then(|i| question.options.get(i)) {
            return AnswerValue::option(option.id.clone());
        }
    }
    AnswerValue::for_question(question, raw)
}

async fn render_changes(quiz: Arc<Quiz>, mut view: tokio::sync::watch::Receiver<SessionView>) {
    let mut last: Option<SessionView> = None;

    loop {
        let current = view.borrow_and_update().clone();
        if should_render(last.as_ref(), &current) {
            render(&quiz, &current);
        }
        last = Some(current);

        if view.changed().await.is_err() {
            break;
        }
    }
}

fn should_render(last: Option<&SessionView>, current: &SessionView) -> bool {
    let Some(last) = last else {
        return true;
    };

    let countdown_milestone = current.remaining_seconds != last.remaining_seconds
        && current
            .remaining_seconds
            .is_some_and(|s| s <= 10 || s % 60 == 0);

    last.phase != current.phase
        || last.question_index != current.question_index
        || last.answered != current.answered
        || last.error != current.error
        || countdown_milestone
}

fn render(quiz: &Quiz, view: &SessionView) {
    match view.phase {
        SessionPhase::Blocked
        | SessionPhase::NotStarted
        | SessionPhase::Starting
        | SessionPhase::Unavailable => {}
        SessionPhase::InProgress => {
            if let Some(question) = quiz.questions.get(view.question_index) {
                println!(
                    "\nQuestion {} of {} ({})",
                    view.question_index + 1,
                    view.question_count,
                    view.progress_label()
                );
                println!("{}", question.text);
                for (position, option) in question.options.iter().enumerate() {
                    println!("  {}) {}", position + 1, option.text);
                }
                if question.question_type == QuizQuestionType::TrueFalse && question.options.is_empty() {
                    println!("  true / false");
                }
            }
            if let Some(remaining) = &view.remaining_display {
                println!("Time remaining: {}", remaining);
            }
            if view.can_submit {
                println!("Type 'submit' when you are done.");
            }
        }
        SessionPhase::Submitting => println!("Submitting..."),
        SessionPhase::Completed => println!("Attempt submitted."),
    }

    if let Some(error) = &view.error {
        println!("! {}", error);
    }
}

fn print_overview(quiz: &Quiz, history: &AttemptHistory) {
    println!("{}", quiz.title);
    if let Some(description) = &quiz.description {
        println!("{}", description);
    }
    println!(
        "{} questions, pass mark {}%, {}",
        quiz.question_count(),
        quiz.passing_score_percentage,
        match quiz.time_limit_minutes {
            Some(minutes) if minutes > 0 => format!("{} minute time limit", minutes),
            _ => "untimed".to_string(),
        }
    );
    println!(
        "Attempts used: {} of {} ({} remaining)",
        history.attempts_used(),
        history.max_attempts(),
        history.attempts_remaining()
    );

    for attempt in history.attempts() {
        println!(
            "  #{} {} {}% {}",
            attempt.attempt_number,
            attempt.started_at.format("%Y-%m-%d %H:%M"),
            history
                .score_percentage(attempt)
                .unwrap_or_else(|| "-".to_string()),
            if attempt.passed { "passed" } else { "" }
        );
    }
    if let Some(latest) = history.latest_attempt() {
        println!(
            "Latest attempt: #{} scored {}%",
            latest.attempt_number,
            history
                .score_percentage(latest)
                .unwrap_or_else(|| "-".to_string())
        );
    }
    if let Some(best) = history.best_attempt() {
        println!("Best attempt: #{}", best.attempt_number);
    }
}
