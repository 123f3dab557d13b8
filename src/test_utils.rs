use chrono::{Duration, TimeZone, Utc};

use crate::models::domain::{
    GradingStatus, Quiz, QuizAttempt, QuizQuestion, QuizQuestionOption, QuizQuestionType,
};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    fn option(id: &str, text: &str, is_correct: bool) -> QuizQuestionOption {
        QuizQuestionOption {
            id: id.to_string(),
            text: text.to_string(),
            is_correct,
        }
    }

    /// Untimed quiz with three required questions and three attempts allowed
    pub fn test_quiz() -> Quiz {
        Quiz {
            id: "quiz-1".to_string(),
            title: "Ownership Basics".to_string(),
            description: Some("Checks the borrow checker chapter".to_string()),
            time_limit_minutes: None,
            passing_score_percentage: 70.0,
            max_attempts: 3,
            questions: test_questions(),
        }
    }

    /// Same quiz with a time limit
    pub fn timed_quiz(minutes: u32) -> Quiz {
        Quiz {
            time_limit_minutes: Some(minutes),
            ..test_quiz()
        }
    }

    /// Multiple choice, true/false and short answer, in that order
    pub fn test_questions() -> Vec<QuizQuestion> {
        vec![
            QuizQuestion {
                id: "q-1".to_string(),
                text: "Which keyword moves a value into a closure?".to_string(),
                question_type: QuizQuestionType::MultipleChoice,
                points: 1.0,
                is_required: true,
                order: 1,
                options: vec![
                    option("q-1-a", "move", true),
                    option("q-1-b", "ref", false),
                    option("q-1-c", "static", false),
                ],
            },
            QuizQuestion {
                id: "q-2".to_string(),
                text: "A value can have two mutable borrows at once.".to_string(),
                question_type: QuizQuestionType::TrueFalse,
                points: 1.0,
                is_required: true,
                order: 2,
                options: vec![],
            },
            QuizQuestion {
                id: "q-3".to_string(),
                text: "When does a borrow end?".to_string(),
                question_type: QuizQuestionType::ShortAnswer,
                points: 1.0,
                is_required: true,
                order: 3,
                options: vec![],
            },
        ]
    }

    /// Finalized attempt at `quiz-1`, started `number` hours after a fixed origin
    pub fn test_attempt(number: u32, total_score: f64, max_possible_score: f64) -> QuizAttempt {
        let origin = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().unwrap_or_else(Utc::now);
        let started_at = origin + Duration::hours(i64::from(number));

        QuizAttempt {
            id: format!("attempt-{}", number),
            quiz_id: "quiz-1".to_string(),
            learner_id: "learner-1".to_string(),
            attempt_number: number,
            started_at,
            completed_at: Some(started_at + Duration::minutes(12)),
            total_score,
            max_possible_score,
            passed: false,
            grading_status: GradingStatus::Finalized,
        }
    }
}

/// Loopback HTTP server answering fixed JSON bodies by request target.
#[cfg(test)]
pub mod json_server {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Binds to an ephemeral port and returns its origin (`http://127.0.0.1:N`).
    /// `routes` receives the origin so bodies can link back to the server.
    pub async fn serve<F>(routes: F) -> String
    where
        F: FnOnce(&str) -> Vec<(String, String)>,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
        let origin = format!("http://{}", listener.local_addr().expect("local addr"));
        let routes = routes(&origin);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let target = head.split_whitespace().nth(1).unwrap_or_default();
                let response = match routes.iter().find(|(path, _)| path == target) {
                    Some((_, body)) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        origin
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_test_quiz() {
        let quiz = test_quiz();
        assert_eq!(quiz.id, "quiz-1");
        assert_eq!(quiz.question_count(), 3);
        assert!(quiz.time_limit_seconds().is_none());
    }

    #[test]
    fn test_fixtures_timed_quiz() {
        assert_eq!(timed_quiz(2).time_limit_seconds(), Some(120));
    }

    #[test]
    fn test_fixtures_test_attempt() {
        let attempt = test_attempt(2, 3.0, 4.0);
        assert_eq!(attempt.id, "attempt-2");
        assert!(attempt.completed_at.is_some());
        assert!(attempt.is_finalized());
    }
}
