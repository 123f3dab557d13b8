pub mod answer;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub use answer::{Answer, AnswerValue};
pub use quiz::Quiz;
pub use quiz_attempt::{GradingStatus, QuizAttempt};
pub use quiz_question::{QuizQuestion, QuizQuestionOption, QuizQuestionType};
