pub mod quiz_attempt_repository;
pub mod quiz_repository;

pub use quiz_attempt_repository::{HttpQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_repository::{HttpQuizRepository, QuizRepository};

#[cfg(test)]
pub use quiz_attempt_repository::MockQuizAttemptRepository;
#[cfg(test)]
pub use quiz_repository::MockQuizRepository;
