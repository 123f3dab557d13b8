use crate::models::domain::QuizAttempt;

/// Read-only view over a learner's past attempts at one quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptHistory {
    attempts: Vec<QuizAttempt>,
    max_attempts: u32,
}

impl AttemptHistory {
    pub fn new(attempts: Vec<QuizAttempt>, max_attempts: u32) -> Self {
        Self {
            attempts,
            max_attempts,
        }
    }

    pub fn attempts(&self) -> &[QuizAttempt] {
        &self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn attempts_used(&self) -> u32 {
        u32::try_from(self.attempts.len()).unwrap_or(u32::MAX)
    }

    pub fn can_attempt(&self) -> bool {
        self.attempts_used() < self.max_attempts
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts_used())
    }

    /// Most recent attempt by attempt number. Timestamps are not consulted
    /// since client and server clocks may disagree.
    pub fn latest_attempt(&self) -> Option<&QuizAttempt> {
        self.attempts.iter().max_by_key(|a| a.attempt_number)
    }

    /// Highest-scoring attempt; attempts without a gradable maximum are skipped.
    pub fn best_attempt(&self) -> Option<&QuizAttempt> {
        self.attempts
            .iter()
            .filter_map(|a| score_ratio(a.total_score, a.max_possible_score).map(|r| (a, r)))
            .max_by(|(_, left), (_, right)| left.total_cmp(right))
            .map(|(attempt, _)| attempt)
    }

    pub fn has_passed(&self) -> bool {
        self.attempts.iter().any(|a| a.passed)
    }

    pub fn score_percentage(&self, attempt: &QuizAttempt) -> Option<String> {
        score_percentage(attempt.total_score, attempt.max_possible_score)
    }
}

fn score_ratio(total: f64, max_possible: f64) -> Option<f64> {
    if max_possible == 0.0 || !max_possible.is_finite() || !total.is_finite() {
        return None;
    }
    Some(total / max_possible)
}

/// Percentage with one decimal ("70.0"); `None` when nothing was gradable.
/// Halves round away from zero, so 6.25 is "6.3".
pub fn score_percentage(total: f64, max_possible: f64) -> Option<String> {
    score_ratio(total, max_possible).map(|ratio| format!("{:.1}", (ratio * 1000.0).round() / 10.0))
}
