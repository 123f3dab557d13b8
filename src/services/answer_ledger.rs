use crate::models::{
    domain::{Answer, AnswerValue},
    dto::request::AnswerSubmission,
};

/// Working set of answers for the attempt in progress.
///
/// Entries keep the order in which questions were first answered, and a
/// question never holds more than one entry: answering again replaces the
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLedger {
    entries: Vec<Answer>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_answer(&mut self, question_id: &str, value: AnswerValue) {
        match self.entries.iter_mut().find(|a| a.question_id == question_id) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Answer {
                question_id: question_id.to_string(),
                value,
            }),
        }
    }

    pub fn get_answer(&self, question_id: &str) -> Option<&AnswerValue> {
        self.entries
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| &a.value)
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.get_answer(question_id).is_some()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Answered questions only, in ledger order.
    pub fn to_submission_list(&self) -> Vec<AnswerSubmission> {
        self.entries.iter().map(AnswerSubmission::from).collect()
    }
}
