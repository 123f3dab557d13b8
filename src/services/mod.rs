pub mod answer_ledger;
pub mod attempt_clock;
pub mod attempt_controller;
pub mod attempt_history;
pub mod attempt_session;
pub mod quiz_attempt_service;
