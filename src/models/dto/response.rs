use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::decimal;
use crate::models::domain::GradingStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartAttemptResponse {
    pub attempt_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitAttemptResponse {
    #[serde(deserialize_with = "decimal::deserialize")]
    pub total_score: f64,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub max_possible_score: f64,
    pub is_passed: bool,
    #[serde(default)]
    pub grading_status: GradingStatus,
}

/// List endpoints answer with either a bare array or a paginated envelope
/// that links to the following page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        results: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    pub fn next_page(&self) -> Option<&str> {
        match self {
            ListResponse::Paginated { next, .. } => next.as_deref().filter(|n| !n.is_empty()),
            ListResponse::Plain(_) => None,
        }
    }

    /// Total across all pages, when the server reports it.
    pub fn total_count(&self) -> Option<u64> {
        match self {
            ListResponse::Paginated { count, .. } => *count,
            ListResponse::Plain(items) => Some(items.len() as u64),
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Paginated { results, .. } => results,
            ListResponse::Plain(items) => items,
        }
    }
}
