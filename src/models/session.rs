// src/models/session.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::models::question::QuestionResponse;

pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";

/// Represents the 'quiz_sessions' table.
///
/// One candidate's timed attempt at a track's quiz. Tallies are updated in
/// the same transaction as the answer insert; the partial unique index
/// `uq_sessions_active` guarantees at most one in_progress row per
/// (candidate, track).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizSession {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub track_id: i64,
    pub status: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub wrong_answers: i64,
    /// Percentage of correct answers, set on finalization.
    pub score: Option<f64>,
}

impl QuizSession {
    pub fn is_in_progress(&self) -> bool {
        self.status == STATUS_IN_PROGRESS
    }
}

/// DTO for starting a quiz session.
#[derive(Debug, Deserialize)]
pub struct QuizStartRequest {
    pub candidate_id: Uuid,
    pub track_id: i64,
}

/// Response when a quiz is started.
#[derive(Debug, Serialize)]
pub struct QuizStartResponse {
    pub session_id: Uuid,
    pub question: QuestionResponse,
}

/// One quiz attempt in a candidate's history (joined with the track name).
#[derive(Debug, FromRow, Serialize)]
pub struct QuizAttempt {
    pub session_id: Uuid,
    pub track_name: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
    pub status: String,
    pub score: Option<f64>,
    pub total_questions: i64,
    pub correct_answers: i64,
}

#[derive(Debug, Serialize)]
pub struct QuizAttemptsResponse {
    pub attempts: Vec<QuizAttempt>,
}
