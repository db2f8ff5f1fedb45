// src/models/answer.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::question::{QuestionResponse, validate_answer_key};

/// Represents the 'quiz_answers' table. Append-only; UNIQUE on
/// (session_id, question_id) keeps a question answerable at most once per
/// session.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizAnswer {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_id: Uuid,
    pub candidate_answer: String,
    pub is_correct: bool,
    pub answered_at: chrono::DateTime<chrono::Utc>,
    pub time_taken_seconds: Option<i64>,
}

/// DTO for submitting an answer.
#[derive(Debug, Deserialize, Validate)]
pub struct QuizAnswerRequest {
    pub session_id: Uuid,
    pub question_id: Uuid,
    #[validate(custom(function = validate_answer_key))]
    pub answer: String,
}

/// Performance within a single block of the quiz.
#[derive(Debug, FromRow, Serialize)]
pub struct BlockPerformance {
    pub block_name: String,
    pub correct: i64,
    pub total: i64,
    /// Percentage, 0-100, rounded to 2 decimals.
    pub accuracy: f64,
}

/// Final quiz results.
#[derive(Debug, Serialize)]
pub struct QuizResults {
    pub session_id: Uuid,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub wrong_answers: i64,
    pub accuracy: f64,
    pub completion_time_seconds: i64,
    pub blocks_performance: Vec<BlockPerformance>,
}

/// Discriminated response for answer submission: either the quiz continues
/// with the next question, or it has ended and the results are attached.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuizAnswerResponse {
    Continue { question: QuestionResponse },
    End { results: QuizResults },
}
