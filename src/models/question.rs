// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'quiz_questions' table.
///
/// Immutable after creation except for the active flag. The correct answer
/// never leaves the admin surface; candidates see [`QuestionResponse`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub block_id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    /// One of 'A', 'B', 'C', 'D'. Enforced by a CHECK constraint as well.
    pub correct_answer: String,

    /// One of 'easy', 'medium', 'hard'.
    pub difficulty: String,

    pub is_active: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Single labeled answer option as presented to the candidate.
#[derive(Debug, Serialize)]
pub struct QuestionOption {
    pub key: &'static str,
    pub text: String,
}

/// DTO for sending a question to the candidate (excludes the correct answer).
#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub text: String,
    pub block_name: String,
    pub options: Vec<QuestionOption>,
    /// 1-based sequential number within the quiz.
    pub question_number: i64,
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub block_id: i64,
    #[validate(length(min = 1, max = 2000))]
    pub question_text: String,
    #[validate(length(min = 1, max = 500))]
    pub option_a: String,
    #[validate(length(min = 1, max = 500))]
    pub option_b: String,
    #[validate(length(min = 1, max = 500))]
    pub option_c: String,
    #[validate(length(min = 1, max = 500))]
    pub option_d: String,
    #[validate(custom(function = validate_answer_key))]
    pub correct_answer: String,
    #[validate(custom(function = validate_difficulty))]
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

fn default_active() -> bool {
    true
}

pub fn validate_answer_key(key: &str) -> Result<(), validator::ValidationError> {
    match key {
        "A" | "B" | "C" | "D" => Ok(()),
        _ => Err(validator::ValidationError::new("answer_key_invalid")),
    }
}

fn validate_difficulty(difficulty: &str) -> Result<(), validator::ValidationError> {
    match difficulty {
        "easy" | "medium" | "hard" => Ok(()),
        _ => Err(validator::ValidationError::new("difficulty_invalid")),
    }
}
