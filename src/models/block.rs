// src/models/block.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'quiz_blocks' table.
///
/// A block is a named pool of questions (e.g. "Algorithms"). Deactivating a
/// block hides it from new selections without touching history.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizBlock {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a quiz block.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlockRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
