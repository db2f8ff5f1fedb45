// src/quiz/catalog.rs

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{block::QuizBlock, question::QuizQuestion},
};

pub async fn get_question(
    pool: &SqlitePool,
    question_id: Uuid,
) -> Result<Option<QuizQuestion>, AppError> {
    let question = sqlx::query_as::<_, QuizQuestion>(
        r#"
        SELECT id, block_id, question_text, option_a, option_b, option_c, option_d,
               correct_answer, difficulty, is_active, created_at, updated_at
        FROM quiz_questions
        WHERE id = $1
        "#,
    )
    .bind(question_id)
    .fetch_optional(pool)
    .await?;

    Ok(question)
}

pub async fn get_block(pool: &SqlitePool, block_id: i64) -> Result<Option<QuizBlock>, AppError> {
    let block = sqlx::query_as::<_, QuizBlock>(
        "SELECT id, name, description, is_active, created_at, updated_at FROM quiz_blocks WHERE id = $1",
    )
    .bind(block_id)
    .fetch_optional(pool)
    .await?;

    Ok(block)
}

/// Picks one active question from the block, uniformly at random, skipping
/// questions already answered in the session. Returns None when the block's
/// bank is exhausted.
pub async fn random_question_from_block(
    pool: &SqlitePool,
    block_id: i64,
    exclude_ids: &[Uuid],
) -> Result<Option<QuizQuestion>, AppError> {
    let mut query_builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, block_id, question_text, option_a, option_b, option_c, option_d, \
         correct_answer, difficulty, is_active, created_at, updated_at \
         FROM quiz_questions WHERE block_id = ",
    );
    query_builder.push_bind(block_id);
    query_builder.push(" AND is_active = 1");

    if !exclude_ids.is_empty() {
        query_builder.push(" AND id NOT IN (");
        let mut separated = query_builder.separated(", ");
        for id in exclude_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
    }

    query_builder.push(" ORDER BY RANDOM() LIMIT 1");

    let question = query_builder
        .build_query_as::<QuizQuestion>()
        .fetch_optional(pool)
        .await?;

    Ok(question)
}
