// src/quiz/ledger.rs

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, is_unique_violation};

/// Appends the answer row and bumps the session tallies in one transaction.
///
/// The UNIQUE (session_id, question_id) constraint is the single enforcement
/// point of the at-most-once-per-question invariant; when it fires the whole
/// transaction rolls back, so tallies never drift from the answer count.
pub async fn record_answer(
    pool: &SqlitePool,
    session_id: Uuid,
    question_id: Uuid,
    candidate_answer: &str,
    is_correct: bool,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO quiz_answers (id, session_id, question_id, candidate_answer, is_correct, answered_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(session_id)
    .bind(question_id)
    .bind(candidate_answer)
    .bind(is_correct)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Question already answered in this session".to_string())
        } else {
            e.into()
        }
    })?;

    let tally_update = if is_correct {
        "UPDATE quiz_sessions \
         SET total_questions = total_questions + 1, correct_answers = correct_answers + 1, updated_at = $1 \
         WHERE id = $2"
    } else {
        "UPDATE quiz_sessions \
         SET total_questions = total_questions + 1, wrong_answers = wrong_answers + 1, updated_at = $1 \
         WHERE id = $2"
    };

    sqlx::query(tally_update)
        .bind(now)
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        "answer recorded for session={session_id} question={question_id} correct={is_correct}"
    );

    Ok(())
}

pub async fn answered_question_ids(
    pool: &SqlitePool,
    session_id: Uuid,
) -> Result<Vec<Uuid>, AppError> {
    let ids: Vec<Uuid> =
        sqlx::query_scalar("SELECT question_id FROM quiz_answers WHERE session_id = $1")
            .bind(session_id)
            .fetch_all(pool)
            .await?;

    Ok(ids)
}

/// How many answers in the session belong to questions from the given block.
pub async fn count_block_answers(
    pool: &SqlitePool,
    session_id: Uuid,
    block_id: i64,
) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM quiz_answers a
        JOIN quiz_questions q ON a.question_id = q.id
        WHERE a.session_id = $1 AND q.block_id = $2
        "#,
    )
    .bind(session_id)
    .bind(block_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
