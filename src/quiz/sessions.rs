// src/quiz/sessions.rs

use chrono::{Duration, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    error::{AppError, is_unique_violation},
    models::session::{QuizAttempt, QuizSession, STATUS_COMPLETED, STATUS_IN_PROGRESS},
    quiz::results::score_percentage,
};

const SESSION_COLUMNS: &str = "id, candidate_id, track_id, status, started_at, expires_at, \
     ended_at, total_questions, correct_answers, wrong_answers, score";

/// Opens a new in_progress session. The partial unique index
/// `uq_sessions_active` rejects a second active session for the same
/// (candidate, track); two racing starts resolve at the insert, and the
/// loser sees a Conflict.
pub async fn create_session(
    pool: &SqlitePool,
    candidate_id: Uuid,
    track_id: i64,
    duration_minutes: i64,
) -> Result<QuizSession, AppError> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let expires_at = now + Duration::minutes(duration_minutes);

    sqlx::query(
        r#"
        INSERT INTO quiz_sessions
            (id, candidate_id, track_id, status, started_at, expires_at,
             total_questions, correct_answers, wrong_answers, created_at, updated_at)
        VALUES ($1, $2, $3, 'in_progress', $4, $5, 0, 0, 0, $6, $7)
        "#,
    )
    .bind(id)
    .bind(candidate_id)
    .bind(track_id)
    .bind(now)
    .bind(expires_at)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Active quiz session already exists for this track".to_string())
        } else {
            e.into()
        }
    })?;

    tracing::info!("quiz session {id} started for candidate={candidate_id} track={track_id}");

    Ok(QuizSession {
        id,
        candidate_id,
        track_id,
        status: STATUS_IN_PROGRESS.to_string(),
        started_at: now,
        expires_at,
        ended_at: None,
        total_questions: 0,
        correct_answers: 0,
        wrong_answers: 0,
        score: None,
    })
}

pub async fn get_session(
    pool: &SqlitePool,
    session_id: Uuid,
) -> Result<Option<QuizSession>, AppError> {
    let session = sqlx::query_as::<_, QuizSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM quiz_sessions WHERE id = $1"
    ))
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

pub async fn get_active_session(
    pool: &SqlitePool,
    candidate_id: Uuid,
    track_id: i64,
) -> Result<Option<QuizSession>, AppError> {
    let session = sqlx::query_as::<_, QuizSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM quiz_sessions \
         WHERE candidate_id = $1 AND track_id = $2 AND status = 'in_progress'"
    ))
    .bind(candidate_id)
    .bind(track_id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// One-way transition to `completed`: sets ended_at and the final score.
/// The update is guarded on `status = 'in_progress'`; a finalize racing a
/// finished session observes zero updated rows and fails with
/// AlreadyFinalized instead of rewriting the terminal row.
pub async fn finalize_session(
    pool: &SqlitePool,
    session_id: Uuid,
) -> Result<QuizSession, AppError> {
    let mut tx = pool.begin().await?;

    let session = sqlx::query_as::<_, QuizSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM quiz_sessions WHERE id = $1"
    ))
    .bind(session_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Quiz session {session_id} not found")))?;

    if !session.is_in_progress() {
        return Err(AppError::AlreadyFinalized(format!(
            "Quiz session {session_id} is already {}",
            session.status
        )));
    }

    let now = Utc::now();
    let score = score_percentage(session.correct_answers, session.total_questions);

    let updated = sqlx::query(
        "UPDATE quiz_sessions \
         SET status = 'completed', ended_at = $1, score = $2, updated_at = $3 \
         WHERE id = $4 AND status = 'in_progress'",
    )
    .bind(now)
    .bind(score)
    .bind(now)
    .bind(session_id)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::AlreadyFinalized(format!(
            "Quiz session {session_id} was finalized concurrently"
        )));
    }

    tx.commit().await?;

    tracing::info!("quiz session {session_id} finalized: score={score:.2}");

    Ok(QuizSession {
        status: STATUS_COMPLETED.to_string(),
        ended_at: Some(now),
        score: Some(score),
        ..session
    })
}

/// Read-only attempt history for a candidate, newest first.
pub async fn candidate_attempts(
    pool: &SqlitePool,
    candidate_id: Uuid,
    track_id: Option<i64>,
) -> Result<Vec<QuizAttempt>, AppError> {
    let mut query_builder = QueryBuilder::<Sqlite>::new(
        "SELECT s.id AS session_id, t.name AS track_name, s.started_at, s.ended_at, \
         s.status, s.score, s.total_questions, s.correct_answers \
         FROM quiz_sessions s \
         JOIN tracks t ON s.track_id = t.id \
         WHERE s.candidate_id = ",
    );
    query_builder.push_bind(candidate_id);

    if let Some(track_id) = track_id {
        query_builder.push(" AND s.track_id = ");
        query_builder.push_bind(track_id);
    }

    query_builder.push(" ORDER BY s.started_at DESC");

    let attempts = query_builder
        .build_query_as::<QuizAttempt>()
        .fetch_all(pool)
        .await?;

    Ok(attempts)
}
