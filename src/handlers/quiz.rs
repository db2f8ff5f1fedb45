// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        answer::{QuizAnswerRequest, QuizAnswerResponse},
        question::{QuestionOption, QuestionResponse, QuizQuestion},
        session::{QuizAttemptsResponse, QuizStartRequest, QuizStartResponse},
    },
    quiz::{catalog, flow, ledger, results, sessions, track_blocks},
    state::AppState,
};

/// Formats a question for the candidate: four labeled options, no correct
/// answer, 1-based sequential number.
fn format_question(
    question: &QuizQuestion,
    block_name: &str,
    question_number: i64,
) -> QuestionResponse {
    QuestionResponse {
        id: question.id,
        text: question.question_text.clone(),
        block_name: block_name.to_string(),
        options: vec![
            QuestionOption {
                key: "A",
                text: question.option_a.clone(),
            },
            QuestionOption {
                key: "B",
                text: question.option_b.clone(),
            },
            QuestionOption {
                key: "C",
                text: question.option_c.clone(),
            },
            QuestionOption {
                key: "D",
                text: question.option_d.clone(),
            },
        ],
        question_number,
    }
}

/// Starts a quiz session for a candidate on a track and returns the first
/// question.
///
/// Fails if an active session already exists (the partial unique index backs
/// this up under races), if the track has no block configuration, or if the
/// first configured block has no active question. The availability probe runs
/// before the session insert so a failed start never strands an in_progress
/// session.
pub async fn start_quiz(
    State(state): State<AppState>,
    Json(payload): Json<QuizStartRequest>,
) -> Result<impl IntoResponse, AppError> {
    let pool = &state.pool;

    if let Some(existing) =
        sessions::get_active_session(pool, payload.candidate_id, payload.track_id).await?
    {
        tracing::warn!(
            "start rejected: candidate={} already has session {} on track {}",
            payload.candidate_id,
            existing.id,
            payload.track_id
        );
        return Err(AppError::Conflict(
            "Active quiz session already exists for this track".to_string(),
        ));
    }

    track_blocks::get_track(pool, payload.track_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Track {} not found", payload.track_id)))?;

    let requirements = track_blocks::blocks_for_track(pool, payload.track_id).await?;
    let first_block = requirements.first().ok_or_else(|| {
        AppError::Configuration(format!(
            "Track {} has no quiz blocks configured",
            payload.track_id
        ))
    })?;

    let first_question = catalog::random_question_from_block(pool, first_block.block_id, &[])
        .await?
        .ok_or_else(|| {
            AppError::ExhaustedBank(format!(
                "No questions available in block {}",
                first_block.block_id
            ))
        })?;

    let session = sessions::create_session(
        pool,
        payload.candidate_id,
        payload.track_id,
        state.config.quiz_duration_minutes,
    )
    .await?;

    Ok(Json(QuizStartResponse {
        session_id: session.id,
        question: format_question(&first_question, &first_block.block_name, 1),
    }))
}

/// Submits an answer and returns either the next question or final results.
///
/// The answer row and the tally increments commit in one transaction; a
/// duplicate submission fails without touching tallies. Expiry is checked
/// against the wall clock on every submit - the answer that arrived late is
/// still recorded, then the session is finalized.
pub async fn submit_answer(
    State(pool): State<SqlitePool>,
    Json(payload): Json<QuizAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let session = sessions::get_session(&pool, payload.session_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Quiz session {} not found", payload.session_id))
        })?;

    if !session.is_in_progress() {
        return Err(AppError::InvalidState(format!(
            "Quiz session is {}, cannot submit answers",
            session.status
        )));
    }

    let time_expired = Utc::now() >= session.expires_at;

    let question = catalog::get_question(&pool, payload.question_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Question {} not found", payload.question_id))
        })?;

    let is_correct = payload.answer == question.correct_answer;

    ledger::record_answer(
        &pool,
        payload.session_id,
        payload.question_id,
        &payload.answer,
        is_correct,
    )
    .await?;

    // Reload for fresh tallies.
    let session = sessions::get_session(&pool, payload.session_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Quiz session {} not found", payload.session_id))
        })?;

    if time_expired {
        sessions::finalize_session(&pool, session.id).await?;
        let results = results::compute_results(&pool, session.id).await?;
        return Ok(Json(QuizAnswerResponse::End { results }));
    }

    let next_question = flow::next_question(&pool, &session).await?;

    match next_question {
        None => {
            sessions::finalize_session(&pool, session.id).await?;
            let results = results::compute_results(&pool, session.id).await?;
            Ok(Json(QuizAnswerResponse::End { results }))
        }
        Some(next_question) => {
            let block = catalog::get_block(&pool, next_question.block_id).await?;
            let block_name = block.map(|b| b.name).unwrap_or_else(|| "Unknown".to_string());

            Ok(Json(QuizAnswerResponse::Continue {
                question: format_question(
                    &next_question,
                    &block_name,
                    session.total_questions + 1,
                ),
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AttemptsQuery {
    pub candidate_id: Uuid,
    pub track_id: Option<i64>,
}

/// Lists a candidate's quiz attempts, newest first. Empty list if none.
pub async fn get_attempts(
    State(pool): State<SqlitePool>,
    Query(params): Query<AttemptsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let attempts =
        sessions::candidate_attempts(&pool, params.candidate_id, params.track_id).await?;

    Ok(Json(QuizAttemptsResponse { attempts }))
}
