// src/handlers/admin.rs
//
// Administrative configuration surface: blocks, questions and track
// composition are created here and only ever read by the engine.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, is_unique_violation},
    models::{
        block::{CreateBlockRequest, QuizBlock},
        question::CreateQuestionRequest,
        track::{CreateTrackRequest, LinkTrackBlockRequest},
    },
    quiz::{catalog, track_blocks},
};

/// Creates an assessment track.
pub async fn create_track(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateTrackRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id: i64 = sqlx::query_scalar("INSERT INTO tracks (name, created_at) VALUES ($1, $2) RETURNING id")
        .bind(&payload.name)
        .bind(Utc::now())
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Track '{}' already exists", payload.name))
            } else {
                tracing::error!("Failed to create track: {:?}", e);
                e.into()
            }
        })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Creates a quiz block (e.g. "Algorithms").
pub async fn create_block(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateBlockRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let now = Utc::now();
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO quiz_blocks (name, description, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Quiz block '{}' already exists", payload.name))
        } else {
            tracing::error!("Failed to create quiz block: {:?}", e);
            e.into()
        }
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

#[derive(Debug, Deserialize)]
pub struct ListBlocksQuery {
    pub is_active: Option<bool>,
}

/// Lists quiz blocks, optionally filtered by active status.
pub async fn list_blocks(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListBlocksQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut query_builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, name, description, is_active, created_at, updated_at FROM quiz_blocks",
    );

    if let Some(is_active) = params.is_active {
        query_builder.push(" WHERE is_active = ");
        query_builder.push_bind(is_active);
    }

    query_builder.push(" ORDER BY name");

    let blocks = query_builder
        .build_query_as::<QuizBlock>()
        .fetch_all(&pool)
        .await?;

    Ok(Json(blocks))
}

/// Adds a question to a block.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    catalog::get_block(&pool, payload.block_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quiz block {} not found", payload.block_id)))?;

    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO quiz_questions
            (id, block_id, question_text, option_a, option_b, option_c, option_d,
             correct_answer, difficulty, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(id)
    .bind(payload.block_id)
    .bind(&payload.question_text)
    .bind(&payload.option_a)
    .bind(&payload.option_b)
    .bind(&payload.option_c)
    .bind(&payload.option_d)
    .bind(&payload.correct_answer)
    .bind(&payload.difficulty)
    .bind(payload.is_active)
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Links a track with a quiz block: how many questions to draw and where the
/// block sits in the consumption order.
pub async fn link_track_block(
    State(pool): State<SqlitePool>,
    Json(payload): Json<LinkTrackBlockRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    track_blocks::get_track(&pool, payload.track_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Track {} not found", payload.track_id)))?;

    catalog::get_block(&pool, payload.block_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quiz block {} not found", payload.block_id)))?;

    sqlx::query(
        r#"
        INSERT INTO track_quiz_blocks (track_id, block_id, questions_count, position, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(payload.track_id)
    .bind(payload.block_id)
    .bind(payload.questions_count)
    .bind(payload.position)
    .bind(Utc::now())
    .execute(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!(
                "Track {} is already linked to block {}",
                payload.track_id, payload.block_id
            ))
        } else {
            tracing::error!("Failed to link track to block: {:?}", e);
            e.into()
        }
    })?;

    Ok(StatusCode::CREATED)
}

/// Lists a track's block requirements in consumption order.
pub async fn list_track_blocks(
    State(pool): State<SqlitePool>,
    Path(track_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    track_blocks::get_track(&pool, track_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Track {track_id} not found")))?;

    let requirements = track_blocks::blocks_for_track(&pool, track_id).await?;

    Ok(Json(requirements))
}
