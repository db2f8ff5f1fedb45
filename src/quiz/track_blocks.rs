// src/quiz/track_blocks.rs
//
// Read side of the per-track quiz composition. The rows themselves are
// administrative configuration (handlers::admin); the engine only consumes
// them.

use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::track::{Track, TrackBlockRequirement},
};

pub async fn get_track(pool: &SqlitePool, track_id: i64) -> Result<Option<Track>, AppError> {
    let track =
        sqlx::query_as::<_, Track>("SELECT id, name, created_at FROM tracks WHERE id = $1")
            .bind(track_id)
            .fetch_optional(pool)
            .await?;

    Ok(track)
}

/// Returns the track's block requirements in consumption order.
pub async fn blocks_for_track(
    pool: &SqlitePool,
    track_id: i64,
) -> Result<Vec<TrackBlockRequirement>, AppError> {
    let requirements = sqlx::query_as::<_, TrackBlockRequirement>(
        r#"
        SELECT tqb.track_id, tqb.block_id, b.name AS block_name,
               tqb.questions_count, tqb.position
        FROM track_quiz_blocks tqb
        JOIN quiz_blocks b ON tqb.block_id = b.id
        WHERE tqb.track_id = $1
        ORDER BY tqb.position, tqb.block_id
        "#,
    )
    .bind(track_id)
    .fetch_all(pool)
    .await?;

    Ok(requirements)
}
