// src/models/track.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'tracks' table.
///
/// A track is an assessment track (e.g. a job category). Only the columns the
/// quiz engine needs live here; vacancy management is a separate system.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    pub name: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// One row of a track's quiz composition: how many questions to draw from a
/// block, and where the block sits in the consumption order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrackBlockRequirement {
    pub track_id: i64,
    pub block_id: i64,
    pub block_name: String,
    pub questions_count: i64,
    pub position: i64,
}

/// DTO for creating a track.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTrackRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// DTO for linking a track with a quiz block.
#[derive(Debug, Deserialize, Validate)]
pub struct LinkTrackBlockRequest {
    pub track_id: i64,
    pub block_id: i64,
    #[validate(range(min = 1))]
    pub questions_count: i64,
    /// Blocks are consumed by ascending position.
    #[serde(default)]
    pub position: i64,
}
