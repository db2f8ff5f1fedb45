// src/quiz/flow.rs

use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{question::QuizQuestion, session::QuizSession},
    quiz::{catalog, ledger, track_blocks},
};

/// Decides what the session should be asked next.
///
/// Walks the track's block requirements in configured order; the first block
/// whose answered count is below its quota and whose bank still has an
/// unseen active question supplies the next question. An exhausted bank is
/// treated as "no question available" and the walk moves on. None means the
/// quiz is over and the caller should finalize.
pub async fn next_question(
    pool: &SqlitePool,
    session: &QuizSession,
) -> Result<Option<QuizQuestion>, AppError> {
    let requirements = track_blocks::blocks_for_track(pool, session.track_id).await?;
    let answered_ids = ledger::answered_question_ids(pool, session.id).await?;

    for requirement in &requirements {
        let block_answered =
            ledger::count_block_answers(pool, session.id, requirement.block_id).await?;

        if block_answered < requirement.questions_count {
            if let Some(question) =
                catalog::random_question_from_block(pool, requirement.block_id, &answered_ids)
                    .await?
            {
                return Ok(Some(question));
            }
        }
    }

    Ok(None)
}
