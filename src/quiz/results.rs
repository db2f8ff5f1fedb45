// src/quiz/results.rs

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::answer::{BlockPerformance, QuizResults},
    quiz::sessions,
};

/// Share of correct answers as a percentage, rounded to 2 decimals.
/// 0.0 when nothing was answered.
pub fn score_percentage(correct: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = correct as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Read-side projection of a session's results: overall tallies plus
/// per-block performance for every block actually touched. Safe to call on a
/// session with zero answers or one that has not been finalized yet.
pub async fn compute_results(
    pool: &SqlitePool,
    session_id: Uuid,
) -> Result<QuizResults, AppError> {
    let session = sessions::get_session(pool, session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quiz session {session_id} not found")))?;

    let blocks_performance = sqlx::query_as::<_, BlockPerformance>(
        r#"
        SELECT b.name AS block_name,
               SUM(CASE WHEN a.is_correct THEN 1 ELSE 0 END) AS correct,
               COUNT(*) AS total,
               ROUND(SUM(CASE WHEN a.is_correct THEN 1 ELSE 0 END) * 100.0 / COUNT(*), 2) AS accuracy
        FROM quiz_answers a
        JOIN quiz_questions q ON a.question_id = q.id
        JOIN quiz_blocks b ON q.block_id = b.id
        WHERE a.session_id = $1
        GROUP BY b.name
        ORDER BY b.name
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    let completion_time_seconds = match session.ended_at {
        Some(ended_at) => (ended_at - session.started_at).num_seconds(),
        None => 0,
    };

    Ok(QuizResults {
        session_id: session.id,
        total_questions: session.total_questions,
        correct_answers: session.correct_answers,
        wrong_answers: session.wrong_answers,
        accuracy: session.score.unwrap_or(0.0),
        completion_time_seconds,
        blocks_performance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_percentage_perfect() {
        assert_eq!(score_percentage(4, 4), 100.0);
    }

    #[test]
    fn test_score_percentage_half() {
        assert_eq!(score_percentage(1, 2), 50.0);
    }

    #[test]
    fn test_score_percentage_zero_total() {
        assert_eq!(score_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_score_percentage_rounds_to_two_decimals() {
        // 1/3 = 33.333...%
        assert_eq!(score_percentage(1, 3), 33.33);
        // 2/3 = 66.666...%
        assert_eq!(score_percentage(2, 3), 66.67);
    }
}
