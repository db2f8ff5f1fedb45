// tests/engine_tests.rs
//
// Store-level tests exercising the quiz engine directly, without the HTTP
// surface.

mod common;

use assessment_api::error::AppError;
use assessment_api::quiz::{catalog, flow, ledger, results, sessions};
use common::{create_test_db, link_block, seed_block, seed_question, seed_track};
use uuid::Uuid;

#[tokio::test]
async fn flow_respects_block_quotas_and_order() {
    let (pool, _) = create_test_db().await;

    let track_id = seed_track(&pool, "Data Engineer").await;
    let block_a = seed_block(&pool, "Algorithms").await;
    let block_b = seed_block(&pool, "SQL").await;
    for i in 0..3 {
        seed_question(&pool, block_a, &format!("A question {i}"), "A").await;
    }
    seed_question(&pool, block_b, "B question", "A").await;
    link_block(&pool, track_id, block_a, 2, 0).await;
    link_block(&pool, track_id, block_b, 1, 1).await;

    let session = sessions::create_session(&pool, Uuid::new_v4(), track_id, 15)
        .await
        .unwrap();

    // Drain the quiz through the flow controller; block A must fill its
    // quota of 2 before block B is touched.
    let mut served_blocks = Vec::new();
    loop {
        let Some(question) = flow::next_question(&pool, &session).await.unwrap() else {
            break;
        };
        served_blocks.push(question.block_id);
        ledger::record_answer(&pool, session.id, question.id, "A", true)
            .await
            .unwrap();
    }

    assert_eq!(served_blocks, vec![block_a, block_a, block_b]);
}

#[tokio::test]
async fn flow_skips_exhausted_block_before_quota_met() {
    let (pool, _) = create_test_db().await;

    let track_id = seed_track(&pool, "Data Engineer").await;
    let block_id = seed_block(&pool, "Algorithms").await;
    seed_question(&pool, block_id, "Question 1", "A").await;
    seed_question(&pool, block_id, "Question 2", "A").await;
    // Requirement exceeds the bank.
    link_block(&pool, track_id, block_id, 5, 0).await;

    let session = sessions::create_session(&pool, Uuid::new_v4(), track_id, 15)
        .await
        .unwrap();

    for _ in 0..2 {
        let question = flow::next_question(&pool, &session).await.unwrap().unwrap();
        ledger::record_answer(&pool, session.id, question.id, "A", true)
            .await
            .unwrap();
    }

    // Quota not met, bank empty: the quiz is over.
    let next = flow::next_question(&pool, &session).await.unwrap();
    assert!(next.is_none());
}

#[tokio::test]
async fn inactive_questions_are_never_selected() {
    let (pool, _) = create_test_db().await;

    let block_id = seed_block(&pool, "Algorithms").await;
    let active = seed_question(&pool, block_id, "Active question", "A").await;
    let inactive = seed_question(&pool, block_id, "Inactive question", "A").await;
    sqlx::query("UPDATE quiz_questions SET is_active = 0 WHERE id = $1")
        .bind(inactive)
        .execute(&pool)
        .await
        .unwrap();

    for _ in 0..10 {
        let question = catalog::random_question_from_block(&pool, block_id, &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(question.id, active);
    }
}

#[tokio::test]
async fn random_selection_excludes_answered_questions() {
    let (pool, _) = create_test_db().await;

    let block_id = seed_block(&pool, "Algorithms").await;
    let q1 = seed_question(&pool, block_id, "Question 1", "A").await;
    let q2 = seed_question(&pool, block_id, "Question 2", "A").await;

    for _ in 0..10 {
        let question = catalog::random_question_from_block(&pool, block_id, &[q1])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(question.id, q2);
    }

    let none = catalog::random_question_from_block(&pool, block_id, &[q1, q2])
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn second_start_for_same_candidate_and_track_conflicts() {
    let (pool, _) = create_test_db().await;

    let track_id = seed_track(&pool, "Data Engineer").await;
    let candidate_id = Uuid::new_v4();

    sessions::create_session(&pool, candidate_id, track_id, 15)
        .await
        .unwrap();

    let err = sessions::create_session(&pool, candidate_id, track_id, 15)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // A different track is unaffected.
    let other_track = seed_track(&pool, "Frontend Developer").await;
    sessions::create_session(&pool, candidate_id, other_track, 15)
        .await
        .unwrap();
}

#[tokio::test]
async fn finalize_is_one_way() {
    let (pool, _) = create_test_db().await;

    let track_id = seed_track(&pool, "Data Engineer").await;
    let session = sessions::create_session(&pool, Uuid::new_v4(), track_id, 15)
        .await
        .unwrap();

    let finalized = sessions::finalize_session(&pool, session.id).await.unwrap();
    assert_eq!(finalized.status, "completed");
    assert!(finalized.ended_at.is_some());

    let err = sessions::finalize_session(&pool, session.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyFinalized(_)));

    // A second start is possible once the first session is terminal.
    sessions::create_session(&pool, session.candidate_id, track_id, 15)
        .await
        .unwrap();
}

#[tokio::test]
async fn finalize_scores_from_tallies() {
    let (pool, _) = create_test_db().await;

    let track_id = seed_track(&pool, "Data Engineer").await;
    let block_id = seed_block(&pool, "Algorithms").await;
    let q1 = seed_question(&pool, block_id, "Question 1", "A").await;
    let q2 = seed_question(&pool, block_id, "Question 2", "A").await;
    let q3 = seed_question(&pool, block_id, "Question 3", "A").await;
    link_block(&pool, track_id, block_id, 3, 0).await;

    let session = sessions::create_session(&pool, Uuid::new_v4(), track_id, 15)
        .await
        .unwrap();

    ledger::record_answer(&pool, session.id, q1, "A", true).await.unwrap();
    ledger::record_answer(&pool, session.id, q2, "A", true).await.unwrap();
    ledger::record_answer(&pool, session.id, q3, "B", false).await.unwrap();

    let finalized = sessions::finalize_session(&pool, session.id).await.unwrap();
    assert_eq!(finalized.score, Some(66.67));

    let results = results::compute_results(&pool, session.id).await.unwrap();
    assert_eq!(results.total_questions, 3);
    assert_eq!(results.correct_answers, 2);
    assert_eq!(results.wrong_answers, 1);
    assert_eq!(results.accuracy, 66.67);
    assert_eq!(results.blocks_performance.len(), 1);
    assert_eq!(results.blocks_performance[0].correct, 2);
    assert_eq!(results.blocks_performance[0].total, 3);
}

#[tokio::test]
async fn duplicate_answer_rolls_back_without_tally_drift() {
    let (pool, _) = create_test_db().await;

    let track_id = seed_track(&pool, "Data Engineer").await;
    let block_id = seed_block(&pool, "Algorithms").await;
    let q1 = seed_question(&pool, block_id, "Question 1", "A").await;
    link_block(&pool, track_id, block_id, 1, 0).await;

    let session = sessions::create_session(&pool, Uuid::new_v4(), track_id, 15)
        .await
        .unwrap();

    ledger::record_answer(&pool, session.id, q1, "A", true).await.unwrap();

    let err = ledger::record_answer(&pool, session.id, q1, "B", false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let reloaded = sessions::get_session(&pool, session.id).await.unwrap().unwrap();
    assert_eq!(reloaded.total_questions, 1);
    assert_eq!(reloaded.correct_answers, 1);
    assert_eq!(reloaded.wrong_answers, 0);

    let answered = ledger::answered_question_ids(&pool, session.id).await.unwrap();
    assert_eq!(answered.len() as i64, reloaded.total_questions);
}

#[tokio::test]
async fn results_tolerate_session_with_zero_answers() {
    let (pool, _) = create_test_db().await;

    let track_id = seed_track(&pool, "Data Engineer").await;
    let session = sessions::create_session(&pool, Uuid::new_v4(), track_id, 15)
        .await
        .unwrap();

    let results = results::compute_results(&pool, session.id).await.unwrap();
    assert_eq!(results.total_questions, 0);
    assert_eq!(results.correct_answers, 0);
    assert_eq!(results.wrong_answers, 0);
    assert_eq!(results.accuracy, 0.0);
    assert_eq!(results.completion_time_seconds, 0);
    assert!(results.blocks_performance.is_empty());
}
