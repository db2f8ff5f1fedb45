use std::sync::atomic::{AtomicU32, Ordering};

use assessment_api::config::Config;
use assessment_api::routes;
use assessment_api::state::AppState;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

/// Creates a pool over a unique throwaway database file and applies
/// migrations. Returns the pool and the database URL it was built from.
pub async fn create_test_db() -> (SqlitePool, String) {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "assessment_api_test_{}_{}.db",
        std::process::id(),
        id
    ));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("failed to create test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to migrate test database");

    (pool, format!("sqlite://{}", path.display()))
}

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345") and the pool for
/// seeding and assertions.
#[allow(dead_code)]
pub async fn spawn_app(quiz_duration_minutes: i64) -> (String, SqlitePool) {
    let (pool, database_url) = create_test_db().await;

    let config = Config {
        database_url,
        rust_log: "error".to_string(),
        quiz_duration_minutes,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

pub async fn seed_track(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO tracks (name, created_at) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .expect("failed to seed track")
}

pub async fn seed_block(pool: &SqlitePool, name: &str) -> i64 {
    let now = Utc::now();
    sqlx::query_scalar(
        "INSERT INTO quiz_blocks (name, description, is_active, created_at, updated_at) \
         VALUES ($1, NULL, 1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .expect("failed to seed block")
}

pub async fn seed_question(pool: &SqlitePool, block_id: i64, text: &str, correct: &str) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO quiz_questions \
         (id, block_id, question_text, option_a, option_b, option_c, option_d, \
          correct_answer, difficulty, is_active, created_at, updated_at) \
         VALUES ($1, $2, $3, 'Option A', 'Option B', 'Option C', 'Option D', $4, 'medium', 1, $5, $6)",
    )
    .bind(id)
    .bind(block_id)
    .bind(text)
    .bind(correct)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("failed to seed question");
    id
}

pub async fn link_block(
    pool: &SqlitePool,
    track_id: i64,
    block_id: i64,
    questions_count: i64,
    position: i64,
) {
    sqlx::query(
        "INSERT INTO track_quiz_blocks (track_id, block_id, questions_count, position, created_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(track_id)
    .bind(block_id)
    .bind(questions_count)
    .bind(position)
    .bind(Utc::now())
    .execute(pool)
    .await
    .expect("failed to link track to block");
}
