// src/config.rs

use std::env;
use dotenvy::dotenv;

/// How long a quiz session stays open, in minutes.
pub const DEFAULT_QUIZ_DURATION_MINUTES: i64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub quiz_duration_minutes: i64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let quiz_duration_minutes = env::var("QUIZ_DURATION_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_QUIZ_DURATION_MINUTES);

        Self {
            database_url,
            rust_log,
            quiz_duration_minutes,
        }
    }
}
