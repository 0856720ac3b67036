use serde::Deserialize;
use std::env;

use crate::services::aggregator::DEFAULT_PASS_MARK;
use crate::services::history_store::DEFAULT_HISTORY_LIMIT;

pub const DEFAULT_PRACTICE_LIMIT: usize = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Question bank location: a local path or an http(s) URL.
    pub questions_source: String,
    /// Directory for the persisted key-value state (history, stats,
    /// language preference).
    pub data_dir: String,
    pub pass_mark: u32,
    pub history_limit: usize,
    pub practice_limit: usize,
    /// Optional whole-exam time limit; unset means the timer only counts up.
    pub exam_time_limit_seconds: Option<u32>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            // Load base config from TOML file
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        // Extract values with fallbacks to ENV or defaults
        let questions_source = settings
            .get_string("questions.source")
            .or_else(|_| env::var("QUESTIONS_SOURCE"))
            .unwrap_or_else(|_| "questions.json".to_string());

        let data_dir = settings
            .get_string("storage.data_dir")
            .or_else(|_| env::var("DATA_DIR"))
            .unwrap_or_else(|_| "data".to_string());

        let pass_mark = settings
            .get_int("exam.pass_mark")
            .ok()
            .map(|value| value as u32)
            .or_else(|| {
                env::var("PASS_MARK")
                    .ok()
                    .and_then(|value| value.parse().ok())
            })
            .unwrap_or(DEFAULT_PASS_MARK);

        let history_limit = settings
            .get_int("history.limit")
            .ok()
            .map(|value| value as usize)
            .or_else(|| {
                env::var("HISTORY_LIMIT")
                    .ok()
                    .and_then(|value| value.parse().ok())
            })
            .unwrap_or(DEFAULT_HISTORY_LIMIT);

        let practice_limit = settings
            .get_int("exam.practice_limit")
            .ok()
            .map(|value| value as usize)
            .or_else(|| {
                env::var("PRACTICE_LIMIT")
                    .ok()
                    .and_then(|value| value.parse().ok())
            })
            .unwrap_or(DEFAULT_PRACTICE_LIMIT);

        let exam_time_limit_seconds = settings
            .get_int("exam.time_limit_seconds")
            .ok()
            .or_else(|| {
                env::var("EXAM_TIME_LIMIT_SECONDS")
                    .ok()
                    .and_then(|value| value.parse().ok())
            })
            .filter(|value| *value > 0)
            .map(|value| value as u32);

        Ok(Config {
            questions_source,
            data_dir,
            pass_mark,
            history_limit,
            practice_limit,
            exam_time_limit_seconds,
        })
    }
}
