use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::services::audio::AudioTiming;
use crate::services::hearing_test::TestSettings;
use crate::utils::retry::RetryConfig;

pub const DEFAULT_UPLOAD_URL: &str = "https://enoqczf2j2pbadx.m.pipedream.net";
const DEFAULT_TIME_UNIT_MS: u64 = 1000;
const DEFAULT_UPLOAD_TIMEOUT_UNITS: u32 = 30;
const DEFAULT_UPLOAD_MAX_ATTEMPTS: usize = 3;
const DEFAULT_ASSET_DIR: &str = "assets";
const DEFAULT_HISTORY_PATH: &str = "data/history.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub upload_url: Url,
    /// Length of one time unit in milliseconds; every delay in the test is a
    /// multiple of it.
    pub time_unit_ms: u64,
    pub upload_timeout_units: u32,
    pub upload_max_attempts: usize,
    pub asset_dir: PathBuf,
    pub history_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let upload_url = settings
            .get_string("upload.url")
            .or_else(|_| env::var("UPLOAD_URL"))
            .unwrap_or_else(|_| DEFAULT_UPLOAD_URL.to_string());
        let upload_url = Url::parse(&upload_url)
            .with_context(|| format!("Invalid upload URL: {}", upload_url))?;

        let time_unit_ms = settings
            .get_int("timing.unit_ms")
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .or_else(|| env::var("TIME_UNIT_MS").ok().and_then(|v| v.parse().ok()))
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TIME_UNIT_MS);

        let upload_timeout_units = settings
            .get_int("upload.timeout_units")
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_UNITS);

        let upload_max_attempts = settings
            .get_int("upload.max_attempts")
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_UPLOAD_MAX_ATTEMPTS);

        let asset_dir = settings
            .get_string("audio.asset_dir")
            .or_else(|_| env::var("ASSET_DIR"))
            .unwrap_or_else(|_| DEFAULT_ASSET_DIR.to_string())
            .into();

        let history_path = settings
            .get_string("history.path")
            .or_else(|_| env::var("HISTORY_PATH"))
            .unwrap_or_else(|_| DEFAULT_HISTORY_PATH.to_string())
            .into();

        Ok(Config {
            upload_url,
            time_unit_ms,
            upload_timeout_units,
            upload_max_attempts,
            asset_dir,
            history_path,
        })
    }

    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    pub fn upload_timeout(&self) -> Duration {
        self.time_unit() * self.upload_timeout_units
    }

    /// Backoff of 1, 2, 4, ... time units between upload attempts.
    pub fn upload_retry(&self) -> RetryConfig {
        RetryConfig::exponential(self.upload_max_attempts, self.time_unit())
    }

    pub fn audio_timing(&self) -> AudioTiming {
        AudioTiming::from_unit(self.time_unit())
    }

    pub fn test_settings(&self) -> TestSettings {
        TestSettings::from_unit(self.time_unit())
    }
}
