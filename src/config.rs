use anyhow::{Context, Result};
use chrono::NaiveTime;
use std::env;
use std::time::Duration;

const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_WEATHER_REPORT_TIME: &str = "06:00";
const DEFAULT_REMINDER_MENTION: &str = "@all";

/// Startup configuration, read once from the environment. The bot token is
/// consumed separately by `Bot::from_env` (TELOXIDE_TOKEN).
#[derive(Debug, Clone)]
pub struct Config {
    pub hometown: String,
    pub weather_api_key: String,
    pub chat_id: i64,
    pub reminder_mention: String,
    pub weather_report_time: NaiveTime,
    pub weather_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let hometown =
            env::var("WEATHERBIT_HOMETOWN").context("WEATHERBIT_HOMETOWN must be set")?;
        let weather_api_key =
            env::var("WEATHERBIT_API_KEY").context("WEATHERBIT_API_KEY must be set")?;
        let chat_id = env::var("CHAT_ID")
            .context("CHAT_ID must be set")?
            .parse::<i64>()
            .context("CHAT_ID must be a numeric chat identifier")?;

        let reminder_mention =
            env::var("REMINDER_MENTION").unwrap_or_else(|_| DEFAULT_REMINDER_MENTION.to_string());

        let report_time_raw = env::var("WEATHER_REPORT_TIME")
            .unwrap_or_else(|_| DEFAULT_WEATHER_REPORT_TIME.to_string());
        let weather_report_time = NaiveTime::parse_from_str(&report_time_raw, "%H:%M")
            .with_context(|| format!("WEATHER_REPORT_TIME '{}' is not HH:MM", report_time_raw))?;

        let timeout_secs = match env::var("WEATHER_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("WEATHER_TIMEOUT_SECS must be a number of seconds")?,
            Err(_) => DEFAULT_WEATHER_TIMEOUT_SECS,
        };

        Ok(Config {
            hometown,
            weather_api_key,
            chat_id,
            reminder_mention,
            weather_report_time,
            weather_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
