use crate::config::Config;
use crate::sink::NotifySink;
use anyhow::Result;
use chrono::{Local, TimeZone};
use log::{error, info, warn};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

const WEATHERBIT_URL: &str = "https://api.weatherbit.io/v2.0/forecast/daily";

/// Sent to the channel whenever the forecast cannot be retrieved or read.
pub const FORECAST_FALLBACK: &str = "Unable to retrieve weather forecast.";

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Provider returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Failed to decode forecast response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Provider returned no forecast days")]
    EmptyForecast,
    #[error("Invalid sun timestamp: {0}")]
    InvalidTimestamp(i64),
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    data: Vec<DailyForecast>,
}

#[derive(Debug, Deserialize)]
pub struct DailyForecast {
    pub weather: WeatherDescription,
    pub high_temp: f64,
    pub low_temp: f64,
    pub uv: f64,
    pub sunrise_ts: i64,
    pub sunset_ts: i64,
}

#[derive(Debug, Deserialize)]
pub struct WeatherDescription {
    pub description: String,
}

/// Pulls the first forecast day out of a Weatherbit response body. A body
/// missing any expected field (uv included) is a decode error, not a panic.
pub fn decode_forecast(body: &str) -> Result<DailyForecast, WeatherError> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    response
        .data
        .into_iter()
        .next()
        .ok_or(WeatherError::EmptyForecast)
}

fn local_hhmm(ts: i64) -> Result<String, WeatherError> {
    let time = Local
        .timestamp_opt(ts, 0)
        .single()
        .ok_or(WeatherError::InvalidTimestamp(ts))?;
    Ok(time.format("%H:%M").to_string())
}

pub fn format_forecast(day: &DailyForecast) -> Result<String, WeatherError> {
    Ok(format!(
        "{}\nHigh: {}°C\nLow: {}°C\nUV Index: {}\nSunrise: {}\nSunset: {}",
        day.weather.description,
        day.high_temp,
        day.low_temp,
        day.uv,
        local_hhmm(day.sunrise_ts)?,
        local_hhmm(day.sunset_ts)?,
    ))
}

/// Collapses a forecast result into the channel text. The only place a
/// failure cause is erased in favor of `FORECAST_FALLBACK`.
pub fn render_forecast(result: Result<DailyForecast, WeatherError>) -> String {
    match result.and_then(|day| format_forecast(&day)) {
        Ok(text) => text,
        Err(e) => {
            warn!("Weather forecast unavailable: {}", e);
            FORECAST_FALLBACK.to_string()
        }
    }
}

/// Daily weather job: fetch, format, send. All provider failures collapse
/// to `FORECAST_FALLBACK` at the message boundary.
pub struct WeatherDigest {
    client: reqwest::Client,
    hometown: String,
    api_key: String,
    sink: Arc<dyn NotifySink>,
}

impl WeatherDigest {
    pub fn new(config: &Config, sink: Arc<dyn NotifySink>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.weather_timeout)
            .build()?;
        Ok(Self {
            client,
            hometown: config.hometown.clone(),
            api_key: config.weather_api_key.clone(),
            sink,
        })
    }

    pub async fn fetch_forecast(&self) -> Result<DailyForecast, WeatherError> {
        let params = [
            ("city", self.hometown.as_str()),
            ("key", self.api_key.as_str()),
            ("days", "1"),
        ];
        let resp = self
            .client
            .get(WEATHERBIT_URL)
            .query(&params)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(WeatherError::Status(resp.status()));
        }
        let body = resp.text().await?;
        decode_forecast(&body)
    }

    pub async fn send_weather_report(&self) {
        let forecast = render_forecast(self.fetch_forecast().await);
        info!("Sending weather report");
        if let Err(e) = self
            .sink
            .send(&format!("Daily Weather: {}", forecast))
            .await
        {
            error!("Failed to send weather report: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_BODY: &str = r#"{
        "data": [{
            "weather": {"description": "Scattered clouds"},
            "high_temp": 18.5,
            "low_temp": 7.0,
            "uv": 4.2,
            "sunrise_ts": 1718224200,
            "sunset_ts": 1718260500
        }]
    }"#;

    #[test]
    fn test_decode_full_response() {
        let day = decode_forecast(FULL_BODY).unwrap();
        assert_eq!(day.weather.description, "Scattered clouds");
        assert_eq!(day.high_temp, 18.5);
        assert_eq!(day.uv, 4.2);
    }

    const MISSING_UV_BODY: &str = r#"{
        "data": [{
            "weather": {"description": "Clear sky"},
            "high_temp": 20.0,
            "low_temp": 9.0,
            "sunrise_ts": 1718224200,
            "sunset_ts": 1718260500
        }]
    }"#;

    #[test]
    fn test_decode_missing_uv_is_error() {
        assert!(matches!(
            decode_forecast(MISSING_UV_BODY),
            Err(WeatherError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_empty_data_is_error() {
        let body = r#"{"data": []}"#;
        assert!(matches!(
            decode_forecast(body),
            Err(WeatherError::EmptyForecast)
        ));
    }

    #[test]
    fn test_decode_garbage_is_error() {
        assert!(matches!(
            decode_forecast("not json"),
            Err(WeatherError::Decode(_))
        ));
    }

    #[test]
    fn test_render_passes_good_forecast_through() {
        let day = decode_forecast(FULL_BODY).unwrap();
        let text = render_forecast(Ok(day));
        assert!(text.starts_with("Scattered clouds\n"));
        assert_ne!(text, FORECAST_FALLBACK);
    }

    #[test]
    fn test_missing_uv_renders_fallback() {
        let rendered = render_forecast(decode_forecast(MISSING_UV_BODY));
        assert_eq!(rendered, FORECAST_FALLBACK);
    }

    #[test]
    fn test_render_maps_any_failure_to_fallback() {
        assert_eq!(
            render_forecast(Err(WeatherError::EmptyForecast)),
            FORECAST_FALLBACK
        );
        assert_eq!(
            render_forecast(Err(WeatherError::InvalidTimestamp(-1))),
            FORECAST_FALLBACK
        );
    }

    #[test]
    fn test_format_forecast_lines() {
        let day = decode_forecast(FULL_BODY).unwrap();
        let text = format_forecast(&day).unwrap();
        assert!(text.starts_with("Scattered clouds\n"));
        assert!(text.contains("High: 18.5°C"));
        assert!(text.contains("Low: 7°C"));
        assert!(text.contains("UV Index: 4.2"));
        assert!(text.contains("Sunrise: "));
        assert!(text.contains("Sunset: "));
    }
}
