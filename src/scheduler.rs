use crate::reminder::ReminderCoordinator;
use crate::weather::WeatherDigest;
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime};
use log::{debug, info};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

// Coarse poll for the Monday-night window.
const BIN_CHECK_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Spawns a named recurring job. The callback is awaited inside the
/// interval loop, so two fires of the same job never overlap.
fn spawn_recurring<F, Fut>(name: &'static str, period: Duration, job: F)
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            debug!("Job '{}' fired", name);
            job().await;
        }
    });
}

/// Spawns a named job fired once a day at `at`, local wall clock. The
/// delay is re-computed after every fire, so the anchor holds across DST
/// transitions instead of drifting on a fixed 24-hour period.
fn spawn_daily_at<F, Fut>(name: &'static str, at: NaiveTime, job: F)
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    tokio::spawn(async move {
        loop {
            let delay = duration_until_next(at);
            info!(
                "Job '{}' next fire in {} minutes",
                name,
                delay.as_secs() / 60
            );
            tokio::time::sleep(delay).await;
            debug!("Job '{}' fired", name);
            job().await;
        }
    });
}

fn duration_until_next(at: NaiveTime) -> Duration {
    duration_until_next_from(Local::now().naive_local(), at)
}

fn duration_until_next_from(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let mut next = now.date().and_time(at);
    if next <= now {
        next += ChronoDuration::days(1);
    }
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

/// Wires up the timer lines: the one-off startup sends, the 30-minute
/// night-reminder poll, and the daily weather report.
pub async fn run_scheduler(
    coordinator: Arc<ReminderCoordinator>,
    weather: Arc<WeatherDigest>,
    weather_report_time: NaiveTime,
) {
    info!("Sending startup weather report and bin reminder");
    weather.send_weather_report().await;
    coordinator.send_startup_bin_reminder().await;

    let check_coordinator = coordinator.clone();
    spawn_recurring("bin-night-check", BIN_CHECK_INTERVAL, move || {
        let coordinator = check_coordinator.clone();
        async move { coordinator.check_bin_reminder().await }
    });

    spawn_daily_at("daily-weather", weather_report_time, move || {
        let weather = weather.clone();
        async move { weather.send_weather_report().await }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at_six() -> NaiveTime {
        NaiveTime::from_hms_opt(6, 0, 0).unwrap()
    }

    fn clock(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_next_fire_later_today() {
        let delay = duration_until_next_from(clock(5, 0), at_six());
        assert_eq!(delay, Duration::from_secs(60 * 60));
    }

    #[test]
    fn test_next_fire_rolls_to_tomorrow() {
        let delay = duration_until_next_from(clock(7, 30), at_six());
        assert_eq!(delay, Duration::from_secs((24 - 1) * 60 * 60 - 30 * 60));
    }

    #[test]
    fn test_fire_at_anchor_waits_a_full_day() {
        // Re-computed right at the anchor (just after a fire), the next
        // occurrence is tomorrow's, not an immediate re-fire.
        let delay = duration_until_next_from(clock(6, 0), at_six());
        assert_eq!(delay, Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn test_duration_until_next_is_bounded() {
        let delay = duration_until_next(at_six());
        assert!(delay <= Duration::from_secs(24 * 60 * 60));
    }
}
