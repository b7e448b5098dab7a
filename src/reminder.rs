use crate::bins::{determine_bins, BinCategory};
use crate::sink::NotifySink;
use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Monday, 8pm local: the window in which the night-of reminder fires.
const NIGHT_REMINDER_WEEKDAY: u32 = 0;
const NIGHT_REMINDER_HOUR: u32 = 20;

/// True for the single command that silences the night reminder. Exact
/// match only; "done, thanks" is not an acknowledgement.
pub fn is_acknowledgement(text: &str) -> bool {
    text.eq_ignore_ascii_case("done")
}

/// Owns the night-reminder flag and turns bin schedules into channel
/// messages. Shared between the timer jobs and the inbound handler
/// behind an `Arc`.
pub struct ReminderCoordinator {
    sink: Arc<dyn NotifySink>,
    mention: String,
    night_reminder_armed: AtomicBool,
}

impl ReminderCoordinator {
    pub fn new(sink: Arc<dyn NotifySink>, mention: String) -> Self {
        Self {
            sink,
            mention,
            night_reminder_armed: AtomicBool::new(true),
        }
    }

    fn join_bins(bins: &[BinCategory]) -> String {
        bins.iter()
            .map(BinCategory::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    async fn send_or_log(&self, text: &str) {
        if let Err(e) = self.sink.send(text).await {
            error!("Failed to send message: {:?}", e);
        }
    }

    pub async fn send_bin_reminder(&self) {
        self.send_week_reminder(Local::now().date_naive(), false)
            .await;
    }

    pub async fn send_next_week_bin_reminder(&self) {
        self.send_week_reminder(Local::now().date_naive(), true)
            .await;
    }

    /// Startup send: the current week is still interesting on Monday or
    /// Tuesday, afterwards the next collection is next week's.
    pub async fn send_startup_bin_reminder(&self) {
        let today = Local::now().date_naive();
        if today.weekday().num_days_from_monday() > 1 {
            self.send_next_week_bin_reminder().await;
        } else {
            self.send_bin_reminder().await;
        }
    }

    async fn send_week_reminder(&self, today: chrono::NaiveDate, for_next_week: bool) {
        let bins_out = determine_bins(today, for_next_week);
        if bins_out.is_empty() {
            info!("No bins scheduled, skipping reminder");
            return;
        }
        let week_label = if for_next_week { "next" } else { "this" };
        let message = format!(
            "Quick reminder, the following bins are scheduled for {} week: {}",
            week_label,
            Self::join_bins(&bins_out)
        );
        info!("Sending bin reminder for {} week", week_label);
        self.send_or_log(&message).await;
    }

    /// Recurring 30-minute tick. Outside the Monday-evening window, or once
    /// acknowledged, this does nothing; inside it the reminder repeats on
    /// every tick until someone replies "done".
    pub async fn check_bin_reminder(&self) {
        self.check_bin_reminder_at(Local::now().naive_local()).await;
    }

    async fn check_bin_reminder_at(&self, now: NaiveDateTime) {
        let in_window = now.weekday().num_days_from_monday() == NIGHT_REMINDER_WEEKDAY
            && now.hour() >= NIGHT_REMINDER_HOUR;
        if !in_window {
            return;
        }
        if !self.night_reminder_armed.load(Ordering::SeqCst) {
            info!("Night reminder acknowledged, staying quiet");
            return;
        }

        let bins_out = determine_bins(now.date(), false);
        if bins_out.is_empty() {
            info!("No bins scheduled tonight");
            return;
        }
        let message = format!(
            "{}, remember to take out the following bins tonight: {}",
            self.mention,
            Self::join_bins(&bins_out)
        );
        info!("Sending Monday night bin reminder");
        self.send_or_log(&message).await;
    }

    /// Silences the night reminder until the process restarts and confirms
    /// to the channel. Safe against a racing tick: the flag flips before
    /// the confirmation goes out.
    pub async fn on_acknowledgement(&self) {
        self.night_reminder_armed.swap(false, Ordering::SeqCst);
        info!("Night reminder cancelled by acknowledgement");
        self.send_or_log("Great! You've taken out the bins.").await;
    }
}
