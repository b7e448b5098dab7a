mod bins;
mod bot_handler;
mod config;
mod reminder;
mod scheduler;
mod sink;
mod weather;

use bot_handler::run_bot;
use config::Config;
use dotenvy::dotenv;
use log::info;
use reminder::ReminderCoordinator;
use scheduler::run_scheduler;
use sink::TelegramSink;
use std::error::Error;
use std::sync::Arc;
use teloxide::prelude::*;
use weather::WeatherDigest;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    info!("Starting Bin Night Bot...");

    let config = Config::from_env()?;
    let bot = Bot::from_env();

    let sink = Arc::new(TelegramSink::new(bot.clone(), ChatId(config.chat_id)));
    let coordinator = Arc::new(ReminderCoordinator::new(
        sink.clone(),
        config.reminder_mention.clone(),
    ));
    let weather = Arc::new(WeatherDigest::new(&config, sink)?);

    run_scheduler(coordinator.clone(), weather, config.weather_report_time).await;

    // Blocks until shutdown; inbound "done" messages land here.
    run_bot(bot, coordinator).await;

    Ok(())
}
