use crate::reminder::{is_acknowledgement, ReminderCoordinator};
use std::sync::Arc;
use teloxide::prelude::*;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Runs the inbound dispatcher. The only command the bot reacts to is a
/// bare "done", which silences the Monday-night reminder.
pub async fn run_bot(bot: Bot, coordinator: Arc<ReminderCoordinator>) {
    let handler = Update::filter_message().endpoint(message_handler);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![coordinator])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn message_handler(msg: Message, coordinator: Arc<ReminderCoordinator>) -> HandlerResult {
    if let Some(text) = msg.text() {
        if is_acknowledgement(text) {
            coordinator.on_acknowledgement().await;
        }
    }
    Ok(())
}
