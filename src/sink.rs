use async_trait::async_trait;
use teloxide::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

/// Outbound message channel. Callers log failures and carry on; a failed
/// send never aborts a scheduled cycle.
#[async_trait]
pub trait NotifySink: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), SinkError>;
}

pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl NotifySink for TelegramSink {
    async fn send(&self, text: &str) -> Result<(), SinkError> {
        self.bot.send_message(self.chat_id, text).await?;
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every sent message; used to assert coordinator output.
    #[derive(Default)]
    pub struct RecordingSink {
        pub sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NotifySink for RecordingSink {
        async fn send(&self, text: &str) -> Result<(), SinkError> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }
}
