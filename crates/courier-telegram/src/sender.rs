// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram implementation of the rendering sink.
//!
//! Delivers a reply as, in order: the primary message (text or keyboard
//! fallback name, with optional keyboard markup), then each picture by URL,
//! then the optional location.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile};
use tracing::warn;
use url::Url;

use courier_core::error::CourierError;
use courier_core::types::{Reply, SessionId};
use courier_core::RenderSink;

use crate::keyboard;

/// Sends rendered replies through the Telegram Bot API.
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn chat_of(session: &SessionId) -> Result<ChatId, CourierError> {
    session
        .0
        .parse::<i64>()
        .map(ChatId)
        .map_err(|e| CourierError::Render {
            message: format!("invalid chat id `{}`: {e}", session.0),
            source: None,
        })
}

fn send_error(e: teloxide::RequestError) -> CourierError {
    CourierError::Render {
        message: format!("failed to deliver message: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl RenderSink for TelegramSender {
    async fn render(&self, session: &SessionId, reply: &Reply) -> Result<(), CourierError> {
        let chat = chat_of(session)?;

        match (reply.primary_text(), &reply.keyboard) {
            (Some(text), Some(kb)) => {
                let markup = keyboard::to_reply_markup(kb)?;
                self.bot
                    .send_message(chat, text)
                    .reply_markup(markup)
                    .await
                    .map_err(send_error)?;
            }
            (Some(text), None) => {
                self.bot.send_message(chat, text).await.map_err(send_error)?;
            }
            (None, _) => {
                // A keyboard cannot be attached without a message body.
                warn!(
                    session = %session,
                    "reply has no text or fallback name; skipping primary message"
                );
            }
        }

        for picture in &reply.pictures {
            let url = Url::parse(&picture.url).map_err(|e| CourierError::Render {
                message: format!("invalid picture url `{}`: {e}", picture.url),
                source: None,
            })?;
            self.bot
                .send_photo(chat, InputFile::url(url))
                .await
                .map_err(send_error)?;
        }

        if let Some(ref location) = reply.location {
            self.bot
                .send_location(chat, location.latitude, location.longitude)
                .await
                .map_err(send_error)?;
        }

        Ok(())
    }

    async fn notify(&self, session: &SessionId, text: &str) {
        match chat_of(session) {
            Ok(chat) => {
                if let Err(e) = self.bot.send_message(chat, text).await {
                    warn!(session = %session, error = %e, "failed to notify session");
                }
            }
            Err(e) => warn!(session = %session, error = %e, "cannot notify session"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_id_parses_numeric_sessions() {
        assert_eq!(chat_of(&SessionId("42".into())).unwrap(), ChatId(42));
        assert_eq!(
            chat_of(&SessionId("-100123".into())).unwrap(),
            ChatId(-100123)
        );
    }

    #[test]
    fn non_numeric_session_is_a_render_error() {
        let err = chat_of(&SessionId("not-a-chat".into())).unwrap_err();
        assert!(matches!(err, CourierError::Render { .. }));
    }
}
