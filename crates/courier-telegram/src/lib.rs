// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram chat adapter for the Courier bridge.
//!
//! Connects to Telegram via teloxide long polling, turns text messages,
//! `/start` commands, and inline-button callbacks into backend requests,
//! calls the correlation bridge synchronously, and renders the reply back
//! into Telegram primitives (text, keyboards, photos, locations).
//!
//! Handlers for different chats run concurrently, so one slow backend call
//! never stalls unrelated chat sessions.

pub mod handler;
pub mod keyboard;
pub mod sender;

use std::sync::Arc;

use teloxide::dptree;
use teloxide::prelude::*;
use tracing::{debug, info, warn};

use courier_config::model::TelegramConfig;
use courier_core::error::CourierError;
use courier_core::types::SessionId;
use courier_rpc::RpcBridge;

use crate::sender::TelegramSender;

/// Telegram chat adapter.
pub struct TelegramAdapter {
    bot: Bot,
    source: Arc<str>,
    bridge: Arc<RpcBridge>,
}

impl TelegramAdapter {
    /// Creates a new Telegram adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(
        config: &TelegramConfig,
        source: &str,
        bridge: Arc<RpcBridge>,
    ) -> Result<Self, CourierError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            CourierError::Config("telegram.bot_token is required to run the adapter".into())
        })?;

        if token.is_empty() {
            return Err(CourierError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self {
            bot: Bot::new(token),
            source: source.into(),
            bridge,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Runs the long-polling dispatcher until the process is stopped.
    pub async fn dispatch(self) {
        let sink = Arc::new(TelegramSender::new(self.bot.clone()));
        let bridge = self.bridge;
        let source = self.source;

        info!("starting Telegram long polling");

        let message_sink = sink.clone();
        let message_bridge = bridge.clone();
        let message_source = source.clone();
        let message_branch = Update::filter_message().endpoint(move |msg: Message| {
            let sink = message_sink.clone();
            let bridge = message_bridge.clone();
            let source = message_source.clone();
            async move {
                let session = handler::session_of(&msg);
                let Some(text) = msg.text() else {
                    debug!(session = %session, "ignoring non-text message");
                    return respond(());
                };
                match handler::request_text(text) {
                    Some(request_text) => {
                        handler::handle_event(&bridge, sink.as_ref(), &source, &session, &request_text)
                            .await;
                    }
                    None => debug!(session = %session, "ignoring unsupported command"),
                }
                respond(())
            }
        });

        let callback_branch =
            Update::filter_callback_query().endpoint(move |bot: Bot, query: CallbackQuery| {
                let sink = sink.clone();
                let bridge = bridge.clone();
                let source = source.clone();
                async move {
                    // Telegram requires every callback query to be answered.
                    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                        warn!(error = %e, "failed to answer callback query");
                    }

                    let chat = query.message.as_ref().map(|m| m.chat().id);
                    let (Some(data), Some(chat)) = (query.data.clone(), chat) else {
                        debug!("ignoring callback query without data or originating chat");
                        return respond(());
                    };
                    let session = SessionId(chat.0.to_string());
                    handler::handle_event(&bridge, sink.as_ref(), &source, &session, &data).await;
                    respond(())
                }
            });

        Dispatcher::builder(
            self.bot,
            dptree::entry()
                .branch(message_branch)
                .branch(callback_branch),
        )
        .default_handler(|_| async {}) // Silently ignore other update kinds
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    }
}
