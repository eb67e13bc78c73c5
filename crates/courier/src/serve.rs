// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `courier serve` command implementation.
//!
//! Wires the broker transport, the correlation bridge, and the Telegram
//! adapter together, then runs two independent tasks joined only through
//! the bridge's pending-call table: the Telegram dispatcher (chat-event
//! intake) and the reply pump (broker reply consumption + reconnection).

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, error, info, warn};

use courier_broker::BrokerTransport;
use courier_config::model::{BrokerConfig, CourierConfig};
use courier_core::error::CourierError;
use courier_core::RequestTransport;
use courier_rpc::RpcBridge;
use courier_telegram::TelegramAdapter;

/// Runs the `courier serve` command.
///
/// Connects to the broker (with bounded startup retry), builds the bridge
/// and the Telegram adapter, and runs until the dispatcher stops or the
/// reply pump hits an unrecoverable transport failure.
pub async fn run_serve(config: CourierConfig) -> Result<(), CourierError> {
    init_tracing(&config.agent.log_level);

    info!("starting courier serve");

    let transport = Arc::new(connect_with_retry(&config.broker).await?);
    let codec = courier_codec::codec_for(&config.codec);
    let bridge = Arc::new(RpcBridge::new(
        transport.clone() as Arc<dyn RequestTransport>,
        codec,
        Duration::from_secs(config.broker.reply_timeout_secs),
    ));

    let adapter = TelegramAdapter::new(&config.telegram, &config.agent.source, bridge.clone())
        .map_err(|e| {
            error!(error = %e, "failed to initialize Telegram adapter");
            eprintln!(
                "error: Telegram bot token required. Set telegram.bot_token in courier.toml \
                 or the COURIER_TELEGRAM_BOT_TOKEN environment variable."
            );
            e
        })?;

    let mut pump = tokio::spawn(pump_replies(transport, bridge));

    tokio::select! {
        _ = adapter.dispatch() => {
            info!("telegram dispatcher stopped, shutting down");
            Ok(())
        }
        result = &mut pump => match result {
            Ok(Err(e)) => {
                error!(error = %e, "reply pump failed");
                Err(e)
            }
            Ok(Ok(())) => Ok(()),
            Err(e) => Err(CourierError::Internal(format!("reply pump panicked: {e}"))),
        },
    }
}

/// Establishes the initial broker connection, retrying on broker-unavailable
/// up to the configured bound. Any other failure aborts immediately.
async fn connect_with_retry(config: &BrokerConfig) -> Result<BrokerTransport, CourierError> {
    let mut attempt = 1;
    loop {
        match BrokerTransport::connect(config).await {
            Ok(transport) => return Ok(transport),
            Err(e @ CourierError::BrokerUnavailable { .. }) if attempt < config.connect_attempts => {
                warn!(
                    attempt,
                    retry_secs = config.connect_retry_secs,
                    error = %e,
                    "broker unavailable, retrying"
                );
                tokio::time::sleep(Duration::from_secs(config.connect_retry_secs)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Consumes the reply queue and routes every delivery to the bridge.
///
/// When the consume stream errors or ends, every pending call is failed
/// (their replies could only arrive on the dead queue) and the transport
/// handle is replaced. A failed reconnection propagates and terminates
/// the process.
async fn pump_replies(
    transport: Arc<BrokerTransport>,
    bridge: Arc<RpcBridge>,
) -> Result<(), CourierError> {
    loop {
        let mut consumer = transport.take_consumer().await?;

        while let Some(delivery) = consumer.next().await {
            match delivery {
                Ok(delivery) => match delivery.properties.correlation_id() {
                    Some(id) => {
                        bridge.complete(id.as_str(), delivery.data);
                    }
                    None => debug!("dropping reply without a correlation id"),
                },
                Err(e) => {
                    warn!(error = %e, "reply consumer error");
                    break;
                }
            }
        }

        let orphaned = bridge.fail_all_pending();
        warn!(orphaned, "reply stream lost, reconnecting to broker");
        transport.reconnect().await?;
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("courier={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
