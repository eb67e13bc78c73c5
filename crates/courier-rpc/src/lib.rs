// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Correlation-based synchronous RPC bridge.
//!
//! [`RpcBridge::call`] publishes a request with a fresh correlation id and
//! suspends the calling task until the reply bearing that id is fed back in
//! through [`RpcBridge::complete`], or the bounded wait elapses. Concurrent
//! in-flight calls are demultiplexed through a pending-call table keyed by
//! correlation id; each entry holds the oneshot sender that resumes exactly
//! one caller.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use courier_core::error::CourierError;
use courier_core::types::{CorrelationId, Envelope, Reply, Request};
use courier_core::{PayloadCodec, RequestTransport};

/// The correlation RPC bridge.
///
/// Cheap to share behind an [`Arc`]; every method takes `&self`.
pub struct RpcBridge {
    transport: Arc<dyn RequestTransport>,
    codec: Arc<dyn PayloadCodec>,
    /// Pending-call table: correlation id -> the waiting caller's result slot.
    /// At most one entry per id; arbitrarily many concurrent entries.
    pending: DashMap<String, oneshot::Sender<Vec<u8>>>,
    reply_timeout: Duration,
}

impl RpcBridge {
    pub fn new(
        transport: Arc<dyn RequestTransport>,
        codec: Arc<dyn PayloadCodec>,
        reply_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            codec,
            pending: DashMap::new(),
            reply_timeout,
        }
    }

    /// Sends one request and blocks the calling task until its reply arrives.
    ///
    /// Fails with [`CourierError::TransportBroken`] when the publish fails or
    /// the reply path is invalidated by a reconnection, and with
    /// [`CourierError::RequestTimeout`] when no matching reply arrives within
    /// the configured bound. The bridge never retries on its own.
    pub async fn call(&self, request: &Request) -> Result<Reply, CourierError> {
        let correlation_id = CorrelationId::generate();
        let body = self.codec.encode_request(request)?;
        let envelope = Envelope {
            correlation_id: correlation_id.clone(),
            reply_to: self.transport.reply_queue(),
            body,
        };

        let (tx, rx) = oneshot::channel();
        self.pending.insert(correlation_id.0.clone(), tx);

        if let Err(e) = self.transport.publish(&envelope).await {
            self.pending.remove(&correlation_id.0);
            return Err(e);
        }
        debug!(
            correlation_id = %correlation_id,
            session_id = request.session_id.as_str(),
            "request published, awaiting reply"
        );

        match tokio::time::timeout(self.reply_timeout, rx).await {
            Ok(Ok(body)) => self.codec.decode_reply(&body),
            Ok(Err(_)) => Err(CourierError::TransportBroken {
                message: "reply path was lost before a reply arrived".into(),
                source: None,
            }),
            Err(_) => {
                self.pending.remove(&correlation_id.0);
                warn!(
                    correlation_id = %correlation_id,
                    session_id = request.session_id.as_str(),
                    timeout_secs = self.reply_timeout.as_secs(),
                    "request timed out"
                );
                Err(CourierError::RequestTimeout {
                    duration: self.reply_timeout,
                })
            }
        }
    }

    /// Routes one inbound reply body to the pending call with a matching
    /// correlation id.
    ///
    /// Returns `false` when no call is waiting under that id; such replies
    /// are stale (their caller timed out or was failed over) and discarding
    /// them is not an error.
    pub fn complete(&self, correlation_id: &str, body: Vec<u8>) -> bool {
        match self.pending.remove(correlation_id) {
            Some((_, tx)) => {
                if tx.send(body).is_err() {
                    debug!(correlation_id, "caller gone before reply delivery");
                    false
                } else {
                    true
                }
            }
            None => {
                debug!(correlation_id, "discarding reply with no matching pending call");
                false
            }
        }
    }

    /// Fails every pending call with a transport error.
    ///
    /// Called before the transport handle is replaced: replies for these
    /// calls could only arrive on the old, now-dead reply queue. Dropping
    /// the senders resumes every waiter, which `call` surfaces as
    /// [`CourierError::TransportBroken`]. Returns how many calls were failed.
    pub fn fail_all_pending(&self) -> usize {
        let orphaned = self.pending.len();
        self.pending.clear();
        if orphaned > 0 {
            warn!(orphaned, "failed all pending calls after transport loss");
        }
        orphaned
    }

    /// Number of calls currently awaiting replies.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_codec::XmlCodec;
    use courier_testkit::RecordingTransport;

    fn bridge_with(
        transport: Arc<RecordingTransport>,
        reply_timeout: Duration,
    ) -> Arc<RpcBridge> {
        Arc::new(RpcBridge::new(
            transport,
            Arc::new(XmlCodec),
            reply_timeout,
        ))
    }

    fn request(text: &str) -> Request {
        Request {
            source: "Telegram".into(),
            session_id: "42".into(),
            text: text.into(),
        }
    }

    fn encoded_reply(text: &str) -> Vec<u8> {
        let reply = Reply {
            text: Some(text.into()),
            ..Reply::default()
        };
        XmlCodec.encode_reply(&reply).unwrap()
    }

    #[tokio::test]
    async fn call_resolves_with_the_matching_reply() {
        let transport = Arc::new(RecordingTransport::new());
        let bridge = bridge_with(transport.clone(), Duration::from_secs(5));

        let responder = {
            let transport = transport.clone();
            let bridge = bridge.clone();
            tokio::spawn(async move {
                let published = transport.wait_for_publishes(1).await;
                let envelope = &published[0];
                assert_eq!(envelope.reply_to, "test-replies");
                assert!(bridge.complete(&envelope.correlation_id.0, encoded_reply("pong")));
            })
        };

        let reply = bridge.call(&request("ping")).await.unwrap();
        assert_eq!(reply.text.as_deref(), Some("pong"));
        assert_eq!(bridge.pending_count(), 0);
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn publish_failure_surfaces_transport_broken_and_clears_the_table() {
        let transport = Arc::new(RecordingTransport::new());
        transport.set_fail_publish(true);
        let bridge = bridge_with(transport, Duration::from_secs(5));

        let err = bridge.call(&request("ping")).await.unwrap_err();
        assert!(matches!(err, CourierError::TransportBroken { .. }));
        assert_eq!(bridge.pending_count(), 0);
    }

    #[tokio::test]
    async fn missing_reply_times_out_instead_of_hanging() {
        let transport = Arc::new(RecordingTransport::new());
        let bridge = bridge_with(transport, Duration::from_millis(50));

        let err = bridge.call(&request("ping")).await.unwrap_err();
        assert!(matches!(err, CourierError::RequestTimeout { .. }));
        assert_eq!(bridge.pending_count(), 0, "timed-out call must not leak");
    }

    #[tokio::test]
    async fn unknown_correlation_id_is_discarded_without_side_effects() {
        let transport = Arc::new(RecordingTransport::new());
        let bridge = bridge_with(transport.clone(), Duration::from_secs(5));

        // A live call is in flight...
        let live = {
            let bridge = bridge.clone();
            tokio::spawn(async move { bridge.call(&request("ping")).await })
        };
        let published = transport.wait_for_publishes(1).await;

        // ...and a stale reply for some other id arrives.
        assert!(!bridge.complete("no-such-id", encoded_reply("stale")));
        assert_eq!(bridge.pending_count(), 1, "live call must be unaffected");

        assert!(bridge.complete(&published[0].correlation_id.0, encoded_reply("pong")));
        let reply = live.await.unwrap().unwrap();
        assert_eq!(reply.text.as_deref(), Some("pong"));
    }

    #[tokio::test]
    async fn late_reply_after_timeout_is_discarded() {
        let transport = Arc::new(RecordingTransport::new());
        let bridge = bridge_with(transport.clone(), Duration::from_millis(50));

        let err = bridge.call(&request("ping")).await.unwrap_err();
        assert!(matches!(err, CourierError::RequestTimeout { .. }));

        let published = transport.published();
        assert!(!bridge.complete(&published[0].correlation_id.0, encoded_reply("late")));
    }

    #[tokio::test]
    async fn transport_failure_fails_every_pending_call() {
        let transport = Arc::new(RecordingTransport::new());
        let bridge = bridge_with(transport.clone(), Duration::from_secs(5));

        let calls: Vec<_> = (0..3)
            .map(|i| {
                let bridge = bridge.clone();
                tokio::spawn(async move { bridge.call(&request(&format!("q{i}"))).await })
            })
            .collect();
        transport.wait_for_publishes(3).await;

        assert_eq!(bridge.fail_all_pending(), 3);
        for call in calls {
            let err = call.await.unwrap().unwrap_err();
            assert!(matches!(err, CourierError::TransportBroken { .. }));
        }
        assert_eq!(bridge.pending_count(), 0, "table must not leak entries");

        // The bridge keeps serving new calls after the failover.
        let responder = {
            let transport = transport.clone();
            let bridge = bridge.clone();
            tokio::spawn(async move {
                let published = transport.wait_for_publishes(4).await;
                let envelope = published.last().unwrap().clone();
                bridge.complete(&envelope.correlation_id.0, encoded_reply("recovered"));
            })
        };
        let reply = bridge.call(&request("again")).await.unwrap();
        assert_eq!(reply.text.as_deref(), Some("recovered"));
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn each_call_gets_a_distinct_correlation_id() {
        let transport = Arc::new(RecordingTransport::new());
        let bridge = bridge_with(transport.clone(), Duration::from_millis(50));

        let calls: Vec<_> = (0..4)
            .map(|_| {
                let bridge = bridge.clone();
                tokio::spawn(async move { bridge.call(&request("x")).await })
            })
            .collect();
        let published = transport.wait_for_publishes(4).await;

        let mut ids: Vec<_> = published
            .iter()
            .map(|e| e.correlation_id.0.clone())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4, "correlation ids must be unique per call");

        for call in calls {
            let _ = call.await.unwrap();
        }
    }
}
