// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording test doubles for the Courier trait seams.
//!
//! [`RecordingTransport`] stands in for the broker and captures published
//! envelopes; [`RecordingSink`] stands in for the chat platform and captures
//! rendered replies and notifications. Both can be switched into failure
//! mode to exercise error paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use courier_core::error::CourierError;
use courier_core::types::{Envelope, Reply, SessionId};
use courier_core::{RenderSink, RequestTransport};

/// In-memory transport double that records every published envelope.
#[derive(Default)]
pub struct RecordingTransport {
    published: Mutex<Vec<Envelope>>,
    fail_publish: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent publishes fail with a transport error.
    pub fn set_fail_publish(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of everything published so far.
    pub fn published(&self) -> Vec<Envelope> {
        self.published.lock().expect("published lock poisoned").clone()
    }

    /// Polls until at least `count` envelopes have been published.
    pub async fn wait_for_publishes(&self, count: usize) -> Vec<Envelope> {
        loop {
            {
                let published = self.published.lock().expect("published lock poisoned");
                if published.len() >= count {
                    return published.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl RequestTransport for RecordingTransport {
    fn reply_queue(&self) -> String {
        "test-replies".to_string()
    }

    async fn publish(&self, envelope: &Envelope) -> Result<(), CourierError> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(CourierError::TransportBroken {
                message: "recording transport switched to failure mode".into(),
                source: None,
            });
        }
        self.published
            .lock()
            .expect("published lock poisoned")
            .push(envelope.clone());
        Ok(())
    }
}

/// In-memory rendering sink double that records replies and notifications.
#[derive(Default)]
pub struct RecordingSink {
    rendered: Mutex<Vec<(SessionId, Reply)>>,
    notices: Mutex<Vec<(SessionId, String)>>,
    fail_render: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent renders fail with a render error.
    pub fn set_fail_render(&self, fail: bool) {
        self.fail_render.store(fail, Ordering::SeqCst);
    }

    pub fn rendered(&self) -> Vec<(SessionId, Reply)> {
        self.rendered.lock().expect("rendered lock poisoned").clone()
    }

    pub fn notices(&self) -> Vec<(SessionId, String)> {
        self.notices.lock().expect("notices lock poisoned").clone()
    }
}

#[async_trait]
impl RenderSink for RecordingSink {
    async fn render(&self, session: &SessionId, reply: &Reply) -> Result<(), CourierError> {
        if self.fail_render.load(Ordering::SeqCst) {
            return Err(CourierError::Render {
                message: "recording sink switched to failure mode".into(),
                source: None,
            });
        }
        self.rendered
            .lock()
            .expect("rendered lock poisoned")
            .push((session.clone(), reply.clone()));
        Ok(())
    }

    async fn notify(&self, session: &SessionId, text: &str) {
        self.notices
            .lock()
            .expect("notices lock poisoned")
            .push((session.clone(), text.to_string()));
    }
}
