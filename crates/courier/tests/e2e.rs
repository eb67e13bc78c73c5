// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the chat-event -> bridge -> rendering pipeline.
//!
//! A recording transport stands in for the broker and a scripted responder
//! task plays the backend: it decodes published requests and completes the
//! bridge with encoded replies, exactly as the reply pump would.

use std::sync::Arc;
use std::time::Duration;

use courier_codec::{BinaryCodec, XmlCodec};
use courier_core::types::{Key, Keyboard, KeyboardKind, Reply, SessionId};
use courier_core::PayloadCodec;
use courier_rpc::RpcBridge;
use courier_telegram::handler::{self, FAILURE_TEXT, START_REQUEST};
use courier_testkit::{RecordingSink, RecordingTransport};

fn welcome_reply() -> Reply {
    Reply {
        text: Some("Welcome".into()),
        name: None,
        keyboard: Some(Keyboard {
            kind: KeyboardKind::Inline,
            row_width: 1,
            keys: vec![Key {
                text: "Help".into(),
                url: None,
                callback_data: Some("help".into()),
            }],
        }),
        pictures: vec![],
        location: None,
    }
}

/// Plays the backend: answers the next published request with `reply`.
fn spawn_responder(
    transport: Arc<RecordingTransport>,
    bridge: Arc<RpcBridge>,
    codec: Arc<dyn PayloadCodec>,
    reply: Reply,
) -> tokio::task::JoinHandle<courier_core::types::Request> {
    tokio::spawn(async move {
        let published = transport.wait_for_publishes(1).await;
        let envelope = &published[0];
        let request = codec.decode_request(&envelope.body).expect("decode request");
        let body = codec.encode_reply(&reply).expect("encode reply");
        assert!(bridge.complete(&envelope.correlation_id.0, body));
        request
    })
}

#[tokio::test]
async fn start_event_round_trips_to_a_rendered_welcome() {
    let transport = Arc::new(RecordingTransport::new());
    let codec: Arc<dyn PayloadCodec> = Arc::new(XmlCodec);
    let bridge = Arc::new(RpcBridge::new(
        transport.clone(),
        codec.clone(),
        Duration::from_secs(5),
    ));
    let sink = RecordingSink::new();

    let responder = spawn_responder(transport, bridge.clone(), codec, welcome_reply());

    let session = SessionId("42".into());
    handler::handle_event(&bridge, &sink, "Telegram", &session, START_REQUEST).await;

    // The backend saw exactly the start-of-session request.
    let request = responder.await.unwrap();
    assert_eq!(request.source, "Telegram");
    assert_eq!(request.session_id, "42");
    assert_eq!(request.text, "start");

    // The rendering sink was called exactly once, with the welcome reply.
    let rendered = sink.rendered();
    assert_eq!(rendered.len(), 1);
    let (rendered_session, reply) = &rendered[0];
    assert_eq!(*rendered_session, session);
    assert_eq!(reply.text.as_deref(), Some("Welcome"));

    let keyboard = reply.keyboard.as_ref().expect("keyboard attached");
    assert_eq!(keyboard.kind, KeyboardKind::Inline);
    assert_eq!(keyboard.row_width, 1);
    assert_eq!(keyboard.keys.len(), 1);
    assert_eq!(keyboard.keys[0].text, "Help");
    assert_eq!(keyboard.keys[0].callback_payload(), "help");

    assert!(sink.notices().is_empty(), "no failure texts expected");
}

#[tokio::test]
async fn the_pipeline_is_codec_agnostic() {
    // The same scenario over the binary encoding; the bridge and handler
    // never notice the difference.
    let transport = Arc::new(RecordingTransport::new());
    let codec: Arc<dyn PayloadCodec> = Arc::new(BinaryCodec);
    let bridge = Arc::new(RpcBridge::new(
        transport.clone(),
        codec.clone(),
        Duration::from_secs(5),
    ));
    let sink = RecordingSink::new();

    let responder = spawn_responder(transport, bridge.clone(), codec, welcome_reply());

    let session = SessionId("42".into());
    handler::handle_event(&bridge, &sink, "Telegram", &session, START_REQUEST).await;

    let request = responder.await.unwrap();
    assert_eq!(request.text, "start");

    let rendered = sink.rendered();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].1.text.as_deref(), Some("Welcome"));
}

#[tokio::test]
async fn a_silent_backend_surfaces_the_generic_failure_text() {
    let transport = Arc::new(RecordingTransport::new());
    let bridge = Arc::new(RpcBridge::new(
        transport,
        Arc::new(XmlCodec),
        Duration::from_millis(50),
    ));
    let sink = RecordingSink::new();

    let session = SessionId("42".into());
    handler::handle_event(&bridge, &sink, "Telegram", &session, "hello").await;

    assert!(sink.rendered().is_empty());
    let notices = sink.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, session);
    assert_eq!(notices[0].1, FAILURE_TEXT);
    assert_eq!(bridge.pending_count(), 0, "timed-out call must not leak");
}

#[tokio::test]
async fn concurrent_sessions_each_get_their_own_reply() {
    let transport = Arc::new(RecordingTransport::new());
    let codec: Arc<dyn PayloadCodec> = Arc::new(XmlCodec);
    let bridge = Arc::new(RpcBridge::new(
        transport.clone(),
        codec.clone(),
        Duration::from_secs(5),
    ));
    let sink = Arc::new(RecordingSink::new());

    // The backend answers both requests in reverse arrival order, naming
    // the session it answers.
    let responder = {
        let transport = transport.clone();
        let bridge = bridge.clone();
        let codec = codec.clone();
        tokio::spawn(async move {
            let published = transport.wait_for_publishes(2).await;
            for envelope in published.iter().rev() {
                let request = codec.decode_request(&envelope.body).expect("decode");
                let reply = Reply {
                    text: Some(format!("for-{}", request.session_id)),
                    ..Reply::default()
                };
                let body = codec.encode_reply(&reply).expect("encode");
                assert!(bridge.complete(&envelope.correlation_id.0, body));
            }
        })
    };

    let events: Vec<_> = ["7", "8"]
        .iter()
        .map(|id| {
            let bridge = bridge.clone();
            let sink = sink.clone();
            let session = SessionId((*id).to_string());
            tokio::spawn(async move {
                handler::handle_event(&bridge, sink.as_ref(), "Telegram", &session, "hi").await;
            })
        })
        .collect();
    for event in events {
        event.await.unwrap();
    }
    responder.await.unwrap();

    let rendered = sink.rendered();
    assert_eq!(rendered.len(), 2);
    for (session, reply) in rendered {
        assert_eq!(reply.text.as_deref(), Some(format!("for-{session}").as_str()));
    }
}
