// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payload codecs for the Courier adapter.
//!
//! Two functionally equivalent encodings of the request/reply wire bodies
//! exist behind the [`PayloadCodec`] trait: a tree-structured XML markup
//! ([`XmlCodec`]) and a compact binary schema wrapped in a UUID + timestamp
//! envelope ([`BinaryCodec`]). The bridge and transport never depend on
//! which one is active.

pub mod binary;
pub mod xml;

use std::sync::Arc;

use courier_config::model::{CodecConfig, Encoding};
use courier_core::PayloadCodec;

pub use binary::BinaryCodec;
pub use xml::XmlCodec;

/// Builds the payload codec selected by configuration.
pub fn codec_for(config: &CodecConfig) -> Arc<dyn PayloadCodec> {
    match config.encoding {
        Encoding::Xml => Arc::new(XmlCodec),
        Encoding::Binary => Arc::new(BinaryCodec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::{Key, Keyboard, KeyboardKind, Location, Picture, Reply, Request};

    fn sample_request() -> Request {
        Request {
            source: "Telegram".into(),
            session_id: "42".into(),
            text: "weather <today> & tomorrow".into(),
        }
    }

    fn sample_reply() -> Reply {
        Reply {
            text: Some("Forecast".into()),
            name: None,
            keyboard: Some(Keyboard {
                kind: KeyboardKind::Inline,
                row_width: 2,
                keys: vec![
                    Key {
                        text: "Refresh".into(),
                        url: None,
                        callback_data: Some("refresh".into()),
                    },
                    Key {
                        text: "Site".into(),
                        url: Some("https://example.com/weather".into()),
                        callback_data: None,
                    },
                ],
            }),
            pictures: vec![Picture {
                url: "https://example.com/map.png".into(),
            }],
            location: Some(Location {
                latitude: 59.93,
                longitude: 30.31,
            }),
        }
    }

    #[test]
    fn both_encodings_round_trip_the_same_request() {
        let request = sample_request();
        for codec in [
            codec_for(&CodecConfig { encoding: Encoding::Xml }),
            codec_for(&CodecConfig { encoding: Encoding::Binary }),
        ] {
            let body = codec.encode_request(&request).unwrap();
            let decoded = codec.decode_request(&body).unwrap();
            assert_eq!(decoded, request);
        }
    }

    #[test]
    fn both_encodings_round_trip_the_same_reply() {
        let reply = sample_reply();
        for codec in [
            codec_for(&CodecConfig { encoding: Encoding::Xml }),
            codec_for(&CodecConfig { encoding: Encoding::Binary }),
        ] {
            let body = codec.encode_reply(&reply).unwrap();
            let decoded = codec.decode_reply(&body).unwrap();
            assert_eq!(decoded, reply);
        }
    }

    #[test]
    fn codecs_reject_each_others_bodies() {
        let request = sample_request();
        let xml = XmlCodec.encode_request(&request).unwrap();
        let binary = BinaryCodec.encode_request(&request).unwrap();

        assert!(BinaryCodec.decode_request(&xml).is_err());
        assert!(XmlCodec.decode_request(&binary).is_err());
    }
}
