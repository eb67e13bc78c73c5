// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tree-structured XML payload codec.
//!
//! Requests are `<message xmlns="schemas/message.xsd">` documents with
//! `source`, `userid`, and `text` children. Replies carry `text`, `name`,
//! `keyboard`, `picture`, and `location` elements; the reply root element
//! name is not inspected.

use std::str::FromStr;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use courier_core::error::CourierError;
use courier_core::types::{Key, Keyboard, KeyboardKind, Location, Picture, Reply, Request};
use courier_core::PayloadCodec;

/// Default namespace of request documents.
const MESSAGE_NS: &str = "schemas/message.xsd";

/// XML markup codec.
pub struct XmlCodec;

impl PayloadCodec for XmlCodec {
    fn encode_request(&self, request: &Request) -> Result<Vec<u8>, CourierError> {
        let mut xml = String::with_capacity(128);
        xml.push_str(&format!(r#"<message xmlns="{MESSAGE_NS}">"#));
        xml.push_str(&text_element("source", &request.source));
        xml.push_str(&text_element("userid", &request.session_id));
        xml.push_str(&text_element("text", &request.text));
        xml.push_str("</message>");
        Ok(xml.into_bytes())
    }

    fn decode_request(&self, body: &[u8]) -> Result<Request, CourierError> {
        let mut reader = Reader::from_reader(body);

        let mut source: Option<String> = None;
        let mut session_id: Option<String> = None;
        let mut text: Option<String> = None;
        let mut path: Vec<String> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf).map_err(xml_error)? {
                Event::Start(e) => {
                    let name = local_name(&e);
                    if path.is_empty() && name != "message" {
                        return Err(codec_error(format!(
                            "expected <message> root, found <{name}>"
                        )));
                    }
                    path.push(name);
                }
                Event::Text(e) => {
                    let value = e.unescape().map_err(xml_error)?.trim().to_string();
                    if !value.is_empty() {
                        let parts: Vec<&str> = path.iter().map(String::as_str).collect();
                        match parts.as_slice() {
                            ["message", "source"] => source = Some(value),
                            ["message", "userid"] => session_id = Some(value),
                            ["message", "text"] => text = Some(value),
                            _ => {}
                        }
                    }
                }
                Event::End(_) => {
                    path.pop();
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Request {
            source: source.ok_or_else(|| codec_error("message is missing <source>"))?,
            session_id: session_id.ok_or_else(|| codec_error("message is missing <userid>"))?,
            text: text.ok_or_else(|| codec_error("message is missing <text>"))?,
        })
    }

    fn encode_reply(&self, reply: &Reply) -> Result<Vec<u8>, CourierError> {
        let mut xml = String::with_capacity(256);
        xml.push_str("<response>");
        if let Some(ref text) = reply.text {
            xml.push_str(&text_element("text", text));
        }
        if let Some(ref name) = reply.name {
            xml.push_str(&text_element("name", name));
        }
        if let Some(ref keyboard) = reply.keyboard {
            xml.push_str(&format!(
                r#"<keyboard type="{}" row_width="{}">"#,
                keyboard.kind, keyboard.row_width
            ));
            for key in &keyboard.keys {
                xml.push_str("<key>");
                xml.push_str(&text_element("text", &key.text));
                if let Some(ref url) = key.url {
                    xml.push_str(&text_element("url", url));
                }
                if let Some(ref callback_data) = key.callback_data {
                    xml.push_str(&text_element("callback_data", callback_data));
                }
                xml.push_str("</key>");
            }
            xml.push_str("</keyboard>");
        }
        for picture in &reply.pictures {
            xml.push_str("<picture>");
            xml.push_str(&text_element("url", &picture.url));
            xml.push_str("</picture>");
        }
        if let Some(ref location) = reply.location {
            xml.push_str(&format!(
                "<location><latitude>{}</latitude><longitude>{}</longitude></location>",
                location.latitude, location.longitude
            ));
        }
        xml.push_str("</response>");
        Ok(xml.into_bytes())
    }

    fn decode_reply(&self, body: &[u8]) -> Result<Reply, CourierError> {
        let mut reader = Reader::from_reader(body);

        let mut reply = Reply::default();
        let mut keyboard: Option<Keyboard> = None;
        let mut key: Option<Key> = None;
        let mut picture: Option<Picture> = None;
        let mut latitude: Option<f64> = None;
        let mut longitude: Option<f64> = None;
        let mut saw_root = false;
        let mut path: Vec<String> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf).map_err(xml_error)? {
                Event::Start(e) => {
                    let name = local_name(&e);
                    saw_root = true;
                    match (path.len(), name.as_str()) {
                        (1, "keyboard") => keyboard = Some(keyboard_from_attributes(&e)?),
                        (2, "key") if path[1] == "keyboard" => key = Some(Key::default()),
                        (1, "picture") => picture = Some(Picture { url: String::new() }),
                        _ => {}
                    }
                    path.push(name);
                }
                Event::Empty(e) => {
                    // Self-closing elements: only an empty keyboard carries state.
                    let name = local_name(&e);
                    if path.len() == 1 && name == "keyboard" {
                        reply.keyboard = Some(keyboard_from_attributes(&e)?);
                    }
                }
                Event::Text(e) => {
                    let value = e.unescape().map_err(xml_error)?.trim().to_string();
                    if !value.is_empty() {
                        let parts: Vec<&str> = path.iter().map(String::as_str).collect();
                        match parts.as_slice() {
                            [_, "text"] => reply.text = Some(value),
                            [_, "name"] => reply.name = Some(value),
                            [_, "keyboard", "key", "text"] => {
                                if let Some(k) = key.as_mut() {
                                    k.text = value;
                                }
                            }
                            [_, "keyboard", "key", "url"] => {
                                if let Some(k) = key.as_mut() {
                                    k.url = Some(value);
                                }
                            }
                            [_, "keyboard", "key", "callback_data"] => {
                                if let Some(k) = key.as_mut() {
                                    k.callback_data = Some(value);
                                }
                            }
                            [_, "picture", "url"] => {
                                if let Some(p) = picture.as_mut() {
                                    p.url = value;
                                }
                            }
                            [_, "location", "latitude"] => {
                                latitude = Some(parse_coordinate("latitude", &value)?);
                            }
                            [_, "location", "longitude"] => {
                                longitude = Some(parse_coordinate("longitude", &value)?);
                            }
                            _ => {}
                        }
                    }
                }
                Event::End(_) => {
                    match (path.len(), path.last().map(String::as_str)) {
                        (3, Some("key")) => {
                            if let (Some(kb), Some(k)) = (keyboard.as_mut(), key.take()) {
                                kb.keys.push(k);
                            }
                        }
                        (2, Some("keyboard")) => reply.keyboard = keyboard.take(),
                        (2, Some("picture")) => {
                            if let Some(p) = picture.take() {
                                reply.pictures.push(p);
                            }
                        }
                        (2, Some("location")) => {
                            reply.location = match (latitude.take(), longitude.take()) {
                                (Some(latitude), Some(longitude)) => Some(Location {
                                    latitude,
                                    longitude,
                                }),
                                _ => {
                                    return Err(codec_error(
                                        "location requires latitude and longitude",
                                    ));
                                }
                            };
                        }
                        _ => {}
                    }
                    path.pop();
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(codec_error("reply body contains no XML document"));
        }
        Ok(reply)
    }
}

/// Renders one escaped text element.
fn text_element(name: &str, value: &str) -> String {
    format!("<{name}>{}</{name}>", escape(value))
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Reads the `type` and `row_width` attributes of a keyboard element.
fn keyboard_from_attributes(e: &BytesStart<'_>) -> Result<Keyboard, CourierError> {
    let kind = match e.try_get_attribute("type").map_err(xml_error)? {
        Some(attr) => {
            let value = attr.unescape_value().map_err(xml_error)?;
            KeyboardKind::from_str(&value)
                .map_err(|_| codec_error(format!("unknown keyboard type `{value}`")))?
        }
        None => KeyboardKind::default(),
    };
    let row_width = match e.try_get_attribute("row_width").map_err(xml_error)? {
        Some(attr) => {
            let value = attr.unescape_value().map_err(xml_error)?;
            let width: usize = value
                .parse()
                .map_err(|_| codec_error(format!("invalid row_width `{value}`")))?;
            if width == 0 {
                return Err(codec_error("row_width must be at least 1"));
            }
            width
        }
        None => 1,
    };
    Ok(Keyboard {
        kind,
        row_width,
        keys: Vec::new(),
    })
}

fn parse_coordinate(field: &str, value: &str) -> Result<f64, CourierError> {
    value
        .parse()
        .map_err(|_| codec_error(format!("invalid {field} `{value}`")))
}

fn codec_error(message: impl Into<String>) -> CourierError {
    CourierError::Codec {
        message: message.into(),
        source: None,
    }
}

fn xml_error(e: impl std::error::Error + Send + Sync + 'static) -> CourierError {
    CourierError::Codec {
        message: "malformed XML".to_string(),
        source: Some(Box::new(e)),
    }
}
