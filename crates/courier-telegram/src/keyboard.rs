// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyboard rendering into Telegram markup.
//!
//! Keys are laid out `row_width` per row. Inline keyboards map URL keys to
//! URL buttons and everything else to callback buttons; reply keyboards use
//! key texts only.

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};
use url::Url;

use courier_core::error::CourierError;
use courier_core::types::{Key, Keyboard, KeyboardKind};

/// Splits keys into rendering rows of `row_width`.
pub fn key_rows(keys: &[Key], row_width: usize) -> Vec<&[Key]> {
    keys.chunks(row_width.max(1)).collect()
}

/// Renders an inline keyboard.
///
/// A key with a URL becomes a URL button; a key with callback data becomes a
/// callback button; a key with neither becomes a callback button whose
/// payload equals its text.
pub fn inline_markup(keyboard: &Keyboard) -> Result<InlineKeyboardMarkup, CourierError> {
    let mut rows = Vec::new();
    for chunk in key_rows(&keyboard.keys, keyboard.row_width) {
        let mut row = Vec::with_capacity(chunk.len());
        for key in chunk {
            row.push(inline_button(key)?);
        }
        rows.push(row);
    }
    Ok(InlineKeyboardMarkup::new(rows))
}

fn inline_button(key: &Key) -> Result<InlineKeyboardButton, CourierError> {
    match key.url {
        Some(ref url) => {
            let url = Url::parse(url).map_err(|e| CourierError::Render {
                message: format!("invalid button url `{url}`: {e}"),
                source: None,
            })?;
            Ok(InlineKeyboardButton::url(key.text.clone(), url))
        }
        None => Ok(InlineKeyboardButton::callback(
            key.text.clone(),
            key.callback_payload().to_string(),
        )),
    }
}

/// Renders a reply keyboard; only key texts are used.
pub fn reply_markup(keyboard: &Keyboard) -> KeyboardMarkup {
    let rows = key_rows(&keyboard.keys, keyboard.row_width)
        .into_iter()
        .map(|chunk| {
            chunk
                .iter()
                .map(|key| KeyboardButton::new(key.text.clone()))
                .collect::<Vec<_>>()
        });
    KeyboardMarkup::new(rows)
}

/// Renders the markup matching the keyboard's kind.
pub fn to_reply_markup(keyboard: &Keyboard) -> Result<ReplyMarkup, CourierError> {
    match keyboard.kind {
        KeyboardKind::Inline => Ok(ReplyMarkup::InlineKeyboard(inline_markup(keyboard)?)),
        KeyboardKind::Reply => Ok(ReplyMarkup::Keyboard(reply_markup(keyboard))),
    }
}
