// SPDX-License-Identifier: MIT

//! Incoming conversation input and its normalization to a single prompt
//!
//! Hosts hand chat adapters whatever their chain produced: a bare string,
//! a message object, or a list of either. [`Message`] captures those shapes
//! and [`Message::normalize`] turns any of them into the prompt text sent to
//! the model. No history structure survives normalization.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One turn of conversation input
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum Message {
    /// Plain prompt text
    Text(String),
    /// Object carrying a text-bearing field (`content`, `text` or `value`)
    Record(Map<String, Value>),
    /// Sequence of messages, joined line by line
    List(Vec<Message>),
    /// Numbers, booleans and null
    Scalar(Value),
}

impl Message {
    /// Collapse the message into a single prompt string.
    ///
    /// Lists map each element (preferring `content`, then `text`) and join
    /// with newlines. Strings pass through verbatim. Objects use their
    /// `value` field when present. Anything else is coerced to text.
    pub fn normalize(&self) -> String {
        match self {
            Message::List(items) => items
                .iter()
                .map(Message::list_item_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Message::Text(text) => text.clone(),
            Message::Record(fields) => match fields.get("value") {
                Some(value) => coerce(value),
                None => Value::Object(fields.clone()).to_string(),
            },
            Message::Scalar(value) => coerce(value),
        }
    }

    fn list_item_text(&self) -> String {
        match self {
            Message::Record(fields) => text_field(fields, "content")
                .or_else(|| text_field(fields, "text"))
                .map(coerce)
                .unwrap_or_else(|| Value::Object(fields.clone()).to_string()),
            other => other.coerce_to_string(),
        }
    }

    fn coerce_to_string(&self) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::List(_) => self.normalize(),
            Message::Record(fields) => Value::Object(fields.clone()).to_string(),
            Message::Scalar(value) => coerce(value),
        }
    }
}

/// A field counts as text-bearing when present, non-null and not an empty string.
fn text_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|value| match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) => Message::from(value.clone()).normalize(),
        other => other.to_string(),
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Message::Text(text),
            Value::Object(fields) => Message::Record(fields),
            Value::Array(items) => Message::List(items.into_iter().map(Message::from).collect()),
            scalar => Message::Scalar(scalar),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<Vec<Message>> for Message {
    fn from(items: Vec<Message>) -> Self {
        Message::List(items)
    }
}
