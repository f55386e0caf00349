//! A single page of list results
//!
//! A `Page` is built from one decoded response body. Every raw item is run
//! through the resource's `ItemConverter` when the page is built, and the
//! converted items are then handed out in server order, once.

use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use serde_json::Value;

/// Response field carrying the continuation token
pub const NEXT_PAGE_TOKEN_KEY: &str = "nextPageToken";

/// Converts raw JSON items into domain objects
///
/// Implemented by each listable resource; plain closures work too:
///
/// ```rust,ignore
/// let ids = |raw: Value| Ok(raw["projectId"].as_str().unwrap_or_default().to_string());
/// ```
pub trait ItemConverter {
    /// Domain object produced for each item
    type Item;

    /// Convert one raw item
    fn convert(&self, raw: Value) -> Result<Self::Item>;
}

impl<T, F> ItemConverter for F
where
    F: Fn(Value) -> Result<T>,
{
    type Item = T;

    fn convert(&self, raw: Value) -> Result<T> {
        self(raw)
    }
}

/// One server response worth of items plus the token for the next batch
#[derive(Debug)]
pub struct Page<T> {
    items: std::vec::IntoIter<T>,
    num_items: usize,
    next_page_token: Option<String>,
}

impl<T> Page<T> {
    /// Build a page from a response body, reading items from `items_key`
    ///
    /// Fails with `Error::MissingItems` when the key is absent and with
    /// `Error::Decode` when the body or the token has the wrong shape.
    pub fn from_response<C>(response: Value, items_key: &str, converter: &C) -> Result<Self>
    where
        C: ItemConverter<Item = T> + ?Sized,
    {
        let mut body = match response {
            Value::Object(body) => body,
            other => {
                return Err(Error::decode(format!(
                    "Expected a JSON object page, got {}",
                    json_kind(&other)
                )))
            }
        };

        let next_page_token = match body.remove(NEXT_PAGE_TOKEN_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(token)) => token.none_if_empty(),
            Some(other) => {
                return Err(Error::decode(format!(
                    "'{NEXT_PAGE_TOKEN_KEY}' must be a string, got {}",
                    json_kind(&other)
                )))
            }
        };

        let raw_items = match body.remove(items_key) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(Error::decode(format!(
                    "'{items_key}' must be an array, got {}",
                    json_kind(&other)
                )))
            }
            None => {
                return Err(Error::MissingItems {
                    key: items_key.to_string(),
                })
            }
        };

        let items = raw_items
            .into_iter()
            .map(|raw| converter.convert(raw))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(items, next_page_token))
    }

    /// Build a page from already converted items
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            num_items: items.len(),
            items: items.into_iter(),
            next_page_token: next_page_token.none_if_empty(),
        }
    }

    /// Number of items the server returned on this page
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Number of items not yet handed out
    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    /// Check if every item has been handed out
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Token for the following page; `None` on the last page
    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    /// Hand out the next item
    pub(crate) fn next_item(&mut self) -> Option<T> {
        self.items.next()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
