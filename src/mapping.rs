use std::num::ParseIntError;

use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::types::ContentItem;

/// One element of the wire array, before the id is interpreted.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentRecord {
    #[serde(deserialize_with = "scalar_text")]
    pub id: String,
    #[serde(deserialize_with = "scalar_text")]
    pub image: String,
    #[serde(deserialize_with = "scalar_text")]
    pub title: String,
}

// Numbers and booleans are read as their text; null and containers are rejected.
fn scalar_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected a string, got {other}"))),
    }
}

impl TryFrom<ContentRecord> for ContentItem {
    type Error = ParseIntError;

    fn try_from(r: ContentRecord) -> Result<Self, Self::Error> {
        let id = r.id.parse::<i32>()?;
        Ok(ContentItem::new(id, r.title, r.image))
    }
}

/// Parse a response body into content items.
///
/// The body must be a JSON array, otherwise the whole parse fails. Elements
/// that are not well-formed records, or whose id is not a decimal integer, are
/// dropped one by one and the rest are kept in array order.
pub fn parse_content_list(body: &str) -> Result<Vec<ContentItem>, serde_json::Error> {
    let elements: Vec<Value> = serde_json::from_str(body)?;
    let total = elements.len();
    let items: Vec<ContentItem> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(idx, v)| match item_from_value(v) {
            Ok(item) => Some(item),
            Err(reason) => {
                warn!(index = idx, %reason, "dropping malformed content element");
                None
            }
        })
        .collect();
    if items.len() < total {
        warn!(kept = items.len(), total, "some content elements were dropped");
    }
    Ok(items)
}

fn item_from_value(v: Value) -> Result<ContentItem, String> {
    let record: ContentRecord = serde_json::from_value(v).map_err(|e| e.to_string())?;
    let id = record.id.clone();
    ContentItem::try_from(record).map_err(|e| format!("id {id:?}: {e}"))
}
