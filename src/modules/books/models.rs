use cozy_db::{Document, DocumentId, StoredDocument};
use serde::{de, Deserialize, Deserializer, Serialize};

/// A stored book as returned by the listing endpoint: its identifier as text
/// under `_id` plus every stored field, passed through as stored.
///
/// Records written by other tools may lack some of the usual fields or carry
/// extra ones; they are listed as they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Document,
}

impl From<StoredDocument> for Book {
    fn from(stored: StoredDocument) -> Self {
        Self {
            id: stored.id.to_string(),
            fields: stored.fields,
        }
    }
}

/// Writable book fields, used by both create and update.
///
/// Only these four keys are accepted; anything else in the payload is rejected.
/// Absent fields are left out of the stored document (create) or left
/// untouched (update).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<i64>,
}

impl BookFields {
    /// Fields as a store document, omitting the absent ones.
    pub fn into_document(self) -> Document {
        let mut document = Document::new();
        if let Some(title) = self.title {
            document.insert("title".into(), title.into());
        }
        if let Some(author) = self.author {
            document.insert("author".into(), author.into());
        }
        if let Some(price) = self.price {
            document.insert("price".into(), price.into());
        }
        if let Some(quantity) = self.quantity {
            document.insert("quantity".into(), quantity.into());
        }
        document
    }
}

/// `{"message": ..., "id": ...}` returned by the write endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            id: None,
        }
    }

    pub fn with_id(message: &str, id: DocumentId) -> Self {
        Self {
            message: message.to_string(),
            id: Some(id.to_string()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Accepts `11.5` or `"11.5"`.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Integer(n)) => Ok(Some(n as f64)),
        Some(NumberOrText::Float(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("price '{text}' is not a number"))),
    }
}

/// Accepts `8`, `8.0` or `"8"`.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Integer(n)) => Ok(Some(n)),
        Some(NumberOrText::Float(n)) if n.fract() == 0.0 && fits_i64(n) => Ok(Some(n as i64)),
        Some(NumberOrText::Float(n)) => Err(de::Error::custom(format!(
            "quantity {n} is not an integer"
        ))),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("quantity '{text}' is not an integer"))),
    }
}

// `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
fn fits_i64(n: f64) -> bool {
    (i64::MIN as f64..i64::MAX as f64).contains(&n)
}
