use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StoreError;

/// Store-assigned document identifier, rendered as 24 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| StoreError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Identifier found on a stored document.
///
/// Documents written through a [`DocumentStore`](crate::DocumentStore) always
/// carry an assigned [`DocumentId`]; records created by other tools may use any
/// scalar, kept here in its text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoredId {
    Assigned(DocumentId),
    Foreign(String),
}

impl StoredId {
    pub fn document_id(&self) -> Option<DocumentId> {
        match self {
            StoredId::Assigned(id) => Some(*id),
            StoredId::Foreign(_) => None,
        }
    }
}

impl From<DocumentId> for StoredId {
    fn from(id: DocumentId) -> Self {
        StoredId::Assigned(id)
    }
}

impl PartialEq<DocumentId> for StoredId {
    fn eq(&self, other: &DocumentId) -> bool {
        matches!(self, StoredId::Assigned(id) if id == other)
    }
}

impl fmt::Display for StoredId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredId::Assigned(id) => id.fmt(f),
            StoredId::Foreign(text) => f.write_str(text),
        }
    }
}
