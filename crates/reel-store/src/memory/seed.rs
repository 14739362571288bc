//! Seed data loading
//!
//! Accepts either an id-keyed object or an array of records carrying an
//! `id` field for each collection:
//!
//! ```json
//! {
//!   "campaigns": { "c1": { "title": "Taco Tuesday" } },
//!   "users": [ { "id": "u1", "role": "admin" } ]
//! }
//! ```

use std::collections::BTreeMap;

use reel_core::{Collection, Document, Fields, RecordId};
use serde_json::Value;

/// Errors raised while reading seed data
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to parse seed data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Invalid record in {collection}: {reason}")]
    InvalidRecord {
        collection: Collection,
        reason: String,
    },
}

/// Initial documents per collection
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    collections: BTreeMap<Collection, Vec<Document>>,
}

impl SeedData {
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, SeedError> {
        let Value::Object(root) = value else {
            return Err(SeedError::Parse(serde::de::Error::custom(
                "seed root must be an object",
            )));
        };

        let mut seed = Self::default();
        for (name, records) in root {
            let collection =
                Collection::parse(&name).ok_or(SeedError::UnknownCollection(name))?;
            let documents = Self::parse_records(collection, records)?;
            seed.collections
                .entry(collection)
                .or_default()
                .extend(documents);
        }
        Ok(seed)
    }

    fn parse_records(collection: Collection, records: Value) -> Result<Vec<Document>, SeedError> {
        let invalid = |reason: &str| SeedError::InvalidRecord {
            collection,
            reason: reason.to_string(),
        };

        match records {
            Value::Object(by_id) => by_id
                .into_iter()
                .map(|(id, fields)| match fields {
                    Value::Object(fields) => Ok(Document::new(id, fields)),
                    _ => Err(invalid("record must be an object")),
                })
                .collect(),
            Value::Array(list) => list
                .into_iter()
                .map(|record| {
                    let Value::Object(mut fields) = record else {
                        return Err(invalid("record must be an object"));
                    };
                    match fields.remove("id") {
                        Some(Value::String(id)) if !id.is_empty() => Ok(Document::new(id, fields)),
                        _ => Err(invalid("record needs a string id")),
                    }
                })
                .collect(),
            _ => Err(invalid("collection must be an object or an array")),
        }
    }

    /// Add a single record
    pub fn insert(&mut self, collection: Collection, id: impl Into<RecordId>, fields: Fields) {
        self.collections
            .entry(collection)
            .or_default()
            .push(Document::new(id, fields));
    }

    pub fn len(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_collections(self) -> BTreeMap<Collection, Vec<Document>> {
        self.collections
    }
}
