use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Length of generated record ids: a prefix of a v4 UUID.
pub const RECORD_ID_LEN: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(RECORD_ID_LEN);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
}

impl From<&AttributeValue> for Value {
    fn from(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Text(text) => Value::String(text.clone()),
            AttributeValue::Integer(number) => Value::from(*number),
        }
    }
}

/// One persisted domain entity. Optional fields that were not supplied are
/// absent from `attributes`; they are never stored as empty placeholders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Record {
    pub fn new(id: RecordId) -> Self {
        Self { id, attributes: BTreeMap::new() }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Flat item view with the id stored under `key_attribute`.
    pub fn to_item(&self, key_attribute: &str) -> Map<String, Value> {
        let mut item: Map<String, Value> =
            self.attributes.iter().map(|(name, value)| (name.clone(), Value::from(value))).collect();
        item.insert(key_attribute.to_string(), Value::String(self.id.0.clone()));
        item
    }
}
