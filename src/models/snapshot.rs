use bigdecimal::ToPrimitive;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::AppError;
use crate::models::item::{ItemMap, ItemValue};

pub const TIMESTAMP_KEY: &str = "timestamp";

/// One stored row: the fetch time plus the upstream payload's top-level fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRecord {
    pub timestamp: i64,
    pub attributes: ItemMap,
}

impl SnapshotRecord {
    /// `attributes` must not carry its own `timestamp`; the key belongs to the record.
    pub fn new(timestamp: i64, mut attributes: ItemMap) -> Self {
        attributes.remove(TIMESTAMP_KEY);
        Self { timestamp, attributes }
    }

    pub fn attribute(&self, key: &str) -> Option<&ItemValue> {
        self.attributes.get(key)
    }

    /// The whole row as a single document, timestamp included.
    pub fn to_item(&self) -> ItemMap {
        let mut item = self.attributes.clone();
        item.insert(TIMESTAMP_KEY.to_string(), ItemValue::from(self.timestamp));
        item
    }

    pub fn from_item(mut item: ItemMap) -> Result<Self, AppError> {
        let timestamp = match item.remove(TIMESTAMP_KEY) {
            Some(ItemValue::Number(n)) if n.is_integer() => n.to_i64().ok_or_else(|| {
                AppError::ValidationError(format!("timestamp out of range: {}", n))
            })?,
            Some(other) => {
                return Err(AppError::ValidationError(format!(
                    "timestamp must be an integer, found {}",
                    other.type_name()
                )))
            }
            None => return Err(AppError::ValidationError("record has no timestamp".to_string())),
        };

        Ok(Self { timestamp, attributes: item })
    }

    pub fn from_json(value: Value) -> Result<Self, AppError> {
        match ItemValue::try_from(value) {
            Ok(ItemValue::Map(item)) => Self::from_item(item),
            Ok(other) => Err(AppError::ValidationError(format!(
                "record must be a map, found {}",
                other.type_name()
            ))),
            Err(e) => Err(AppError::ValidationError(e.to_string())),
        }
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Serialize for SnapshotRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len() + 1))?;
        map.serialize_entry(TIMESTAMP_KEY, &self.timestamp)?;
        for (key, value) in &self.attributes {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
