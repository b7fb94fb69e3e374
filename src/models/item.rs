use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

pub type ItemMap = BTreeMap<String, ItemValue>;

/// A stored document value. Numbers are exact decimals, never binary floats.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValue {
    Null,
    Bool(bool),
    Number(BigDecimal),
    String(String),
    List(Vec<ItemValue>),
    Map(ItemMap),
}

#[derive(Error, Debug)]
pub enum ItemError {
    #[error("Invalid numeric literal: {0}")]
    InvalidNumber(String),
}

impl ItemValue {
    pub fn as_map(&self) -> Option<&ItemMap> {
        match self {
            ItemValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut ItemMap> {
        match self {
            ItemValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&BigDecimal> {
        match self {
            ItemValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ItemValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ItemValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Walk nested maps, e.g. `["data", "1", "quote", "USD", "price"]`.
    pub fn lookup(&self, path: &[&str]) -> Option<&ItemValue> {
        path.iter().try_fold(self, |value, key| value.get(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ItemValue::Null => "null",
            ItemValue::Bool(_) => "bool",
            ItemValue::Number(_) => "number",
            ItemValue::String(_) => "string",
            ItemValue::List(_) => "list",
            ItemValue::Map(_) => "map",
        }
    }
}

impl From<BigDecimal> for ItemValue {
    fn from(n: BigDecimal) -> Self {
        ItemValue::Number(n)
    }
}

impl From<i64> for ItemValue {
    fn from(n: i64) -> Self {
        ItemValue::Number(BigDecimal::from(n))
    }
}

impl From<&str> for ItemValue {
    fn from(s: &str) -> Self {
        ItemValue::String(s.to_string())
    }
}

impl TryFrom<Value> for ItemValue {
    type Error = ItemError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => ItemValue::Null,
            Value::Bool(b) => ItemValue::Bool(b),
            // Number keeps its source text (arbitrary_precision), so this parse is exact
            Value::Number(n) => {
                let literal = n.to_string();
                let decimal = BigDecimal::from_str(&literal)
                    .map_err(|_| ItemError::InvalidNumber(literal))?;
                ItemValue::Number(decimal)
            }
            Value::String(s) => ItemValue::String(s),
            Value::Array(items) => ItemValue::List(
                items
                    .into_iter()
                    .map(ItemValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(entries) => ItemValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| Ok((key, ItemValue::try_from(value)?)))
                    .collect::<Result<_, ItemError>>()?,
            ),
        })
    }
}

impl Serialize for ItemValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ItemValue::Null => serializer.serialize_unit(),
            ItemValue::Bool(b) => serializer.serialize_bool(*b),
            ItemValue::Number(n) => number_literal(n)
                .map_err(S::Error::custom)?
                .serialize(serializer),
            ItemValue::String(s) => serializer.serialize_str(s),
            ItemValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ItemValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

fn number_literal(n: &BigDecimal) -> Result<serde_json::Number, serde_json::Error> {
    serde_json::from_str::<serde_json::Number>(&n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ItemValue {
        ItemValue::try_from(serde_json::from_str::<Value>(text).unwrap()).unwrap()
    }

    #[test]
    fn test_numbers_become_exact_decimals() {
        let item = parse(r#"{"price": 0.1, "volume": 0.2}"#);
        let price = item.get("price").and_then(ItemValue::as_number).unwrap();
        let volume = item.get("volume").and_then(ItemValue::as_number).unwrap();

        assert_eq!(price + volume, BigDecimal::from_str("0.3").unwrap());
    }

    #[test]
    fn test_precision_beyond_f64_survives() {
        let literal = "67432.123456789012345678901234567";
        let item = parse(&format!(r#"{{"price": {}}}"#, literal));

        assert_eq!(
            item.get("price").and_then(ItemValue::as_number),
            Some(&BigDecimal::from_str(literal).unwrap())
        );
        assert!(serde_json::to_string(&item).unwrap().contains(literal));
    }

    #[test]
    fn test_string_numbers_stay_strings() {
        let item = parse(r#"{"price": "12345.67"}"#);
        assert_eq!(item.get("price").and_then(ItemValue::as_str), Some("12345.67"));
    }

    #[test]
    fn test_lookup_nested_path() {
        let item = parse(r#"{"data": {"1": {"quote": {"USD": {"price": 42}}}}}"#);
        assert_eq!(
            item.lookup(&["data", "1", "quote", "USD", "price"]),
            Some(&ItemValue::from(42i64))
        );
        assert_eq!(item.lookup(&["data", "2"]), None);
    }

    #[test]
    fn test_serializes_back_to_equivalent_json() {
        let source = r#"{"a":[1,true,null,"x"],"b":{"c":-2.50}}"#;
        let item = parse(source);
        let rendered = serde_json::to_string(&item).unwrap();

        assert_eq!(parse(&rendered), item);
        assert_eq!(rendered, r#"{"a":[1,true,null,"x"],"b":{"c":-2.50}}"#);
    }
}
