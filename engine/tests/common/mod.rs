//! Shared fixtures for the integration tests.
//!
//! `Record` covers every field shape the engine distinguishes: plain values,
//! optionals, nested records (compared whole), an embedded record and a chain
//! of two optional embedded records.

#![allow(dead_code)]

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// JSON `null` decodes to the zero value, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Nested {
    #[serde(deserialize_with = "null_as_default")]
    pub string: String,
    pub string_opt: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub flag: bool,
    pub flag_opt: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Base {
    #[serde(deserialize_with = "null_as_default")]
    pub base_string: String,
    pub base_string_opt: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub base_nested: Nested,
    pub base_nested_opt: Option<Nested>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Extra {
    #[serde(deserialize_with = "null_as_default")]
    pub extra_string: String,
    pub extra_string_opt: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub extra_nested: Nested,
    pub extra_nested_opt: Option<Nested>,
    #[serde(flatten)]
    pub more: Option<Box<More>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct More {
    #[serde(deserialize_with = "null_as_default")]
    pub more_string: String,
    pub more_string_opt: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub more_nested: Nested,
    pub more_nested_opt: Option<Nested>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(deserialize_with = "null_as_default")]
    pub string: String,
    pub string_opt: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub flag: bool,
    pub flag_opt: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub nested: Nested,
    pub nested_opt: Option<Nested>,
    #[serde(skip)]
    pub revision: u64,
    #[serde(flatten)]
    pub base: Base,
    #[serde(flatten)]
    pub extra: Option<Box<Extra>>,
}

shallow::record! {
    Nested {
        string [json = "string,omitempty"],
        string_opt [json = "string_opt"],
        flag [json = "flag"],
        flag_opt [json = "flag_opt"],
    }
}

shallow::record! {
    Base {
        base_string [json = "base_string,omitempty"],
        base_string_opt [json = "base_string_opt"],
        base_nested [json = "base_nested"],
        base_nested_opt [json = "base_nested_opt"],
    }
}

shallow::record! {
    Extra {
        extra_string [json = "extra_string"],
        extra_string_opt [json = "extra_string_opt"],
        extra_nested [json = "extra_nested"],
        extra_nested_opt [json = "extra_nested_opt"],
        ..more,
    }
}

shallow::record! {
    More {
        more_string [json = "more_string"],
        more_string_opt [json = "more_string_opt"],
        more_nested [json = "more_nested"],
        more_nested_opt [json = "more_nested_opt"],
    }
}

shallow::record! {
    Record {
        string [json = "string"],
        string_opt [json = "string_opt,omitempty"],
        flag [json = "flag,omitempty"],
        flag_opt [json = "flag_opt"],
        nested [json = "nested"],
        nested_opt [json = "nested_opt"],
        revision [],
        ..base,
        ..extra,
    }
}

pub fn nested(prefix: &str) -> Nested {
    Nested {
        string: format!("{prefix}_string_val"),
        string_opt: Some(format!("{prefix}_string_opt_val")),
        flag: true,
        flag_opt: Some(true),
    }
}

/// A fully populated record, optionally adjusted by `modify`.
pub fn test_data(modify: impl FnOnce(&mut Record)) -> Record {
    let mut data = Record {
        string: "string_val".into(),
        string_opt: Some("string_opt_val".into()),
        flag: true,
        flag_opt: Some(true),
        nested: nested("nested"),
        nested_opt: Some(nested("nested_opt")),
        revision: 1,
        base: Base {
            base_string: "base_string_val".into(),
            base_string_opt: Some("base_string_opt_val".into()),
            base_nested: nested("nested"),
            base_nested_opt: Some(nested("nested_opt")),
        },
        extra: Some(Box::new(Extra {
            extra_string: "extra_string_val".into(),
            extra_string_opt: Some("extra_string_opt_val".into()),
            extra_nested: nested("nested"),
            extra_nested_opt: Some(nested("nested_opt")),
            more: Some(Box::new(More {
                more_string: "more_string_val".into(),
                more_string_opt: Some("more_string_opt_val".into()),
                more_nested: nested("nested"),
                more_nested_opt: Some(nested("nested_opt")),
            })),
        })),
    };
    modify(&mut data);
    data
}

pub fn unchanged(_: &mut Record) {}

/// Decode a PATCH body into a record and the set of keys it carries.
pub fn decode(body: &str) -> (Record, serde_json::Map<String, serde_json::Value>) {
    let update: Record = serde_json::from_str(body).expect("body decodes into a record");
    let keys: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(body).expect("body is a JSON object");
    (update, keys)
}

pub fn key_filter(keys: &[&str]) -> HashMap<String, ()> {
    keys.iter().map(|key| (key.to_string(), ())).collect()
}

pub fn extra(record: &mut Record) -> &mut Extra {
    record.extra.as_mut().expect("extra present")
}

pub fn more(record: &mut Record) -> &mut More {
    extra(record).more.as_mut().expect("more present")
}
