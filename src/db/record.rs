// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Schema-less record type shared by all collections.

use chrono::{DateTime, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time_utils::parse_utc;

/// Envelope field names set by the store.
pub mod fields {
    pub const ID: &str = "id";
    pub const CREATED_DATE: &str = "created_date";
    pub const UPDATED_DATE: &str = "updated_date";
}

/// Bytes of randomness appended to generated IDs.
const ID_SUFFIX_BYTES: usize = 5;

/// A flat field mapping representing one entity instance.
///
/// Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a record from any serializable value that encodes as an object.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(serde::de::Error::custom(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    /// Decode into a typed model.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(Value::Object(self.0.clone()))
    }

    pub fn id(&self) -> Option<&str> {
        self.get_str(fields::ID)
    }

    pub fn created_date(&self) -> Option<&str> {
        self.get_str(fields::CREATED_DATE)
    }

    pub fn updated_date(&self) -> Option<&str> {
        self.get_str(fields::UPDATED_DATE)
    }

    /// Parsed `created_date`, `None` when missing or malformed.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_date().and_then(parse_utc)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_date().and_then(parse_utc)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// Shallow merge: every field in `patch` overwrites, everything else is kept.
    pub(crate) fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            self.0.insert(key, value);
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Generate a record ID: millisecond timestamp plus a random hex suffix.
///
/// Collisions are vanishingly unlikely; the store still checks its index.
pub fn generate_id(now: DateTime<Utc>) -> Result<String, ring::error::Unspecified> {
    let mut suffix = [0u8; ID_SUFFIX_BYTES];
    SystemRandom::new().fill(&mut suffix)?;
    Ok(format!("{}-{}", now.timestamp_millis(), hex::encode(suffix)))
}
