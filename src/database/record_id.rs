use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Store-assigned record identifier: 96 bits rendered as 24 lowercase hex chars.
///
/// The hex rendering sorts the same way as the underlying bytes, so stores may
/// compare identifiers as plain strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(ObjectId);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid record identifier: {0:?}")]
pub struct InvalidRecordId(pub String);

impl RecordId {
    /// Generate a fresh identifier (timestamp + process + counter).
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn parse(value: &str) -> Result<Self, InvalidRecordId> {
        // ObjectId accepts mixed case; identifiers are canonical lowercase only
        if value.len() != 24 || !value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(InvalidRecordId(value.to_string()));
        }
        ObjectId::parse_str(value)
            .map(Self)
            .map_err(|_| InvalidRecordId(value.to_string()))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(ObjectId::from_bytes(bytes))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
