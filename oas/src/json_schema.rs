//! JSON schema vocabulary used by generated schemas
//!
//! This module provides the primitive type tags and the well-known `format`
//! values written into [`crate::Schema`] nodes.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use strum::AsRefStr;
use strum::Display;
use strum::EnumString;

/// JSON schema type names for type schema generation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize, Deserialize, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JsonSchemaType {
    /// JSON object
    Object,
    /// JSON array
    Array,
    /// JSON string
    String,
    /// Any JSON number
    Number,
    /// JSON number without a fractional part
    Integer,
    /// `true` or `false`
    Boolean,
    /// `null`
    Null,
}

impl From<JsonSchemaType> for Value {
    fn from(schema_type: JsonSchemaType) -> Self { Self::String(schema_type.as_ref().to_string()) }
}

/// Values of the `format` keyword.
///
/// The first nine are detected automatically, either from a type's kind or by
/// sniffing its encoder output. The rest are well-known formats that only
/// appear when set by hand.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize, Deserialize, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SchemaFormat {
    /// 32-bit integer
    Int32,
    /// 64-bit integer
    Int64,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// Calendar date, `2024-01-02`
    Date,
    /// Local time, `03:04:05`
    Time,
    /// RFC 3339 timestamp
    DateTime,
    /// ISO 8601 duration
    Duration,
    /// UUID in canonical or simple form
    Uuid,
    /// Base64-encoded bytes
    Byte,
    /// Raw binary payload
    Binary,
    /// Obscured text
    Password,
    /// Email address
    Email,
}
