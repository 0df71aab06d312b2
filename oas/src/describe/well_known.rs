//! `Describe` for the date, time, duration and UUID types of the ecosystem
//!
//! These carry real encoders, so their schemas come from sniffing what they
//! actually write rather than from their in-memory layout.

use std::time::Duration;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::SecondsFormat;
use chrono::TimeDelta;
use chrono::Utc;
use uuid::Uuid;

use super::Describe;
use super::Field;
use super::TypeDescriptor;
use super::TypeKind;
use super::TypeRef;
use crate::constants::LAYOUT_DATE;
use crate::constants::LAYOUT_TIME;
use crate::encode::EncodeError;
use crate::value::Value;

/// Quote encoder text as a JSON string
fn json_quoted(text: &str) -> Result<String, EncodeError> {
    serde_json::to_string(text).map_err(EncodeError::invalid)
}

/// Read the `(seconds, nanoseconds)` slots of a two-field record
fn seconds_and_nanos(value: &Value) -> Result<(i128, u32), EncodeError> {
    let secs = value
        .field(0)
        .and_then(Value::as_i128)
        .ok_or_else(|| EncodeError::shape("seconds slot", value))?;
    let nanos = value
        .field(1)
        .and_then(Value::as_i128)
        .and_then(|nanos| u32::try_from(nanos).ok())
        .ok_or_else(|| EncodeError::shape("nanoseconds slot", value))?;
    Ok((secs, nanos))
}

fn uuid_text(value: &Value) -> Result<String, EncodeError> {
    let elements = value
        .as_elements()
        .ok_or_else(|| EncodeError::shape("byte array", value))?;
    let bytes: Vec<u8> = elements
        .iter()
        .map(|element| element.as_i128().and_then(|byte| u8::try_from(byte).ok()))
        .collect::<Option<_>>()
        .ok_or_else(|| EncodeError::shape("bytes", value))?;
    let uuid = Uuid::from_slice(&bytes).map_err(EncodeError::invalid)?;
    Ok(uuid.hyphenated().to_string())
}

fn uuid_json(value: &Value) -> Result<String, EncodeError> { json_quoted(&uuid_text(value)?) }

impl Describe for Uuid {
    fn type_name() -> String { "Uuid".to_string() }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(
            Self::type_name(),
            TypeKind::Array {
                element: TypeRef::of::<u8>(),
                len:     16,
            },
        )
        .with_structured(uuid_json)
        .with_text(uuid_text)
    }
}

fn date_time_text(value: &Value) -> Result<String, EncodeError> {
    let (secs, nanos) = seconds_and_nanos(value)?;
    let secs = i64::try_from(secs).map_err(EncodeError::invalid)?;
    let timestamp = DateTime::<Utc>::from_timestamp(secs, nanos)
        .ok_or_else(|| EncodeError::invalid(format!("timestamp {secs}.{nanos:09} out of range")))?;
    Ok(timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn date_time_json(value: &Value) -> Result<String, EncodeError> {
    json_quoted(&date_time_text(value)?)
}

impl Describe for DateTime<Utc> {
    fn type_name() -> String { "DateTime<Utc>".to_string() }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::record(
            Self::type_name(),
            vec![
                Field::new("secs", TypeRef::of::<i64>()).private(),
                Field::new("nanos", TypeRef::of::<u32>()).private(),
            ],
        )
        .with_structured(date_time_json)
        .with_text(date_time_text)
    }
}

fn date_text(value: &Value) -> Result<String, EncodeError> {
    let days = value
        .as_i64()
        .ok_or_else(|| EncodeError::shape("day offset", value))?;
    let date = TimeDelta::try_days(days)
        .and_then(|offset| DateTime::UNIX_EPOCH.date_naive().checked_add_signed(offset))
        .ok_or_else(|| EncodeError::invalid(format!("day offset {days} out of range")))?;
    Ok(date.format(LAYOUT_DATE).to_string())
}

fn date_json(value: &Value) -> Result<String, EncodeError> { json_quoted(&date_text(value)?) }

impl Describe for NaiveDate {
    fn type_name() -> String { "NaiveDate".to_string() }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(
            Self::type_name(),
            TypeKind::Int {
                signed: true,
                width:  super::IntWidth::W32,
            },
        )
        .with_structured(date_json)
        .with_text(date_text)
    }
}

fn time_text(value: &Value) -> Result<String, EncodeError> {
    let (secs, nanos) = seconds_and_nanos(value)?;
    let time = u32::try_from(secs)
        .ok()
        .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos))
        .ok_or_else(|| EncodeError::invalid(format!("{secs}s past midnight out of range")))?;
    Ok(time.format(LAYOUT_TIME).to_string())
}

fn time_json(value: &Value) -> Result<String, EncodeError> { json_quoted(&time_text(value)?) }

impl Describe for NaiveTime {
    fn type_name() -> String { "NaiveTime".to_string() }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::record(
            Self::type_name(),
            vec![
                Field::new("secs", TypeRef::of::<u32>()).private(),
                Field::new("frac", TypeRef::of::<u32>()).private(),
            ],
        )
        .with_structured(time_json)
        .with_text(time_text)
    }
}

/// ISO 8601 duration in seconds, `PT0S`, `PT1.5S`, `-PT90S`
fn iso_seconds(secs: i128, nanos: u32) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    if nanos == 0 {
        return format!("{sign}PT{secs}S");
    }
    let fraction = format!("{nanos:09}");
    format!("{sign}PT{secs}.{}S", fraction.trim_end_matches('0'))
}

fn time_delta_text(value: &Value) -> Result<String, EncodeError> {
    let (secs, nanos) = seconds_and_nanos(value)?;
    i64::try_from(secs)
        .ok()
        .and_then(|secs| TimeDelta::new(secs, nanos))
        .ok_or_else(|| EncodeError::invalid(format!("duration {secs}s out of range")))?;
    Ok(iso_seconds(secs, nanos))
}

fn time_delta_json(value: &Value) -> Result<String, EncodeError> {
    json_quoted(&time_delta_text(value)?)
}

impl Describe for TimeDelta {
    fn type_name() -> String { "TimeDelta".to_string() }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::record(
            Self::type_name(),
            vec![
                Field::new("secs", TypeRef::of::<i64>()).private(),
                Field::new("nanos", TypeRef::of::<u32>()).private(),
            ],
        )
        .with_structured(time_delta_json)
        .with_text(time_delta_text)
    }
}

fn std_duration_text(value: &Value) -> Result<String, EncodeError> {
    let (secs, nanos) = seconds_and_nanos(value)?;
    u64::try_from(secs).map_err(EncodeError::invalid)?;
    if nanos >= 1_000_000_000 {
        return Err(EncodeError::invalid(format!("{nanos} nanoseconds overflow a second")));
    }
    Ok(iso_seconds(secs, nanos))
}

impl Describe for Duration {
    fn type_name() -> String { "Duration".to_string() }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::record(
            Self::type_name(),
            vec![
                Field::new("secs", TypeRef::of::<u64>()).private(),
                Field::new("nanos", TypeRef::of::<u32>()).private(),
            ],
        )
        .with_text(std_duration_text)
    }
}
