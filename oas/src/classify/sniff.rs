//! Reading schema facts out of encoder output

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveTime;

use crate::constants::DURATION_LITERALS;
use crate::constants::LAYOUT_DATE;
use crate::constants::LAYOUT_TIME;
use crate::constants::LAYOUT_TIME_T;
use crate::constants::UUID_HYPHENATED_LEN;
use crate::constants::UUID_HYPHEN_OFFSETS;
use crate::constants::UUID_SIMPLE_LEN;
use crate::json_schema::JsonSchemaType;
use crate::json_schema::SchemaFormat;
use crate::schema::Schema;

/// Classify structured (JSON) output. Returns `true` when the output settled
/// the schema.
pub(super) fn inspect_json(schema: &mut Schema, output: &str) -> bool {
    let output = output.trim();

    if output == "null" {
        schema.type_add(JsonSchemaType::Null);
        return false;
    }

    if output == "true" || output == "false" {
        schema.type_add(JsonSchemaType::Boolean);
        schema.format = None;
        return true;
    }

    if output.starts_with('"') {
        schema.type_add(JsonSchemaType::String);
        sniff_format(schema, &unquote(output));
        return true;
    }

    if output.starts_with('-') || output.starts_with(|c: char| c.is_ascii_digit()) {
        schema.type_add(JsonSchemaType::Number);
        if output.contains(['.', 'e', 'E']) {
            schema.format = Some(SchemaFormat::Double);
        }
        return true;
    }

    false
}

/// Classify textual output; any text settles the schema as a string
pub(super) fn inspect_text(schema: &mut Schema, output: &str) {
    schema.type_add(JsonSchemaType::String);
    sniff_format(schema, output);
}

/// Strip one layer of JSON string quoting, keeping malformed text as is
fn unquote(quoted: &str) -> String {
    serde_json::from_str::<String>(quoted).unwrap_or_else(|_| quoted.to_string())
}

/// Set `format` from the first well-known spelling `text` matches
fn sniff_format(schema: &mut Schema, text: &str) {
    let text = text.trim();
    let format = if DateTime::parse_from_rfc3339(text).is_ok() {
        SchemaFormat::DateTime
    } else if NaiveDate::parse_from_str(text, LAYOUT_DATE).is_ok() {
        SchemaFormat::Date
    } else if NaiveTime::parse_from_str(text, LAYOUT_TIME_T).is_ok()
        || NaiveTime::parse_from_str(text, LAYOUT_TIME).is_ok()
    {
        SchemaFormat::Time
    } else if is_uuid(text) {
        SchemaFormat::Uuid
    } else if DURATION_LITERALS.contains(&text) {
        SchemaFormat::Duration
    } else {
        return;
    };
    schema.format = Some(format);
}

/// Canonical hyphenated or 32-hex-digit UUID; braced and URN forms are not
/// accepted
fn is_uuid(text: &str) -> bool {
    let shape_ok = match text.len() {
        UUID_HYPHENATED_LEN => UUID_HYPHEN_OFFSETS
            .iter()
            .all(|&offset| text.as_bytes()[offset] == b'-'),
        UUID_SIMPLE_LEN => true,
        _ => false,
    };
    shape_ok && uuid::Uuid::try_parse(text).is_ok()
}
