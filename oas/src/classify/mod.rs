//! Behavioral format and nullability classification
//!
//! Types with their own encoders are described by what they write, not by
//! how they are laid out in memory: a record of seconds and nanoseconds that
//! encodes as an RFC 3339 string is a `date-time` string. The classifier
//! encodes the empty value of such a type, reads the output, and if that was
//! not conclusive tries once more with a non-default witness.

mod sniff;

use std::sync::Arc;

use tracing::debug;
use tracing::trace;

use crate::describe::TypeDescriptor;
use crate::describe::TypeKind;
use crate::encode::EncodeError;
use crate::encode::EncodeFn;
use crate::encode::Encoding;
use crate::json_schema::JsonSchemaType;
use crate::schema::Schema;
use crate::value::Value;
use crate::witness::make_witness;

/// True if `descriptor` exposes `encoding`, either its own, through pointer
/// layers, or promoted from a unique shallowest embedded field
pub fn provides(descriptor: &TypeDescriptor, encoding: Encoding) -> bool {
    reachable(descriptor, encoding, &mut Vec::new()).is_some()
}

/// Encoder reachable from a type, plus the embedded record slots leading to
/// the sub-value it reads
struct Reachable {
    encoder: EncodeFn,
    path:    Vec<usize>,
}

impl Reachable {
    fn encode(&self, value: &Value) -> Result<String, EncodeError> {
        let mut target = value;
        for &index in &self.path {
            target = target
                .field(index)
                .and_then(Value::deref)
                .ok_or_else(|| EncodeError::shape("embedded record", target))?;
        }
        (self.encoder)(target)
    }
}

fn reachable(
    descriptor: &TypeDescriptor,
    encoding: Encoding,
    visiting: &mut Vec<String>,
) -> Option<Reachable> {
    if let Some(encoder) = descriptor.encoder(encoding) {
        return Some(Reachable {
            encoder,
            path: Vec::new(),
        });
    }

    match descriptor.kind() {
        TypeKind::Pointer(referent) => reachable(&referent.resolve(), encoding, visiting),
        TypeKind::Record(fields) => {
            if visiting.iter().any(|name| name == descriptor.name()) {
                return None;
            }
            visiting.push(descriptor.name().to_string());

            let mut shallowest: Option<Reachable> = None;
            let mut ambiguous = false;
            for (index, field) in fields.iter().enumerate() {
                if !field.is_embedded() {
                    continue;
                }
                let Some(mut found) = reachable(&field.descriptor(), encoding, visiting) else {
                    continue;
                };
                found.path.insert(0, index);
                match &shallowest {
                    Some(current) if current.path.len() < found.path.len() => {}
                    Some(current) if current.path.len() == found.path.len() => ambiguous = true,
                    _ => {
                        ambiguous = false;
                        shallowest = Some(found);
                    }
                }
            }

            visiting.pop();
            if ambiguous { None } else { shallowest }
        }
        _ => None,
    }
}

/// Describe `descriptor` by its encoder output.
///
/// Returns `true` when the schema is settled and structural decomposition
/// must be skipped. The structured capability is preferred over the textual
/// one. Every pointer layer in front of the encoder adds `null`: a nil
/// pointer never reaches the encoder.
pub(crate) fn classify(descriptor: &TypeDescriptor, schema: &mut Schema) -> bool {
    let encoding = if provides(descriptor, Encoding::Structured) {
        Encoding::Structured
    } else if provides(descriptor, Encoding::Text) {
        Encoding::Text
    } else {
        return false;
    };

    let stripped: Arc<TypeDescriptor>;
    let target = match descriptor.kind() {
        TypeKind::Pointer(referent) => {
            schema.type_add(JsonSchemaType::Null);
            stripped = strip_pointers(referent.resolve(), schema);
            &*stripped
        }
        _ => descriptor,
    };

    let Some(encoder) = reachable(target, encoding, &mut Vec::new()) else {
        return false;
    };

    let mut value = Value::zero(target);
    let settled = match encoding {
        Encoding::Structured => {
            probe_json(&encoder, &value, schema)
                || (make_witness(target, &mut value) && probe_json(&encoder, &value, schema))
        }
        Encoding::Text => {
            probe_text(&encoder, &value, schema)
                || target.is_zero_sized()
                || (make_witness(target, &mut value) && probe_text(&encoder, &value, schema))
        }
    };

    debug!(
        type_name = %descriptor.name(),
        encoding = %encoding,
        settled,
        "Classified type by encoder output"
    );
    settled
}

/// Remove the remaining pointer layers, adding `null` for each
fn strip_pointers(mut descriptor: Arc<TypeDescriptor>, schema: &mut Schema) -> Arc<TypeDescriptor> {
    while let TypeKind::Pointer(referent) = descriptor.kind() {
        schema.type_add(JsonSchemaType::Null);
        let next = referent.resolve();
        descriptor = next;
    }
    descriptor
}

fn probe_json(encoder: &Reachable, value: &Value, schema: &mut Schema) -> bool {
    match encoder.encode(value) {
        Ok(output) => sniff::inspect_json(schema, &output),
        Err(error) => {
            trace!(%error, "Structured encoder refused probe value");
            false
        }
    }
}

fn probe_text(encoder: &Reachable, value: &Value, schema: &mut Schema) -> bool {
    match encoder.encode(value) {
        Ok(output) => {
            sniff::inspect_text(schema, &output);
            true
        }
        Err(error) => {
            trace!(%error, "Text encoder refused probe value");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use chrono::DateTime;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::describe::Field;
    use crate::describe::TypeRef;
    use crate::describe::descriptor_of;
    use crate::json_schema::SchemaFormat;

    fn classified(descriptor: &TypeDescriptor) -> (bool, Schema) {
        let mut schema = Schema::default();
        let settled = classify(descriptor, &mut schema);
        (settled, schema)
    }

    /// `"yes"` for non-empty text, a refusal for empty text
    fn refuses_empty(value: &Value) -> Result<String, EncodeError> {
        match value.field(0).and_then(Value::as_str) {
            Some("") | None => Err(EncodeError::invalid("empty")),
            Some(_) => Ok("yes".to_string()),
        }
    }

    /// `null` for a nil inner pointer, the flag otherwise
    fn ternary_json(value: &Value) -> Result<String, EncodeError> {
        match value.field(0).and_then(Value::deref).and_then(Value::as_bool) {
            Some(flag) => Ok(flag.to_string()),
            None => Ok("null".to_string()),
        }
    }

    fn failing(_: &Value) -> Result<String, EncodeError> { Err(EncodeError::invalid("never")) }

    #[test]
    fn test_well_known_types_are_sniffed() {
        let (settled, schema) = classified(&descriptor_of::<Uuid>());
        assert!(settled);
        assert!(schema.type_is(&[JsonSchemaType::String]));
        assert_eq!(schema.format, Some(SchemaFormat::Uuid));

        let (_, schema) = classified(&descriptor_of::<DateTime<Utc>>());
        assert_eq!(schema.format, Some(SchemaFormat::DateTime));
    }

    #[test]
    fn test_pointer_layers_add_null() {
        let (settled, schema) = classified(&descriptor_of::<Option<Option<Uuid>>>());
        assert!(settled);
        assert!(schema.type_is(&[JsonSchemaType::String, JsonSchemaType::Null]));
        assert_eq!(schema.format, Some(SchemaFormat::Uuid));
    }

    #[test]
    fn test_null_output_retries_with_witness() {
        let descriptor = Arc::new(
            TypeDescriptor::record(
                "Ternary",
                vec![Field::new("flag", TypeRef::of::<Option<bool>>())],
            )
            .with_structured(ternary_json),
        );
        let (settled, schema) = classified(&descriptor);
        assert!(settled);
        assert!(schema.type_is(&[JsonSchemaType::Boolean, JsonSchemaType::Null]));
    }

    #[test]
    fn test_text_refusal_retries_with_witness() {
        let descriptor = Arc::new(
            TypeDescriptor::record(
                "NonEmpty",
                vec![Field::new("text", TypeRef::of::<String>()).private()],
            )
            .with_text(refuses_empty),
        );
        let (settled, schema) = classified(&descriptor);
        assert!(settled);
        assert!(schema.type_is(&[JsonSchemaType::String]));
    }

    #[test]
    fn test_zero_sized_text_type_is_settled_without_output() {
        let descriptor = Arc::new(TypeDescriptor::record("Marker", Vec::new()).with_text(failing));
        let (settled, schema) = classified(&descriptor);
        assert!(settled);
        assert!(schema.schema_type.is_empty());
    }

    #[test]
    fn test_structured_failure_is_unsettled() {
        let descriptor =
            Arc::new(TypeDescriptor::new("Broken", TypeKind::String).with_structured(failing));
        let (settled, _) = classified(&descriptor);
        assert!(!settled);
    }

    #[test]
    fn test_encoders_promote_from_embedded_fields() {
        let outer = TypeDescriptor::record(
            "WrapsTime",
            vec![Field::new("at", TypeRef::of::<Option<DateTime<Utc>>>()).embedded()],
        );
        assert!(provides(&outer, Encoding::Structured));

        let plain = TypeDescriptor::record(
            "HoldsTime",
            vec![Field::new("at", TypeRef::of::<DateTime<Utc>>())],
        );
        assert!(!provides(&plain, Encoding::Structured));
    }

    #[test]
    fn test_promotion_is_refused_when_ambiguous() {
        let ambiguous = TypeDescriptor::record(
            "TwoIds",
            vec![
                Field::new("left", TypeRef::of::<Uuid>()).embedded(),
                Field::new("right", TypeRef::of::<Uuid>()).embedded(),
            ],
        );
        assert!(!provides(&ambiguous, Encoding::Text));
    }

    #[test]
    fn test_promoted_encoder_reads_nil_pointer_as_failure() {
        let outer = Arc::new(TypeDescriptor::record(
            "WrapsTime",
            vec![Field::new("at", TypeRef::of::<Option<DateTime<Utc>>>()).embedded()],
        ));
        // The empty value holds a nil pointer; the witness allocates it.
        let (settled, schema) = classified(&outer);
        assert!(settled);
        assert!(schema.type_is(&[JsonSchemaType::String]));
        assert_eq!(schema.format, Some(SchemaFormat::DateTime));
    }
}
