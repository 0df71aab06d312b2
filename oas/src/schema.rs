//! Schema node model
//!
//! A [`Schema`] is one JSON-Schema-compatible node as embedded in an OpenAPI
//! 3.1 document. Generated schemas only use a handful of keywords (type set,
//! format, properties, items, additional properties, `oneOf`, reference and
//! title); the rest are available for hand-written additions.
//!
//! References:
//! - <https://spec.openapis.org/oas/v3.1.0#schema-object>
//! - <https://datatracker.ietf.org/doc/html/draft-bhutton-json-schema-00>
//! - <https://datatracker.ietf.org/doc/html/draft-bhutton-json-schema-validation-00>

use std::collections::BTreeMap;

use error_stack::Report;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::constants::COMPONENT_SCHEMA_PREFIX;
use crate::error::Error;
use crate::error::Result;
use crate::json_schema::JsonSchemaType;
use crate::json_schema::SchemaFormat;

/// Named schemas, as used for `properties` and the component registry
pub type Schemas = BTreeMap<String, Schema>;

/// One schema node.
///
/// A reference schema (`$ref`) carries nothing else except an optional
/// summary and description; [`Schema::reference_to`] and the registry keep it
/// that way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    /// Reference to a registered component
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference:             Option<String>,
    /// Short summary, allowed next to a reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary:               Option<String>,
    /// Long description, allowed next to a reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description:           Option<String>,
    /// Human readable name, set to the canonical type name by the generator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title:                 Option<String>,
    /// Primitive type set; `null` is kept last
    #[serde(rename = "type", skip_serializing_if = "Vec::is_empty")]
    pub schema_type:           Vec<JsonSchemaType>,
    /// Refined format of the primitive type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format:                Option<SchemaFormat>,
    /// Subschemas that must all match
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of:                Vec<Self>,
    /// Subschemas of which at least one must match
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any_of:                Vec<Self>,
    /// Subschemas of which exactly one must match
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of:                Vec<Self>,
    /// Subschema that must not match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not:                   Option<Box<Self>>,
    /// Positional item schemas
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prefix_items:          Vec<Self>,
    /// Schema of every array item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items:                 Option<Box<Self>>,
    /// Schemas of named object properties
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties:            Schemas,
    /// Schema of the values of properties not listed in `properties`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Self>>,
    /// Properties that must be present
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required:              Vec<String>,
    /// Allowed values
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values:           Vec<Value>,
    /// The single allowed value
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value:           Option<Value>,
    /// Numeric divisor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of:           Option<f64>,
    /// Inclusive upper bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum:               Option<f64>,
    /// Exclusive upper bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum:     Option<f64>,
    /// Inclusive lower bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum:               Option<f64>,
    /// Exclusive lower bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum:     Option<f64>,
    /// Longest allowed string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length:            Option<u64>,
    /// Shortest allowed string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length:            Option<u64>,
    /// Regular expression strings must match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern:               Option<String>,
    /// Largest allowed array
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items:             Option<u64>,
    /// Smallest allowed array
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items:             Option<u64>,
    /// Whether array items must be distinct
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unique_items:          bool,
    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default:               Option<Value>,
    /// Example values
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples:              Vec<Value>,
    /// Whether the described value is deprecated
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated:            bool,
    /// Whether the value only appears in responses
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub read_only:             bool,
    /// Whether the value only appears in requests
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub write_only:            bool,
}

impl Schema {
    /// Schema with a single primitive type
    pub fn of_type(schema_type: JsonSchemaType) -> Self {
        Self {
            schema_type: vec![schema_type],
            ..Self::default()
        }
    }

    /// Reference-only schema pointing at `#/components/schemas/<name>`
    pub fn reference_to(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(Report::new(Error::MissingTitle));
        }
        Ok(Self {
            reference: Some(format!("{COMPONENT_SCHEMA_PREFIX}{name}")),
            ..Self::default()
        })
    }

    /// Wrap `inner` in a `oneOf` with `null`.
    ///
    /// `null` goes second: documentation viewers tend to render the first
    /// member as the example.
    pub fn null_of(title: impl Into<String>, inner: Self) -> Self {
        Self {
            title: Some(title.into()),
            one_of: vec![inner, Self::of_type(JsonSchemaType::Null)],
            ..Self::default()
        }
    }

    /// Title, required to be present and non-empty
    pub fn valid_title(&self) -> Result<&str> {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => Ok(title),
            _ => Err(Report::new(Error::MissingTitle).attach(format!("Schema: {self:?}"))),
        }
    }

    /// Add `null` to the type set.
    ///
    /// For nullability by wrapping see [`Schema::null_of`].
    pub fn nullable(&mut self) -> Result<()> {
        if let Some(reference) = &self.reference {
            return Err(Report::new(Error::NullableReference(reference.clone())));
        }
        self.type_add(JsonSchemaType::Null);
        Ok(())
    }

    /// True if the type set, `oneOf` or `anyOf` admits `null`.
    ///
    /// `false` does not prove non-nullability: a reference may point at a
    /// nullable component.
    pub fn is_nullable(&self) -> bool {
        self.type_has(JsonSchemaType::Null)
            || self.one_of.iter().any(Self::is_nullable)
            || self.any_of.iter().any(Self::is_nullable)
    }

    /// Replace the type set
    pub fn type_replace(&mut self, types: impl IntoIterator<Item = JsonSchemaType>) -> &mut Self {
        self.schema_type = types.into_iter().collect();
        self
    }

    /// Add a type to the set, keeping `null` last
    pub fn type_add(&mut self, schema_type: JsonSchemaType) -> &mut Self {
        if self.type_has(schema_type) {
            return self;
        }
        if self.schema_type.last() == Some(&JsonSchemaType::Null) {
            let at = self.schema_type.len() - 1;
            self.schema_type.insert(at, schema_type);
        } else {
            self.schema_type.push(schema_type);
        }
        self
    }

    /// True if `schema_type` is in the type set
    pub fn type_has(&self, schema_type: JsonSchemaType) -> bool {
        self.schema_type.contains(&schema_type)
    }

    /// True if the type set is exactly `types`, in order
    pub fn type_is(&self, types: &[JsonSchemaType]) -> bool { self.schema_type == types }

    /// True for `$ref` schemas
    pub const fn is_reference(&self) -> bool { self.reference.is_some() }

    /// True for the empty body the registry uses as a reservation
    pub fn is_placeholder(&self) -> bool { *self == Self::default() }

    /// Component name a reference points at, if it uses the registry prefix
    pub fn component_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|reference| reference.strip_prefix(COMPONENT_SCHEMA_PREFIX))
    }

    /// Builder method to attach a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Turn this schema into a reference to `name`, dropping everything else
    pub(crate) fn set_ref(&mut self, name: &str) -> Result<()> {
        if let Some(existing) = &self.reference {
            return Err(Report::new(Error::double_reference(name, existing.clone()))
                .attach("Attempted to componentize a schema that is already a reference"));
        }
        *self = Self::reference_to(name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use serde_json::json;

    use super::*;

    #[test]
    fn test_type_add_keeps_null_last() {
        let mut schema = Schema::of_type(JsonSchemaType::Null);
        schema
            .type_add(JsonSchemaType::String)
            .type_add(JsonSchemaType::String);
        assert_eq!(
            schema.schema_type,
            vec![JsonSchemaType::String, JsonSchemaType::Null]
        );
    }

    #[test]
    fn test_nullable_is_idempotent_and_rejects_references() {
        let mut schema = Schema::of_type(JsonSchemaType::Integer);
        schema.nullable().unwrap();
        schema.nullable().unwrap();
        assert!(schema.type_is(&[JsonSchemaType::Integer, JsonSchemaType::Null]));

        let mut reference = Schema::reference_to("Pair").unwrap();
        let error = reference.nullable().unwrap_err();
        assert!(matches!(
            error.current_context(),
            Error::NullableReference(_)
        ));
    }

    #[test]
    fn test_null_of_is_nullable_through_one_of() {
        let wrapped = Schema::null_of("Option<Pair>", Schema::reference_to("Pair").unwrap());
        assert!(wrapped.is_nullable());
        assert!(!wrapped.is_reference());
        assert_eq!(
            serde_json::to_value(&wrapped).unwrap(),
            json!({
                "title": "Option<Pair>",
                "oneOf": [
                    { "$ref": "#/components/schemas/Pair" },
                    { "type": ["null"] }
                ]
            })
        );
    }

    #[test]
    fn test_reference_to_requires_a_name() {
        let error = Schema::reference_to("").unwrap_err();
        assert_eq!(error.current_context(), &Error::MissingTitle);
        assert_eq!(
            Schema::reference_to("Pair").unwrap().component_name(),
            Some("Pair")
        );
    }

    #[test]
    fn test_set_ref_refuses_double_indirection() {
        let mut schema = Schema::reference_to("Inner").unwrap();
        let error = schema.set_ref("Outer").unwrap_err();
        assert!(matches!(
            error.current_context(),
            Error::DoubleReference { .. }
        ));
    }

    #[test]
    fn test_serialization_omits_empty_keywords() {
        let mut schema = Schema::of_type(JsonSchemaType::Array);
        schema.title = Some("[u8; 4]".to_string());
        schema.min_items = Some(4);
        schema.max_items = Some(4);
        schema.items = Some(Box::new(Schema::of_type(JsonSchemaType::Integer)));
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "title": "[u8; 4]",
                "type": ["array"],
                "items": { "type": ["integer"] },
                "maxItems": 4,
                "minItems": 4
            })
        );

        let back: Schema = serde_json::from_value(serde_json::to_value(&schema).unwrap()).unwrap();
        assert_eq!(back, schema);
    }
}
