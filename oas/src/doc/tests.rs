//! Tests for the document model and its schema shortcuts

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::str::FromStr;

use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::error::Error;
use crate::json_schema::JsonSchemaType;
use crate::json_schema::SchemaFormat;

#[test]
fn test_new_document_targets_openapi_3_1() {
    let doc = Doc::new();
    assert_eq!(doc.openapi, "3.1.0");
    assert_eq!(
        serde_json::to_value(&doc).unwrap(),
        json!({
            "openapi": "3.1.0",
            "info": { "title": "", "version": "" },
            "components": {}
        })
    );
}

#[test]
fn test_route_embeds_references_and_registers_components() {
    let mut doc = Doc::new();
    let body = doc.json_body::<Vec<String>>().unwrap();
    doc.route(
        "/",
        Method::Get,
        Operation {
            request_body: Some(body),
            ..Operation::default()
        },
    );

    let operation = doc.paths["/"].method(Method::Get).unwrap();
    assert_eq!(operation.summary.as_deref(), Some("/"));
    let schema = operation.request_body.as_ref().unwrap().content[CONTENT_TYPE_JSON]
        .schema
        .as_ref()
        .unwrap();
    assert_eq!(
        schema.reference.as_deref(),
        Some("#/components/schemas/Vec<String>")
    );

    let body = doc.deref_schema(schema).unwrap().unwrap();
    assert!(body.type_is(&[JsonSchemaType::Array, JsonSchemaType::Null]));
    assert_eq!(
        serde_json::to_value(&doc.components).unwrap(),
        json!({
            "schemas": {
                "Vec<String>": {
                    "title": "Vec<String>",
                    "type": ["array", "null"],
                    "items": { "title": "String", "type": ["string"] }
                }
            }
        })
    );
}

#[test]
fn test_route_keeps_explicit_summary_and_other_methods() {
    let mut doc = Doc::new();
    doc.route("/items", Method::Get, Operation::default());
    doc.route(
        "/items",
        Method::Post,
        Operation {
            summary: Some("Create item".to_string()),
            ..Operation::default()
        },
    );

    let item = &doc.paths["/items"];
    assert_eq!(
        item.method(Method::Get).unwrap().summary.as_deref(),
        Some("/items")
    );
    assert_eq!(
        item.method(Method::Post).unwrap().summary.as_deref(),
        Some("Create item")
    );
    assert!(item.method(Method::Delete).is_none());
}

#[test]
fn test_methods_parse_case_insensitively() {
    assert_eq!(Method::from_str("patch").unwrap(), Method::Patch);
    assert_eq!(Method::Options.to_string(), "OPTIONS");
    assert!(Method::from_str("CONNECT").is_err());
}

#[test]
fn test_responses_ok_json() {
    let mut doc = Doc::new();
    let responses = doc.responses_ok_json::<Option<Uuid>>().unwrap();
    let schema = responses["200"].content[CONTENT_TYPE_JSON]
        .schema
        .as_ref()
        .unwrap();
    assert!(schema.type_is(&[JsonSchemaType::String, JsonSchemaType::Null]));
    assert_eq!(schema.format, Some(SchemaFormat::Uuid));
    assert!(doc.components.schemas.is_empty());
}

#[test]
fn test_path_params_are_required() {
    let mut doc = Doc::new();
    let id = doc.param::<Uuid>("id", ParamLocation::Path).unwrap();
    let limit = doc.param::<u32>("limit", ParamLocation::Query).unwrap();
    assert_eq!(
        serde_json::to_value([id, limit]).unwrap(),
        json!([
            {
                "name": "id",
                "in": "path",
                "required": true,
                "schema": { "title": "Uuid", "type": ["string"], "format": "uuid" }
            },
            {
                "name": "limit",
                "in": "query",
                "schema": { "title": "u32", "type": ["integer"], "format": "int32" }
            }
        ])
    );
}

#[test]
fn test_component_lookups() {
    let mut doc = Doc::new();
    doc.schema_for::<Vec<u8>>().unwrap();

    assert!(doc.lookup_component("Vec<u8>").unwrap().is_some());
    assert!(doc.lookup_component("Vec<u16>").unwrap().is_none());
    assert!(
        doc.resolve_ref("#/components/schemas/Vec<u8>")
            .unwrap()
            .is_some()
    );
    assert!(matches!(
        doc.resolve_ref("Vec<u8>").unwrap_err().current_context(),
        Error::UnknownReferencePath(_)
    ));
}

#[test]
fn test_generation_errors_surface_through_shortcuts() {
    let mut doc = Doc::new();
    let error = doc.json_body::<fn() -> u8>().unwrap_err();
    assert!(matches!(
        error.current_context(),
        Error::UnsupportedKind { .. }
    ));
}

#[test]
fn test_document_round_trips_through_json() {
    let mut doc = Doc::new();
    doc.info = Info {
        title: "Inventory".to_string(),
        version: "1.0.0".to_string(),
        ..Info::default()
    };
    let responses = doc.responses_ok_json::<Vec<String>>().unwrap();
    doc.route(
        "/items",
        Method::Get,
        Operation {
            responses,
            ..Operation::default()
        },
    );

    let text = serde_json::to_string(&doc).unwrap();
    let parsed: Doc = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, doc);
}
