//! Inventory API document assembly and output

use std::io::Write;
use std::path::Path;

use error_stack::ResultExt;
use tracing::info;
use typed_oas::Body;
use typed_oas::CONTENT_TYPE_JSON;
use typed_oas::Content;
use typed_oas::Doc;
use typed_oas::Info;
use typed_oas::Method;
use typed_oas::Operation;
use typed_oas::ParamLocation;
use typed_oas::Response;
use typed_oas::Server;
use typed_oas::Tag;
use uuid::Uuid;

use crate::error::Error;
use crate::error::Result;
use crate::models::ApiError;
use crate::models::Item;
use crate::models::ItemPage;
use crate::models::NewItem;

const API_TITLE: &str = "Inventory";
const API_VERSION: &str = "1.0.0";
const DEFAULT_SERVER: &str = "http://localhost:8080";
const ITEMS_TAG: &str = "items";

/// Document describing every inventory route
pub fn build_document() -> Result<Doc> {
    let mut doc = Doc::new();
    doc.info = Info {
        title: API_TITLE.to_string(),
        version: API_VERSION.to_string(),
        description: Some("Stock levels and prices of stocked items".to_string()),
        ..Info::default()
    };
    doc.servers.push(Server {
        url: DEFAULT_SERVER.to_string(),
        ..Server::default()
    });
    doc.tags.push(Tag {
        name: ITEMS_TAG.to_string(),
        ..Tag::default()
    });

    add_routes(&mut doc).change_context(Error::Generation)?;

    info!(
        paths = doc.paths.len(),
        components = doc.components.schemas.len(),
        "Built API document"
    );
    Ok(doc)
}

fn add_routes(doc: &mut Doc) -> typed_oas::Result<()> {
    let error_media = doc.schema_media::<ApiError>()?;
    let error_response = Response {
        description: "Request failed".to_string(),
        content: Content::from([(CONTENT_TYPE_JSON.to_string(), error_media)]),
        ..Response::default()
    };
    doc.components
        .responses
        .insert("Error".to_string(), error_response);

    let list = Operation {
        tags: vec![ITEMS_TAG.to_string()],
        operation_id: Some("listItems".to_string()),
        parameters: vec![
            doc.param::<u32>("limit", ParamLocation::Query)?,
            doc.param::<String>("cursor", ParamLocation::Query)?,
        ],
        responses: doc.responses_ok_json::<ItemPage>()?,
        ..Operation::default()
    };
    doc.route("/items", Method::Get, list);

    let create = Operation {
        tags: vec![ITEMS_TAG.to_string()],
        operation_id: Some("createItem".to_string()),
        request_body: Some(Body {
            required: true,
            ..doc.json_body::<NewItem>()?
        }),
        responses: doc.responses_ok_json::<Item>()?,
        ..Operation::default()
    };
    doc.route("/items", Method::Post, create);

    let fetch = Operation {
        tags: vec![ITEMS_TAG.to_string()],
        operation_id: Some("getItem".to_string()),
        parameters: vec![doc.param::<Uuid>("id", ParamLocation::Path)?],
        responses: doc.responses_ok_json::<Item>()?,
        ..Operation::default()
    };
    doc.route("/items/{id}", Method::Get, fetch);

    let delete = Operation {
        tags: vec![ITEMS_TAG.to_string()],
        operation_id: Some("deleteItem".to_string()),
        parameters: vec![doc.param::<Uuid>("id", ParamLocation::Path)?],
        ..Operation::default()
    };
    doc.route("/items/{id}", Method::Delete, delete);

    Ok(())
}

/// Write `doc` as pretty JSON to `output`, or to stdout when `None`
pub fn write_document(doc: &Doc, output: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(doc).change_context(Error::Serialization)?;

    match output {
        Some(path) => {
            std::fs::write(path, text + "\n")
                .change_context_lazy(|| Error::Output(path.display().to_string()))?;
            info!(path = %path.display(), "Wrote API document");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}")
                .change_context_lazy(|| Error::Output("stdout".to_string()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use serde_json::json;

    use super::*;

    fn reference(name: &str) -> serde_json::Value {
        json!({ "$ref": format!("#/components/schemas/{name}") })
    }

    #[test]
    fn test_document_registers_every_composite() {
        let doc = build_document().unwrap();
        let mut names = doc
            .components
            .schemas
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>();
        names.sort_unstable();
        assert_eq!(
            names,
            [
                "ApiError",
                "BTreeMap<String, String>",
                "Item",
                "ItemPage",
                "NewItem",
                "Vec<Item>",
                "Vec<String>",
            ]
        );
    }

    #[test]
    fn test_item_schema() {
        let doc = build_document().unwrap();
        let item = serde_json::to_value(doc.lookup_component("Item").unwrap().unwrap()).unwrap();
        assert_eq!(
            item,
            json!({
                "title": "Item",
                "type": ["object"],
                "properties": {
                    "id": { "title": "Uuid", "type": ["string"], "format": "uuid" },
                    "sku": { "title": "Sku", "type": ["string"] },
                    "name": { "title": "String", "type": ["string"] },
                    "price": { "title": "Money", "type": ["string"] },
                    "tags": reference("Vec<String>"),
                    "restock_on": {
                        "title": "Option<NaiveDate>",
                        "type": ["string", "null"],
                        "format": "date"
                    },
                    "attributes": reference("BTreeMap<String, String>"),
                    "created_at": { "title": "DateTime<Utc>", "type": ["string"], "format": "date-time" },
                    "updated_at": {
                        "title": "Option<DateTime<Utc>>",
                        "type": ["string", "null"],
                        "format": "date-time"
                    }
                }
            })
        );
    }

    #[test]
    fn test_routes() {
        let doc = build_document().unwrap();
        let document = serde_json::to_value(&doc).unwrap();

        let list = &document["paths"]["/items"]["get"];
        assert_eq!(list["summary"], "/items");
        assert_eq!(
            list["responses"]["200"]["content"]["application/json"]["schema"],
            reference("ItemPage")
        );
        assert_eq!(document["paths"]["/items/{id}"]["delete"]["parameters"][0]["required"], true);
        assert_eq!(
            document["components"]["responses"]["Error"]["content"]["application/json"]["schema"],
            reference("ApiError")
        );
    }

    #[test]
    fn test_write_document_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.json");
        let doc = build_document().unwrap();

        write_document(&doc, Some(&path)).unwrap();

        let written: Doc =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, doc);
    }

    #[test]
    fn test_write_document_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("openapi.json");
        let doc = Doc::new();

        let error = write_document(&doc, Some(&path)).unwrap_err();
        assert!(matches!(error.current_context(), Error::Output(_)));
    }
}
