//! OpenAPI 3.1 document
//!
//! [`Doc`] is the root object. Its `components.schemas` map is the component
//! registry: every schema shortcut on the document runs the generator against
//! it, so operations embed references and the bodies land in the components.

mod objects;
#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

pub use self::objects::Body;
pub use self::objects::Components;
pub use self::objects::Contact;
pub use self::objects::Content;
pub use self::objects::ExternalDocs;
pub use self::objects::Header;
pub use self::objects::Headers;
pub use self::objects::Info;
pub use self::objects::License;
pub use self::objects::MediaType;
pub use self::objects::Method;
pub use self::objects::Operation;
pub use self::objects::Param;
pub use self::objects::ParamLocation;
pub use self::objects::PathItem;
pub use self::objects::Response;
pub use self::objects::Responses;
pub use self::objects::SecurityRequirement;
pub use self::objects::SecurityScheme;
pub use self::objects::Server;
pub use self::objects::ServerVariable;
pub use self::objects::Tag;
use crate::constants::CONTENT_TYPE_JSON;
use crate::constants::OPENAPI_VERSION;
use crate::constants::STATUS_OK;
use crate::describe::Describe;
use crate::describe::TypeDescriptor;
use crate::error::Result;
use crate::generator::SchemaGenerator;
use crate::schema::Schema;

/// Path items keyed by templated path
pub type Paths = BTreeMap<String, PathItem>;

/// <https://spec.openapis.org/oas/v3.1.0#openapi-object>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Doc {
    /// OpenAPI version the document follows
    pub openapi:             String,
    /// API metadata
    pub info:                Info,
    /// Default `$schema` of the schemas in the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema_dialect: Option<String>,
    /// Target servers
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers:             Vec<Server>,
    /// Routes
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub paths:               Paths,
    /// Incoming requests the API may send
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub webhooks:            Paths,
    /// Reusable objects, including generated schema components
    pub components:          Components,
    /// Security requirements of every operation
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security:            Vec<SecurityRequirement>,
    /// Tag metadata
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags:                Vec<Tag>,
    /// Additional documentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs:       Option<ExternalDocs>,
}

impl Doc {
    /// Empty document targeting OpenAPI 3.1
    pub fn new() -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            ..Self::default()
        }
    }

    /// Register `operation` under `path` and `method`.
    ///
    /// An operation without a summary is summarized by its path, so viewers
    /// do not derive one from the description.
    pub fn route(&mut self, path: &str, method: Method, mut operation: Operation) -> &mut Self {
        if operation.summary.as_deref().is_none_or(str::is_empty) {
            operation.summary = Some(path.to_string());
        }
        debug!(path, method = %method, "Registered route");
        self.paths
            .entry(path.to_string())
            .or_default()
            .set_method(method, operation);
        self
    }

    /// Schema of `T`; composite types are registered as components and
    /// returned as references
    pub fn schema_for<T: Describe + ?Sized + 'static>(&mut self) -> Result<Schema> {
        self.generator().schema_for::<T>()
    }

    /// Schema of a described type; `None` yields a bare `null` schema
    pub fn type_schema(&mut self, descriptor: Option<&TypeDescriptor>) -> Result<Schema> {
        self.generator().type_schema(descriptor)
    }

    /// Media type whose schema is the schema of `T`
    pub fn schema_media<T: Describe + ?Sized + 'static>(&mut self) -> Result<MediaType> {
        Ok(MediaType::of(self.schema_for::<T>()?))
    }

    /// Request body carrying `T` as JSON
    pub fn json_body<T: Describe + ?Sized + 'static>(&mut self) -> Result<Body> {
        Ok(Body {
            content: Content::from([(CONTENT_TYPE_JSON.to_string(), self.schema_media::<T>()?)]),
            ..Body::default()
        })
    }

    /// Responses made of a single `200` carrying `T` as JSON
    pub fn responses_ok_json<T: Describe + ?Sized + 'static>(&mut self) -> Result<Responses> {
        let response = Response {
            content: Content::from([(CONTENT_TYPE_JSON.to_string(), self.schema_media::<T>()?)]),
            ..Response::default()
        };
        Ok(Responses::from([(STATUS_OK.to_string(), response)]))
    }

    /// Parameter `name` read from `location`, typed as `T`
    pub fn param<T: Describe + ?Sized + 'static>(
        &mut self,
        name: &str,
        location: ParamLocation,
    ) -> Result<Param> {
        Ok(Param::new(name, location, self.schema_for::<T>()?))
    }

    /// Schema component registered under the exact name `name`
    pub fn lookup_component(&self, name: &str) -> Result<Option<&Schema>> {
        self.components.schemas.lookup(name)
    }

    /// Schema component a `#/components/schemas/` reference points at
    pub fn resolve_ref(&self, reference: &str) -> Result<Option<&Schema>> {
        self.components.schemas.resolve(reference)
    }

    /// `schema` itself when inline, otherwise the component it references
    pub fn deref_schema<'a>(&'a self, schema: &'a Schema) -> Result<Option<&'a Schema>> {
        self.components.schemas.deref(schema)
    }

    fn generator(&mut self) -> SchemaGenerator<'_> {
        SchemaGenerator::new(&mut self.components.schemas)
    }
}
