//! OpenAPI 3.1 document objects
//!
//! Plain data, one struct per object of <https://spec.openapis.org/oas/v3.1.0>.
//! Empty fields are omitted when serialized.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use strum::AsRefStr;
use strum::Display;
use strum::EnumString;

use crate::registry::ComponentRegistry;
use crate::schema::Schema;

/// Media types keyed by content type
pub type Content = BTreeMap<String, MediaType>;

/// Responses keyed by status code or `default`
pub type Responses = BTreeMap<String, Response>;

/// Headers keyed by name
pub type Headers = BTreeMap<String, Header>;

/// <https://spec.openapis.org/oas/v3.1.0#info-object>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Info {
    /// API title
    pub title:            String,
    /// Short summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary:          Option<String>,
    /// Long description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description:      Option<String>,
    /// URL of the terms of service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    /// Contact of the API owners
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact:          Option<Contact>,
    /// License of the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license:          Option<License>,
    /// API version, unrelated to the OpenAPI version
    pub version:          String,
}

/// <https://spec.openapis.org/oas/v3.1.0#contact-object>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    /// Person or organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name:  Option<String>,
    /// Contact URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url:   Option<String>,
    /// Contact email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// <https://spec.openapis.org/oas/v3.1.0#license-object>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct License {
    /// License name
    pub name:       String,
    /// SPDX expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// License URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url:        Option<String>,
}

/// <https://spec.openapis.org/oas/v3.1.0#server-object>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    /// Server URL, possibly templated
    pub url:         String,
    /// Server description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Substitutions for the URL template
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables:   BTreeMap<String, ServerVariable>,
}

/// <https://spec.openapis.org/oas/v3.1.0#server-variable-object>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerVariable {
    /// Allowed values
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Value used when none is supplied
    pub default:     String,
    /// Variable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// <https://spec.openapis.org/oas/v3.1.0#external-documentation-object>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalDocs {
    /// Target URL
    pub url:         String,
    /// What the target documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// <https://spec.openapis.org/oas/v3.1.0#tag-object>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tag {
    /// Tag name
    pub name:          String,
    /// Tag description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description:   Option<String>,
    /// Additional documentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
}

/// HTTP methods an operation can be registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
    /// `PATCH`
    Patch,
    /// `TRACE`
    Trace,
}

/// <https://spec.openapis.org/oas/v3.1.0#path-item-object>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathItem {
    /// Summary shared by all operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary:     Option<String>,
    /// Description shared by all operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `GET` operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get:         Option<Operation>,
    /// `PUT` operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put:         Option<Operation>,
    /// `POST` operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post:        Option<Operation>,
    /// `DELETE` operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete:      Option<Operation>,
    /// `OPTIONS` operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options:     Option<Operation>,
    /// `HEAD` operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head:        Option<Operation>,
    /// `PATCH` operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch:       Option<Operation>,
    /// `TRACE` operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace:       Option<Operation>,
    /// Servers overriding the document servers
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers:     Vec<Server>,
    /// Parameters shared by all operations
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters:  Vec<Param>,
}

impl PathItem {
    /// Store `operation` under `method`, replacing any previous one
    pub fn set_method(&mut self, method: Method, operation: Operation) -> &mut Self {
        *self.method_mut(method) = Some(operation);
        self
    }

    /// Operation registered under `method`
    pub const fn method(&self, method: Method) -> Option<&Operation> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Delete => self.delete.as_ref(),
            Method::Options => self.options.as_ref(),
            Method::Head => self.head.as_ref(),
            Method::Patch => self.patch.as_ref(),
            Method::Trace => self.trace.as_ref(),
        }
    }

    const fn method_mut(&mut self, method: Method) -> &mut Option<Operation> {
        match method {
            Method::Get => &mut self.get,
            Method::Put => &mut self.put,
            Method::Post => &mut self.post,
            Method::Delete => &mut self.delete,
            Method::Options => &mut self.options,
            Method::Head => &mut self.head,
            Method::Patch => &mut self.patch,
            Method::Trace => &mut self.trace,
        }
    }
}

/// <https://spec.openapis.org/oas/v3.1.0#operation-object>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    /// Tag names used to group operations
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags:          Vec<String>,
    /// Short summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary:       Option<String>,
    /// Long description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description:   Option<String>,
    /// Additional documentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    /// Unique operation identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id:  Option<String>,
    /// Operation parameters
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters:    Vec<Param>,
    /// Request body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body:  Option<Body>,
    /// Possible responses
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responses:     Responses,
    /// Operation is deprecated
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated:    bool,
    /// Security requirements overriding the document ones
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security:      Vec<SecurityRequirement>,
    /// Servers overriding the path and document servers
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers:       Vec<Server>,
}

/// Where a parameter is read from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Query string
    Query,
    /// Request header
    Header,
    /// Templated path segment
    Path,
    /// Cookie
    Cookie,
}

/// <https://spec.openapis.org/oas/v3.1.0#parameter-object>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    /// Parameter name
    pub name:              String,
    /// Parameter location
    #[serde(rename = "in")]
    pub location:          ParamLocation,
    /// Parameter description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description:       Option<String>,
    /// Parameter must be supplied; always true for path parameters
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required:          bool,
    /// Parameter is deprecated
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated:        bool,
    /// Empty values are accepted
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_empty_value: bool,
    /// Serialization style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style:             Option<String>,
    /// Arrays and objects produce one parameter per item
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub explode:           bool,
    /// Schema of the parameter value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema:            Option<Schema>,
    /// Example value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example:           Option<Value>,
}

impl Param {
    /// Parameter named `name` read from `location`; path parameters are
    /// marked required
    pub fn new(name: impl Into<String>, location: ParamLocation, schema: Schema) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: location == ParamLocation::Path,
            deprecated: false,
            allow_empty_value: false,
            style: None,
            explode: false,
            schema: Some(schema),
            example: None,
        }
    }
}

/// <https://spec.openapis.org/oas/v3.1.0#request-body-object>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    /// Body description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Accepted media types
    pub content:     Content,
    /// Body must be supplied
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required:    bool,
}

/// <https://spec.openapis.org/oas/v3.1.0#media-type-object>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaType {
    /// Schema of the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema:   Option<Schema>,
    /// Example content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example:  Option<Value>,
    /// Named examples
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub examples: BTreeMap<String, Value>,
}

impl MediaType {
    /// Media type described by `schema`
    pub fn of(schema: Schema) -> Self {
        Self {
            schema: Some(schema),
            ..Self::default()
        }
    }
}

/// <https://spec.openapis.org/oas/v3.1.0#response-object>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Response {
    /// Response description
    pub description: String,
    /// Response headers
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers:     Headers,
    /// Response media types
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub content:     Content,
}

/// <https://spec.openapis.org/oas/v3.1.0#header-object>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Header {
    /// Header description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Header must be present
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required:    bool,
    /// Header is deprecated
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated:  bool,
    /// Schema of the header value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema:      Option<Schema>,
}

/// <https://spec.openapis.org/oas/v3.1.0#security-scheme-object>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityScheme {
    /// `apiKey`, `http`, `mutualTLS`, `oauth2` or `openIdConnect`
    #[serde(rename = "type")]
    pub scheme_type:         String,
    /// Scheme description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description:         Option<String>,
    /// Header, query or cookie name of an API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name:                Option<String>,
    /// Location of an API key
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location:            Option<ParamLocation>,
    /// HTTP authorization scheme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme:              Option<String>,
    /// Format hint of a bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_format:       Option<String>,
    /// OpenID Connect discovery URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_id_connect_url: Option<String>,
}

/// Scheme names mapped to the scopes they require
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// <https://spec.openapis.org/oas/v3.1.0#components-object>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Components {
    /// Schema components, filled by the generator
    #[serde(skip_serializing_if = "ComponentRegistry::is_empty")]
    pub schemas:          ComponentRegistry,
    /// Reusable responses
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responses:        Responses,
    /// Reusable parameters
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters:       BTreeMap<String, Param>,
    /// Reusable request bodies
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub request_bodies:   BTreeMap<String, Body>,
    /// Reusable headers
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers:          Headers,
    /// Security schemes
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub security_schemes: BTreeMap<String, SecurityScheme>,
}
