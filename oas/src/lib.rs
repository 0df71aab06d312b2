//! OpenAPI 3.1 schemas derived from Rust types
//!
//! Types describe their shape through [`Describe`], usually derived. The
//! schema generator walks those descriptors and writes JSON schemas into the
//! `components.schemas` section of a [`Doc`], returning references for every
//! named composite and inline schemas for scalars.
//!
//! # Usage
//!
//! ```no_run
//! use typed_oas::Describe;
//! use typed_oas::Doc;
//! use typed_oas::Method;
//! use typed_oas::Operation;
//!
//! #[derive(Describe)]
//! pub struct Item {
//!     pub id:    uuid::Uuid,
//!     pub label: Option<String>,
//! }
//!
//! # fn main() -> typed_oas::Result<()> {
//! let mut doc = Doc::new();
//! let responses = doc.responses_ok_json::<Vec<Item>>()?;
//! doc.route("/items", Method::Get, Operation {
//!     responses,
//!     ..Operation::default()
//! });
//! # Ok(())
//! # }
//! ```
//!
//! # Type mapping
//!
//! - integers: `integer`, with `int32`/`int64` formats for the 32 and 64 bit widths
//! - floats: `number`, `float` or `double`
//! - `bool`, `char`, `str`, `String`: `boolean` and `string`
//! - `Option<T>`: the schema of `T` admitting `null`; a reference to a component that does not
//!   admit `null` becomes `oneOf: [$ref, null]`
//! - `Vec<T>` and other sequences: component of type `[array, null]`
//! - `[T; N]`: component of type `array` with `minItems = maxItems = N`
//! - maps: component of type `[object, null]` with `additionalProperties`; keys must be strings
//! - structs: component of type `object` with one property per public field
//!
//! Types with a structured (JSON) or textual encoder are described by the output of that encoder
//! instead: `Uuid` is a `uuid` string, `DateTime<Utc>` a `date-time` string, and so on.
//!
//! Function pointers, channels, raw pointers and `dyn Any` have no schema and are rejected.
//!
//! A failing request leaves the document's components as they were. Component names are the
//! canonical type names, and two distinct types with the same name are rejected with
//! [`Error::ConflictingComponent`].

extern crate self as typed_oas;

mod classify;
mod constants;
mod describe;
mod doc;
mod encode;
mod error;
mod generator;
mod json_schema;
mod registry;
mod schema;
mod value;
mod witness;

pub use classify::provides;
pub use constants::COMPONENT_SCHEMA_PREFIX;
pub use constants::CONTENT_TYPE_JSON;
pub use constants::OPENAPI_VERSION;
pub use constants::STATUS_OK;
pub use describe::Describe;
pub use describe::Field;
pub use describe::FloatWidth;
pub use describe::IntWidth;
pub use describe::TypeDescriptor;
pub use describe::TypeKind;
pub use describe::TypeRef;
pub use describe::descriptor_of;
pub use doc::Body;
pub use doc::Components;
pub use doc::Contact;
pub use doc::Content;
pub use doc::Doc;
pub use doc::ExternalDocs;
pub use doc::Header;
pub use doc::Headers;
pub use doc::Info;
pub use doc::License;
pub use doc::MediaType;
pub use doc::Method;
pub use doc::Operation;
pub use doc::Param;
pub use doc::ParamLocation;
pub use doc::PathItem;
pub use doc::Paths;
pub use doc::Response;
pub use doc::Responses;
pub use doc::SecurityRequirement;
pub use doc::SecurityScheme;
pub use doc::Server;
pub use doc::ServerVariable;
pub use doc::Tag;
pub use encode::EncodeError;
pub use encode::EncodeFn;
pub use encode::Encoders;
pub use encode::Encoding;
pub use error::Error;
pub use error::Result;
pub use generator::SchemaGenerator;
pub use json_schema::JsonSchemaType;
pub use json_schema::SchemaFormat;
pub use registry::ComponentRegistry;
pub use schema::Schema;
pub use schema::Schemas;
pub use typed_oas_macros::Describe;
pub use value::RecordValue;
pub use value::Value;
pub use witness::is_unrepresentable;
pub use witness::make_witness;
