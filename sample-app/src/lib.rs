//! Inventory API document
//!
//! Builds the OpenAPI document of a small inventory service from its wire
//! types and writes it as JSON.

pub mod document;
pub mod error;
pub mod logging;
pub mod models;

pub use document::build_document;
pub use document::write_document;
pub use error::Error;
pub use error::Result;
