//! Error and result types of the sample app

use thiserror::Error;

// Error message prefixes
const MSG_FAILED_TO_PREFIX: &str = "Failed to";

/// Result type for the sample app
pub type Result<T> = std::result::Result<T, error_stack::Report<Error>>;

/// Failures while producing the API document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A schema or route could not be generated
    #[error("{MSG_FAILED_TO_PREFIX} generate the API document")]
    Generation,

    /// The document could not be written as JSON
    #[error("{MSG_FAILED_TO_PREFIX} serialize the API document")]
    Serialization,

    /// The output could not be written
    #[error("{MSG_FAILED_TO_PREFIX} write the API document to {0}")]
    Output(String),
}
