//! Encoding capabilities
//!
//! A type may carry its own structured (JSON) encoder, its own textual
//! encoder, both, or neither. Neither is the normal case: such types are
//! described purely from their shape. Encoders are plain function pointers
//! over a [`Value`] so descriptors stay `Clone`.

use strum::AsRefStr;
use strum::Display;
use thiserror::Error;

use crate::value::Value;

/// Encoder signature shared by both capabilities.
///
/// Structured encoders return JSON text; textual encoders return the raw
/// text.
pub type EncodeFn = fn(&Value) -> Result<String, EncodeError>;

/// Why an encoder refused a value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The value does not have the shape the encoder reads
    #[error("expected {expected}, found {found}")]
    Shape {
        /// What the encoder wanted to read
        expected: &'static str,
        /// What it got
        found:    String,
    },

    /// The value has the right shape but no valid encoding
    #[error("invalid value: {0}")]
    Invalid(String),
}

impl EncodeError {
    /// Create a shape error from the value actually found
    pub fn shape(expected: &'static str, found: &Value) -> Self {
        Self::Shape {
            expected,
            found: found.kind_name().to_string(),
        }
    }

    /// Create an invalid-value error
    pub fn invalid(details: impl std::fmt::Display) -> Self { Self::Invalid(details.to_string()) }
}

/// The two encoding capabilities a type can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Encoding {
    /// Custom JSON output
    Structured,
    /// Custom text output, written into JSON as a string
    Text,
}

/// Capability set of a type descriptor
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoders {
    /// Custom structured encoder
    pub structured: Option<EncodeFn>,
    /// Custom textual encoder
    pub text:       Option<EncodeFn>,
}

impl Encoders {
    /// Encoder for one capability
    pub const fn get(&self, encoding: Encoding) -> Option<EncodeFn> {
        match encoding {
            Encoding::Structured => self.structured,
            Encoding::Text => self.text,
        }
    }

    /// True when neither capability is present
    pub const fn is_empty(&self) -> bool { self.structured.is_none() && self.text.is_none() }
}
