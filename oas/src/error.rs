use thiserror::Error;

// Error message prefixes
const MSG_CANNOT_PREFIX: &str = "Cannot";
const MSG_MISSING_PREFIX: &str = "Missing";

/// Result type for the `typed_oas` library
pub type Result<T> = std::result::Result<T, error_stack::Report<Error>>;

/// Failures of schema generation and component registration.
///
/// Every variant describes a programming error in the types being documented
/// or in the way the registry is driven. None of them is recoverable by
/// retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Two distinct types share one canonical name
    #[error("{MSG_CANNOT_PREFIX} register schema {0:?}: the name is already bound to a different type")]
    ConflictingComponent(String),

    /// A stored component body is itself a reference
    #[error("double indirection: schema referenced by {name:?} unexpectedly has reference {reference:?}")]
    DoubleReference {
        /// Component name that was looked up
        name:      String,
        /// Reference found in its body
        reference: String,
    },

    /// A reference produced during traversal points at nothing
    #[error("{MSG_MISSING_PREFIX} schema component {0:?}")]
    MissingComponent(String),

    /// A component was referenced or registered under an empty name
    #[error("{MSG_MISSING_PREFIX} schema title")]
    MissingTitle,

    /// Attempt to mark a reference schema as nullable
    #[error("{MSG_CANNOT_PREFIX} mark schema reference {0:?} as nullable")]
    NullableReference(String),

    /// A component name was bound twice
    #[error("redundant schema {0:?}")]
    RedundantComponent(String),

    /// A reference outside of `#/components/schemas/`
    #[error("unsupported schema reference {0:?}")]
    UnknownReferencePath(String),

    /// A top-level type whose kind has no translation rule
    #[error("{MSG_CANNOT_PREFIX} generate schema for type {type_name:?} of kind {kind:?}")]
    UnsupportedKind {
        /// Canonical name of the rejected type
        type_name: String,
        /// Kind tag of the rejected type
        kind:      String,
    },

    /// A map whose key type does not encode as a plain string
    #[error(
        "{MSG_CANNOT_PREFIX} generate schema for map type {map_type:?}: key type {key_type:?} has representation type {found:?} instead of required \"string\""
    )]
    UnsupportedMapKey {
        /// Canonical name of the map type
        map_type: String,
        /// Canonical name of its key type
        key_type: String,
        /// Type set the key schema resolved to
        found:    String,
    },
}

impl Error {
    /// Create an unsupported-kind error for a type name and kind tag
    pub fn unsupported_kind(type_name: impl Into<String>, kind: impl std::fmt::Display) -> Self {
        Self::UnsupportedKind {
            type_name: type_name.into(),
            kind:      kind.to_string(),
        }
    }

    /// Create a double-reference error
    pub fn double_reference(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::DoubleReference {
            name:      name.into(),
            reference: reference.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_type() {
        let error = Error::unsupported_kind("fn()", "Callable");
        assert_eq!(
            error.to_string(),
            "Cannot generate schema for type \"fn()\" of kind \"Callable\""
        );

        let error = Error::double_reference("Pair", "#/components/schemas/Other");
        assert!(error.to_string().contains("\"Pair\""));
        assert!(error.to_string().contains("#/components/schemas/Other"));

        let error = Error::ConflictingComponent("Item".to_string());
        assert_eq!(
            error.to_string(),
            "Cannot register schema \"Item\": the name is already bound to a different type"
        );
    }
}
