//! Fixed protocol constants
//!
//! Values the generated documents depend on. None of them is configurable:
//! the registry supports exactly one addressing scheme and the document model
//! targets exactly one OpenAPI version.

// ============================================================================
// DOCUMENT CONSTANTS
// ============================================================================

/// OpenAPI version written into [`crate::Doc::new`] documents
pub const OPENAPI_VERSION: &str = "3.1.0";

/// Prefix of every schema reference produced by the registry
pub const COMPONENT_SCHEMA_PREFIX: &str = "#/components/schemas/";

/// Media type used by the JSON body and response shortcuts
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Status code used by [`crate::Doc::responses_ok_json`]
pub const STATUS_OK: &str = "200";

// ============================================================================
// FORMAT SNIFFING CONSTANTS
// ============================================================================

/// `chrono` layout of a plain calendar date
pub(crate) const LAYOUT_DATE: &str = "%Y-%m-%d";

/// `chrono` layout of an extended local time with a leading designator
pub(crate) const LAYOUT_TIME_T: &str = "T%H:%M:%S";

/// `chrono` layout of an extended local time
pub(crate) const LAYOUT_TIME: &str = "%H:%M:%S";

/// Duration spellings recognized by the sniffer.
///
/// The first four are encodings of a zero duration, the last two of the
/// smallest non-zero duration a witness produces.
pub(crate) const DURATION_LITERALS: [&str; 6] = ["P", "P0", "P0Y", "PT0S", "PT1S", "P1Y"];

/// Length of a UUID written as 32 bare hex digits
pub(crate) const UUID_SIMPLE_LEN: usize = 32;

/// Length of a UUID in canonical 8-4-4-4-12 form
pub(crate) const UUID_HYPHENATED_LEN: usize = 36;

/// Byte offsets of the hyphens in a canonical UUID
pub(crate) const UUID_HYPHEN_OFFSETS: [usize; 4] = [8, 13, 18, 23];
