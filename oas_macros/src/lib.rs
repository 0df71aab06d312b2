//! Procedural macros for typed_oas

mod attributes;
mod describe;

use proc_macro::TokenStream;

/// Derives `typed_oas::Describe` for a non-generic struct.
///
/// # Example
///
/// ```ignore
/// #[derive(Describe, Serialize)]
/// #[serde(rename_all = "camelCase")]
/// pub struct Order {
///     pub order_id: Uuid,
///     #[serde(flatten)]
///     pub audit:    Audit,
///     #[describe(skip)]
///     pub cache:    Vec<u8>,
///     secret:       String,
/// }
///
/// #[derive(Describe)]
/// #[describe(name = "Temperature", text = encode_celsius)]
/// pub struct Celsius(f64);
/// ```
///
/// Shapes:
/// - named fields: a record with one field per struct field
/// - one unnamed field: a named alias of the inner type (encoders are not inherited)
/// - several unnamed fields: a record with fields `0`, `1`, ...
/// - unit struct: an empty record
///
/// Only `pub` fields are visible. Field attributes: `#[describe(rename = "..")]`,
/// `#[describe(skip)]`, `#[describe(embed)]`, and the serde equivalents `rename`,
/// `skip`, `skip_serializing` and `flatten`. Type attributes: `#[describe(name = "..")]`,
/// `#[describe(json = path)]`, `#[describe(text = path)]` and `#[serde(rename_all = "..")]`.
///
/// The canonical name defaults to the struct identifier. Two documented structs with the same
/// identifier are rejected at generation time; give one of them `#[describe(name = "..")]`.
#[proc_macro_derive(Describe, attributes(describe, serde))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    describe::derive_describe_impl(input)
}
