//! Dynamic values
//!
//! A [`Value`] is an instance of a described type. The classifier builds the
//! empty value of a type, may turn it into a non-default witness, and hands it
//! to the type's encoder. Values are never validated against their
//! descriptor; an encoder receiving the wrong shape reports an
//! [`crate::EncodeError`].

use crate::describe::TypeDescriptor;
use crate::describe::TypeKind;

/// One instance of a described type
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Signed integer of any width
    Int(i128),
    /// Unsigned integer of any width
    Uint(u128),
    /// Float of any width
    Float(f64),
    /// String or character
    String(String),
    /// Optional value; `None` encodes as `null`
    Pointer(Option<Box<Self>>),
    /// Fixed-size array, always holding its declared number of elements
    Array(Vec<Self>),
    /// Growable sequence
    Slice(Vec<Self>),
    /// Key/value entries in insertion order
    Map(Vec<(Self, Self)>),
    /// Record slots, one per declared field
    Record(RecordValue),
    /// Instance of a kind that has no data representation
    Opaque,
}

/// Field slots of a record value.
///
/// Slots are readable by anyone. Writing goes through the crate-internal
/// accessor used by witness synthesis, since that is the only place allowed
/// to touch fields regardless of their visibility.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordValue {
    slots: Vec<Value>,
}

impl RecordValue {
    /// Record value from slots in field order
    pub const fn new(slots: Vec<Value>) -> Self { Self { slots } }

    /// Slot of the field at `index`
    pub fn get(&self, index: usize) -> Option<&Value> { self.slots.get(index) }

    /// Number of slots
    pub const fn len(&self) -> usize { self.slots.len() }

    /// True for records without fields
    pub const fn is_empty(&self) -> bool { self.slots.is_empty() }

    /// Slots in field order
    pub fn iter(&self) -> impl Iterator<Item = &Value> { self.slots.iter() }

    pub(crate) fn slots_mut(&mut self) -> &mut [Value] { &mut self.slots }
}

impl Value {
    /// The empty value of a type: zero numbers, empty strings and
    /// collections, nil pointers, fixed arrays of empty elements.
    pub fn zero(descriptor: &TypeDescriptor) -> Self {
        match descriptor.kind() {
            TypeKind::Bool => Self::Bool(false),
            TypeKind::Int { signed: true, .. } => Self::Int(0),
            TypeKind::Int { signed: false, .. } => Self::Uint(0),
            TypeKind::Float { .. } => Self::Float(0.0),
            TypeKind::String => Self::String(String::new()),
            TypeKind::Pointer(_) => Self::Pointer(None),
            TypeKind::Array { element, len } => {
                let element = element.resolve();
                Self::Array((0..*len).map(|_| Self::zero(&element)).collect())
            }
            TypeKind::Slice(_) => Self::Slice(Vec::new()),
            TypeKind::Map { .. } => Self::Map(Vec::new()),
            TypeKind::Record(fields) => Self::Record(RecordValue::new(
                fields
                    .iter()
                    .map(|field| Self::zero(&field.descriptor()))
                    .collect(),
            )),
            TypeKind::Callable | TypeKind::Channel | TypeKind::Interface | TypeKind::RawPointer => {
                Self::Opaque
            }
        }
    }

    /// Short name of the variant, for error messages
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "signed integer",
            Self::Uint(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Pointer(_) => "pointer",
            Self::Array(_) => "array",
            Self::Slice(_) => "slice",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::Opaque => "opaque value",
        }
    }

    /// Boolean payload
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Integer payload of either signedness, if it fits `i128`
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Uint(value) => i128::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Integer payload of either signedness, if it fits `i64`
    pub fn as_i64(&self) -> Option<i64> { self.as_i128().and_then(|value| i64::try_from(value).ok()) }

    /// Integer payload of either signedness, if it fits `u64`
    pub fn as_u64(&self) -> Option<u64> { self.as_i128().and_then(|value| u64::try_from(value).ok()) }

    /// Float payload
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// String payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Elements of a fixed array or slice
    pub fn as_elements(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) | Self::Slice(items) => Some(items),
            _ => None,
        }
    }

    /// Record slots
    pub const fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Slot `index` of a record value
    pub fn field(&self, index: usize) -> Option<&Self> { self.as_record()?.get(index) }

    /// Referent of a non-nil pointer; the value itself for anything else
    pub fn deref(&self) -> Option<&Self> {
        match self {
            Self::Pointer(inner) => inner.as_deref().and_then(Self::deref),
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use std::collections::HashMap;

    use super::*;
    use crate::describe::descriptor_of;

    #[test]
    fn test_zero_values_follow_kind() {
        assert_eq!(Value::zero(&descriptor_of::<u16>()), Value::Uint(0));
        assert_eq!(Value::zero(&descriptor_of::<i8>()), Value::Int(0));
        assert_eq!(
            Value::zero(&descriptor_of::<Option<String>>()),
            Value::Pointer(None)
        );
        assert_eq!(
            Value::zero(&descriptor_of::<[bool; 2]>()),
            Value::Array(vec![Value::Bool(false), Value::Bool(false)])
        );
        assert_eq!(
            Value::zero(&descriptor_of::<HashMap<String, i64>>()),
            Value::Map(Vec::new())
        );
    }

    #[test]
    fn test_deref_follows_pointers() {
        let value = Value::Pointer(Some(Box::new(Value::Pointer(Some(Box::new(
            Value::Uint(3),
        ))))));
        assert_eq!(value.deref(), Some(&Value::Uint(3)));
        assert_eq!(Value::Pointer(None).deref(), None);
        assert_eq!(Value::Uint(7).as_u64(), Some(7));
        assert_eq!(Value::Int(-1).as_u64(), None);
    }
}
