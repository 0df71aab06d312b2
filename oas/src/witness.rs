//! Non-default witness synthesis and representability
//!
//! Some encoders write nothing informative for an empty value (a nil inner
//! pointer encodes as `null`, an empty string may be refused). A witness is a
//! value with at least one non-empty component, built so the classifier can
//! probe the encoder a second time.

use tracing::trace;

use crate::describe::TypeDescriptor;
use crate::describe::TypeKind;
use crate::value::Value;

/// Turn `value` into a non-default value of `descriptor`.
///
/// Returns `false` when no witness exists, in which case `value` may have
/// been partially rewritten but is still a valid value of the type.
pub fn make_witness(descriptor: &TypeDescriptor, value: &mut Value) -> bool {
    witness(descriptor, value, &mut Vec::new())
}

/// `visiting` holds the records being synthesized, outermost first. A record
/// met again below itself has no witness on that path.
fn witness(descriptor: &TypeDescriptor, value: &mut Value, visiting: &mut Vec<String>) -> bool {
    if descriptor.is_zero_sized() {
        return false;
    }
    match descriptor.kind() {
        TypeKind::Int { signed: true, .. } => {
            *value = Value::Int(1);
            true
        }
        TypeKind::Int { signed: false, .. } => {
            *value = Value::Uint(1);
            true
        }
        TypeKind::Float { .. } => {
            *value = Value::Float(1.0);
            true
        }
        TypeKind::Bool => {
            *value = Value::Bool(true);
            true
        }
        TypeKind::String => {
            *value = Value::String(" ".to_string());
            true
        }
        TypeKind::Array { element, .. } => {
            let element = element.resolve();
            match value {
                Value::Array(items) => items
                    .first_mut()
                    .is_some_and(|first| witness(&element, first, visiting)),
                _ => false,
            }
        }
        TypeKind::Slice(element) => {
            let element = element.resolve();
            let mut item = Value::zero(&element);
            if !witness(&element, &mut item, visiting) {
                return false;
            }
            match value {
                Value::Slice(items) => {
                    items.push(item);
                    true
                }
                _ => false,
            }
        }
        TypeKind::Map { key, value: value_type } => {
            let (key, value_type) = (key.resolve(), value_type.resolve());
            let mut entry_key = Value::zero(&key);
            let mut entry_value = Value::zero(&value_type);
            if !witness(&key, &mut entry_key, visiting)
                || !witness(&value_type, &mut entry_value, visiting)
            {
                return false;
            }
            match value {
                Value::Map(entries) => {
                    entries.push((entry_key, entry_value));
                    true
                }
                _ => false,
            }
        }
        TypeKind::Record(fields) => {
            if visiting.iter().any(|name| name == descriptor.name()) {
                trace!(record = %descriptor.name(), "Record re-entered while building a witness");
                return false;
            }
            visiting.push(descriptor.name().to_string());

            // Visible fields are preferred: they are what an encoder most
            // likely reads.
            let visible = fields
                .iter()
                .enumerate()
                .filter(|(_, field)| field.is_visible());
            let all = fields.iter().enumerate();
            for (index, field) in visible.chain(all) {
                let field_type = field.descriptor();
                let mut slot = Value::zero(&field_type);
                if witness(&field_type, &mut slot, visiting) {
                    visiting.pop();
                    return slot_access::write(value, index, slot);
                }
            }
            visiting.pop();
            false
        }
        TypeKind::Pointer(referent) => {
            let referent = referent.resolve();
            match value {
                Value::Pointer(inner) => {
                    let target = inner.get_or_insert_with(|| Box::new(Value::zero(&referent)));
                    witness(&referent, target, visiting)
                }
                _ => false,
            }
        }
        TypeKind::Callable | TypeKind::Channel | TypeKind::Interface | TypeKind::RawPointer => {
            false
        }
    }
}

/// True for kinds that have no data representation, and for containers
/// whose ultimate element (or map value) type has none
pub fn is_unrepresentable(descriptor: &TypeDescriptor) -> bool {
    match descriptor.kind() {
        kind if kind.is_opaque() => true,
        TypeKind::Array { element, .. } | TypeKind::Slice(element) | TypeKind::Pointer(element) => {
            is_unrepresentable(&element.resolve())
        }
        TypeKind::Map { value, .. } => is_unrepresentable(&value.resolve()),
        _ => false,
    }
}

/// The one place allowed to write record slots regardless of field
/// visibility
mod slot_access {
    use crate::value::Value;

    pub(super) fn write(record: &mut Value, index: usize, slot: Value) -> bool {
        let Value::Record(record) = record else {
            return false;
        };
        match record.slots_mut().get_mut(index) {
            Some(target) => {
                *target = slot;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::LazyLock;
    use std::sync::mpsc::Sender;

    use super::*;
    use crate::describe::Field;
    use crate::describe::TypeRef;
    use crate::describe::descriptor_of;
    use crate::value::RecordValue;

    fn witness_of(descriptor: &TypeDescriptor) -> Option<Value> {
        let mut value = Value::zero(descriptor);
        make_witness(descriptor, &mut value).then_some(value)
    }

    #[test]
    fn test_primitive_witnesses() {
        assert_eq!(witness_of(&descriptor_of::<i32>()), Some(Value::Int(1)));
        assert_eq!(witness_of(&descriptor_of::<u8>()), Some(Value::Uint(1)));
        assert_eq!(witness_of(&descriptor_of::<f32>()), Some(Value::Float(1.0)));
        assert_eq!(witness_of(&descriptor_of::<bool>()), Some(Value::Bool(true)));
        assert_eq!(
            witness_of(&descriptor_of::<String>()),
            Some(Value::String(" ".to_string()))
        );
    }

    #[test]
    fn test_container_witnesses() {
        assert_eq!(
            witness_of(&descriptor_of::<[u16; 2]>()),
            Some(Value::Array(vec![Value::Uint(1), Value::Uint(0)]))
        );
        assert_eq!(
            witness_of(&descriptor_of::<Vec<bool>>()),
            Some(Value::Slice(vec![Value::Bool(true)]))
        );
        assert_eq!(
            witness_of(&descriptor_of::<HashMap<String, i64>>()),
            Some(Value::Map(vec![(Value::String(" ".to_string()), Value::Int(1))]))
        );
        assert_eq!(
            witness_of(&descriptor_of::<Option<u32>>()),
            Some(Value::Pointer(Some(Box::new(Value::Uint(1)))))
        );
    }

    #[test]
    fn test_zero_sized_and_opaque_have_no_witness() {
        assert_eq!(witness_of(&TypeDescriptor::record("Unit", Vec::new())), None);
        assert_eq!(witness_of(&descriptor_of::<[String; 0]>()), None);
        assert_eq!(witness_of(&descriptor_of::<Sender<u8>>()), None);
        assert_eq!(witness_of(&descriptor_of::<Vec<fn() -> u8>>()), None);
    }

    #[test]
    fn test_record_prefers_visible_fields() {
        let descriptor = TypeDescriptor::record(
            "Mixed",
            vec![
                Field::new("hidden", TypeRef::of::<u8>()).private(),
                Field::new("shown", TypeRef::of::<bool>()),
            ],
        );
        assert_eq!(
            witness_of(&descriptor),
            Some(Value::Record(RecordValue::new(vec![
                Value::Uint(0),
                Value::Bool(true),
            ])))
        );
    }

    #[test]
    fn test_record_falls_back_to_private_fields() {
        let descriptor = TypeDescriptor::record(
            "Sealed",
            vec![
                Field::new("unit", TypeRef::of::<[u8; 0]>()),
                Field::new("inner", TypeRef::of::<i64>()).private(),
            ],
        );
        assert_eq!(
            witness_of(&descriptor),
            Some(Value::Record(RecordValue::new(vec![
                Value::Array(Vec::new()),
                Value::Int(1),
            ])))
        );
    }

    #[test]
    fn test_self_referential_record_skips_the_recursive_field() {
        fn node() -> Arc<TypeDescriptor> {
            static NODE: LazyLock<Arc<TypeDescriptor>> = LazyLock::new(|| {
                Arc::new(TypeDescriptor::record(
                    "Node",
                    vec![
                        Field::new("next", TypeRef::from_fn(next)),
                        Field::new("value", TypeRef::of::<i32>()),
                    ],
                ))
            });
            Arc::clone(&NODE)
        }
        fn next() -> Arc<TypeDescriptor> {
            static NEXT: LazyLock<Arc<TypeDescriptor>> = LazyLock::new(|| {
                Arc::new(TypeDescriptor::new(
                    "Option<Node>",
                    TypeKind::Pointer(TypeRef::from_fn(node)),
                ))
            });
            Arc::clone(&NEXT)
        }

        assert_eq!(
            witness_of(&node()),
            Some(Value::Record(RecordValue::new(vec![
                Value::Pointer(None),
                Value::Int(1),
            ])))
        );
    }

    #[test]
    fn test_record_reachable_only_through_itself_has_no_witness() {
        fn chain() -> Arc<TypeDescriptor> {
            static CHAIN: LazyLock<Arc<TypeDescriptor>> = LazyLock::new(|| {
                Arc::new(TypeDescriptor::record(
                    "Chain",
                    vec![Field::new("links", TypeRef::from_fn(links))],
                ))
            });
            Arc::clone(&CHAIN)
        }
        fn links() -> Arc<TypeDescriptor> {
            static LINKS: LazyLock<Arc<TypeDescriptor>> = LazyLock::new(|| {
                Arc::new(TypeDescriptor::new(
                    "Vec<Chain>",
                    TypeKind::Slice(TypeRef::from_fn(chain)),
                ))
            });
            Arc::clone(&LINKS)
        }

        assert_eq!(witness_of(&chain()), None);
    }

    #[test]
    fn test_unrepresentable_follows_containers() {
        assert!(is_unrepresentable(&descriptor_of::<fn(u8) -> u8>()));
        assert!(is_unrepresentable(&descriptor_of::<Option<Vec<Sender<u8>>>>()));
        assert!(is_unrepresentable(&descriptor_of::<HashMap<String, fn() -> u8>>()));
        assert!(!is_unrepresentable(&descriptor_of::<HashMap<String, u8>>()));
        assert!(!is_unrepresentable(&descriptor_of::<Vec<String>>()));
    }
}
