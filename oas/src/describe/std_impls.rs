//! `Describe` for primitives, std containers and the unrepresentable kinds

use std::any::Any;
use std::any::TypeId;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::Sender;
use std::sync::mpsc::SyncSender;

use super::Describe;
use super::FloatWidth;
use super::IntWidth;
use super::TypeDescriptor;
use super::TypeKind;
use super::TypeRef;

/// Implement `Describe` for an integer primitive
macro_rules! describe_int {
    ($ty:ty, $signed:expr, $width:expr) => {
        impl Describe for $ty {
            fn type_name() -> String { stringify!($ty).to_string() }

            fn describe() -> TypeDescriptor {
                TypeDescriptor::new(
                    Self::type_name(),
                    TypeKind::Int {
                        signed: $signed,
                        width:  $width,
                    },
                )
            }
        }
    };
}

describe_int!(i8, true, IntWidth::W8);
describe_int!(i16, true, IntWidth::W16);
describe_int!(i32, true, IntWidth::W32);
describe_int!(i64, true, IntWidth::W64);
describe_int!(i128, true, IntWidth::W128);
describe_int!(isize, true, IntWidth::Size);
describe_int!(u8, false, IntWidth::W8);
describe_int!(u16, false, IntWidth::W16);
describe_int!(u32, false, IntWidth::W32);
describe_int!(u64, false, IntWidth::W64);
describe_int!(u128, false, IntWidth::W128);
describe_int!(usize, false, IntWidth::Size);

/// Implement `Describe` for a type whose kind carries no sub-descriptors
macro_rules! describe_leaf {
    ($ty:ty, $kind:expr) => {
        impl Describe for $ty {
            fn type_name() -> String { stringify!($ty).to_string() }

            fn describe() -> TypeDescriptor { TypeDescriptor::new(Self::type_name(), $kind) }
        }
    };
}

describe_leaf!(f32, TypeKind::Float {
    width: FloatWidth::W32,
});
describe_leaf!(f64, TypeKind::Float {
    width: FloatWidth::W64,
});
describe_leaf!(bool, TypeKind::Bool);
describe_leaf!(char, TypeKind::String);
describe_leaf!(str, TypeKind::String);
describe_leaf!(String, TypeKind::String);

impl Describe for &'static str {
    fn type_name() -> String { <str as Describe>::type_name() }

    fn describe() -> TypeDescriptor { <str as Describe>::describe() }
}

impl<T: Describe + 'static> Describe for Option<T> {
    fn type_name() -> String { format!("Option<{}>", T::type_name()) }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_name(), TypeKind::Pointer(TypeRef::of::<T>()))
    }
}

/// Owning smart pointers are transparent: they encode exactly as their
/// referent and share its name and origin
macro_rules! describe_transparent {
    ($wrapper:ident) => {
        impl<T: Describe + ?Sized + 'static> Describe for $wrapper<T> {
            fn type_name() -> String { T::type_name() }

            fn describe() -> TypeDescriptor {
                let referent = T::describe();
                match referent.origin() {
                    Some(_) => referent,
                    None => referent.with_origin(TypeId::of::<T>()),
                }
            }
        }
    };
}

describe_transparent!(Box);
describe_transparent!(Rc);
describe_transparent!(Arc);

/// Implement `Describe` for a single-element collection encoded as a JSON
/// array
macro_rules! describe_sequence {
    ($collection:ident $(, $bound:path)*) => {
        impl<T: Describe $(+ $bound)* + 'static> Describe for $collection<T> {
            fn type_name() -> String { format!("{}<{}>", stringify!($collection), T::type_name()) }

            fn describe() -> TypeDescriptor {
                TypeDescriptor::new(Self::type_name(), TypeKind::Slice(TypeRef::of::<T>()))
            }
        }
    };
}

describe_sequence!(Vec);
describe_sequence!(VecDeque);
describe_sequence!(BTreeSet, Ord);

impl<T: Describe + 'static, S: 'static> Describe for HashSet<T, S> {
    fn type_name() -> String { format!("HashSet<{}>", T::type_name()) }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_name(), TypeKind::Slice(TypeRef::of::<T>()))
    }
}

impl<T: Describe + 'static, const N: usize> Describe for [T; N] {
    fn type_name() -> String { format!("[{}; {N}]", T::type_name()) }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(
            Self::type_name(),
            TypeKind::Array {
                element: TypeRef::of::<T>(),
                len:     N,
            },
        )
    }
}

impl<K: Describe + 'static, V: Describe + 'static, S: 'static> Describe for HashMap<K, V, S> {
    fn type_name() -> String { format!("HashMap<{}, {}>", K::type_name(), V::type_name()) }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(
            Self::type_name(),
            TypeKind::Map {
                key:   TypeRef::of::<K>(),
                value: TypeRef::of::<V>(),
            },
        )
    }
}

impl<K: Describe + 'static, V: Describe + 'static> Describe for BTreeMap<K, V> {
    fn type_name() -> String { format!("BTreeMap<{}, {}>", K::type_name(), V::type_name()) }

    fn describe() -> TypeDescriptor {
        TypeDescriptor::new(
            Self::type_name(),
            TypeKind::Map {
                key:   TypeRef::of::<K>(),
                value: TypeRef::of::<V>(),
            },
        )
    }
}

impl<T: ?Sized + 'static> Describe for *const T {
    fn type_name() -> String { std::any::type_name::<Self>().to_string() }

    fn describe() -> TypeDescriptor { TypeDescriptor::new(Self::type_name(), TypeKind::RawPointer) }
}

impl<T: ?Sized + 'static> Describe for *mut T {
    fn type_name() -> String { std::any::type_name::<Self>().to_string() }

    fn describe() -> TypeDescriptor { TypeDescriptor::new(Self::type_name(), TypeKind::RawPointer) }
}

impl<R: 'static> Describe for fn() -> R {
    fn type_name() -> String { std::any::type_name::<Self>().to_string() }

    fn describe() -> TypeDescriptor { TypeDescriptor::new(Self::type_name(), TypeKind::Callable) }
}

impl<A: 'static, R: 'static> Describe for fn(A) -> R {
    fn type_name() -> String { std::any::type_name::<Self>().to_string() }

    fn describe() -> TypeDescriptor { TypeDescriptor::new(Self::type_name(), TypeKind::Callable) }
}

/// Implement `Describe` for a channel endpoint
macro_rules! describe_channel {
    ($($endpoint:ident),+) => {
        $(
            impl<T: 'static> Describe for $endpoint<T> {
                fn type_name() -> String { std::any::type_name::<Self>().to_string() }

                fn describe() -> TypeDescriptor {
                    TypeDescriptor::new(Self::type_name(), TypeKind::Channel)
                }
            }
        )+
    };
}

describe_channel!(Sender, SyncSender, Receiver);

impl Describe for dyn Any {
    fn type_name() -> String { "dyn Any".to_string() }

    fn describe() -> TypeDescriptor { TypeDescriptor::new(Self::type_name(), TypeKind::Interface) }
}

impl Describe for dyn Any + Send + Sync {
    fn type_name() -> String { "dyn Any + Send + Sync".to_string() }

    fn describe() -> TypeDescriptor { TypeDescriptor::new(Self::type_name(), TypeKind::Interface) }
}

impl Describe for serde_json::Value {
    fn type_name() -> String { "Value".to_string() }

    fn describe() -> TypeDescriptor { TypeDescriptor::new(Self::type_name(), TypeKind::Interface) }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::describe::descriptor_of;

    #[test]
    fn test_primitive_kinds() {
        assert!(matches!(
            descriptor_of::<usize>().kind(),
            TypeKind::Int {
                signed: false,
                width:  IntWidth::Size,
            }
        ));
        assert!(matches!(
            descriptor_of::<f32>().kind(),
            TypeKind::Float {
                width: FloatWidth::W32,
            }
        ));
        assert!(matches!(descriptor_of::<char>().kind(), TypeKind::String));
        assert_eq!(descriptor_of::<&'static str>().name(), "str");
    }

    #[test]
    fn test_container_names() {
        assert_eq!(
            descriptor_of::<HashMap<String, Vec<u8>>>().name(),
            "HashMap<String, Vec<u8>>"
        );
        assert_eq!(descriptor_of::<[i16; 3]>().name(), "[i16; 3]");
        assert_eq!(descriptor_of::<Box<Option<bool>>>().name(), "Option<bool>");
        assert!(matches!(
            descriptor_of::<Arc<BTreeSet<u32>>>().kind(),
            TypeKind::Slice(_)
        ));
    }

    #[test]
    fn test_unrepresentable_kinds() {
        assert!(descriptor_of::<fn(u8) -> bool>().kind().is_opaque());
        assert!(descriptor_of::<Sender<String>>().kind().is_opaque());
        assert!(descriptor_of::<Box<dyn Any>>().kind().is_opaque());
        assert!(descriptor_of::<*const u8>().kind().is_opaque());
        assert!(descriptor_of::<serde_json::Value>().kind().is_opaque());
        assert!(!descriptor_of::<Option<u8>>().kind().is_opaque());
    }
}
