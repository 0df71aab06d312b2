//! Type descriptors for runtime type introspection
//!
//! Rust has no ambient reflection, so every type that takes part in schema
//! generation describes itself through [`Describe`]. A [`TypeDescriptor`] is
//! built once per distinct type and cached by [`descriptor_of`].
//!
//! Sub-descriptors (pointer referents, elements, map keys and values, field
//! types) are held as [`TypeRef`]s: lazy handles resolved on demand. This is
//! what lets a record mention itself through an `Option<Box<Self>>` field
//! without building an infinite descriptor.

mod std_impls;
mod well_known;

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::PoisonError;
use std::sync::RwLock;

use strum::AsRefStr;
use strum::Display;
use tracing::trace;

use crate::encode::EncodeFn;
use crate::encode::Encoders;
use crate::encode::Encoding;

/// Types that can describe their own shape.
///
/// Implement it with `#[derive(Describe)]` for structs, or by hand for types
/// with an unusual representation.
pub trait Describe {
    /// Canonical name, used as schema title and component name
    fn type_name() -> String;

    /// Build the descriptor. Called at most once per type by
    /// [`descriptor_of`]; implementations must not resolve their own
    /// sub-descriptors eagerly.
    fn describe() -> TypeDescriptor;
}

static DESCRIPTORS: LazyLock<RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Cached descriptor of `T`
pub fn descriptor_of<T: Describe + ?Sized + 'static>() -> Arc<TypeDescriptor> {
    let id = TypeId::of::<T>();
    let cached = DESCRIPTORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();
    if let Some(descriptor) = cached {
        return descriptor;
    }

    // Built outside the lock: describing a type may describe others.
    let mut built = T::describe();
    built.origin.get_or_insert(id);
    let built = Arc::new(built);
    trace!(type_name = %built.name(), kind = %built.kind().name(), "Described type");

    let mut descriptors = DESCRIPTORS.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(descriptors.entry(id).or_insert(built))
}

/// Lazy handle to another descriptor
#[derive(Clone, Copy)]
pub struct TypeRef(fn() -> Arc<TypeDescriptor>);

impl TypeRef {
    /// Handle to the cached descriptor of `T`
    pub fn of<T: Describe + ?Sized + 'static>() -> Self { Self(descriptor_of::<T>) }

    /// Handle to a descriptor produced by `source`, for hand-built types
    pub const fn from_fn(source: fn() -> Arc<TypeDescriptor>) -> Self { Self(source) }

    /// Resolve the descriptor
    pub fn resolve(self) -> Arc<TypeDescriptor> { (self.0)() }
}

impl fmt::Debug for TypeRef {
    // Resolving here could recurse forever on self-referential types.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("TypeRef(..)") }
}

/// Width of an integer kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IntWidth {
    /// 8 bits
    W8,
    /// 16 bits
    W16,
    /// 32 bits
    W32,
    /// 64 bits
    W64,
    /// 128 bits
    W128,
    /// Pointer-sized (`isize`, `usize`)
    Size,
}

/// Width of a float kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FloatWidth {
    /// `f32`
    W32,
    /// `f64`
    W64,
}

/// Structural kind of a described type
#[derive(Debug, Clone, AsRefStr)]
pub enum TypeKind {
    /// `bool`
    Bool,
    /// Integers
    Int {
        /// Signedness
        signed: bool,
        /// Bit width
        width:  IntWidth,
    },
    /// Floats
    Float {
        /// Bit width
        width: FloatWidth,
    },
    /// Strings and characters
    String,
    /// Optional indirection to a referent
    Pointer(TypeRef),
    /// Fixed-size array
    Array {
        /// Element type
        element: TypeRef,
        /// Declared length
        len:     usize,
    },
    /// Growable sequence
    Slice(TypeRef),
    /// Associative map
    Map {
        /// Key type
        key:   TypeRef,
        /// Value type
        value: TypeRef,
    },
    /// Record with an ordered field table
    Record(Vec<Field>),
    /// Function pointers
    Callable,
    /// Channel endpoints
    Channel,
    /// Open dynamic values (`dyn Any`, untyped JSON)
    Interface,
    /// Raw memory pointers
    RawPointer,
}

impl TypeKind {
    /// Variant name, as used in error messages and logs
    pub fn name(&self) -> &str { self.as_ref() }

    /// True for kinds that have no data representation at all
    pub const fn is_opaque(&self) -> bool {
        matches!(
            self,
            Self::Callable | Self::Channel | Self::Interface | Self::RawPointer
        )
    }
}

/// One field of a record
#[derive(Debug, Clone)]
pub struct Field {
    ident:         String,
    type_ref:      TypeRef,
    visible:       bool,
    embedded:      bool,
    external_name: Option<String>,
    skipped:       bool,
}

impl Field {
    /// Visible, non-embedded field named `ident`
    pub fn new(ident: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            ident: ident.into(),
            type_ref,
            visible: true,
            embedded: false,
            external_name: None,
            skipped: false,
        }
    }

    /// Builder method marking the field as not externally visible
    #[must_use]
    pub const fn private(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Builder method marking the field as embedded (its record's fields are
    /// promoted into the parent)
    #[must_use]
    pub const fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Builder method setting an explicit external name
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.external_name = Some(name.into());
        self
    }

    /// Builder method excluding the field from the encoded form
    #[must_use]
    pub const fn skipped(mut self) -> Self {
        self.skipped = true;
        self
    }

    /// Declared identifier
    pub fn ident(&self) -> &str { &self.ident }

    /// Handle to the field's type
    pub const fn type_ref(&self) -> TypeRef { self.type_ref }

    /// Resolved descriptor of the field's type
    pub fn descriptor(&self) -> Arc<TypeDescriptor> { self.type_ref.resolve() }

    /// Whether the field is externally visible
    pub const fn is_visible(&self) -> bool { self.visible }

    /// Whether the field is embedded
    pub const fn is_embedded(&self) -> bool { self.embedded }

    /// Explicit external name, if any
    pub fn external_name(&self) -> Option<&str> { self.external_name.as_deref() }

    /// Whether the field is excluded from the encoded form
    pub const fn is_skipped(&self) -> bool { self.skipped }
}

/// A complete type descriptor
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name:     String,
    kind:     TypeKind,
    encoders: Encoders,
    origin:   Option<TypeId>,
}

impl TypeDescriptor {
    /// Descriptor without encoders
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            encoders: Encoders::default(),
            origin: None,
        }
    }

    /// Record descriptor
    pub fn record(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(name, TypeKind::Record(fields))
    }

    /// Named type sharing the kind of `inner` but none of its encoders, as a
    /// newtype does
    pub fn alias(name: impl Into<String>, inner: &Self) -> Self {
        Self::new(name, inner.kind.clone())
    }

    /// Builder method attaching a structured encoder
    #[must_use]
    pub const fn with_structured(mut self, encoder: EncodeFn) -> Self {
        self.encoders.structured = Some(encoder);
        self
    }

    /// Builder method attaching a textual encoder
    #[must_use]
    pub const fn with_text(mut self, encoder: EncodeFn) -> Self {
        self.encoders.text = Some(encoder);
        self
    }

    /// Builder method recording the Rust type this descriptor stands for.
    /// [`descriptor_of`] fills it in when the descriptor leaves it unset.
    #[must_use]
    pub const fn with_origin(mut self, origin: TypeId) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Rust type this descriptor stands for; `None` for descriptors built
    /// outside [`descriptor_of`]
    pub const fn origin(&self) -> Option<TypeId> { self.origin }

    /// Canonical name
    pub fn name(&self) -> &str { &self.name }

    /// Structural kind
    pub const fn kind(&self) -> &TypeKind { &self.kind }

    /// The type's own encoders, excluding promoted ones
    pub const fn encoders(&self) -> &Encoders { &self.encoders }

    /// The type's own encoder for one capability
    pub const fn encoder(&self, encoding: Encoding) -> Option<EncodeFn> {
        self.encoders.get(encoding)
    }

    /// Field table; empty for anything but records
    pub fn fields(&self) -> &[Field] {
        match &self.kind {
            TypeKind::Record(fields) => fields,
            _ => &[],
        }
    }

    /// True for types whose values carry no data: records whose fields are
    /// all zero-sized and arrays that are empty or hold zero-sized elements
    pub fn is_zero_sized(&self) -> bool {
        match &self.kind {
            TypeKind::Record(fields) => fields
                .iter()
                .all(|field| field.descriptor().is_zero_sized()),
            TypeKind::Array { element, len } => *len == 0 || element.resolve().is_zero_sized(),
            _ => false,
        }
    }

    /// Descriptor left after removing every pointer layer
    pub fn deref_pointers(self: &Arc<Self>) -> Arc<Self> {
        let mut current = Arc::clone(self);
        while let TypeKind::Pointer(referent) = current.kind() {
            let next = referent.resolve();
            current = next;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_descriptors_are_cached_per_type() {
        let first = descriptor_of::<Vec<Option<u32>>>();
        let second = descriptor_of::<Vec<Option<u32>>>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "Vec<Option<u32>>");
    }

    #[test]
    fn test_zero_sized_detection() {
        let empty = TypeDescriptor::record("Empty", Vec::new());
        assert!(empty.is_zero_sized());
        assert!(descriptor_of::<[u8; 0]>().is_zero_sized());
        assert!(!descriptor_of::<[u8; 1]>().is_zero_sized());
        assert!(!descriptor_of::<String>().is_zero_sized());
    }

    #[test]
    fn test_deref_pointers_strips_every_layer() {
        let descriptor = descriptor_of::<Option<Option<i64>>>();
        let inner = descriptor.deref_pointers();
        assert_eq!(inner.name(), "i64");
    }

    #[test]
    fn test_origin_identifies_the_rust_type() {
        let text = descriptor_of::<String>();
        assert_eq!(text.origin(), Some(TypeId::of::<String>()));
        assert_eq!(
            descriptor_of::<Box<Vec<u8>>>().origin(),
            Some(TypeId::of::<Vec<u8>>())
        );
        assert_eq!(
            descriptor_of::<Arc<Box<Vec<u8>>>>().origin(),
            Some(TypeId::of::<Vec<u8>>())
        );
        assert_eq!(TypeDescriptor::record("Loose", Vec::new()).origin(), None);
    }

    #[test]
    fn test_alias_drops_encoders() {
        let uuid = descriptor_of::<uuid::Uuid>();
        assert!(!uuid.encoders().is_empty());
        let alias = TypeDescriptor::alias("RawId", &uuid);
        assert!(alias.encoders().is_empty());
        assert!(matches!(alias.kind(), TypeKind::Array { len: 16, .. }));
    }
}
