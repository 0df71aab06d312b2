//! Structural traversal from type descriptors to schemas
//!
//! [`SchemaGenerator`] walks a descriptor and produces the schema of the type,
//! registering every named composite (fixed arrays, sequences, maps,
//! records) as a component and returning a reference to it. Scalars and
//! types settled by their encoder output stay inline.
//!
//! Dispatch order for one descriptor:
//! 1. absent descriptor: `null`
//! 2. name already registered (even as a placeholder): reference
//! 3. title from the canonical name
//! 4. encoder output, when the type has a structured or textual encoder
//! 5. the structural kind


use error_stack::Report;
use error_stack::ResultExt;
use tracing::debug;
use tracing::trace;

use crate::classify::classify;
use crate::describe::Describe;
use crate::describe::FloatWidth;
use crate::describe::IntWidth;
use crate::describe::TypeDescriptor;
use crate::describe::TypeKind;
use crate::describe::TypeRef;
use crate::describe::descriptor_of;
use crate::error::Error;
use crate::error::Result;
use crate::json_schema::JsonSchemaType;
use crate::json_schema::SchemaFormat;
use crate::registry::ComponentRegistry;
use crate::schema::Schema;
use crate::witness::is_unrepresentable;

/// Schema generator writing components into a borrowed registry.
///
/// A request either succeeds or leaves the registry as it found it: the
/// components reserved by a failing request are discarded.
pub struct SchemaGenerator<'r> {
    registry: &'r mut ComponentRegistry,
    reserved: Vec<String>,
}

impl<'r> SchemaGenerator<'r> {
    /// Generator registering components in `registry`
    pub const fn new(registry: &'r mut ComponentRegistry) -> Self {
        Self {
            registry,
            reserved: Vec::new(),
        }
    }

    /// Components registered so far
    pub fn registry(&self) -> &ComponentRegistry { &*self.registry }

    /// Schema of `T`
    pub fn schema_for<T: Describe + ?Sized + 'static>(&mut self) -> Result<Schema> {
        let descriptor = descriptor_of::<T>();
        self.type_schema(Some(&descriptor))
            .attach(format!("Generating schema for type: {}", descriptor.name()))
    }

    /// Schema of the described type; `None` describes the absent type and
    /// yields a bare `null` schema
    pub fn type_schema(&mut self, descriptor: Option<&TypeDescriptor>) -> Result<Schema> {
        self.reserved.clear();
        let result = self.nested_schema(descriptor);
        if result.is_err() {
            self.roll_back();
        }
        self.reserved.clear();
        result
    }

    fn nested_schema(&mut self, descriptor: Option<&TypeDescriptor>) -> Result<Schema> {
        let mut schema = Schema::default();
        self.schema_any(descriptor, &mut schema)?;
        Ok(schema)
    }

    fn schema_of(&mut self, type_ref: TypeRef) -> Result<Schema> {
        self.nested_schema(Some(&type_ref.resolve()))
    }

    /// Bind a placeholder for `descriptor` and remember it for roll back
    fn reserve(&mut self, descriptor: &TypeDescriptor) -> Result<()> {
        let name = descriptor.name();
        self.registry.reserve(name)?;
        self.reserved.push(name.to_string());
        self.registry.claim(name, descriptor.origin())
    }

    fn roll_back(&mut self) {
        for name in self.reserved.drain(..) {
            debug!(component = %name, "Discarding component of failed request");
            self.registry.discard(&name);
        }
    }

    fn schema_any(&mut self, descriptor: Option<&TypeDescriptor>, schema: &mut Schema) -> Result<()> {
        let Some(descriptor) = descriptor else {
            return schema.nullable();
        };

        let name = descriptor.name();
        if self.registry.lookup(name)?.is_some() {
            self.registry.claim(name, descriptor.origin())?;
            trace!(component = %name, "Referencing registered component");
            return schema.set_ref(name);
        }

        if !name.is_empty() {
            schema.title = Some(name.to_string());
        }
        if classify(descriptor, schema) {
            return Ok(());
        }

        match descriptor.kind() {
            TypeKind::Int { width, .. } => {
                match width {
                    IntWidth::W32 => schema.format = Some(SchemaFormat::Int32),
                    IntWidth::W64 => schema.format = Some(SchemaFormat::Int64),
                    IntWidth::W8 | IntWidth::W16 | IntWidth::W128 | IntWidth::Size => {}
                }
                schema.type_replace([JsonSchemaType::Integer]);
            }
            TypeKind::Float { width } => {
                schema.format = Some(match width {
                    FloatWidth::W32 => SchemaFormat::Float,
                    FloatWidth::W64 => SchemaFormat::Double,
                });
                schema.type_replace([JsonSchemaType::Number]);
            }
            TypeKind::Bool => {
                schema.type_replace([JsonSchemaType::Boolean]);
            }
            TypeKind::String => {
                schema.type_replace([JsonSchemaType::String]);
            }
            TypeKind::Pointer(referent) => self.schema_pointer(descriptor, *referent, schema)?,
            TypeKind::Array { element, len } => {
                self.schema_array(descriptor, *element, *len, schema)?;
            }
            TypeKind::Slice(element) => self.schema_slice(descriptor, *element, schema)?,
            TypeKind::Map { key, value } => self.schema_map(descriptor, *key, *value, schema)?,
            TypeKind::Record(_) => self.schema_record(descriptor, schema)?,
            kind @ (TypeKind::Callable
            | TypeKind::Channel
            | TypeKind::Interface
            | TypeKind::RawPointer) => {
                return Err(Report::new(Error::unsupported_kind(name, kind.name())));
            }
        }
        Ok(())
    }

    /// The referent's schema, made nullable.
    ///
    /// Inline schemas get `null` in their type set. References stay plain when
    /// the component already admits `null`, and are wrapped in a `oneOf` with
    /// `null` otherwise.
    fn schema_pointer(
        &mut self,
        descriptor: &TypeDescriptor,
        referent: TypeRef,
        schema: &mut Schema,
    ) -> Result<()> {
        self.schema_any(Some(&referent.resolve()), schema)?;

        let Some(reference) = schema.reference.clone() else {
            schema.title = Some(descriptor.name().to_string());
            return schema.nullable();
        };

        let target = self
            .registry
            .resolve(&reference)?
            .ok_or_else(|| Report::new(Error::MissingComponent(reference.clone())))?;
        if target.is_nullable() {
            return Ok(());
        }

        *schema = Schema::null_of(descriptor.name(), std::mem::take(schema));
        Ok(())
    }

    fn schema_array(
        &mut self,
        descriptor: &TypeDescriptor,
        element: TypeRef,
        len: usize,
        schema: &mut Schema,
    ) -> Result<()> {
        self.reserve(descriptor)?;

        schema.type_replace([JsonSchemaType::Array]);
        schema.min_items = u64::try_from(len).ok();
        schema.max_items = schema.min_items;
        schema.items = Some(Box::new(self.schema_of(element)?));

        self.outline(schema)
    }

    fn schema_slice(
        &mut self,
        descriptor: &TypeDescriptor,
        element: TypeRef,
        schema: &mut Schema,
    ) -> Result<()> {
        self.reserve(descriptor)?;

        schema.type_replace([JsonSchemaType::Array, JsonSchemaType::Null]);
        schema.items = Some(Box::new(self.schema_of(element)?));

        self.outline(schema)
    }

    fn schema_map(
        &mut self,
        descriptor: &TypeDescriptor,
        key: TypeRef,
        value: TypeRef,
        schema: &mut Schema,
    ) -> Result<()> {
        self.reserve(descriptor)?;

        schema.type_replace([JsonSchemaType::Object, JsonSchemaType::Null]);

        let value = value.resolve();
        if is_unrepresentable(&value) {
            trace!(map = %descriptor.name(), "Map values have no representation");
            return self.outline(schema);
        }

        let key = key.resolve();
        let key_schema = self.nested_schema(Some(&key))?;
        if !key_schema.type_is(&[JsonSchemaType::String]) {
            let found = key_schema
                .schema_type
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .join(", ");
            return Err(Report::new(Error::UnsupportedMapKey {
                map_type: descriptor.name().to_string(),
                key_type: key.name().to_string(),
                found:    format!("[{found}]"),
            }));
        }
        schema.additional_properties = Some(Box::new(self.nested_schema(Some(&value))?));

        self.outline(schema)
    }

    fn schema_record(&mut self, descriptor: &TypeDescriptor, schema: &mut Schema) -> Result<()> {
        self.reserve(descriptor)?;

        schema.type_replace([JsonSchemaType::Object]);
        self.record_properties(descriptor, schema, &mut vec![descriptor.name().to_string()])?;

        self.outline(schema)
    }

    /// Add one property per retained field, promoting the fields of embedded
    /// records into `schema`. `flattening` holds the records being promoted,
    /// outermost first.
    fn record_properties(
        &mut self,
        descriptor: &TypeDescriptor,
        schema: &mut Schema,
        flattening: &mut Vec<String>,
    ) -> Result<()> {
        for field in descriptor.fields() {
            if !field.is_visible() || field.is_skipped() {
                continue;
            }
            let field_type = field.descriptor();
            if is_unrepresentable(&field_type) {
                trace!(field = %field.ident(), "Skipping field without representation");
                continue;
            }

            if let Some(name) = field.external_name() {
                self.record_property(schema, name, &field_type)?;
                continue;
            }

            if field.is_embedded() {
                let inner = field_type.deref_pointers();
                if let TypeKind::Record(_) = inner.kind() {
                    if flattening.iter().any(|name| name == inner.name()) {
                        debug!(record = %inner.name(), "Record embeds itself, not flattening again");
                        continue;
                    }
                    flattening.push(inner.name().to_string());
                    self.record_properties(&inner, schema, flattening)?;
                    flattening.pop();
                    continue;
                }
            }

            self.record_property(schema, field.ident(), &field_type)?;
        }
        Ok(())
    }

    fn record_property(
        &mut self,
        schema: &mut Schema,
        name: &str,
        field_type: &TypeDescriptor,
    ) -> Result<()> {
        let property = self.nested_schema(Some(field_type))?;
        schema.properties.insert(name.to_string(), property);
        Ok(())
    }

    /// Move the finished body into the registry and leave a reference behind
    fn outline(&mut self, schema: &mut Schema) -> Result<()> {
        self.registry.fill(schema.clone())?;
        let name = schema.valid_title()?.to_string();
        schema.set_ref(&name)
    }
}
