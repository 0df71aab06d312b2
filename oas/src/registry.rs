//! Named schema components
//!
//! The registry is the `components.schemas` map of a document. Composite
//! types are registered under their canonical name in two steps: a
//! placeholder is reserved before their sub-types are visited, and the
//! finished body replaces it afterwards. A recursive type that meets its own
//! reservation emits a plain reference instead of recursing again.
//!
//! Each name also remembers the Rust type that claimed it, so two types with
//! the same canonical name are reported instead of sharing one component.

use std::any::TypeId;
use std::collections::HashMap;
use std::collections::btree_map::Iter;

use error_stack::Report;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::trace;

use crate::constants::COMPONENT_SCHEMA_PREFIX;
use crate::error::Error;
use crate::error::Result;
use crate::schema::Schema;
use crate::schema::Schemas;

/// Name → schema map, serialized as a plain JSON object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRegistry {
    schemas: Schemas,
    #[serde(skip)]
    origins: HashMap<String, TypeId>,
}

// Origins are bookkeeping; two registries are equal when they hold the same
// schemas.
impl PartialEq for ComponentRegistry {
    fn eq(&self, other: &Self) -> bool { self.schemas == other.schemas }
}

impl ComponentRegistry {
    /// Empty registry
    pub fn new() -> Self { Self::default() }

    /// Bind `name` to an empty placeholder body
    pub fn reserve(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Report::new(Error::MissingTitle).attach("Cannot reserve an unnamed component"));
        }
        if self.schemas.contains_key(name) {
            return Err(Report::new(Error::RedundantComponent(name.to_string())));
        }
        trace!(component = %name, "Reserved schema component");
        self.schemas.insert(name.to_string(), Schema::default());
        Ok(())
    }

    /// Store `body` under its title, replacing a placeholder
    pub fn fill(&mut self, body: Schema) -> Result<()> {
        let name = body.valid_title()?.to_string();
        if self
            .schemas
            .get(&name)
            .is_some_and(|existing| !existing.is_placeholder())
        {
            return Err(Report::new(Error::RedundantComponent(name)));
        }
        debug!(component = %name, "Registered schema component");
        self.schemas.insert(name, body);
        Ok(())
    }

    /// Record that `origin` owns `name`.
    ///
    /// Fails when `name` is already owned by a different type. An unknown
    /// origin never conflicts.
    pub fn claim(&mut self, name: &str, origin: Option<TypeId>) -> Result<()> {
        let Some(origin) = origin else {
            return Ok(());
        };
        match self.origins.get(name) {
            Some(owner) if *owner != origin => {
                Err(Report::new(Error::ConflictingComponent(name.to_string())).attach(
                    "Give one of the types a distinct name with #[describe(name = \"..\")]",
                ))
            }
            Some(_) => Ok(()),
            None => {
                self.origins.insert(name.to_string(), origin);
                Ok(())
            }
        }
    }

    /// Unbind `name` and forget its owner
    pub(crate) fn discard(&mut self, name: &str) {
        self.schemas.remove(name);
        self.origins.remove(name);
    }

    /// True if `name` is bound, even to a placeholder
    pub fn contains(&self, name: &str) -> bool { self.schemas.contains_key(name) }

    /// Current body bound to `name`.
    ///
    /// A body that is itself a reference violates the registry invariant and
    /// is reported as a double reference.
    pub fn lookup(&self, name: &str) -> Result<Option<&Schema>> {
        let Some(body) = self.schemas.get(name) else {
            return Ok(None);
        };
        if let Some(reference) = &body.reference {
            return Err(Report::new(Error::double_reference(name, reference.clone())));
        }
        Ok(Some(body))
    }

    /// Body a `#/components/schemas/<name>` reference points at
    pub fn resolve(&self, reference: &str) -> Result<Option<&Schema>> {
        let Some(name) = reference.strip_prefix(COMPONENT_SCHEMA_PREFIX) else {
            return Err(Report::new(Error::UnknownReferencePath(reference.to_string())));
        };
        self.lookup(name)
    }

    /// `schema` itself when inline, otherwise the body it references
    pub fn deref<'a>(&'a self, schema: &'a Schema) -> Result<Option<&'a Schema>> {
        match &schema.reference {
            Some(reference) => self.resolve(reference),
            None => Ok(Some(schema)),
        }
    }

    /// Raw access to a stored body, without the reference check
    pub fn get(&self, name: &str) -> Option<&Schema> { self.schemas.get(name) }

    /// Components in name order
    pub fn iter(&self) -> Iter<'_, String, Schema> { self.schemas.iter() }

    /// Number of components, placeholders included
    pub fn len(&self) -> usize { self.schemas.len() }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool { self.schemas.is_empty() }
}

impl<'a> IntoIterator for &'a ComponentRegistry {
    type IntoIter = Iter<'a, String, Schema>;
    type Item = (&'a String, &'a Schema);

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::json_schema::JsonSchemaType;

    fn titled(title: &str, schema_type: JsonSchemaType) -> Schema {
        Schema {
            title: Some(title.to_string()),
            ..Schema::of_type(schema_type)
        }
    }

    #[test]
    fn test_reserve_then_fill() {
        let mut registry = ComponentRegistry::new();
        registry.reserve("Pair").unwrap();
        assert!(registry.contains("Pair"));
        assert!(registry.lookup("Pair").unwrap().unwrap().is_placeholder());

        registry
            .fill(titled("Pair", JsonSchemaType::Object))
            .unwrap();
        assert!(
            registry
                .lookup("Pair")
                .unwrap()
                .unwrap()
                .type_is(&[JsonSchemaType::Object])
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_are_never_rebound() {
        let mut registry = ComponentRegistry::new();
        registry.reserve("Pair").unwrap();
        let error = registry.reserve("Pair").unwrap_err();
        assert_eq!(
            error.current_context(),
            &Error::RedundantComponent("Pair".to_string())
        );

        registry
            .fill(titled("Pair", JsonSchemaType::Object))
            .unwrap();
        let error = registry
            .fill(titled("Pair", JsonSchemaType::Array))
            .unwrap_err();
        assert!(matches!(
            error.current_context(),
            Error::RedundantComponent(_)
        ));
    }

    #[test]
    fn test_names_belong_to_one_type() {
        let mut registry = ComponentRegistry::new();
        registry.reserve("Item").unwrap();
        registry.claim("Item", Some(TypeId::of::<u8>())).unwrap();
        registry.claim("Item", Some(TypeId::of::<u8>())).unwrap();
        registry.claim("Item", None).unwrap();

        let error = registry
            .claim("Item", Some(TypeId::of::<i8>()))
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &Error::ConflictingComponent("Item".to_string())
        );
    }

    #[test]
    fn test_discard_frees_the_name() {
        let mut registry = ComponentRegistry::new();
        registry.reserve("Item").unwrap();
        registry.claim("Item", Some(TypeId::of::<u8>())).unwrap();

        registry.discard("Item");
        assert!(!registry.contains("Item"));
        registry.reserve("Item").unwrap();
        registry.claim("Item", Some(TypeId::of::<i8>())).unwrap();
    }

    #[test]
    fn test_equality_ignores_owners() {
        let mut claimed = ComponentRegistry::new();
        claimed
            .fill(titled("Pair", JsonSchemaType::Object))
            .unwrap();
        claimed.claim("Pair", Some(TypeId::of::<u8>())).unwrap();

        let json = serde_json::to_string(&claimed).unwrap();
        let restored: ComponentRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, claimed);
    }

    #[test]
    fn test_empty_names_are_rejected() {
        let mut registry = ComponentRegistry::new();
        assert_eq!(
            registry.reserve("").unwrap_err().current_context(),
            &Error::MissingTitle
        );
        assert_eq!(
            registry.fill(Schema::default()).unwrap_err().current_context(),
            &Error::MissingTitle
        );
    }

    #[test]
    fn test_lookup_refuses_reference_bodies() {
        let mut registry = ComponentRegistry::new();
        let mut body = Schema::reference_to("Other").unwrap();
        body.title = Some("Alias".to_string());
        registry.fill(body).unwrap();
        assert!(matches!(
            registry.lookup("Alias").unwrap_err().current_context(),
            Error::DoubleReference { .. }
        ));
    }

    #[test]
    fn test_resolve_accepts_only_component_paths() {
        let mut registry = ComponentRegistry::new();
        registry
            .fill(titled("Pair", JsonSchemaType::Object))
            .unwrap();

        assert!(
            registry
                .resolve("#/components/schemas/Pair")
                .unwrap()
                .is_some()
        );
        assert!(
            registry
                .resolve("#/components/schemas/Missing")
                .unwrap()
                .is_none()
        );
        assert!(matches!(
            registry
                .resolve("#/definitions/Pair")
                .unwrap_err()
                .current_context(),
            Error::UnknownReferencePath(_)
        ));

        let inline = Schema::of_type(JsonSchemaType::String);
        assert_eq!(registry.deref(&inline).unwrap(), Some(&inline));
        let reference = Schema::reference_to("Pair").unwrap();
        assert_eq!(
            registry.deref(&reference).unwrap().and_then(|body| body.title.as_deref()),
            Some("Pair")
        );
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut registry = ComponentRegistry::new();
        registry
            .fill(titled("Pair", JsonSchemaType::Object))
            .unwrap();
        assert_eq!(
            serde_json::to_value(&registry).unwrap(),
            serde_json::json!({ "Pair": { "title": "Pair", "type": ["object"] } })
        );
    }
}
