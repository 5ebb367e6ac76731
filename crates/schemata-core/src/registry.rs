//! Registry of schema-bound types
//!
//! Schemas refer to descriptor types by token in their `type` fields. The
//! registry maps each token to a type-erased entry so the resolver and the
//! decoder can reach `describe_schema`/`hydrate` without reflection.
//!
//! Copyright (c) 2025 Schemata Team
//! Licensed under the Apache-2.0 license

use crate::descriptor::{RootContext, SchemaDescriptor};
use crate::error::{DecodeError, SchemaError};
use crate::types::{Plan, Step, Task};
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Primitive JSON Schema type names; never treated as type references
pub const PRIMITIVE_TYPES: [&str; 7] = [
    "string", "integer", "number", "boolean", "object", "array", "null",
];

/// A hydrated object with its concrete type erased
pub type SchemaObject = Arc<dyn Any + Send + Sync>;

/// Check whether a `type` value is a primitive JSON Schema type name
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
}

/// Type-erased view of one [`SchemaDescriptor`] implementation
#[derive(Clone)]
pub struct DescriptorEntry {
    type_name: &'static str,
    describe: fn(&RootContext) -> Value,
    hydrate: fn(&Value) -> Result<SchemaObject, DecodeError>,
    to_json: fn(&(dyn Any + Send + Sync)) -> Option<Value>,
}

impl DescriptorEntry {
    fn of<T: SchemaDescriptor>() -> Self {
        Self {
            type_name: T::TYPE_NAME,
            describe: T::describe_schema,
            hydrate: |data| T::hydrate(data).map(|value| Arc::new(value) as SchemaObject),
            to_json: |object| {
                object
                    .downcast_ref::<T>()
                    .and_then(|value| serde_json::to_value(value).ok())
            },
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Produce the type's raw (unresolved) schema fragment
    pub fn describe(&self, ctx: &RootContext) -> Value {
        (self.describe)(ctx)
    }

    /// Hydrate an instance of the type from parsed JSON
    pub fn hydrate(&self, data: &Value) -> Result<SchemaObject, DecodeError> {
        (self.hydrate)(data)
    }

    /// Serialize a hydrated object of this type back to JSON
    ///
    /// Returns `None` when the object is of a different type.
    pub fn to_json(&self, object: &SchemaObject) -> Option<Value> {
        (self.to_json)(object.as_ref())
    }
}

impl fmt::Debug for DescriptorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorEntry")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Explicit mapping from schema-reference tokens to descriptor types
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: HashMap<&'static str, DescriptorEntry>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the reference types (`Step`, `Plan`, `Task`)
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.entries.insert(Step::TYPE_NAME, DescriptorEntry::of::<Step>());
        registry.entries.insert(Plan::TYPE_NAME, DescriptorEntry::of::<Plan>());
        registry.entries.insert(Task::TYPE_NAME, DescriptorEntry::of::<Task>());
        registry
    }

    /// Register a descriptor type under its `TYPE_NAME`
    pub fn register<T: SchemaDescriptor>(&mut self) -> Result<&mut Self, SchemaError> {
        let name = T::TYPE_NAME;
        if is_primitive(name) {
            return Err(SchemaError::ReservedTypeName {
                type_name: name.to_string(),
            });
        }
        if self.entries.contains_key(name) {
            return Err(SchemaError::DuplicateType {
                type_name: name.to_string(),
            });
        }

        tracing::trace!(type_name = name, "Registered schema descriptor");
        self.entries.insert(name, DescriptorEntry::of::<T>());
        Ok(self)
    }

    /// Builder-style registration
    pub fn with<T: SchemaDescriptor>(mut self) -> Result<Self, SchemaError> {
        self.register::<T>()?;
        Ok(self)
    }

    pub fn lookup(&self, type_name: &str) -> Option<&DescriptorEntry> {
        self.entries.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Debug, Serialize)]
    struct Shadow;

    impl SchemaDescriptor for Shadow {
        const TYPE_NAME: &'static str = "object";

        fn describe_schema(_ctx: &RootContext) -> Value {
            json!({"type": "object"})
        }

        fn hydrate(_data: &Value) -> Result<Self, DecodeError> {
            Ok(Shadow)
        }
    }

    #[test]
    fn test_builtin_registry() {
        let registry = TypeRegistry::builtin();
        assert_eq!(registry.type_names(), vec!["Plan", "Step", "Task"]);
        assert!(registry.contains("Step"));
        assert!(!registry.contains("string"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register::<Step>().unwrap();
        let err = registry.register::<Step>().unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateType {
                type_name: "Step".to_string()
            }
        );
    }

    #[test]
    fn test_primitive_names_reserved() {
        let err = TypeRegistry::new().with::<Shadow>().unwrap_err();
        assert!(matches!(err, SchemaError::ReservedTypeName { .. }));
    }

    #[test]
    fn test_entry_round_trips_through_erasure() {
        let registry = TypeRegistry::builtin();
        let entry = registry.lookup("Step").unwrap();

        let object = entry.hydrate(&json!({"n": 4})).unwrap();
        assert_eq!(object.downcast_ref::<Step>().map(|s| s.n), Some(4));
        assert_eq!(entry.to_json(&object), Some(json!({"n": 4})));

        let plan_entry = registry.lookup("Plan").unwrap();
        assert_eq!(plan_entry.to_json(&object), None);
    }
}
