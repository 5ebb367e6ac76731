//! Type reference resolution
//!
//! This module handles:
//! - Expansion of type references in `type` fields into descriptor fragments
//! - Propagation of the [`RootContext`] to every nested descriptor
//! - Circular reference detection
//!
//! The rewrite is depth-first and value-preserving: mappings are rebuilt key
//! by key, sequences element by element, and every other value passes through
//! untouched. Only `type` fields are inspected for references.
//!
//! Copyright (c) 2025 Schemata Team
//! Licensed under the Apache-2.0 license

use crate::descriptor::RootContext;
use crate::error::SchemaError;
use crate::registry::{is_primitive, TypeRegistry};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Default limit on nested type-reference expansion
pub const DEFAULT_MAX_DEPTH: usize = 32;

const OPERATION: &str = "resolve";

/// Stack of descriptor names currently being expanded
#[derive(Debug, Default)]
struct ResolutionStack {
    names: Vec<&'static str>,
    max_depth: usize,
}

impl ResolutionStack {
    fn new(max_depth: usize) -> Self {
        Self {
            names: Vec::new(),
            max_depth,
        }
    }

    fn push(&mut self, name: &'static str) -> Result<(), SchemaError> {
        if self.names.contains(&name) {
            return Err(SchemaError::circular_reference(&self.names, name));
        }
        if self.names.len() >= self.max_depth {
            return Err(SchemaError::depth_exceeded(self.max_depth, &self.names, name));
        }
        self.names.push(name);
        Ok(())
    }

    fn pop(&mut self) -> Option<&'static str> {
        self.names.pop()
    }
}

/// Resolver that expands registered type references into literal schema
#[derive(Debug, Clone)]
pub struct SchemaResolver<'r> {
    registry: &'r TypeRegistry,
    max_depth: usize,
}

impl<'r> SchemaResolver<'r> {
    /// Create a resolver over the given registry
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the maximum nesting of type-reference expansion
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve every type reference in `schema`
    ///
    /// The same `ctx` is seen by every descriptor expanded during this pass.
    #[tracing::instrument(level = "debug", skip(self, schema), fields(schema_name = ?ctx.schema_name))]
    pub fn resolve(&self, schema: &Value, ctx: &RootContext) -> Result<Value, SchemaError> {
        let mut stack = ResolutionStack::new(self.max_depth);
        self.resolve_node(schema, ctx, &mut stack)
    }

    fn resolve_node(
        &self,
        value: &Value,
        ctx: &RootContext,
        stack: &mut ResolutionStack,
    ) -> Result<Value, SchemaError> {
        match value {
            Value::Object(obj) => self.resolve_mapping(obj, ctx, stack),
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_node(item, ctx, stack))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            _ => Ok(value.clone()),
        }
    }

    fn resolve_mapping(
        &self,
        obj: &Map<String, Value>,
        ctx: &RootContext,
        stack: &mut ResolutionStack,
    ) -> Result<Value, SchemaError> {
        let mut resolved = Map::with_capacity(obj.len());
        let mut expansion: Option<Value> = None;

        for (key, value) in obj {
            if key == "type" {
                match self.resolve_type_field(value, ctx, stack)? {
                    TypeField::Literal(literal) => {
                        resolved.insert(key.clone(), literal);
                    }
                    TypeField::Expanded(schema) => expansion = Some(schema),
                }
            } else {
                resolved.insert(key.clone(), self.resolve_node(value, ctx, stack)?);
            }
        }

        match expansion {
            None => Ok(Value::Object(resolved)),
            Some(schema) => Ok(merge_expansion(schema, resolved)),
        }
    }

    fn resolve_type_field(
        &self,
        value: &Value,
        ctx: &RootContext,
        stack: &mut ResolutionStack,
    ) -> Result<TypeField, SchemaError> {
        match value {
            Value::String(name) if is_primitive(name) => Ok(TypeField::Literal(value.clone())),
            Value::String(name) => self.expand(name, ctx, stack).map(TypeField::Expanded),
            Value::Array(members) => {
                let has_reference = members
                    .iter()
                    .any(|m| m.as_str().is_some_and(|name| !is_primitive(name)));
                if !has_reference {
                    // Non-string members are schemas in their own right
                    return members
                        .iter()
                        .map(|member| self.resolve_node(member, ctx, stack))
                        .collect::<Result<Vec<_>, _>>()
                        .map(|members| TypeField::Literal(Value::Array(members)));
                }

                // A union naming descriptors becomes anyOf over the members
                let variants = members
                    .iter()
                    .map(|member| match member {
                        Value::String(name) if is_primitive(name) => {
                            Ok(serde_json::json!({ "type": name }))
                        }
                        Value::String(name) => self.expand(name, ctx, stack),
                        other => self.resolve_node(other, ctx, stack),
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(TypeField::Expanded(serde_json::json!({ "anyOf": variants })))
            }
            other => self.resolve_node(other, ctx, stack).map(TypeField::Literal),
        }
    }

    fn expand(
        &self,
        name: &str,
        ctx: &RootContext,
        stack: &mut ResolutionStack,
    ) -> Result<Value, SchemaError> {
        let entry = self
            .registry
            .lookup(name)
            .ok_or_else(|| SchemaError::not_descriptor(name, OPERATION))?;

        stack.push(entry.type_name())?;
        tracing::debug!(type_name = name, depth = stack.names.len(), "Expanding type reference");

        let fragment = entry.describe(ctx);
        let resolved = self.resolve_node(&fragment, ctx, stack);

        stack.pop();
        resolved
    }
}

/// Outcome of resolving one `type` field
enum TypeField {
    /// Keep as the node's `type` value
    Literal(Value),
    /// Replace the node with this schema, keeping the node's other keys
    Expanded(Value),
}

/// Combine an expanded fragment with the referencing node's sibling keys
///
/// Sibling keys written next to the reference override the fragment's.
fn merge_expansion(schema: Value, siblings: Map<String, Value>) -> Value {
    match schema {
        Value::Object(mut fragment) => {
            for (key, value) in siblings {
                fragment.insert(key, value);
            }
            Value::Object(fragment)
        }
        other if siblings.is_empty() => other,
        other => {
            let mut node = siblings;
            node.insert("allOf".to_string(), Value::Array(vec![other]));
            Value::Object(node)
        }
    }
}

/// Resolve `schema` against `registry` with the default depth limit
pub fn resolve_schema(
    schema: &Value,
    ctx: &RootContext,
    registry: &TypeRegistry,
) -> Result<Value, SchemaError> {
    SchemaResolver::new(registry).resolve(schema, ctx)
}

/// Collect every non-primitive name used in a `type` field of `schema`
///
/// Fragments are not expanded; only references written in this tree are
/// reported.
pub fn find_type_references(schema: &Value) -> BTreeSet<String> {
    let mut references = BTreeSet::new();
    collect_references(schema, &mut references);
    references
}

fn collect_references(value: &Value, references: &mut BTreeSet<String>) {
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                if key == "type" {
                    collect_type_names(val, references);
                } else {
                    collect_references(val, references);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, references);
            }
        }
        _ => {}
    }
}

fn collect_type_names(value: &Value, references: &mut BTreeSet<String>) {
    match value {
        Value::String(name) if !is_primitive(name) => {
            references.insert(name.clone());
        }
        Value::Array(members) => {
            for member in members {
                collect_type_names(member, references);
            }
        }
        other => collect_references(other, references),
    }
}
