//! Type descriptor contract
//!
//! A schema-bound type implements [`SchemaDescriptor`]: it can describe its
//! own JSON Schema fragment, optionally adapting to the [`RootContext`] of the
//! request, and it can hydrate an instance of itself from decoded JSON.
//!
//! Fragments may name other descriptors in their `type` fields; expanding
//! those is the resolver's job, not the descriptor's.
//!
//! Copyright (c) 2025 Schemata Team
//! Licensed under the Apache-2.0 license

pub mod fields;

use crate::error::DecodeError;
use serde::Serialize;
use serde_json::Value;

/// Read-only context threaded through one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootContext {
    /// Name of the overall schema, if the format carries one
    pub schema_name: Option<String>,
    /// Whether the provider must match the schema exactly
    pub strict: bool,
}

impl RootContext {
    /// Create a context with neither name nor strictness
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema_name(mut self, name: impl Into<String>) -> Self {
        self.schema_name = Some(name.into());
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Check whether the enclosing schema carries the given name
    pub fn is_named(&self, name: &str) -> bool {
        self.schema_name.as_deref() == Some(name)
    }
}

/// Capability of a type to describe and hydrate itself
///
/// Implementors are selected by capability alone: they share no base type,
/// only this trait, and are made visible to schemas by registering them in a
/// [`TypeRegistry`](crate::registry::TypeRegistry) under [`Self::TYPE_NAME`].
///
/// `Serialize` is required so that a hydrated value can be written back out
/// with the same field names its schema declares.
pub trait SchemaDescriptor: Serialize + Send + Sync + Sized + 'static {
    /// Token that refers to this type inside a schema's `type` field
    const TYPE_NAME: &'static str;

    /// Produce this type's JSON Schema fragment
    ///
    /// Must be pure. May consult `ctx.schema_name` to include or omit
    /// context-dependent fields.
    fn describe_schema(ctx: &RootContext) -> Value;

    /// Build an instance from already-parsed JSON
    fn hydrate(data: &Value) -> Result<Self, DecodeError>;
}
