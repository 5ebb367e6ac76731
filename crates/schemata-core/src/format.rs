//! Response format descriptors
//!
//! A [`ResponseFormat`] tells the provider how to shape its answer. The
//! structured kind carries a raw schema that may contain type references;
//! it is resolved into literal JSON Schema only when serialized for the wire
//! or for a prompt, so the raw form stays available for root-type discovery.
//!
//! Copyright (c) 2025 Schemata Team
//! Licensed under the Apache-2.0 license

use crate::descriptor::RootContext;
use crate::error::SchemaError;
use crate::registry::TypeRegistry;
use crate::resolver::SchemaResolver;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use std::sync::Arc;

/// Name used on the wire when a structured format has none
pub const DEFAULT_SCHEMA_NAME: &str = "response";

/// Response format kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// JSON constrained by a schema
    Structured,
    /// Free-form text
    PlainText,
}

/// How the provider should format its answer
///
/// Immutable once built; the builder methods consume and return the value.
#[derive(Debug, Clone)]
pub struct ResponseFormat {
    kind: FormatKind,
    schema_name: Option<String>,
    strict: bool,
    schema: Option<Value>,
    registry: Arc<TypeRegistry>,
}

impl ResponseFormat {
    /// Create a structured format over a raw schema
    ///
    /// Fails with [`SchemaError::EmptySchema`] for `null`, `{}` or `[]`, and
    /// with [`SchemaError::InvalidSchema`] when the schema is not a mapping.
    pub fn structured(schema: Value, registry: Arc<TypeRegistry>) -> Result<Self, SchemaError> {
        match &schema {
            Value::Null => return Err(SchemaError::EmptySchema),
            Value::Object(obj) if obj.is_empty() => return Err(SchemaError::EmptySchema),
            Value::Array(items) if items.is_empty() => return Err(SchemaError::EmptySchema),
            Value::Object(_) => {}
            other => {
                return Err(SchemaError::InvalidSchema {
                    message: format!(
                        "schema must be an object, found {}",
                        crate::error::json_kind(other)
                    ),
                })
            }
        }

        Ok(Self {
            kind: FormatKind::Structured,
            schema_name: None,
            strict: false,
            schema: Some(schema),
            registry,
        })
    }

    /// Create a plain-text format
    pub fn plain_text() -> Self {
        Self {
            kind: FormatKind::PlainText,
            schema_name: None,
            strict: false,
            schema: None,
            registry: Arc::new(TypeRegistry::new()),
        }
    }

    pub fn with_schema_name(mut self, name: impl Into<String>) -> Self {
        self.schema_name = Some(name.into());
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn is_structured(&self) -> bool {
        self.kind == FormatKind::Structured
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    /// The raw schema, type references intact
    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Context that seeds every resolution pass of this format
    pub fn root_context(&self) -> RootContext {
        RootContext {
            schema_name: self.schema_name.clone(),
            strict: self.strict,
        }
    }

    /// Resolve the schema into literal JSON Schema
    ///
    /// Plain-text formats have no schema and resolve to `None`.
    pub fn resolved_schema(&self) -> Result<Option<Value>, SchemaError> {
        match &self.schema {
            None => Ok(None),
            Some(schema) => SchemaResolver::new(&self.registry)
                .resolve(schema, &self.root_context())
                .map(Some),
        }
    }

    /// Provider payload for the `response_format` request field
    pub fn to_wire_json(&self) -> Result<Value, SchemaError> {
        match self.resolved_schema()? {
            None => Ok(json!({"type": "text"})),
            Some(schema) => Ok(json!({
                "type": "json_schema",
                "json_schema": {
                    "name": self.schema_name.as_deref().unwrap_or(DEFAULT_SCHEMA_NAME),
                    "strict": self.strict,
                    "schema": schema
                }
            })),
        }
    }

    /// System instruction embedding the resolved schema as compact JSON
    ///
    /// For providers that take the schema through the prompt rather than a
    /// request field. Returns `None` for plain-text formats.
    pub fn schema_instruction(&self) -> Result<Option<String>, SchemaError> {
        let schema = match self.resolved_schema()? {
            None => return Ok(None),
            Some(schema) => schema,
        };
        let rendered = serde_json::to_string(&schema).map_err(|e| SchemaError::InvalidSchema {
            message: e.to_string(),
        })?;
        Ok(Some(format!(
            "Respond only with a JSON object that conforms to this JSON Schema: {}",
            rendered
        )))
    }
}

impl Serialize for ResponseFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire_json()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}
