//! Provider responses and typed decoding
//!
//! A [`ChatResponse`] holds the role/content messages handed back by a
//! transport adapter. When the request asked for structured output, the
//! assistant's answer is parsed and hydrated into the root descriptor type
//! named by the format's raw schema. The hydrated graph is computed at most
//! once per response and shared afterwards.
//!
//! Copyright (c) 2025 Schemata Team
//! Licensed under the Apache-2.0 license

use crate::descriptor::SchemaDescriptor;
use crate::error::{Error, LogicErrorKind, Result, RuntimeErrorKind};
use crate::format::ResponseFormat;
use crate::registry::{is_primitive, DescriptorEntry, SchemaObject, TypeRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};

const OPERATION: &str = "schema_objects";

/// Message role enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One message of a provider response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub role: MessageRole,
    pub content: String,

    /// Reasoning text some providers attach to a message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl ResponseMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            reasoning: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

/// Hydrated root object with the entry that produced it
#[derive(Debug, Clone)]
struct CachedRoot {
    object: SchemaObject,
    entry: DescriptorEntry,
}

/// Parsed provider response
///
/// Decoding is single-writer: the memo is guarded by a mutex held for the
/// whole first decode, so concurrent first calls decode once.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    pub messages: Vec<ResponseMessage>,

    /// Format captured when the request was built
    #[serde(skip)]
    format: Option<ResponseFormat>,

    #[serde(skip)]
    cache: Mutex<Option<CachedRoot>>,
}

impl ChatResponse {
    /// Create a response from its messages
    pub fn new(messages: Vec<ResponseMessage>) -> Self {
        Self {
            messages,
            format: None,
            cache: Mutex::new(None),
        }
    }

    /// Attach the format the request was built with
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn format(&self) -> Option<&ResponseFormat> {
        self.format.as_ref()
    }

    /// First message with the assistant role
    pub fn assistant_message(&self) -> Option<&ResponseMessage> {
        self.messages
            .iter()
            .find(|m| m.role == MessageRole::Assistant)
    }

    /// Text of the first assistant message
    pub fn assistant_text(&self) -> Option<&str> {
        self.assistant_message().map(|m| m.content.as_str())
    }

    /// Reasoning text of all messages, joined by newlines
    pub fn reasoning(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .messages
            .iter()
            .filter_map(|m| m.reasoning.as_deref())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }

    /// Decode the assistant's answer into the schema's root type
    ///
    /// `format` overrides the format captured at request time. The first
    /// successful call wins: later calls return the same object without
    /// parsing again, whatever format they pass.
    #[tracing::instrument(level = "debug", skip(self, format))]
    pub fn schema_objects(&self, format: Option<&ResponseFormat>) -> Result<SchemaObject> {
        self.cached_root(format).map(|root| root.object)
    }

    /// Typed view of [`Self::schema_objects`]
    pub fn schema_object<T: SchemaDescriptor>(
        &self,
        format: Option<&ResponseFormat>,
    ) -> Result<Arc<T>> {
        let object = self.schema_objects(format)?;
        object.downcast::<T>().map_err(|_| {
            Error::logic(
                LogicErrorKind::RootNotDescriptor,
                format!("{}: root object is not a '{}'", OPERATION, T::TYPE_NAME),
            )
        })
    }

    /// Decoded root object serialized back to JSON
    pub fn schema_objects_json(&self, format: Option<&ResponseFormat>) -> Result<Value> {
        let root = self.cached_root(format)?;
        root.entry.to_json(&root.object).ok_or_else(|| {
            Error::logic(
                LogicErrorKind::RootNotDescriptor,
                format!(
                    "{}: cannot serialize root object as '{}'",
                    OPERATION,
                    root.entry.type_name()
                ),
            )
        })
    }

    fn cached_root(&self, format: Option<&ResponseFormat>) -> Result<CachedRoot> {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(root) = cache.as_ref() {
            tracing::trace!(type_name = root.entry.type_name(), "Returning cached schema object");
            return Ok(root.clone());
        }

        let root = self.decode(format)?;
        *cache = Some(root.clone());
        Ok(root)
    }

    fn decode(&self, format: Option<&ResponseFormat>) -> Result<CachedRoot> {
        let format = format.or(self.format.as_ref()).ok_or_else(|| {
            Error::logic(
                LogicErrorKind::NoFormat,
                format!("{}: no response format was given or captured", OPERATION),
            )
        })?;

        if !format.is_structured() {
            return Err(Error::logic(
                LogicErrorKind::WrongFormatKind,
                format!("{}: response format is {:?}, expected structured", OPERATION, format.kind()),
            ));
        }

        let text = self.assistant_text().ok_or_else(|| {
            Error::runtime(
                RuntimeErrorKind::AssistantMessageMissing,
                format!("{}: response has no assistant message", OPERATION),
            )
        })?;

        let data: Value = serde_json::from_str(text).map_err(|e| Error::Runtime {
            kind: RuntimeErrorKind::InvalidJson,
            message: format!("{}: assistant message is not valid JSON: {}", OPERATION, e),
            source: Some(e),
        })?;

        if !data.is_object() {
            return Err(Error::runtime(
                RuntimeErrorKind::NotAnObject,
                format!(
                    "{}: assistant message must be a JSON object, found {}",
                    OPERATION,
                    crate::error::json_kind(&data)
                ),
            ));
        }

        let schema = format.schema().ok_or_else(|| {
            Error::logic(
                LogicErrorKind::RootTypeNotFound,
                format!("{}: structured format carries no schema", OPERATION),
            )
        })?;
        let entry = discover_root_type(schema, format.registry())?.clone();

        tracing::debug!(type_name = entry.type_name(), "Hydrating schema root");
        let object = entry.hydrate(&data).map_err(|source| Error::Decode {
            type_name: entry.type_name().to_string(),
            source,
        })?;

        Ok(CachedRoot { object, entry })
    }
}

/// Find the descriptor named by the raw schema's top-level `type` field
///
/// Only a direct type reference qualifies; a literal `"object"` or `"array"`
/// root cannot be hydrated.
pub fn discover_root_type<'r>(schema: &Value, registry: &'r TypeRegistry) -> Result<&'r DescriptorEntry> {
    let name = match schema.get("type") {
        Some(Value::String(name)) if !is_primitive(name) => name,
        Some(other) => {
            return Err(Error::logic(
                LogicErrorKind::RootTypeNotFound,
                format!("{}: schema root type {} is not a type reference", OPERATION, other),
            ))
        }
        None => {
            return Err(Error::logic(
                LogicErrorKind::RootTypeNotFound,
                format!("{}: schema root has no 'type' field", OPERATION),
            ))
        }
    };

    registry.lookup(name).ok_or_else(|| {
        Error::logic(
            LogicErrorKind::RootNotDescriptor,
            format!(
                "{}: root type '{}' does not implement descriptor contract",
                OPERATION, name
            ),
        )
    })
}
