//! Error types for schema resolution and response decoding
//!
//! Four families of failure are distinguished:
//! - [`SchemaError`]: malformed descriptor usage (empty schema, unknown type
//!   references, cyclic fragments)
//! - [`LogicErrorKind`]: contract misuse when decoding (missing or wrong
//!   response format, undiscoverable root type)
//! - [`RuntimeErrorKind`]: data-dependent failures in the model's answer
//! - [`DecodeError`]: field-level hydration failures, always carrying a path
//!
//! Copyright (c) 2025 Schemata Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for schemata operations
#[derive(Error, Debug)]
pub enum Error {
    /// Descriptor usage errors raised while building or resolving a schema
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Contract misuse detected while decoding a response
    #[error("Logic error ({kind}): {message}")]
    Logic {
        kind: LogicErrorKind,
        message: String,
    },

    /// Failures caused by the content of the model's answer
    #[error("Runtime error ({kind}): {message}")]
    Runtime {
        kind: RuntimeErrorKind,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Hydration of a typed object failed
    #[error("Hydration of '{type_name}' failed: {source}")]
    Decode {
        type_name: String,
        #[source]
        source: DecodeError,
    },

    /// JSON serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request assembly errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a logic error
    pub fn logic(kind: LogicErrorKind, message: impl Into<String>) -> Self {
        Self::Logic {
            kind,
            message: message.into(),
        }
    }

    /// Create a runtime error without an underlying parser error
    pub fn runtime(kind: RuntimeErrorKind, message: impl Into<String>) -> Self {
        Self::Runtime {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The logic error kind, if this is a logic error
    pub fn logic_kind(&self) -> Option<LogicErrorKind> {
        match self {
            Self::Logic { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The runtime error kind, if this is a runtime error
    pub fn runtime_kind(&self) -> Option<RuntimeErrorKind> {
        match self {
            Self::Runtime { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The decode error, if hydration failed
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Errors raised while constructing or resolving schemas
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A structured format was built without a schema
    #[error("structured response format requires a non-empty schema")]
    EmptySchema,

    /// A `type` value names something that is not a registered descriptor
    #[error("{operation}: type '{type_name}' does not implement descriptor contract")]
    NotDescriptor {
        type_name: String,
        operation: String,
    },

    /// A type's fragment references itself, directly or indirectly
    #[error("circular type reference detected: {chain}")]
    CircularReference { chain: String },

    /// Nesting of type references exceeded the resolver's depth limit
    #[error("type reference nesting exceeds depth {depth}: {chain}")]
    DepthExceeded { depth: usize, chain: String },

    /// The same type name was registered twice
    #[error("type '{type_name}' is already registered")]
    DuplicateType { type_name: String },

    /// A descriptor tried to register under a primitive JSON Schema type name
    #[error("type name '{type_name}' is reserved for a primitive JSON Schema type")]
    ReservedTypeName { type_name: String },

    /// The schema document itself is unusable
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
}

impl SchemaError {
    /// Create a not-a-descriptor error for the given operation
    pub fn not_descriptor(type_name: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::NotDescriptor {
            type_name: type_name.into(),
            operation: operation.into(),
        }
    }

    /// Create a circular reference error from the resolution chain
    pub fn circular_reference(chain: &[&'static str], repeated: &str) -> Self {
        Self::CircularReference {
            chain: render_chain(chain, repeated),
        }
    }

    /// Create a depth error from the resolution chain
    pub fn depth_exceeded(depth: usize, chain: &[&'static str], next: &str) -> Self {
        Self::DepthExceeded {
            depth,
            chain: render_chain(chain, next),
        }
    }
}

fn render_chain(chain: &[&'static str], last: &str) -> String {
    chain
        .iter()
        .copied()
        .chain(std::iter::once(last))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Kinds of contract misuse detected while decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicErrorKind {
    /// Neither the call nor the response carried a response format
    NoFormat,
    /// The response format is not structured
    WrongFormatKind,
    /// The schema root does not name a type reference
    RootTypeNotFound,
    /// The schema root names a type that is not a registered descriptor
    RootNotDescriptor,
}

/// Kinds of failure caused by the model's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeErrorKind {
    /// No message with the assistant role
    AssistantMessageMissing,
    /// The assistant text is not valid JSON
    InvalidJson,
    /// The assistant text is JSON but not an object
    NotAnObject,
}

impl fmt::Display for LogicErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicErrorKind::NoFormat => write!(f, "NO_FORMAT"),
            LogicErrorKind::WrongFormatKind => write!(f, "WRONG_FORMAT_KIND"),
            LogicErrorKind::RootTypeNotFound => write!(f, "ROOT_TYPE_NOT_FOUND"),
            LogicErrorKind::RootNotDescriptor => write!(f, "ROOT_NOT_DESCRIPTOR"),
        }
    }
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeErrorKind::AssistantMessageMissing => write!(f, "ASSISTANT_MESSAGE_MISSING"),
            RuntimeErrorKind::InvalidJson => write!(f, "INVALID_JSON"),
            RuntimeErrorKind::NotAnObject => write!(f, "NOT_AN_OBJECT"),
        }
    }
}

/// Kinds of field-level hydration failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecodeErrorKind {
    MissingField,
    WrongType,
    NestedFailure,
}

/// Field-level hydration error with the path to the offending value
///
/// Leaf errors carry the field name as their path. Each enclosing object or
/// list wraps the error with [`DecodeError::nested`], which prefixes the path
/// and the message, so the top-level error names every step down to the
/// first invalid value (`plan.steps[2].n`).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    path: String,
    message: String,
    source: Option<Box<DecodeError>>,
}

impl DecodeError {
    /// A required field is absent
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            kind: DecodeErrorKind::MissingField,
            message: format!("missing required field '{}'", field),
            path: field,
            source: None,
        }
    }

    /// A field is present but holds the wrong JSON kind
    pub fn wrong_type(field: impl Into<String>, expected: &str, found: &serde_json::Value) -> Self {
        let field = field.into();
        Self {
            kind: DecodeErrorKind::WrongType,
            message: format!(
                "field '{}' has wrong type: expected {}, found {}",
                field,
                expected,
                json_kind(found)
            ),
            path: field,
            source: None,
        }
    }

    /// The value being hydrated as a whole is not a JSON object
    ///
    /// The path is empty; the enclosing field or index supplies it.
    pub fn not_an_object(type_name: &str, found: &serde_json::Value) -> Self {
        Self {
            kind: DecodeErrorKind::WrongType,
            message: format!("expected '{}' object, found {}", type_name, json_kind(found)),
            path: String::new(),
            source: None,
        }
    }

    /// Wrap a nested failure with the field or index it occurred under
    pub fn nested(segment: impl Into<String>, inner: DecodeError) -> Self {
        let segment = segment.into();
        let path = join_path(&segment, &inner.path);
        Self {
            kind: DecodeErrorKind::NestedFailure,
            message: format!("error in {}: {}", segment, inner.message),
            path,
            source: Some(Box::new(inner)),
        }
    }

    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// Full dotted/indexed path to the first invalid value
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The innermost error of a nesting chain
    pub fn root_cause(&self) -> &DecodeError {
        let mut current = self;
        while let Some(inner) = current.source.as_deref() {
            current = inner;
        }
        current
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} (at '{}')", self.message, self.path)
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|inner| inner as &(dyn std::error::Error + 'static))
    }
}

fn join_path(segment: &str, inner: &str) -> String {
    if inner.is_empty() {
        segment.to_string()
    } else if inner.starts_with('[') {
        format!("{}{}", segment, inner)
    } else {
        format!("{}.{}", segment, inner)
    }
}

/// Human name of a JSON value's kind, as used in error messages
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_error_path_nesting() {
        let leaf = DecodeError::wrong_type("n", "integer", &json!("x"));
        let err = DecodeError::nested("plan", DecodeError::nested("steps[2]", leaf));

        assert_eq!(err.kind(), DecodeErrorKind::NestedFailure);
        assert_eq!(err.path(), "plan.steps[2].n");
        assert!(err.to_string().contains("error in plan: error in steps[2]"));
        assert_eq!(err.root_cause().kind(), DecodeErrorKind::WrongType);
    }

    #[test]
    fn test_wrong_type_names_found_kind() {
        let err = DecodeError::wrong_type("n", "integer", &json!(1.5));
        assert_eq!(
            err.message(),
            "field 'n' has wrong type: expected integer, found number"
        );
    }

    #[test]
    fn test_circular_chain_rendering() {
        let err = SchemaError::circular_reference(&["Plan", "Step"], "Plan");
        assert_eq!(
            err.to_string(),
            "circular type reference detected: Plan -> Step -> Plan"
        );
    }

    #[test]
    fn test_error_kind_display() {
        let err = Error::logic(LogicErrorKind::NoFormat, "no response format available");
        assert_eq!(
            err.to_string(),
            "Logic error (NO_FORMAT): no response format available"
        );
        assert_eq!(err.logic_kind(), Some(LogicErrorKind::NoFormat));
        assert_eq!(err.runtime_kind(), None);
    }
}
