//! Schemata Core - type-driven structured output for LLM requests
//!
//! This crate lets a caller describe the shape of a model's answer with
//! ordinary Rust types instead of hand-written JSON Schema, and turns the
//! JSON the model returns back into instances of those types.
//!
//! # Main Components
//!
//! - **Descriptor contract**: [`SchemaDescriptor`] types describe their own
//!   schema fragment and hydrate themselves from JSON
//! - **Registry**: [`TypeRegistry`] maps the tokens used in `type` fields to
//!   descriptor implementations
//! - **Resolver**: [`SchemaResolver`] expands type references into literal
//!   JSON Schema, threading a [`RootContext`] through every level
//! - **Decoder**: [`ChatResponse::schema_objects`] parses the assistant's
//!   answer and hydrates the schema's root type, once per response
//!
//! # Example
//!
//! ```
//! use schemata_core::{ChatResponse, ResponseFormat, ResponseMessage, TypeRegistry};
//! use schemata_core::types::Plan;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! fn example() -> schemata_core::Result<()> {
//!     let format = ResponseFormat::structured(json!({"type": "Plan"}), Arc::new(TypeRegistry::builtin()))?
//!         .with_schema_name("plan");
//!     let wire = format.to_wire_json()?;
//!     assert_eq!(wire["json_schema"]["schema"]["type"], "object");
//!
//!     let response = ChatResponse::new(vec![ResponseMessage::assistant(
//!         r#"{"title": "release", "steps": [{"n": 1}]}"#,
//!     )])
//!     .with_format(format);
//!
//!     let plan = response.schema_object::<Plan>(None)?;
//!     assert_eq!(plan.steps[0].n, 1);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 Schemata Team
//! Licensed under the Apache-2.0 license

pub mod descriptor;
pub mod error;
pub mod format;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod response;
pub mod types;

// Re-export main types for convenience
pub use descriptor::{fields, RootContext, SchemaDescriptor};
pub use error::{
    DecodeError, DecodeErrorKind, Error, LogicErrorKind, Result, RuntimeErrorKind, SchemaError,
};
pub use format::{FormatKind, ResponseFormat};
pub use registry::{DescriptorEntry, SchemaObject, TypeRegistry};
pub use request::{ChatRequest, RequestDefaults, RequestMessage};
pub use resolver::{find_type_references, resolve_schema, SchemaResolver};
pub use response::{discover_root_type, ChatResponse, MessageRole, ResponseMessage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
