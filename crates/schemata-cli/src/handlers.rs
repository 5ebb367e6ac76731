//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

use crate::cli::{DecodeArgs, FormatArgs, ResolveArgs, TypesArgs};
use crate::config::{is_yaml, Config};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use schemata_core::{
    find_type_references, resolve_schema, ChatResponse, FormatKind, ResponseFormat, ResponseMessage,
    RootContext, TypeRegistry,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// On-disk form of a response format
#[derive(Debug, Deserialize)]
struct FormatDocument {
    #[serde(default = "structured_kind")]
    kind: FormatKind,
    #[serde(default)]
    schema: Value,
    schema_name: Option<String>,
    strict: Option<bool>,
}

fn structured_kind() -> FormatKind {
    FormatKind::Structured
}

fn read_document<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: format!("YAML document ({})", e),
        })
    } else {
        serde_json::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: format!("JSON document ({})", e),
        })
    }
}

/// Build a response format from a document, CLI flags and config defaults
///
/// Precedence: flags, then the document, then the config file.
fn load_format(args: &FormatArgs, config: &Config, registry: &Arc<TypeRegistry>) -> Result<ResponseFormat> {
    let document: FormatDocument = read_document(&args.format)?;

    if document.kind == FormatKind::PlainText {
        return Ok(ResponseFormat::plain_text());
    }

    let references = find_type_references(&document.schema);
    tracing::debug!(references = ?references, "Loaded format document");

    let mut format = ResponseFormat::structured(document.schema, Arc::clone(registry))?;
    let name = args
        .schema_name
        .clone()
        .or(document.schema_name)
        .or_else(|| config.schema.default_name.clone());
    if let Some(name) = name {
        format = format.with_schema_name(name);
    }
    let strict = args.strict || document.strict.unwrap_or(config.schema.strict());
    Ok(format.with_strict(strict))
}

/// Handle the resolve command
pub fn handle_resolve(args: ResolveArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let registry = Arc::new(TypeRegistry::builtin());
    let format = load_format(&args.format, config, &registry)?;

    output.info(&format!("Resolving {}", args.format.format.display()))?;

    if args.wire {
        output.data(&format.to_wire_json()?)?;
    } else {
        match format.resolved_schema()? {
            Some(schema) => output.data(&schema)?,
            None => output.info("Plain-text format has no schema")?,
        }
    }
    Ok(())
}

/// Handle the instruction command
pub fn handle_instruction(args: FormatArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let registry = Arc::new(TypeRegistry::builtin());
    let format = load_format(&args, config, &registry)?;

    match format.schema_instruction()? {
        Some(instruction) => output.text(&instruction),
        None => output.info("Plain-text format has no schema instruction"),
    }
}

/// Handle the decode command
pub fn handle_decode(args: DecodeArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let registry = Arc::new(TypeRegistry::builtin());
    let format = load_format(&args.format, config, &registry)?;

    let response = if args.raw {
        if !args.response.exists() {
            return Err(Error::FileNotFound {
                path: args.response.clone(),
            });
        }
        let text = fs::read_to_string(&args.response)?;
        ChatResponse::new(vec![ResponseMessage::assistant(text)])
    } else {
        read_document::<ChatResponse>(&args.response)?
    };
    let response = response.with_format(format);

    let decoded = response.schema_objects_json(None)?;
    output.success("✓ Response decoded")?;
    output.data(&decoded)?;

    if args.show_reasoning {
        if let Some(reasoning) = response.reasoning() {
            output.info(&format!("Reasoning: {}", reasoning))?;
        }
    }
    Ok(())
}

/// Handle the types command
pub fn handle_types(args: TypesArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let registry = TypeRegistry::builtin();

    let mut ctx = RootContext::new().with_strict(config.schema.strict());
    if let Some(name) = args.schema_name.or_else(|| config.schema.default_name.clone()) {
        ctx = ctx.with_schema_name(name);
    }

    let mut fragments = Map::new();
    for name in registry.type_names() {
        let resolved = resolve_schema(&json!({ "type": name }), &ctx, &registry)?;
        fragments.insert(name.to_string(), resolved);
    }
    output.data(&Value::Object(fragments))
}
