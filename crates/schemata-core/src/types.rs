//! Reference schema-bound types
//!
//! `Step`, `Plan` and `Task` are small descriptors used by the CLI and the
//! tests. `Plan` shows a context-dependent fragment: its `steps` collection
//! is omitted when the enclosing schema is named [`QUICK_PLAN_SCHEMA`].

use crate::descriptor::{fields, RootContext, SchemaDescriptor};
use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Schema name that selects the abbreviated `Plan` fragment
pub const QUICK_PLAN_SCHEMA: &str = "quick_plan";

/// One numbered step of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub n: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaDescriptor for Step {
    const TYPE_NAME: &'static str = "Step";

    fn describe_schema(ctx: &RootContext) -> Value {
        let mut schema = json!({
            "type": "object",
            "properties": {
                "n": {"type": "integer"},
                "description": {"type": ["string", "null"]}
            },
            "required": ["n"]
        });
        // Strict providers require every property to be listed as required
        if ctx.strict {
            schema["required"] = json!(["n", "description"]);
            schema["additionalProperties"] = json!(false);
        }
        schema
    }

    fn hydrate(data: &Value) -> Result<Self, DecodeError> {
        let obj = fields::object(data, Self::TYPE_NAME)?;
        Ok(Self {
            n: fields::required_i64(obj, "n")?,
            description: fields::optional_str(obj, "description")?,
        })
    }
}

/// A titled sequence of steps
///
/// `steps` is required by the full schema but hydration accepts its
/// absence under either schema name: hydration has no root context, and an
/// answer to the `quick_plan` schema never carries the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub title: String,
    pub steps: Vec<Step>,
}

impl SchemaDescriptor for Plan {
    const TYPE_NAME: &'static str = "Plan";

    fn describe_schema(ctx: &RootContext) -> Value {
        let mut properties = serde_json::Map::new();
        properties.insert("title".to_string(), json!({"type": "string"}));

        let mut required = vec![json!("title")];
        if !ctx.is_named(QUICK_PLAN_SCHEMA) {
            properties.insert(
                "steps".to_string(),
                json!({"type": "array", "items": {"type": Step::TYPE_NAME}}),
            );
            required.push(json!("steps"));
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
            "required": required
        });
        if ctx.strict {
            schema["additionalProperties"] = json!(false);
        }
        schema
    }

    /// A missing `steps` field hydrates as an empty list.
    fn hydrate(data: &Value) -> Result<Self, DecodeError> {
        let obj = fields::object(data, Self::TYPE_NAME)?;
        Ok(Self {
            title: fields::required_str(obj, "title")?,
            steps: fields::optional_list(obj, "steps")?,
        })
    }
}

/// A named unit of work with its plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub done: bool,
    pub plan: Plan,
}

impl SchemaDescriptor for Task {
    const TYPE_NAME: &'static str = "Task";

    fn describe_schema(ctx: &RootContext) -> Value {
        let mut schema = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "done": {"type": "boolean"},
                "plan": {"type": Plan::TYPE_NAME}
            },
            "required": ["name", "done", "plan"]
        });
        if ctx.strict {
            schema["additionalProperties"] = json!(false);
        }
        schema
    }

    fn hydrate(data: &Value) -> Result<Self, DecodeError> {
        let obj = fields::object(data, Self::TYPE_NAME)?;
        Ok(Self {
            name: fields::required_str(obj, "name")?,
            done: fields::required_bool(obj, "done")?,
            plan: fields::required_nested(obj, "plan")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;

    #[test]
    fn test_plan_schema_varies_by_context() {
        let full = Plan::describe_schema(&RootContext::new());
        let quick = Plan::describe_schema(&RootContext::new().with_schema_name(QUICK_PLAN_SCHEMA));

        assert_eq!(full["required"], json!(["title", "steps"]));
        assert_eq!(quick["required"], json!(["title"]));
        assert!(quick["properties"].get("steps").is_none());
        assert_eq!(full["properties"]["title"], quick["properties"]["title"]);
    }

    #[test]
    fn test_strict_context_closes_objects() {
        let strict = RootContext::new().with_strict(true);
        assert_eq!(Step::describe_schema(&strict)["additionalProperties"], false);
        assert_eq!(Task::describe_schema(&strict)["additionalProperties"], false);
        assert!(Step::describe_schema(&RootContext::new())
            .get("additionalProperties")
            .is_none());
    }

    #[test]
    fn test_plan_hydration() {
        let plan = Plan::hydrate(&json!({
            "title": "ship it",
            "steps": [{"n": 1}, {"n": 2, "description": "test"}]
        }))
        .unwrap();

        assert_eq!(plan.title, "ship it");
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[1].description.as_deref(), Some("test"));
    }

    #[test]
    fn test_quick_plan_hydrates_without_steps() {
        let plan = Plan::hydrate(&json!({"title": "quick"})).unwrap();
        assert!(plan.steps.is_empty());
    }

    #[test]
    fn test_invalid_step_reports_index() {
        let err = Plan::hydrate(&json!({
            "title": "broken",
            "steps": [{"n": 1}, {"n": 2}, {"n": "three"}]
        }))
        .unwrap_err();

        assert_eq!(err.kind(), DecodeErrorKind::NestedFailure);
        assert_eq!(err.path(), "steps[2].n");
        assert!(err.to_string().contains("steps[2]"));
    }

    #[test]
    fn test_non_object_step_reports_index_only() {
        let err = Plan::hydrate(&json!({"title": "t", "steps": [1]})).unwrap_err();

        assert_eq!(err.path(), "steps[0]");
        assert_eq!(err.root_cause().kind(), DecodeErrorKind::WrongType);
        assert_eq!(
            err.to_string(),
            "error in steps[0]: expected 'Step' object, found integer (at 'steps[0]')"
        );
    }

    #[test]
    fn test_task_error_path_spans_two_levels() {
        let err = Task::hydrate(&json!({
            "name": "release",
            "done": false,
            "plan": {"title": "p", "steps": [{"n": 0}, {"n": 1}, {}]}
        }))
        .unwrap_err();

        assert_eq!(err.path(), "plan.steps[2].n");
        assert_eq!(err.root_cause().kind(), DecodeErrorKind::MissingField);
        assert!(err.to_string().contains("error in plan: error in steps[2]"));
    }
}
