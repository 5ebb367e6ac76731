//! Property-based tests for resolution and hydration
//!
//! These tests verify that hydration inverts serialization for the built-in
//! descriptor types and that resolution is idempotent across generated
//! schema trees.

use proptest::prelude::*;
use schemata_core::types::{Plan, Step, Task};
use schemata_core::{find_type_references, resolve_schema, RootContext, SchemaDescriptor, TypeRegistry};
use serde_json::{json, Value};

fn step_strategy() -> impl Strategy<Value = Step> {
    (any::<i64>(), proptest::option::of("[a-zA-Z0-9 .,!?]{0,40}"))
        .prop_map(|(n, description)| Step { n, description })
}

fn plan_strategy() -> impl Strategy<Value = Plan> {
    ("[a-zA-Z0-9 ]{0,30}", proptest::collection::vec(step_strategy(), 0..6))
        .prop_map(|(title, steps)| Plan { title, steps })
}

fn task_strategy() -> impl Strategy<Value = Task> {
    ("[a-z_]{1,20}", any::<bool>(), plan_strategy())
        .prop_map(|(name, done, plan)| Task { name, done, plan })
}

/// Strategy for a `type` value: primitive, reference, or nullable union
fn type_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!("string")),
        Just(json!("integer")),
        Just(json!("boolean")),
        Just(json!("Step")),
        Just(json!("Plan")),
        Just(json!(["string", "null"])),
        Just(json!(["Step", "null"])),
    ]
}

/// Strategy for schema trees mixing literal objects, arrays and references
fn schema_strategy() -> impl Strategy<Value = Value> {
    let leaf = type_value_strategy().prop_map(|t| json!({"type": t}));

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|items| json!({"type": "array", "items": items})),
            proptest::collection::btree_map("[a-z]{1,8}", inner, 1..4).prop_map(|props| {
                let required: Vec<&String> = props.keys().collect();
                json!({
                    "type": "object",
                    "properties": props,
                    "required": required
                })
            }),
        ]
    })
}

fn context_strategy() -> impl Strategy<Value = RootContext> {
    (proptest::option::of("plan|quick_plan|other"), any::<bool>()).prop_map(|(name, strict)| {
        RootContext {
            schema_name: name,
            strict,
        }
    })
}

proptest! {
    #[test]
    fn prop_step_round_trip(step in step_strategy()) {
        let data = serde_json::to_value(&step).unwrap();
        prop_assert_eq!(Step::hydrate(&data).unwrap(), step);
    }

    #[test]
    fn prop_task_round_trip(task in task_strategy()) {
        let text = serde_json::to_string(&task).unwrap();
        let data: Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(Task::hydrate(&data).unwrap(), task);
    }

    #[test]
    fn prop_resolution_is_idempotent(schema in schema_strategy(), ctx in context_strategy()) {
        let registry = TypeRegistry::builtin();

        let once = resolve_schema(&schema, &ctx, &registry).unwrap();
        prop_assert!(find_type_references(&once).is_empty());

        let twice = resolve_schema(&once, &ctx, &registry).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_reference_free_schemas_unchanged(schema in schema_strategy()) {
        let registry = TypeRegistry::builtin();
        prop_assume!(find_type_references(&schema).is_empty());

        let resolved = resolve_schema(&schema, &RootContext::new(), &registry).unwrap();
        prop_assert_eq!(resolved, schema);
    }
}
