//! Property-based tests for permission filtering and parameter validation.

use payment_tools::dispatch::prepare_call;
use payment_tools::tools::{Operation, Resource, ToolEntry};
use payment_tools::types::CustomerBinding;
use payment_tools::{Context, Error, PermissionConfig, ToolRegistry};
use proptest::prelude::*;
use serde_json::{json, Value};

fn all_pairs() -> Vec<(Resource, Operation)> {
    Resource::ALL
        .iter()
        .flat_map(|r| Operation::ALL.iter().map(move |o| (*r, *o)))
        .collect()
}

fn permission_strategy() -> impl Strategy<Value = PermissionConfig> {
    let pairs = all_pairs();
    prop::collection::vec(any::<bool>(), pairs.len()).prop_map(move |mask| {
        let mut config = PermissionConfig::new();
        for (granted, (resource, operation)) in mask.into_iter().zip(pairs.iter()) {
            if granted {
                config.grant(*resource, *operation);
            }
        }
        config
    })
}

fn authorized(tool: &ToolEntry, config: &PermissionConfig) -> bool {
    tool.actions
        .iter()
        .all(|(r, ops)| ops.iter().all(|o| config.allows(*r, *o)))
}

/// Smallest valid parameter set for each built-in tool.
fn minimal_params(method: &str) -> Value {
    match method {
        "create_customer" => json!({"name": "A"}),
        "create_product" => json!({"name": "Widget"}),
        "create_price" => json!({"product": "prod_1", "unit_amount": 100, "currency": "usd"}),
        "create_payment_link" => json!({"price": "price_1", "quantity": 1}),
        "create_invoice" => json!({"customer": "cus_1"}),
        "create_invoice_item" => json!({"customer": "cus_1", "price": "price_1", "invoice": "in_1"}),
        "finalize_invoice" => json!({"invoice": "in_1"}),
        "create_refund" => json!({"payment_intent": "pi_1"}),
        "cancel_subscription" => json!({"subscription": "sub_1"}),
        _ => json!({}),
    }
}

proptest! {
    #[test]
    fn filter_matches_pairwise_authorization(config in permission_strategy()) {
        let registry = ToolRegistry::builtin().unwrap();
        let filtered: Vec<&str> = registry
            .filter(Some(&config))
            .iter()
            .map(|t| t.method.as_str())
            .collect();
        let expected: Vec<&str> = registry
            .list()
            .iter()
            .filter(|t| authorized(t, &config))
            .map(|t| t.method.as_str())
            .collect();
        prop_assert_eq!(filtered, expected);
    }

    #[test]
    fn dispatch_gate_agrees_with_filter(config in permission_strategy()) {
        let registry = ToolRegistry::builtin().unwrap();
        let visible: Vec<&str> = registry
            .filter(Some(&config))
            .iter()
            .map(|t| t.method.as_str())
            .collect();
        let ctx = Context::new().with_permissions(config);

        for tool in registry.list() {
            let method = tool.method.as_str();
            let result = prepare_call(
                &registry,
                CustomerBinding::Require,
                method,
                &minimal_params(method),
                &ctx,
            );
            if visible.contains(&method) {
                prop_assert!(result.is_ok(), "{} rejected: {:?}", method, result.err());
            } else {
                let denied = matches!(result, Err(Error::PermissionDenied { .. }));
                prop_assert!(denied, "{} was not denied", method);
            }
        }
    }

    #[test]
    fn dropping_a_required_field_names_it(tool_index in 0usize..13, pick in any::<prop::sample::Index>()) {
        let registry = ToolRegistry::builtin().unwrap();
        let tool = &registry.list()[tool_index];
        let required: Vec<&str> = tool
            .parameters
            .params()
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name.as_str())
            .collect();
        prop_assume!(!required.is_empty());

        let dropped = required[pick.index(required.len())];
        let mut params = minimal_params(tool.method.as_str());
        if let Some(map) = params.as_object_mut() {
            map.remove(dropped);
        }

        match tool.parameters.validate(&params) {
            Err(Error::Validation { field, .. }) => prop_assert_eq!(field, dropped),
            other => prop_assert!(false, "expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn valid_params_pass_unchanged(tool_index in 0usize..13) {
        let registry = ToolRegistry::builtin().unwrap();
        let tool = &registry.list()[tool_index];
        let params = minimal_params(tool.method.as_str());

        let validated = tool.parameters.validate(&params);
        prop_assert!(validated.is_ok());
        if let Ok(validated) = validated {
            prop_assert_eq!(validated.into_value(), params);
        }
    }

    #[test]
    fn absent_permissions_allow_everything(tool_index in 0usize..13) {
        let registry = ToolRegistry::builtin().unwrap();
        let tool = &registry.list()[tool_index];
        let method = tool.method.as_str();
        let result = prepare_call(
            &registry,
            CustomerBinding::Require,
            method,
            &minimal_params(method),
            &Context::new(),
        );
        prop_assert!(result.is_ok());
    }
}
