//! Tool access control: resource/operation permission gating.
//!
//! Every tool declares the (resource, operation) pairs it needs. A permission
//! configuration grants operations per resource; a tool is callable only when
//! all of its pairs are granted. No configuration means everything is allowed.

use crate::tools::catalog::ToolEntry;
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Payment-provider resource a tool acts on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Customers,
    Products,
    Prices,
    PaymentLinks,
    Invoices,
    InvoiceItems,
    Balance,
    Refunds,
    Subscriptions,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Customers,
        Resource::Products,
        Resource::Prices,
        Resource::PaymentLinks,
        Resource::Invoices,
        Resource::InvoiceItems,
        Resource::Balance,
        Resource::Refunds,
        Resource::Subscriptions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Customers => "customers",
            Resource::Products => "products",
            Resource::Prices => "prices",
            Resource::PaymentLinks => "paymentLinks",
            Resource::Invoices => "invoices",
            Resource::InvoiceItems => "invoiceItems",
            Resource::Balance => "balance",
            Resource::Refunds => "refunds",
            Resource::Subscriptions => "subscriptions",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation tag within a resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Create, Operation::Read, Operation::Update];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource → operations mapping, shared by tool declarations and grants.
pub type Actions = BTreeMap<Resource, BTreeSet<Operation>>;

/// Resource → allowed operations.
///
/// Deserializes from the list form `{"customers": ["create", "read"]}` or the
/// flag form `{"customers": {"create": true, "read": false}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPermissions", into = "RawPermissions")]
pub struct PermissionConfig {
    grants: Actions,
}

impl PermissionConfig {
    pub fn new() -> Self {
        Self {
            grants: BTreeMap::new(),
        }
    }

    /// Grant one operation on a resource.
    pub fn grant(&mut self, resource: Resource, operation: Operation) {
        self.grants.entry(resource).or_default().insert(operation);
    }

    /// Builder-style `grant`.
    pub fn with(mut self, resource: Resource, operation: Operation) -> Self {
        self.grant(resource, operation);
        self
    }

    /// Check a single (resource, operation) pair.
    pub fn allows(&self, resource: Resource, operation: Operation) -> bool {
        self.grants
            .get(&resource)
            .map_or(false, |set| set.contains(&operation))
    }

    /// First pair in `actions` this configuration does not grant.
    pub fn first_denied(&self, actions: &Actions) -> Option<(Resource, Operation)> {
        actions.iter().find_map(|(resource, operations)| {
            operations
                .iter()
                .find(|op| !self.allows(*resource, **op))
                .map(|op| (*resource, *op))
        })
    }

    /// True when every pair in `actions` is granted.
    pub fn permits(&self, actions: &Actions) -> bool {
        self.first_denied(actions).is_none()
    }

    pub fn grants(&self) -> &Actions {
        &self.grants
    }
}

/// Keep the tools callable under `config`, preserving catalog order.
///
/// `None` means no restrictions were configured.
pub fn filter_tools<'a, I>(tools: I, config: Option<&PermissionConfig>) -> Vec<&'a ToolEntry>
where
    I: IntoIterator<Item = &'a ToolEntry>,
{
    tools
        .into_iter()
        .filter(|tool| config.map_or(true, |c| c.permits(&tool.actions)))
        .collect()
}

// =============================================================================
// Wire forms
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
enum OperationSpec {
    List(Vec<Operation>),
    Flags(BTreeMap<Operation, bool>),
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
struct RawPermissions(BTreeMap<Resource, OperationSpec>);

impl From<RawPermissions> for PermissionConfig {
    fn from(raw: RawPermissions) -> Self {
        let mut config = PermissionConfig::new();
        for (resource, spec) in raw.0 {
            let operations: Vec<Operation> = match spec {
                OperationSpec::List(ops) => ops,
                OperationSpec::Flags(flags) => flags
                    .into_iter()
                    .filter_map(|(op, enabled)| enabled.then_some(op))
                    .collect(),
            };
            for op in operations {
                config.grant(resource, op);
            }
        }
        config
    }
}

impl From<PermissionConfig> for RawPermissions {
    fn from(config: PermissionConfig) -> Self {
        RawPermissions(
            config
                .grants
                .into_iter()
                .map(|(resource, ops)| (resource, OperationSpec::List(ops.into_iter().collect())))
                .collect(),
        )
    }
}

impl JsonSchema for PermissionConfig {
    fn schema_name() -> String {
        "PermissionConfig".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        RawPermissions::json_schema(gen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn actions(pairs: &[(Resource, Operation)]) -> Actions {
        let mut map = Actions::new();
        for (r, o) in pairs {
            map.entry(*r).or_default().insert(*o);
        }
        map
    }

    #[test]
    fn test_grant_and_check() {
        let config = PermissionConfig::new()
            .with(Resource::Customers, Operation::Create)
            .with(Resource::Customers, Operation::Read);

        assert!(config.allows(Resource::Customers, Operation::Create));
        assert!(config.allows(Resource::Customers, Operation::Read));
        assert!(!config.allows(Resource::Customers, Operation::Update));
        assert!(!config.allows(Resource::Invoices, Operation::Create));
    }

    #[test]
    fn test_permits_requires_every_pair() {
        let config = PermissionConfig::new().with(Resource::Invoices, Operation::Create);
        let needs_both = actions(&[
            (Resource::Invoices, Operation::Create),
            (Resource::InvoiceItems, Operation::Create),
        ]);

        assert!(!config.permits(&needs_both));
        assert_eq!(
            config.first_denied(&needs_both),
            Some((Resource::InvoiceItems, Operation::Create))
        );
        assert!(config.permits(&actions(&[(Resource::Invoices, Operation::Create)])));
    }

    #[test]
    fn test_deserialize_list_form() {
        let config: PermissionConfig = serde_json::from_value(json!({
            "customers": ["create", "read"],
            "paymentLinks": ["create"]
        }))
        .unwrap();

        assert!(config.allows(Resource::Customers, Operation::Read));
        assert!(config.allows(Resource::PaymentLinks, Operation::Create));
        assert!(!config.allows(Resource::Products, Operation::Read));
    }

    #[test]
    fn test_deserialize_flag_form() {
        let config: PermissionConfig = serde_json::from_value(json!({
            "invoices": {"create": true, "update": false},
            "balance": {"read": true}
        }))
        .unwrap();

        assert!(config.allows(Resource::Invoices, Operation::Create));
        assert!(!config.allows(Resource::Invoices, Operation::Update));
        assert!(config.allows(Resource::Balance, Operation::Read));
    }

    #[test]
    fn test_deserialize_rejects_unknown_names() {
        let bad_resource = serde_json::from_value::<PermissionConfig>(json!({"charges": ["read"]}));
        assert!(bad_resource.is_err());

        let bad_operation =
            serde_json::from_value::<PermissionConfig>(json!({"customers": ["delete"]}));
        assert!(bad_operation.is_err());
    }

    #[test]
    fn test_serializes_as_list_form() {
        let config = PermissionConfig::new()
            .with(Resource::InvoiceItems, Operation::Create)
            .with(Resource::Customers, Operation::Read);

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({"customers": ["read"], "invoiceItems": ["create"]})
        );
    }
}
