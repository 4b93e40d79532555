//! Per-call ambient context.
//!
//! Built by the embedding harness for each request or session and handed to
//! the dispatcher by reference. The dispatcher only reads it.

use crate::api::RequestOptions;
use crate::tools::PermissionConfig;
use crate::types::{AccountId, CustomerId};
use serde::{Deserialize, Serialize};

/// Acting account, default customer and permission configuration for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Connected account every call is scoped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountId>,

    /// Customer supplied to operations that bill a customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerId>,

    /// Allowed actions. `None` allows every tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionConfig>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: AccountId) -> Self {
        self.account = Some(account);
        self
    }

    pub fn with_customer(mut self, customer: CustomerId) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn with_permissions(mut self, permissions: PermissionConfig) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Out-of-band options carrying the account scoping directive.
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions::for_account(self.account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Operation, Resource};
    use serde_json::json;

    #[test]
    fn test_empty_context_has_no_directive() {
        let ctx = Context::new();
        assert_eq!(ctx.request_options(), RequestOptions::default());
        assert_eq!(serde_json::to_value(&ctx).unwrap(), json!({}));
    }

    #[test]
    fn test_context_deserializes_from_harness_json() {
        let ctx: Context = serde_json::from_value(json!({
            "account": "acct_9",
            "customer": "cus_1",
            "permissions": {"invoices": ["create"]}
        }))
        .unwrap();

        assert_eq!(ctx.request_options().account_str(), Some("acct_9"));
        assert_eq!(ctx.customer.as_ref().map(CustomerId::as_str), Some("cus_1"));
        assert!(ctx
            .permissions
            .as_ref()
            .unwrap()
            .allows(Resource::Invoices, Operation::Create));
    }
}
