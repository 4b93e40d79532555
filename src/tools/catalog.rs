//! Tool catalog: typed metadata, lookup, filtered listing and prompts.
//!
//! Owns tool *metadata* only. The operations themselves live behind
//! [`crate::api::PaymentsApi`] and are routed by [`crate::dispatch::Dispatcher`].

use crate::tools::access::{filter_tools, Actions, PermissionConfig};
use crate::tools::builtin::builtin_entries;
use crate::tools::schema::ParamSchema;
use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Method identifiers
// =============================================================================

/// Stable method identifier for every operation the dispatcher can route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    CreateCustomer,
    ListCustomers,
    CreateProduct,
    ListProducts,
    CreatePrice,
    ListPrices,
    CreatePaymentLink,
    CreateInvoice,
    CreateInvoiceItem,
    FinalizeInvoice,
    RetrieveBalance,
    CreateRefund,
    CancelSubscription,
}

impl Method {
    pub const ALL: [Method; 13] = [
        Method::CreateCustomer,
        Method::ListCustomers,
        Method::CreateProduct,
        Method::ListProducts,
        Method::CreatePrice,
        Method::ListPrices,
        Method::CreatePaymentLink,
        Method::CreateInvoice,
        Method::CreateInvoiceItem,
        Method::FinalizeInvoice,
        Method::RetrieveBalance,
        Method::CreateRefund,
        Method::CancelSubscription,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::CreateCustomer => "create_customer",
            Method::ListCustomers => "list_customers",
            Method::CreateProduct => "create_product",
            Method::ListProducts => "list_products",
            Method::CreatePrice => "create_price",
            Method::ListPrices => "list_prices",
            Method::CreatePaymentLink => "create_payment_link",
            Method::CreateInvoice => "create_invoice",
            Method::CreateInvoiceItem => "create_invoice_item",
            Method::FinalizeInvoice => "finalize_invoice",
            Method::RetrieveBalance => "retrieve_balance",
            Method::CreateRefund => "create_refund",
            Method::CancelSubscription => "cancel_subscription",
        }
    }

    /// Operation phrase used in the caller-facing failure message.
    pub fn operation_label(self) -> &'static str {
        match self {
            Method::CreateCustomer => "create customer",
            Method::ListCustomers => "list customers",
            Method::CreateProduct => "create product",
            Method::ListProducts => "list products",
            Method::CreatePrice => "create price",
            Method::ListPrices => "list prices",
            Method::CreatePaymentLink => "create payment link",
            Method::CreateInvoice => "create invoice",
            Method::CreateInvoiceItem => "create invoice item",
            Method::FinalizeInvoice => "finalize invoice",
            Method::RetrieveBalance => "retrieve balance",
            Method::CreateRefund => "create refund",
            Method::CancelSubscription => "cancel subscription",
        }
    }

    /// Operations that bill a customer and therefore take the context's default customer.
    pub fn binds_customer(self) -> bool {
        matches!(self, Method::CreateInvoice | Method::CreateInvoiceItem)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::unknown_method(s))
    }
}

// =============================================================================
// Tool entry
// =============================================================================

/// Complete tool metadata entry.
#[derive(Debug, Clone, Serialize)]
pub struct ToolEntry {
    pub method: Method,
    pub name: String,
    pub description: String,
    pub parameters: ParamSchema,
    pub actions: Actions,
}

impl ToolEntry {
    /// Generate a prompt line for this tool.
    ///
    /// Format: `- method(param1: type, param2?: type): description`
    pub fn to_prompt_line(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .params()
            .iter()
            .map(|p| {
                let optional = if p.is_required() { "" } else { "?" };
                format!("{}{}: {}", p.name, optional, p.param_type.display_name())
            })
            .collect();

        let summary = self.description.lines().next().unwrap_or_default();
        format!("- {}({}): {}", self.method, params.join(", "), summary)
    }

    /// Agent-facing descriptor with the parameter schema rendered as JSON Schema.
    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            method: self.method.as_str().to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.to_json_schema(),
            actions: self.actions.clone(),
        }
    }
}

/// Wire form of a tool, as presented to the calling agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub method: String,
    pub name: String,
    pub description: String,
    /// JSON Schema of the accepted parameters.
    #[serde(rename = "parameterSchema")]
    pub parameters: Value,
    pub actions: Actions,
}

// =============================================================================
// Tool registry
// =============================================================================

/// Ordered, read-only tool catalog. Build once, share behind `Arc`.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
    index: HashMap<Method, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The full payment-operations catalog in its canonical order.
    pub fn builtin() -> Result<Self> {
        Self::from_entries(builtin_entries())
    }

    /// Build a registry from entries in listing order. Any invalid entry fails the whole build.
    pub fn from_entries(entries: impl IntoIterator<Item = ToolEntry>) -> Result<Self> {
        let mut registry = Self::new();
        for entry in entries {
            registry.register(entry)?;
        }
        Ok(registry)
    }

    /// Register a tool entry. Order of registration is listing order.
    pub fn register(&mut self, entry: ToolEntry) -> Result<()> {
        if entry.name.is_empty() {
            return Err(Error::config(format!("Tool {} has an empty name", entry.method)));
        }
        if entry.actions.values().all(|ops| ops.is_empty()) {
            return Err(Error::config(format!(
                "Tool {} declares no required actions",
                entry.method
            )));
        }
        if self.index.contains_key(&entry.method) {
            return Err(Error::config(format!("Duplicate tool method: {}", entry.method)));
        }
        self.index.insert(entry.method, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// All tools, in catalog order.
    pub fn list(&self) -> &[ToolEntry] {
        &self.entries
    }

    /// Resolve a method identifier.
    pub fn lookup(&self, method: &str) -> Result<&ToolEntry> {
        method
            .parse::<Method>()
            .ok()
            .and_then(|m| self.get(m))
            .ok_or_else(|| Error::unknown_method(method))
    }

    pub fn get(&self, method: Method) -> Option<&ToolEntry> {
        self.index.get(&method).map(|&i| &self.entries[i])
    }

    pub fn has_tool(&self, method: &str) -> bool {
        self.lookup(method).is_ok()
    }

    /// Tools callable under `permissions`, in catalog order.
    pub fn filter(&self, permissions: Option<&PermissionConfig>) -> Vec<&ToolEntry> {
        filter_tools(&self.entries, permissions)
    }

    /// Descriptors for the callable subset.
    pub fn descriptors(&self, permissions: Option<&PermissionConfig>) -> Vec<ToolDescriptor> {
        self.filter(permissions)
            .into_iter()
            .map(ToolEntry::descriptor)
            .collect()
    }

    /// Generate formatted prompt section for LLM consumption.
    pub fn generate_prompt(&self, permissions: Option<&PermissionConfig>) -> String {
        let entries = self.filter(permissions);
        if entries.is_empty() {
            return String::new();
        }

        let mut lines = Vec::with_capacity(entries.len() + 1);
        lines.push("Available tools:".to_string());
        for entry in entries {
            lines.push(entry.to_prompt_line());
        }
        lines.join("\n")
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
