//! Configuration structures.
//!
//! Configuration is loaded from a JSON file with environment overrides for the
//! default account and customer.

use crate::context::Context;
use crate::tools::PermissionConfig;
use crate::types::{AccountId, CustomerId, Error};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment override for the default connected account.
pub const ACCOUNT_ENV: &str = "PAYMENT_TOOLS_ACCOUNT";
/// Environment override for the default customer.
pub const CUSTOMER_ENV: &str = "PAYMENT_TOOLS_CUSTOMER";

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Tool exposure and default call context.
    #[serde(default)]
    pub toolkit: ToolkitConfig,

    /// Dispatcher behavior.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load from a JSON file, then apply environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> crate::types::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_json::from_str(&raw)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override context defaults from a variable lookup (normally `std::env::var`).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> crate::types::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(account) = lookup(ACCOUNT_ENV) {
            self.toolkit.context.account =
                Some(AccountId::from_string(account).map_err(Error::config)?);
        }
        if let Some(customer) = lookup(CUSTOMER_ENV) {
            self.toolkit.context.customer =
                Some(CustomerId::from_string(customer).map_err(Error::config)?);
        }
        Ok(())
    }

    /// Session context built from the configured defaults and permissions.
    pub fn context(&self) -> Context {
        Context {
            account: self.toolkit.context.account.clone(),
            customer: self.toolkit.context.customer.clone(),
            permissions: self.toolkit.actions.clone(),
        }
    }

    /// JSON Schema describing this configuration file.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Config)).unwrap_or_default()
    }
}

/// Which tools are exposed and with what default context.
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct ToolkitConfig {
    /// Allowed actions. Omit to expose every tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<PermissionConfig>,

    /// Default call context.
    #[serde(default)]
    pub context: ContextDefaults,
}

/// Default account and customer applied to every call.
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct ContextDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerId>,
}

/// How operations that bill a customer obtain one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CustomerBinding {
    /// Context customer overrides the parameter; one of the two must be present.
    #[default]
    Require,
    /// Parameters are sent as given; the context customer is ignored.
    Passthrough,
}

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DispatchConfig {
    /// Customer binding policy for invoicing operations.
    pub customer_binding: CustomerBinding,

    /// Deadline for a single payments API call.
    #[serde(with = "humantime_serde")]
    #[schemars(with = "String")]
    pub call_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            customer_binding: CustomerBinding::Require,
            call_timeout: Duration::from_secs(30),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
