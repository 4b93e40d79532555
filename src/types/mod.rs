//! Core types for the payment tools crate.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (AccountId, CustomerId, RequestId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for the toolkit and dispatcher

mod config;
mod errors;
mod ids;

pub use config::{
    Config, ContextDefaults, CustomerBinding, DispatchConfig, ObservabilityConfig, ToolkitConfig,
    ACCOUNT_ENV, CUSTOMER_ENV,
};
pub use errors::{Error, Result};
pub use ids::{AccountId, CustomerId, RequestId};
