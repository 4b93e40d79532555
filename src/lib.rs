//! # Payment Tools - Permission-Gated Payment Operations for Agents
//!
//! Exposes a fixed catalog of payment-provider operations as tools an
//! automated agent can discover and call:
//! - Static tool registry with declarative parameter schemas
//! - Resource/operation permission filtering for listing and dispatch
//! - Context propagation (connected-account scoping, default customer)
//! - Result projection and a uniform upstream failure surface
//!
//! ## Architecture
//!
//! ```text
//!                      ┌──────────────────────────────────────┐
//!   tools(ctx)      →  │ ToolRegistry ── filter(permissions)  │
//!                      └──────────────────────────────────────┘
//!                      ┌──────────────────────────────────────┐
//!   dispatch(method,→  │ Dispatcher                           │
//!     params, ctx)     │  lookup → permit → validate → merge  │ → PaymentsApi
//!                      │  → call (timeout) → project          │
//!                      └──────────────────────────────────────┘
//! ```
//!
//! The payments SDK itself sits behind the [`PaymentsApi`] trait.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod api;
pub mod context;
pub mod dispatch;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use api::{ApiError, ApiResult, ListPage, PaymentsApi, RequestOptions};
pub use context::Context;
pub use dispatch::{Dispatcher, PreparedCall, ToolOutput};
pub use tools::{Method, PermissionConfig, ToolDescriptor, ToolRegistry};
pub use types::{Config, Error, Result};
