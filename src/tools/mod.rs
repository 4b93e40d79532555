//! Tool infrastructure: catalog, parameter schemas and access control.
//!
//! The catalog is static metadata: what each payment operation is called, what
//! it accepts and which resource permissions it needs. Execution lives in
//! [`crate::dispatch`].

pub mod access;
mod builtin;
pub mod catalog;
pub mod schema;

pub use access::{filter_tools, Actions, Operation, PermissionConfig, Resource};
pub use catalog::{Method, ToolDescriptor, ToolEntry, ToolRegistry};
pub use schema::{ParamDef, ParamSchema, ParamType, Presence, ValidatedParams};
