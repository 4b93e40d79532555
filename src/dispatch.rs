//! Permission-gated dispatch.
//!
//! A dispatch is one linear pass: resolve the method, re-check permissions,
//! validate parameters, merge context, call the payments API, project the
//! result. Everything up to the call fails with a structured [`Error`];
//! anything that goes wrong at or after the call becomes
//! [`ToolOutput::Failure`] with the uniform `Failed to <operation>` message.

use crate::api::{ApiError, ApiResult, PaymentsApi, RequestOptions};
use crate::context::Context;
use crate::tools::{Method, ToolDescriptor, ToolRegistry, ValidatedParams};
use crate::types::{CustomerBinding, DispatchConfig, Error, RequestId, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::Instrument;

/// What the calling agent receives for a dispatched call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// Projected (or passthrough) result.
    Success(Value),
    /// Uniform upstream failure message.
    Failure(String),
}

impl ToolOutput {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutput::Success(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            ToolOutput::Success(v) => Some(v),
            ToolOutput::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ToolOutput::Success(_) => None,
            ToolOutput::Failure(msg) => Some(msg),
        }
    }
}

/// A call that passed every pre-dispatch check and is ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCall {
    pub method: Method,
    pub params: ValidatedParams,
    pub options: RequestOptions,
}

/// Routes tool calls to a [`PaymentsApi`].
///
/// Cheap to clone; holds no per-call state, so clones may dispatch concurrently.
#[derive(Debug)]
pub struct Dispatcher<A> {
    registry: Arc<ToolRegistry>,
    api: Arc<A>,
    config: DispatchConfig,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            api: Arc::clone(&self.api),
            config: self.config.clone(),
        }
    }
}

impl<A: PaymentsApi> Dispatcher<A> {
    pub fn new(registry: Arc<ToolRegistry>, api: Arc<A>) -> Self {
        Self::with_config(registry, api, DispatchConfig::default())
    }

    pub fn with_config(registry: Arc<ToolRegistry>, api: Arc<A>, config: DispatchConfig) -> Self {
        Self {
            registry,
            api,
            config,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Descriptors of the tools callable under `ctx`.
    pub fn tools(&self, ctx: &Context) -> Vec<ToolDescriptor> {
        self.registry.descriptors(ctx.permissions.as_ref())
    }

    /// Run every pre-dispatch step without calling the API.
    pub fn prepare(&self, method: &str, raw: &Value, ctx: &Context) -> Result<PreparedCall> {
        prepare_call(&self.registry, self.config.customer_binding, method, raw, ctx)
    }

    /// Validate, merge context and call the payments API.
    pub async fn dispatch(&self, method: &str, raw: Value, ctx: &Context) -> Result<ToolOutput> {
        let span = tracing::info_span!("dispatch", request_id = %RequestId::new(), method);

        async move {
            let call = match self.prepare(method, &raw, ctx) {
                Ok(call) => call,
                Err(err) => {
                    tracing::debug!(code = err.code(), error = %err, "dispatch rejected");
                    return Err(err);
                }
            };
            let method = call.method;

            match self.invoke(call).await {
                Ok(value) => {
                    tracing::debug!("dispatch succeeded");
                    Ok(ToolOutput::Success(value))
                }
                Err(source) => {
                    tracing::warn!(upstream = %source, "payments api call failed");
                    let err = Error::upstream(method.operation_label(), source);
                    Ok(ToolOutput::Failure(err.to_string()))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn invoke(&self, call: PreparedCall) -> ApiResult<Value> {
        let deadline = self.config.call_timeout;
        match tokio::time::timeout(deadline, self.route(call)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(deadline)),
        }
    }

    async fn route(&self, call: PreparedCall) -> ApiResult<Value> {
        let PreparedCall {
            method,
            params,
            options,
        } = call;
        let api = &*self.api;

        match method {
            Method::CreateCustomer => {
                let customer = api.create_customer(params.into_value(), options).await?;
                Ok(project(&customer, &[("id", "id")]))
            }
            Method::ListCustomers => {
                let page = api.list_customers(params.into_value(), options).await?;
                Ok(Value::Array(
                    page.data.iter().map(|c| project(c, &[("id", "id")])).collect(),
                ))
            }
            Method::CreateProduct => api.create_product(params.into_value(), options).await,
            Method::ListProducts => {
                let page = api.list_products(params.into_value(), options).await?;
                Ok(Value::Array(page.data))
            }
            Method::CreatePrice => api.create_price(params.into_value(), options).await,
            Method::ListPrices => {
                let page = api.list_prices(params.into_value(), options).await?;
                Ok(Value::Array(page.data))
            }
            Method::CreatePaymentLink => {
                let payload = json!({ "line_items": [params.into_value()] });
                let link = api.create_payment_link(payload, options).await?;
                Ok(project(&link, &[("id", "id"), ("url", "url")]))
            }
            Method::CreateInvoice => {
                let invoice = api.create_invoice(params.into_value(), options).await?;
                Ok(invoice_summary(&invoice))
            }
            Method::CreateInvoiceItem => {
                let item = api.create_invoice_item(params.into_value(), options).await?;
                Ok(project(&item, &[("id", "id"), ("invoice", "invoice")]))
            }
            Method::FinalizeInvoice => {
                let invoice = id_param(&params, "invoice");
                let invoice = api.finalize_invoice(invoice, options).await?;
                Ok(invoice_summary(&invoice))
            }
            Method::RetrieveBalance => api.retrieve_balance(params.into_value(), options).await,
            Method::CreateRefund => api.create_refund(params.into_value(), options).await,
            Method::CancelSubscription => {
                let subscription = id_param(&params, "subscription");
                api.cancel_subscription(subscription, options).await
            }
        }
    }
}

// =============================================================================
// Pre-dispatch
// =============================================================================

/// Resolve, permission-check, validate and merge context for one call.
///
/// Pure: touches only the registry and the given values.
pub fn prepare_call(
    registry: &ToolRegistry,
    binding: CustomerBinding,
    method: &str,
    raw: &Value,
    ctx: &Context,
) -> Result<PreparedCall> {
    let entry = registry.lookup(method)?;

    if let Some(permissions) = &ctx.permissions {
        if let Some((resource, operation)) = permissions.first_denied(&entry.actions) {
            return Err(Error::PermissionDenied {
                method: entry.method.as_str().to_string(),
                resource,
                operation,
            });
        }
    }

    let mut params = entry.parameters.validate(raw)?;
    if entry.method.binds_customer() {
        bind_customer(binding, &mut params, ctx)?;
    }

    Ok(PreparedCall {
        method: entry.method,
        params,
        options: ctx.request_options(),
    })
}

fn bind_customer(binding: CustomerBinding, params: &mut ValidatedParams, ctx: &Context) -> Result<()> {
    match binding {
        CustomerBinding::Passthrough => Ok(()),
        CustomerBinding::Require => {
            if let Some(customer) = &ctx.customer {
                params.set("customer", Value::String(customer.as_str().to_string()));
                Ok(())
            } else if params.contains("customer") {
                Ok(())
            } else {
                Err(Error::missing_field("customer"))
            }
        }
    }
}

// =============================================================================
// Result projections
// =============================================================================

/// Copy `(output, source)` fields out of an API object. Absent fields are omitted.
fn project(source: &Value, fields: &[(&str, &str)]) -> Value {
    let mut out = Map::new();
    for (to, from) in fields {
        if let Some(value) = source.get(*from) {
            out.insert((*to).to_string(), value.clone());
        }
    }
    Value::Object(out)
}

fn invoice_summary(invoice: &Value) -> Value {
    project(
        invoice,
        &[
            ("id", "id"),
            ("url", "hosted_invoice_url"),
            ("customer", "customer"),
            ("status", "status"),
        ],
    )
}

// Required by the schema, so always present after validation.
fn id_param(params: &ValidatedParams, name: &str) -> String {
    params.get_str(name).unwrap_or_default().to_string()
}

// =============================================================================
// Tests
// =============================================================================
