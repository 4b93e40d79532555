//! External payments API seam.
//!
//! [`PaymentsApi`] is the boundary to the provider SDK: one async method per
//! operation, each taking the request payload and the out-of-band
//! [`RequestOptions`]. Implementations own networking, retries and connection
//! limits; this crate only routes to them.

use crate::types::AccountId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type for collaborator calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure reported by the payments API (or by the call boundary around it).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Provider rejected the request.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// Call exceeded the configured deadline.
    #[error("call timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Call was cancelled before completing.
    #[error("call cancelled")]
    Cancelled,
}

/// Out-of-band routing metadata sent alongside a request, never merged into the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Connected account the call acts on behalf of. `None` uses the platform account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountId>,
}

impl RequestOptions {
    pub fn for_account(account: Option<AccountId>) -> Self {
        Self { account }
    }

    pub fn account_str(&self) -> Option<&str> {
        self.account.as_ref().map(AccountId::as_str)
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    pub data: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
}

impl ListPage {
    pub fn new(data: Vec<Value>) -> Self {
        Self {
            data,
            has_more: false,
        }
    }
}

/// Payment-provider operations the dispatcher can route to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    async fn create_customer(&self, params: Value, options: RequestOptions) -> ApiResult<Value>;

    async fn list_customers(&self, params: Value, options: RequestOptions) -> ApiResult<ListPage>;

    async fn create_product(&self, params: Value, options: RequestOptions) -> ApiResult<Value>;

    async fn list_products(&self, params: Value, options: RequestOptions) -> ApiResult<ListPage>;

    async fn create_price(&self, params: Value, options: RequestOptions) -> ApiResult<Value>;

    async fn list_prices(&self, params: Value, options: RequestOptions) -> ApiResult<ListPage>;

    async fn create_payment_link(&self, params: Value, options: RequestOptions)
        -> ApiResult<Value>;

    async fn create_invoice(&self, params: Value, options: RequestOptions) -> ApiResult<Value>;

    async fn create_invoice_item(&self, params: Value, options: RequestOptions)
        -> ApiResult<Value>;

    async fn finalize_invoice(&self, invoice: String, options: RequestOptions)
        -> ApiResult<Value>;

    async fn retrieve_balance(&self, params: Value, options: RequestOptions) -> ApiResult<Value>;

    async fn create_refund(&self, params: Value, options: RequestOptions) -> ApiResult<Value>;

    async fn cancel_subscription(
        &self,
        subscription: String,
        options: RequestOptions,
    ) -> ApiResult<Value>;
}
