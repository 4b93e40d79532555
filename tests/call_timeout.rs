//! Call deadline tests. A collaborator that never answers must surface as the
//! uniform failure message once the configured timeout elapses.

use async_trait::async_trait;
use payment_tools::types::DispatchConfig;
use payment_tools::{
    ApiResult, Context, Dispatcher, ListPage, PaymentsApi, RequestOptions, ToolOutput,
    ToolRegistry,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Collaborator whose calls never complete.
#[derive(Debug, Default)]
struct StalledApi {
    calls: AtomicUsize,
}

impl StalledApi {
    async fn stall<T>(&self) -> ApiResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

#[async_trait]
impl PaymentsApi for StalledApi {
    async fn create_customer(&self, _: Value, _: RequestOptions) -> ApiResult<Value> {
        self.stall().await
    }
    async fn list_customers(&self, _: Value, _: RequestOptions) -> ApiResult<ListPage> {
        self.stall().await
    }
    async fn create_product(&self, _: Value, _: RequestOptions) -> ApiResult<Value> {
        self.stall().await
    }
    async fn list_products(&self, _: Value, _: RequestOptions) -> ApiResult<ListPage> {
        self.stall().await
    }
    async fn create_price(&self, _: Value, _: RequestOptions) -> ApiResult<Value> {
        self.stall().await
    }
    async fn list_prices(&self, _: Value, _: RequestOptions) -> ApiResult<ListPage> {
        self.stall().await
    }
    async fn create_payment_link(&self, _: Value, _: RequestOptions) -> ApiResult<Value> {
        self.stall().await
    }
    async fn create_invoice(&self, _: Value, _: RequestOptions) -> ApiResult<Value> {
        self.stall().await
    }
    async fn create_invoice_item(&self, _: Value, _: RequestOptions) -> ApiResult<Value> {
        self.stall().await
    }
    async fn finalize_invoice(&self, _: String, _: RequestOptions) -> ApiResult<Value> {
        self.stall().await
    }
    async fn retrieve_balance(&self, _: Value, _: RequestOptions) -> ApiResult<Value> {
        self.stall().await
    }
    async fn create_refund(&self, _: Value, _: RequestOptions) -> ApiResult<Value> {
        self.stall().await
    }
    async fn cancel_subscription(&self, _: String, _: RequestOptions) -> ApiResult<Value> {
        self.stall().await
    }
}

fn dispatcher(api: Arc<StalledApi>) -> Dispatcher<StalledApi> {
    let config = DispatchConfig {
        call_timeout: Duration::from_millis(20),
        ..DispatchConfig::default()
    };
    Dispatcher::with_config(Arc::new(ToolRegistry::builtin().unwrap()), api, config)
}

#[tokio::test]
async fn test_timeout_becomes_uniform_failure() {
    let api = Arc::new(StalledApi::default());
    let out = dispatcher(Arc::clone(&api))
        .dispatch("retrieve_balance", json!({}), &Context::new())
        .await
        .unwrap();

    assert_eq!(out, ToolOutput::Failure("Failed to retrieve balance".to_string()));
    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_list_timeout_uses_operation_label() {
    let api = Arc::new(StalledApi::default());
    let out = dispatcher(api)
        .dispatch("list_products", json!({"limit": 5}), &Context::new())
        .await
        .unwrap();

    assert_eq!(out.failure(), Some("Failed to list products"));
}

#[tokio::test]
async fn test_rejected_call_never_reaches_stalled_api() {
    let api = Arc::new(StalledApi::default());
    let result = dispatcher(Arc::clone(&api))
        .dispatch("create_payment_link", json!({"price": "price_1"}), &Context::new())
        .await;

    assert!(result.is_err());
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}
