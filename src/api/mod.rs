//! Clients for the kiosk backend.
//!
//! [`KioskApi`] is everything the ordering flow needs from the backend.
//! [`HttpClient`] implements it over HTTP and additionally exposes the
//! back-office endpoints used by staff screens; [`OfflineApi`] serves a local
//! menu without any network.

use std::future::Future;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::Amount;
use crate::loyalty::LoyaltyAccount;
use crate::model::{ItemId, MenuItem};

mod backoffice;
pub use backoffice::{
    DEFAULT_LOW_STOCK_THRESHOLD, Employee, EmployeeUpdate, InventoryItem, NewEmployee,
    RestockItem, SessionUser,
};

mod error;
pub use error::ApiError;

mod offline;
pub use offline::OfflineApi;

#[cfg(test)]
mod test_server;

pub mod wire;
use wire::{
    EarnReply, EarnRequest, OrderConfirmation, OrderRequest, RedeemReply, RedeemRequest,
    StockReply, StockRequest,
};

/// Backend operations the ordering flow depends on.
pub trait KioskApi: Send + Sync {
    fn fetch_menu(&self) -> impl Future<Output = Result<Vec<MenuItem>, ApiError>> + Send;

    fn check_stock(
        &self,
        item: &ItemId,
        qty: u32,
    ) -> impl Future<Output = Result<StockReply, ApiError>> + Send;

    fn submit_order(
        &self,
        order: &OrderRequest,
    ) -> impl Future<Output = Result<OrderConfirmation, ApiError>> + Send;

    fn fetch_loyalty_account(
        &self,
        customer: &str,
    ) -> impl Future<Output = Result<LoyaltyAccount, ApiError>> + Send;

    fn earn_loyalty_points(
        &self,
        customer: &str,
        amount: Amount,
    ) -> impl Future<Output = Result<EarnReply, ApiError>> + Send;

    fn redeem_loyalty_points(
        &self,
        request: &RedeemRequest<'_>,
    ) -> impl Future<Output = Result<RedeemReply, ApiError>> + Send;
}

/// Deployed backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://abra-backend.vercel.app/api";

/// JSON-over-HTTP client for the kiosk backend.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base: String,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Join `path` onto the base url, adding the leading slash if missing.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base)
        } else {
            format!("{}/{path}", self.base)
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        context: &'static str,
    ) -> Result<T, ApiError> {
        let mut request = self.http.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request, context).await
    }

    pub(crate) async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        context: &'static str,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.request(method, self.url(path)).json(body);
        self.execute(request, context).await
    }

    pub(crate) async fn delete(&self, path: &str, context: &'static str) -> Result<Value, ApiError> {
        let request = self.http.delete(self.url(path));
        self.execute(request, context).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Http { context, source })?;

        let status = response.status();
        debug!(status = %status, url = %response.url(), "backend responded");
        if !status.is_success() {
            return Err(ApiError::Status { context, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Http { context, source })?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { context, source })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl KioskApi for HttpClient {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, ApiError> {
        let payload: Value = self.get("/menu", &[], "Failed to load menu").await?;
        Ok(wire::coerce_menu(payload))
    }

    async fn check_stock(&self, item: &ItemId, qty: u32) -> Result<StockReply, ApiError> {
        let body = StockRequest { item_id: item, qty };
        self.send(Method::POST, "/check-stock", &body, "Stock check failed")
            .await
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderConfirmation, ApiError> {
        self.send(Method::POST, "/order", order, "Failed to submit order")
            .await
    }

    async fn fetch_loyalty_account(&self, customer: &str) -> Result<LoyaltyAccount, ApiError> {
        let query = [("customer", customer.to_string())];
        self.get("/loyalty", &query, "Failed to load loyalty account")
            .await
    }

    async fn earn_loyalty_points(
        &self,
        customer: &str,
        amount: Amount,
    ) -> Result<EarnReply, ApiError> {
        let body = EarnRequest { customer, amount };
        self.send(Method::POST, "/loyalty/earn", &body, "Failed to add loyalty points")
            .await
    }

    async fn redeem_loyalty_points(
        &self,
        request: &RedeemRequest<'_>,
    ) -> Result<RedeemReply, ApiError> {
        self.send(Method::POST, "/loyalty/redeem", request, "Failed to redeem rewards")
            .await
    }
}
