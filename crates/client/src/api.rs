//! REST API client for the inventory backend.
//!
//! Wraps the `/api/...` endpoints (products, members, shipments, offices,
//! teams) using [`reqwest`]. Every method maps one HTTP call; retries are
//! limited to bulk create, which the backend throttles.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use stockroom_core::member::{CreateMember, Member};
use stockroom_core::office::Office;
use stockroom_core::product::{CreateProduct, Product, ProductPatch, ReassignProduct};
use stockroom_core::shipment::{Shipment, ShipmentPatch};
use stockroom_core::team::{Team, TeamInput};

use crate::error::ApiError;
use crate::retry::RetryPolicy;

/// HTTP client for one tenant's inventory backend.
#[derive(Debug, Clone)]
pub struct InventoryApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    bulk_retry: RetryPolicy,
}

impl InventoryApi {
    /// Create a client with its own connection pool.
    ///
    /// * `base_url` - Backend origin, e.g. `http://localhost:3000`.
    /// * `timeout` - Per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            bulk_retry: RetryPolicy::default(),
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Override the retry policy used for bulk create.
    pub fn with_bulk_retry(mut self, policy: RetryPolicy) -> Self {
        self.bulk_retry = policy;
        self
    }

    /// Backend origin requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- products ----

    /// List every product of the tenant.
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("/api/products").await
    }

    /// Fetch one product by id.
    pub async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        self.get_json(&format!("/api/products/{id}")).await
    }

    /// Products currently held by a member or office.
    pub async fn list_products_by_entity(&self, entity_id: &str) -> Result<Vec<Product>, ApiError> {
        self.get_json(&format!("/api/products/entity/{entity_id}"))
            .await
    }

    /// Create a single product. Its status is derived by the caller.
    pub async fn create_product(&self, body: &CreateProduct) -> Result<Product, ApiError> {
        self.send_json(Method::POST, "/api/products", body).await
    }

    /// Create several products in one call.
    ///
    /// HTTP 429 responses are retried with exponential backoff up to the
    /// configured number of attempts.
    pub async fn bulk_create_products(
        &self,
        body: &[CreateProduct],
    ) -> Result<Vec<Product>, ApiError> {
        self.bulk_retry
            .run("bulk_create_products", move || {
                self.send_json(Method::POST, "/api/products/bulkcreate", body)
            })
            .await
    }

    /// Partially update a product. Unset patch fields are not sent.
    pub async fn update_product(&self, id: &str, body: &ProductPatch) -> Result<Product, ApiError> {
        self.send_json(Method::PATCH, &format!("/api/products/{id}"), body)
            .await
    }

    /// Move a product to a member, an office or the warehouse, optionally
    /// creating a shipment.
    pub async fn reassign_product(
        &self,
        id: &str,
        body: &ReassignProduct,
    ) -> Result<Product, ApiError> {
        self.send_json(Method::PATCH, &format!("/api/products/{id}/reassign"), body)
            .await
    }

    /// Delete a product.
    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/products/{id}")).await
    }

    /// Download the product table as CSV. The bytes are passed through
    /// untouched.
    pub async fn export_products_csv(&self) -> Result<Vec<u8>, ApiError> {
        let path = "/api/products/export-csv";
        let response = self.request(Method::GET, path).send().await?;
        let response = Self::ensure_success(Method::GET, path, response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- members ----

    /// List members with their products and team.
    pub async fn list_members(&self) -> Result<Vec<Member>, ApiError> {
        self.get_json("/api/members").await
    }

    /// Fetch one member by id.
    pub async fn get_member(&self, id: &str) -> Result<Member, ApiError> {
        self.get_json(&format!("/api/members/{id}")).await
    }

    /// Create a member.
    pub async fn create_member(&self, body: &CreateMember) -> Result<Member, ApiError> {
        self.send_json(Method::POST, "/api/members", body).await
    }

    /// Update a member's profile and team.
    pub async fn update_member(&self, id: &str, body: &CreateMember) -> Result<Member, ApiError> {
        self.send_json(Method::PATCH, &format!("/api/members/{id}"), body)
            .await
    }

    /// Delete a member.
    pub async fn delete_member(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/members/{id}")).await
    }

    // ---- shipments ----

    /// List shipments, newest first as returned by the backend.
    pub async fn list_shipments(&self) -> Result<Vec<Shipment>, ApiError> {
        self.get_json("/api/shipments").await
    }

    /// Fetch one shipment by id.
    pub async fn get_shipment(&self, id: &str) -> Result<Shipment, ApiError> {
        self.get_json(&format!("/api/shipments/{id}")).await
    }

    /// Partially update a shipment, e.g. to cancel it.
    pub async fn update_shipment(
        &self,
        id: &str,
        body: &ShipmentPatch,
    ) -> Result<Shipment, ApiError> {
        self.send_json(Method::PATCH, &format!("/api/shipments/{id}"), body)
            .await
    }

    /// Delete a shipment.
    pub async fn delete_shipment(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/shipments/{id}")).await
    }

    // ---- offices ----

    /// List the tenant's offices.
    pub async fn list_offices(&self) -> Result<Vec<Office>, ApiError> {
        self.get_json("/api/offices").await
    }

    // ---- teams ----

    /// List teams.
    pub async fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        self.get_json("/api/teams").await
    }

    /// Create a team.
    pub async fn create_team(&self, body: &TeamInput) -> Result<Team, ApiError> {
        self.send_json(Method::POST, "/api/teams", body).await
    }

    /// Rename or recolor a team.
    pub async fn update_team(&self, id: &str, body: &TeamInput) -> Result<Team, ApiError> {
        self.send_json(Method::PATCH, &format!("/api/teams/{id}"), body)
            .await
    }

    /// Delete a team. Its members are left without a team.
    pub async fn delete_team(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/teams/{id}")).await
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        tracing::debug!(method = %method, path, "Sending request");
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        Self::parse_response(Method::GET, path, response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(method.clone(), path)
            .json(body)
            .send()
            .await?;
        Self::parse_response(method, path, response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::ensure_success(Method::DELETE, path, response).await?;
        Ok(())
    }

    /// Return the response unchanged on a 2xx status, or an
    /// [`ApiError::Status`] carrying the body on failure.
    async fn ensure_success(
        method: Method,
        path: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let err = ApiError::from_status(status.as_u16(), body);
            tracing::warn!(
                method = %method,
                path,
                status = status.as_u16(),
                error = %err,
                "Request failed",
            );
            return Err(err);
        }
        tracing::debug!(method = %method, path, status = status.as_u16(), "Request succeeded");
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        method: Method,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(method, path, response).await?;
        Ok(response.json::<T>().await?)
    }
}
