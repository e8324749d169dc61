//! The backend seam used by the app layer.
//!
//! [`InventoryApi`] is the production implementation; tests substitute an
//! in-memory backend.

use async_trait::async_trait;

use stockroom_core::member::{CreateMember, Member};
use stockroom_core::office::Office;
use stockroom_core::product::{CreateProduct, Product, ProductPatch, ReassignProduct};
use stockroom_core::shipment::{Shipment, ShipmentPatch};
use stockroom_core::team::{Team, TeamInput};

use crate::api::InventoryApi;
use crate::error::ApiError;

#[async_trait]
pub trait InventoryBackend: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;
    async fn get_product(&self, id: &str) -> Result<Product, ApiError>;
    async fn list_products_by_entity(&self, entity_id: &str) -> Result<Vec<Product>, ApiError>;
    async fn create_product(&self, body: &CreateProduct) -> Result<Product, ApiError>;
    async fn bulk_create_products(&self, body: &[CreateProduct]) -> Result<Vec<Product>, ApiError>;
    async fn update_product(&self, id: &str, body: &ProductPatch) -> Result<Product, ApiError>;
    async fn reassign_product(&self, id: &str, body: &ReassignProduct) -> Result<Product, ApiError>;
    async fn delete_product(&self, id: &str) -> Result<(), ApiError>;
    async fn export_products_csv(&self) -> Result<Vec<u8>, ApiError>;

    async fn list_members(&self) -> Result<Vec<Member>, ApiError>;
    async fn get_member(&self, id: &str) -> Result<Member, ApiError>;
    async fn create_member(&self, body: &CreateMember) -> Result<Member, ApiError>;
    async fn update_member(&self, id: &str, body: &CreateMember) -> Result<Member, ApiError>;
    async fn delete_member(&self, id: &str) -> Result<(), ApiError>;

    async fn list_shipments(&self) -> Result<Vec<Shipment>, ApiError>;
    async fn get_shipment(&self, id: &str) -> Result<Shipment, ApiError>;
    async fn update_shipment(&self, id: &str, body: &ShipmentPatch) -> Result<Shipment, ApiError>;
    async fn delete_shipment(&self, id: &str) -> Result<(), ApiError>;

    async fn list_offices(&self) -> Result<Vec<Office>, ApiError>;

    async fn list_teams(&self) -> Result<Vec<Team>, ApiError>;
    async fn create_team(&self, body: &TeamInput) -> Result<Team, ApiError>;
    async fn update_team(&self, id: &str, body: &TeamInput) -> Result<Team, ApiError>;
    async fn delete_team(&self, id: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl InventoryBackend for InventoryApi {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        InventoryApi::list_products(self).await
    }

    async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        InventoryApi::get_product(self, id).await
    }

    async fn list_products_by_entity(&self, entity_id: &str) -> Result<Vec<Product>, ApiError> {
        InventoryApi::list_products_by_entity(self, entity_id).await
    }

    async fn create_product(&self, body: &CreateProduct) -> Result<Product, ApiError> {
        InventoryApi::create_product(self, body).await
    }

    async fn bulk_create_products(&self, body: &[CreateProduct]) -> Result<Vec<Product>, ApiError> {
        InventoryApi::bulk_create_products(self, body).await
    }

    async fn update_product(&self, id: &str, body: &ProductPatch) -> Result<Product, ApiError> {
        InventoryApi::update_product(self, id, body).await
    }

    async fn reassign_product(&self, id: &str, body: &ReassignProduct) -> Result<Product, ApiError> {
        InventoryApi::reassign_product(self, id, body).await
    }

    async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        InventoryApi::delete_product(self, id).await
    }

    async fn export_products_csv(&self) -> Result<Vec<u8>, ApiError> {
        InventoryApi::export_products_csv(self).await
    }

    async fn list_members(&self) -> Result<Vec<Member>, ApiError> {
        InventoryApi::list_members(self).await
    }

    async fn get_member(&self, id: &str) -> Result<Member, ApiError> {
        InventoryApi::get_member(self, id).await
    }

    async fn create_member(&self, body: &CreateMember) -> Result<Member, ApiError> {
        InventoryApi::create_member(self, body).await
    }

    async fn update_member(&self, id: &str, body: &CreateMember) -> Result<Member, ApiError> {
        InventoryApi::update_member(self, id, body).await
    }

    async fn delete_member(&self, id: &str) -> Result<(), ApiError> {
        InventoryApi::delete_member(self, id).await
    }

    async fn list_shipments(&self) -> Result<Vec<Shipment>, ApiError> {
        InventoryApi::list_shipments(self).await
    }

    async fn get_shipment(&self, id: &str) -> Result<Shipment, ApiError> {
        InventoryApi::get_shipment(self, id).await
    }

    async fn update_shipment(&self, id: &str, body: &ShipmentPatch) -> Result<Shipment, ApiError> {
        InventoryApi::update_shipment(self, id, body).await
    }

    async fn delete_shipment(&self, id: &str) -> Result<(), ApiError> {
        InventoryApi::delete_shipment(self, id).await
    }

    async fn list_offices(&self) -> Result<Vec<Office>, ApiError> {
        InventoryApi::list_offices(self).await
    }

    async fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        InventoryApi::list_teams(self).await
    }

    async fn create_team(&self, body: &TeamInput) -> Result<Team, ApiError> {
        InventoryApi::create_team(self, body).await
    }

    async fn update_team(&self, id: &str, body: &TeamInput) -> Result<Team, ApiError> {
        InventoryApi::update_team(self, id, body).await
    }

    async fn delete_team(&self, id: &str) -> Result<(), ApiError> {
        InventoryApi::delete_team(self, id).await
    }
}
