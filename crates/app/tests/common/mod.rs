//! Shared helpers for app integration tests: an in-memory backend and
//! fixture documents.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use stockroom_app::AppContext;
use stockroom_client::{ApiError, InventoryBackend};
use stockroom_core::member::{CreateMember, Member};
use stockroom_core::office::Office;
use stockroom_core::product::{CreateProduct, Product, ProductPatch, ReassignProduct};
use stockroom_core::profile::UserProfile;
use stockroom_core::shipment::{Shipment, ShipmentPatch};
use stockroom_core::team::{Team, TeamInput};

// ---------------------------------------------------------------------------
// Fake backend
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Data {
    products: Vec<Product>,
    members: Vec<Member>,
    shipments: Vec<Shipment>,
    offices: Vec<Office>,
    teams: Vec<Team>,
    next_id: u32,
}

/// Backend keeping its collections in memory and recording every call.
#[derive(Default)]
pub struct FakeBackend {
    data: Mutex<Data>,
    calls: Mutex<Vec<&'static str>>,
    fail_next: Mutex<Option<(u16, String)>>,
    hold_next: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.data.lock().unwrap().products = products;
        self
    }

    pub fn with_members(self, members: Vec<Member>) -> Self {
        self.data.lock().unwrap().members = members;
        self
    }

    pub fn with_shipments(self, shipments: Vec<Shipment>) -> Self {
        self.data.lock().unwrap().shipments = shipments;
        self
    }

    pub fn with_offices(self, offices: Vec<Office>) -> Self {
        self.data.lock().unwrap().offices = offices;
        self
    }

    pub fn with_teams(self, teams: Vec<Team>) -> Self {
        self.data.lock().unwrap().teams = teams;
        self
    }

    /// Make the next write fail with `status` and `body`.
    pub fn fail_next(&self, status: u16, body: &str) {
        *self.fail_next.lock().unwrap() = Some((status, body.to_string()));
    }

    /// Make the next write wait until the returned sender fires.
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold_next.lock().unwrap() = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn products(&self) -> Vec<Product> {
        self.data.lock().unwrap().products.clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    /// Record a write, then honour any injected hold or failure.
    async fn write(&self, call: &'static str) -> Result<(), ApiError> {
        self.record(call);
        let hold = self.hold_next.lock().unwrap().take();
        if let Some(rx) = hold {
            let _ = rx.await;
        }
        match self.fail_next.lock().unwrap().take() {
            Some((status, body)) => Err(ApiError::from_status(status, body)),
            None => Ok(()),
        }
    }

    fn mint_id(&self, prefix: &str) -> String {
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        format!("{prefix}-new-{}", data.next_id)
    }
}

fn not_found(kind: &str, id: &str) -> ApiError {
    ApiError::from_status(404, json!({ "message": format!("{kind} {id} not found") }).to_string())
}

fn bad_request(message: impl std::fmt::Display) -> ApiError {
    ApiError::from_status(400, json!({ "message": message.to_string() }).to_string())
}

#[async_trait]
impl InventoryBackend for FakeBackend {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.record("list_products");
        Ok(self.data.lock().unwrap().products.clone())
    }

    async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        self.record("get_product");
        let data = self.data.lock().unwrap();
        data.products
            .iter()
            .find(|x| x.id == id)
            .cloned()
            .ok_or_else(|| not_found("Product", id))
    }

    async fn list_products_by_entity(&self, entity_id: &str) -> Result<Vec<Product>, ApiError> {
        self.record("list_products_by_entity");
        let data = self.data.lock().unwrap();
        let email = data
            .members
            .iter()
            .find(|m| m.id == entity_id)
            .map(|m| m.email.clone());
        Ok(data
            .products
            .iter()
            .filter(|p| match &email {
                Some(email) => p.is_assigned_to(email),
                None => p.office_id.as_deref() == Some(entity_id),
            })
            .cloned()
            .collect())
    }

    async fn create_product(&self, body: &CreateProduct) -> Result<Product, ApiError> {
        self.write("create_product").await?;
        let id = self.mint_id("p");
        let product = body.to_optimistic(id).map_err(bad_request)?;
        self.data.lock().unwrap().products.push(product.clone());
        Ok(product)
    }

    async fn bulk_create_products(&self, body: &[CreateProduct]) -> Result<Vec<Product>, ApiError> {
        self.write("bulk_create_products").await?;
        let mut created = Vec::with_capacity(body.len());
        for item in body {
            let id = self.mint_id("p");
            created.push(item.to_optimistic(id).map_err(bad_request)?);
        }
        self.data.lock().unwrap().products.extend(created.iter().cloned());
        Ok(created)
    }

    async fn update_product(&self, id: &str, body: &ProductPatch) -> Result<Product, ApiError> {
        self.write("update_product").await?;
        let mut data = self.data.lock().unwrap();
        let slot = data
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("Product", id))?;
        *slot = body.apply_to(slot).map_err(bad_request)?;
        Ok(slot.clone())
    }

    async fn reassign_product(&self, id: &str, body: &ReassignProduct) -> Result<Product, ApiError> {
        self.write("reassign_product").await?;
        let mut data = self.data.lock().unwrap();
        let slot = data
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("Product", id))?;
        *slot = body.apply_to(slot);
        Ok(slot.clone())
    }

    async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        self.write("delete_product").await?;
        let mut data = self.data.lock().unwrap();
        let before = data.products.len();
        data.products.retain(|p| p.id != id);
        if data.products.len() == before {
            return Err(not_found("Product", id));
        }
        Ok(())
    }

    async fn export_products_csv(&self) -> Result<Vec<u8>, ApiError> {
        self.record("export_products_csv");
        let data = self.data.lock().unwrap();
        let mut csv = String::from("id,category\n");
        for p in &data.products {
            csv.push_str(&format!("{},{}\n", p.id, p.category()));
        }
        Ok(csv.into_bytes())
    }

    async fn list_members(&self) -> Result<Vec<Member>, ApiError> {
        self.record("list_members");
        Ok(self.data.lock().unwrap().members.clone())
    }

    async fn get_member(&self, id: &str) -> Result<Member, ApiError> {
        self.record("get_member");
        let data = self.data.lock().unwrap();
        data.members
            .iter()
            .find(|x| x.id == id)
            .cloned()
            .ok_or_else(|| not_found("Member", id))
    }

    async fn create_member(&self, body: &CreateMember) -> Result<Member, ApiError> {
        self.write("create_member").await?;
        let id = self.mint_id("m");
        let mut data = self.data.lock().unwrap();
        if data.members.iter().any(|m| m.has_email(&body.email)) {
            return Err(bad_request("Email already exists"));
        }
        let team = body
            .team
            .as_deref()
            .and_then(|t| data.teams.iter().find(|team| team.id == t).cloned());
        let member = body.to_optimistic(id, team);
        data.members.push(member.clone());
        Ok(member)
    }

    async fn update_member(&self, id: &str, body: &CreateMember) -> Result<Member, ApiError> {
        self.write("update_member").await?;
        let mut data = self.data.lock().unwrap();
        let team = body
            .team
            .as_deref()
            .and_then(|t| data.teams.iter().find(|team| team.id == t).cloned());
        let slot = data
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("Member", id))?;
        *slot = body.apply_to(slot, team);
        Ok(slot.clone())
    }

    async fn delete_member(&self, id: &str) -> Result<(), ApiError> {
        self.write("delete_member").await?;
        self.data.lock().unwrap().members.retain(|m| m.id != id);
        Ok(())
    }

    async fn list_shipments(&self) -> Result<Vec<Shipment>, ApiError> {
        self.record("list_shipments");
        Ok(self.data.lock().unwrap().shipments.clone())
    }

    async fn get_shipment(&self, id: &str) -> Result<Shipment, ApiError> {
        self.record("get_shipment");
        let data = self.data.lock().unwrap();
        data.shipments
            .iter()
            .find(|x| x.id == id)
            .cloned()
            .ok_or_else(|| not_found("Shipment", id))
    }

    async fn update_shipment(&self, id: &str, body: &ShipmentPatch) -> Result<Shipment, ApiError> {
        self.write("update_shipment").await?;
        let mut data = self.data.lock().unwrap();
        let slot = data
            .shipments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("Shipment", id))?;
        *slot = body.apply_to(slot).map_err(bad_request)?;
        Ok(slot.clone())
    }

    async fn delete_shipment(&self, id: &str) -> Result<(), ApiError> {
        self.write("delete_shipment").await?;
        self.data.lock().unwrap().shipments.retain(|s| s.id != id);
        Ok(())
    }

    async fn list_offices(&self) -> Result<Vec<Office>, ApiError> {
        self.record("list_offices");
        Ok(self.data.lock().unwrap().offices.clone())
    }

    async fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        self.record("list_teams");
        Ok(self.data.lock().unwrap().teams.clone())
    }

    async fn create_team(&self, body: &TeamInput) -> Result<Team, ApiError> {
        self.write("create_team").await?;
        let team = Team {
            id: self.mint_id("t"),
            name: body.name.clone(),
            color: body.color.clone(),
            members: Vec::new(),
        };
        self.data.lock().unwrap().teams.push(team.clone());
        Ok(team)
    }

    async fn update_team(&self, id: &str, body: &TeamInput) -> Result<Team, ApiError> {
        self.write("update_team").await?;
        let mut data = self.data.lock().unwrap();
        let slot = data
            .teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Team", id))?;
        slot.name = body.name.clone();
        slot.color = body.color.clone();
        Ok(slot.clone())
    }

    async fn delete_team(&self, id: &str) -> Result<(), ApiError> {
        self.write("delete_team").await?;
        self.data.lock().unwrap().teams.retain(|t| t.id != id);
        Ok(())
    }
}

/// A context over `backend` with a complete company profile.
pub fn context(backend: Arc<FakeBackend>) -> AppContext {
    AppContext::with_default_stale_time(backend, profile())
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn profile() -> UserProfile {
    serde_json::from_value(json!({
        "email": "admin@acme.io",
        "tenantName": "acme",
        "country": "AR",
        "city": "Buenos Aires",
        "state": "CABA",
        "zipCode": "1425",
        "address": "Av. Santa Fe 1234",
        "phone": "+54 11 5555 0000"
    }))
    .unwrap()
}

fn product_doc(id: &str) -> Value {
    json!({
        "_id": id,
        "category": "Computer",
        "attributes": [
            { "key": "brand", "value": "Apple" },
            { "key": "model", "value": "MacBook Pro" }
        ],
        "status": "Available",
        "productCondition": "Optimal",
        "location": "Our office",
        "serialNumber": format!("SN-{id}"),
        "recoverable": true
    })
}

/// A laptop sitting in the company office.
pub fn laptop_in_office(id: &str) -> Product {
    serde_json::from_value(product_doc(id)).unwrap()
}

/// A laptop delivered to the member with `email`.
pub fn laptop_with(id: &str, email: &str, name: &str) -> Product {
    let mut doc = product_doc(id);
    doc["status"] = json!("Delivered");
    doc["location"] = json!("Employee");
    doc["assignedEmail"] = json!(email);
    doc["assignedMember"] = json!(name);
    serde_json::from_value(doc).unwrap()
}

/// A member with every shipping field filled.
pub fn member(id: &str, first_name: &str, email: &str, country: &str) -> Member {
    serde_json::from_value(json!({
        "_id": id,
        "firstName": first_name,
        "lastName": "Doe",
        "email": email,
        "personalEmail": format!("{first_name}@gmail.com").to_lowercase(),
        "phone": "+54 11 5555 0000",
        "dni": 30111222,
        "country": country,
        "city": "Capital",
        "zipCode": "1000",
        "address": "Main St 1",
        "apartment": "1A",
        "products": []
    }))
    .unwrap()
}

pub fn office(id: &str, name: &str, complete: bool) -> Office {
    let mut doc = json!({
        "_id": id,
        "name": name,
        "country": "AR",
        "isDefault": id == "o1"
    });
    if complete {
        doc["city"] = json!("Buenos Aires");
        doc["state"] = json!("CABA");
        doc["zipCode"] = json!("1425");
        doc["address"] = json!("Av. Corrientes 500");
    }
    serde_json::from_value(doc).unwrap()
}

pub fn shipment(id: &str, status: &str) -> Shipment {
    serde_json::from_value(json!({
        "_id": id,
        "origin": { "type": "warehouse" },
        "destination": { "type": "warehouse" },
        "shipmentStatus": status
    }))
    .unwrap()
}

pub fn team(id: &str, name: &str) -> Team {
    Team {
        id: id.to_string(),
        name: name.to_string(),
        color: None,
        members: Vec::new(),
    }
}
