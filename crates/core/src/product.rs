//! Products (tracked equipment) and their request DTOs.

use serde::{Deserialize, Serialize};

use crate::category::{AttributeEntry, Category, ProductAttributes};
use crate::error::CoreError;
use crate::location::Location;
use crate::status::{calculate_status, ProductCondition, ProductStatus};
use crate::types::{Date, EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Purchase price of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub amount: f64,
    pub currency_code: String,
}

/// A tracked piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductWire", into = "ProductWire")]
pub struct Product {
    pub id: EntityId,
    pub name: Option<String>,
    pub attributes: ProductAttributes,
    pub status: ProductStatus,
    pub condition: ProductCondition,
    pub location: Option<Location>,
    pub assigned_email: Option<String>,
    pub assigned_member: Option<String>,
    pub price: Option<Price>,
    pub serial_number: Option<String>,
    pub recoverable: bool,
    pub office_id: Option<EntityId>,
    pub acquisition_date: Option<Date>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl Product {
    pub fn category(&self) -> Category {
        self.attributes.category()
    }

    /// Status implied by the product's condition, location and assignee.
    pub fn derived_status(&self) -> ProductStatus {
        calculate_status(
            Some(self.condition),
            self.location,
            self.assigned_email.as_deref(),
        )
    }

    /// Recompute the status after a local edit.
    ///
    /// Transit and deprecated statuses belong to the server and are kept.
    pub fn refresh_status(&mut self) {
        if self.status.is_in_transit() || self.status == ProductStatus::Deprecated {
            return;
        }
        self.status = self.derived_status();
    }

    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assigned_email
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case(email))
    }

    /// Name for tables and dialogs: the explicit name, else brand and model.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.attributes.display_name())
            .unwrap_or_else(|| self.category().to_string())
    }
}

/// Wire representation of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductWire {
    #[serde(rename = "_id")]
    id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    category: Category,
    #[serde(default)]
    attributes: Vec<AttributeEntry>,
    status: ProductStatus,
    #[serde(default)]
    product_condition: ProductCondition,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    assigned_email: Option<String>,
    #[serde(default)]
    assigned_member: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<Price>,
    #[serde(default)]
    serial_number: Option<String>,
    #[serde(default)]
    recoverable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    office_id: Option<EntityId>,
    #[serde(
        default,
        deserialize_with = "crate::serde_helpers::lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    acquisition_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<Timestamp>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<ProductWire> for Product {
    type Error = CoreError;

    fn try_from(wire: ProductWire) -> Result<Self, Self::Error> {
        let attributes = ProductAttributes::from_pairs(wire.category, &wire.attributes)?;
        let location = non_empty(wire.location)
            .map(|l| Location::parse(&l))
            .transpose()?;

        Ok(Self {
            id: wire.id,
            name: non_empty(wire.name),
            attributes,
            status: wire.status,
            condition: wire.product_condition,
            location,
            assigned_email: non_empty(wire.assigned_email),
            assigned_member: non_empty(wire.assigned_member),
            price: wire.price,
            serial_number: non_empty(wire.serial_number),
            recoverable: wire.recoverable,
            office_id: wire.office_id,
            acquisition_date: wire.acquisition_date,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}

impl From<Product> for ProductWire {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.attributes.category(),
            attributes: p.attributes.to_pairs(),
            status: p.status,
            product_condition: p.condition,
            location: p.location.map(|l| l.as_str().to_string()),
            assigned_email: p.assigned_email,
            assigned_member: p.assigned_member,
            price: p.price,
            serial_number: p.serial_number,
            recoverable: p.recoverable,
            office_id: p.office_id,
            acquisition_date: p.acquisition_date,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /api/products` and one element of a bulk create.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub category: Category,
    pub attributes: Vec<AttributeEntry>,
    pub status: ProductStatus,
    pub product_condition: ProductCondition,
    pub location: Location,
    pub assigned_email: String,
    pub assigned_member: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquisition_date: Option<Date>,
}

impl CreateProduct {
    /// The product the server is expected to return, under a local id.
    pub fn to_optimistic(&self, id: EntityId) -> Result<Product, CoreError> {
        Ok(Product {
            id,
            name: self.name.clone(),
            attributes: ProductAttributes::from_pairs(self.category, &self.attributes)?,
            status: self.status,
            condition: self.product_condition,
            location: Some(self.location),
            assigned_email: non_empty(Some(self.assigned_email.clone())),
            assigned_member: non_empty(Some(self.assigned_member.clone())),
            price: self.price.clone(),
            serial_number: self.serial_number.clone(),
            recoverable: self.recoverable,
            office_id: self.office_id.clone(),
            acquisition_date: self.acquisition_date,
            created_at: None,
            updated_at: None,
        })
    }
}

/// Body of `PATCH /api/products/:id`. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_condition: Option<ProductCondition>,
    /// `Some(None)` clears the price and is sent as `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Option<Price>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recoverable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

impl ProductPatch {
    /// Apply the patch to a cached product, recomputing its status.
    pub fn apply_to(&self, product: &Product) -> Result<Product, CoreError> {
        let mut next = product.clone();
        if let Some(name) = &self.name {
            next.name = non_empty(Some(name.clone()));
        }
        if let Some(pairs) = &self.attributes {
            next.attributes = ProductAttributes::from_pairs(product.category(), pairs)?;
        }
        if let Some(condition) = self.product_condition {
            next.condition = condition;
        }
        if let Some(price) = &self.price {
            next.price = price.clone();
        }
        if let Some(serial) = &self.serial_number {
            next.serial_number = non_empty(Some(serial.clone()));
        }
        if let Some(recoverable) = self.recoverable {
            next.recoverable = recoverable;
        }
        match self.status {
            Some(status) => next.status = status,
            None => next.refresh_status(),
        }
        Ok(next)
    }
}

/// Desired pickup and delivery dates attached to a relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesirableDates {
    pub origin: crate::shipment::ShipmentDate,
    pub destination: crate::shipment::ShipmentDate,
}

/// Body of `PATCH /api/products/:id/reassign`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignProduct {
    pub assigned_email: String,
    pub assigned_member: String,
    pub location: Location,
    pub status: ProductStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_id: Option<EntityId>,
    pub fp_shipment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desirable_date: Option<DesirableDates>,
}

impl ReassignProduct {
    /// The cached product after the reassignment lands.
    pub fn apply_to(&self, product: &Product) -> Product {
        let mut next = product.clone();
        next.assigned_email = non_empty(Some(self.assigned_email.clone()));
        next.assigned_member = non_empty(Some(self.assigned_member.clone()));
        next.location = Some(self.location);
        next.office_id = self.office_id.clone();
        next.status = self.status;
        next
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::fixtures::laptop;
    use super::*;

    #[test]
    fn deserializes_backend_document() {
        let doc = json!({
            "_id": "p1",
            "category": "Computer",
            "attributes": [
                { "key": "brand", "value": "Lenovo" },
                { "key": "model", "value": "ThinkPad X1" },
                { "key": "gpu", "value": "" }
            ],
            "status": "Delivered",
            "productCondition": "Optimal",
            "location": "Employee",
            "assignedEmail": "ana@acme.io",
            "assignedMember": "Ana Diaz",
            "serialNumber": "ABC123",
            "recoverable": true
        });
        let product: Product = serde_json::from_value(doc).unwrap();
        assert_eq!(product.category(), Category::Computer);
        assert_eq!(product.display_name(), "Lenovo ThinkPad X1");
        assert_eq!(product.location, Some(Location::Employee));
        assert_eq!(product.derived_status(), ProductStatus::Delivered);
    }

    #[test]
    fn empty_location_and_assignee_become_none() {
        let doc = json!({
            "_id": "p2",
            "category": "Audio",
            "status": "Available",
            "location": "",
            "assignedEmail": "",
        });
        let product: Product = serde_json::from_value(doc).unwrap();
        assert_eq!(product.location, None);
        assert_eq!(product.assigned_email, None);
    }

    #[test]
    fn rejects_attribute_foreign_to_category() {
        let doc = json!({
            "_id": "p3",
            "category": "Monitor",
            "status": "Available",
            "attributes": [{ "key": "processor", "value": "M2" }]
        });
        assert!(serde_json::from_value::<Product>(doc).is_err());
    }

    #[test]
    fn patch_recomputes_status() {
        let product = laptop("p1");
        let patch = ProductPatch {
            product_condition: Some(ProductCondition::Unusable),
            ..Default::default()
        };
        let next = patch.apply_to(&product).unwrap();
        assert_eq!(next.status, ProductStatus::Unavailable);
    }

    #[test]
    fn cleared_price_is_sent_as_null() {
        let mut product = laptop("p1");
        product.price = Some(Price {
            amount: 10.0,
            currency_code: "USD".into(),
        });
        let patch = ProductPatch {
            price: Some(None),
            ..Default::default()
        };

        assert_eq!(patch.apply_to(&product).unwrap().price, None);
        let body = serde_json::to_value(&patch).unwrap();
        assert!(body["price"].is_null());
        assert!(body.as_object().unwrap().contains_key("price"));
        assert!(!serde_json::to_value(ProductPatch::default())
            .unwrap()
            .as_object()
            .unwrap()
            .contains_key("price"));
    }

    #[test]
    fn refresh_keeps_transit_status() {
        let mut product = laptop("p1");
        product.status = ProductStatus::InTransit;
        product.refresh_status();
        assert_eq!(product.status, ProductStatus::InTransit);
    }

    #[test]
    fn serializes_category_and_pairs() {
        let value = serde_json::to_value(laptop("p9")).unwrap();
        assert_eq!(value["_id"], "p9");
        assert_eq!(value["category"], "Computer");
        assert_eq!(value["location"], "Our office");
        assert_eq!(value["attributes"][0]["key"], "brand");
    }
}
