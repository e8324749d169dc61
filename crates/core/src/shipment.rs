//! Shipments: tracked relocations of products between two endpoints.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::billing::{ShippingField, ShippingRecord};
use crate::category::{AttributeEntry, Category};
use crate::error::CoreError;
use crate::member::Member;
use crate::office::Office;
use crate::product::{Price, Product};
use crate::profile::UserProfile;
use crate::types::{Date, EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

pub const ASAP: &str = "ASAP";

/// Desired pickup or delivery date: as soon as possible, or a given day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShipmentDate {
    #[default]
    Asap,
    On(Date),
}

impl fmt::Display for ShipmentDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asap => f.write_str(ASAP),
            Self::On(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl ShipmentDate {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ASAP) {
            return Ok(Self::Asap);
        }
        let day = s.get(..10).unwrap_or(s);
        Date::parse_from_str(day, "%Y-%m-%d")
            .map(Self::On)
            .map_err(|_| CoreError::Validation(format!("Invalid shipment date '{s}'")))
    }
}

impl Serialize for ShipmentDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShipmentDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    #[serde(rename = "In Preparation")]
    InPreparation,
    #[serde(rename = "On The Way")]
    OnTheWay,
    Received,
    Cancelled,
    #[serde(rename = "On Hold - Missing Data")]
    OnHoldMissingData,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InPreparation => "In Preparation",
            Self::OnTheWay => "On The Way",
            Self::Received => "Received",
            Self::Cancelled => "Cancelled",
            Self::OnHoldMissingData => "On Hold - Missing Data",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Received | Self::Cancelled)
    }

    /// Whether a shipment may move from `self` to `next`.
    ///
    /// Shipments progress In Preparation → On The Way → Received. A shipment
    /// waiting for data sits On Hold until it is released back to
    /// preparation. Only shipments that have not left may be cancelled.
    pub fn can_transition_to(&self, next: ShipmentStatus) -> bool {
        use ShipmentStatus::*;
        matches!(
            (self, next),
            (InPreparation, OnTheWay)
                | (OnTheWay, Received)
                | (InPreparation, OnHoldMissingData)
                | (OnHoldMissingData, InPreparation)
                | (InPreparation, Cancelled)
                | (OnHoldMissingData, Cancelled)
        )
    }
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// Shipping data of a member, frozen when the shipment was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSnapshot {
    pub member_id: EntityId,
    pub full_name: String,
    pub email: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub apartment: Option<String>,
    pub phone: Option<String>,
    pub personal_email: Option<String>,
    pub dni: Option<String>,
}

impl From<&Member> for MemberSnapshot {
    fn from(m: &Member) -> Self {
        Self {
            member_id: m.id.clone(),
            full_name: m.full_name(),
            email: m.email.clone(),
            country: m.country.clone(),
            city: m.city.clone(),
            zip_code: m.zip_code.clone(),
            address: m.address.clone(),
            apartment: m.apartment.clone(),
            phone: m.phone.clone(),
            personal_email: m.personal_email.clone(),
            dni: m.dni.clone(),
        }
    }
}

/// Shipping data of an office (or of the organisation when no office is set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeSnapshot {
    pub office_id: Option<EntityId>,
    pub name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub apartment: Option<String>,
    pub phone: Option<String>,
}

impl From<&Office> for OfficeSnapshot {
    fn from(o: &Office) -> Self {
        Self {
            office_id: Some(o.id.clone()),
            name: o.name.clone(),
            country: o.country.clone(),
            city: o.city.clone(),
            state: o.state.clone(),
            zip_code: o.zip_code.clone(),
            address: o.address.clone(),
            apartment: o.apartment.clone(),
            phone: o.phone.clone(),
        }
    }
}

impl From<&UserProfile> for OfficeSnapshot {
    fn from(p: &UserProfile) -> Self {
        Self {
            office_id: None,
            name: if p.tenant_name.is_empty() {
                crate::location::LOCATION_OUR_OFFICE.to_string()
            } else {
                p.tenant_name.clone()
            },
            country: p.country.clone(),
            city: p.city.clone(),
            state: p.state.clone(),
            zip_code: p.zip_code.clone(),
            address: p.address.clone(),
            apartment: p.apartment.clone(),
            phone: p.phone.clone(),
        }
    }
}

impl ShippingRecord for MemberSnapshot {
    fn shipping_field(&self, field: ShippingField) -> Option<&str> {
        match field {
            ShippingField::Country => self.country.as_deref(),
            ShippingField::City => self.city.as_deref(),
            ShippingField::State => None,
            ShippingField::ZipCode => self.zip_code.as_deref(),
            ShippingField::Address => self.address.as_deref(),
            ShippingField::Apartment => self.apartment.as_deref(),
            ShippingField::PersonalEmail => self.personal_email.as_deref(),
            ShippingField::Phone => self.phone.as_deref(),
            ShippingField::Dni => self.dni.as_deref(),
        }
    }
}

impl ShippingRecord for OfficeSnapshot {
    fn shipping_field(&self, field: ShippingField) -> Option<&str> {
        match field {
            ShippingField::Country => self.country.as_deref(),
            ShippingField::City => self.city.as_deref(),
            ShippingField::State => self.state.as_deref(),
            ShippingField::ZipCode => self.zip_code.as_deref(),
            ShippingField::Address => self.address.as_deref(),
            ShippingField::Apartment => self.apartment.as_deref(),
            ShippingField::Phone => self.phone.as_deref(),
            ShippingField::PersonalEmail | ShippingField::Dni => None,
        }
    }
}

/// One side of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShipmentEndpoint {
    Member(MemberSnapshot),
    Office(OfficeSnapshot),
    Warehouse,
}

impl ShipmentEndpoint {
    pub fn country(&self) -> Option<&str> {
        match self {
            Self::Member(m) => m.country.as_deref(),
            Self::Office(o) => o.country.as_deref(),
            Self::Warehouse => None,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::Member(m) => m.full_name.clone(),
            Self::Office(o) => o.name.clone(),
            Self::Warehouse => crate::location::LOCATION_FP_WAREHOUSE.to_string(),
        }
    }

    /// `true` if both endpoints denote the same physical holder.
    pub fn same_holder(&self, other: &ShipmentEndpoint) -> bool {
        match (self, other) {
            (Self::Member(a), Self::Member(b)) => a.member_id == b.member_id,
            (Self::Office(a), Self::Office(b)) => a.office_id == b.office_id,
            (Self::Warehouse, Self::Warehouse) => true,
            _ => false,
        }
    }
}

/// Compare two countries, ignoring case and surrounding whitespace.
pub fn same_country(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

// ---------------------------------------------------------------------------
// Shipment
// ---------------------------------------------------------------------------

/// A product as it was when the shipment was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub product_id: EntityId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
}

impl From<&Product> for ProductSnapshot {
    fn from(p: &Product) -> Self {
        Self {
            product_id: p.id.clone(),
            name: p.display_name(),
            category: p.category(),
            serial_number: p.serial_number.clone(),
            attributes: p.attributes.to_pairs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default)]
    pub order_id: Option<String>,
    pub origin: ShipmentEndpoint,
    pub destination: ShipmentEndpoint,
    #[serde(default)]
    pub origin_date: ShipmentDate,
    #[serde(default)]
    pub destination_date: ShipmentDate,
    pub shipment_status: ShipmentStatus,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub snapshots: Vec<ProductSnapshot>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl Shipment {
    pub fn is_international(&self) -> bool {
        match (self.origin.country(), self.destination.country()) {
            (Some(a), Some(b)) => !same_country(a, b),
            _ => false,
        }
    }

    pub fn contains_product(&self, product_id: &str) -> bool {
        self.snapshots.iter().any(|s| s.product_id == product_id)
    }
}

/// Body of `PATCH /api/shipments/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_status: Option<ShipmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_date: Option<ShipmentDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_date: Option<ShipmentDate>,
}

impl ShipmentPatch {
    /// Apply to a cached shipment, rejecting illegal status moves and date
    /// changes on shipments that already left.
    pub fn apply_to(&self, shipment: &Shipment) -> Result<Shipment, CoreError> {
        let mut next = shipment.clone();

        if self.origin_date.is_some() || self.destination_date.is_some() {
            if !matches!(
                shipment.shipment_status,
                ShipmentStatus::InPreparation | ShipmentStatus::OnHoldMissingData
            ) {
                return Err(CoreError::Conflict(format!(
                    "Dates cannot change once a shipment is {}",
                    shipment.shipment_status.as_str()
                )));
            }
            if let Some(d) = self.origin_date {
                next.origin_date = d;
            }
            if let Some(d) = self.destination_date {
                next.destination_date = d;
            }
        }

        if let Some(status) = self.shipment_status {
            if status != shipment.shipment_status
                && !shipment.shipment_status.can_transition_to(status)
            {
                return Err(CoreError::Conflict(format!(
                    "Cannot move shipment from {} to {}",
                    shipment.shipment_status.as_str(),
                    status.as_str()
                )));
            }
            next.shipment_status = status;
        }

        Ok(next)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn shipment(id: &str, status: ShipmentStatus) -> Shipment {
        Shipment {
            id: id.to_string(),
            order_id: Some(format!("ORD-{id}")),
            origin: ShipmentEndpoint::Warehouse,
            destination: ShipmentEndpoint::Office(OfficeSnapshot {
                office_id: Some("o1".to_string()),
                name: "HQ".to_string(),
                country: Some("AR".to_string()),
                city: None,
                state: None,
                zip_code: None,
                address: None,
                apartment: None,
                phone: None,
            }),
            origin_date: ShipmentDate::Asap,
            destination_date: ShipmentDate::Asap,
            shipment_status: status,
            price: None,
            snapshots: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}
