//! Product status, product condition and the status calculator.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::location::Location;
use crate::types::is_filled;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a product.
///
/// `Available`, `Delivered` and `Unavailable` are derived by
/// [`calculate_status`]. The transit variants are set by the server while a
/// shipment is open, and `Deprecated` by an explicit retirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    Available,
    Delivered,
    Deprecated,
    Unavailable,
    #[serde(rename = "In Transit")]
    InTransit,
    #[serde(rename = "In Transit - Missing Data")]
    InTransitMissingData,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Delivered => "Delivered",
            Self::Deprecated => "Deprecated",
            Self::Unavailable => "Unavailable",
            Self::InTransit => "In Transit",
            Self::InTransitMissingData => "In Transit - Missing Data",
        }
    }

    /// Parse a status label as shown in tables and filters.
    pub fn from_label(s: &str) -> Result<Self, CoreError> {
        match s {
            "Available" => Ok(Self::Available),
            "Delivered" => Ok(Self::Delivered),
            "Deprecated" => Ok(Self::Deprecated),
            "Unavailable" => Ok(Self::Unavailable),
            "In Transit" => Ok(Self::InTransit),
            "In Transit - Missing Data" => Ok(Self::InTransitMissingData),
            _ => Err(CoreError::Validation(format!("Invalid product status '{s}'"))),
        }
    }

    /// `true` while an open shipment owns the product.
    pub fn is_in_transit(&self) -> bool {
        matches!(self, Self::InTransit | Self::InTransitMissingData)
    }
}

/// Physical condition of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCondition {
    #[default]
    Optimal,
    Defective,
    Unusable,
}

impl ProductCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optimal => "Optimal",
            Self::Defective => "Defective",
            Self::Unusable => "Unusable",
        }
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Derive a product status from its condition, location and assignment.
///
/// An unusable product is always `Unavailable`. A product held by an
/// employee with a recorded assignee is `Delivered`. Anything else is
/// `Available`, including an assignee paired with a non-employee location.
pub fn calculate_status(
    condition: Option<ProductCondition>,
    location: Option<Location>,
    assigned_email: Option<&str>,
) -> ProductStatus {
    if condition == Some(ProductCondition::Unusable) {
        return ProductStatus::Unavailable;
    }

    match location {
        Some(Location::Employee) if is_filled(assigned_email) => ProductStatus::Delivered,
        Some(loc) if loc.is_non_employee() => ProductStatus::Available,
        _ => ProductStatus::Available,
    }
}
