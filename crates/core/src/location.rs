//! Product locations and their canonical spellings.
//!
//! The backend and older clients disagree on capitalization ("FP warehouse"
//! vs "FP Warehouse", "Our office" vs "Our Office"). Every location string
//! entering the crate goes through [`Location::parse`], so the rest of the
//! code only ever sees the enum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

pub const LOCATION_OUR_OFFICE: &str = "Our office";
pub const LOCATION_FP_WAREHOUSE: &str = "FP warehouse";
pub const LOCATION_EMPLOYEE: &str = "Employee";

/// All canonical location strings.
pub const VALID_LOCATIONS: &[&str] = &[LOCATION_OUR_OFFICE, LOCATION_FP_WAREHOUSE, LOCATION_EMPLOYEE];

/// Where a product physically is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    OurOffice,
    FpWarehouse,
    Employee,
}

impl Location {
    /// Parse a location string, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "our office" => Ok(Self::OurOffice),
            "fp warehouse" => Ok(Self::FpWarehouse),
            "employee" => Ok(Self::Employee),
            _ => Err(CoreError::Validation(format!(
                "Invalid location '{s}'. Must be one of: {}",
                VALID_LOCATIONS.join(", ")
            ))),
        }
    }

    /// Canonical wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OurOffice => LOCATION_OUR_OFFICE,
            Self::FpWarehouse => LOCATION_FP_WAREHOUSE,
            Self::Employee => LOCATION_EMPLOYEE,
        }
    }

    /// `true` for locations that are not held by a member.
    pub fn is_non_employee(&self) -> bool {
        !matches!(self, Self::Employee)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warehouse_spellings_normalize() {
        assert_eq!(Location::parse("FP warehouse").unwrap(), Location::FpWarehouse);
        assert_eq!(Location::parse("FP Warehouse").unwrap(), Location::FpWarehouse);
        assert_eq!(Location::parse("  fp WAREHOUSE ").unwrap(), Location::FpWarehouse);
    }

    #[test]
    fn office_and_employee_parse() {
        assert_eq!(Location::parse("Our Office").unwrap(), Location::OurOffice);
        assert_eq!(Location::parse("employee").unwrap(), Location::Employee);
    }

    #[test]
    fn unknown_location_is_rejected() {
        let err = Location::parse("Basement").unwrap_err().to_string();
        assert!(err.contains("Basement"));
    }

    #[test]
    fn serializes_to_canonical_spelling() {
        let json = serde_json::to_string(&Location::FpWarehouse).unwrap();
        assert_eq!(json, "\"FP warehouse\"");
        let back: Location = serde_json::from_str("\"FP Warehouse\"").unwrap();
        assert_eq!(back, Location::FpWarehouse);
    }
}
