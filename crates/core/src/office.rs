//! Offices: non-employee holding locations owned by the tenant.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub apartment: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// The office a product without an explicit office falls back to.
pub fn default_office(offices: &[Office]) -> Option<&Office> {
    offices
        .iter()
        .find(|o| o.is_default)
        .or_else(|| offices.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office(id: &str, is_default: bool) -> Office {
        Office {
            id: id.to_string(),
            name: format!("Office {id}"),
            country: Some("AR".to_string()),
            is_default,
            city: None,
            state: None,
            zip_code: None,
            address: None,
            apartment: None,
            phone: None,
            email: None,
        }
    }

    #[test]
    fn picks_flagged_default() {
        let offices = vec![office("a", false), office("b", true)];
        assert_eq!(default_office(&offices).unwrap().id, "b");
    }

    #[test]
    fn falls_back_to_first_office() {
        let offices = vec![office("a", false), office("b", false)];
        assert_eq!(default_office(&offices).unwrap().id, "a");
        assert!(default_office(&[]).is_none());
    }
}
