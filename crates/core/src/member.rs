//! Members (employees) and their request DTOs.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::serde_helpers::{lenient_date, string_or_number};
use crate::team::Team;
use crate::types::{Date, EntityId};

/// An employee who may hold products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub personal_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub dni: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub apartment: Option<String>,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub birth_date: Option<Date>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub offboarding_date: Option<Date>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    /// Products this member must hand back on offboarding.
    pub fn recoverable_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.recoverable)
    }
}

/// Find the member a product is assigned to.
pub fn find_by_email<'a>(members: &'a [Member], email: &str) -> Option<&'a Member> {
    members.iter().find(|m| m.has_email(email))
}

/// Body of `POST /api/members`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Date>,
}

impl CreateMember {
    /// The member the server is expected to return, under a local id.
    pub fn to_optimistic(&self, id: EntityId, team: Option<Team>) -> Member {
        Member {
            id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            personal_email: self.personal_email.clone(),
            phone: self.phone.clone(),
            dni: self.dni.clone(),
            country: self.country.clone(),
            city: self.city.clone(),
            zip_code: self.zip_code.clone(),
            address: self.address.clone(),
            apartment: self.apartment.clone(),
            team,
            start_date: self.start_date,
            birth_date: self.birth_date,
            offboarding_date: None,
            products: Vec::new(),
        }
    }

    /// Apply the same fields to an existing member, keeping its products.
    pub fn apply_to(&self, member: &Member, team: Option<Team>) -> Member {
        let mut next = self.to_optimistic(member.id.clone(), team);
        next.products = member.products.clone();
        next.offboarding_date = member.offboarding_date;
        next
    }
}
