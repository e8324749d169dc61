//! Teams that members belong to.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub members: Vec<EntityId>,
}

impl Team {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Body of `POST /api/teams` and `PATCH /api/teams/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
