//! Offboarding: reclaiming a departing member's products.
//!
//! Every recoverable product needs a destination. Products that are not
//! recoverable may be left without one and stay with the member.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::forms::errors::FieldErrors;
use crate::member::Member;
use crate::product::{DesirableDates, Product, ReassignProduct};
use crate::relocation::{
    resolve_relocation, Candidate, MissingData, Relocation, RelocationAssessment,
    RelocationContext,
};
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffboardingDestination {
    Member(EntityId),
    Office(EntityId),
    Warehouse,
}

/// Selections for one departing member.
#[derive(Debug, Clone)]
pub struct OffboardingForm {
    member: Member,
    selections: BTreeMap<EntityId, OffboardingDestination>,
}

/// One product move in an offboarding plan.
#[derive(Debug, Clone)]
pub struct PlannedMove {
    pub product: Product,
    pub relocation: Relocation,
    pub assessment: RelocationAssessment,
}

#[derive(Debug, Clone)]
pub struct OffboardingPlan {
    pub member_id: EntityId,
    pub moves: Vec<PlannedMove>,
    pub create_shipment: bool,
}

impl OffboardingForm {
    pub fn new(member: Member) -> Self {
        Self {
            member,
            selections: BTreeMap::new(),
        }
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    pub fn selection(&self, product_id: &str) -> Option<&OffboardingDestination> {
        self.selections.get(product_id)
    }

    /// Choose where one of the member's products goes.
    pub fn select(
        &mut self,
        product_id: &str,
        destination: OffboardingDestination,
    ) -> Result<(), CoreError> {
        if !self.member.products.iter().any(|p| p.id == product_id) {
            return Err(CoreError::NotFound {
                entity: "product",
                id: product_id.to_string(),
            });
        }
        if destination == OffboardingDestination::Member(self.member.id.clone()) {
            return Err(CoreError::Validation(
                "A product cannot be reassigned to the member being offboarded".to_string(),
            ));
        }
        self.selections.insert(product_id.to_string(), destination);
        Ok(())
    }

    /// Use the same destination for every product of the member.
    pub fn select_all(&mut self, destination: OffboardingDestination) -> Result<(), CoreError> {
        let ids: Vec<EntityId> = self.member.products.iter().map(|p| p.id.clone()).collect();
        for id in ids {
            self.select(&id, destination.clone())?;
        }
        Ok(())
    }

    pub fn clear(&mut self, product_id: &str) {
        self.selections.remove(product_id);
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for product in self.member.recoverable_products() {
            if !self.selections.contains_key(&product.id) {
                errors.add(
                    format!("products.{}", product.id),
                    format!("Select a destination for {}.", product.display_name()),
                );
            }
        }
        errors.into_result(())
    }

    /// Resolve every selected move against current members and offices.
    pub fn plan(
        &self,
        ctx: &RelocationContext<'_>,
        create_shipment: bool,
    ) -> Result<OffboardingPlan, CoreError> {
        self.validate()?;

        let mut moves = Vec::new();
        for product in &self.member.products {
            let Some(destination) = self.selections.get(&product.id) else {
                continue;
            };
            let candidate = match destination {
                OffboardingDestination::Member(id) => Candidate::Member(
                    ctx.members
                        .iter()
                        .find(|m| &m.id == id)
                        .ok_or_else(|| CoreError::NotFound {
                            entity: "member",
                            id: id.clone(),
                        })?,
                ),
                OffboardingDestination::Office(id) => Candidate::Office(
                    ctx.offices
                        .iter()
                        .find(|o| &o.id == id)
                        .ok_or_else(|| CoreError::NotFound {
                            entity: "office",
                            id: id.clone(),
                        })?,
                ),
                OffboardingDestination::Warehouse => Candidate::Warehouse,
            };
            let relocation = resolve_relocation(product, candidate, ctx);
            let assessment = relocation.assessment(create_shipment);
            moves.push(PlannedMove {
                product: product.clone(),
                relocation,
                assessment,
            });
        }

        Ok(OffboardingPlan {
            member_id: self.member.id.clone(),
            moves,
            create_shipment,
        })
    }
}

impl OffboardingPlan {
    /// Gaps that prevent the plan from being submitted.
    pub fn blocking(&self) -> Vec<&MissingData> {
        self.moves
            .iter()
            .filter_map(|m| match &m.assessment {
                RelocationAssessment::Blocked(gaps) => Some(gaps.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Non-blocking gaps to show once the plan went through.
    pub fn warnings(&self) -> Vec<&MissingData> {
        self.moves
            .iter()
            .filter_map(|m| match &m.assessment {
                RelocationAssessment::NeedsShipmentDetails { warnings }
                | RelocationAssessment::Ready { warnings } => Some(warnings.iter()),
                RelocationAssessment::Blocked(_) => None,
            })
            .flatten()
            .collect()
    }

    pub fn needs_shipment_details(&self) -> bool {
        self.moves.iter().any(|m| {
            matches!(
                m.assessment,
                RelocationAssessment::NeedsShipmentDetails { .. }
            )
        })
    }

    /// Reassign bodies for every move, in member product order.
    pub fn requests(
        &self,
        dates: Option<DesirableDates>,
    ) -> Result<Vec<(EntityId, ReassignProduct)>, CoreError> {
        if let Some(gap) = self.blocking().first() {
            return Err(CoreError::Validation(gap.message()));
        }
        self.moves
            .iter()
            .map(|m| {
                m.relocation
                    .reassign_request(&m.product, self.create_shipment, dates.clone())
                    .map(|req| (m.product.id.clone(), req))
            })
            .collect()
    }
}
