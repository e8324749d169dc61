//! Relocation and reassignment resolution.
//!
//! Given a product and the holder it should move to, works out where the
//! product is now, where it is going, whether that crosses a border, which
//! shipping data is missing on either side, and whether the move may go
//! ahead. Nothing here mutates state: the caller decides what to do with the
//! [`RelocationAssessment`].

use serde::Serialize;

use crate::billing::{labels, missing_fields, ShippingField, COMPANY_REQUIRED_FIELDS, MEMBER_REQUIRED_FIELDS};
use crate::error::CoreError;
use crate::location::Location;
use crate::member::{find_by_email, Member};
use crate::office::{default_office, Office};
use crate::product::{DesirableDates, Product, ReassignProduct};
use crate::profile::UserProfile;
use crate::shipment::{same_country, MemberSnapshot, OfficeSnapshot, ShipmentEndpoint};
use crate::status::{calculate_status, ProductStatus};

/// The holder a product is being moved to.
#[derive(Debug, Clone, Copy)]
pub enum Candidate<'a> {
    Member(&'a Member),
    Office(&'a Office),
    Warehouse,
    None,
}

/// Lookup data the resolver needs besides the product itself.
#[derive(Debug, Clone, Copy)]
pub struct RelocationContext<'a> {
    pub members: &'a [Member],
    pub offices: &'a [Office],
    pub profile: &'a UserProfile,
}

/// Which end of a relocation a report is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Destination,
}

/// Shipping fields one endpoint is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingData {
    pub side: Side,
    pub holder: String,
    /// `true` for office/company endpoints, whose gaps block a shipment.
    pub is_company: bool,
    pub fields: Vec<ShippingField>,
}

impl MissingData {
    pub fn message(&self) -> String {
        format!("{} is missing: {}", self.holder, labels(&self.fields))
    }
}

/// What the caller may do with a relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationAssessment {
    /// Company data needed for the shipment is incomplete; do not submit.
    Blocked(Vec<MissingData>),
    /// Pickup/delivery dates must be confirmed before submitting.
    NeedsShipmentDetails { warnings: Vec<MissingData> },
    /// Submit right away; warnings are shown after success.
    Ready { warnings: Vec<MissingData> },
}

/// Resolved source and destination of a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub source: Option<ShipmentEndpoint>,
    pub destination: Option<ShipmentEndpoint>,
}

/// Work out both ends of moving `product` to `candidate`.
pub fn resolve_relocation(
    product: &Product,
    candidate: Candidate<'_>,
    ctx: &RelocationContext<'_>,
) -> Relocation {
    Relocation {
        source: current_holder(product, ctx),
        destination: candidate_endpoint(candidate),
    }
}

/// Where `product` is right now.
pub fn current_holder(product: &Product, ctx: &RelocationContext<'_>) -> Option<ShipmentEndpoint> {
    match product.location? {
        Location::Employee => {
            let email = product.assigned_email.as_deref()?;
            let snapshot = match find_by_email(ctx.members, email) {
                Some(member) => MemberSnapshot::from(member),
                // Assignee no longer in the member list: every field is unknown.
                None => MemberSnapshot {
                    member_id: String::new(),
                    full_name: product
                        .assigned_member
                        .clone()
                        .unwrap_or_else(|| email.to_string()),
                    email: email.to_string(),
                    country: None,
                    city: None,
                    zip_code: None,
                    address: None,
                    apartment: None,
                    phone: None,
                    personal_email: None,
                    dni: None,
                },
            };
            Some(ShipmentEndpoint::Member(snapshot))
        }
        Location::OurOffice => {
            let office = product
                .office_id
                .as_deref()
                .and_then(|id| ctx.offices.iter().find(|o| o.id == id))
                .or_else(|| default_office(ctx.offices));
            Some(ShipmentEndpoint::Office(match office {
                Some(office) => OfficeSnapshot::from(office),
                None => OfficeSnapshot::from(ctx.profile),
            }))
        }
        Location::FpWarehouse => Some(ShipmentEndpoint::Warehouse),
    }
}

fn candidate_endpoint(candidate: Candidate<'_>) -> Option<ShipmentEndpoint> {
    match candidate {
        Candidate::Member(m) => Some(ShipmentEndpoint::Member(MemberSnapshot::from(m))),
        Candidate::Office(o) => Some(ShipmentEndpoint::Office(OfficeSnapshot::from(o))),
        Candidate::Warehouse => Some(ShipmentEndpoint::Warehouse),
        Candidate::None => None,
    }
}

fn endpoint_gaps(endpoint: &ShipmentEndpoint, side: Side) -> Option<MissingData> {
    let (holder, is_company, fields) = match endpoint {
        ShipmentEndpoint::Member(m) => (
            m.full_name.clone(),
            false,
            missing_fields(m, MEMBER_REQUIRED_FIELDS),
        ),
        ShipmentEndpoint::Office(o) => (
            o.name.clone(),
            true,
            missing_fields(o, COMPANY_REQUIRED_FIELDS),
        ),
        ShipmentEndpoint::Warehouse => return None,
    };
    (!fields.is_empty()).then_some(MissingData {
        side,
        holder,
        is_company,
        fields,
    })
}

impl Relocation {
    /// `true` when both countries are known and differ.
    pub fn is_international(&self) -> bool {
        let source = self.source.as_ref().and_then(|s| s.country());
        let destination = self.destination.as_ref().and_then(|d| d.country());
        match (source, destination) {
            (Some(a), Some(b)) => !same_country(a, b),
            _ => false,
        }
    }

    /// `true` when the product physically changes hands.
    pub fn moves(&self) -> bool {
        match (&self.source, &self.destination) {
            (Some(s), Some(d)) => !s.same_holder(d),
            _ => false,
        }
    }

    /// Missing shipping data on both sides, source first.
    pub fn missing_data(&self) -> Vec<MissingData> {
        let source = self
            .source
            .as_ref()
            .and_then(|s| endpoint_gaps(s, Side::Source));
        let destination = self
            .destination
            .as_ref()
            .and_then(|d| endpoint_gaps(d, Side::Destination));
        source.into_iter().chain(destination).collect()
    }

    /// Decide whether the move can be submitted.
    ///
    /// Without a shipment only the destination member's gaps are reported,
    /// as a warning. With a shipment, incomplete company data on either side
    /// blocks; member gaps never block.
    pub fn assessment(&self, create_shipment: bool) -> RelocationAssessment {
        if !(create_shipment && self.moves()) {
            let warnings = self
                .missing_data()
                .into_iter()
                .filter(|m| m.side == Side::Destination && !m.is_company)
                .collect();
            return RelocationAssessment::Ready { warnings };
        }

        let (blocking, warnings): (Vec<_>, Vec<_>) =
            self.missing_data().into_iter().partition(|m| m.is_company);
        if !blocking.is_empty() {
            return RelocationAssessment::Blocked(blocking);
        }
        RelocationAssessment::NeedsShipmentDetails { warnings }
    }

    /// Status the product should show once the move is submitted.
    pub fn resulting_status(&self, product: &Product, create_shipment: bool) -> ProductStatus {
        if create_shipment && self.moves() {
            let member_gaps = self.missing_data().iter().any(|m| !m.is_company);
            return if member_gaps {
                ProductStatus::InTransitMissingData
            } else {
                ProductStatus::InTransit
            };
        }
        let (location, email) = match &self.destination {
            Some(ShipmentEndpoint::Member(m)) => (Some(Location::Employee), Some(m.email.as_str())),
            Some(ShipmentEndpoint::Office(_)) => (Some(Location::OurOffice), None),
            Some(ShipmentEndpoint::Warehouse) => (Some(Location::FpWarehouse), None),
            None => (product.location, None),
        };
        calculate_status(Some(product.condition), location, email)
    }

    /// Build the reassign request body for this move.
    pub fn reassign_request(
        &self,
        product: &Product,
        create_shipment: bool,
        dates: Option<DesirableDates>,
    ) -> Result<ReassignProduct, CoreError> {
        let destination = self.destination.as_ref().ok_or_else(|| {
            CoreError::Validation("A destination is required to relocate a product".to_string())
        })?;
        let ships = create_shipment && self.moves();
        if ships && dates.is_none() {
            return Err(CoreError::Validation(
                "Pickup and delivery dates are required for a shipment".to_string(),
            ));
        }

        let (assigned_email, assigned_member, location, office_id) = match destination {
            ShipmentEndpoint::Member(m) => (
                m.email.clone(),
                m.full_name.clone(),
                Location::Employee,
                None,
            ),
            ShipmentEndpoint::Office(o) => {
                (String::new(), String::new(), Location::OurOffice, o.office_id.clone())
            }
            ShipmentEndpoint::Warehouse => {
                (String::new(), String::new(), Location::FpWarehouse, None)
            }
        };

        Ok(ReassignProduct {
            assigned_email,
            assigned_member,
            location,
            status: self.resulting_status(product, create_shipment),
            office_id,
            fp_shipment: ships,
            desirable_date: if ships { dates } else { None },
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::member::fixtures::complete_member;
    use crate::product::fixtures::{delivered_to, laptop};
    use crate::shipment::ShipmentDate;

    fn office(id: &str, country: &str, complete: bool) -> Office {
        let fill = |v: &str| complete.then(|| v.to_string());
        Office {
            id: id.to_string(),
            name: format!("Office {id}"),
            country: Some(country.to_string()),
            is_default: true,
            city: fill("Madrid"),
            state: fill("Madrid"),
            zip_code: fill("28001"),
            address: fill("Gran Via 1"),
            apartment: None,
            phone: None,
            email: None,
        }
    }

    fn dates() -> DesirableDates {
        DesirableDates {
            origin: ShipmentDate::Asap,
            destination: ShipmentDate::Asap,
        }
    }

    #[test]
    fn employee_source_resolves_member_snapshot() {
        let members = vec![complete_member("m1", "ana@acme.io")];
        let offices = vec![office("o1", "ES", true)];
        let profile = UserProfile::default();
        let ctx = RelocationContext { members: &members, offices: &offices, profile: &profile };

        let product = delivered_to("p1", "ana@acme.io", "Ana Diaz");
        let relocation = resolve_relocation(&product, Candidate::Office(&offices[0]), &ctx);

        assert_matches!(relocation.source, Some(ShipmentEndpoint::Member(ref m)) if m.member_id == "m1");
        assert!(relocation.is_international());
        assert!(relocation.moves());
    }

    #[test]
    fn same_holder_does_not_move() {
        let members = vec![complete_member("m1", "ana@acme.io")];
        let profile = UserProfile::default();
        let ctx = RelocationContext { members: &members, offices: &[], profile: &profile };

        let product = delivered_to("p1", "ana@acme.io", "Ana Diaz");
        let relocation = resolve_relocation(&product, Candidate::Member(&members[0]), &ctx);
        assert!(!relocation.moves());
        assert_matches!(relocation.assessment(true), RelocationAssessment::Ready { .. });
    }

    #[test]
    fn incomplete_office_blocks_shipment() {
        let members = vec![complete_member("m1", "ana@acme.io")];
        let offices = vec![office("o1", "AR", false)];
        let profile = UserProfile::default();
        let ctx = RelocationContext { members: &members, offices: &offices, profile: &profile };

        let product = delivered_to("p1", "ana@acme.io", "Ana Diaz");
        let relocation = resolve_relocation(&product, Candidate::Office(&offices[0]), &ctx);

        assert_matches!(relocation.assessment(true), RelocationAssessment::Blocked(gaps) => {
            assert_eq!(gaps.len(), 1);
            assert_eq!(gaps[0].side, Side::Destination);
            assert!(gaps[0].message().contains("Zip Code"));
        });
    }

    #[test]
    fn incomplete_member_destination_is_only_a_warning() {
        let mut bob = complete_member("m2", "bob@acme.io");
        bob.first_name = "Bob".to_string();
        bob.last_name = "Stone".to_string();
        bob.personal_email = None;
        let members = vec![bob];
        let offices = vec![office("o1", "AR", true)];
        let profile = UserProfile::default();
        let ctx = RelocationContext { members: &members, offices: &offices, profile: &profile };

        let product = laptop("p1");
        let relocation = resolve_relocation(&product, Candidate::Member(&members[0]), &ctx);

        assert_matches!(
            relocation.assessment(true),
            RelocationAssessment::NeedsShipmentDetails { warnings } => {
                assert_eq!(warnings[0].message(), "Bob Stone is missing: Personal Email");
            }
        );
        assert_matches!(
            relocation.assessment(false),
            RelocationAssessment::Ready { warnings } if warnings.len() == 1
        );
        assert_eq!(
            relocation.resulting_status(&product, true),
            ProductStatus::InTransitMissingData
        );
        assert_eq!(
            relocation.resulting_status(&product, false),
            ProductStatus::Delivered
        );
    }

    #[test]
    fn unknown_assignee_has_every_field_missing() {
        let profile = UserProfile::default();
        let ctx = RelocationContext { members: &[], offices: &[], profile: &profile };
        let product = delivered_to("p1", "gone@acme.io", "Gone Person");
        let relocation = resolve_relocation(&product, Candidate::Warehouse, &ctx);
        let gaps = relocation.missing_data();
        assert_eq!(gaps[0].side, Side::Source);
        assert_eq!(gaps[0].fields.len(), MEMBER_REQUIRED_FIELDS.len());
    }

    #[test]
    fn office_without_record_falls_back_to_profile() {
        let profile = UserProfile {
            tenant_name: "Acme".to_string(),
            country: Some("US".to_string()),
            ..Default::default()
        };
        let ctx = RelocationContext { members: &[], offices: &[], profile: &profile };
        let product = laptop("p1");
        assert_matches!(
            current_holder(&product, &ctx),
            Some(ShipmentEndpoint::Office(ref o)) if o.name == "Acme"
        );
    }

    #[test]
    fn reassign_request_requires_dates_for_shipment() {
        let members = vec![complete_member("m1", "ana@acme.io")];
        let profile = UserProfile::default();
        let ctx = RelocationContext { members: &members, offices: &[], profile: &profile };
        let mut product = laptop("p1");
        product.location = Some(Location::FpWarehouse);

        let relocation = resolve_relocation(&product, Candidate::Member(&members[0]), &ctx);
        assert!(relocation.reassign_request(&product, true, None).is_err());

        let req = relocation
            .reassign_request(&product, true, Some(dates()))
            .unwrap();
        assert!(req.fp_shipment);
        assert_eq!(req.location, Location::Employee);
        assert_eq!(req.assigned_email, "ana@acme.io");
        assert_eq!(req.status, ProductStatus::InTransit);
    }

    #[test]
    fn reassign_without_destination_is_rejected() {
        let profile = UserProfile::default();
        let ctx = RelocationContext { members: &[], offices: &[], profile: &profile };
        let product = laptop("p1");
        let relocation = resolve_relocation(&product, Candidate::None, &ctx);
        assert!(relocation.reassign_request(&product, false, None).is_err());
    }
}
