//! Moving a product to another member, an office or the warehouse.
//!
//! Planning and submitting are separate steps so a view can show the
//! shipment-details dialog in between.

use stockroom_core::product::{DesirableDates, Product};
use stockroom_core::relocation::{
    resolve_relocation, Candidate, MissingData, Relocation, RelocationAssessment,
};
use stockroom_core::store::Command;
use stockroom_core::types::EntityId;
use stockroom_core::CoreError;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::notifications::MissingDataDialog;
use crate::workflows::find_in;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReassignTarget {
    Member(EntityId),
    Office(EntityId),
    Warehouse,
}

#[derive(Debug, Clone)]
pub struct ReassignPlan {
    pub product: Product,
    pub relocation: Relocation,
    pub assessment: RelocationAssessment,
    pub create_shipment: bool,
}

impl ReassignPlan {
    pub fn is_blocked(&self) -> bool {
        matches!(self.assessment, RelocationAssessment::Blocked(_))
    }

    /// Pickup and delivery dates must be collected before [`reassign`].
    pub fn needs_shipment_details(&self) -> bool {
        matches!(
            self.assessment,
            RelocationAssessment::NeedsShipmentDetails { .. }
        )
    }

    pub fn is_international(&self) -> bool {
        self.relocation.is_international()
    }
}

#[derive(Debug, Clone)]
pub struct ReassignOutcome {
    pub product: Product,
    /// Set when an endpoint lacks shipping data; also published.
    pub dialog: Option<MissingDataDialog>,
}

/// Resolve both ends of the move and decide whether it may go ahead.
pub async fn plan_reassignment(
    ctx: &AppContext,
    product_id: &str,
    target: &ReassignTarget,
    create_shipment: bool,
) -> AppResult<ReassignPlan> {
    let product = find_in(ctx.products().await?, product_id)?;
    let directory = ctx.directory().await?;
    let lookup = directory.relocation_context();

    let candidate = match target {
        ReassignTarget::Member(id) => Candidate::Member(
            lookup
                .members
                .iter()
                .find(|m| &m.id == id)
                .ok_or_else(|| CoreError::NotFound {
                    entity: "member",
                    id: id.clone(),
                })?,
        ),
        ReassignTarget::Office(id) => Candidate::Office(
            lookup
                .offices
                .iter()
                .find(|o| &o.id == id)
                .ok_or_else(|| CoreError::NotFound {
                    entity: "office",
                    id: id.clone(),
                })?,
        ),
        ReassignTarget::Warehouse => Candidate::Warehouse,
    };

    let relocation = resolve_relocation(&product, candidate, &lookup);
    let assessment = relocation.assessment(create_shipment);
    tracing::debug!(
        product_id,
        international = relocation.is_international(),
        blocked = matches!(assessment, RelocationAssessment::Blocked(_)),
        "Planned reassignment",
    );

    Ok(ReassignPlan {
        product,
        relocation,
        assessment,
        create_shipment,
    })
}

/// Messages for blocking gaps, one per holder.
pub(crate) fn blocked_messages<'a>(gaps: impl IntoIterator<Item = &'a MissingData>) -> Vec<String> {
    gaps.into_iter().map(MissingData::message).collect()
}

/// Submit a planned move.
///
/// A blocked plan is refused without a request. After a successful move,
/// member endpoints with missing shipping data are reported in a
/// [`MissingDataDialog`].
pub async fn reassign(
    ctx: &AppContext,
    plan: &ReassignPlan,
    dates: Option<DesirableDates>,
) -> AppResult<ReassignOutcome> {
    let warnings = match &plan.assessment {
        RelocationAssessment::Blocked(gaps) => {
            return Err(AppError::Blocked(blocked_messages(gaps)));
        }
        RelocationAssessment::NeedsShipmentDetails { warnings }
        | RelocationAssessment::Ready { warnings } => warnings,
    };

    let body = plan
        .relocation
        .reassign_request(&plan.product, plan.create_shipment, dates)?;
    let optimistic = body.apply_to(&plan.product);

    let product = ctx
        .mutate(
            &ctx.products,
            "Reassign product",
            vec![Command::Update(optimistic)],
            ctx.backend().reassign_product(&plan.product.id, &body),
            |store, updated: &Product| store.confirm(&updated.id, updated.clone()),
        )
        .await?;

    let dialog = MissingDataDialog::from_missing(warnings);
    if let Some(dialog) = &dialog {
        ctx.notifier.missing_data(dialog.clone()).await;
    }
    ctx.notifier
        .success(
            "Reassign product",
            format!("{} was relocated.", product.display_name()),
        )
        .await;

    Ok(ReassignOutcome { product, dialog })
}
