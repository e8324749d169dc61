//! Offboarding a member: relocate their products, one reassignment each.

use stockroom_core::forms::offboarding::OffboardingForm;
use stockroom_core::product::{DesirableDates, Product};
use stockroom_core::store::Command;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::notifications::MissingDataDialog;
use crate::workflows::find_in;
use crate::workflows::reassign::blocked_messages;

#[derive(Debug, Clone)]
pub struct OffboardingOutcome {
    pub products: Vec<Product>,
    pub dialog: Option<MissingDataDialog>,
}

/// Relocate every selected product of the departing member.
///
/// Moves are submitted in order and stop at the first failure; moves that
/// already went through stay applied.
pub async fn offboard_member(
    ctx: &AppContext,
    form: &OffboardingForm,
    create_shipment: bool,
    dates: Option<DesirableDates>,
) -> AppResult<OffboardingOutcome> {
    form.validate()?;
    let directory = ctx.directory().await?;
    let plan = form.plan(&directory.relocation_context(), create_shipment)?;

    let blocking = plan.blocking();
    if !blocking.is_empty() {
        return Err(AppError::Blocked(blocked_messages(blocking)));
    }
    let requests = plan.requests(dates)?;

    let mut products = Vec::with_capacity(requests.len());
    for (product_id, body) in &requests {
        let current = find_in(ctx.products().await?, product_id)?;
        let product = ctx
            .mutate(
                &ctx.products,
                "Offboard member",
                vec![Command::Update(body.apply_to(&current))],
                ctx.backend().reassign_product(product_id, body),
                |store, updated: &Product| store.confirm(&updated.id, updated.clone()),
            )
            .await?;
        products.push(product);
    }

    tracing::info!(
        member_id = %plan.member_id,
        moved = products.len(),
        "Offboarded member",
    );

    let dialog = MissingDataDialog::from_missing(plan.warnings());
    if let Some(dialog) = &dialog {
        ctx.notifier.missing_data(dialog.clone()).await;
    }
    ctx.notifier
        .success(
            "Offboard member",
            format!("{} products were relocated.", products.len()),
        )
        .await;

    Ok(OffboardingOutcome { products, dialog })
}
