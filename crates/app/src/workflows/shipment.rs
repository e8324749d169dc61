use stockroom_core::shipment::{Shipment, ShipmentPatch, ShipmentStatus};
use stockroom_core::store::Command;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflows::find_in;

/// Change a shipment's status or dates. Illegal status moves and date
/// changes on shipments already under way are refused locally.
pub async fn update_shipment(ctx: &AppContext, id: &str, patch: &ShipmentPatch) -> AppResult<Shipment> {
    let original = find_in(ctx.shipments().await?, id)?;
    let optimistic = patch.apply_to(&original)?;

    let shipment = ctx
        .mutate(
            &ctx.shipments,
            "Update shipment",
            vec![Command::Update(optimistic)],
            ctx.backend().update_shipment(id, patch),
            |store, updated: &Shipment| store.confirm(&updated.id, updated.clone()),
        )
        .await?;
    ctx.notifier
        .success("Update shipment", format!("Shipment is now {}.", shipment.shipment_status.as_str()))
        .await;
    Ok(shipment)
}

pub async fn cancel_shipment(ctx: &AppContext, id: &str) -> AppResult<Shipment> {
    let patch = ShipmentPatch {
        shipment_status: Some(ShipmentStatus::Cancelled),
        ..ShipmentPatch::default()
    };
    update_shipment(ctx, id, &patch).await
}

pub async fn delete_shipment(ctx: &AppContext, id: &str) -> AppResult<()> {
    ctx.mutate(
        &ctx.shipments,
        "Delete shipment",
        vec![Command::Delete(id.to_string())],
        ctx.backend().delete_shipment(id),
        |_, _| {},
    )
    .await?;
    ctx.update_view(|view| view.forget(id)).await;
    ctx.notifier.success("Delete shipment", "The shipment was deleted.").await;
    Ok(())
}
