use stockroom_core::forms::bulk::BulkCreateForm;
use stockroom_core::forms::product::{ProductForm, ProductSubmission};
use stockroom_core::product::Product;
use stockroom_core::store::Command;
use stockroom_core::types::{temp_id, EntityId};

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflows::find_in;

/// Result of submitting the primary product form.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Product),
    /// Quantity above one: the view continues with the per-unit form.
    NeedsBulkDetails(BulkCreateForm),
}

/// Submit a create form. A single unit is created right away; several
/// units hand back a [`BulkCreateForm`] for [`submit_bulk`].
pub async fn submit_product_form(ctx: &AppContext, form: &ProductForm) -> AppResult<CreateOutcome> {
    match form.submit()? {
        ProductSubmission::Single(body) => {
            let provisional = temp_id();
            let optimistic = body.to_optimistic(provisional.clone())?;
            let created = ctx
                .mutate(
                    &ctx.products,
                    "Create product",
                    vec![Command::Create(optimistic)],
                    ctx.backend().create_product(&body),
                    move |store, created: &Product| store.confirm(&provisional, created.clone()),
                )
                .await?;
            ctx.notifier
                .success("Create product", format!("{} was created.", created.display_name()))
                .await;
            Ok(CreateOutcome::Created(created))
        }
        ProductSubmission::Bulk(bulk) => Ok(CreateOutcome::NeedsBulkDetails(bulk)),
    }
}

/// Create every unit of a bulk form in one request.
pub async fn submit_bulk(ctx: &AppContext, form: &BulkCreateForm) -> AppResult<Vec<Product>> {
    let bodies = form.submit()?;
    let provisional: Vec<EntityId> = bodies.iter().map(|_| temp_id()).collect();
    let commands = bodies
        .iter()
        .zip(&provisional)
        .map(|(body, id)| body.to_optimistic(id.clone()).map(Command::Create))
        .collect::<Result<Vec<_>, _>>()?;

    let created = ctx
        .mutate(
            &ctx.products,
            "Create products",
            commands,
            ctx.backend().bulk_create_products(&bodies),
            move |store, created: &Vec<Product>| {
                for (id, product) in provisional.iter().zip(created) {
                    store.confirm(id, product.clone());
                }
            },
        )
        .await?;
    ctx.notifier
        .success("Create products", format!("{} products were created.", created.len()))
        .await;
    Ok(created)
}

/// Save an edit form. Only changed fields are sent.
pub async fn update_product(ctx: &AppContext, id: &str, form: &ProductForm) -> AppResult<Product> {
    let original = find_in(ctx.products().await?, id)?;
    let patch = form.update_patch(&original)?;
    let optimistic = patch.apply_to(&original)?;

    let updated = ctx
        .mutate(
            &ctx.products,
            "Update product",
            vec![Command::Update(optimistic)],
            ctx.backend().update_product(id, &patch),
            |store, updated: &Product| store.confirm(&updated.id, updated.clone()),
        )
        .await?;
    ctx.notifier
        .success("Update product", format!("{} was updated.", updated.display_name()))
        .await;
    Ok(updated)
}

pub async fn delete_product(ctx: &AppContext, id: &str) -> AppResult<()> {
    ctx.mutate(
        &ctx.products,
        "Delete product",
        vec![Command::Delete(id.to_string())],
        ctx.backend().delete_product(id),
        |_, _| {},
    )
    .await?;
    ctx.notifier.success("Delete product", "The product was deleted.").await;
    Ok(())
}

/// Products held by one member or office, straight from the backend.
pub async fn products_for_entity(ctx: &AppContext, entity_id: &str) -> AppResult<Vec<Product>> {
    Ok(ctx.backend().list_products_by_entity(entity_id).await?)
}

/// The stock export as raw CSV bytes.
pub async fn export_csv(ctx: &AppContext) -> AppResult<Vec<u8>> {
    match ctx.backend().export_products_csv().await {
        Ok(bytes) => {
            tracing::info!(bytes = bytes.len(), "Exported products");
            Ok(bytes)
        }
        Err(e) => {
            ctx.notifier.error("Export products", e.user_message()).await;
            Err(e.into())
        }
    }
}
