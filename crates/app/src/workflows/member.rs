use stockroom_core::forms::member::MemberForm;
use stockroom_core::member::Member;
use stockroom_core::store::Command;
use stockroom_core::team::Team;
use stockroom_core::types::temp_id;
use stockroom_core::CoreError;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflows::find_in;

async fn resolve_team(ctx: &AppContext, team_id: Option<&str>) -> AppResult<Option<Team>> {
    match team_id {
        Some(id) => Ok(Some(find_in(ctx.teams().await?, id)?)),
        None => Ok(None),
    }
}

pub async fn create_member(ctx: &AppContext, form: &MemberForm) -> AppResult<Member> {
    let body = form.submit()?;
    let team = resolve_team(ctx, body.team.as_deref()).await?;
    let provisional = temp_id();
    let optimistic = body.to_optimistic(provisional.clone(), team);

    let member = ctx
        .mutate(
            &ctx.members,
            "Create member",
            vec![Command::Create(optimistic)],
            ctx.backend().create_member(&body),
            move |store, created: &Member| store.confirm(&provisional, created.clone()),
        )
        .await?;
    ctx.notifier
        .success("Create member", format!("{} was added.", member.full_name()))
        .await;
    Ok(member)
}

pub async fn update_member(ctx: &AppContext, id: &str, form: &MemberForm) -> AppResult<Member> {
    let original = find_in(ctx.members().await?, id)?;
    let body = form.submit()?;
    let team = resolve_team(ctx, body.team.as_deref()).await?;
    let optimistic = body.apply_to(&original, team);

    let member = ctx
        .mutate(
            &ctx.members,
            "Update member",
            vec![Command::Update(optimistic)],
            ctx.backend().update_member(id, &body),
            |store, updated: &Member| store.confirm(&updated.id, updated.clone()),
        )
        .await?;
    ctx.notifier
        .success("Update member", format!("{} was updated.", member.full_name()))
        .await;
    Ok(member)
}

/// Delete a member. Members still holding products must be offboarded
/// first.
pub async fn delete_member(ctx: &AppContext, id: &str) -> AppResult<()> {
    let member = find_in(ctx.members().await?, id)?;
    if !member.products.is_empty() {
        return Err(CoreError::Conflict(format!(
            "{} still holds {} products. Offboard the member first.",
            member.full_name(),
            member.products.len()
        ))
        .into());
    }

    ctx.mutate(
        &ctx.members,
        "Delete member",
        vec![Command::Delete(id.to_string())],
        ctx.backend().delete_member(id),
        |_, _| {},
    )
    .await?;
    ctx.update_view(|view| view.forget(id)).await;
    ctx.notifier
        .success("Delete member", format!("{} was deleted.", member.full_name()))
        .await;
    Ok(())
}
