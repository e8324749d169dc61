use stockroom_core::store::Command;
use stockroom_core::team::{Team, TeamInput};
use stockroom_core::types::temp_id;
use stockroom_core::CoreError;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflows::find_in;

fn normalized(input: &TeamInput) -> AppResult<TeamInput> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Team name is required.".to_string()).into());
    }
    Ok(TeamInput {
        name: name.to_string(),
        color: input.color.clone(),
    })
}

pub async fn create_team(ctx: &AppContext, input: &TeamInput) -> AppResult<Team> {
    let body = normalized(input)?;
    let teams = ctx.teams().await?;
    if teams.iter().any(|t| t.name.eq_ignore_ascii_case(&body.name)) {
        return Err(CoreError::Conflict(format!("A team named {} already exists.", body.name)).into());
    }

    let provisional = temp_id();
    let optimistic = Team {
        id: provisional.clone(),
        name: body.name.clone(),
        color: body.color.clone(),
        members: Vec::new(),
    };
    let team = ctx
        .mutate(
            &ctx.teams,
            "Create team",
            vec![Command::Create(optimistic)],
            ctx.backend().create_team(&body),
            move |store, created: &Team| store.confirm(&provisional, created.clone()),
        )
        .await?;
    ctx.notifier
        .success("Create team", format!("{} was created.", team.name))
        .await;
    Ok(team)
}

pub async fn update_team(ctx: &AppContext, id: &str, input: &TeamInput) -> AppResult<Team> {
    let body = normalized(input)?;
    let original = find_in(ctx.teams().await?, id)?;
    let optimistic = Team {
        name: body.name.clone(),
        color: body.color.clone(),
        ..original
    };

    let team = ctx
        .mutate(
            &ctx.teams,
            "Update team",
            vec![Command::Update(optimistic)],
            ctx.backend().update_team(id, &body),
            |store, updated: &Team| store.confirm(&updated.id, updated.clone()),
        )
        .await?;
    ctx.notifier
        .success("Update team", format!("{} was updated.", team.name))
        .await;
    Ok(team)
}

pub async fn delete_team(ctx: &AppContext, id: &str) -> AppResult<()> {
    ctx.mutate(
        &ctx.teams,
        "Delete team",
        vec![Command::Delete(id.to_string())],
        ctx.backend().delete_team(id),
        |_, _| {},
    )
    .await?;
    ctx.notifier.success("Delete team", "The team was deleted.").await;
    Ok(())
}
