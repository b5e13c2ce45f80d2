use super::{guild_roles, resolve_invoker};
use crate::core::managed::{
    managed_roles_by_hierarchy, render_manager_listing, AddManagerOutcome, Invoker, ManagerName,
    RemoveManagerOutcome, RoleManagersBlock,
};
use crate::discord::logging::origin::origin_of;
use crate::discord::{Context, Error};
use poise::serenity_prelude::{self as serenity, Mentionable};

/// Manage role managers.
#[poise::command(
    slash_command,
    guild_only,
    subcommands("add", "remove", "list", "admin")
)]
pub async fn manager(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Add a role manager.
#[poise::command(slash_command, guild_only)]
pub async fn add(
    ctx: Context<'_>,
    #[description = "The user to add as a role manager"] user: serenity::User,
    #[description = "The role to add the manager for"] role: serenity::Role,
) -> Result<(), Error> {
    let result = add_manager(ctx, &user, &role).await;
    finish(ctx, "add").await;
    result
}

async fn add_manager(
    ctx: Context<'_>,
    user: &serenity::User,
    role: &serenity::Role,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be in a guild")?.get();
    let invoker = invoker(ctx).await?;
    let managed = &ctx.data().managed;
    let access = &ctx.data().access;

    managed.ensure_guild(guild_id).await;
    let guild = managed.guild_snapshot(guild_id).await;

    if !access.can_edit_managers(&invoker, &guild) {
        ctx.say(EDIT_GATE_FAILURE).await?;
        return Ok(());
    }
    if !access.can_commit_manager_change(&invoker, &guild) {
        ctx.say("Only the server owner, server managers or users with Administrator permission can add role managers.")
            .await?;
        return Ok(());
    }

    let reply = match managed
        .add_manager(guild_id, role.id.get(), user.id.get())
        .await
    {
        AddManagerOutcome::Added => format!(
            "{} has been added as a role manager for {}",
            user.mention(),
            role.mention()
        ),
        AddManagerOutcome::AlreadyManager => format!(
            "{} is already a manager for {}",
            user.mention(),
            role.mention()
        ),
    };
    ctx.say(reply).await?;
    Ok(())
}

/// Remove a role manager.
#[poise::command(slash_command, guild_only)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "The user to remove as a role manager"] user: serenity::User,
    #[description = "The role to remove the manager from"] role: serenity::Role,
) -> Result<(), Error> {
    let result = remove_manager(ctx, &user, &role).await;
    finish(ctx, "remove").await;
    result
}

async fn remove_manager(
    ctx: Context<'_>,
    user: &serenity::User,
    role: &serenity::Role,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be in a guild")?.get();
    let invoker = invoker(ctx).await?;
    let managed = &ctx.data().managed;
    let access = &ctx.data().access;

    managed.ensure_guild(guild_id).await;
    let guild = managed.guild_snapshot(guild_id).await;

    if !access.can_edit_managers(&invoker, &guild) {
        ctx.say(EDIT_GATE_FAILURE).await?;
        return Ok(());
    }
    if !access.can_commit_manager_change(&invoker, &guild) {
        ctx.say("Only the server owner, server managers or users with Administrator permission can remove role managers.")
            .await?;
        return Ok(());
    }

    let reply = match managed
        .remove_manager(guild_id, role.id.get(), user.id.get())
        .await
    {
        RemoveManagerOutcome::Removed { role_cleared } => {
            if role_cleared {
                ctx.data()
                    .event_log
                    .debug(
                        format!("Role {} has no managers left", role.id),
                        &origin_of(ctx),
                    )
                    .await;
            }
            format!(
                "{} has been removed as a role manager for {}",
                user.mention(),
                role.mention()
            )
        }
        RemoveManagerOutcome::NotManager => format!(
            "{} is not a manager for {}",
            user.mention(),
            role.mention()
        ),
        RemoveManagerOutcome::RoleNotManaged => {
            format!("{} is not a role manager.", role.mention())
        }
    };
    ctx.say(reply).await?;
    Ok(())
}

/// List all role managers.
#[poise::command(slash_command, guild_only)]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let result = list_managers(ctx).await;
    finish(ctx, "list").await;
    result
}

async fn list_managers(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let guild_id = ctx.guild_id().ok_or("Must be in a guild")?;
    let origin = origin_of(ctx);
    let managed = &ctx.data().managed;
    let log = &ctx.data().event_log;

    managed.ensure_guild(guild_id.get()).await;
    let guild = managed.guild_snapshot(guild_id.get()).await;
    let roles = guild_roles(ctx)?;

    let server_manager = guild
        .server_manager
        .filter(|role_id| roles.iter().any(|r| r.id == *role_id));

    let mut blocks = Vec::new();
    for role in managed_roles_by_hierarchy(&roles, &guild) {
        let mut managers = Vec::new();
        for &user_id in guild.managers_of(role.id) {
            match guild_id
                .member(ctx, serenity::UserId::new(user_id))
                .await
            {
                Ok(member) => managers.push(ManagerName::Found {
                    username: member.user.name.clone(),
                    discriminator: member.user.discriminator.map(|d| d.get()),
                }),
                Err(e) => {
                    log.error(
                        format!("Error fetching user with ID {user_id}: {e}"),
                        &origin,
                    )
                    .await;
                    managers.push(ManagerName::NotFound(user_id));
                }
            }
        }
        blocks.push(RoleManagersBlock {
            role_id: role.id,
            managers,
        });
    }

    let embed = serenity::CreateEmbed::new()
        .title("Role Managers")
        .color(0x0099ff)
        .description(render_manager_listing(server_manager, &blocks));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    log.info("List subcommand executed successfully.", &origin)
        .await;
    Ok(())
}

/// Set the server manager role.
#[poise::command(slash_command, guild_only)]
pub async fn admin(
    ctx: Context<'_>,
    #[description = "The role to set as server manager"] role: serenity::Role,
) -> Result<(), Error> {
    let result = set_admin(ctx, &role).await;
    finish(ctx, "admin").await;
    result
}

async fn set_admin(ctx: Context<'_>, role: &serenity::Role) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be in a guild")?.get();
    let invoker = invoker(ctx).await?;

    if !ctx.data().access.can_set_server_manager(&invoker) {
        ctx.say("Only the server owner or users with Administrator can assign server managers.")
            .await?;
        return Ok(());
    }

    ctx.data()
        .managed
        .set_server_manager(guild_id, role.id.get())
        .await;
    ctx.say(format!("Server manager role set to {}.", role.mention()))
        .await?;
    Ok(())
}

const EDIT_GATE_FAILURE: &str = "Only the server owner, server managers, or users with Administrator permission can add/remove role managers.";

async fn invoker(ctx: Context<'_>) -> Result<Invoker, Error> {
    resolve_invoker(ctx)
        .await?
        .ok_or_else(|| "Unable to determine member permissions".into())
}

/// Every subcommand ends here: note it and persist whatever is in memory.
async fn finish(ctx: Context<'_>, subcommand: &str) {
    let origin = origin_of(ctx);
    let log = &ctx.data().event_log;

    log.info(format!("Executing: Manager | {subcommand}"), &origin)
        .await;
    match ctx.data().managed.save().await {
        Ok(()) => log.info("Managed data saved successfully.", &origin).await,
        Err(e) => {
            log.error(format!("Error writing to managed.json: {e}"), &origin)
                .await
        }
    }
}
