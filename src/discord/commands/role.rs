use super::{resolve_invoker, run_logged};
use crate::core::customization::{
    plan_customization, CustomizationPlan, PreviewAction, PreviewState, PreviewStep,
    PreviewTheme, RoleColor, PREVIEW_WINDOW,
};
use crate::core::managed::{decide_assignment, AssignmentAction, AssignmentDecision};
use crate::discord::logging::origin::origin_of;
use crate::discord::{Context, Error};
use crate::infra::preview::{PreviewFiles, AVATAR_FETCH_SIZE};
use poise::serenity_prelude::{self as serenity, Mentionable};
use std::sync::Arc;

/// Manage roles you have been made a manager of.
#[poise::command(
    slash_command,
    guild_only,
    subcommands("add", "remove", "customize")
)]
pub async fn role(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Give a managed role to a member.
#[poise::command(slash_command, guild_only)]
pub async fn add(
    ctx: Context<'_>,
    #[description = "The user to give the role to"] user: serenity::User,
    #[description = "The role to give"] role: serenity::Role,
) -> Result<(), Error> {
    run_logged(ctx, assign(ctx, AssignmentAction::Add, user, role)).await
}

/// Take a managed role from a member.
#[poise::command(slash_command, guild_only)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "The user to remove the role from"] user: serenity::User,
    #[description = "The role to remove"] role: serenity::Role,
) -> Result<(), Error> {
    run_logged(ctx, assign(ctx, AssignmentAction::Remove, user, role)).await
}

/// Change a managed role's name and/or color.
#[poise::command(slash_command, guild_only)]
pub async fn customize(
    ctx: Context<'_>,
    #[description = "The role to customize"] role: serenity::Role,
    #[description = "New color as a hex code, e.g. #ff8800"] color: Option<String>,
    #[description = "New role name"] name: Option<String>,
) -> Result<(), Error> {
    run_logged(ctx, customize_role(ctx, role, color, name)).await
}

/// Check the caller may manage `role`, replying with the refusal if not.
async fn ensure_can_manage(ctx: Context<'_>, role: &serenity::Role) -> Result<bool, Error> {
    let guild_id = ctx.guild_id().ok_or("Must be in a guild")?.get();
    let invoker = resolve_invoker(ctx)
        .await?
        .ok_or("Unable to determine member permissions")?;

    let managed = &ctx.data().managed;
    managed.ensure_guild(guild_id).await;
    let guild = managed.guild_snapshot(guild_id).await;

    if ctx
        .data()
        .access
        .can_manage_role(&invoker, &guild, role.id.get())
    {
        Ok(true)
    } else {
        ctx.say("You do not have permission to manage this role.")
            .await?;
        Ok(false)
    }
}

async fn assign(
    ctx: Context<'_>,
    action: AssignmentAction,
    user: serenity::User,
    role: serenity::Role,
) -> Result<(), Error> {
    if !ensure_can_manage(ctx, &role).await? {
        return Ok(());
    }

    let guild_id = ctx.guild_id().ok_or("Must be in a guild")?;
    let Ok(member) = guild_id.member(ctx, user.id).await else {
        ctx.say("The specified user is not a member of this guild.")
            .await?;
        return Ok(());
    };

    let has_role = member.roles.contains(&role.id);
    let reply = match (action, decide_assignment(action, user.bot, has_role)) {
        (AssignmentAction::Add, AssignmentDecision::Apply) => {
            member.add_role(ctx.http(), role.id).await?;
            format!("{} has been given to {}", role.mention(), user.mention())
        }
        (AssignmentAction::Add, AssignmentDecision::RefuseBot) => {
            "You cannot add roles to bots.".to_string()
        }
        (AssignmentAction::Add, AssignmentDecision::AlreadyInState) => format!(
            "{} already has the {} role or you do not have permission to manage this role.",
            user.name,
            role.mention()
        ),
        (AssignmentAction::Remove, AssignmentDecision::Apply) => {
            member.remove_role(ctx.http(), role.id).await?;
            format!("Removed {} from {}", role.mention(), user.mention())
        }
        (AssignmentAction::Remove, AssignmentDecision::RefuseBot) => {
            "You cannot remove roles from bots.".to_string()
        }
        (AssignmentAction::Remove, AssignmentDecision::AlreadyInState) => format!(
            "{} does not have the {} role or you do not have permission to manage this role.",
            user.name,
            role.mention()
        ),
    };

    ctx.say(reply).await?;
    Ok(())
}

async fn customize_role(
    ctx: Context<'_>,
    role: serenity::Role,
    color: Option<String>,
    name: Option<String>,
) -> Result<(), Error> {
    if !ensure_can_manage(ctx, &role).await? {
        return Ok(());
    }

    let plan = match plan_customization(color.as_deref(), name.as_deref()) {
        Ok(Some(plan)) => plan,
        Ok(None) => {
            ctx.say("Please provide at least one customization option (name or color).")
                .await?;
            return Ok(());
        }
        Err(_) => {
            ctx.say("Invalid color format. Please provide a valid hexadecimal color code.")
                .await?;
            return Ok(());
        }
    };

    match plan {
        CustomizationPlan::Rename(name) => rename_role(ctx, &role, name).await,
        CustomizationPlan::Recolor { color, name } => recolor_role(ctx, &role, color, name).await,
    }
}

async fn rename_role(ctx: Context<'_>, role: &serenity::Role, name: String) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be in a guild")?;

    match guild_id
        .edit_role(ctx.http(), role.id, serenity::EditRole::new().name(&name))
        .await
    {
        Ok(updated) => {
            ctx.say(format!("Role name changed to {}.", updated.name))
                .await?;
        }
        Err(e) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!(
                        "An error occurred while changing the role name: {e}"
                    ))
                    .ephemeral(true),
            )
            .await?;
        }
    }
    Ok(())
}

async fn recolor_role(
    ctx: Context<'_>,
    role: &serenity::Role,
    color: RoleColor,
    name: Option<String>,
) -> Result<(), Error> {
    let files = match render_previews(ctx, color).await {
        Ok(files) => files,
        Err(e) => {
            ctx.data()
                .event_log
                .error(
                    format!("Error in generating color preview: {e}"),
                    &origin_of(ctx),
                )
                .await;
            ctx.send(
                poise::CreateReply::default()
                    .content("There was an error while generating the color preview.")
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    };

    tracing::debug!("Color previews written to {}", files.dir().display());
    // `files` is dropped on every return below, which removes the images.
    run_preview(ctx, role, color, name, &files).await
}

/// Render both preview themes for the calling member.
async fn render_previews(ctx: Context<'_>, color: RoleColor) -> Result<PreviewFiles, Error> {
    let member = ctx
        .author_member()
        .await
        .ok_or("Unable to resolve your server membership")?
        .into_owned();
    let display_name = member.display_name().to_string();
    let avatar_url = sized_avatar_url(&member.face(), AVATAR_FETCH_SIZE);

    let renderer = Arc::clone(&ctx.data().previews);
    let avatar = renderer.fetch_avatar(&avatar_url).await?;

    let files = tokio::task::spawn_blocking(move || {
        renderer.write_previews(&avatar, color, &display_name)
    })
    .await??;
    Ok(files)
}

/// Post the preview and wait for the caller's confirm, cancel or switch.
async fn run_preview(
    ctx: Context<'_>,
    role: &serenity::Role,
    color: RoleColor,
    name: Option<String>,
    files: &PreviewFiles,
) -> Result<(), Error> {
    let mut state = PreviewState::default();
    let deadline = tokio::time::Instant::now() + PREVIEW_WINDOW;

    let first = serenity::CreateAttachment::path(files.path(state.theme())).await?;
    let reply = ctx
        .send(
            poise::CreateReply::default()
                .content(state.theme().caption())
                .attachment(first)
                .components(preview_buttons()),
        )
        .await?;
    let message_id = reply.message().await?.id;

    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        let press = serenity::ComponentInteractionCollector::new(ctx)
            .author_id(ctx.author().id)
            .message_id(message_id)
            .timeout(remaining)
            .filter(|press| PreviewAction::from_custom_id(&press.data.custom_id).is_some())
            .await;

        let Some(press) = press else {
            reply
                .edit(
                    ctx,
                    poise::CreateReply::default()
                        .content("Color customization timed out.")
                        .components(vec![]),
                )
                .await?;
            return Ok(());
        };

        let Some(action) = PreviewAction::from_custom_id(&press.data.custom_id) else {
            continue;
        };

        let update = match state.apply(action) {
            PreviewStep::Commit => {
                let guild_id = ctx.guild_id().ok_or("Must be in a guild")?;
                let new_name = name.clone().unwrap_or_else(|| role.name.clone());
                let updated = guild_id
                    .edit_role(
                        ctx.http(),
                        role.id,
                        serenity::EditRole::new()
                            .colour(color.rgb())
                            .name(new_name),
                    )
                    .await?;
                serenity::CreateInteractionResponseMessage::new()
                    .content(format!("Successfully customized role {}.", updated.name))
                    .components(vec![])
            }
            PreviewStep::Abort => serenity::CreateInteractionResponseMessage::new()
                .content("Color customization cancelled.")
                .components(vec![]),
            PreviewStep::Show(theme) => switch_preview(files, theme).await?,
        };

        press
            .create_response(ctx, serenity::CreateInteractionResponse::UpdateMessage(update))
            .await?;

        if !matches!(action, PreviewAction::Switch) {
            return Ok(());
        }
    }
}

async fn switch_preview(
    files: &PreviewFiles,
    theme: PreviewTheme,
) -> Result<serenity::CreateInteractionResponseMessage, Error> {
    let attachment = serenity::CreateAttachment::path(files.path(theme)).await?;
    Ok(serenity::CreateInteractionResponseMessage::new()
        .content(theme.caption())
        .files(vec![attachment])
        .components(preview_buttons()))
}

fn preview_buttons() -> Vec<serenity::CreateActionRow> {
    let buttons = PreviewAction::ALL
        .iter()
        .map(|action| {
            let style = match action {
                PreviewAction::Confirm => serenity::ButtonStyle::Success,
                PreviewAction::Cancel => serenity::ButtonStyle::Danger,
                PreviewAction::Switch => serenity::ButtonStyle::Secondary,
            };
            serenity::CreateButton::new(action.custom_id())
                .label(action.label())
                .style(style)
        })
        .collect();
    vec![serenity::CreateActionRow::Buttons(buttons)]
}

/// Swap whatever size the CDN URL asks for with `size`.
fn sized_avatar_url(url: &str, size: u32) -> String {
    let base = url.split('?').next().unwrap_or(url);
    format!("{base}?size={size}")
}
