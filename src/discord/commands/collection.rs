use super::guild_roles;
use crate::core::collection::compute_progress;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::collections::HashSet;

/// View a role checklist.
#[poise::command(slash_command)]
pub async fn collection(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("This command can only be used in a server.").await?;
        return Ok(());
    };

    let guild = ctx.data().managed.guild_snapshot(guild_id.get()).await;
    let roles = guild_roles(ctx)?;
    let member = ctx
        .author_member()
        .await
        .ok_or("Unable to resolve your server membership")?;
    let held: HashSet<u64> = member.roles.iter().map(|r| r.get()).collect();

    let progress = compute_progress(&roles, &held, &guild);

    let mention_list = |ids: &[u64]| -> String {
        ids.iter()
            .map(|id| format!("<@&{id}>\n"))
            .collect::<String>()
    };

    let description = format!(
        "**Role Collection Progress:** {}%\n`{}`\n\n**Roles you have**:\n{}\n**Roles you're missing**:\n{}",
        progress.percent_label(),
        progress.bar(),
        mention_list(&progress.held),
        mention_list(&progress.missing),
    );

    let embed = serenity::CreateEmbed::new()
        .title("Role Checklist")
        .color(0x0099ff)
        .description(description);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
