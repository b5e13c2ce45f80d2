// `bc` - clears recent bot output and bot-command messages from a channel.

use super::resolve_invoker;
use crate::core::cleanup::{
    select_for_deletion, ClearScope, MessageSnapshot, CONFIRMATION_LIFETIME, FETCH_LIMIT,
};
use crate::core::logging::CommandOrigin;
use crate::discord::logging::origin::origin_of;
use crate::discord::{Context, Error};
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Clears messages based on the given scope.
#[poise::command(prefix_command)]
pub async fn bc(
    ctx: Context<'_>,
    #[description = "`self` for only my messages, anything else for all bot messages"]
    args: Vec<String>,
) -> Result<(), Error> {
    let log = &ctx.data().event_log;
    let origin = origin_of(ctx);
    log.debug("bc command start", &origin).await;

    if ctx.guild_id().is_none() {
        log.debug("Command used outside of a guild", &origin).await;
        ctx.reply("This command can only be used in a guild.").await?;
        return Ok(());
    }

    let Some(invoker) = resolve_invoker(ctx).await? else {
        log.debug("Invoking member is unavailable", &origin).await;
        ctx.reply("Unable to determine member permissions.").await?;
        return Ok(());
    };

    if !ctx.data().access.can_bulk_clear(&invoker) {
        return Ok(());
    }

    let scope = requested_scope(&args);
    log.debug(format!("Scope determined: {}", scope.as_str()), &origin)
        .await;

    if let Err(e) = clear_channel(ctx, scope, &origin).await {
        log.error(format!("Error executing bc command: {e}"), &origin)
            .await;
        ctx.reply("An error occurred while deleting messages.").await?;
    }

    Ok(())
}

async fn clear_channel(
    ctx: Context<'_>,
    scope: ClearScope,
    origin: &CommandOrigin,
) -> Result<(), Error> {
    let log = &ctx.data().event_log;
    let http = ctx.serenity_context().http.clone();
    let channel_id = ctx.channel_id();
    let bot_id = ctx.framework().bot_id.get();

    let fetched = channel_id
        .messages(http.as_ref(), serenity::GetMessages::new().limit(FETCH_LIMIT))
        .await?;
    log.debug(format!("Fetched {} messages", fetched.len()), origin)
        .await;

    let snapshots: Vec<MessageSnapshot> = fetched.iter().map(snapshot).collect();
    let selection = select_for_deletion(&snapshots, scope, bot_id, Utc::now());
    log.debug(
        format!("Deletable messages filtered: {}", selection.matched),
        origin,
    )
    .await;
    log.debug(
        format!("Messages to delete: {}", selection.to_delete.len()),
        origin,
    )
    .await;

    if !selection.to_delete.is_empty() {
        let ids: Vec<serenity::MessageId> = selection
            .to_delete
            .iter()
            .map(|id| serenity::MessageId::new(*id))
            .collect();
        channel_id.delete_messages(http.as_ref(), ids).await?;
    }
    log.debug("Bulk deleted messages", origin).await;

    let confirmation = channel_id
        .say(
            http.as_ref(),
            format!("Cleared {} messages.", selection.to_delete.len()),
        )
        .await?;

    // The confirmation cleans itself up; the command doesn't wait for it.
    let event_log = Arc::clone(&ctx.data().event_log);
    let origin = origin.clone();
    tokio::spawn(async move {
        tokio::time::sleep(CONFIRMATION_LIFETIME).await;
        if let Err(e) = channel_id.delete_message(http.as_ref(), confirmation.id).await {
            event_log
                .error(format!("Error deleting confirmation message: {e}"), &origin)
                .await;
        }
    });

    Ok(())
}

/// Only the first word picks the scope; anything after it is ignored.
fn requested_scope(args: &[String]) -> ClearScope {
    ClearScope::from_arg(args.first().map(String::as_str))
}

fn snapshot(message: &serenity::Message) -> MessageSnapshot {
    MessageSnapshot {
        id: message.id.get(),
        author_id: message.author.id.get(),
        author_is_bot: message.author.bot,
        content: message.content.clone(),
        created_at: creation_time(&message.timestamp),
    }
}

/// Creation time with its milliseconds intact, so the age cutoff is exact.
fn creation_time(timestamp: &serenity::Timestamp) -> DateTime<Utc> {
    parse_creation_time(&timestamp.to_string()).unwrap_or_else(|| {
        DateTime::from_timestamp(timestamp.unix_timestamp(), 0).unwrap_or_default()
    })
}

fn parse_creation_time(rfc3339: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(rfc3339)
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn words(input: &[&str]) -> Vec<String> {
        input.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_scope_uses_first_word_only() {
        assert_eq!(requested_scope(&words(&["self", "extra"])), ClearScope::OwnMessages);
        assert_eq!(requested_scope(&words(&["all", "self"])), ClearScope::All);
        assert_eq!(requested_scope(&[]), ClearScope::All);
    }

    #[test]
    fn test_creation_time_keeps_milliseconds() {
        let created = parse_creation_time("2024-05-01T15:27:21.800Z").unwrap();
        assert_eq!(created.timestamp_subsec_millis(), 800);
    }

    #[test]
    fn test_message_just_under_the_age_limit_is_cleared() {
        let created = parse_creation_time("2024-05-01T15:27:21.800Z").unwrap();
        let now = created + Duration::milliseconds(179_500);
        let bot_id = 7;
        let message = MessageSnapshot {
            id: 1,
            author_id: bot_id,
            author_is_bot: true,
            content: "pong".to_string(),
            created_at: created,
        };

        let selection = select_for_deletion(&[message], ClearScope::OwnMessages, bot_id, now);
        assert_eq!(selection.to_delete, vec![1]);
    }
}
