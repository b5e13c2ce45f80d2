// Discord commands module.
// Each feature gets its own command file.
//
// **Notice the pattern:**
// 1. Extract primitive data from Discord types
// 2. Call core logic
// 3. Format the response based on the result

pub mod clear;

pub mod collection;

pub mod manager;

pub mod role;

use crate::core::logging::EventLog;
use crate::core::managed::{AccessPolicy, Invoker, ManagedRoleService, RoleSummary};
use crate::discord::logging::notifier::DiscordOwnerNotifier;
use crate::discord::logging::origin::origin_of;
use crate::infra::logging::FileLogSink;
use crate::infra::managed::JsonManagedStore;
use crate::infra::preview::PreviewRenderer;
use std::future::Future;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands.
pub struct Data {
    pub managed: Arc<ManagedRoleService<JsonManagedStore>>,
    pub access: AccessPolicy,
    pub event_log: Arc<EventLog<FileLogSink, DiscordOwnerNotifier>>,
    pub previews: Arc<PreviewRenderer>,
}

/// Every command the framework should know about.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        clear::bc(),
        collection::collection(),
        manager::manager(),
        role::role(),
    ]
}

pub const GENERIC_FAILURE: &str = "An error occurred while executing the command.";

/// Resolve the calling member into an [`Invoker`].
///
/// `None` outside a guild or when the member can't be resolved.
pub async fn resolve_invoker(ctx: Context<'_>) -> Result<Option<Invoker>, Error> {
    let Some(member) = ctx.author_member().await else {
        return Ok(None);
    };
    let member = member.into_owned();

    // Interaction members carry their permissions; prefix members need the cache.
    let (guild_owner, permissions) = {
        let guild = ctx.guild().ok_or("Guild is not cached")?;
        let permissions = member
            .permissions
            .unwrap_or_else(|| guild.member_permissions(&member));
        (guild.owner_id, permissions)
    };

    Ok(Some(Invoker {
        user_id: member.user.id.get(),
        is_guild_owner: member.user.id == guild_owner,
        is_administrator: permissions.administrator(),
        can_manage_messages: permissions.manage_messages(),
        role_ids: member.roles.iter().map(|r| r.get()).collect(),
    }))
}

/// The guild's roles as seen in the cache.
pub fn guild_roles(ctx: Context<'_>) -> Result<Vec<RoleSummary>, Error> {
    let guild = ctx.guild().ok_or("Guild is not cached")?;
    Ok(guild
        .roles
        .values()
        .map(|role| RoleSummary {
            id: role.id.get(),
            position: role.position,
            managed: role.managed,
        })
        .collect())
}

/// Run a handler body; on failure log it and tell the user something went wrong.
pub async fn run_logged<F>(ctx: Context<'_>, body: F) -> Result<(), Error>
where
    F: Future<Output = Result<(), Error>>,
{
    if let Err(e) = body.await {
        ctx.data()
            .event_log
            .error(format!("Error executing command: {e}"), &origin_of(ctx))
            .await;
        ctx.say(GENERIC_FAILURE).await?;
    }
    Ok(())
}
