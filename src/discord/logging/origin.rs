use crate::core::logging::{CommandOrigin, PrefixInvocation, SlashInvocation};
use crate::discord::Context;

/// Describe the invocation behind `ctx` for the event log.
pub fn origin_of(ctx: Context<'_>) -> CommandOrigin {
    match ctx {
        poise::Context::Prefix(prefix) => CommandOrigin::Prefix(PrefixInvocation {
            command_name: prefix.command.name.clone(),
            args: prefix.args.split_whitespace().map(str::to_owned).collect(),
            author_id: prefix.msg.author.id.get(),
            author_name: prefix.msg.author.name.clone(),
            channel_id: prefix.msg.channel_id.get(),
        }),
        poise::Context::Application(app) => {
            let guild = ctx.guild().map(|g| (g.name.clone(), g.id.get()));
            CommandOrigin::Slash(SlashInvocation {
                command_name: app.command.qualified_name.clone(),
                user_id: app.interaction.user.id.get(),
                user_name: app.interaction.user.name.clone(),
                channel_id: app.interaction.channel_id.get(),
                guild,
            })
        }
    }
}
