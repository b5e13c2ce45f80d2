// This is the entry point of the role steward bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (JSON file, log file, preview images)
// - `discord/` = Discord-specific adapters (commands, owner DMs)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Load the managed-role mapping and register commands

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use crate::config::BotConfig;
use crate::core::logging::{CommandOrigin, EventLog};
use crate::core::managed::{AccessPolicy, ManagedRoleService};
use crate::discord::commands::GENERIC_FAILURE;
use crate::discord::logging::notifier::DiscordOwnerNotifier;
use crate::discord::logging::origin::origin_of;
use crate::discord::{Data, Error};
use crate::infra::logging::FileLogSink;
use crate::infra::managed::JsonManagedStore;
use crate::infra::preview::PreviewRenderer;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Uncaught command errors go to the event log (and so to the owner);
/// everything else gets poise's default treatment.
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            ctx.data()
                .event_log
                .error(format!("Error executing command: {error}"), &origin_of(ctx))
                .await;
            if let Err(e) = ctx.say(GENERIC_FAILURE).await {
                tracing::error!("Failed to send error reply: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = BotConfig::from_env().expect("Invalid bot configuration");

    // Keep runtime files in a dedicated folder so the repo root stays tidy.
    std::fs::create_dir_all(&config.data_dir).expect("Failed to create data directory");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // The mapping is shared by every command; it is read from disk in setup.
    let managed_service = Arc::new(ManagedRoleService::new(JsonManagedStore::new(
        &config.managed_data_file,
    )));
    let preview_renderer = Arc::new(PreviewRenderer::new(
        &config.preview_font,
        &config.preview_dir,
    ));
    let access = AccessPolicy::new(config.owner_id);

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================
    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required for `bc` and its prefix filter
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let owner_id = config.owner_id;
    let log_file = config.log_file.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: discord::commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("{} is connected", ready.user.name);

                // The owner notifier needs the client's HTTP handle, so the
                // event log is built here rather than above.
                let notifier = DiscordOwnerNotifier::new(ctx.http.clone(), owner_id);
                let event_log = Arc::new(EventLog::new(FileLogSink::new(log_file), notifier));

                let startup = CommandOrigin::Unknown;
                event_log
                    .info("Loading managed data from file.", &startup)
                    .await;
                match managed_service.reload().await {
                    Ok(()) => {
                        event_log
                            .info("Managed data loaded successfully.", &startup)
                            .await
                    }
                    Err(e) => {
                        event_log
                            .error(format!("Error loading managed data: {e}"), &startup)
                            .await
                    }
                }

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Commands registered");

                Ok(Data {
                    managed: managed_service,
                    access,
                    event_log,
                    previews: preview_renderer,
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
