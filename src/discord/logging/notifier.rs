use crate::core::logging::{ErrorReport, OwnerNotifier};
use anyhow::Result;
use async_trait::async_trait;
use poise::serenity_prelude::{self as serenity, CreateEmbed, CreateMessage};
use std::sync::Arc;

/// Sends error reports to the bot owner as a red embed in DMs.
pub struct DiscordOwnerNotifier {
    http: Arc<serenity::Http>,
    owner_id: serenity::UserId,
}

impl DiscordOwnerNotifier {
    pub fn new(http: Arc<serenity::Http>, owner_id: u64) -> Self {
        Self {
            http,
            owner_id: serenity::UserId::new(owner_id),
        }
    }
}

pub fn report_embed(report: &ErrorReport) -> CreateEmbed {
    report.fields.iter().fold(
        CreateEmbed::new()
            .title(&report.title)
            .color(serenity::Color::from_rgb(255, 0, 0)),
        |embed, field| embed.field(&field.name, &field.value, false),
    )
}

#[async_trait]
impl OwnerNotifier for DiscordOwnerNotifier {
    async fn notify(&self, report: &ErrorReport) -> Result<()> {
        let channel = self.owner_id.create_dm_channel(self.http.as_ref()).await?;
        channel
            .send_message(
                self.http.as_ref(),
                CreateMessage::new().embed(report_embed(report)),
            )
            .await?;
        Ok(())
    }
}
