//! `/clips [count]` -- the most recent clips of the channel.

use async_trait::async_trait;
use twilight_model::application::command::{Command, CommandType};
use twilight_util::builder::command::{CommandBuilder, IntegerBuilder};

use crate::Error;
use crate::models::{SlashInvocation, SlashReply};
use crate::services::discord::embeds::clip_listing;
use crate::services::discord::slash_service::{SlashCommand, SlashContext};

pub const DEFAULT_CLIP_COUNT: i64 = 3;
pub const MAX_CLIP_COUNT: i64 = 5;

pub struct ClipsCommand;

#[async_trait]
impl SlashCommand for ClipsCommand {
    fn name(&self) -> &str {
        "clips"
    }

    fn definition(&self) -> Command {
        CommandBuilder::new(self.name(), "Get recent clips from the Twitch channel", CommandType::ChatInput)
            .option(
                IntegerBuilder::new("count", "Number of clips to show (1-5)")
                    .min_value(1)
                    .max_value(MAX_CLIP_COUNT)
                    .required(false),
            )
            .build()
    }

    fn defers(&self) -> bool {
        true
    }

    fn failure_message(&self) -> &str {
        "There was an error fetching clips."
    }

    async fn execute(&self, ctx: &SlashContext, invocation: &SlashInvocation) -> Result<SlashReply, Error> {
        let count = invocation
            .integer("count")
            .unwrap_or(DEFAULT_CLIP_COUNT)
            .clamp(1, MAX_CLIP_COUNT) as u8;

        let clips = ctx.helix.get_clips(&ctx.broadcaster_id, None, Some(count)).await?;
        if clips.is_empty() {
            return Ok(SlashReply::text("No clips found for this channel."));
        }

        let now = ctx.clock.now();
        let embeds: Vec<_> = clips.iter().take(count as usize).map(|c| clip_listing(c, now)).collect();
        Ok(SlashReply {
            content: Some(format!(
                "Here are the {} most recent clips from {}:",
                embeds.len(),
                ctx.channel_name
            )),
            embeds,
            ephemeral: false,
        })
    }
}
