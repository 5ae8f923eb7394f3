//! `/stream` -- is the channel live right now?

use async_trait::async_trait;
use tracing::warn;
use twilight_model::application::command::{Command, CommandType};
use twilight_util::builder::command::CommandBuilder;

use crate::Error;
use crate::models::{SlashInvocation, SlashReply};
use crate::services::discord::embeds::{stream_status_live, stream_status_offline};
use crate::services::discord::slash_service::{SlashCommand, SlashContext};

pub struct StreamCommand;

#[async_trait]
impl SlashCommand for StreamCommand {
    fn name(&self) -> &str {
        "stream"
    }

    fn definition(&self) -> Command {
        CommandBuilder::new(self.name(), "Check if the Twitch stream is live", CommandType::ChatInput).build()
    }

    fn defers(&self) -> bool {
        true
    }

    fn failure_message(&self) -> &str {
        "There was an error checking the stream status."
    }

    async fn execute(&self, ctx: &SlashContext, _invocation: &SlashInvocation) -> Result<SlashReply, Error> {
        let stream = ctx.helix.get_stream(&ctx.broadcaster_id).await?;

        let profile = match ctx.helix.get_user_by_id(&ctx.broadcaster_id).await {
            Ok(p) => p,
            Err(e) => {
                warn!("/stream: profile lookup failed => {}", e);
                None
            }
        };

        let now = ctx.clock.now();
        let embed = match &stream {
            Some(s) => stream_status_live(s, profile.as_ref(), now),
            None => stream_status_offline(&ctx.channel_name, profile.as_ref(), now),
        };

        Ok(SlashReply {
            embeds: vec![embed],
            ..Default::default()
        })
    }
}
