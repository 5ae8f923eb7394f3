//! `/setup live|clips <channel>` -- admin-only; picks where notifications are posted.

use async_trait::async_trait;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::channel::ChannelType;
use twilight_model::guild::Permissions;
use twilight_util::builder::command::{ChannelBuilder, CommandBuilder, SubCommandBuilder};

use crate::Error;
use crate::models::{SlashInvocation, SlashReply};
use crate::services::discord::notification_targets::TargetKind;
use crate::services::discord::slash_service::{SlashCommand, SlashContext};

pub struct SetupCommand;

fn subcommand(name: &str, description: &str, channel_description: &str) -> SubCommandBuilder {
    SubCommandBuilder::new(name, description).option(
        ChannelBuilder::new("channel", channel_description)
            .channel_types([ChannelType::GuildText])
            .required(true),
    )
}

#[async_trait]
impl SlashCommand for SetupCommand {
    fn name(&self) -> &str {
        "setup"
    }

    fn definition(&self) -> Command {
        CommandBuilder::new(self.name(), "Configure Twitch notification settings", CommandType::ChatInput)
            .default_member_permissions(Permissions::ADMINISTRATOR)
            .option(subcommand(
                "live",
                "Set the channel for live stream notifications",
                "The channel to send live notifications to",
            ))
            .option(subcommand(
                "clips",
                "Set the channel for new clip notifications",
                "The channel to send clip notifications to",
            ))
            .build()
    }

    fn failure_message(&self) -> &str {
        "There was an error updating the notification settings."
    }

    async fn execute(&self, ctx: &SlashContext, invocation: &SlashInvocation) -> Result<SlashReply, Error> {
        if !invocation.is_admin {
            return Ok(SlashReply::ephemeral(
                "You need administrator permissions to use this command.",
            ));
        }

        let kind = match invocation.subcommand.as_deref() {
            Some("live") => TargetKind::Live,
            Some("clips") => TargetKind::Clips,
            other => return Err(Error::Command(format!("unknown /setup subcommand {:?}", other))),
        };
        let channel_id = invocation
            .channel("channel")
            .ok_or_else(|| Error::Command("/setup is missing the channel option".into()))?;

        ctx.targets.set(kind, channel_id);

        let what = match kind {
            TargetKind::Live => "Live stream",
            TargetKind::Clips => "New clip",
        };
        Ok(SlashReply::ephemeral(format!(
            "✅ {} notifications will now be sent to <#{}>",
            what, channel_id
        )))
    }
}
