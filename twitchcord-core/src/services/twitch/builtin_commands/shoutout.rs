//! !so <username> -- shout out another streamer. Moderators and the broadcaster only.

use async_trait::async_trait;

use crate::Error;
use crate::services::twitch::command_service::{ChatCommand, CommandContext};

pub struct ShoutoutCommand;

#[async_trait]
impl ChatCommand for ShoutoutCommand {
    fn name(&self) -> &str {
        "so"
    }

    fn description(&self) -> &str {
        "Gives a shoutout to another streamer (moderators only)"
    }

    fn usage(&self) -> &str {
        "!so [username]"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<String, Error> {
        if !ctx.chat.is_privileged() {
            return Ok(format!(
                "@{}, you don't have permission to use this command.",
                ctx.chat.username
            ));
        }

        let Some(target) = args.first() else {
            return Ok(format!(
                "@{}, please provide a username to shout out.",
                ctx.chat.username
            ));
        };

        let username = target.strip_prefix('@').unwrap_or(target);
        Ok(format!(
            "Check out @{username} at https://twitch.tv/{username} - they're an awesome streamer!"
        ))
    }
}
