use async_trait::async_trait;

use crate::Error;
use crate::services::twitch::command_service::{ChatCommand, CommandContext};

pub struct EchoCommand;

#[async_trait]
impl ChatCommand for EchoCommand {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Bot echoes back the message"
    }

    fn usage(&self) -> &str {
        "!echo [message]"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<String, Error> {
        if args.is_empty() {
            return Ok(format!("@{}, you didn't provide a message to echo!", ctx.chat.username));
        }
        Ok(format!("Echo: {}", args.join(" ")))
    }
}
