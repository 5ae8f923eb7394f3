use async_trait::async_trait;

use crate::Error;
use crate::services::twitch::command_service::{ChatCommand, CommandContext};

pub struct HelloCommand;

#[async_trait]
impl ChatCommand for HelloCommand {
    fn name(&self) -> &str {
        "hello"
    }

    fn description(&self) -> &str {
        "Bot greets the user"
    }

    fn usage(&self) -> &str {
        "!hello"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> Result<String, Error> {
        Ok(format!("Hello, @{}!", ctx.chat.username))
    }
}
