use async_trait::async_trait;

use crate::Error;
use crate::services::twitch::command_service::{ChatCommand, CommandContext};
use crate::utils::time::format_uptime;

pub struct UptimeCommand;

#[async_trait]
impl ChatCommand for UptimeCommand {
    fn name(&self) -> &str {
        "uptime"
    }

    fn description(&self) -> &str {
        "Shows how long the bot has been running"
    }

    fn usage(&self) -> &str {
        "!uptime"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> Result<String, Error> {
        let elapsed = ctx.clock.now() - ctx.started_at;
        Ok(format!("Bot has been running for: {}", format_uptime(elapsed)))
    }
}
