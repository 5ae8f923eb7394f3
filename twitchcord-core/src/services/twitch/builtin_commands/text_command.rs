//! Canned-response commands defined in a commands file.
//!
//! `{user}` in the response is replaced by the caller's login and `{args}` by the
//! arguments joined with spaces. An optional per-user cooldown is shared with the
//! cooldown tracker under the command's name.

use async_trait::async_trait;
use chrono::Duration;

use crate::Error;
use crate::services::cooldown::CooldownResult;
use crate::services::twitch::command_service::{ChatCommand, CommandContext};
use crate::services::twitch::command_source::TextCommandDef;

pub struct TextCommand {
    name: String,
    description: String,
    usage: String,
    response: String,
    cooldown: Option<Duration>,
}

impl TextCommand {
    pub fn from_def(name: String, def: TextCommandDef) -> Self {
        Self {
            usage: def.usage.unwrap_or_else(|| format!("!{name}")),
            description: def.description,
            response: def.response,
            cooldown: def
                .cooldown_seconds
                .filter(|s| *s > 0)
                .map(|s| Duration::seconds(i64::from(s))),
            name,
        }
    }
}

#[async_trait]
impl ChatCommand for TextCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn usage(&self) -> &str {
        &self.usage
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<String, Error> {
        if let Some(window) = self.cooldown {
            if let CooldownResult::OnCooldown { remaining_seconds } =
                ctx.cooldowns.check_and_stamp(&self.name, &ctx.chat.user_id, window)
            {
                return Ok(format!(
                    "@{}, please wait {} seconds before using this command again.",
                    ctx.chat.username, remaining_seconds
                ));
            }
        }

        Ok(self
            .response
            .replace("{user}", &ctx.chat.username)
            .replace("{args}", &args.join(" ")))
    }
}
