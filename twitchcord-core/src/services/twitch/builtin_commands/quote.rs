//! !quote -- a random inspirational quote, at most once per 30 seconds per user.

use async_trait::async_trait;
use chrono::Duration;
use rand::Rng;

use crate::Error;
use crate::services::cooldown::CooldownResult;
use crate::services::twitch::command_service::{ChatCommand, CommandContext};

pub const QUOTE_COOLDOWN_SECS: i64 = 30;

pub const QUOTES: &[&str] = &[
    "The best time to plant a tree was 20 years ago. The second best time is now.",
    "It does not matter how slowly you go as long as you do not stop.",
    "Quality is not an act, it is a habit.",
    "Life is 10% what happens to you and 90% how you react to it.",
    "The only way to do great work is to love what you do.",
    "Success is not final, failure is not fatal: It is the courage to continue that counts.",
    "The future belongs to those who believe in the beauty of their dreams.",
    "Believe you can and you're halfway there.",
];

pub struct QuoteCommand;

#[async_trait]
impl ChatCommand for QuoteCommand {
    fn name(&self) -> &str {
        "quote"
    }

    fn description(&self) -> &str {
        "Returns a random inspirational quote (30s cooldown per user)"
    }

    fn usage(&self) -> &str {
        "!quote"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> Result<String, Error> {
        let verdict = ctx.cooldowns.check_and_stamp(
            self.name(),
            &ctx.chat.user_id,
            Duration::seconds(QUOTE_COOLDOWN_SECS),
        );

        if let CooldownResult::OnCooldown { remaining_seconds } = verdict {
            return Ok(format!(
                "@{}, please wait {} seconds before using this command again.",
                ctx.chat.username, remaining_seconds
            ));
        }

        let idx = rand::rng().random_range(0..QUOTES.len());
        Ok(format!("\"{}\"", QUOTES[idx]))
    }
}
