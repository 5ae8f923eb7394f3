use async_trait::async_trait;
use rand::Rng;

use crate::Error;
use crate::services::twitch::command_service::{ChatCommand, CommandContext};

const SIDES: u32 = 6;

pub struct DiceCommand;

#[async_trait]
impl ChatCommand for DiceCommand {
    fn name(&self) -> &str {
        "dice"
    }

    fn description(&self) -> &str {
        "Rolls a virtual dice (1-6)"
    }

    fn usage(&self) -> &str {
        "!dice"
    }

    async fn execute(&self, _ctx: &CommandContext<'_>, _args: &[String]) -> Result<String, Error> {
        let num = rand::rng().random_range(1..=SIDES);
        Ok(format!("You rolled a {num}"))
    }
}
