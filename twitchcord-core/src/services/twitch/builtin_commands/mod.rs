// File: src/services/twitch/builtin_commands/mod.rs
//! Built-in chat commands. Each lives in its own file; `BuiltinCommandSource` hands the
//! whole set to the registry.

pub mod dice;
pub mod echo;
pub mod hello;
pub mod quote;
pub mod shoutout;
pub mod text_command;
pub mod uptime;

use std::sync::Arc;

use crate::Error;
use crate::services::twitch::command_service::ChatCommand;
use crate::services::twitch::command_source::CommandSource;

pub use dice::DiceCommand;
pub use echo::EchoCommand;
pub use hello::HelloCommand;
pub use quote::QuoteCommand;
pub use shoutout::ShoutoutCommand;
pub use text_command::TextCommand;
pub use uptime::UptimeCommand;

pub struct BuiltinCommandSource;

impl CommandSource for BuiltinCommandSource {
    fn describe(&self) -> String {
        "built-in commands".to_string()
    }

    fn load(&self) -> Result<Vec<Result<Arc<dyn ChatCommand>, Error>>, Error> {
        let all: Vec<Arc<dyn ChatCommand>> = vec![
            Arc::new(HelloCommand),
            Arc::new(DiceCommand),
            Arc::new(EchoCommand),
            Arc::new(QuoteCommand),
            Arc::new(ShoutoutCommand),
            Arc::new(UptimeCommand),
        ];
        Ok(all.into_iter().map(Ok).collect())
    }
}
