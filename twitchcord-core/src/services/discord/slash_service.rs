use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use twilight_model::application::command::Command;

use crate::Error;
use crate::models::{SlashInvocation, SlashReply};
use crate::platforms::twitch_helix::HelixApi;
use crate::services::discord::notification_targets::NotificationTargets;
use crate::utils::time::Clock;

pub const GENERIC_FAILURE: &str = "There was an error while executing this command!";

/// Everything slash command handlers may touch.
pub struct SlashContext {
    pub helix: Arc<dyn HelixApi>,
    pub targets: Arc<NotificationTargets>,
    /// Twitch channel login, without `#`.
    pub channel_name: String,
    pub broadcaster_id: String,
    pub clock: Arc<dyn Clock>,
}

#[async_trait]
pub trait SlashCommand: Send + Sync {
    fn name(&self) -> &str;

    /// Registration payload for Discord.
    fn definition(&self) -> Command;

    /// Commands that call out to Twitch acknowledge first and edit the reply afterwards.
    fn defers(&self) -> bool {
        false
    }

    /// Shown to the user when `execute` fails.
    fn failure_message(&self) -> &str {
        GENERIC_FAILURE
    }

    async fn execute(&self, ctx: &SlashContext, invocation: &SlashInvocation) -> Result<SlashReply, Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlashOutcome {
    Ignored,
    Replied { command: String, reply: SlashReply },
    Failed { command: String, error: String, reply: SlashReply },
}

impl SlashOutcome {
    pub fn reply(&self) -> Option<&SlashReply> {
        match self {
            SlashOutcome::Ignored => None,
            SlashOutcome::Replied { reply, .. } | SlashOutcome::Failed { reply, .. } => Some(reply),
        }
    }
}

pub struct SlashCommandService {
    commands: HashMap<String, Arc<dyn SlashCommand>>,
    ctx: SlashContext,
}

impl SlashCommandService {
    pub fn new(ctx: SlashContext, commands: Vec<Arc<dyn SlashCommand>>) -> Self {
        let mut map = HashMap::new();
        for cmd in commands {
            debug!("Loaded Discord command: {}", cmd.name());
            if map.insert(cmd.name().to_string(), cmd).is_some() {
                warn!("Duplicate Discord command name; keeping the last one");
            }
        }
        info!("Loaded {} Discord commands", map.len());
        Self { commands: map, ctx }
    }

    pub fn context(&self) -> &SlashContext {
        &self.ctx
    }

    /// Registration payloads, sorted by name.
    pub fn definitions(&self) -> Vec<Command> {
        let mut defs: Vec<Command> = self.commands.values().map(|c| c.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn defers(&self, name: &str) -> bool {
        self.commands.get(name).is_some_and(|c| c.defers())
    }

    pub async fn dispatch(&self, invocation: &SlashInvocation) -> SlashOutcome {
        let Some(cmd) = self.commands.get(&invocation.name) else {
            debug!("Ignoring unknown slash command '{}'", invocation.name);
            return SlashOutcome::Ignored;
        };

        match cmd.execute(&self.ctx, invocation).await {
            Ok(reply) => {
                info!("Executed /{} for user {}", invocation.name, invocation.user_id);
                SlashOutcome::Replied {
                    command: invocation.name.clone(),
                    reply,
                }
            }
            Err(e) => {
                error!("Error executing Discord command {}: {:?}", invocation.name, e);
                SlashOutcome::Failed {
                    command: invocation.name.clone(),
                    error: e.to_string(),
                    reply: SlashReply::ephemeral(cmd.failure_message()),
                }
            }
        }
    }
}
