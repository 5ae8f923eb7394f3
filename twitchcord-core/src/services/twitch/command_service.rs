use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::Error;
use crate::models::ChatContext;
use crate::platforms::ChatSink;
use crate::services::cooldown::CooldownTracker;
use crate::services::twitch::command_source::CommandSource;
use crate::services::twitch::registry::CommandRegistry;
use crate::utils::time::Clock;

pub const DEFAULT_PREFIX: &str = "!";

/// Context passed to command handlers.
pub struct CommandContext<'a> {
    pub chat: &'a ChatContext,
    pub cooldowns: &'a CooldownTracker,
    pub clock: &'a dyn Clock,
    /// When the bot process started, for `!uptime`.
    pub started_at: DateTime<Utc>,
}

/// A named, user-invocable chat action.
#[async_trait]
pub trait ChatCommand: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn usage(&self) -> &str;

    /// Returns the line to post back into chat.
    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<String, Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    SelfMessage,
    NoPrefix,
    UnknownCommand(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Ignored(IgnoreReason),
    Executed { command: String, reply: String },
    Failed { command: String, error: String },
}

/// Parses chat lines, resolves `!command`s against the registry and runs them.
pub struct CommandService {
    registry: RwLock<Arc<CommandRegistry>>,
    cooldowns: Arc<CooldownTracker>,
    clock: Arc<dyn Clock>,
    started_at: DateTime<Utc>,
    prefix: String,
    sink: Arc<dyn ChatSink>,
}

impl CommandService {
    pub fn new(
        registry: CommandRegistry,
        cooldowns: Arc<CooldownTracker>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn ChatSink>,
    ) -> Self {
        debug!("Initializing CommandService with {} commands", registry.len());
        let started_at = clock.now();
        Self {
            registry: RwLock::new(Arc::new(registry)),
            cooldowns,
            clock,
            started_at,
            prefix: DEFAULT_PREFIX.to_string(),
            sink,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Snapshot of the current registry. Dispatch keeps using its snapshot even if a
    /// reload swaps in a new one meanwhile.
    pub fn registry(&self) -> Arc<CommandRegistry> {
        self.registry.read().clone()
    }

    /// Rebuilds the registry from `sources` and swaps it in. On failure the previous
    /// registry stays active.
    pub fn reload(&self, sources: &[&dyn CommandSource]) -> Result<usize, Error> {
        let fresh = CommandRegistry::load(sources)?;
        let count = fresh.len();
        *self.registry.write() = Arc::new(fresh);
        info!("Command registry reloaded => {} commands", count);
        Ok(count)
    }

    /// Handles one inbound chat line.
    pub async fn dispatch(&self, ctx: &ChatContext, raw_message: &str) -> DispatchOutcome {
        if ctx.is_self {
            return DispatchOutcome::Ignored(IgnoreReason::SelfMessage);
        }

        let trimmed = raw_message.trim();
        let Some(rest) = trimmed.strip_prefix(self.prefix.as_str()) else {
            return DispatchOutcome::Ignored(IgnoreReason::NoPrefix);
        };

        // The name must follow the prefix directly; "! hello" names the empty command.
        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let command_name = rest[..name_end].to_lowercase();
        let args: Vec<String> = rest[name_end..].split_whitespace().map(str::to_string).collect();

        let Some(cmd) = self.registry().get(&command_name) else {
            debug!("No command found matching '{}'", command_name);
            return DispatchOutcome::Ignored(IgnoreReason::UnknownCommand(command_name));
        };

        let cmd_ctx = CommandContext {
            chat: ctx,
            cooldowns: &self.cooldowns,
            clock: self.clock.as_ref(),
            started_at: self.started_at,
        };

        match cmd.execute(&cmd_ctx, &args).await {
            Ok(reply) => {
                info!("* Executed {} for {}: {}", command_name, ctx.username, reply);
                if let Err(e) = self.sink.send_chat(&ctx.channel, &reply).await {
                    warn!("Failed to send reply for {} => {:?}", command_name, e);
                }
                DispatchOutcome::Executed {
                    command: command_name,
                    reply,
                }
            }
            Err(e) => {
                error!("* Error executing command {}: {:?}", command_name, e);
                let apology = format!("@{}, there was an error executing that command.", ctx.username);
                if let Err(send_err) = self.sink.send_chat(&ctx.channel, &apology).await {
                    warn!("Failed to send error notice for {} => {:?}", command_name, send_err);
                }
                DispatchOutcome::Failed {
                    command: command_name,
                    error: e.to_string(),
                }
            }
        }
    }
}
