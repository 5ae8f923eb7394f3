pub mod embeds;
pub mod notification_targets;
pub mod slash_service;
pub mod slashcommands;

pub use notification_targets::{NotificationTargets, TargetKind};
pub use slash_service::{SlashCommand, SlashCommandService, SlashContext, SlashOutcome};
