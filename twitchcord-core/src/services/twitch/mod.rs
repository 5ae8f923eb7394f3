pub mod builtin_commands;
pub mod command_service;
pub mod command_source;
pub mod registry;

pub use command_service::{ChatCommand, CommandContext, CommandService, DispatchOutcome, IgnoreReason};
pub use command_source::{CommandSource, FileCommandSource};
pub use registry::CommandRegistry;
