pub mod cooldown;
pub mod discord;
pub mod twitch;

pub use cooldown::{CooldownResult, CooldownTracker};
