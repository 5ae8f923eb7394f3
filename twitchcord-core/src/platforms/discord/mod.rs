pub mod embed;
pub mod interaction;
pub mod runtime;

pub use embed::to_discord_embed;
pub use interaction::invocation_from_interaction;
pub use runtime::{DiscordPlatform, DiscordRichSink};
