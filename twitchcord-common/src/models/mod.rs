pub mod chat;
pub mod embed;
pub mod slash;
pub mod twitch;

pub use chat::{ChatContext, ChatMessageEvent};
pub use embed::{RichField, RichMessage};
pub use slash::{SlashInvocation, SlashOptionValue, SlashReply};
pub use twitch::{ClipInfo, StreamInfo, UserProfile};
