use serde::{Deserialize, Serialize};

/// Who sent a chat line and with which privileges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    /// Channel the line arrived in, e.g. `#somechannel`.
    pub channel: String,
    /// Stable platform user id. Falls back to the login when the platform gives none.
    pub user_id: String,
    /// Lowercase login name.
    pub username: String,
    pub display_name: String,
    pub is_moderator: bool,
    pub is_broadcaster: bool,
    /// True when the line was sent by the bot account itself.
    pub is_self: bool,
}

impl ChatContext {
    /// Moderators and the broadcaster may run privileged commands.
    pub fn is_privileged(&self) -> bool {
        self.is_moderator || self.is_broadcaster
    }
}

/// One inbound chat line, ready for dispatch.
#[derive(Debug, Clone)]
pub struct ChatMessageEvent {
    pub context: ChatContext,
    pub text: String,
}
