use chrono::{DateTime, Utc};

/// Twitch purple, used for every embed the bot posts.
pub const TWITCH_PURPLE: u32 = 0x6441A4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Platform-neutral rich message, rendered as a Discord embed by the Discord runtime.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichMessage {
    /// Plain text sent alongside the embed (e.g. an `@everyone` ping).
    pub content: Option<String>,
    pub title: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub color: Option<u32>,
    pub fields: Vec<RichField>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub footer: Option<String>,
}

impl RichMessage {
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(RichField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}
