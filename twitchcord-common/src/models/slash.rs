use std::collections::HashMap;

use crate::models::embed::RichMessage;

#[derive(Debug, Clone, PartialEq)]
pub enum SlashOptionValue {
    Integer(i64),
    String(String),
    Boolean(bool),
    /// Channel id as a decimal string.
    Channel(String),
}

/// A slash command invocation, stripped of transport details.
#[derive(Debug, Clone, Default)]
pub struct SlashInvocation {
    pub name: String,
    pub subcommand: Option<String>,
    pub options: HashMap<String, SlashOptionValue>,
    pub user_id: String,
    pub is_admin: bool,
}

impl SlashInvocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.options.get(key) {
            Some(SlashOptionValue::Integer(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn channel(&self, key: &str) -> Option<&str> {
        match self.options.get(key) {
            Some(SlashOptionValue::Channel(v)) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// What a slash command answers with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlashReply {
    pub content: Option<String>,
    pub embeds: Vec<RichMessage>,
    pub ephemeral: bool,
}

impl SlashReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ephemeral: true,
            ..Default::default()
        }
    }
}
