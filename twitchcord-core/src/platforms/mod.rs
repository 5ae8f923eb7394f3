// File: src/platforms/mod.rs

use async_trait::async_trait;

use crate::Error;
use crate::models::RichMessage;

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error(String),
}

#[async_trait]
pub trait PlatformIntegration {
    async fn connect(&mut self) -> Result<(), Error>;
    async fn disconnect(&mut self) -> Result<(), Error>;
    async fn get_connection_status(&self) -> Result<ConnectionStatus, Error>;
}

/// Plain-text chat output (Twitch chat).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send_chat(&self, channel: &str, text: &str) -> Result<(), Error>;
}

/// Embed-style output (Discord channels).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RichMessageSink: Send + Sync {
    async fn send_rich_message(&self, channel_id: &str, message: &RichMessage) -> Result<(), Error>;
}

// Re-export submodules
pub mod twitch_helix;
pub mod twitch_irc;
pub mod discord;
