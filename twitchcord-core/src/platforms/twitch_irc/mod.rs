pub mod client;
pub mod runtime;

pub use client::{IrcConnector, TlsIrcConnector, TwitchIrcClient};
pub use runtime::{IrcChatSink, IrcCredentials, RECONNECT_DELAY, TwitchIrcPlatform, chat_event_from_irc};
