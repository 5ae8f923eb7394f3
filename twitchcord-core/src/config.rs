// File: twitchcord-core/src/config.rs
//! Bot settings read from the environment (optionally seeded from a `.env` file).

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::Error;
use crate::services::twitch::command_service::DEFAULT_PREFIX;

pub const DEFAULT_STREAM_POLL_SECS: u64 = 60;
pub const DEFAULT_CLIP_POLL_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct TwitchChatConfig {
    pub bot_username: String,
    /// Always carries the `oauth:` prefix.
    pub oauth_token: String,
    pub channel: String,
    pub command_prefix: String,
    pub commands_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscordConfig {
    pub token: String,
    pub guild_id: Option<String>,
    pub live_channel_id: Option<String>,
    pub clips_channel_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HelixConfig {
    pub client_id: String,
    pub client_secret: String,
    pub broadcaster_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub twitch: TwitchChatConfig,
    /// `None` disables the Discord side and both pollers.
    pub discord: Option<DiscordConfig>,
    pub helix: Option<HelixConfig>,
    pub stream_poll_interval: Duration,
    pub clip_poll_interval: Duration,
}

impl BotConfig {
    /// Loads `env_file` (or `./.env` when `None`) into the process environment, then reads it.
    /// A missing default `.env` is fine; a missing explicit file is not.
    pub fn load(env_file: Option<&Path>) -> Result<Self, Error> {
        match env_file {
            Some(path) => {
                dotenv::from_path(path)
                    .map_err(|e| Error::Config(format!("cannot load {}: {e}", path.display())))?;
            }
            None => {
                if let Err(e) = dotenv::dotenv() {
                    debug!("No .env loaded => {e}");
                }
            }
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| get(key).ok_or_else(|| Error::Config(format!("{key} is not set")));
        let seconds = |key: &str, default: u64| -> Result<Duration, Error> {
            match get(key) {
                None => Ok(Duration::from_secs(default)),
                Some(raw) => match raw.parse::<u64>() {
                    Ok(0) => Err(Error::Config(format!("{key} must be greater than zero"))),
                    Ok(n) => Ok(Duration::from_secs(n)),
                    Err(_) => Err(Error::Config(format!("{key} is not a number: {raw}"))),
                },
            }
        };

        let token = require("OAUTH_TOKEN")?;
        let oauth_token = if token.starts_with("oauth:") {
            token
        } else {
            format!("oauth:{token}")
        };

        let twitch = TwitchChatConfig {
            bot_username: require("BOT_USERNAME")?.to_lowercase(),
            oauth_token,
            channel: require("CHANNEL")?.trim_start_matches('#').to_lowercase(),
            command_prefix: get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            commands_file: get("COMMANDS_FILE").map(PathBuf::from),
        };

        let discord = get("DISCORD_TOKEN").map(|token| DiscordConfig {
            token,
            guild_id: get("DISCORD_GUILD_ID"),
            live_channel_id: get("DISCORD_LIVE_CHANNEL_ID"),
            clips_channel_id: get("DISCORD_CLIPS_CHANNEL_ID"),
        });

        let helix = match (get("TWITCH_CLIENT_ID"), get("TWITCH_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(HelixConfig {
                client_id,
                client_secret,
                broadcaster_id: get("TWITCH_BROADCASTER_ID"),
            }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "TWITCH_CLIENT_ID and TWITCH_CLIENT_SECRET must be set together".into(),
                ));
            }
        };

        if discord.is_some() && helix.is_none() {
            return Err(Error::Config(
                "DISCORD_TOKEN is set but TWITCH_CLIENT_ID / TWITCH_CLIENT_SECRET are missing".into(),
            ));
        }
        if let Some(d) = &discord {
            if d.live_channel_id.is_none() {
                warn!("DISCORD_LIVE_CHANNEL_ID not set; live announcements wait for /setup live");
            }
            if d.clips_channel_id.is_none() {
                warn!("DISCORD_CLIPS_CHANNEL_ID not set; clip posts wait for /setup clips");
            }
        }

        Ok(Self {
            twitch,
            discord,
            helix,
            stream_poll_interval: seconds("STREAM_POLL_SECONDS", DEFAULT_STREAM_POLL_SECS)?,
            clip_poll_interval: seconds("CLIP_POLL_SECONDS", DEFAULT_CLIP_POLL_SECS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    const CHAT: [(&str, &str); 3] = [("BOT_USERNAME", "MyBot"), ("OAUTH_TOKEN", "abc123"), ("CHANNEL", "#SomeChannel")];

    #[test]
    fn chat_only_defaults() {
        let cfg = BotConfig::from_lookup(lookup(&CHAT)).unwrap();
        assert_eq!(cfg.twitch.bot_username, "mybot");
        assert_eq!(cfg.twitch.oauth_token, "oauth:abc123");
        assert_eq!(cfg.twitch.channel, "somechannel");
        assert_eq!(cfg.twitch.command_prefix, "!");
        assert!(cfg.discord.is_none());
        assert!(cfg.helix.is_none());
        assert_eq!(cfg.stream_poll_interval, Duration::from_secs(60));
        assert_eq!(cfg.clip_poll_interval, Duration::from_secs(120));
    }

    #[test]
    fn missing_required_key() {
        let err = BotConfig::from_lookup(lookup(&CHAT[..2])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("CHANNEL")));
    }

    #[test]
    fn discord_requires_helix_credentials() {
        let mut pairs = CHAT.to_vec();
        pairs.push(("DISCORD_TOKEN", "d"));
        assert!(BotConfig::from_lookup(lookup(&pairs)).is_err());

        pairs.push(("TWITCH_CLIENT_ID", "id"));
        pairs.push(("TWITCH_CLIENT_SECRET", "secret"));
        pairs.push(("DISCORD_LIVE_CHANNEL_ID", "123"));
        pairs.push(("CLIP_POLL_SECONDS", "30"));
        let cfg = BotConfig::from_lookup(lookup(&pairs)).unwrap();
        let discord = cfg.discord.unwrap();
        assert_eq!(discord.live_channel_id.as_deref(), Some("123"));
        assert!(discord.clips_channel_id.is_none());
        assert_eq!(cfg.clip_poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn bad_interval() {
        let mut pairs = CHAT.to_vec();
        pairs.push(("STREAM_POLL_SECONDS", "soon"));
        assert!(matches!(BotConfig::from_lookup(lookup(&pairs)), Err(Error::Config(_))));
    }
}
