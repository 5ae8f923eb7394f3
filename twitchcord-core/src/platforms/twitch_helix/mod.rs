// File: src/platforms/twitch_helix/mod.rs

pub mod auth;
pub mod client;
pub mod requests;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Error;
use crate::models::{ClipInfo, StreamInfo, UserProfile};

pub use auth::{AppTokenProvider, TokenCache};
pub use client::TwitchHelixClient;

/// The handful of Helix endpoints the bot relies on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HelixApi: Send + Sync {
    /// `None` when the user is not live.
    async fn get_stream(&self, user_id: &str) -> Result<Option<StreamInfo>, Error>;

    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserProfile>, Error>;

    async fn get_user_by_login(&self, login: &str) -> Result<Option<UserProfile>, Error>;

    /// Clips in the order Helix returns them. `started_at` filters to clips created at or after it.
    async fn get_clips(
        &self,
        broadcaster_id: &str,
        started_at: Option<DateTime<Utc>>,
        first: Option<u8>,
    ) -> Result<Vec<ClipInfo>, Error>;
}

/// Uses the configured broadcaster id, or looks the channel up by login.
pub async fn resolve_broadcaster_id(
    helix: &dyn HelixApi,
    configured: Option<&str>,
    channel_login: &str,
) -> Result<String, Error> {
    if let Some(id) = configured {
        return Ok(id.to_string());
    }
    let user = helix
        .get_user_by_login(channel_login)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Could not find the Twitch channel '{channel_login}'")))?;
    tracing::info!("Resolved broadcaster id for {} => {}", channel_login, user.id);
    Ok(user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_user;

    #[tokio::test]
    async fn configured_id_skips_lookup() {
        let mut helix = MockHelixApi::new();
        helix.expect_get_user_by_login().times(0);
        let id = resolve_broadcaster_id(&helix, Some("999"), "streamer").await.unwrap();
        assert_eq!(id, "999");
    }

    #[tokio::test]
    async fn looks_up_login_when_unset() {
        let mut helix = MockHelixApi::new();
        helix
            .expect_get_user_by_login()
            .withf(|login| login == "streamer")
            .times(1)
            .returning(|_| Ok(Some(sample_user())));
        assert_eq!(resolve_broadcaster_id(&helix, None, "streamer").await.unwrap(), "1001");
    }

    #[tokio::test]
    async fn unknown_channel_is_not_found() {
        let mut helix = MockHelixApi::new();
        helix.expect_get_user_by_login().returning(|_| Ok(None));
        assert!(matches!(
            resolve_broadcaster_id(&helix, None, "ghost").await,
            Err(Error::NotFound(_))
        ));
    }
}
