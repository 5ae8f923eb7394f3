// File: src/platforms/twitch_helix/client.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::Error;
use crate::models::{ClipInfo, StreamInfo, UserProfile};
use crate::platforms::twitch_helix::auth::AppTokenProvider;
use crate::platforms::twitch_helix::requests::{self, HelixResponse};
use crate::platforms::twitch_helix::HelixApi;
use crate::utils::time::Clock;

const HELIX_BASE: &str = "https://api.twitch.tv/helix";

/// Entry point for all Helix calls. Authenticates with an app access token.
pub struct TwitchHelixClient {
    http: ReqwestClient,
    tokens: AppTokenProvider,
    base_url: String,
}

impl TwitchHelixClient {
    pub fn new(client_id: &str, client_secret: &str, clock: Arc<dyn Clock>) -> Self {
        let http = ReqwestClient::new();
        Self {
            tokens: AppTokenProvider::new(http.clone(), client_id, client_secret, clock),
            http,
            base_url: HELIX_BASE.to_string(),
        }
    }

    /// GET `{base}/{path}` and decode the standard `{ "data": [...] }` envelope.
    pub async fn get_helix<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<HelixResponse<T>, Error> {
        let token = self.tokens.token().await?;
        let url = format!("{}/{}", self.base_url, path);

        let resp = self
            .http
            .get(&url)
            .query(query)
            .header("Client-Id", self.tokens.client_id())
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| Error::Platform(format!("{path} network error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                warn!("Helix rejected app token for {path}; dropping cached token");
                self.tokens.invalidate().await;
            }
            let body_text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!("{path}: HTTP {status} => {body_text}")));
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Platform(format!("{path} parse error: {e}")))
    }
}

#[async_trait]
impl HelixApi for TwitchHelixClient {
    async fn get_stream(&self, user_id: &str) -> Result<Option<StreamInfo>, Error> {
        requests::stream::fetch_stream(self, user_id).await
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserProfile>, Error> {
        requests::users::fetch_user(self, requests::users::UserLookup::Id(user_id)).await
    }

    async fn get_user_by_login(&self, login: &str) -> Result<Option<UserProfile>, Error> {
        requests::users::fetch_user(self, requests::users::UserLookup::Login(login)).await
    }

    async fn get_clips(
        &self,
        broadcaster_id: &str,
        started_at: Option<DateTime<Utc>>,
        first: Option<u8>,
    ) -> Result<Vec<ClipInfo>, Error> {
        requests::clips::fetch_clips(self, broadcaster_id, started_at, first).await
    }
}
