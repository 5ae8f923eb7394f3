// File: src/platforms/twitch_helix/auth.rs
//
// App access tokens via the client-credentials grant. Tokens are cached and treated as
// expired a safety margin before Twitch says they are, so a request never goes out with a
// token that lapses mid-flight.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client as ReqwestClient;
use tokio::sync::Mutex;
use tracing::{debug, info};
use twitch_oauth2::{AppAccessToken, ClientId, ClientSecret, TwitchToken};

use crate::Error;
use crate::utils::time::Clock;

pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 100;

#[derive(Debug, Default, Clone)]
pub struct TokenCache {
    token: Option<String>,
    valid_until: Option<DateTime<Utc>>,
}

impl TokenCache {
    /// Returns the cached token if it is still inside its (margin-reduced) lifetime.
    pub fn valid_token(&self, now: DateTime<Utc>) -> Option<&str> {
        match (&self.token, self.valid_until) {
            (Some(tok), Some(until)) if now < until => Some(tok.as_str()),
            _ => None,
        }
    }

    pub fn store(&mut self, token: String, expires_in: Duration, now: DateTime<Utc>) {
        self.valid_until = Some(now + expires_in - Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS));
        self.token = Some(token);
    }

    pub fn invalidate(&mut self) {
        self.token = None;
        self.valid_until = None;
    }
}

pub struct AppTokenProvider {
    http: ReqwestClient,
    client_id: String,
    client_secret: String,
    clock: Arc<dyn Clock>,
    cache: Mutex<TokenCache>,
}

impl AppTokenProvider {
    pub fn new(http: ReqwestClient, client_id: &str, client_secret: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            clock,
            cache: Mutex::new(TokenCache::default()),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns a usable app token, fetching a new one when the cached one is (nearly) expired.
    /// The cache lock is held across the fetch so concurrent callers share one request.
    pub async fn token(&self) -> Result<String, Error> {
        let mut cache = self.cache.lock().await;
        if let Some(tok) = cache.valid_token(self.clock.now()) {
            return Ok(tok.to_string());
        }

        debug!("Requesting new Twitch app access token");
        let token = AppAccessToken::get_app_access_token(
            &self.http,
            ClientId::new(self.client_id.clone()),
            ClientSecret::new(self.client_secret.clone()),
            vec![],
        )
        .await
        .map_err(|e| Error::Auth(format!("Failed to get Twitch access token: {e}")))?;

        let expires_in = Duration::from_std(token.expires_in())
            .map_err(|e| Error::Auth(format!("Invalid token lifetime: {e}")))?;
        let secret = token.access_token.secret().to_string();
        cache.store(secret.clone(), expires_in, self.clock.now());
        info!("Obtained Twitch app access token (expires in {}s)", expires_in.num_seconds());
        Ok(secret)
    }

    /// Forget the cached token, e.g. after Helix answered 401.
    pub async fn invalidate(&self) {
        self.cache.lock().await.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_has_no_token() {
        let cache = TokenCache::default();
        assert!(cache.valid_token(Utc::now()).is_none());
    }

    #[test]
    fn token_expires_margin_before_reported_expiry() {
        let now = Utc::now();
        let mut cache = TokenCache::default();
        cache.store("abc".into(), Duration::seconds(3600), now);

        assert_eq!(cache.valid_token(now), Some("abc"));
        assert_eq!(cache.valid_token(now + Duration::seconds(3499)), Some("abc"));
        assert!(cache.valid_token(now + Duration::seconds(3500)).is_none());
    }

    #[test]
    fn invalidate_clears_token() {
        let now = Utc::now();
        let mut cache = TokenCache::default();
        cache.store("abc".into(), Duration::seconds(3600), now);
        cache.invalidate();
        assert!(cache.valid_token(now).is_none());
    }
}
