//!  Volare Flight Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Amadeus Authentication
//!
//! OAuth2 client-credentials grant with a cached bearer token.

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use volare_fixed_retry::FixedRetry;

use crate::amadeus_config::AmadeusConfig;
use crate::flights_query_builder::encode_pairs;

/// Tokens are dropped this long before the provider says they expire.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

const DEFAULT_EXPIRES_IN: u64 = 1799;

fn default_expires_in() -> u64 {
    DEFAULT_EXPIRES_IN
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

#[derive(Debug, Default)]
struct TokenCache {
    token: Option<String>,
    expires_at: Option<Instant>,
}

impl TokenCache {
    fn valid_token(&self, now: Instant) -> Option<&str> {
        match (&self.token, self.expires_at) {
            (Some(token), Some(expires_at)) if !token.is_empty() && now < expires_at => {
                Some(token.as_str())
            }
            _ => None,
        }
    }

    fn store(&mut self, token: String, expires_in: u64, now: Instant) {
        self.expires_at = Some(now + Duration::from_secs(expires_in).saturating_sub(EXPIRY_MARGIN));
        self.token = Some(token);
    }
}

/// Obtains and caches bearer tokens.
///
/// The cache lock is held while a token is requested, so concurrent callers
/// share a single refresh.
pub struct AmadeusAuthenticator {
    client: Arc<wreq::Client>,
    config: Arc<AmadeusConfig>,
    retry: FixedRetry,
    cache: Mutex<TokenCache>,
}

impl AmadeusAuthenticator {
    pub fn new(client: Arc<wreq::Client>, config: Arc<AmadeusConfig>) -> Self {
        let retry = FixedRetry::new(config.auth_attempts).with_delay(config.auth_retry_delay);
        Self {
            client,
            config,
            retry,
            cache: Mutex::new(TokenCache::default()),
        }
    }

    /// Return a valid bearer token, requesting a new one when needed.
    ///
    /// `None` when credentials are blank or every attempt failed.
    pub async fn get_token(&self) -> Option<String> {
        let mut cache = self.cache.lock().await;
        if let Some(token) = cache.valid_token(Instant::now()) {
            tracing::debug!("[get_token] Reusing cached token");
            return Some(token.to_string());
        }

        if !self.config.has_credentials() {
            tracing::warn!("[get_token] AMADEUS_API_KEY or AMADEUS_API_SECRET is not set");
            return None;
        }

        let url = self.config.token_url();
        let form = encode_pairs(&[
            ("grant_type", "client_credentials".to_string()),
            ("client_id", self.config.api_key.clone()),
            ("client_secret", self.config.api_secret.clone()),
        ]);
        let timeout = self.config.auth_timeout;

        let start = Instant::now();
        let grant = self
            .retry
            .run(|attempt| {
                let client = Arc::clone(&self.client);
                let url = url.clone();
                let form = form.clone();
                async move {
                    let result = request_token(&client, &url, form, timeout).await;
                    if let Err(e) = &result {
                        tracing::warn!("[get_token] Attempt {} failed: {:#}", attempt, e);
                    }
                    result
                }
            })
            .await;

        match grant {
            Ok(grant) => {
                tracing::info!(
                    "[get_token] Token issued in {:?} (expires in {}s)",
                    start.elapsed(),
                    grant.expires_in
                );
                cache.store(grant.access_token.clone(), grant.expires_in, Instant::now());
                Some(grant.access_token)
            }
            Err(e) => {
                tracing::warn!("[get_token] {}", e);
                None
            }
        }
    }
}

async fn request_token(
    client: &wreq::Client,
    url: &str,
    form: String,
    timeout: Duration,
) -> Result<TokenGrant> {
    let send = client
        .post(url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(form)
        .send();
    let response = tokio::time::timeout(timeout, send)
        .await
        .map_err(|_| anyhow!("Token request timed out after {:?}", timeout))?
        .context("Token request failed")?;

    let status = response.status();
    let body = response.text().await.context("Read body")?;
    if status.as_u16() != 200 {
        let body_preview = body.chars().take(500).collect::<String>();
        bail!("HTTP error {}: {}", status, body_preview);
    }

    let grant: TokenGrant = serde_json::from_str(&body).context("Invalid token response")?;
    if grant.access_token.is_empty() {
        bail!("Token response carries an empty access_token");
    }
    Ok(grant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_has_no_token() {
        assert!(TokenCache::default().valid_token(Instant::now()).is_none());
    }

    #[test]
    fn test_token_valid_until_margin() {
        let now = Instant::now();
        let mut cache = TokenCache::default();
        cache.store("abc".into(), 1799, now);

        assert_eq!(cache.valid_token(now), Some("abc"));
        assert_eq!(cache.valid_token(now + Duration::from_secs(1768)), Some("abc"));
        assert!(cache.valid_token(now + Duration::from_secs(1769)).is_none());
    }

    #[test]
    fn test_short_lived_token_is_never_valid() {
        let now = Instant::now();
        let mut cache = TokenCache::default();
        cache.store("abc".into(), 10, now);
        assert!(cache.valid_token(now).is_none());
    }

    #[test]
    fn test_grant_defaults_expires_in() {
        let grant: TokenGrant = serde_json::from_str(r#"{"access_token": "t"}"#).unwrap();
        assert_eq!(grant.expires_in, 1799);
        assert!(serde_json::from_str::<TokenGrant>(r#"{"expires_in": 10}"#).is_err());
    }
}
