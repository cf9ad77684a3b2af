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

//! # Amadeus Configuration
//!
//! Provider endpoint, credentials and timeouts, read from the environment.

use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

pub const ENV_BASE_URL: &str = "AMADEUS_BASE_URL";
pub const ENV_API_KEY: &str = "AMADEUS_API_KEY";
pub const ENV_API_SECRET: &str = "AMADEUS_API_SECRET";

#[derive(Clone)]
pub struct AmadeusConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub auth_timeout: Duration,
    pub search_timeout: Duration,
    pub connect_timeout: Duration,
    /// Token requests attempted before giving up
    pub auth_attempts: u32,
    /// Pause between two token requests
    pub auth_retry_delay: Duration,
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            auth_timeout: Duration::from_secs(10),
            search_timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(10),
            auth_attempts: 2,
            auth_retry_delay: Duration::ZERO,
        }
    }
}

impl AmadeusConfig {
    pub fn new(base_url: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            api_secret: api_secret.trim().to_string(),
            ..Default::default()
        }
    }

    /// Read `AMADEUS_BASE_URL`, `AMADEUS_API_KEY` and `AMADEUS_API_SECRET`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AmadeusConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = lookup(ENV_API_KEY).unwrap_or_default();
        let api_secret = lookup(ENV_API_SECRET).unwrap_or_default();
        Self::new(&base_url, &api_key, &api_secret)
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.trim().is_empty()
    }

    pub fn token_url(&self) -> String {
        format!("{}/v1/security/oauth2/token", self.base_url)
    }

    pub fn flight_offers_url(&self) -> String {
        format!("{}/v2/shopping/flight-offers", self.base_url)
    }
}

impl fmt::Debug for AmadeusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.api_secret.is_empty() { "" } else { "***" };
        f.debug_struct("AmadeusConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &secret)
            .field("auth_timeout", &self.auth_timeout)
            .field("search_timeout", &self.search_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("auth_attempts", &self.auth_attempts)
            .field("auth_retry_delay", &self.auth_retry_delay)
            .finish()
    }
}
