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

//! # Amadeus Flight Offers Client
//!
//! Effectful (time, network) operations for flight offers search.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::amadeus_auth::AmadeusAuthenticator;
use crate::amadeus_config::AmadeusConfig;
use crate::departure_date::normalize_date;
use crate::flights_query_builder::SearchRequest;
use crate::flights_results_parser::{FlightSummary, parse_flight_offers};

/// Failures of a search. `Display` is the message placed in [`SearchResult::error`].
#[derive(Debug, Error)]
pub enum FlightSearchError {
    #[error("token unavailable")]
    TokenUnavailable,
    #[error("API error {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[source] wreq::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("invalid price: {0}")]
    InvalidPrice(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Outcome of a search as returned to tool callers.
///
/// `error` is only present on failure, in which case `flights` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub flights: Vec<FlightSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResult {
    pub fn success(flights: Vec<FlightSummary>) -> Self {
        Self {
            flights,
            error: None,
        }
    }

    pub fn failure(error: impl fmt::Display) -> Self {
        Self {
            flights: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl From<Result<Vec<FlightSummary>, FlightSearchError>> for SearchResult {
    fn from(result: Result<Vec<FlightSummary>, FlightSearchError>) -> Self {
        match result {
            Ok(flights) => Self::success(flights),
            Err(e) => Self::failure(e),
        }
    }
}

#[derive(Clone)]
pub struct AmadeusFlightsClient {
    client: Arc<wreq::Client>,
    config: Arc<AmadeusConfig>,
    auth: Arc<AmadeusAuthenticator>,
}

impl AmadeusFlightsClient {
    pub fn new(config: AmadeusConfig) -> Result<Self> {
        let client = wreq::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let client = Arc::new(client);
        let config = Arc::new(config);
        let auth = Arc::new(AmadeusAuthenticator::new(
            Arc::clone(&client),
            Arc::clone(&config),
        ));
        Ok(Self {
            client,
            config,
            auth,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(AmadeusConfig::from_env())
    }

    pub fn config(&self) -> &AmadeusConfig {
        &self.config
    }

    pub fn authenticator(&self) -> &AmadeusAuthenticator {
        &self.auth
    }
}

impl AmadeusFlightsClient {
    /// GET `url` with the bearer token; the body is returned only on HTTP 200.
    pub async fn fetch_raw(&self, url: &str, token: &str) -> Result<String, FlightSearchError> {
        let timeout = self.config.search_timeout;
        let http_start = Instant::now();
        tracing::trace!("[fetch_raw] Starting HTTP request to: {}", url);
        let send = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send();
        let response = tokio::time::timeout(timeout, send)
            .await
            .map_err(|_| FlightSearchError::Timeout(timeout))?
            .map_err(FlightSearchError::Transport)?;

        let status = response.status();
        tracing::debug!(
            "[fetch_raw] HTTP Status: {} in {:?}",
            status.as_u16(),
            http_start.elapsed()
        );

        let body = response.text().await.map_err(FlightSearchError::Transport)?;
        tracing::debug!("[fetch_raw] Response body: {} KB", body.len() / 1024);

        if status.as_u16() != 200 {
            tracing::warn!("[fetch_raw] API error {}: {}", status.as_u16(), body);
            return Err(FlightSearchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    pub async fn search_flights(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<FlightSummary>, FlightSearchError> {
        let overall_start = Instant::now();
        request
            .validate()
            .map_err(|e| FlightSearchError::InvalidArguments(e.to_string()))?;

        let token = self
            .auth
            .get_token()
            .await
            .ok_or(FlightSearchError::TokenUnavailable)?;

        let departure_date = normalize_date(&request.date);
        if departure_date != request.date {
            tracing::info!(
                "Departure date '{}' adjusted to {}",
                request.date,
                departure_date
            );
        }

        let url = request.offers_url(&self.config.flight_offers_url(), &departure_date);
        tracing::debug!("Search URL: {}", url);

        let body = self.fetch_raw(&url, &token).await?;
        let flights = parse_flight_offers(&body)?;

        tracing::info!(
            "Found {} flights from {} to {} for {} adult(s) in {:?}",
            flights.len(),
            request.origin,
            request.destination,
            request.adults,
            overall_start.elapsed()
        );
        Ok(flights)
    }

    /// [`AmadeusFlightsClient::search_flights`] flattened into a [`SearchResult`].
    pub async fn search(&self, request: &SearchRequest) -> SearchResult {
        let result = self.search_flights(request).await;
        if let Err(e) = &result {
            tracing::warn!("Flight search failed: {}", e);
        }
        result.into()
    }
}
