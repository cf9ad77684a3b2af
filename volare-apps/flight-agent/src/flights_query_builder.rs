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

//! # Flights Query Builder
//!
//! Side-effect free construction of the flight-offers search query.

use anyhow::{Result, ensure};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fixed pricing currency for every search.
pub const CURRENCY: &str = "EUR";

fn default_adults() -> u32 {
    1
}

fn default_max_results() -> u32 {
    5
}

/// Arguments of the `flight.search_flights` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct SearchRequest {
    /// Origin IATA code (e.g. MAD)
    pub origin: String,
    /// Destination IATA code (e.g. MRS)
    pub destination: String,
    /// Departure date (YYYY-MM-DD)
    pub date: String,
    /// Number of adult passengers
    #[serde(default = "default_adults")]
    #[schemars(range(min = 1))]
    pub adults: u32,
    /// Maximum number of offers to return
    #[serde(default = "default_max_results")]
    #[schemars(range(min = 1))]
    pub max_results: u32,
}

impl SearchRequest {
    pub fn new(origin: &str, destination: &str, date: &str) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            date: date.to_string(),
            adults: default_adults(),
            max_results: default_max_results(),
        }
    }

    pub fn adults(mut self, adults: u32) -> Self {
        self.adults = adults;
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.origin.trim().is_empty(), "origin is required");
        ensure!(
            !self.destination.trim().is_empty(),
            "destination is required"
        );
        ensure!(self.adults >= 1, "at least one adult is required");
        ensure!(self.max_results >= 1, "max_results must be at least 1");
        Ok(())
    }

    /// Query parameters for `GET /v2/shopping/flight-offers`.
    pub fn offers_query(&self, departure_date: &str) -> Vec<(&'static str, String)> {
        vec![
            ("originLocationCode", self.origin.clone()),
            ("destinationLocationCode", self.destination.clone()),
            ("departureDate", departure_date.to_string()),
            ("adults", self.adults.to_string()),
            ("max", self.max_results.to_string()),
            ("currencyCode", CURRENCY.to_string()),
        ]
    }

    pub fn offers_url(&self, endpoint: &str, departure_date: &str) -> String {
        format!(
            "{}?{}",
            endpoint,
            encode_pairs(&self.offers_query(departure_date))
        )
    }
}

/// `application/x-www-form-urlencoded` serialization, also used for query strings.
pub(crate) fn encode_pairs(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
