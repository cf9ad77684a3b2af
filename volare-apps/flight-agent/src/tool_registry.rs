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

//! # Tool Registry
//!
//! Advertises the `flight.search_flights` tool and dispatches calls to it.
//! Every outcome is data: callers never see a raised error.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::flights_query_builder::SearchRequest;
use crate::flights_search::{AmadeusFlightsClient, FlightSearchError, SearchResult};

pub const SEARCH_FLIGHTS_TOOL: &str = "flight.search_flights";

const SEARCH_FLIGHTS_DESCRIPTION: &str = "Search flight offers for a number of adult passengers. \
     Parameters: origin (IATA), destination (IATA), date (YYYY-MM-DD, past dates move to tomorrow), \
     adults (1+, default 1), max_results (default 5). Prices are in EUR.";

static SEARCH_FLIGHTS_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::to_value(schemars::schema_for!(SearchRequest)).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize {} schema: {}", SEARCH_FLIGHTS_TOOL, e);
        Value::Object(Map::new())
    })
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDescriptor {
    /// The parameter schema as a JSON object, as MCP `inputSchema` expects.
    pub fn input_schema(&self) -> Map<String, Value> {
        self.parameters.as_object().cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Search(SearchResult),
    Failure { error: String },
}

impl ToolOutput {
    pub fn error(&self) -> Option<&str> {
        match self {
            ToolOutput::Search(result) => result.error.as_deref(),
            ToolOutput::Failure { error } => Some(error),
        }
    }

    pub fn into_search_result(self) -> Option<SearchResult> {
        match self {
            ToolOutput::Search(result) => Some(result),
            ToolOutput::Failure { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct ToolRegistry {
    flights: Arc<AmadeusFlightsClient>,
}

impl ToolRegistry {
    pub fn new(flights: Arc<AmadeusFlightsClient>) -> Self {
        Self { flights }
    }

    pub fn list(&self) -> Vec<ToolDescriptor> {
        vec![ToolDescriptor {
            name: SEARCH_FLIGHTS_TOOL.to_string(),
            description: SEARCH_FLIGHTS_DESCRIPTION.to_string(),
            parameters: SEARCH_FLIGHTS_SCHEMA.clone(),
        }]
    }

    pub async fn call(&self, name: &str, raw_args: Value) -> ToolOutput {
        tracing::debug!("call_tool: {} {}", name, raw_args);
        if name != SEARCH_FLIGHTS_TOOL {
            tracing::warn!("Unknown tool requested: {}", name);
            return ToolOutput::Failure {
                error: format!("unknown tool: {}", name),
            };
        }

        let request = match parse_arguments(raw_args) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Rejected {} call: {}", name, e);
                return ToolOutput::Search(SearchResult::failure(e));
            }
        };

        ToolOutput::Search(self.flights.search(&request).await)
    }
}

pub fn parse_arguments(raw_args: Value) -> Result<SearchRequest, FlightSearchError> {
    let raw_args = match raw_args {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    let request: SearchRequest = serde_json::from_value(raw_args)
        .map_err(|e| FlightSearchError::InvalidArguments(e.to_string()))?;
    request
        .validate()
        .map_err(|e| FlightSearchError::InvalidArguments(e.to_string()))?;
    Ok(request)
}
