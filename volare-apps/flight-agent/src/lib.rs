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

// Library for volare-flight-agent
// Amadeus flight offers search, exposed as a single tool

mod amadeus_auth;
mod amadeus_config;
mod departure_date;
mod flights_query_builder;
mod flights_results_parser;
mod flights_search;
mod tool_registry;

pub use amadeus_auth::AmadeusAuthenticator;
pub use amadeus_config::{AmadeusConfig, DEFAULT_BASE_URL};
pub use departure_date::{normalize_date, normalize_date_from};
pub use flights_query_builder::SearchRequest;
pub use flights_results_parser::{FlightSummary, format_duration, parse_flight_offers};
pub use flights_search::{AmadeusFlightsClient, FlightSearchError, SearchResult};
pub use tool_registry::{SEARCH_FLIGHTS_TOOL, ToolDescriptor, ToolOutput, ToolRegistry};
