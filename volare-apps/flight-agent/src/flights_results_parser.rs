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

//! # Flights Results Parser
//!
//! Side-effect free decoding of the flight-offers JSON response.
//! Each offer is summarized by the first segment of its first itinerary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::flights_query_builder::CURRENCY;
use crate::flights_search::FlightSearchError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FlightSummary {
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub stops: u32,
    pub price: f64,
    pub currency: String,
}

#[derive(Debug, Default, Deserialize)]
struct FlightOffersResponse {
    #[serde(default)]
    data: Vec<FlightOffer>,
    #[serde(default)]
    dictionaries: Option<Dictionaries>,
}

#[derive(Debug, Default, Deserialize)]
struct Dictionaries {
    #[serde(default)]
    carriers: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct FlightOffer {
    #[serde(default)]
    itineraries: Vec<Itinerary>,
    #[serde(default)]
    price: Option<OfferPrice>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct Itinerary {
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Segment {
    #[serde(default)]
    carrier_code: Option<String>,
    #[serde(default)]
    number: Option<String>,
    #[serde(default)]
    departure: Option<Endpoint>,
    #[serde(default)]
    arrival: Option<Endpoint>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Endpoint {
    #[serde(default)]
    iata_code: Option<String>,
    #[serde(default)]
    at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OfferPrice {
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    total: Option<Value>,
}

/// Decode a flight-offers response body into summaries, preserving offer order.
pub fn parse_flight_offers(body: &str) -> Result<Vec<FlightSummary>, FlightSearchError> {
    let response: FlightOffersResponse =
        serde_json::from_str(body).map_err(FlightSearchError::Decode)?;
    let carriers = response
        .dictionaries
        .map(|d| d.carriers)
        .unwrap_or_default();

    response
        .data
        .iter()
        .map(|offer| summarize_offer(offer, &carriers))
        .collect()
}

fn summarize_offer(
    offer: &FlightOffer,
    carriers: &HashMap<String, String>,
) -> Result<FlightSummary, FlightSearchError> {
    let itinerary = offer.itineraries.first().cloned().unwrap_or_default();
    let segment = itinerary.segments.first().cloned().unwrap_or_default();
    let departure = segment.departure.unwrap_or_default();
    let arrival = segment.arrival.unwrap_or_default();

    let carrier_code = segment.carrier_code.unwrap_or_default();
    let airline = carriers
        .get(&carrier_code)
        .cloned()
        .unwrap_or_else(|| carrier_code.clone());
    let flight_number = format!("{} {}", carrier_code, segment.number.unwrap_or_default())
        .trim()
        .to_string();

    let (price, currency) = match &offer.price {
        Some(p) => (
            parse_price(p.total.as_ref())?,
            p.currency.clone().unwrap_or_else(|| CURRENCY.to_string()),
        ),
        None => (0.0, CURRENCY.to_string()),
    };

    Ok(FlightSummary {
        airline,
        flight_number,
        origin: departure.iata_code.unwrap_or_default(),
        destination: arrival.iata_code.unwrap_or_default(),
        departure_time: departure.at.unwrap_or_default(),
        arrival_time: arrival.at.unwrap_or_default(),
        duration: format_duration(itinerary.duration.as_deref().unwrap_or("")),
        stops: itinerary.segments.len().saturating_sub(1) as u32,
        price,
        currency,
    })
}

/// The provider sends `total` as a decimal string; plain numbers are accepted too.
///
/// Prices are finite and non-negative.
fn parse_price(total: Option<&Value>) -> Result<f64, FlightSearchError> {
    let (raw, parsed) = match total {
        None | Some(Value::Null) => return Ok(0.0),
        Some(Value::Number(n)) => (n.to_string(), n.as_f64()),
        Some(Value::String(s)) => (s.clone(), s.trim().parse::<f64>().ok()),
        Some(other) => (other.to_string(), None),
    };
    match parsed {
        Some(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(FlightSearchError::InvalidPrice(raw)),
    }
}

/// Compact rendering of an ISO-8601 duration: `PT2H30M` becomes `2h 30m`.
pub fn format_duration(iso: &str) -> String {
    iso.replace("PT", "")
        .replace('H', "h ")
        .replace('M', "m")
        .trim()
        .to_string()
}
