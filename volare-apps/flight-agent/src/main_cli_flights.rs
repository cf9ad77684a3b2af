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

//! CLI for Amadeus flight offers search.

use anyhow::{Context, Result};
use clap::Parser;
use std::cmp::max;
use volare_flight_agent::{
    AmadeusConfig, AmadeusFlightsClient, FlightSummary, SearchRequest, SearchResult,
    normalize_date,
};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "volare-flights")]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Origin IATA code (e.g., MAD)
    #[arg(short, long)]
    from: String,

    /// Destination IATA code (e.g., MRS)
    #[arg(short, long)]
    to: String,

    /// Departure date (YYYY-MM-DD), past dates move to tomorrow
    #[arg(short, long)]
    date: String,

    /// Number of adult passengers
    #[arg(short, long, default_value = "1")]
    adults: u32,

    /// Maximum number of offers
    #[arg(short, long, default_value = "5")]
    max_results: u32,

    /// Amadeus API base URL
    #[arg(long, env = "AMADEUS_BASE_URL")]
    base_url: Option<String>,

    /// Print the raw result as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

fn fmt_times(flight: &FlightSummary) -> String {
    let short = |at: &str| {
        at.split_once('T')
            .map(|(_, time)| time.chars().take(5).collect::<String>())
            .unwrap_or_else(|| "??:??".to_string())
    };
    format!("{} → {}", short(&flight.departure_time), short(&flight.arrival_time))
}

fn fmt_stops(stops: u32) -> String {
    match stops {
        0 => "direct".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}

/// Column widths for airline, flight number, times, duration, stops
fn calc_column_widths(flights: &[FlightSummary]) -> (usize, usize, usize, usize, usize) {
    let mut max_airline = 7;
    let mut max_number = 6;
    let mut max_times = 13;
    let mut max_duration = 8;
    let mut max_stops = 7;

    for f in flights {
        max_airline = max(max_airline, f.airline.chars().count());
        max_number = max(max_number, f.flight_number.chars().count());
        max_times = max(max_times, fmt_times(f).chars().count());
        max_duration = max(max_duration, f.duration.chars().count());
        max_stops = max(max_stops, fmt_stops(f.stops).len());
    }

    let available_width = get_terminal_width().saturating_sub(25);
    if max_airline + max_number + max_times + max_duration + max_stops > available_width
        && available_width > 50
    {
        max_airline = max_airline.min(available_width / 4).max(4);
    }

    (max_airline, max_number, max_times, max_duration, max_stops)
}

/// Render results to stdout
fn render_results(request: &SearchRequest, departure_date: &str, result: &SearchResult) {
    let title_bar = format!(
        "================================================================================================\n  🛫  {} → {} on {} ({} adult(s))\n================================================================================================",
        request.origin, request.destination, departure_date, request.adults
    );
    println!("{}\n", title_bar);

    let best = result
        .flights
        .iter()
        .min_by(|a, b| a.price.total_cmp(&b.price));
    if let Some(best) = best {
        println!("💰 Best Price:  {:.2} {}", best.price, best.currency);
    }
    println!("📊 Total Flights: {}", result.flights.len());

    let (aw, nw, tw, dw, sw) = calc_column_widths(&result.flights);

    println!("{}\n", dash_bar());
    println!(
        "  {:>3}  {:<aw$}  {:<nw$}  {:<tw$}  {:<dw$}  {:<sw$}   PRICE",
        "#", "AIRLINE", "FLIGHT", "DEP → ARR", "DURATION", "STOPS"
    );
    println!("{}\n", dash_bar());

    for (i, f) in result.flights.iter().enumerate() {
        let airline: String = f.airline.chars().take(aw).collect();
        println!(
            "  {:>3}  {:<aw$}  {:<nw$}  {:<tw$}  {:<dw$}  {:<sw$}   {:.2} {}",
            i + 1,
            airline,
            f.flight_number,
            fmt_times(f),
            f.duration,
            fmt_stops(f.stops),
            f.price,
            f.currency
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    tracing::debug!("Args: {:?}", args);

    let mut config = AmadeusConfig::from_env();
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.trim().trim_end_matches('/').to_string();
    }

    let request = SearchRequest::new(
        &args.from.to_uppercase(),
        &args.to.to_uppercase(),
        &args.date,
    )
    .adults(args.adults)
    .max_results(args.max_results);
    request.validate().context("Invalid search parameters")?;

    let client = AmadeusFlightsClient::new(config)?;
    let result = client.search(&request).await;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else if result.is_success() {
        render_results(&request, &normalize_date(&request.date), &result);
    }

    if let Some(error) = &result.error {
        anyhow::bail!("Search failed: {}", error);
    }

    Ok(())
}
