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

//! Tool listing and dispatch.


use anyhow::{Context, Result};
use chrono::{Days, Utc};
use fake_amadeus::{Behaviour, FakeAmadeus};
use serde_json::{Value, json};
use std::sync::Arc;
use volare_flight_agent::{AmadeusFlightsClient, SEARCH_FLIGHTS_TOOL, ToolOutput, ToolRegistry};

fn registry_for(fake: &FakeAmadeus) -> Result<ToolRegistry> {
    let client = AmadeusFlightsClient::new(fake.config())?;
    Ok(ToolRegistry::new(Arc::new(client)))
}

fn future_date() -> String {
    (Utc::now().date_naive() + Days::new(30))
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn test_lists_single_search_tool() -> Result<()> {
    let fake = FakeAmadeus::start().await;
    let tools = registry_for(&fake)?.list();

    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "flight.search_flights");
    assert_eq!(tools[0].name, SEARCH_FLIGHTS_TOOL);
    assert!(!tools[0].description.is_empty());
    assert_eq!(tools[0].parameters["type"], "object");
    assert!(!tools[0].input_schema().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_advertised_schema_matches_accepted_arguments() -> Result<()> {
    let fake = FakeAmadeus::start().await;
    let schema = registry_for(&fake)?.list()[0].parameters.clone();
    let validator =
        jsonschema::Validator::new(&schema).context("Failed to create validator for schema")?;

    let valid = [
        json!({"origin": "MAD", "destination": "MRS", "date": "2026-11-02"}),
        json!({"origin": "MAD", "destination": "MRS", "date": "2026-11-02", "adults": 2, "max_results": 10}),
    ];
    for args in &valid {
        assert!(validator.is_valid(args), "should accept {}", args);
    }

    let invalid = [
        json!({"origin": "MAD", "destination": "MRS"}),
        json!({"origin": "MAD", "destination": "MRS", "date": "2026-11-02", "adults": "two"}),
        json!({"origin": "MAD", "destination": "MRS", "date": "2026-11-02", "adults": 0}),
    ];
    for args in &invalid {
        assert!(!validator.is_valid(args), "should reject {}", args);
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_tool() -> Result<()> {
    let fake = FakeAmadeus::start().await;
    let output = registry_for(&fake)?
        .call("flight.unknown", json!({"origin": "MAD"}))
        .await;

    assert_eq!(
        serde_json::to_value(&output)?,
        json!({"error": "unknown tool: flight.unknown"})
    );
    assert_eq!(fake.token_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_invalid_arguments_are_data() -> Result<()> {
    let fake = FakeAmadeus::start().await;
    let registry = registry_for(&fake)?;

    let cases = [
        json!({"origin": "MAD", "destination": "MRS"}),
        json!({"origin": 7, "destination": "MRS", "date": "2026-11-02"}),
        json!({"origin": "MAD", "destination": "MRS", "date": "2026-11-02", "adults": 0}),
        json!("MAD-MRS"),
    ];
    for args in cases {
        let output = registry.call(SEARCH_FLIGHTS_TOOL, args.clone()).await;
        let value = serde_json::to_value(&output)?;
        assert_eq!(value["flights"], json!([]), "{}", args);
        let error = value["error"].as_str().unwrap_or_default();
        assert!(error.starts_with("invalid arguments: "), "{} -> {}", args, error);
    }
    assert_eq!(fake.token_calls(), 0);
    assert_eq!(fake.search_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_valid_call_is_delegated() -> Result<()> {
    let fake = FakeAmadeus::start().await;
    let output = registry_for(&fake)?
        .call(
            SEARCH_FLIGHTS_TOOL,
            json!({"origin": "MAD", "destination": "MRS", "date": future_date()}),
        )
        .await;

    assert!(output.error().is_none());
    let value = serde_json::to_value(&output)?;
    assert!(value.get("error").is_none());
    let flights = value["flights"].as_array().expect("flights array");
    assert_eq!(flights.len(), 3);
    assert_eq!(flights[0]["flight_number"], "IB 8410");
    assert_eq!(flights[0]["price"], json!(89.43));

    let result = output.into_search_result().expect("search result");
    assert_eq!(result.flights.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_provider_failure_flows_through_dispatcher() -> Result<()> {
    let fake = FakeAmadeus::with_behaviour(Behaviour {
        offers_status: 500,
        offers_body: "Server Error".to_string(),
        ..Default::default()
    })
    .await;
    let output = registry_for(&fake)?
        .call(
            SEARCH_FLIGHTS_TOOL,
            json!({"origin": "MAD", "destination": "MRS", "date": "2020-01-01", "adults": 1}),
        )
        .await;

    let value: Value = serde_json::to_value(&output)?;
    assert_eq!(value["flights"], json!([]));
    assert_eq!(value["error"], "API error 500: Server Error");
    assert!(matches!(output, ToolOutput::Search(_)));
    Ok(())
}
