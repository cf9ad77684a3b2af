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

//! # Unified MCP Server Entry Point
//!
//! Supports stdio and streamable HTTP transports via subcommand.

use anyhow::{Context, Error, Result};
use clap::{Parser, Subcommand};
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ListToolsResult, PaginatedRequestParam, Tool,
};
use rmcp::service::{RequestContext, serve_server};
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use rmcp::{ErrorData, RoleServer};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use volare_flight_agent::{AmadeusConfig, AmadeusFlightsClient, ToolRegistry};

#[derive(Parser, Debug)]
#[command(name = "volare-flight-mcp")]
#[command(
    author,
    version,
    about = "MCP server for flight offers search (Amadeus)"
)]
struct Args {
    /// Amadeus API base URL
    #[arg(long, env = "AMADEUS_BASE_URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run MCP server over stdio (for Claude Desktop, etc.)
    Stdio,

    /// Run MCP server over HTTP
    Http {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[derive(Clone)]
pub struct FlightAgentServer {
    registry: Arc<ToolRegistry>,
}

impl FlightAgentServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

impl ServerHandler for FlightAgentServer {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        let tools: Vec<Tool> = self
            .registry
            .list()
            .into_iter()
            .map(|d| {
                let input_schema = d.input_schema();
                Tool::new(d.name, d.description, input_schema)
            })
            .collect();
        tracing::debug!("list_tools called, tools count: {}", tools.len());
        Box::pin(async move { Ok::<_, ErrorData>(ListToolsResult::with_all_items(tools)) })
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        let registry = Arc::clone(&self.registry);
        Box::pin(async move {
            let args = serde_json::Value::Object(request.arguments.unwrap_or_default());
            let output = registry.call(&request.name, args).await;
            match serde_json::to_string(&output) {
                Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
                Err(e) => Err(ErrorData::internal_error(e.to_string(), None)),
            }
        })
    }

    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2025_03_26,
            capabilities: rmcp::model::ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability::default()),
                ..Default::default()
            },
            server_info: rmcp::model::Implementation::from_build_env(),
            instructions: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".to_string().into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .init();

    tracing::debug!("Parsing arguments...");
    let args = Args::parse();
    tracing::debug!("Parsed args: {:?}", args);

    let mut config = AmadeusConfig::from_env();
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.trim().trim_end_matches('/').to_string();
    }
    if !config.has_credentials() {
        tracing::warn!("AMADEUS_API_KEY / AMADEUS_API_SECRET not set, searches will fail");
    }
    tracing::debug!("Config: {:?}", config);

    let flights_client =
        Arc::new(AmadeusFlightsClient::new(config).context("Failed to create flights client")?);
    let registry = Arc::new(ToolRegistry::new(flights_client));

    match args.command {
        Command::Stdio => {
            eprintln!("Starting MCP server over stdio...");
            let server = FlightAgentServer::new(registry);
            let (stdin, stdout) = rmcp::transport::io::stdio();
            let running = serve_server(Arc::new(server), (stdin, stdout))
                .await
                .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;
            let reason = running.waiting().await.context("MCP service task failed")?;
            tracing::debug!("Server stopped: {:?}", reason);
        }
        Command::Http { host, port } => {
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .context("Invalid host:port")?;
            tracing::info!("Starting MCP server over HTTP on {}", addr);
            let server = FlightAgentServer::new(registry);
            let session_manager = Arc::new(LocalSessionManager::default());
            let config = StreamableHttpServerConfig {
                stateful_mode: true,
                ..Default::default()
            };
            let service =
                StreamableHttpService::new(move || Ok(server.clone()), session_manager, config);
            let app = axum::Router::new().nest_service("/mcp", service);
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .context("Failed to bind to address")?;
            tracing::debug!("Listening on {}", addr);
            axum::serve(listener, app)
                .await
                .context("HTTP server error")?;
        }
    }

    Ok(())
}
