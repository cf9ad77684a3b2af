//! Shared test helpers for driving the built binaries as subprocesses.

#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, ChildStdout};
use tokio::time::Duration;

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn find_binary() -> Result<PathBuf> {
    find_workspace_binary("volare-flight-mcp")
}

/// Locate a binary of this package in the workspace `target/` directory.
pub fn find_workspace_binary(name: &str) -> Result<PathBuf> {
    let manifest_dir = PathBuf::from(
        std::env::var("CARGO_MANIFEST_DIR")
            .map_err(|e| anyhow::anyhow!("CARGO_MANIFEST_DIR not set: {}", e))?,
    );
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .ok_or_else(|| anyhow::anyhow!("Could not determine workspace root"))?;

    let paths = [
        workspace_root.join("target/debug").join(name),
        workspace_root.join("target/release").join(name),
    ];

    for path in &paths {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }
    anyhow::bail!(
        "Could not find {} binary. Run `cargo build -p volare-flight-agent` first. Searched: {:?}",
        name,
        paths
    )
}

pub async fn stream_stderr_to_console(mut stderr: tokio::process::ChildStderr) {
    let mut buf = [0u8; 4096];
    while let Ok(n) = stderr.read(&mut buf).await {
        if n == 0 {
            break;
        }
        eprint!("{}", String::from_utf8_lossy(&buf[..n]));
    }
}

pub async fn send(stdin: &mut ChildStdin, message: Value) -> Result<()> {
    let mut line = message.to_string();
    line.push('\n');
    stdin.write_all(line.as_bytes()).await?;
    stdin.flush().await?;
    Ok(())
}

/// Read newline-delimited JSON-RPC messages until the response with `id` arrives.
pub async fn read_response(stdout: &mut BufReader<ChildStdout>, id: u64) -> Result<Value> {
    loop {
        let mut line = String::new();
        let n = tokio::time::timeout(TIMEOUT, stdout.read_line(&mut line))
            .await
            .context("Timed out waiting for MCP response")??;
        anyhow::ensure!(n > 0, "MCP server closed stdout before answering id {}", id);

        let Ok(message) = serde_json::from_str::<Value>(line.trim()) else {
            continue;
        };
        if message.get("id") == Some(&json!(id)) {
            return Ok(message);
        }
    }
}

pub async fn mcp_initialize(
    stdin: &mut ChildStdin,
    stdout: &mut BufReader<ChildStdout>,
) -> Result<Value> {
    send(
        stdin,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "1.0"}
            }
        }),
    )
    .await?;
    let response = read_response(stdout, 1).await?;
    send(
        stdin,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await?;
    Ok(response)
}

/// Call a tool and decode the JSON carried by its first text content.
pub async fn call_tool(
    stdin: &mut ChildStdin,
    stdout: &mut BufReader<ChildStdout>,
    id: u64,
    name: &str,
    arguments: Value,
) -> Result<Value> {
    send(
        stdin,
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        }),
    )
    .await?;
    let response = read_response(stdout, id).await?;
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .with_context(|| format!("No text content in response: {}", response))?;
    serde_json::from_str(text).context("Tool output is not JSON")
}
