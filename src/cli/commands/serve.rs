//! Line-delimited JSON-RPC 2.0 server over stdin/stdout.
//!
//! One request per line, one response per line. Methods: `decide`, `learn`,
//! `explain`, `stats`, `ping`, `shutdown`. Requests run one at a time
//! against the shared engine; `learn` holds the engine lock across update
//! and save.

use std::io::{self, BufRead, Write};

use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::app::AppContext;
use crate::bandit::{Feedback, Tool};
use crate::error::{Result, SmartbotError};

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Echo requests and responses to stderr
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data,
            }),
        }
    }

    fn engine_error(id: Option<Value>, err: &SmartbotError) -> Self {
        let code = match err {
            SmartbotError::DimensionMismatch { .. }
            | SmartbotError::UnknownArm(_)
            | SmartbotError::NonFiniteInput(_) => INVALID_PARAMS,
            _ => ENGINE_ERROR,
        };
        Self::error(
            id,
            code,
            err.to_string(),
            Some(serde_json::json!({ "code": err.code() })),
        )
    }
}

// JSON-RPC 2.0 error codes
const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const ENGINE_ERROR: i32 = -32000;

#[derive(Debug, Deserialize)]
struct ContextParams {
    features: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct LearnParams {
    features: Vec<f64>,
    action: String,
    delta_suds: f64,
    completed: bool,
    #[serde(default)]
    regret: Option<bool>,
}

pub fn run(ctx: &AppContext, args: &ServeArgs) -> Result<()> {
    info!(state = %ctx.state_path.display(), "serving JSON-RPC on stdio");
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(error = %e, "stdin read error");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        if args.debug {
            eprintln!("[smartbot] <- {line}");
        }

        let (response, stop) = handle_request(ctx, &line);
        if let Some(response) = response {
            let response_json = serde_json::to_string(&response)?;
            if args.debug {
                eprintln!("[smartbot] -> {response_json}");
            }
            if writeln!(stdout, "{response_json}").is_err() {
                break;
            }
            let _ = stdout.flush();
        }
        if stop {
            break;
        }
    }

    info!("server shutting down");
    Ok(())
}

/// Handle one request line. The flag is true when the server should stop.
pub fn handle_request(ctx: &AppContext, line: &str) -> (Option<JsonRpcResponse>, bool) {
    let request: JsonRpcRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            return (
                Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                    None,
                )),
                false,
            );
        }
    };

    if request.jsonrpc != "2.0" {
        return (
            Some(JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                "Invalid JSON-RPC version".to_string(),
                None,
            )),
            false,
        );
    }

    debug!(method = %request.method, "request");
    let id = request.id;
    let response = match request.method.as_str() {
        "decide" => with_params(id, request.params, |p: ContextParams| {
            to_value(ctx.engine.lock().decide(&p.features)?)
        }),
        "explain" => with_params(id, request.params, |p: ContextParams| {
            to_value(ctx.engine.lock().explain(&p.features)?)
        }),
        "learn" => with_params(id, request.params, |p: LearnParams| {
            let tool: Tool = p.action.parse()?;
            let feedback = Feedback::new(p.delta_suds, p.completed, p.regret);
            to_value(ctx.engine.lock().learn(&p.features, tool, &feedback)?)
        }),
        "stats" => match to_value(ctx.engine.lock().stats()) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => JsonRpcResponse::engine_error(id, &err),
        },
        "ping" => JsonRpcResponse::success(
            id,
            serde_json::json!({ "message": "Smartbot Core API", "status": "running" }),
        ),
        "shutdown" => return (Some(JsonRpcResponse::success(id, Value::Null)), true),
        _ => {
            // Notifications (no id) never get a response.
            if id.is_none() {
                return (None, false);
            }
            JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
                None,
            )
        }
    };
    (Some(response), false)
}

fn with_params<P, F>(id: Option<Value>, params: Value, f: F) -> JsonRpcResponse
where
    P: for<'de> Deserialize<'de>,
    F: FnOnce(P) -> Result<Value>,
{
    let params: P = match serde_json::from_value(params) {
        Ok(p) => p,
        Err(e) => {
            return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}"), None);
        }
    };
    match f(params) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(err) => JsonRpcResponse::engine_error(id, &err),
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
