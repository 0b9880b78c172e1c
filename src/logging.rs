use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::util::{non_empty_env, parse_bool_str};

const DEFAULT_LOG_PATH: &str = "/tmp/giftwrap.log";
const DEFAULT_FILTER: &str = "giftwrap=info";
const LOG_PATH_ENV: &str = "GIFTWRAP_LOG_PATH";
const DEBUG_PAYLOAD_ENV: &str = "GIFTWRAP_DEBUG_PAYLOAD";

/// Installs the global tracing subscriber.
///
/// The terminal UI owns stdout/stderr while it runs, so logs go to a file
/// whenever stderr is a terminal.
pub fn init_tracing() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match resolve_log_path() {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))
}

pub fn debug_payload_enabled() -> bool {
    std::env::var(DEBUG_PAYLOAD_ENV)
        .ok()
        .and_then(|v| parse_bool_str(&v))
        .unwrap_or(false)
}

pub fn emit_debug_payload<T: Serialize>(request_url: &str, payload: &T) {
    let formatted_payload = serde_json::to_string_pretty(payload)
        .unwrap_or_else(|_| "<payload serialization error>".to_string());
    tracing::debug!(url = %request_url, "outbound payload:\n{formatted_payload}");
}

fn resolve_log_path() -> Option<String> {
    non_empty_env(LOG_PATH_ENV).or_else(|| {
        if std::io::stderr().is_terminal() {
            Some(DEFAULT_LOG_PATH.to_string())
        } else {
            None
        }
    })
}
