//! Assist config loaded strictly from environment variables.
//!
//! This module provides a convenience constructor for [`AssistConfig`] for
//! hosts without their own settings store (CLIs, integration harnesses).
//! Unset variables fall back to the documented defaults; set-but-invalid
//! values are rejected.
//!
//! # Environment variables
//!
//! - `ASSIST_BASE_URL` or `ASSIST_PORT` = backend endpoint
//! - `ASSIST_MODEL`             = model identifier
//! - `ASSIST_TEMPERATURE`       = sampling temperature (f32)
//! - `ASSIST_MAX_TOKENS`        = max tokens to generate (u32)
//! - `ASSIST_TIMEOUT_MS`        = request timeout in milliseconds (u64)
//! - `ASSIST_MAX_PREFIX_CHARS`  = prefix window budget (usize)
//! - `ASSIST_MAX_SUFFIX_CHARS`  = suffix window budget (usize)
//! - `ASSIST_ENABLED`           = gate for inline completion (bool)
//! - `ASSIST_LOG_PROMPTS`       = echo instructions to debug logs (bool)

use crate::{
    config::assist_config::AssistConfig,
    error_handler::{
        AssistError, ConfigError, env_opt_bool, env_opt_f32, env_opt_u32, env_opt_u64,
        env_opt_usize, validate_http_endpoint, validate_range_f32,
    },
};

/// Resolves the backend endpoint from environment.
///
/// Precedence:
/// 1. `ASSIST_BASE_URL` if present and non-empty
/// 2. `ASSIST_PORT` → `http://localhost:{port}`
/// 3. the built-in default
///
/// # Errors
///
/// - [`ConfigError::InvalidFormat`] if `ASSIST_BASE_URL` lacks an HTTP scheme
/// - [`ConfigError::InvalidNumber`] if `ASSIST_PORT` is invalid
fn assist_endpoint() -> Result<Option<String>, AssistError> {
    if let Ok(url) = std::env::var("ASSIST_BASE_URL") {
        if !url.trim().is_empty() {
            validate_http_endpoint("ASSIST_BASE_URL", url.trim())?;
            return Ok(Some(url));
        }
    }
    if let Ok(port) = std::env::var("ASSIST_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "ASSIST_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(Some(format!("http://localhost:{port}")));
        }
    }
    Ok(None)
}

/// Constructs an [`AssistConfig`] from environment variables, falling back
/// to the documented defaults for anything unset.
///
/// # Errors
///
/// Returns [`AssistError::Config`] when a variable is set but malformed, or
/// when `ASSIST_TEMPERATURE` is outside `0.0..=2.0` or `ASSIST_MODEL` is
/// set to an empty string.
pub fn config_from_env() -> Result<AssistConfig, AssistError> {
    let mut cfg = AssistConfig::default();

    if let Some(url) = assist_endpoint()? {
        cfg.base_url = url;
    }
    if let Ok(model) = std::env::var("ASSIST_MODEL") {
        if model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        cfg.model = model;
    }
    if let Some(t) = env_opt_f32("ASSIST_TEMPERATURE")? {
        validate_range_f32("temperature", t, 0.0, 2.0)?;
        cfg.temperature = t;
    }
    if let Some(n) = env_opt_u32("ASSIST_MAX_TOKENS")? {
        cfg.max_tokens = n;
    }
    if let Some(ms) = env_opt_u64("ASSIST_TIMEOUT_MS")? {
        cfg.request_timeout_ms = ms;
    }
    if let Some(n) = env_opt_usize("ASSIST_MAX_PREFIX_CHARS")? {
        cfg.max_prefix_chars = n;
    }
    if let Some(n) = env_opt_usize("ASSIST_MAX_SUFFIX_CHARS")? {
        cfg.max_suffix_chars = n;
    }
    if let Some(b) = env_opt_bool("ASSIST_ENABLED")? {
        cfg.enabled = b;
    }
    if let Some(b) = env_opt_bool("ASSIST_LOG_PROMPTS")? {
        cfg.log_prompts = b;
    }

    Ok(cfg)
}
